use session_core::Countdown;

use crate::events::SendRejection;
use crate::popup::Popup;
use crate::transcript::TranscriptEntry;

/// The surface a session renders into.
///
/// Called only from the controller task.
pub trait SessionView: Send {
    /// Append an entry to the chat transcript.
    fn append_entry(&mut self, entry: &TranscriptEntry);

    /// Show or hide the loading indicator; input is disabled while shown.
    fn set_loading(&mut self, loading: bool);

    /// Render the countdown for the current tick.
    fn render_countdown(&mut self, countdown: &Countdown);

    /// The budget is used up; offer the download affordance.
    fn unlock_submission(&mut self);

    fn show_popup(&mut self, popup: &Popup);

    fn close_popup(&mut self);

    /// Return focus to the message input.
    fn focus_input(&mut self) {}

    /// A submitted message was not sent.
    fn message_rejected(&mut self, _reason: &SendRejection) {}
}
