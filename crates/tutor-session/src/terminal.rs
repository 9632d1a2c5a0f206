//! Terminal rendering of a session

use colored::{ColoredString, Colorize};
use session_controller::{
    Popup, PopupAction, SendRejection, SessionView, Speaker, TranscriptEntry,
};
use session_core::messages::LOADING_MESSAGE;
use session_core::{Countdown, CountdownPhase};

/// Prints transcript entries, countdown changes and popups to stdout.
#[derive(Default)]
pub struct TerminalView {
    last_phase: Option<CountdownPhase>,
    last_minute: Option<i64>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    fn badge(countdown: &Countdown) -> ColoredString {
        match countdown.phase {
            CountdownPhase::Normal => countdown.label.blue(),
            CountdownPhase::Warning => countdown.label.yellow(),
            CountdownPhase::Expired => countdown.label.red(),
        }
    }
}

fn command_for(action: PopupAction) -> &'static str {
    match action {
        PopupAction::Acknowledge => "/ok",
        PopupAction::Confirm => "/yes",
        PopupAction::Back => "/back",
    }
}

impl SessionView for TerminalView {
    fn append_entry(&mut self, entry: &TranscriptEntry) {
        match entry.speaker {
            Speaker::User => println!("{} {}", "나:".green().bold(), entry.text),
            Speaker::Ai => println!("{} {}", "AI:".cyan().bold(), entry.text),
            Speaker::System => println!("{}", entry.text.red()),
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            println!("{}", LOADING_MESSAGE.dimmed());
        }
    }

    // Prints on phase changes and once a minute, not every tick.
    fn render_countdown(&mut self, countdown: &Countdown) {
        let minute = countdown.display_seconds() / 60;
        if self.last_phase == Some(countdown.phase) && self.last_minute == Some(minute) {
            return;
        }
        self.last_phase = Some(countdown.phase);
        self.last_minute = Some(minute);
        println!("[{}]", Self::badge(countdown));
    }

    fn unlock_submission(&mut self) {
        println!(
            "{}",
            "제출 양식을 받을 수 있습니다. /submit 을 입력하세요.".green()
        );
    }

    fn show_popup(&mut self, popup: &Popup) {
        println!("{}", "─".repeat(40).dimmed());
        println!("{}", popup.message.bold());
        let choices: Vec<String> = popup
            .actions
            .iter()
            .map(|action| format!("{} ({})", action.label(), command_for(*action)))
            .collect();
        println!("{}", choices.join("   "));
        println!("{}", "─".repeat(40).dimmed());
    }

    fn close_popup(&mut self) {}

    fn message_rejected(&mut self, reason: &SendRejection) {
        match reason {
            SendRejection::Empty => {}
            SendRejection::ExchangeInFlight => {
                println!("{}", "AI 응답을 기다리는 중입니다.".dimmed())
            }
            SendRejection::CoolingDown => {
                println!("{}", "잠시 후 다시 보내 주세요.".dimmed())
            }
        }
    }
}
