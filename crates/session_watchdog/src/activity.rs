//! Activity signals that reset the inactivity watchdog

use serde::{Deserialize, Serialize};

/// A user interaction that counts as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySignal {
    /// Pointer moved anywhere in the session view.
    PointerMoved,
    /// A key was pressed anywhere in the session view.
    KeyPressed,
    /// Focus entered the message input.
    InputFocused,
    /// The user sent a message.
    MessageSent,
}

impl ActivitySignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerMoved => "pointer_moved",
            Self::KeyPressed => "key_pressed",
            Self::InputFocused => "input_focused",
            Self::MessageSent => "message_sent",
        }
    }
}

impl std::fmt::Display for ActivitySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
