use session_controller::PopupAction;

/// One line typed into the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Submit,
    Choose(PopupAction),
    Quit,
}

pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/submit" => Input::Submit,
        "/ok" => Input::Choose(PopupAction::Acknowledge),
        "/yes" => Input::Choose(PopupAction::Confirm),
        "/back" => Input::Choose(PopupAction::Back),
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Message(line.to_string()),
    }
}
