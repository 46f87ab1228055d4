use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    NextTab,
    SwitchTab(usize),
    OpenDetail,
    CloseDetail,
    Refresh,
    ToggleBookmark,
    OpenInBrowser,
    DismissError,
    ShowHelp,
    HideHelp,
    // Search input actions
    SearchInputStart,
    SearchInputChar(char),
    SearchInputBackspace,
    SearchInputSubmit,
    SearchInputCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    search_input_active: bool,
    detail_open: bool,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Search input mode
    if search_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::SearchInputSubmit),
            KeyCode::Esc => Some(AppAction::SearchInputCancel),
            KeyCode::Backspace => Some(AppAction::SearchInputBackspace),
            KeyCode::Char(c) => Some(AppAction::SearchInputChar(c)),
            _ => None,
        };
    }

    // Detail overlay mode
    if detail_open {
        return match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) | (KeyCode::Backspace, _) => {
                Some(AppAction::CloseDetail)
            }
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
            (KeyCode::Char('b'), _) => Some(AppAction::ToggleBookmark),
            (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Tab, _) => Some(AppAction::NextTab),
        (KeyCode::Char('1'), _) => Some(AppAction::SwitchTab(0)),
        (KeyCode::Char('2'), _) => Some(AppAction::SwitchTab(1)),
        (KeyCode::Char('3'), _) => Some(AppAction::SwitchTab(2)),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Enter, _) => Some(AppAction::OpenDetail),

        (KeyCode::Char('r'), _) => Some(AppAction::Refresh),
        (KeyCode::Char('b'), _) => Some(AppAction::ToggleBookmark),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
        (KeyCode::Char('/'), _) => Some(AppAction::SearchInputStart),
        (KeyCode::Esc, _) => Some(AppAction::DismissError),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
