//! Keybinding definitions for the TUI.
//!
//! [`map_key`] covers normal mode only. While a prompt is open, keys are
//! routed to the prompt by [`crate::state::App::handle_prompt_key`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    EditItem,
    NewItem,
    DeleteItem,
    OpenSearch,
    Refresh,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('a') => Some(Action::NewItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::PageDown | KeyCode::Char(']') | KeyCode::Char('n') => Some(Action::NextPage),
        KeyCode::PageUp | KeyCode::Char('[') | KeyCode::Char('p') => Some(Action::PrevPage),
        KeyCode::Char(c @ '1'..='8') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}
