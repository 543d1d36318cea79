//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SwitchTab(usize),
    MoveUp,
    MoveDown,
    Open,
    OpenSearch,
    OpenChart,
    GoHome,
    ToggleTheme,
    Reload,
}

/// Keys while the search prompt has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('c') => Some(Action::OpenChart),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Enter => Some(Action::Open),
        KeyCode::Esc => Some(Action::GoHome),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::NextTab),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevTab),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(c @ '1'..='4') => Some(Action::SwitchTab(c as usize - '1' as usize)),
        _ => None,
    }
}

pub fn map_prompt_key(event: KeyEvent) -> Option<PromptKey> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(PromptKey::Cancel),
            _ => None,
        };
    }

    match code {
        KeyCode::Enter => Some(PromptKey::Submit),
        KeyCode::Esc => Some(PromptKey::Cancel),
        KeyCode::Backspace => Some(PromptKey::Backspace),
        KeyCode::Char(c) => Some(PromptKey::Insert(c)),
        _ => None,
    }
}
