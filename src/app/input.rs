//! Key mapping

use crossterm::event::{KeyCode, KeyModifiers};

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Char('h') => Some(Action::FocusSidebar),
        KeyCode::Char('l') => Some(Action::FocusContent),
        KeyCode::Char('g') => Some(Action::Top),
        KeyCode::Char('G') => Some(Action::Bottom),
        KeyCode::Char('d') => Some(Action::HalfPageDown),
        KeyCode::Char('u') => Some(Action::HalfPageUp),
        KeyCode::Char('H') => Some(Action::PrevChapter),
        KeyCode::Char('L') => Some(Action::NextChapter),
        KeyCode::Char('n') => Some(Action::NextMatch),
        KeyCode::Char('N') => Some(Action::PrevMatch),
        _ => common_key_to_action(key),
    }
}

/// Keys that work with vim mode off as well
pub fn common_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down => Some(Action::Down),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Left => Some(Action::FocusSidebar),
        KeyCode::Right => Some(Action::FocusContent),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Tab => Some(Action::SwitchPanel),
        KeyCode::Char('/') => Some(Action::Search),
        KeyCode::Char(':') => Some(Action::Command),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Char('[') | KeyCode::Char('1') => Some(Action::ToggleSidebar),
        KeyCode::Char('<') => Some(Action::PrevChapter),
        KeyCode::Char('>') => Some(Action::NextChapter),
        // 'q' is not mapped; use :q to quit
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(
    key: KeyCode,
    modifiers: KeyModifiers,
    vim_mode: bool,
) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('d') => Some(Action::HalfPageDown),
            KeyCode::Char('u') => Some(Action::HalfPageUp),
            KeyCode::Char('f') => Some(Action::PageDown),
            KeyCode::Char('b') => Some(Action::PageUp),
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        }
    } else if vim_mode {
        vim_key_to_action(key)
    } else {
        common_key_to_action(key)
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Movement
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,

    // Selection
    Select,
    Back,

    // Chapters
    NextChapter,
    PrevChapter,

    // Search
    Search,
    NextMatch,
    PrevMatch,

    // Panels
    ToggleSidebar,
    FocusSidebar,
    FocusContent,
    SwitchPanel,

    // Misc
    ToggleTheme,
    Command,
    Help,
    Quit,
}
