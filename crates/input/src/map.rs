//! Key mapping from terminal events to preview actions.

use crate::types::ViewAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to preview actions.
pub fn handle_key_event(key: KeyEvent) -> Option<ViewAction> {
    match key.code {
        // Zoom
        KeyCode::Char(c @ ('+' | '=' | '-' | '_')) => Some(ViewAction::Zoom(c)),

        // Panning
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(ViewAction::Pan { dx: 1, dy: 0 }),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(ViewAction::Pan { dx: -1, dy: 0 }),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Some(ViewAction::Pan { dx: 0, dy: 1 }),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(ViewAction::Pan { dx: 0, dy: -1 }),

        // Actions
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Home => Some(ViewAction::Center),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(ViewAction::Screenshot),
        KeyCode::Char('v') | KeyCode::Char('V') => Some(ViewAction::ToggleVerbose),

        _ => None,
    }
}

/// Check if key should quit the preview.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
