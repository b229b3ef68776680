//! Key bindings: normal (arrows, space) and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press. Game actions map onto core commands; the rest
/// drive the app shell (pause, reset, level select, quit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    Pause,
    Reset,
    LevelUp,
    LevelDown,
    Quit,
    None,
}

/// Map key event to an action. Supports both normal (arrows, space rotate)
/// and vim (hjkl) layouts. Key repeat comes from the terminal; the game
/// core treats every delivered action as a discrete press.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod && modifiers != KeyModifiers::CONTROL {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc if no_mod => Action::Quit,
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Action::Quit,
        KeyCode::Char('p') if no_mod => Action::Pause,
        KeyCode::Char('r') if no_mod => Action::Reset,
        KeyCode::Char('+') | KeyCode::Char('=') if no_mod => Action::LevelUp,
        KeyCode::Char('-') if no_mod => Action::LevelDown,
        KeyCode::Left | KeyCode::Char('h') if no_mod => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') if no_mod => Action::MoveRight,
        KeyCode::Up | KeyCode::Char(' ') | KeyCode::Char('k') if no_mod => Action::RotateCw,
        KeyCode::Char('z') | KeyCode::Char('u') if no_mod => Action::RotateCcw,
        KeyCode::Down | KeyCode::Char('j') if no_mod => Action::SoftDrop,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_bindings() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::MoveLeft);
        assert_eq!(key_to_action(key(KeyCode::Right)), Action::MoveRight);
        assert_eq!(key_to_action(key(KeyCode::Down)), Action::SoftDrop);
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::RotateCw);
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::RotateCw);
    }

    #[test]
    fn test_shell_bindings() {
        assert_eq!(key_to_action(key(KeyCode::Char('r'))), Action::Reset);
        assert_eq!(key_to_action(key(KeyCode::Char('+'))), Action::LevelUp);
        assert_eq!(key_to_action(key(KeyCode::Char('-'))), Action::LevelDown);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_unbound_key_is_none() {
        assert_eq!(key_to_action(key(KeyCode::Char('x'))), Action::None);
    }
}
