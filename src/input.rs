//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flip the loading switch.
    Toggle,
    Quit,
    None,
}

/// Map key event to an action: Space/Enter/t toggle, q/Esc/Ctrl-C quit.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    match code {
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc if no_mod => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('t') if no_mod => Action::Toggle,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_toggle_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Enter, KeyCode::Char('t')] {
            assert_eq!(key_to_action(key(code, KeyModifiers::NONE)), Action::Toggle);
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Quit);
        assert_eq!(
            key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_modified_keys_ignored() {
        assert_eq!(key_to_action(key(KeyCode::Char('t'), KeyModifiers::ALT)), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Char('x'), KeyModifiers::NONE)), Action::None);
    }
}
