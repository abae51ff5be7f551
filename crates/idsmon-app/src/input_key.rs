//! Keyboard input independent of the terminal library.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary so
//! the app crate, and the headless runner, never depend on crossterm.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Plain or shifted character
    Char(char),
    /// Character with Ctrl held
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_differs_from_plain() {
        assert_eq!(InputKey::CharCtrl('s'), InputKey::CharCtrl('s'));
        assert_ne!(InputKey::CharCtrl('s'), InputKey::Char('s'));
    }
}
