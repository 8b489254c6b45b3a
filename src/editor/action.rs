// Input actions and per-state key dispatch tables

use crate::ui::backend::Key;

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Every input the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Exit,
    ToggleEdit,
    TogglePlay,
    Move(Direction),
    /// Open the cell edit box
    Commit,
    Undo,
    Redo,
    // Line input
    Char(char),
    Erase,
    Submit,
    Cancel,
}

/// Which dispatch table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Navigate,
    Edit,
    LineInput,
}

impl InputContext {
    /// Look up the action bound to a key, if any
    pub fn action_for(self, key: Key) -> Option<InputAction> {
        match self {
            InputContext::Navigate => grid_action(key),
            InputContext::Edit => match key {
                Key::Char('u') => Some(InputAction::Undo),
                Key::Char('r') => Some(InputAction::Redo),
                other => grid_action(other),
            },
            InputContext::LineInput => line_input_action(key),
        }
    }
}

fn grid_action(key: Key) -> Option<InputAction> {
    let action = match key {
        Key::Esc => InputAction::Exit,
        Key::Char('e') => InputAction::ToggleEdit,
        Key::Char('p') => InputAction::TogglePlay,
        Key::Up => InputAction::Move(Direction::Up),
        Key::Down => InputAction::Move(Direction::Down),
        Key::Left => InputAction::Move(Direction::Left),
        Key::Right => InputAction::Move(Direction::Right),
        Key::Enter => InputAction::Commit,
        _ => return None,
    };
    Some(action)
}

fn line_input_action(key: Key) -> Option<InputAction> {
    let action = match key {
        Key::Char(c) => InputAction::Char(c),
        Key::Space => InputAction::Char(' '),
        Key::Backspace | Key::Delete => InputAction::Erase,
        Key::Enter => InputAction::Submit,
        Key::Esc => InputAction::Cancel,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_table() {
        let ctx = InputContext::Navigate;
        assert_eq!(ctx.action_for(Key::Esc), Some(InputAction::Exit));
        assert_eq!(ctx.action_for(Key::Char('e')), Some(InputAction::ToggleEdit));
        assert_eq!(ctx.action_for(Key::Char('p')), Some(InputAction::TogglePlay));
        assert_eq!(ctx.action_for(Key::Char('u')), None);
        assert_eq!(ctx.action_for(Key::Space), None);
    }

    #[test]
    fn test_edit_table_adds_history() {
        let ctx = InputContext::Edit;
        assert_eq!(ctx.action_for(Key::Char('u')), Some(InputAction::Undo));
        assert_eq!(ctx.action_for(Key::Char('r')), Some(InputAction::Redo));
        assert_eq!(ctx.action_for(Key::Left), Some(InputAction::Move(Direction::Left)));
        assert_eq!(ctx.action_for(Key::Enter), Some(InputAction::Commit));
    }

    #[test]
    fn test_line_input_table_captures_everything_typed() {
        let ctx = InputContext::LineInput;
        assert_eq!(ctx.action_for(Key::Char('e')), Some(InputAction::Char('e')));
        assert_eq!(ctx.action_for(Key::Space), Some(InputAction::Char(' ')));
        assert_eq!(ctx.action_for(Key::Delete), Some(InputAction::Erase));
        assert_eq!(ctx.action_for(Key::Esc), Some(InputAction::Cancel));
        assert_eq!(ctx.action_for(Key::Enter), Some(InputAction::Submit));
        assert_eq!(ctx.action_for(Key::Up), None);
    }
}
