// EditHistory - Manages undo/redo stacks for pattern edits

use crate::command::trait_def::{CommandError, CommandResult, EditCommand};
use crate::sequencer::pattern::SharedPattern;
use std::collections::VecDeque;

/// Default maximum number of commands to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Undo/redo history of pattern edits
///
/// - Undo stack: commands that have been executed and can be undone
/// - Redo stack: commands that have been undone and can be redone
///
/// Executing a new command clears the redo stack. The undo stack is capped;
/// the oldest command is forgotten when the cap is reached.
pub struct EditHistory {
    /// Most recent at the back
    undo_stack: VecDeque<Box<dyn EditCommand>>,
    /// Most recent at the back
    redo_stack: VecDeque<Box<dyn EditCommand>>,
    max_history: usize,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create a history with a custom limit
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::new(),
            max_history,
        }
    }

    /// Execute a command and record it
    ///
    /// # Errors
    /// Returns the command's error; a failed command is not recorded.
    pub fn execute(
        &mut self,
        mut command: Box<dyn EditCommand>,
        pattern: &SharedPattern,
    ) -> CommandResult<()> {
        command.execute(pattern)?;

        self.undo_stack.push_back(command);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }

        Ok(())
    }

    /// Undo the last command, returning its description
    pub fn undo(&mut self, pattern: &SharedPattern) -> CommandResult<String> {
        let mut command = self.undo_stack.pop_back().ok_or(CommandError::NothingToUndo)?;
        let description = command.description();

        command.undo(pattern)?;
        self.redo_stack.push_back(command);

        Ok(description)
    }

    /// Redo the last undone command, returning its description
    pub fn redo(&mut self, pattern: &SharedPattern) -> CommandResult<String> {
        let mut command = self.redo_stack.pop_back().ok_or(CommandError::NothingToRedo)?;
        let description = command.description();

        command.execute(pattern)?;
        self.undo_stack.push_back(command);

        Ok(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|cmd| cmd.description())
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}
