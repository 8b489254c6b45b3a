// Editor error types

use crate::command::CommandError;
use crate::sequencer::pattern::PatternError;
use std::io;

/// Errors raised while editing cells
///
/// None of these end the session: they are shown on the status line and
/// the editor stays where it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Malformed cell input
    #[error("{0}")]
    Validation(String),

    /// Edit targeted a track that does not exist
    #[error(transparent)]
    Index(#[from] PatternError),

    /// Undo/redo could not be applied
    #[error(transparent)]
    History(CommandError),
}

impl From<CommandError> for EditError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Pattern(e) => EditError::Index(e),
            other => EditError::History(other),
        }
    }
}

/// Errors that end an interactive session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to draw the grid: {0}")]
    Render(#[from] io::Error),

    #[error("Failed to spawn input thread: {0}")]
    InputThread(#[source] io::Error),
}
