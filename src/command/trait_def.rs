// EditCommand trait definition

use crate::sequencer::pattern::{PatternError, SharedPattern};

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The edit was rejected by the pattern
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// Undo operation failed
    #[error("Undo failed: {0}")]
    UndoFailed(String),
}

/// Trait for pattern edits that support undo/redo
///
/// Commands run on the control loop and mutate a [`SharedPattern`] through
/// its write lock, so they are safe to apply while playback is running.
///
/// # Example
/// ```no_run
/// use steptracker::command::trait_def::{CommandResult, EditCommand};
/// use steptracker::sequencer::{SharedPattern, Track};
///
/// struct ClearTrackCommand {
///     index: usize,
///     previous: Option<Track>,
/// }
///
/// impl EditCommand for ClearTrackCommand {
///     fn execute(&mut self, pattern: &SharedPattern) -> CommandResult<()> {
///         self.previous = Some(pattern.write().replace_track(self.index, Track::new())?);
///         Ok(())
///     }
///
///     fn undo(&mut self, pattern: &SharedPattern) -> CommandResult<()> {
///         if let Some(track) = self.previous.take() {
///             pattern.write().replace_track(self.index, track)?;
///         }
///         Ok(())
///     }
///
///     fn description(&self) -> String {
///         format!("Clear track {}", self.index)
///     }
/// }
/// ```
pub trait EditCommand: Send {
    /// Apply the edit
    ///
    /// Should store whatever is needed to revert it.
    fn execute(&mut self, pattern: &SharedPattern) -> CommandResult<()>;

    /// Revert the edit made by the last `execute`
    fn undo(&mut self, pattern: &SharedPattern) -> CommandResult<()>;

    /// Human-readable description (e.g. "Set track 1 step 4 to 60 100")
    fn description(&self) -> String;
}
