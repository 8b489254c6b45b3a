// Command Pattern for undo/redo of pattern edits
//
// Architecture:
// - EditCommand trait: execute(), undo(), description()
// - EditHistory: undo/redo stacks with a bounded history
// - Concrete commands: InsertEventCommand
//
// Commands run on the editor's control loop and go through the pattern's
// write lock, so playback only ever sees whole edits.

pub mod commands;
pub mod manager;
pub mod trait_def;

pub use commands::InsertEventCommand;
pub use manager::EditHistory;
pub use trait_def::{CommandError, CommandResult, EditCommand};
