// Concrete command implementations

use crate::command::trait_def::{CommandError, CommandResult, EditCommand};
use crate::sequencer::event::Event;
use crate::sequencer::pattern::{SharedPattern, Track};

/// Command writing one event into a pattern cell
///
/// The whole target track is snapshotted before the write, so undo also
/// removes any rests that were padded in to reach the step.
pub struct InsertEventCommand {
    track: usize,
    step: usize,
    event: Event,
    previous: Option<Track>,
}

impl InsertEventCommand {
    pub fn new(track: usize, step: usize, event: Event) -> Self {
        Self {
            track,
            step,
            event,
            previous: None,
        }
    }
}

impl EditCommand for InsertEventCommand {
    fn execute(&mut self, pattern: &SharedPattern) -> CommandResult<()> {
        let mut pattern = pattern.write();
        let previous = pattern.track(self.track).cloned();

        pattern.insert_at(self.track, self.step, self.event)?;
        self.previous = previous;
        Ok(())
    }

    fn undo(&mut self, pattern: &SharedPattern) -> CommandResult<()> {
        let previous = self
            .previous
            .take()
            .ok_or_else(|| CommandError::UndoFailed("No previous track stored".into()))?;

        pattern.write().replace_track(self.track, previous)?;
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Set track {} step {} to {}",
            self.track, self.step, self.event
        )
    }
}
