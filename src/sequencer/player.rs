// Player - Tempo plus the ordered table of patterns forming a song

use crate::sequencer::event::GeneratorRef;
use crate::sequencer::pattern::{Pattern, SharedPattern};
use std::time::Duration;

/// Nanoseconds in one minute, the numerator of the step delay
const NANOS_PER_MINUTE: u64 = 60_000_000_000;

/// Default tempo when nothing else is configured
pub const DEFAULT_BPM: u32 = 120;

/// Errors raised while building a player
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("Tempo must be a positive number of beats per minute")]
    ZeroTempo,
}

/// Ordered list of patterns; playback visits them in sequence, once
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: Vec<SharedPattern>,
}

impl PatternTable {
    pub fn new(patterns: Vec<SharedPattern>) -> Self {
        Self { patterns }
    }

    pub fn push(&mut self, pattern: impl Into<SharedPattern>) {
        self.patterns.push(pattern.into());
    }

    pub fn get(&self, index: usize) -> Option<&SharedPattern> {
        self.patterns.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl FromIterator<Pattern> for PatternTable {
    fn from_iter<I: IntoIterator<Item = Pattern>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().map(SharedPattern::new).collect(),
        }
    }
}

/// Tempo and song
#[derive(Debug, Clone)]
pub struct Player {
    bpm: u32,
    table: PatternTable,
}

impl Player {
    /// Create a player
    ///
    /// # Errors
    /// Returns [`PlayerError::ZeroTempo`] if `bpm` is 0.
    pub fn new(bpm: u32, table: PatternTable) -> Result<Self, PlayerError> {
        if bpm == 0 {
            return Err(PlayerError::ZeroTempo);
        }
        Ok(Self { bpm, table })
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Delay between two lines: one beat per line, truncated to whole nanoseconds
    pub fn step_delay(&self) -> Duration {
        Duration::from_nanos(NANOS_PER_MINUTE / self.bpm as u64)
    }

    /// Number of lines across the whole table
    pub fn total_lines(&self) -> usize {
        self.table.iter().map(|p| p.read().line_count()).sum()
    }

    /// Bind every event of every pattern to a generator
    pub fn apply_generator(&self, generator: GeneratorRef) {
        for pattern in self.table.iter() {
            pattern.write().apply_generator(generator);
        }
    }
}
