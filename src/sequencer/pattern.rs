// Pattern - A fixed set of tracks played concurrently
// Tracks are the columns of the grid, lines are the rows derived on demand

use crate::sequencer::event::{Event, GeneratorRef};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Errors raised by pattern edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Track index {index} out of range (pattern has {len} tracks)")]
    TrackOutOfRange { index: usize, len: usize },
}

/// One instrument lane: a time-ordered sequence of events
///
/// Index 0 is the earliest step. A track only grows through edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<Event>,
}

impl Track {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a track from a list of events
    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Create a track with one event per note, all sharing a velocity and generator
    pub fn from_notes(generator: GeneratorRef, velocity: u8, notes: &[u8]) -> Self {
        Self {
            events: notes
                .iter()
                .map(|&note| Event::new(note, velocity, generator))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&Event> {
        self.events.get(step)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// First generator bound anywhere in the track
    ///
    /// New events typed into the grid are bound to it so they sound like
    /// the rest of the lane.
    pub fn default_generator(&self) -> GeneratorRef {
        self.events
            .iter()
            .map(|e| e.generator)
            .find(GeneratorRef::is_bound)
            .unwrap_or_default()
    }

    /// Bind every slot of the track to a generator
    pub fn apply_generator(&mut self, generator: GeneratorRef) {
        for event in &mut self.events {
            event.generator = generator;
        }
    }

    /// Write an event at a step
    ///
    /// - Existing step: note and velocity are overwritten, the generator binding is kept
    /// - Step == length: the event is appended
    /// - Step > length: the gap is padded with rests, then the event is appended
    pub fn insert_at(&mut self, step: usize, event: Event) {
        if let Some(slot) = self.events.get_mut(step) {
            slot.note_num = event.note_num;
            slot.velocity = event.velocity;
            return;
        }

        if step > self.events.len() {
            self.events.resize(step, Event::rest());
        }
        self.events.push(event);
    }
}

/// A row of the grid: one event per track at the same step
pub type Line = Vec<Event>;

/// A fixed set of tracks played concurrently
///
/// The number of tracks is fixed at construction; tracks may have
/// different lengths. Lines are derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    tracks: Vec<Track>,
}

impl Pattern {
    /// Create a pattern from its tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Create a pattern with `count` empty tracks
    pub fn with_tracks(count: usize) -> Self {
        Self {
            tracks: vec![Track::new(); count],
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Length of the longest track (0 for a pattern without tracks)
    pub fn max_track_len(&self) -> usize {
        self.tracks.iter().map(Track::len).max().unwrap_or(0)
    }

    /// Number of lines, equal to the longest track
    pub fn line_count(&self) -> usize {
        self.max_track_len()
    }

    /// The line at a step
    ///
    /// Tracks shorter than `offset` contribute a rest.
    pub fn line(&self, offset: usize) -> Line {
        self.tracks
            .iter()
            .map(|track| track.get(offset).copied().unwrap_or_default())
            .collect()
    }

    /// All lines of the pattern, in step order
    pub fn lines(&self) -> Vec<Line> {
        (0..self.line_count()).map(|i| self.line(i)).collect()
    }

    /// Count of events that will be dispatched when the pattern plays
    pub fn playable_event_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|t| t.events())
            .filter(|e| !e.is_rest())
            .count()
    }

    /// Write an event into a track (see [`Track::insert_at`])
    pub fn insert_at(
        &mut self,
        track: usize,
        step: usize,
        event: Event,
    ) -> Result<(), PatternError> {
        let len = self.tracks.len();
        let target = self
            .tracks
            .get_mut(track)
            .ok_or(PatternError::TrackOutOfRange { index: track, len })?;
        target.insert_at(step, event);
        Ok(())
    }

    /// Replace a whole track, returning the previous one
    pub fn replace_track(&mut self, index: usize, track: Track) -> Result<Track, PatternError> {
        let len = self.tracks.len();
        let slot = self
            .tracks
            .get_mut(index)
            .ok_or(PatternError::TrackOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, track))
    }

    /// Bind every event of every track to a generator
    pub fn apply_generator(&mut self, generator: GeneratorRef) {
        for track in &mut self.tracks {
            track.apply_generator(generator);
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.lines().iter().enumerate() {
            write!(f, "{:4}", row)?;
            for event in line {
                write!(f, " | {:3} {:3}", event.note_num, event.velocity)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A pattern shared between the editor and the playback traversal
///
/// Structural edits take the write lock; the scheduler copies each line out
/// under a read lock, so a dispatch can never observe a half-applied edit.
#[derive(Debug, Clone, Default)]
pub struct SharedPattern {
    inner: Arc<RwLock<Pattern>>,
}

impl SharedPattern {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pattern)),
        }
    }

    // Pattern data stays consistent even if a holder panicked, so poisoning is ignored
    pub fn read(&self) -> RwLockReadGuard<'_, Pattern> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Pattern> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locked [`Pattern::insert_at`]
    pub fn insert_at(&self, track: usize, step: usize, event: Event) -> Result<(), PatternError> {
        self.write().insert_at(track, step, event)
    }

    /// Copy of the current pattern
    pub fn snapshot(&self) -> Pattern {
        self.read().clone()
    }

    pub fn ptr_eq(&self, other: &SharedPattern) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Pattern> for SharedPattern {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}
