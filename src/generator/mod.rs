// Generators - Sound producing capabilities bound to events
//
// Events only carry a `GeneratorRef` tag. The rack owns the shared generator
// instances and resolves tags at dispatch time, so one generator can serve
// any number of events across tracks and patterns.

pub mod audio;

use crate::sequencer::event::{Event, GeneratorRef};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use audio::AudioGenerator;

/// A device that can play an event
///
/// `play` is fire-and-forget: it must return promptly and has no way to
/// report failure back to the scheduler.
pub trait Generator: Send + Sync {
    /// Play an event
    fn play(&self, event: &Event);

    /// Human-readable description
    fn describe(&self) -> String;
}

/// Generator that discards every event
///
/// Used for headless runs and tests; it only counts what it was asked to play.
#[derive(Debug, Default)]
pub struct MockGenerator {
    played: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events played so far
    pub fn play_count(&self) -> usize {
        self.played.load(Ordering::SeqCst)
    }
}

impl Generator for MockGenerator {
    fn play(&self, _event: &Event) {
        self.played.fetch_add(1, Ordering::SeqCst);
    }

    fn describe(&self) -> String {
        "Mock generator".to_string()
    }
}

/// Registry of the generators events can be bound to
pub struct GeneratorRack {
    mock: Arc<MockGenerator>,
    audio: Vec<Arc<dyn Generator>>,
}

impl GeneratorRack {
    /// Rack with only the mock generator
    pub fn new() -> Self {
        Self::with_mock(Arc::new(MockGenerator::new()))
    }

    /// Rack sharing an existing mock generator (lets tests observe dispatches)
    pub fn with_mock(mock: Arc<MockGenerator>) -> Self {
        Self {
            mock,
            audio: Vec::new(),
        }
    }

    /// Register an audio generator, returning the reference events should carry
    pub fn register_audio(&mut self, generator: Arc<dyn Generator>) -> GeneratorRef {
        self.audio.push(generator);
        GeneratorRef::Audio((self.audio.len() - 1) as u32)
    }

    pub fn mock(&self) -> &Arc<MockGenerator> {
        &self.mock
    }

    /// Resolve a reference; rests and unknown audio ids resolve to nothing
    pub fn resolve(&self, generator: GeneratorRef) -> Option<Arc<dyn Generator>> {
        match generator {
            GeneratorRef::None => None,
            GeneratorRef::Mock => Some(self.mock.clone() as Arc<dyn Generator>),
            GeneratorRef::Audio(id) => self.audio.get(id as usize).cloned(),
        }
    }

    /// Descriptions of every registered generator, for logging
    pub fn describe(&self) -> Vec<String> {
        std::iter::once(self.mock.describe())
            .chain(self.audio.iter().map(|g| g.describe()))
            .collect()
    }
}

impl Default for GeneratorRack {
    fn default() -> Self {
        Self::new()
    }
}
