// Steptracker - Library exports for the binary, tests and benchmarks

pub mod audio;
pub mod command;
pub mod config;
pub mod editor;
pub mod generator;
pub mod messaging;
pub mod project;
pub mod sampler;
pub mod sequencer;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::AudioEngine;
pub use command::{EditCommand, EditHistory, InsertEventCommand};
pub use config::TrackerConfig;
pub use editor::{GridEditor, Session};
pub use generator::{AudioGenerator, Generator, GeneratorRack, MockGenerator};
pub use project::{PersistenceError, load_pattern, save_pattern};
pub use sequencer::{
    DispatchPool, Event, GeneratorRef, Pattern, PatternTable, Player, Scheduler, SharedPattern,
    Track,
};
