// Sequencer module
// Tracker data model (events, tracks, patterns, player) and the playback scheduler

pub mod dispatch;
pub mod event;
pub mod pattern;
pub mod player;
pub mod scheduler;

pub use dispatch::DispatchPool;
pub use event::{Event, GeneratorRef};
pub use pattern::{Line, Pattern, PatternError, SharedPattern, Track};
pub use player::{DEFAULT_BPM, PatternTable, Player, PlayerError};
pub use scheduler::{
    PlaybackControl, PlaybackEvent, PlaybackSummary, Scheduler, SchedulerError, Toggle,
};
