// Pattern persistence
// Patterns are stored as RON documents listing each track's events

pub mod manager;
pub mod serialization;
pub mod types;

pub use manager::{
    PersistenceError, demo_pattern, describe_pattern, load_pattern, save_pattern, test_pattern,
};
pub use serialization::{decode_pattern, encode_pattern};
pub use types::{DEFAULT_PATTERN_FILE, PATTERN_FORMAT_VERSION, PatternFile};
