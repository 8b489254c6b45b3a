// Serialization utilities for pattern persistence

use crate::project::manager::PersistenceError;
use crate::project::types::{PATTERN_FORMAT_VERSION, PatternFile};
use crate::sequencer::pattern::Pattern;
use ron::from_str as ron_from_str;
use ron::ser::{PrettyConfig, to_string_pretty};

/// Serialize a pattern to a RON document
pub fn encode_pattern(pattern: &Pattern) -> Result<String, PersistenceError> {
    let file = PatternFile::from_pattern(pattern);
    let config = PrettyConfig::new().depth_limit(3).indentor("  ".to_string());

    to_string_pretty(&file, config)
        .map_err(|e| PersistenceError::Encode(format!("Failed to serialize to RON: {}", e)))
}

/// Deserialize a pattern from a RON document
///
/// The document is validated before the pattern is built.
pub fn decode_pattern(ron_data: &str) -> Result<Pattern, PersistenceError> {
    let file: PatternFile = ron_from_str(ron_data)
        .map_err(|e| PersistenceError::Decode(format!("Failed to deserialize from RON: {}", e)))?;

    validate_pattern_file(&file)?;
    Ok(file.into_pattern())
}

/// Check version and value ranges of a decoded file
pub fn validate_pattern_file(file: &PatternFile) -> Result<(), PersistenceError> {
    if file.version != PATTERN_FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(file.version));
    }

    for (track_index, track) in file.tracks.iter().enumerate() {
        for (step, event) in track.iter().enumerate() {
            if event.note_num > 127 {
                return Err(PersistenceError::InvalidStructure(format!(
                    "Note number {} exceeds MIDI range (0-127) at track {} step {}",
                    event.note_num, track_index, step
                )));
            }

            if event.velocity > 127 {
                return Err(PersistenceError::InvalidStructure(format!(
                    "Velocity {} exceeds MIDI range (0-127) at track {} step {}",
                    event.velocity, track_index, step
                )));
            }
        }
    }

    Ok(())
}
