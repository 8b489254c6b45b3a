// Pattern file manager - Saving, loading and describing pattern files

use crate::project::serialization::{decode_pattern, encode_pattern};
use crate::sequencer::event::GeneratorRef;
use crate::sequencer::pattern::{Pattern, Track};
use std::fmt::Write as _;
use std::path::Path;

/// Pattern persistence errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Unsupported pattern format version {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid pattern structure: {0}")]
    InvalidStructure(String),
}

impl PersistenceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Write a pattern to a file, creating parent directories as needed
pub fn save_pattern<P: AsRef<Path>>(path: P, pattern: &Pattern) -> Result<(), PersistenceError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }

    let ron = encode_pattern(pattern)?;
    std::fs::write(path, ron).map_err(|e| PersistenceError::io(path, e))?;

    tracing::info!(
        path = %path.display(),
        tracks = pattern.track_count(),
        "pattern saved"
    );
    Ok(())
}

/// Read a pattern from a file
pub fn load_pattern<P: AsRef<Path>>(path: P) -> Result<Pattern, PersistenceError> {
    let path = path.as_ref();
    let ron = std::fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    let pattern = decode_pattern(&ron)?;

    tracing::info!(
        path = %path.display(),
        tracks = pattern.track_count(),
        lines = pattern.line_count(),
        "pattern loaded"
    );
    Ok(pattern)
}

/// Fixed three-track pattern written by `gen-test-pattern`
///
/// Track lengths are 8, 3 and 1; every event is at full velocity on the
/// mock generator.
pub fn test_pattern() -> Pattern {
    Pattern::new(vec![
        Track::from_notes(GeneratorRef::Mock, 127, &[1, 4, 4, 1, 2, 4, 4, 1]),
        Track::from_notes(GeneratorRef::Mock, 127, &[0, 2, 3]),
        Track::from_notes(GeneratorRef::Mock, 127, &[127]),
    ])
}

/// Three chords of three notes, played by `demo`
pub fn demo_pattern() -> Pattern {
    Pattern::new(vec![
        Track::from_notes(GeneratorRef::Mock, 127, &[64, 60, 67]),
        Track::from_notes(GeneratorRef::Mock, 127, &[52, 48, 55]),
        Track::from_notes(GeneratorRef::Mock, 127, &[40, 36, 42]),
    ])
}

/// Human-readable dump of a pattern, track by track
pub fn describe_pattern(pattern: &Pattern) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Pattern: {} tracks, {} lines",
        pattern.track_count(),
        pattern.line_count()
    );

    for (index, track) in pattern.tracks().iter().enumerate() {
        let _ = writeln!(out, "Track {} ({} events):", index, track.len());
        for (step, event) in track.events().iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:3}: note {:3}  velocity {:3}  generator {}",
                step, event.note_num, event.velocity, event.generator
            );
        }
    }

    out
}
