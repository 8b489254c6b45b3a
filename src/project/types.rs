// Serializable pattern file types

use crate::sequencer::event::Event;
use crate::sequencer::pattern::{Pattern, Track};
use serde::{Deserialize, Serialize};

/// Current pattern file format version
pub const PATTERN_FORMAT_VERSION: u32 = 1;

/// Default file name used by the encode/decode tools
pub const DEFAULT_PATTERN_FILE: &str = "testpattern.trkr";

/// On-disk form of a pattern: its tracks, each an ordered list of events
///
/// Generators are stored by variant tag only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFile {
    pub version: u32,
    pub tracks: Vec<Vec<Event>>,
}

impl PatternFile {
    pub fn from_pattern(pattern: &Pattern) -> Self {
        Self {
            version: PATTERN_FORMAT_VERSION,
            tracks: pattern
                .tracks()
                .iter()
                .map(|track| track.events().to_vec())
                .collect(),
        }
    }

    pub fn into_pattern(self) -> Pattern {
        Pattern::new(self.tracks.into_iter().map(Track::from_events).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::event::GeneratorRef;

    #[test]
    fn test_conversion_keeps_track_lengths() {
        let pattern = Pattern::new(vec![
            Track::from_notes(GeneratorRef::Mock, 1, &[1, 2, 3]),
            Track::new(),
            Track::from_events(vec![Event::rest(), Event::new(5, 6, GeneratorRef::Audio(2))]),
        ]);

        let file = PatternFile::from_pattern(&pattern);
        assert_eq!(file.version, PATTERN_FORMAT_VERSION);
        assert_eq!(file.tracks.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 0, 2]);
        assert_eq!(file.into_pattern(), pattern);
    }
}
