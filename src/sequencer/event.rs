// Event representation for the tracker grid
// An event is one cell of a track: note number, velocity and the generator it is bound to

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the generator an event is played on
///
/// Generators are shared between many events, so events only store a tag
/// (and an index for audio generators). The [`GeneratorRack`](crate::generator::GeneratorRack)
/// resolves the tag to the actual generator at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeneratorRef {
    /// Unbound slot: the event is a rest
    #[default]
    #[serde(rename = "Unbound")]
    None,
    /// Silent generator used for headless runs and tests
    Mock,
    /// Audio-backed generator registered in the rack under this id
    Audio(u32),
}

impl GeneratorRef {
    pub fn is_bound(&self) -> bool {
        !matches!(self, GeneratorRef::None)
    }
}

impl fmt::Display for GeneratorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorRef::None => write!(f, "none"),
            GeneratorRef::Mock => write!(f, "mock"),
            GeneratorRef::Audio(id) => write!(f, "audio#{}", id),
        }
    }
}

/// A single step of a track
///
/// A zero-valued event without a generator is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    /// MIDI-style note number (conventionally 0-127)
    pub note_num: u8,

    /// Velocity (conventionally 0-127)
    pub velocity: u8,

    /// Generator this event is dispatched to
    #[serde(default)]
    pub generator: GeneratorRef,
}

impl Event {
    /// Create a new event bound to a generator
    pub fn new(note_num: u8, velocity: u8, generator: GeneratorRef) -> Self {
        Self {
            note_num,
            velocity,
            generator,
        }
    }

    /// The rest event used to pad tracks and lines
    pub fn rest() -> Self {
        Self::default()
    }

    /// An event with no generator never sounds
    pub fn is_rest(&self) -> bool {
        !self.generator.is_bound()
    }

    /// Velocity mapped to [0, 1]
    pub fn normalized_velocity(&self) -> f32 {
        (self.velocity as f32 / 127.0).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.note_num, self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_is_zero_and_unbound() {
        let rest = Event::rest();
        assert_eq!(rest.note_num, 0);
        assert_eq!(rest.velocity, 0);
        assert_eq!(rest.generator, GeneratorRef::None);
        assert!(rest.is_rest());
    }

    #[test]
    fn test_bound_event_is_not_rest() {
        // Even a zero note is playable once bound
        let event = Event::new(0, 0, GeneratorRef::Mock);
        assert!(!event.is_rest());
    }

    #[test]
    fn test_normalized_velocity() {
        assert_eq!(Event::new(60, 127, GeneratorRef::Mock).normalized_velocity(), 1.0);
        assert_eq!(Event::new(60, 0, GeneratorRef::Mock).normalized_velocity(), 0.0);
        // Out of convention values are clamped
        assert_eq!(Event::new(60, 255, GeneratorRef::Mock).normalized_velocity(), 1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Event::new(64, 100, GeneratorRef::Audio(2)).to_string(), "64 100");
        assert_eq!(GeneratorRef::Audio(2).to_string(), "audio#2");
    }
}
