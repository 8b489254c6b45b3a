// Commands sent from the playback side to the audio thread

/// Messages consumed by the audio callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    /// Start a note; velocity is already normalized to [0, 1]
    NoteOn { note: u8, velocity: f32 },
    /// Silence every voice
    AllNotesOff,
}
