// Audio-backed generator - forwards notes to the audio engine

use crate::generator::Generator;
use crate::messaging::{AudioCommand, AudioCommandProducer};
use crate::sequencer::event::Event;
use ringbuf::traits::Producer;
use std::sync::{Arc, Mutex, PoisonError};

/// Generator that sends note-on commands to the audio thread
///
/// Sending never blocks: if the command queue is full the note is dropped
/// and logged. Rendering failures are not reported back.
pub struct AudioGenerator {
    name: String,
    sender: Arc<Mutex<AudioCommandProducer>>,
}

impl AudioGenerator {
    pub fn new(name: impl Into<String>, sender: Arc<Mutex<AudioCommandProducer>>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }

    /// Ask the audio thread to cut every sounding voice
    pub fn silence(&self) -> bool {
        self.send(AudioCommand::AllNotesOff)
    }

    fn send(&self, command: AudioCommand) -> bool {
        // A panicking holder leaves the producer usable
        let mut tx = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        tx.try_push(command).is_ok()
    }
}

impl Generator for AudioGenerator {
    fn play(&self, event: &Event) {
        let command = AudioCommand::NoteOn {
            note: event.note_num,
            velocity: event.normalized_velocity(),
        };

        if !self.send(command) {
            tracing::warn!(
                generator = %self.name,
                note = event.note_num,
                "audio command queue full, note dropped"
            );
        }
    }

    fn describe(&self) -> String {
        format!("Audio generator ({})", self.name)
    }
}
