// Messaging between the sequencer and the audio thread

pub mod channels;
pub mod command;

pub use channels::{AudioCommandConsumer, AudioCommandProducer, create_audio_channel};
pub use command::AudioCommand;
