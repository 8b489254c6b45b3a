// Module audio - Output stream rendering generator notes

pub mod engine;
pub mod format_conversion;

pub use engine::AudioEngine;

use crate::sampler::SamplerError;

/// Audio startup errors; all of them are fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Audio configuration error: {0}")]
    Config(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Sampler(#[from] SamplerError),
}
