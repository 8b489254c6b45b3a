// Module sampler - Sample banks and the voice engine rendering them

pub mod bank;
pub mod engine;
pub mod loader;

pub use bank::{SampleBank, SampleMapping};
pub use engine::{SampleZone, SamplerEngine};
pub use loader::{Sample, load_sample};

/// Sampler error types
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sample bank {path}: {message}")]
    Bank { path: String, message: String },

    #[error("Sample bank '{0}' has no samples")]
    EmptyBank(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
}
