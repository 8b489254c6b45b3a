// Sample bank - JSON mapping from notes to sample files

use crate::sampler::SamplerError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serializable sample bank configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBank {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub samples: Vec<SampleMapping>,
}

/// Mapping from a root note to a sample file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMapping {
    /// Note the sample plays at its original pitch (0-127)
    pub note: u8,
    /// Path to the sample file, relative to the bank file
    pub sample_path: PathBuf,
    /// Volume multiplier
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_volume() -> f32 {
    1.0
}

impl SampleMapping {
    pub fn new(note: u8, sample_path: impl Into<PathBuf>) -> Self {
        Self {
            note,
            sample_path: sample_path.into(),
            volume: default_volume(),
        }
    }
}

impl SampleBank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            samples: Vec::new(),
        }
    }

    /// Add a mapping, replacing any existing one for the same note
    pub fn add_mapping(&mut self, mapping: SampleMapping) {
        self.samples.retain(|m| m.note != mapping.note);
        self.samples.push(mapping);
    }

    /// Save bank to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SamplerError> {
        let path = path.as_ref();
        let json_str = serde_json::to_string_pretty(self).map_err(|e| SamplerError::Bank {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        std::fs::write(path, json_str).map_err(|e| SamplerError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load bank from JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SamplerError> {
        let path = path.as_ref();
        let json_str = std::fs::read_to_string(path).map_err(|e| SamplerError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&json_str).map_err(|e| SamplerError::Bank {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
