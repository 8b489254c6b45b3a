// Sample loader - Decodes WAV and FLAC files into mono f32 buffers

use crate::sampler::SamplerError;
use claxon::FlacReader;
use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Decoded audio, mixed down to mono
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub data: Vec<f32>,
    pub sample_rate: u32,
}

impl Sample {
    pub fn new(name: impl Into<String>, data: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            name: name.into(),
            data,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Load a sample, picking the decoder from the file extension
pub fn load_sample(path: &Path) -> Result<Sample, SamplerError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "wav" => load_wav(path),
        "flac" => load_flac(path),
        _ => Err(SamplerError::UnsupportedFormat(path.display().to_string())),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Average interleaved frames into one channel
fn mix_to_mono(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

fn load_wav(path: &Path) -> Result<Sample, SamplerError> {
    let reader = WavReader::open(path).map_err(|e| SamplerError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().filter_map(Result::ok).collect(),
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(Result::ok)
                .map(|s| s as f32 / scale)
                .collect()
        }
    };

    Ok(Sample::new(
        file_name(path),
        mix_to_mono(interleaved, spec.channels as usize),
        spec.sample_rate,
    ))
}

fn load_flac(path: &Path) -> Result<Sample, SamplerError> {
    let mut reader = FlacReader::open(path).map_err(|e| SamplerError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let info = reader.streaminfo();
    let scale = (1_i64 << (info.bits_per_sample - 1)) as f32;

    let interleaved: Vec<f32> = reader
        .samples()
        .filter_map(Result::ok)
        .map(|s| s as f32 / scale)
        .collect();

    Ok(Sample::new(
        file_name(path),
        mix_to_mono(interleaved, info.channels as usize),
        info.sample_rate,
    ))
}
