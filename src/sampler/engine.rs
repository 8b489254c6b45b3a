// Sampler engine - Fixed voice pool playing pitch-shifted samples

use crate::sampler::bank::SampleBank;
use crate::sampler::loader::{Sample, load_sample};
use crate::sampler::SamplerError;
use std::path::Path;
use std::sync::Arc;

/// Number of voices that can sound at once
pub const MAX_VOICES: usize = 16;

/// A loaded sample with the note it plays at original pitch
#[derive(Debug, Clone)]
pub struct SampleZone {
    pub root_note: u8,
    pub volume: f32,
    pub sample: Arc<Sample>,
}

#[derive(Debug, Clone)]
struct SamplerVoice {
    sample: Arc<Sample>,
    position: f64,
    pitch_step: f64,
    gain: f32,
    age: u64,
    active: bool,
}

impl SamplerVoice {
    fn next_sample(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }

        let data = &self.sample.data;
        let pos_integer = self.position as usize;
        if pos_integer >= data.len() {
            self.active = false;
            return 0.0;
        }

        let pos_fractional = self.position.fract() as f32;
        let sample1 = data[pos_integer];
        let sample2 = data.get(pos_integer + 1).copied().unwrap_or(0.0);
        let value = sample1 + (sample2 - sample1) * pos_fractional;

        self.position += self.pitch_step;
        value * self.gain
    }
}

/// Plays notes by resampling the nearest mapped sample
pub struct SamplerEngine {
    zones: Vec<SampleZone>,
    voices: Vec<SamplerVoice>,
    output_rate: f32,
    age: u64,
}

impl SamplerEngine {
    pub fn new(zones: Vec<SampleZone>, output_rate: f32) -> Self {
        Self {
            zones,
            voices: Vec::with_capacity(MAX_VOICES),
            output_rate,
            age: 0,
        }
    }

    /// Load every sample of a bank; paths are relative to `base_dir`
    pub fn from_bank(
        bank: &SampleBank,
        base_dir: &Path,
        output_rate: f32,
    ) -> Result<Self, SamplerError> {
        if bank.samples.is_empty() {
            return Err(SamplerError::EmptyBank(bank.name.clone()));
        }

        let zones = bank
            .samples
            .iter()
            .map(|mapping| {
                let sample = load_sample(&base_dir.join(&mapping.sample_path))?;
                tracing::debug!(note = mapping.note, sample = %sample.name, "sample loaded");
                Ok(SampleZone {
                    root_note: mapping.note,
                    volume: mapping.volume,
                    sample: Arc::new(sample),
                })
            })
            .collect::<Result<Vec<_>, SamplerError>>()?;

        Ok(Self::new(zones, output_rate))
    }

    /// Zone playing a note: nearest root at or below it, else the lowest root
    fn zone_for(&self, note: u8) -> Option<&SampleZone> {
        self.zones
            .iter()
            .filter(|z| z.root_note <= note)
            .max_by_key(|z| z.root_note)
            .or_else(|| self.zones.iter().min_by_key(|z| z.root_note))
    }

    /// Start a note at a normalized velocity
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let Some(zone) = self.zone_for(note).cloned() else {
            return;
        };

        let semitones = note as f64 - zone.root_note as f64;
        let rate_ratio = zone.sample.sample_rate as f64 / self.output_rate as f64;
        self.age += 1;

        let voice = SamplerVoice {
            sample: zone.sample,
            position: 0.0,
            pitch_step: 2.0_f64.powf(semitones / 12.0) * rate_ratio,
            gain: velocity.clamp(0.0, 1.0) * zone.volume,
            age: self.age,
            active: true,
        };

        // Reuse a finished voice, or steal the oldest one
        if let Some(slot) = self.voices.iter_mut().find(|v| !v.active) {
            *slot = voice;
        } else if self.voices.len() < MAX_VOICES {
            self.voices.push(voice);
        } else if let Some(oldest) = self.voices.iter_mut().min_by_key(|v| v.age) {
            *oldest = voice;
        }
    }

    /// Silence every voice
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.active = false;
        }
    }

    /// Mix all active voices into one output sample
    pub fn next_sample(&mut self) -> f32 {
        self.voices.iter_mut().map(SamplerVoice::next_sample).sum()
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }
}
