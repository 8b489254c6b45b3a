// Audio engine - CPAL output stream driven by the sampler
//
// The stream callback owns the sampler and the command consumer: commands
// are drained without blocking at the start of every buffer, then frames
// are rendered in f32 and converted to the device's sample format.
// Supported device formats are F32, I16 and U16.

use crate::audio::AudioError;
use crate::audio::format_conversion::{
    flush_denormals_to_zero, soft_clip, write_mono_to_interleaved_frame,
};
use crate::messaging::{
    AudioCommand, AudioCommandConsumer, AudioCommandProducer, create_audio_channel,
};
use crate::sampler::{SampleBank, SamplerEngine};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use ringbuf::traits::Consumer;
use std::path::Path;

/// Capacity of the command queue feeding the callback
pub const COMMAND_QUEUE_CAPACITY: usize = 1024;

/// Running output stream; dropping it stops audio
pub struct AudioEngine {
    _stream: Stream,
}

impl AudioEngine {
    /// Load a sample bank and start playing through the default output device
    ///
    /// Returns the engine, which must be kept alive, and the producer that
    /// feeds it note commands.
    pub fn start(bank_path: &Path) -> Result<(Self, AudioCommandProducer), AudioError> {
        let bank = SampleBank::load_from_file(bank_path)?;
        let base_dir = bank_path.parent().unwrap_or_else(|| Path::new("."));

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            "audio device selected"
        );

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::Config(e.to_string()))?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let sampler = SamplerEngine::from_bank(&bank, base_dir, sample_rate)?;
        let (producer, consumer) = create_audio_channel(COMMAND_QUEUE_CAPACITY);

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, channels, sampler, consumer),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, channels, sampler, consumer),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, channels, sampler, consumer),
            other => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{:?}. Supported formats: F32, I16, U16",
                    other
                )));
            }
        }?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        tracing::info!(
            bank = %bank.name,
            sample_rate,
            channels,
            "audio engine started"
        );

        Ok((
            Self { _stream: stream },
            producer,
        ))
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    channels: usize,
    mut sampler: SamplerEngine,
    mut commands: AudioCommandConsumer,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations, no I/O, no blocking locks in here
                render_block(&mut sampler, &mut commands, data, channels);
            },
            |err| tracing::error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

/// Apply pending commands, then fill one interleaved buffer
pub fn render_block<T>(
    sampler: &mut SamplerEngine,
    commands: &mut AudioCommandConsumer,
    data: &mut [T],
    channels: usize,
) where
    T: Sample + FromSample<f32>,
{
    while let Some(command) = commands.try_pop() {
        match command {
            AudioCommand::NoteOn { note, velocity } => sampler.note_on(note, velocity),
            AudioCommand::AllNotesOff => sampler.all_notes_off(),
        }
    }

    for frame in data.chunks_mut(channels.max(1)) {
        let sample = soft_clip(flush_denormals_to_zero(sampler.next_sample()));
        write_mono_to_interleaved_frame(sample, frame);
    }
}
