// Format conversion for CPAL audio streams
//
// Rendering happens in f32; samples are converted to the device format
// (f32, i16 or u16) when written to the output buffer. All helpers are
// allocation-free and safe to call from the audio callback.

use cpal::{FromSample, Sample};

/// Flush tiny values to zero to avoid denormal slowdowns
#[inline]
pub fn flush_denormals_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Soft clipping with tanh, keeps the mix inside [-1, 1]
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}

/// Write one mono f32 sample to every channel of an interleaved frame
#[inline]
pub fn write_mono_to_interleaved_frame<T>(internal_sample: f32, output_frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for channel_sample in output_frame.iter_mut() {
        *channel_sample = T::from_sample(internal_sample);
    }
}
