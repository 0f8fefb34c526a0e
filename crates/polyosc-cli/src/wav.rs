//! WAV output.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Write planar channels as an interleaved 32-bit float WAV.
///
/// Channels must hold the same number of frames; extra frames in longer
/// channels are dropped.
pub fn write_wav(path: &Path, channels: &[Vec<f32>], sample_rate: u32) -> hound::Result<()> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for frame in 0..frames {
        for channel in channels {
            writer.write_sample(channel[frame])?;
        }
    }

    writer.finalize()
}
