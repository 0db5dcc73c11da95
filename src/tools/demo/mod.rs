//! Frame-by-frame pitch tracking of raw PCM, in library form.
//!
//! Input is a raw 16-bit signed little-endian PCM stream, mono or
//! interleaved stereo. Use it with `ffmpeg` as
//! `-f s16le -ar <sample_rate> -ac <channels>`.

mod input;

pub use input::{Channels, DemoArgs, SampleRate};

use crate::{PitchAnalyzer, PitchConfig, PitchEstimate, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::debug;

/// Runs a [`PitchAnalyzer`] over a PCM stream, one estimate per frame.
///
/// A trailing odd byte is ignored and the last frame is padded with zeros.
pub fn pitch_demo_analyze(
    data: &[u8],
    DemoArgs {
        sample_rate,
        channels,
    }: DemoArgs,
) -> Result<Vec<PitchEstimate>> {
    let config = PitchConfig::for_sample_rate(sample_rate.into())?;
    let channels: usize = channels.into();
    let frame_size = config.frame_size;

    let mut samples = Vec::with_capacity(data.len() / 2);
    let mut cursor = Cursor::new(data);
    while let Ok(s) = cursor.read_i16::<LittleEndian>() {
        samples.push(s as f32);
    }

    // pad samples with 0s to make it a multiple of frame_size
    let frame_samples = frame_size * channels;
    let pad = (frame_samples - (samples.len() % frame_samples)) % frame_samples;
    samples.resize(samples.len() + pad, 0.0);
    debug!(
        "analyzing {} frames of {} samples",
        samples.len() / frame_samples,
        frame_size
    );

    let mut analyzer = PitchAnalyzer::new(config)?;
    let mut left = vec![0.0f32; frame_size];
    let mut right = vec![0.0f32; frame_size];
    let mut output = Vec::with_capacity(samples.len() / frame_samples);
    for frame in samples.chunks_exact(frame_samples) {
        let estimate = if channels == 2 {
            for (i, pair) in frame.chunks_exact(2).enumerate() {
                left[i] = pair[0];
                right[i] = pair[1];
            }
            analyzer.analyze_channels(&[&left, &right])?
        } else {
            analyzer.analyze(frame)?
        };
        output.push(estimate);
    }
    Ok(output)
}
