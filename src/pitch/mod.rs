//! Pitch analysis pipeline: decimation, LPC whitening, hierarchical
//! correlation search and sub-harmonic doubling removal.
//!
//! All functions work on caller-provided slices and stack scratch arrays
//! sized by the capacity constants below; nothing here allocates.

#![allow(clippy::too_many_arguments)]

pub mod doubling;
pub mod downsample;
pub mod lpc;
pub mod search;
#[cfg(feature = "simd")]
pub mod simd;
pub mod xcorr;

/// Largest frame (in full-rate samples) the search accepts.
pub const PITCH_FRAME_SIZE: usize = 960;
/// Shortest period searched by the default 48 kHz geometry.
pub const PITCH_MIN_PERIOD: usize = 60;
/// Longest period (and history length) supported.
pub const PITCH_MAX_PERIOD: usize = 768;
/// History plus current frame, in full-rate samples.
pub const PITCH_BUF_SIZE: usize = PITCH_MAX_PERIOD + PITCH_FRAME_SIZE;

/// Pseudo-interpolation around a correlation peak.
///
/// Returns `1` when the right neighbour `c` is close to the peak `b`, `-1`
/// when the left neighbour `a` is, and `0` otherwise.
#[inline]
pub(crate) fn interp_offset(a: f32, b: f32, c: f32) -> i32 {
    if c - a > 0.7f32 * (b - a) {
        1
    } else if a - c > 0.7f32 * (b - c) {
        -1
    } else {
        0
    }
}
