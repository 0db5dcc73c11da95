//! Error types for pitch analysis configuration.
//!
//! The numeric pipeline itself never fails: silence, constant input and
//! degenerate energies are handled by clamping. Only the configurable surface
//! ([`PitchConfig`](crate::PitchConfig), [`PitchAnalyzer`](crate::PitchAnalyzer))
//! reports errors.

use thiserror::Error;

/// Errors reported when a pitch analyzer is configured or fed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum PitchError {
    /// The period range does not fit the analysis buffers or leaves no
    /// room for the coarse search.
    #[error("invalid period range: min {min}, max {max}")]
    BadPeriodRange { min: usize, max: usize },
    /// Frame size is zero, not a multiple of 4, or above capacity.
    #[error("invalid frame size {0}")]
    BadFrameSize(usize),
    /// Only mono and stereo input is supported.
    #[error("unsupported channel count {0}")]
    BadChannelCount(usize),
    /// A frame handed to the analyzer has the wrong number of samples.
    #[error("frame has {actual} samples, expected {expected}")]
    FrameLength { expected: usize, actual: usize },
    /// No preset analysis geometry exists for this sample rate.
    #[error("unsupported sample rate {0} Hz")]
    UnsupportedSampleRate(u32),
}

/// A specialized [`Result`](std::result::Result) type for pitch analysis.
pub type Result<T> = std::result::Result<T, PitchError>;
