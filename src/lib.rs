//! Pitch period estimation for speech denoising front-ends.
//!
//! The pipeline decimates and whitens the input, searches for the best lag
//! coarse-to-fine, then corrects period doubling against the previous frame.
//! [`PitchAnalyzer`] drives it frame by frame; the individual stages live in
//! [`pitch`].

mod analyzer;
pub mod arch;
mod error;
pub mod pitch;

#[cfg(feature = "tools")]
pub mod tools;

pub use crate::analyzer::{PitchAnalyzer, PitchConfig, PitchEstimate, PitchState};
pub use crate::arch::{select_arch, Arch};
pub use crate::error::{PitchError, Result};

pub use crate::pitch::doubling::remove_doubling;
pub use crate::pitch::downsample::pitch_downsample;
pub use crate::pitch::lpc::{autocorr, lpc};
pub use crate::pitch::search::pitch_search;
pub use crate::pitch::{PITCH_BUF_SIZE, PITCH_FRAME_SIZE, PITCH_MAX_PERIOD, PITCH_MIN_PERIOD};

// =====
// Internal re-exports for benchmarks and integration tests
// =====
pub mod internals {
    // Dispatch wrappers (use SIMD when available):
    pub use crate::pitch::xcorr::{dual_inner_prod, inner_prod, pitch_xcorr, xcorr_kernel};
    // Scalar implementations (for A/B comparison):
    pub use crate::pitch::xcorr::{
        dual_inner_prod_scalar, inner_prod_scalar, pitch_xcorr_scalar, xcorr_kernel_scalar,
    };

    pub use crate::pitch::downsample::fir5;
    pub use crate::pitch::search::{find_best_pitch, SlidingEnergy};
}
