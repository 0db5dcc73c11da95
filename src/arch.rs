//! CPU architecture detection for the correlation kernels.
//!
//! Detection happens once, when a [`PitchAnalyzer`](crate::PitchAnalyzer) is
//! built, via [`select_arch()`]. The result is stored alongside the analyzer
//! state and threaded through every kernel call, so the hot loops never probe
//! the CPU themselves.

/// SIMD level used by the kernel dispatch wrappers.
///
/// Variants are platform-gated: the x86 variant only exists on x86/x86_64.
/// [`Scalar`](Arch::Scalar) is always available and is the bit-exact
/// reference path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// No SIMD, plain sequential accumulation. All platforms.
    #[default]
    Scalar,

    /// x86 SSE (128-bit float SIMD).
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse,
}

impl Arch {
    /// True when the SSE kernels may be used.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[inline]
    pub fn has_sse(self) -> bool {
        matches!(self, Self::Sse)
    }
}

/// Detect the best supported kernel level at runtime.
///
/// When the `simd` feature is disabled, always returns [`Arch::Scalar`].
#[cfg(feature = "simd")]
pub fn select_arch() -> Arch {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        cpufeatures::new!(detect_sse, "sse");
        if detect_sse::get() {
            return Arch::Sse;
        }
    }

    Arch::Scalar
}

/// When `simd` feature is disabled, always returns [`Arch::Scalar`].
#[cfg(not(feature = "simd"))]
pub fn select_arch() -> Arch {
    Arch::Scalar
}
