//! SIMD dispatch for the correlation kernels.
//!
//! On x86/x86_64 the `Arch` value selects the SSE paths. Other targets fall
//! through to the scalar kernels. Every path returns the same bits as the
//! scalar reference.

use crate::arch::Arch;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod x86;

/// Inner product.
///
/// A single sequential sum has no lane-parallel form with the scalar
/// rounding order, so every architecture uses the scalar kernel.
#[inline(always)]
pub fn inner_prod(x: &[f32], y: &[f32], n: usize, arch: Arch) -> f32 {
    let _ = arch;
    super::xcorr::inner_prod_scalar(x, y, n)
}

/// SIMD-accelerated 4-way cross-correlation kernel.
/// Dispatches to SSE on x86, with scalar fallback.
#[inline(always)]
pub fn xcorr_kernel(x: &[f32], y: &[f32], sum: &mut [f32; 4], len: usize, arch: Arch) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse() {
        assert!(x.len() >= len && y.len() >= len + 3);
        // SAFETY: SSE support was detected by `select_arch` and the slice
        // lengths were checked above.
        unsafe { x86::xcorr_kernel_sse(x, y, sum, len) };
        return;
    }

    let _ = arch;
    super::xcorr::xcorr_kernel_scalar(x, y, sum, len)
}

/// SIMD-accelerated dual inner product.
/// Dispatches to SSE on x86, with scalar fallback.
#[inline(always)]
pub fn dual_inner_prod(x: &[f32], y01: &[f32], y02: &[f32], n: usize, arch: Arch) -> (f32, f32) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse() {
        assert!(x.len() >= n && y01.len() >= n && y02.len() >= n);
        // SAFETY: as above.
        return unsafe { x86::dual_inner_prod_sse(x, y01, y02, n) };
    }

    let _ = arch;
    super::xcorr::dual_inner_prod_scalar(x, y01, y02, n)
}
