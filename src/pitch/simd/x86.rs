//! x86/x86_64 SSE implementations of the correlation kernels.
//!
//! All functions require `#[target_feature]` and are called only after
//! `cpufeatures` detection in [`select_arch`](crate::arch::select_arch).
//!
//! Lanes run across lags (or across the two products of a dual inner
//! product), never across samples. Each lane therefore sees the same
//! sequence of multiply-then-add roundings as the scalar kernels and the
//! results are bit-identical.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

/// SSE 4-way cross-correlation kernel: `sum[k] += x[..len] . y[k..k + len]`.
///
/// # Safety
/// Requires SSE support; `x` must hold at least `len` elements and `y` at
/// least `len + 3`.
#[target_feature(enable = "sse")]
pub unsafe fn xcorr_kernel_sse(x: &[f32], y: &[f32], sum: &mut [f32; 4], len: usize) {
    debug_assert!(x.len() >= len);
    debug_assert!(y.len() >= len + 3);

    let mut acc = _mm_loadu_ps(sum.as_ptr());
    for j in 0..len {
        let xv = _mm_set1_ps(*x.get_unchecked(j));
        let yv = _mm_loadu_ps(y.as_ptr().add(j));
        acc = _mm_add_ps(acc, _mm_mul_ps(xv, yv));
    }
    _mm_storeu_ps(sum.as_mut_ptr(), acc);
}

/// SSE dual inner product: `(x . y01, x . y02)`, one product per lane.
///
/// # Safety
/// Requires SSE support; all slices must hold at least `n` elements.
#[target_feature(enable = "sse")]
pub unsafe fn dual_inner_prod_sse(x: &[f32], y01: &[f32], y02: &[f32], n: usize) -> (f32, f32) {
    debug_assert!(x.len() >= n);
    debug_assert!(y01.len() >= n);
    debug_assert!(y02.len() >= n);

    let mut acc = _mm_setzero_ps();
    for i in 0..n {
        let xv = _mm_set1_ps(*x.get_unchecked(i));
        let yv = _mm_set_ps(0.0, 0.0, *y02.get_unchecked(i), *y01.get_unchecked(i));
        acc = _mm_add_ps(acc, _mm_mul_ps(xv, yv));
    }
    let mut out = [0.0f32; 4];
    _mm_storeu_ps(out.as_mut_ptr(), acc);
    (out[0], out[1])
}
