//! Correlation kernels shared by every pitch stage.
//!
//! The batched forms ([`xcorr_kernel_scalar`], [`dual_inner_prod_scalar`])
//! reuse loaded samples across lags but keep the per-lag accumulation order
//! of a plain dot product, so their results are bit-identical to calling
//! [`inner_prod_scalar`] once per lag.

use crate::arch::Arch;

// -- Dispatch wrappers --
// With the `simd` feature these route through `pitch::simd`; otherwise they
// call the scalar implementations directly.

/// Dispatch wrapper for `inner_prod`.
#[cfg(feature = "simd")]
#[inline]
pub fn inner_prod(x: &[f32], y: &[f32], n: usize, arch: Arch) -> f32 {
    super::simd::inner_prod(x, y, n, arch)
}

/// Dispatch wrapper for `inner_prod` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn inner_prod(x: &[f32], y: &[f32], n: usize, _arch: Arch) -> f32 {
    inner_prod_scalar(x, y, n)
}

/// Dispatch wrapper for `xcorr_kernel`.
#[cfg(feature = "simd")]
#[inline]
pub fn xcorr_kernel(x: &[f32], y: &[f32], sum: &mut [f32; 4], len: usize, arch: Arch) {
    super::simd::xcorr_kernel(x, y, sum, len, arch)
}

/// Dispatch wrapper for `xcorr_kernel` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn xcorr_kernel(x: &[f32], y: &[f32], sum: &mut [f32; 4], len: usize, _arch: Arch) {
    xcorr_kernel_scalar(x, y, sum, len)
}

/// Dispatch wrapper for `dual_inner_prod`.
#[cfg(feature = "simd")]
#[inline]
pub fn dual_inner_prod(x: &[f32], y01: &[f32], y02: &[f32], n: usize, arch: Arch) -> (f32, f32) {
    super::simd::dual_inner_prod(x, y01, y02, n, arch)
}

/// Dispatch wrapper for `dual_inner_prod` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn dual_inner_prod(x: &[f32], y01: &[f32], y02: &[f32], n: usize, _arch: Arch) -> (f32, f32) {
    dual_inner_prod_scalar(x, y01, y02, n)
}

/// Inner product of the first `n` samples of `x` and `y`.
#[inline]
pub fn inner_prod_scalar(x: &[f32], y: &[f32], n: usize) -> f32 {
    let mut xy: f32 = 0.0;
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        xy += a * b;
    }
    xy
}

/// Two inner products in one pass: `(x . y01, x . y02)`.
/// All slices must have at least `n` elements.
#[inline]
pub fn dual_inner_prod_scalar(x: &[f32], y01: &[f32], y02: &[f32], n: usize) -> (f32, f32) {
    let mut xy01: f32 = 0.0;
    let mut xy02: f32 = 0.0;
    for ((xi, a), b) in x[..n].iter().zip(&y01[..n]).zip(&y02[..n]) {
        xy01 += xi * a;
        xy02 += xi * b;
    }
    (xy01, xy02)
}

/// 4-way cross-correlation kernel.
///
/// Accumulates `sum[k] += x[..len] . y[k..k + len]` for `k = 0..4`.
/// `y` must have at least `len + 3` elements; `len == 0` leaves `sum`
/// untouched.
#[inline]
pub fn xcorr_kernel_scalar(x: &[f32], y: &[f32], sum: &mut [f32; 4], len: usize) {
    assert!(x.len() >= len);
    assert!(y.len() >= len + 3);
    let mut y_0 = y[0];
    let mut y_1 = y[1];
    let mut y_2 = y[2];
    let mut y_3: f32 = 0.0;
    let mut yi = 3usize;
    let mut j = 0usize;
    while j + 3 < len {
        let tmp = x[j];
        y_3 = y[yi];
        sum[0] += tmp * y_0;
        sum[1] += tmp * y_1;
        sum[2] += tmp * y_2;
        sum[3] += tmp * y_3;

        let tmp = x[j + 1];
        y_0 = y[yi + 1];
        sum[0] += tmp * y_1;
        sum[1] += tmp * y_2;
        sum[2] += tmp * y_3;
        sum[3] += tmp * y_0;

        let tmp = x[j + 2];
        y_1 = y[yi + 2];
        sum[0] += tmp * y_2;
        sum[1] += tmp * y_3;
        sum[2] += tmp * y_0;
        sum[3] += tmp * y_1;

        let tmp = x[j + 3];
        y_2 = y[yi + 3];
        sum[0] += tmp * y_3;
        sum[1] += tmp * y_0;
        sum[2] += tmp * y_1;
        sum[3] += tmp * y_2;

        yi += 4;
        j += 4;
    }
    if j < len {
        let tmp = x[j];
        y_3 = y[yi];
        yi += 1;
        sum[0] += tmp * y_0;
        sum[1] += tmp * y_1;
        sum[2] += tmp * y_2;
        sum[3] += tmp * y_3;
        j += 1;
    }
    if j < len {
        let tmp = x[j];
        y_0 = y[yi];
        yi += 1;
        sum[0] += tmp * y_1;
        sum[1] += tmp * y_2;
        sum[2] += tmp * y_3;
        sum[3] += tmp * y_0;
        j += 1;
    }
    if j < len {
        let tmp = x[j];
        y_1 = y[yi];
        sum[0] += tmp * y_2;
        sum[1] += tmp * y_3;
        sum[2] += tmp * y_0;
        sum[3] += tmp * y_1;
    }
}

/// Cross-correlation over a lag range.
///
/// `x` must have at least `len` elements and `y` at least
/// `len + xcorr.len() - 1`. Writes `xcorr[i] = x[..len] . y[i..i + len]`.
/// Lags are processed four at a time through [`xcorr_kernel`]; the
/// remainder uses [`inner_prod`]. Every `arch` gives the same bits.
pub fn pitch_xcorr(x: &[f32], y: &[f32], xcorr: &mut [f32], len: usize, arch: Arch) {
    let max_pitch = xcorr.len();
    assert!(max_pitch == 0 || y.len() + 1 >= len + max_pitch);
    let mut i = 0usize;
    while i + 3 < max_pitch {
        let mut sum = [0.0f32; 4];
        xcorr_kernel(&x[..len], &y[i..], &mut sum, len, arch);
        xcorr[i..i + 4].copy_from_slice(&sum);
        i += 4;
    }
    // In case max_pitch isn't a multiple of 4
    while i < max_pitch {
        xcorr[i] = inner_prod(x, &y[i..], len, arch);
        i += 1;
    }
}

/// [`pitch_xcorr`] on the scalar kernels.
#[inline]
pub fn pitch_xcorr_scalar(x: &[f32], y: &[f32], xcorr: &mut [f32], len: usize) {
    pitch_xcorr(x, y, xcorr, len, Arch::Scalar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_f32(len: usize, seed: u32) -> Vec<f32> {
        let mut v = Vec::with_capacity(len);
        let mut s = seed;
        for _ in 0..len {
            s = s.wrapping_mul(1103515245).wrapping_add(12345);
            v.push((s as i32 >> 16) as f32 / 32768.0);
        }
        v
    }

    #[test]
    fn kernel_matches_four_inner_products_bitwise() {
        for n in 0..=67 {
            let x = gen_f32(n, 42);
            let y = gen_f32(n + 3, 123);
            let mut sum = [0.0f32; 4];
            xcorr_kernel_scalar(&x, &y, &mut sum, n);
            for (k, s) in sum.iter().enumerate() {
                let expected = inner_prod_scalar(&x, &y[k..], n);
                assert_eq!(s.to_bits(), expected.to_bits(), "lag {k} n={n}");
            }
        }
    }

    #[test]
    fn kernel_accumulates_into_sum() {
        let x = gen_f32(9, 7);
        let y = gen_f32(12, 8);
        let mut sum = [1.0f32, 2.0, 3.0, 4.0];
        xcorr_kernel_scalar(&x, &y, &mut sum, 0);
        assert_eq!(sum, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn dual_matches_two_inner_products_bitwise() {
        for &n in &[0, 1, 3, 4, 7, 8, 15, 16, 63, 64, 100, 480] {
            let x = gen_f32(n, 42);
            let y01 = gen_f32(n, 123);
            let y02 = gen_f32(n, 456);
            let (a, b) = dual_inner_prod_scalar(&x, &y01, &y02, n);
            assert_eq!(a.to_bits(), inner_prod_scalar(&x, &y01, n).to_bits());
            assert_eq!(b.to_bits(), inner_prod_scalar(&x, &y02, n).to_bits());
        }
    }

    #[test]
    fn empty_inner_product_is_zero() {
        assert_eq!(inner_prod_scalar(&[], &[], 0), 0.0);
        assert_eq!(dual_inner_prod_scalar(&[], &[], &[], 0), (0.0, 0.0));
    }

    #[test]
    fn pitch_xcorr_matches_per_lag_products() {
        for &(len, max_pitch) in &[(0, 5), (3, 1), (64, 16), (240, 61), (480, 147)] {
            let x = gen_f32(len, 42);
            let y = gen_f32(len + max_pitch, 123);
            let mut xcorr = vec![0.0f32; max_pitch];
            pitch_xcorr_scalar(&x, &y, &mut xcorr, len);
            for (i, v) in xcorr.iter().enumerate() {
                let expected = inner_prod_scalar(&x, &y[i..], len);
                assert_eq!(v.to_bits(), expected.to_bits(), "lag {i} len={len}");
            }
        }
    }

    #[test]
    fn dispatch_matches_scalar_bitwise() {
        let arch = crate::arch::select_arch();
        for &n in &[0, 1, 3, 4, 7, 8, 15, 16, 63, 64, 100, 240, 480] {
            let x = gen_f32(n, 42);
            let y01 = gen_f32(n + 3, 123);
            let y02 = gen_f32(n, 456);
            let s = inner_prod_scalar(&x, &y01, n);
            assert_eq!(inner_prod(&x, &y01, n, arch).to_bits(), s.to_bits(), "n={n}");

            let (s1, s2) = dual_inner_prod_scalar(&x, &y01, &y02, n);
            let (d1, d2) = dual_inner_prod(&x, &y01, &y02, n, arch);
            assert_eq!(d1.to_bits(), s1.to_bits(), "n={n}");
            assert_eq!(d2.to_bits(), s2.to_bits(), "n={n}");

            let mut s4 = [0.5f32, -0.25, 1.0, 2.0];
            let mut d4 = s4;
            xcorr_kernel_scalar(&x, &y01, &mut s4, n);
            xcorr_kernel(&x, &y01, &mut d4, n, arch);
            assert_eq!(s4.map(f32::to_bits), d4.map(f32::to_bits), "n={n}");
        }
    }

    #[test]
    fn pitch_xcorr_dispatch_matches_scalar_bitwise() {
        let arch = crate::arch::select_arch();
        for &(len, max_pitch) in &[(0, 5), (3, 1), (120, 147), (240, 294), (480, 61)] {
            let x = gen_f32(len, 7);
            let y = gen_f32(len + max_pitch, 8);
            let mut scalar = vec![0.0f32; max_pitch];
            let mut dispatch = vec![0.0f32; max_pitch];
            pitch_xcorr_scalar(&x, &y, &mut scalar, len);
            pitch_xcorr(&x, &y, &mut dispatch, len, arch);
            for (i, (a, b)) in scalar.iter().zip(&dispatch).enumerate() {
                assert_eq!(a.to_bits(), b.to_bits(), "lag {i} len={len}");
            }
        }
    }
}
