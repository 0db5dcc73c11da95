//! Autocorrelation and linear-prediction analysis used to whiten the
//! decimated signal before the pitch search.

use super::xcorr::pitch_xcorr_scalar;
use super::PITCH_BUF_SIZE;

/// Longest signal [`autocorr`] can taper with a window.
pub const AUTOCORR_MAX_LEN: usize = PITCH_BUF_SIZE >> 1;

/// Below this `ac[0]` the input is treated as silence.
const LPC_SILENCE: f32 = 1e-10;

/// Levinson-Durbin LPC analysis.
///
/// Computes `lpc.len()` coefficients from the autocorrelation `ac`, which must
/// hold at least `lpc.len() + 1` values. Returns the final prediction error.
///
/// The recursion stops as soon as the error falls to 0.001 of `ac[0]`
/// (30 dB of prediction gain); the remaining coefficients stay zero. Silent
/// input yields all-zero coefficients.
pub fn lpc(lpc: &mut [f32], ac: &[f32]) -> f32 {
    let p = lpc.len();
    assert!(ac.len() > p);
    lpc.fill(0.0);
    let mut error = ac[0];
    if ac[0] <= LPC_SILENCE {
        return error;
    }
    for i in 0..p {
        // Sum up this iteration's reflection coefficient
        let mut rr = 0.0f32;
        for j in 0..i {
            rr += lpc[j] * ac[i - j];
        }
        rr += ac[i + 1];
        let r = -rr / error;
        // Update LPC coefficients and total error
        lpc[i] = r;
        for j in 0..((i + 1) >> 1) {
            let tmp1 = lpc[j];
            let tmp2 = lpc[i - 1 - j];
            lpc[j] = tmp1 + r * tmp2;
            lpc[i - 1 - j] = tmp2 + r * tmp1;
        }
        error -= r * r * error;
        if error < 0.001f32 * ac[0] {
            break;
        }
    }
    error
}

/// Autocorrelation.
///
/// Computes `lag + 1` values from all of `x` into `ac[0..=lag]`. When a
/// `window` is given, the first and last `overlap` samples are tapered by it
/// before correlating; `x` is then limited to [`AUTOCORR_MAX_LEN`] samples.
pub fn autocorr(x: &[f32], ac: &mut [f32], window: Option<&[f32]>, overlap: usize, lag: usize) {
    let n = x.len();
    assert!(n > lag);
    assert!(ac.len() > lag);

    match window {
        Some(win) if overlap > 0 => {
            assert!(n <= AUTOCORR_MAX_LEN);
            assert!(win.len() >= overlap && 2 * overlap <= n);
            let mut xx = [0.0f32; AUTOCORR_MAX_LEN];
            let xx = &mut xx[..n];
            xx.copy_from_slice(x);
            for i in 0..overlap {
                xx[i] = x[i] * win[i];
                xx[n - i - 1] = x[n - i - 1] * win[i];
            }
            correlate(xx, ac, lag);
        }
        _ => correlate(x, ac, lag),
    }
}

fn correlate(x: &[f32], ac: &mut [f32], lag: usize) {
    let n = x.len();
    let fast_n = n - lag;
    pitch_xcorr_scalar(x, x, &mut ac[..=lag], fast_n);

    // Slow tail beyond the kernel's range
    for k in 0..=lag {
        let mut d = 0.0f32;
        for i in (k + fast_n)..n {
            d += x[i] * x[i - k];
        }
        ac[k] += d;
    }
}
