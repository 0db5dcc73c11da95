//! Sub-harmonic correction of a pitch estimate.
//!
//! A correlation search readily locks onto a multiple of the true period.
//! [`remove_doubling`] tests the sub-multiples `T0 / k` and keeps the shortest
//! one whose normalized correlation still holds up, with a bonus for staying
//! close to the previous frame's period.

use super::interp_offset;
use super::xcorr::{dual_inner_prod, inner_prod};
use super::PITCH_MAX_PERIOD;
use crate::arch::Arch;

/// Fraction `SECOND_CHECK[k] / k` of `T0` where a second peak is expected
/// when `T0 / k` is the true period.
const SECOND_CHECK: [usize; 16] = [0, 0, 3, 2, 3, 2, 5, 2, 3, 2, 3, 2, 5, 2, 3, 2];

#[inline]
fn compute_pitch_gain(xy: f32, xx: f32, yy: f32) -> f32 {
    xy / (1.0f32 + xx * yy).sqrt()
}

/// Fills `yy[i]` with the energy of the `n` samples ending `i` samples before
/// `x[start + n]`, for `i = 0..yy.len()`.
///
/// `yy[0]` is `xx`, the energy of `x[start..start + n]`. Later entries are
/// updated incrementally; the running sum is left unclamped while the stored
/// values are floored at 0.
pub(crate) fn backward_energy(x: &[f32], start: usize, n: usize, xx: f32, yy: &mut [f32]) {
    assert!(yy.len() <= start + 1);
    let mut acc = xx;
    yy[0] = xx;
    for i in 1..yy.len() {
        acc += x[start - i] * x[start - i];
        acc -= x[start + n - i] * x[start + n - i];
        yy[i] = acc.max(0.0);
    }
}

/// Removes pitch period doubling (and tripling, ...).
///
/// `x` is the half-rate pitch buffer: `max_period / 2` samples of history
/// followed by the `n / 2` samples of the current frame. `max_period`,
/// `min_period`, `n`, the initial estimate `t0` and `prev_period` are in
/// full-rate samples. Returns the corrected period (at least `min_period`)
/// and its gain in `[0, 1]`.
pub fn remove_doubling(
    x: &[f32],
    max_period: usize,
    min_period: usize,
    n: usize,
    t0: usize,
    prev_period: usize,
    prev_gain: f32,
    arch: Arch,
) -> (usize, f32) {
    assert!(max_period >= 4 && max_period <= PITCH_MAX_PERIOD);
    let min_period0 = min_period;
    let max_period = max_period / 2;
    let min_period = min_period / 2;
    let prev_period = prev_period / 2;
    let n = n / 2;
    let x_off = max_period;
    assert!(x.len() >= x_off + n);
    let x0 = &x[x_off..];

    let t0 = (t0 / 2).clamp(1, max_period - 1);
    let mut t = t0;

    let (xx, mut xy) = dual_inner_prod(x0, x0, &x[x_off - t0..], n, arch);
    let mut yy_lookup = [0.0f32; (PITCH_MAX_PERIOD >> 1) + 1];
    let yy_lookup = &mut yy_lookup[..=max_period];
    backward_energy(x, x_off, n, xx, yy_lookup);

    let mut yy = yy_lookup[t0];
    let mut best_xy = xy;
    let mut best_yy = yy;
    let g0 = compute_pitch_gain(xy, xx, yy);
    let mut g = g0;

    // Look for any pitch at T/k
    for k in 2..=15usize {
        let t1 = (2 * t0 + k) / (2 * k);
        if t1 < min_period {
            break;
        }
        // Look for another strong correlation at t1b
        let t1b = if k == 2 {
            if t1 + t0 > max_period {
                t0
            } else {
                t0 + t1
            }
        } else {
            (2 * SECOND_CHECK[k] * t0 + k) / (2 * k)
        };
        let (xy1, xy2) = dual_inner_prod(x0, &x[x_off - t1..], &x[x_off - t1b..], n, arch);
        xy = 0.5f32 * (xy1 + xy2);
        yy = 0.5f32 * (yy_lookup[t1] + yy_lookup[t1b]);
        let g1 = compute_pitch_gain(xy, xx, yy);

        let dist = t1.abs_diff(prev_period);
        let cont = if dist <= 1 {
            prev_gain
        } else if dist <= 2 && 5 * k * k < t0 {
            0.5f32 * prev_gain
        } else {
            0.0
        };
        let mut thresh = (0.7f32 * g0 - cont).max(0.3);
        // Bias against very high pitch (very short period) to avoid
        // false-positives due to short-term correlation
        if t1 < 3 * min_period {
            thresh = (0.85f32 * g0 - cont).max(0.4);
        } else if t1 < 2 * min_period {
            thresh = (0.9f32 * g0 - cont).max(0.5);
        }
        if g1 > thresh {
            best_xy = xy;
            best_yy = yy;
            t = t1;
            g = g1;
        }
    }

    best_xy = best_xy.max(0.0);
    let mut pg = if best_yy <= best_xy {
        1.0f32
    } else {
        best_xy / (best_yy + 1.0)
    };

    let mut xcorr = [0.0f32; 3];
    for (k, v) in xcorr.iter_mut().enumerate() {
        *v = inner_prod(x0, &x[x_off + 1 - t - k..], n, arch);
    }
    let offset = interp_offset(xcorr[0], xcorr[1], xcorr[2]);
    // A negative best correlation reports no periodicity.
    pg = pg.min(g).max(0.0);
    let period = (2 * t as i32 + offset).max(min_period0 as i32) as usize;
    (period, pg)
}
