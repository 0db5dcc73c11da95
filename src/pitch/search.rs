//! Coarse-to-fine pitch search over a whitened half-rate signal.

use super::interp_offset;
use super::xcorr::{inner_prod, pitch_xcorr};
use super::{PITCH_FRAME_SIZE, PITCH_MAX_PERIOD};
use crate::arch::Arch;

/// Energy of a window of `len` samples sliding along `y`, seeded with 1.
///
/// Each [`advance`](SlidingEnergy::advance) adds the newly covered sample's
/// square, removes the expired one, and floors the result at 1 so it can be
/// used as a denominator.
#[derive(Debug, Clone)]
pub struct SlidingEnergy<'a> {
    y: &'a [f32],
    len: usize,
    pos: usize,
    syy: f32,
}

impl<'a> SlidingEnergy<'a> {
    pub fn new(y: &'a [f32], len: usize) -> Self {
        let mut syy = 1.0f32;
        for yj in &y[..len] {
            syy += yj * yj;
        }
        Self { y, len, pos: 0, syy }
    }

    /// Energy of `y[pos..pos + len]`, plus the seed.
    #[inline]
    pub fn value(&self) -> f32 {
        self.syy
    }

    /// Index of the first sample in the current window.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Slide the window one sample forward. `y` must hold `pos + len + 1`
    /// samples.
    #[inline]
    pub fn advance(&mut self) {
        let enter = self.y[self.pos + self.len];
        let leave = self.y[self.pos];
        // Syy + (A - B), not (Syy + A) - B.
        self.syy += enter * enter - leave * leave;
        self.syy = self.syy.max(1.0);
        self.pos += 1;
    }
}

/// Finds the two best pitch candidates in `xcorr`.
///
/// Lags are ranked by `xcorr[i]^2 / Syy(i)` where `Syy(i)` is the energy of
/// `y[i..i + len]`; lags with non-positive correlation are skipped and ties
/// keep the earlier lag. `y` must hold `len + xcorr.len()` samples.
/// Returns `[best, runner_up]`, which default to `[0, 1]`.
pub fn find_best_pitch(xcorr: &[f32], y: &[f32], len: usize) -> [usize; 2] {
    let max_pitch = xcorr.len();
    assert!(y.len() >= len + max_pitch);
    let mut energy = SlidingEnergy::new(y, len);
    let mut best_num: [f32; 2] = [-1.0, -1.0];
    let mut best_den: [f32; 2] = [0.0, 0.0];
    let mut best_pitch: [usize; 2] = [0, 1];
    for (i, &xc) in xcorr.iter().enumerate() {
        if xc > 0.0 {
            let syy = energy.value();
            let num = xc * xc;
            if num * best_den[1] > best_num[1] * syy {
                if num * best_den[0] > best_num[0] * syy {
                    best_num[1] = best_num[0];
                    best_den[1] = best_den[0];
                    best_pitch[1] = best_pitch[0];
                    best_num[0] = num;
                    best_den[0] = syy;
                    best_pitch[0] = i;
                } else {
                    best_num[1] = num;
                    best_den[1] = syy;
                    best_pitch[1] = i;
                }
            }
        }
        energy.advance();
    }
    best_pitch
}

/// Hierarchical pitch search.
///
/// `x_lp` is the current half-rate frame (`len / 2` samples) and `y` the
/// half-rate history it is correlated against (`(len + max_pitch) / 2`
/// samples). `len` and `max_pitch` are in full-rate samples. Returns the lag
/// in full-rate samples, in `[0, max_pitch)`.
pub fn pitch_search(x_lp: &[f32], y: &[f32], len: usize, max_pitch: usize, arch: Arch) -> usize {
    assert!(len > 0 && len <= PITCH_FRAME_SIZE);
    assert!(max_pitch > 0 && max_pitch <= PITCH_MAX_PERIOD);
    assert!(x_lp.len() >= len >> 1);
    assert!(y.len() >= (len >> 1) + (max_pitch >> 1));
    let lag = len + max_pitch;

    let mut x_lp4 = [0.0f32; PITCH_FRAME_SIZE >> 2];
    let mut y_lp4 = [0.0f32; (PITCH_FRAME_SIZE + PITCH_MAX_PERIOD) >> 2];
    let mut xcorr = [0.0f32; PITCH_MAX_PERIOD >> 1];
    let x_lp4 = &mut x_lp4[..len >> 2];
    let y_lp4 = &mut y_lp4[..lag >> 2];

    // Downsample by 2 again
    for (j, v) in x_lp4.iter_mut().enumerate() {
        *v = x_lp[2 * j];
    }
    for (j, v) in y_lp4.iter_mut().enumerate() {
        *v = y[2 * j];
    }

    // Coarse search with 4x decimation
    let coarse = &mut xcorr[..max_pitch >> 2];
    pitch_xcorr(x_lp4, y_lp4, coarse, len >> 2, arch);
    let best_pitch = find_best_pitch(coarse, y_lp4, len >> 2);

    // Finer search with 2x decimation, only around the coarse candidates
    let half_len = len >> 1;
    let fine = &mut xcorr[..max_pitch >> 1];
    for (i, v) in fine.iter_mut().enumerate() {
        let near = |p: usize| i.abs_diff(2 * p) <= 2;
        *v = if near(best_pitch[0]) || near(best_pitch[1]) {
            inner_prod(x_lp, &y[i..], half_len, arch).max(-1.0)
        } else {
            0.0
        };
    }
    let best_pitch = find_best_pitch(fine, y, half_len);

    // Refine by pseudo-interpolation
    let best = best_pitch[0];
    let offset = if best > 0 && best + 1 < fine.len() {
        interp_offset(fine[best - 1], fine[best], fine[best + 1])
    } else {
        0
    };
    (2 * best as i32 - offset) as usize
}
