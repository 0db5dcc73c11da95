//! Half-rate decimation and LPC whitening ahead of the pitch search.

use super::lpc::{autocorr, lpc};

/// Zero added to the whitening filter.
const WHITEN_ZERO: f32 = 0.8;
/// Per-tap bandwidth expansion of the LPC filter.
const LPC_BW_EXPANSION: f32 = 0.9;

/// 5-tap FIR filter applied in place.
///
/// `mem` holds the last five input samples (most recent first) and is updated
/// on return.
pub fn fir5(x: &mut [f32], num: &[f32; 5], mem: &mut [f32; 5]) {
    let [num0, num1, num2, num3, num4] = *num;
    let [mut mem0, mut mem1, mut mem2, mut mem3, mut mem4] = *mem;
    for xi in x.iter_mut() {
        let mut sum = *xi;
        sum += num0 * mem0;
        sum += num1 * mem1;
        sum += num2 * mem2;
        sum += num3 * mem3;
        sum += num4 * mem4;
        mem4 = mem3;
        mem3 = mem2;
        mem2 = mem1;
        mem1 = mem0;
        mem0 = *xi;
        *xi = sum;
    }
    *mem = [mem0, mem1, mem2, mem3, mem4];
}

/// Three-tap smoothing decimator for one channel, accumulated into `x_lp`.
fn decimate_into(x: &[f32], x_lp: &mut [f32], accumulate: bool) {
    let half = x_lp.len();
    let mut put = |i: usize, v: f32| {
        if accumulate {
            x_lp[i] += v;
        } else {
            x_lp[i] = v;
        }
    };
    for i in 1..half {
        put(i, 0.25f32 * x[2 * i - 1] + 0.25f32 * x[2 * i + 1] + 0.5f32 * x[2 * i]);
    }
    if half > 0 {
        put(0, 0.25f32 * x[1] + 0.5f32 * x[0]);
    }
}

/// Downsamples and LPC-whitens audio for pitch analysis.
///
/// `x` holds 1 or 2 channel slices of at least `len` samples; both channels
/// are summed. `x_lp` receives `len / 2` half-rate samples, filtered in place
/// by an order-4 LPC inverse filter with an extra zero at `-0.8`.
pub fn pitch_downsample(x: &[&[f32]], x_lp: &mut [f32], len: usize) {
    let channels = x.len();
    assert!(channels == 1 || channels == 2);
    let half = len >> 1;
    assert!(half >= 5, "need at least 5 half-rate samples");
    assert!(x_lp.len() >= half);
    for ch in x {
        assert!(ch.len() >= len);
    }
    let x_lp = &mut x_lp[..half];

    for (c, ch) in x.iter().enumerate() {
        decimate_into(ch, x_lp, c > 0);
    }

    let mut ac = [0.0f32; 5];
    autocorr(x_lp, &mut ac, None, 0, 4);

    // Noise floor -40 dB
    ac[0] *= 1.0001f32;
    // Lag windowing
    for (i, v) in ac.iter_mut().enumerate().skip(1) {
        let f = 0.008f32 * i as f32;
        *v -= *v * f * f;
    }

    let mut coeffs = [0.0f32; 4];
    lpc(&mut coeffs, &ac);
    let mut tmp = 1.0f32;
    for c in coeffs.iter_mut() {
        tmp *= LPC_BW_EXPANSION;
        *c *= tmp;
    }
    // Add a zero
    let num = [
        coeffs[0] + WHITEN_ZERO,
        coeffs[1] + WHITEN_ZERO * coeffs[0],
        coeffs[2] + WHITEN_ZERO * coeffs[1],
        coeffs[3] + WHITEN_ZERO * coeffs[2],
        WHITEN_ZERO * coeffs[3],
    ];
    let mut mem = [0.0f32; 5];
    fir5(x_lp, &num, &mut mem);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fir5_impulse_response_is_taps() {
        let mut x = [0.0f32; 8];
        x[0] = 1.0;
        let num = [0.5, 0.25, 0.125, 0.0625, 0.03125];
        let mut mem = [0.0f32; 5];
        fir5(&mut x, &num, &mut mem);
        assert_eq!(x, [1.0, 0.5, 0.25, 0.125, 0.0625, 0.03125, 0.0, 0.0]);
        assert_eq!(mem, [0.0; 5]);
    }

    #[test]
    fn fir5_carries_memory_between_calls() {
        let num = [1.0, -1.0, 0.5, 0.0, 2.0];
        let input: Vec<f32> = (0..20).map(|i| (i * 7 % 11) as f32 - 5.0).collect();

        let mut whole = input.clone();
        let mut mem = [0.0f32; 5];
        fir5(&mut whole, &num, &mut mem);

        let mut split = input.clone();
        let mut mem2 = [0.0f32; 5];
        let (a, b) = split.split_at_mut(7);
        fir5(a, &num, &mut mem2);
        fir5(b, &num, &mut mem2);

        assert_eq!(whole, split);
        assert_eq!(mem, mem2);
        assert_eq!(mem[0], input[19]);
    }

    #[test]
    fn decimator_weights() {
        let x = [4.0f32, 8.0, 4.0, 8.0, 4.0, 8.0];
        let mut x_lp = [0.0f32; 3];
        decimate_into(&x, &mut x_lp, false);
        // The first output has no left neighbour: 0.5 * 4 + 0.25 * 8.
        assert_eq!(x_lp, [4.0, 6.0, 6.0]);
        decimate_into(&x, &mut x_lp, true);
        assert_eq!(x_lp, [8.0, 12.0, 12.0]);
    }

    #[test]
    fn silence_stays_silent() {
        let x = [0.0f32; 960];
        let mut x_lp = [1.0f32; 480];
        pitch_downsample(&[&x], &mut x_lp, 960);
        assert!(x_lp.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn stereo_equals_mono_of_sum() {
        let a: Vec<f32> = (0..960)
            .map(|i| 1000.0 * (i as f32 * 0.05).sin() + 300.0 * (i as f32 * 0.31).cos())
            .collect();
        let doubled: Vec<f32> = a.iter().map(|v| 2.0 * v).collect();
        let mut stereo = [0.0f32; 480];
        let mut mono = [0.0f32; 480];
        pitch_downsample(&[&a, &a], &mut stereo, 960);
        pitch_downsample(&[&doubled], &mut mono, 960);
        assert_eq!(stereo, mono);
    }

    #[test]
    fn whitening_attenuates_low_tone() {
        let x: Vec<f32> = (0..1920)
            .map(|i| 8000.0 * (2.0 * std::f32::consts::PI * i as f32 / 240.0).sin())
            .collect();
        let mut x_lp = [0.0f32; 960];
        pitch_downsample(&[&x], &mut x_lp, 1920);

        let mut raw = [0.0f32; 960];
        decimate_into(&x, &mut raw, false);
        let energy = |v: &[f32]| v.iter().map(|s| s * s).sum::<f32>();
        assert!(energy(&x_lp[16..]) < 0.1 * energy(&raw[16..]));
    }
}
