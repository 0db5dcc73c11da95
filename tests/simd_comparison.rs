//! Dispatched kernels against their scalar references.

use denoise_pitch::internals::{
    dual_inner_prod, dual_inner_prod_scalar, find_best_pitch, inner_prod, inner_prod_scalar,
    pitch_xcorr, pitch_xcorr_scalar, xcorr_kernel, xcorr_kernel_scalar, SlidingEnergy,
};
use denoise_pitch::select_arch;

fn generate_signal(len: usize, seed: u32) -> Vec<f32> {
    let mut v = Vec::with_capacity(len);
    let mut state = seed;
    for _ in 0..len {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        v.push((state as i32 >> 16) as f32 / 32768.0);
    }
    v
}

fn assert_same(a: f32, b: f32, what: &str) {
    assert_eq!(a.to_bits(), b.to_bits(), "{what}: {a} vs {b}");
}

#[test]
fn inner_prod_dispatch_matches_scalar() {
    let arch = select_arch();
    for n in [0, 1, 2, 3, 5, 8, 13, 64, 160, 240, 481] {
        let x = generate_signal(n, 1);
        let y = generate_signal(n, 2);
        assert_same(
            inner_prod(&x, &y, n, arch),
            inner_prod_scalar(&x, &y, n),
            &format!("n={n}"),
        );
    }
}

#[test]
fn dual_inner_prod_dispatch_matches_scalar() {
    let arch = select_arch();
    for n in [0, 1, 7, 16, 31, 240, 480] {
        let x = generate_signal(n, 3);
        let y01 = generate_signal(n, 4);
        let y02 = generate_signal(n, 5);
        let (a, b) = dual_inner_prod(&x, &y01, &y02, n, arch);
        let (c, d) = dual_inner_prod_scalar(&x, &y01, &y02, n);
        assert_same(a, c, &format!("first n={n}"));
        assert_same(b, d, &format!("second n={n}"));
    }
}

#[test]
fn xcorr_kernel_dispatch_matches_scalar() {
    let arch = select_arch();
    for n in [0, 1, 2, 3, 4, 5, 9, 64, 120, 240, 480] {
        let x = generate_signal(n, 8);
        let y = generate_signal(n + 3, 9);
        let mut a = [0.0f32; 4];
        let mut b = [0.0f32; 4];
        xcorr_kernel(&x, &y, &mut a, n, arch);
        xcorr_kernel_scalar(&x, &y, &mut b, n);
        for k in 0..4 {
            assert_same(a[k], b[k], &format!("lag {k} n={n}"));
        }
    }
}

#[test]
fn pitch_xcorr_dispatch_matches_scalar() {
    let arch = select_arch();
    for (len, max_pitch) in [(120, 147), (240, 294), (480, 294), (17, 6)] {
        let x = generate_signal(len, 10);
        let y = generate_signal(len + max_pitch, 11);
        let mut a = vec![0.0f32; max_pitch];
        let mut b = vec![0.0f32; max_pitch];
        pitch_xcorr(&x, &y, &mut a, len, arch);
        pitch_xcorr_scalar(&x, &y, &mut b, len);
        for (i, (u, v)) in a.iter().zip(&b).enumerate() {
            assert_same(*u, *v, &format!("lag {i} len={len}"));
        }
    }
}

#[test]
fn kernel_batches_agree_with_pitch_xcorr() {
    let (len, max_pitch) = (120, 147);
    let x = generate_signal(len, 6);
    let y = generate_signal(len + max_pitch, 7);
    let mut xcorr = vec![0.0f32; max_pitch];
    pitch_xcorr_scalar(&x, &y, &mut xcorr, len);
    for i in (0..max_pitch - 3).step_by(4) {
        let mut sum = [0.0f32; 4];
        xcorr_kernel_scalar(&x, &y[i..], &mut sum, len);
        assert_eq!(sum, xcorr[i..i + 4]);
    }
}

#[test]
fn best_pitch_picks_strongest_normalized_peak() {
    let len = 64;
    let period = 20;
    let y: Vec<f32> = (0..len + 60)
        .map(|n| (2.0 * std::f32::consts::PI * (n % period) as f32 / period as f32).sin())
        .collect();
    let x = &y[..len];
    let mut xcorr = vec![0.0f32; 60];
    pitch_xcorr_scalar(x, &y, &mut xcorr, len);
    let best = find_best_pitch(&xcorr, &y, len);
    assert!(best.iter().all(|&p| p % period == 0), "{best:?}");
}

#[test]
fn sliding_energy_tracks_window() {
    let y: Vec<f32> = (0..100).map(|i| (i % 7) as f32).collect();
    let len = 10;
    let mut energy = SlidingEnergy::new(&y, len);
    for _ in 0..50 {
        let pos = energy.position();
        let direct = 1.0 + y[pos..pos + len].iter().map(|v| v * v).sum::<f32>();
        assert_eq!(energy.value(), direct);
        energy.advance();
    }
}
