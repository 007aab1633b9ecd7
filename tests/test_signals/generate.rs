#![allow(dead_code)]

use std::f64::consts::PI;

use rralg::signal_processing::linspace;
use rralg::simulation::BreathingSignal;

/// Two full sine periods over four seconds (`fs * 4` samples)
pub fn sine_4s(fs: usize) -> Vec<f64> {
    linspace(0.0, 4.0 * PI, fs * 4)
        .into_iter()
        .map(f64::sin)
        .collect()
}

/// Zeros interleaved with the given amplitudes: `[0, a0, 0, a1, ..., 0]`
pub fn alternating(amplitudes: &[f64]) -> Vec<f64> {
    let mut signal = vec![0.0];
    for &a in amplitudes {
        signal.push(a);
        signal.push(0.0);
    }
    signal
}

/// `pattern` repeated until the signal is `len` samples long
pub fn repeating_pattern(pattern: &[f64], len: usize) -> Vec<f64> {
    pattern.iter().copied().cycle().take(len).collect()
}

/// Clean sinusoidal breathing at a known rate
pub fn breathing(rate_bpm: f64, fs: f64, duration_secs: f64) -> Vec<f64> {
    BreathingSignal::new(rate_bpm, fs, duration_secs).generate()
}
