use super::{Detection, usable};
use crate::config::{CountAdvConfig, CountOrigConfig};
use crate::constants::SECONDS_PER_MINUTE;
use crate::signal_processing::extrema::{local_maxima, local_minima};
use crate::signal_processing::math::{mean, percentile};

/// Count peak-to-peak cycles separated by a limited number of troughs
///
/// Peaks must exceed `th_coef` times a percentile of all peak heights and
/// troughs must be negative, so the signal is expected to be centred on zero.
/// Returned peaks are the starts of the valid cycles. Not reachable through
/// the dispatcher.
pub fn count_orig(data: &[f64], fs: f64, config: &CountOrigConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }

    let peaks = local_maxima(data);
    let troughs = local_minima(data);
    if peaks.is_empty() || troughs.is_empty() {
        return Detection::empty();
    }

    let heights: Vec<f64> = peaks.iter().map(|&p| data[p]).collect();
    let threshold = config.th_coef() * percentile(&heights, config.percentile());

    let peaks: Vec<usize> = peaks.into_iter().filter(|&p| data[p] > threshold).collect();
    let troughs: Vec<usize> = troughs.into_iter().filter(|&t| data[t] < 0.0).collect();

    let max_troughs = config.max_troughs();
    let (starts, durations): (Vec<usize>, Vec<f64>) = peaks
        .windows(2)
        .filter(|pair| {
            let between = troughs.iter().filter(|&&t| t > pair[0] && t < pair[1]).count();
            (1..=max_troughs).contains(&between)
        })
        .map(|pair| (pair[0], (pair[1] - pair[0]) as f64))
        .unzip();

    let mean_duration = mean(&durations);
    let rate = if mean_duration == 0.0 {
        0.0
    } else {
        SECONDS_PER_MINUTE * fs / mean_duration
    };

    Detection {
        rate,
        peaks: starts,
    }
}

/// Index of the first smallest absolute difference between neighbours
fn smallest_step(data: &[f64], extrema: &[usize]) -> Option<(usize, f64)> {
    extrema
        .windows(2)
        .map(|w| (data[w[0]] - data[w[1]]).abs())
        .enumerate()
        .fold(None, |best, (i, diff)| match best {
            Some((_, min)) if min <= diff => best,
            _ => Some((i, diff)),
        })
}

/// Count breaths after eliminating small extrema pairs
///
/// Maxima and minima are merged in time order. The neighbouring pair with
/// the smallest amplitude difference is removed while that difference is
/// within `th_coef` times a percentile of all neighbouring differences. The
/// survivors are trimmed to start and end on a maximum, and every other
/// extremum is reported as a breath.
pub fn count_adv(data: &[f64], fs: f64, config: &CountAdvConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }

    let mut extrema = local_maxima(data);
    extrema.extend(local_minima(data));
    extrema.sort_unstable();
    if extrema.len() < 3 {
        return Detection::empty();
    }

    let steps: Vec<f64> = extrema
        .windows(2)
        .skip(1)
        .map(|w| (data[w[0]] - data[w[1]]).abs())
        .collect();
    let threshold = config.th_coef() * percentile(&steps, config.percentile());

    while extrema.len() >= 3 {
        let Some((idx, diff)) = smallest_step(data, &extrema) else {
            break;
        };
        if diff > threshold {
            break;
        }
        extrema.drain(idx..idx + 2);
    }

    if extrema.len() < 3 {
        return Detection::empty();
    }

    if data[extrema[0]] < data[extrema[1]] {
        extrema.remove(0);
    }
    let n = extrema.len();
    if n >= 2 && data[extrema[n - 1]] < data[extrema[n - 2]] {
        extrema.pop();
    }

    let (Some(&first), Some(&last)) = (extrema.first(), extrema.last()) else {
        return Detection::empty();
    };
    let breaths = (extrema.len() - 1) as f64 / 2.0;
    let duration = (last - first) as f64;
    let rate = if breaths == 0.0 || duration == 0.0 {
        0.0
    } else {
        SECONDS_PER_MINUTE * fs * breaths / duration
    };

    Detection {
        rate,
        peaks: extrema.into_iter().step_by(2).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Sine-shaped cycles of `2 * half` samples, peaking at `half / 2`
    fn alternating(cycles: usize, half: usize) -> Vec<f64> {
        (0..cycles * 2 * half)
            .map(|i| {
                let phase = i % (2 * half);
                let x = phase as f64 / half as f64;
                if phase < half {
                    (x * PI).sin()
                } else {
                    -((x - 1.0) * PI).sin()
                }
            })
            .collect()
    }

    #[test]
    fn test_count_orig_regular_cycles() {
        // One breath every 20 samples at 10 Hz: 30 breaths/min
        let data = alternating(5, 10);
        let detection = count_orig(&data, 10.0, &CountOrigConfig::default());

        assert_eq!(detection.peaks, vec![5, 25, 45, 65]);
        assert!((detection.rate - 30.0).abs() < 1e-9, "rate {}", detection.rate);
    }

    #[test]
    fn test_count_orig_no_troughs() {
        let data = [0.0, 1.0, 0.5, 1.0, 0.5, 1.0, 0.0];
        let detection = count_orig(&data, 10.0, &CountOrigConfig::default());
        assert_eq!(detection, Detection::empty());
    }

    #[test]
    fn test_count_orig_max_troughs() {
        // Two troughs (3, 5) between peaks 1 and 7, one trough (9) before 11
        let data = [
            0.0, 1.0, 0.0, -1.0, -0.2, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0,
        ];

        let detection = count_orig(&data, 1.0, &CountOrigConfig::default());
        assert_eq!(detection.peaks, vec![7]);
        assert!((detection.rate - 15.0).abs() < 1e-9, "rate {}", detection.rate);

        let config = CountOrigConfig {
            max_troughs: Some(2),
            ..Default::default()
        };
        let detection = count_orig(&data, 1.0, &config);
        assert_eq!(detection.peaks, vec![1, 7]);
        assert!((detection.rate - 12.0).abs() < 1e-9, "rate {}", detection.rate);
    }

    #[test]
    fn test_count_orig_degenerate() {
        let config = CountOrigConfig::default();
        assert_eq!(count_orig(&[], 10.0, &config), Detection::empty());
        assert_eq!(count_orig(&[1.0], 10.0, &config), Detection::empty());
        assert_eq!(count_orig(&[0.0; 128], 10.0, &config), Detection::empty());
    }

    #[test]
    fn test_count_adv_regular_cycles() {
        let data = alternating(5, 10);
        let detection = count_adv(&data, 10.0, &CountAdvConfig::default());

        // The trailing minimum at 95 is trimmed
        assert_eq!(detection.peaks, vec![5, 25, 45, 65, 85]);
        assert!((detection.rate - 30.0).abs() < 1e-9, "rate {}", detection.rate);
    }

    #[test]
    fn test_count_adv_removes_ripple() {
        // A small ripple pair (indices 3 and 4) inside the first exhalation
        let data = [
            0.0, 1.0, 0.0, -0.5, -0.4, -0.45, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0,
        ];
        let detection = count_adv(&data, 1.0, &CountAdvConfig::default());

        assert_eq!(detection.peaks, vec![1, 8, 12]);
        assert!((detection.rate - 60.0 * 2.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_count_adv_degenerate() {
        let config = CountAdvConfig::default();
        assert_eq!(count_adv(&[], 10.0, &config), Detection::empty());
        assert_eq!(count_adv(&[0.0, 1.0, 0.0], 10.0, &config), Detection::empty());
        assert_eq!(count_adv(&[0.0; 128], 10.0, &config), Detection::empty());
    }

    #[test]
    fn test_smallest_step_prefers_first() {
        let data = [0.0, 1.0, 0.0, 1.0];
        assert_eq!(smallest_step(&data, &[0, 1, 2, 3]), Some((0, 1.0)));
        assert_eq!(smallest_step(&data, &[0]), None);
    }
}
