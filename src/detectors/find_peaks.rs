use super::{Detection, usable};
use crate::config::FindPeaksConfig;
use crate::rate::find_rr_dist;
use crate::signal_processing::extrema::local_maxima;

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Left and right prominence of the peak at position `i` in `peaks`
///
/// Each side is measured down to the lowest sample between the peak and the
/// nearest strictly higher peak on that side, or the signal edge if there is
/// none.
fn prominences(data: &[f64], peaks: &[usize], i: usize) -> (f64, f64) {
    let peak = peaks[i];
    let height = data[peak];

    let left_base = peaks[..i]
        .iter()
        .rev()
        .find(|&&p| data[p] > height)
        .map_or(0, |&p| p);
    let right_base = peaks[i + 1..]
        .iter()
        .find(|&&p| data[p] > height)
        .map_or(data.len(), |&p| p);

    let left = if peak > left_base {
        height - min_of(&data[left_base..peak])
    } else {
        0.0
    };
    let right = height - min_of(&data[peak..right_base]);
    (left, right)
}

/// Distance between the first samples at or below `level` on each side of `peak`
///
/// A side where the signal never drops to `level` contributes nothing.
fn width_at(data: &[f64], peak: usize, level: f64) -> usize {
    let left = (0..peak)
        .rev()
        .find(|&j| data[j] <= level)
        .map_or(0, |j| peak - j);
    let right = (peak + 1..data.len())
        .find(|&j| data[j] <= level)
        .map_or(0, |j| j - peak);
    left + right
}

/// Single left-to-right proximity sweep
///
/// For each peak, later peaks closer than `proximity` samples are compared
/// against it: a shorter or equal later peak is dropped, a taller one drops
/// the current peak and ends its comparisons.
fn prune_proximity(data: &[f64], peaks: &[usize], proximity: f64) -> Vec<usize> {
    let mut removed = vec![false; peaks.len()];

    for i in 0..peaks.len() {
        for j in i + 1..peaks.len() {
            if (peaks[j] - peaks[i]) as f64 >= proximity {
                break;
            }
            if data[peaks[i]] >= data[peaks[j]] {
                removed[j] = true;
            } else {
                removed[i] = true;
                break;
            }
        }
    }

    peaks
        .iter()
        .zip(&removed)
        .filter(|&(_, &gone)| !gone)
        .map(|(&p, _)| p)
        .collect()
}

/// Detect breaths as prominent, wide, well separated local maxima
///
/// Starts from every local maximum and drops the ones with too little
/// prominence on either side, too narrow a base, or a taller neighbour
/// within the proximity distance.
pub fn find_peaks(data: &[f64], fs: f64, config: &FindPeaksConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }

    let prominence = config.prominence();
    let heval_ratio = config.heval_ratio();
    let min_width = config.width_samples(fs);
    let proximity = config.proximity_samples(fs);

    let mut peaks = local_maxima(data);
    if peaks.is_empty() {
        return Detection::empty();
    }

    // Maxima joined by a flat top are one plateau; keep its first sample
    peaks.dedup_by(|later, earlier| {
        let height = data[*earlier];
        data[*earlier..=*later].iter().all(|&v| v == height)
    });

    let candidates: Vec<usize> = (0..peaks.len())
        .filter(|&i| {
            let (left, right) = prominences(data, &peaks, i);
            if left < prominence || right < prominence {
                return false;
            }
            let level = data[peaks[i]] - heval_ratio * left.min(right);
            width_at(data, peaks[i], level) as f64 >= min_width
        })
        .map(|i| peaks[i])
        .collect();

    let peaks = prune_proximity(data, &candidates, proximity);
    log::debug!(
        "find_peaks: {} maxima, {} after prominence/width, {} after proximity",
        local_maxima(data).len(),
        candidates.len(),
        peaks.len()
    );

    Detection {
        rate: find_rr_dist(&peaks, fs),
        peaks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::math::linspace;
    use std::f64::consts::PI;

    fn sine() -> Vec<f64> {
        linspace(0.0, 4.0 * PI, 256).iter().map(|t| t.sin()).collect()
    }

    #[test]
    fn test_find_peaks_sine() {
        let detection = find_peaks(&sine(), 64.0, &FindPeaksConfig::default());

        assert_eq!(detection.peaks, vec![32, 159]);
        assert!(
            (detection.rate - 3840.0 / 127.0).abs() < 1e-9,
            "rate {}",
            detection.rate
        );
    }

    #[test]
    fn test_find_peaks_empty_and_degenerate() {
        let config = FindPeaksConfig::default();
        assert_eq!(find_peaks(&[], 64.0, &config), Detection::empty());
        assert_eq!(find_peaks(&[1.0], 64.0, &config), Detection::empty());
        assert_eq!(find_peaks(&[0.0; 128], 64.0, &config), Detection::empty());
        assert_eq!(find_peaks(&sine(), 0.0, &config), Detection::empty());
    }

    #[test]
    fn test_find_peaks_prominence_rejects_ripples() {
        // Small ripple at 3 sits on the flank of the main peak at 6
        let data = [0.0, 0.5, 1.0, 1.1, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 0.0];
        let config = FindPeaksConfig {
            width: Some(0.0),
            ..Default::default()
        };
        let detection = find_peaks(&data, 1.0, &config);
        assert_eq!(detection.peaks, vec![6]);
        assert_eq!(detection.rate, 0.0);
    }

    #[test]
    fn test_find_peaks_width_filter() {
        // Narrow spike at 2, broad hump around 9
        let data = [
            0.0, 0.0, 2.5, 0.0, 0.0, 0.0, 1.0, 1.5, 1.8, 2.0, 1.8, 1.5, 1.0, 0.0, 0.0,
        ];
        let config = FindPeaksConfig {
            width: Some(4.0),
            proximity: Some(0.0),
            ..Default::default()
        };
        let detection = find_peaks(&data, 1.0, &config);
        assert_eq!(detection.peaks, vec![9]);
    }

    #[test]
    fn test_plateau_reported_once() {
        // Two-sample flat top at 3..=4, then an equally tall separate peak at 8
        let data = [0.0, 0.0, 1.0, 2.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0];
        let config = FindPeaksConfig {
            prominence: Some(1.0),
            width: Some(0.0),
            proximity: Some(0.0),
            ..Default::default()
        };
        let detection = find_peaks(&data, 1.0, &config);
        assert_eq!(detection.peaks, vec![3, 8]);
    }

    #[test]
    fn test_proximity_keeps_taller() {
        let data = [0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        // Peaks 1 and 3 are within 3 samples; 3 is taller
        assert_eq!(prune_proximity(&data, &[1, 3, 8], 3.0), vec![3, 8]);
        // Equal heights favour the earlier peak
        let flat = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(prune_proximity(&flat, &[1, 3], 3.0), vec![1]);
    }

    #[test]
    fn test_proximity_single_sweep() {
        // 0 beats 2, then 2 (already dropped) still beats 4: one pass
        // leaves only the first peak even though 0 and 4 are far apart
        let data = [3.0, 0.0, 2.0, 0.0, 1.0];
        assert_eq!(prune_proximity(&data, &[0, 2, 4], 3.0), vec![0]);
    }

    #[test]
    fn test_width_at() {
        let data = [0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        assert_eq!(width_at(&data, 3, 1.0), 4);
        // Never drops on the right
        assert_eq!(width_at(&[0.0, 2.0, 3.0], 2, 1.0), 2);
    }
}
