use super::{Detection, usable};
use crate::config::SrmacConfig;
use crate::rate::find_rr_dist;
use crate::signal_processing::zero_crossing_detector::ZeroCrossingDetector;

/// Smoothed fast-minus-slow EWMA trace
///
/// Both averages start at the first sample; the crossing average starts at 0.
pub fn crossing_trace(data: &[f64], coef_fast: f64, coef_slow: f64, coef_cross: f64) -> Vec<f64> {
    let Some(&first) = data.first() else {
        return Vec::new();
    };

    let mut fast = first;
    let mut slow = first;
    let mut cross = 0.0;

    data.iter()
        .map(|&x| {
            fast = coef_fast * x + (1.0 - coef_fast) * fast;
            slow = coef_slow * x + (1.0 - coef_slow) * slow;
            cross = coef_cross * (fast - slow) + (1.0 - coef_cross) * cross;
            cross
        })
        .collect()
}

/// Detect breaths from the crossings of a fast and a slow moving average
///
/// Each positive run of the crossing trace is one breath, placed at the
/// largest raw sample inside the run.
pub fn srmac(data: &[f64], fs: f64, config: &SrmacConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }

    let trace = crossing_trace(data, config.coef_fast(), config.coef_slow(), config.coef_cross());
    let detector = ZeroCrossingDetector::new(
        config.width_samples(fs),
        config.margin_samples(fs),
        config.threshold(),
    );
    let (_, peaks) = detector.find_peaks_with_reference(&trace, data);

    Detection {
        rate: find_rr_dist(&peaks, fs),
        peaks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_trace_constant_signal() {
        let trace = crossing_trace(&[2.0; 16], 0.9, 0.3, 0.2);
        assert_eq!(trace.len(), 16);
        assert!(trace.iter().all(|&v| v.abs() < 1e-12));
        assert!(crossing_trace(&[], 0.9, 0.3, 0.2).is_empty());
    }

    #[test]
    fn test_crossing_trace_step() {
        let mut data = vec![0.0; 4];
        data.extend([1.0; 4]);
        let trace = crossing_trace(&data, 0.9, 0.3, 0.2);

        // fast = 0.9, slow = 0.3 after the step: cross = 0.2 * 0.6
        assert!((trace[4] - 0.12).abs() < 1e-12);
        assert!(trace[4..].iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_srmac_degenerate() {
        let config = SrmacConfig::default();
        assert_eq!(srmac(&[], 64.0, &config), Detection::empty());
        assert_eq!(srmac(&[1.0], 64.0, &config), Detection::empty());
        assert_eq!(srmac(&[0.0; 128], 64.0, &config), Detection::empty());
    }
}
