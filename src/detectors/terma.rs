use super::{Detection, usable};
use crate::config::TermaConfig;
use crate::rate::find_rr_dist;
use crate::signal_processing::math::mean;
use crate::signal_processing::moving_average::MovingAverage;
use crate::signal_processing::zero_crossing_detector::ZeroCrossingDetector;

/// Event average minus cycle average minus `b_coef` times the signal mean
///
/// Each average starts with `len / 2` zeros ahead of the signal and then
/// advances by taking in the sample `len / 2` past the current one (zero
/// past the end), which centres even-length windows on the current sample.
/// An odd-length window takes in sample `len / 2` twice and trails the
/// centre by one sample after the first output. Returns `None` if a window is empty or longer than the signal.
pub fn trend_trace(data: &[f64], event_len: usize, cycle_len: usize, b_coef: f64) -> Option<Vec<f64>> {
    let n = data.len();
    if event_len == 0 || cycle_len == 0 || event_len > n || cycle_len > n {
        return None;
    }

    let mut event = MovingAverage::centered(event_len, data);
    let mut cycle = MovingAverage::centered(cycle_len, data);
    let event_half = event_len / 2;
    let cycle_half = cycle_len / 2;
    let offset = b_coef * mean(data);

    let trace = (0..n)
        .map(|i| {
            let value = event.average() - (cycle.average() + offset);
            event.push(data.get(i + event_half).copied().unwrap_or(0.0));
            cycle.push(data.get(i + cycle_half).copied().unwrap_or(0.0));
            value
        })
        .collect();
    Some(trace)
}

/// Detect breaths where the short-term average rises above the trend
pub fn terma(data: &[f64], fs: f64, config: &TermaConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }

    let event_len = config.event_samples(fs);
    let cycle_len = config.cycle_samples(fs);
    let Some(trace) = trend_trace(data, event_len, cycle_len, config.b_coef()) else {
        log::debug!(
            "terma: windows of {} and {} samples do not fit {} samples",
            event_len,
            cycle_len,
            data.len()
        );
        return Detection::empty();
    };

    let detector = ZeroCrossingDetector::new(config.width_samples(fs), config.margin_samples(fs), 0.0);
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
    fn test_trend_trace_window_guard() {
        let data = [1.0; 10];
        assert!(trend_trace(&data, 11, 3, 0.5).is_none());
        assert!(trend_trace(&data, 3, 11, 0.5).is_none());
        assert!(trend_trace(&data, 0, 3, 0.5).is_none());
        assert!(trend_trace(&data, 3, 10, 0.5).is_some());
    }

    #[test]
    fn test_trend_trace_matches_centred_averages() {
        let data: Vec<f64> = (0..20).map(|i| ((i * 5) % 7) as f64).collect();
        let (w1, w2, b) = (4, 8, 0.5);
        let trace = trend_trace(&data, w1, w2, b).unwrap();
        let offset = b * mean(&data);

        let centred = |i: usize, w: usize| -> f64 {
            let start = i as isize - (w / 2) as isize;
            (start..start + w as isize)
                .filter(|&k| k >= 0 && (k as usize) < data.len())
                .map(|k| data[k as usize])
                .sum::<f64>()
                / w as f64
        };

        for (i, &value) in trace.iter().enumerate() {
            let expected = centred(i, w1) - (centred(i, w2) + offset);
            assert!(
                (value - expected).abs() < 1e-9,
                "sample {}: {} != {}",
                i,
                value,
                expected
            );
        }
    }

    #[test]
    fn test_trend_trace_odd_windows_trail_by_one() {
        // Seeding already holds sample len/2, so it is pushed twice and the
        // window sits one sample behind centre from then on
        let data = [1.0, 2.0, 4.0, 8.0, 16.0];
        let trace = trend_trace(&data, 3, 5, 0.0).unwrap();

        let event_sums = [3.0, 5.0, 8.0, 14.0, 28.0];
        let cycle_sums = [7.0, 11.0, 19.0, 34.0, 32.0];
        for i in 0..data.len() {
            let expected = event_sums[i] / 3.0 - cycle_sums[i] / 5.0;
            assert!(
                (trace[i] - expected).abs() < 1e-9,
                "sample {}: {} != {}",
                i,
                trace[i],
                expected
            );
        }
    }

    #[test]
    fn test_terma_short_signal() {
        let config = TermaConfig::default();
        // Default cycle window is 3 s
        assert_eq!(terma(&[0.5; 100], 64.0, &config), Detection::empty());
        assert_eq!(terma(&[], 64.0, &config), Detection::empty());
    }
}
