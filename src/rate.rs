use crate::constants::SECONDS_PER_MINUTE;

/// Rate from the mean distance between the first and last breath
///
/// `rate = 60 * fs * (P - 1) / (last - first)` in breaths per minute. Fewer
/// than two peaks, or peaks that all sit on the same sample, give 0.
pub fn find_rr_dist(peaks: &[usize], fs: f64) -> f64 {
    let (Some(&first), Some(&last)) = (peaks.first(), peaks.last()) else {
        return 0.0;
    };
    if peaks.len() < 2 || last <= first {
        return 0.0;
    }
    let duration = (last - first) as f64;
    SECONDS_PER_MINUTE * fs * (peaks.len() - 1) as f64 / duration
}

/// Estimated span of the breathing activity in samples
///
/// The first-to-last distance extended by half the mean breath spacing on
/// each side. Fewer than two peaks give 0.
pub fn respiration_window(peaks: &[usize]) -> f64 {
    if peaks.len() < 2 {
        return 0.0;
    }
    let first = peaks[0] as f64;
    let last = peaks[peaks.len() - 1] as f64;
    let avg_gap = (last - first) / (peaks.len() - 1) as f64;
    last - first + avg_gap
}

/// Rate from the number of breaths inside the estimated respiration window
///
/// The window is floored at 75% of `actual_window` (samples) so that a few
/// clustered peaks cannot produce an inflated rate.
pub fn find_rr(peaks: &[usize], fs: f64, actual_window: usize) -> f64 {
    if peaks.is_empty() || fs <= 0.0 {
        return 0.0;
    }
    let window = respiration_window(peaks).max(actual_window as f64 * 0.75);
    if window <= 0.0 {
        return 0.0;
    }
    SECONDS_PER_MINUTE * fs * peaks.len() as f64 / window
}
