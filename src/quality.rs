use crate::signal_processing::math::{LengthPolicy, mean, pearson};

/// Segments of `raw` centred on each peak, or `None` if the peaks are unusable
fn segments<'a>(peaks: &[usize], raw: &'a [f64], max_interval: Option<usize>) -> Option<Vec<&'a [f64]>> {
    if peaks.len() < 2 || raw.is_empty() {
        return None;
    }

    if let Some(max) = max_interval
        && peaks.windows(2).any(|w| w[1].saturating_sub(w[0]) > max)
    {
        log::debug!("Peak spacing exceeds {} samples", max);
        return None;
    }

    let span = peaks[peaks.len() - 1].saturating_sub(peaks[0]);
    let half = span / peaks.len() / 2;
    if half == 0 {
        return None;
    }

    let segments: Vec<&[f64]> = peaks
        .iter()
        .filter(|&&p| p > half && p + half < raw.len())
        .map(|&p| &raw[p - half..p + half])
        .collect();

    (!segments.is_empty()).then_some(segments)
}

/// Mean correlation of each segment against the averaged segment
///
/// Segments are cut from `raw` around every peak; a regular breathing
/// signal scores close to 1.
///
/// Returns 0 with fewer than two peaks, an empty signal, no segment that
/// fits inside the signal, or any peak gap above `max_interval`.
pub fn sqi_full(peaks: &[usize], raw: &[f64], max_interval: Option<usize>) -> f64 {
    let Some(segments) = segments(peaks, raw, max_interval) else {
        return 0.0;
    };

    let len = segments[0].len();
    let template: Vec<f64> = (0..len)
        .map(|i| segments.iter().map(|s| s[i]).sum::<f64>() / segments.len() as f64)
        .collect();

    let coefs: Vec<f64> = segments
        .iter()
        .map(|s| pearson(s, &template, LengthPolicy::Truncate))
        .collect();
    mean(&coefs)
}

/// Mean correlation between each segment and the next one
///
/// Cheaper than [`sqi_full`]; needs at least two segments, otherwise 0.
pub fn sqi_lite(peaks: &[usize], raw: &[f64], max_interval: Option<usize>) -> f64 {
    let Some(segments) = segments(peaks, raw, max_interval) else {
        return 0.0;
    };
    if segments.len() < 2 {
        return 0.0;
    }

    let coefs: Vec<f64> = segments
        .windows(2)
        .map(|pair| pearson(pair[0], pair[1], LengthPolicy::Truncate))
        .collect();
    mean(&coefs)
}
