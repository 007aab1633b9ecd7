use crate::constants::DIVISION_EPSILON;

/// How two sequences of different length are reconciled before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Cut both sequences to the shorter length
    #[default]
    Truncate,
    /// Extend the shorter sequence with zeros
    ZeroPad,
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile with linear interpolation between the two closest ranks
///
/// `p` is in percent (0-100) and is clamped to that range. Returns 0 for an
/// empty slice.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// `n` evenly spaced values from `start` to `stop`, both ends included
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Zero-mean, unit-variance normalization
///
/// A constant signal only has its mean removed.
pub fn z_norm(signal: &[f64]) -> Vec<f64> {
    let m = mean(signal);
    let sd = std_dev(signal);
    if sd != 0.0 {
        signal.iter().map(|v| (v - m) / sd).collect()
    } else {
        signal.iter().map(|v| v - m).collect()
    }
}

fn reconcile(x: &[f64], y: &[f64], policy: LengthPolicy) -> (Vec<f64>, Vec<f64>) {
    if x.len() == y.len() {
        return (x.to_vec(), y.to_vec());
    }
    match policy {
        LengthPolicy::Truncate => {
            log::debug!(
                "Truncating sequences of length {} and {} to match",
                x.len(),
                y.len()
            );
            let n = x.len().min(y.len());
            (x[..n].to_vec(), y[..n].to_vec())
        }
        LengthPolicy::ZeroPad => {
            log::debug!(
                "Zero-padding sequences of length {} and {} to match",
                x.len(),
                y.len()
            );
            let n = x.len().max(y.len());
            let mut xp = x.to_vec();
            let mut yp = y.to_vec();
            xp.resize(n, 0.0);
            yp.resize(n, 0.0);
            (xp, yp)
        }
    }
}

/// Pearson correlation coefficient
///
/// Returns 0 when either input is empty or either sequence has no variance.
pub fn pearson(x: &[f64], y: &[f64], policy: LengthPolicy) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }
    let (x, y) = reconcile(x, y, policy);

    let mx = mean(&x);
    let my = mean(&y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mx;
        let dy = b - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = var_x.sqrt() * var_y.sqrt();
    if denominator.abs() < DIVISION_EPSILON {
        return 0.0;
    }
    cov / denominator
}

/// Root-mean-square error between two sequences
pub fn rmse(x: &[f64], y: &[f64], policy: LengthPolicy) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }
    let (x, y) = reconcile(x, y, policy);
    if x.is_empty() {
        return 0.0;
    }
    let sum: f64 = x.iter().zip(y.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
    (sum / x.len() as f64).sqrt()
}
