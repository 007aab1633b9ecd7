/// Threshold-run peak extractor
///
/// Turns a processed trace (smoothed difference, wavelet response, ...) into
/// discrete peak indices. Every maximal run of samples above `threshold`
/// that is at least `min_width` samples long contributes one peak, placed at
/// the largest value of an amplitude reference trace inside the run.
///
/// A run still open when the scan reaches the end is not reported.
#[derive(Debug, Clone, Copy)]
pub struct ZeroCrossingDetector {
    min_width: usize,
    margin: usize,
    threshold: f64,
}

impl ZeroCrossingDetector {
    /// Create a new extractor
    ///
    /// # Arguments
    /// * `min_width` - Minimum run length in samples (values below 1 act as 1)
    /// * `margin` - Samples ignored at each end of the trace
    /// * `threshold` - Level the trace must exceed to be inside a run
    pub fn new(min_width: usize, margin: usize, threshold: f64) -> Self {
        Self {
            min_width: min_width.max(1),
            margin,
            threshold,
        }
    }

    /// Find peaks using the trace as its own amplitude reference
    ///
    /// Returns `(count, peaks)` with peaks in ascending order.
    pub fn find_peaks(&self, trace: &[f64]) -> (usize, Vec<usize>) {
        self.find_peaks_with_reference(trace, trace)
    }

    /// Find peaks, placing each one at the maximum of `reference` in its run
    ///
    /// `reference` must have the same length as `trace`; otherwise nothing
    /// is reported.
    pub fn find_peaks_with_reference(&self, trace: &[f64], reference: &[f64]) -> (usize, Vec<usize>) {
        if trace.is_empty() || self.margin.saturating_mul(2) > trace.len() {
            return (0, Vec::new());
        }
        if reference.len() != trace.len() {
            log::warn!(
                "Reference trace length {} does not match trace length {}",
                reference.len(),
                trace.len()
            );
            return (0, Vec::new());
        }

        let mut peaks = Vec::new();
        let mut run_length = 0;
        let mut since_max = 0;
        let mut maximum = self.threshold;

        for i in self.margin..trace.len() - self.margin {
            since_max += 1;
            if trace[i] > self.threshold {
                run_length += 1;
                if reference[i] > maximum {
                    maximum = reference[i];
                    since_max = 0;
                }
            } else {
                if run_length >= self.min_width {
                    peaks.push(i.saturating_sub(since_max));
                }
                run_length = 0;
                since_max = 0;
                maximum = self.threshold;
            }
        }

        (peaks.len(), peaks)
    }
}
