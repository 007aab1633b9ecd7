use std::fmt::Write;

use super::{FileReport, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &FileReport) -> String {
        if let Some(ref err) = report.error {
            return format!("{}: ERROR: {}", report.filename, err);
        }

        let mut out = String::new();
        let _ = write!(
            out,
            "{} [{}, {} Hz, {:.1} s]",
            report.filename, report.algorithm, report.sample_rate, report.duration_secs
        );

        if let Some(ref whole) = report.whole {
            let _ = write!(
                out,
                "\n  Rate: {:>5.1} breaths/min ({} breaths) sqi: {:.2}/{:.2}",
                whole.detection.rate,
                whole.detection.count(),
                whole.sqi_full,
                whole.sqi_lite
            );
        }

        if let Some(ref intervals) = report.intervals {
            let _ = write!(
                out,
                "\n  Interval: {:.2} ± {:.2} s (min {:.2}, max {:.2})",
                intervals.mean, intervals.std_dev, intervals.min, intervals.max
            );
        }

        if self.verbose {
            for window in &report.windows {
                let _ = write!(
                    out,
                    "\n  {:>8.1} s: {:>5.1} breaths/min ({} breaths) sqi: {:.2}/{:.2}",
                    window.start_secs,
                    window.detection.rate,
                    window.detection.count(),
                    window.sqi_full,
                    window.sqi_lite
                );
            }
        } else if !report.windows.is_empty() {
            let rates: Vec<f64> = report.windows.iter().map(|w| w.detection.rate).collect();
            let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
            let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let _ = write!(
                out,
                "\n  Windows: {} (rate {:.1} - {:.1} breaths/min)",
                rates.len(),
                min,
                max
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[test]
    fn test_text_summary() {
        let text = TextFormatter::new(false).format(&sample_report());
        assert!(text.starts_with("breath.wav [find_peaks, 10 Hz, 30.0 s]"));
        assert!(text.contains("Rate:  12.0 breaths/min (3 breaths)"));
        assert!(text.contains("Windows: 2 (rate 12.0 - 12.5 breaths/min)"));
    }

    #[test]
    fn test_text_verbose_lists_windows() {
        let text = TextFormatter::new(true).format(&sample_report());
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("10.0 s:  12.5 breaths/min"));
    }

    #[test]
    fn test_text_error() {
        let mut report = sample_report();
        report.error = Some("no such file".to_string());
        assert_eq!(
            TextFormatter::new(false).format(&report),
            "breath.wav: ERROR: no such file"
        );
    }
}
