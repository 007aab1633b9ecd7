use super::{FileReport, Formatter, iso8601_timestamp};
use crate::processing::WindowResult;

pub struct CsvFormatter;

fn row(ts: &str, report: &FileReport, start: &str, result: &WindowResult) -> String {
    format!(
        "{},{},{},{},{:.3},{},{:.4},{:.4},",
        ts,
        report.filename,
        report.algorithm,
        start,
        result.detection.rate,
        result.detection.count(),
        result.sqi_full,
        result.sqi_lite
    )
}

impl Formatter for CsvFormatter {
    /// One row for the whole signal (`window_start_s` empty) followed by one
    /// row per window
    fn format(&self, report: &FileReport) -> String {
        let ts = iso8601_timestamp();

        if let Some(ref err) = report.error {
            return format!(
                "{},{},{},,,,,,{}",
                ts,
                report.filename,
                report.algorithm,
                err.replace(',', ";")
            );
        }

        let mut rows = Vec::with_capacity(report.windows.len() + 1);
        if let Some(ref whole) = report.whole {
            rows.push(row(&ts, report, "", whole));
        }
        for window in &report.windows {
            rows.push(row(&ts, report, &format!("{:.2}", window.start_secs), window));
        }
        rows.join("\n")
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,filename,algorithm,window_start_s,rate_bpm,breaths,sqi_full,sqi_lite,error")
    }
}
