use serde::Serialize;

use super::{FileReport, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(Serialize)]
struct Line<'a> {
    ts: String,
    #[serde(flatten)]
    report: &'a FileReport,
}

impl Formatter for JsonFormatter {
    /// One JSON object per line
    fn format(&self, report: &FileReport) -> String {
        let line = Line {
            ts: iso8601_timestamp(),
            report,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| {
            format!(
                r#"{{"ts":"{}","filename":{:?},"error":"serialization failed: {}"}}"#,
                line.ts, report.filename, e
            )
        })
    }
}
