mod csv;
mod json;
mod text;

use chrono::Utc;
use rolling_stats::Stats;
use serde::Serialize;

use crate::processing::WindowResult;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Summary of the spacing between consecutive breaths, in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl IntervalSummary {
    /// Interval statistics for ascending breath indices, `None` with fewer than two
    pub fn from_peaks(peaks: &[usize], fs: f64) -> Option<Self> {
        let mut stats: Stats<f64> = Stats::new();
        for pair in peaks.windows(2) {
            stats.update((pair[1] - pair[0]) as f64 / fs);
        }
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Everything the analyzer reports for one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub filename: String,
    pub algorithm: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub whole: Option<WindowResult>,
    pub intervals: Option<IntervalSummary>,
    pub windows: Vec<WindowResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Report for a file that could not be analysed
    pub fn failed(filename: String, algorithm: String, error: String) -> Self {
        Self {
            filename,
            algorithm,
            sample_rate: 0,
            duration_secs: 0.0,
            whole: None,
            intervals: None,
            windows: Vec::new(),
            error: Some(error),
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, report: &FileReport) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
