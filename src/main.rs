use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use rralg::config::{Algorithm, AnalysisConfig};
use rralg::output::{FileReport, IntervalSummary, OutputFormat, create_formatter};
use rralg::{RrProcessor, read_wav};

#[derive(Parser, Debug)]
#[command(name = "rralg")]
#[command(about = "Estimate breathing rate from respiratory WAV recordings", long_about = None)]
struct Args {
    /// WAV files to analyze (first channel is used)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Breath detector (overrides the config file)
    #[arg(short = 'a', long, value_enum)]
    algorithm: Option<Algorithm>,

    /// TOML analysis config
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Analysis window in seconds
    #[arg(short = 'w', long)]
    window: Option<f64>,

    /// Step between windows in seconds
    #[arg(short = 's', long)]
    step: Option<f64>,

    /// Skip z-normalization of each window
    #[arg(long)]
    no_normalize: bool,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(args: &Args) -> anyhow::Result<AnalysisConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(window) = args.window {
        config.window_secs = window;
    }
    if let Some(step) = args.step {
        config.step_secs = step;
    }
    if args.no_normalize {
        config.normalize = false;
    }
    Ok(config)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn analyze_file(path: &Path, processor: &RrProcessor) -> FileReport {
    let filename = display_name(path);
    let algorithm = processor.config().algorithm.to_string();

    match analyze_file_impl(path, processor) {
        Ok(report) => report,
        Err(e) => {
            log::warn!("{}: {:#}", filename, e);
            FileReport::failed(filename, algorithm, format!("{:#}", e))
        }
    }
}

fn analyze_file_impl(path: &Path, processor: &RrProcessor) -> anyhow::Result<FileReport> {
    let (samples, sample_rate) =
        read_wav(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let fs = sample_rate as f64;
    log::info!(
        "{}: {} samples at {} Hz",
        path.display(),
        samples.len(),
        sample_rate
    );

    let whole = processor.process_whole(&samples, fs)?;
    let windows = processor.process_signal(&samples, fs)?;

    Ok(FileReport {
        filename: display_name(path),
        algorithm: processor.config().algorithm.to_string(),
        sample_rate,
        duration_secs: samples.len() as f64 / fs,
        intervals: IntervalSummary::from_peaks(&whole.detection.peaks, fs),
        whole: Some(whole),
        windows,
        error: None,
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(&args)?;
    let processor = RrProcessor::new(&config).context("Invalid analysis config")?;
    log::info!(
        "Algorithm {}, window {} s, step {} s",
        config.algorithm,
        config.window_secs,
        config.step_secs
    );

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    for path in &args.files {
        let report = analyze_file(path, &processor);
        println!("{}", formatter.format(&report));
    }

    Ok(())
}
