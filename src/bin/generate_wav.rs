use anyhow::{Context, Result};
use clap::Parser;
use rralg::save_wav;
use rralg::simulation::{BreathingSignal, NoiseConfig, Waveform, generate_noisy_breathing};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic breathing WAV files with configurable noise")]
struct Args {
    /// TOML noise configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Rates in breaths/min: comma-separated (e.g., "10,15,20") or range (e.g., "6-30:2")
    #[arg(short, long, default_value = "6-30:4")]
    rates: String,

    /// Number of trials per rate
    #[arg(short, long, default_value_t = 3)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 25)]
    sample_rate: u32,

    /// Breath shape
    #[arg(long, value_enum, default_value = "sine")]
    waveform: Waveform,

    /// Baseline drift amplitude (period set by --drift-period)
    #[arg(long)]
    drift: Option<f64>,

    /// Baseline drift period in seconds
    #[arg(long, default_value_t = 30.0)]
    drift_period: f64,

    /// Output filename prefix
    #[arg(long, default_value = "breath")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f64>,

    /// Impulse noise rate in Hz (CLI override)
    #[arg(long)]
    impulse_rate: Option<f64>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    awgn: Option<AwgnSection>,
    impulse: Option<ImpulseSection>,
}

#[derive(Debug, Deserialize)]
struct AwgnSection {
    snr_db: f64,
}

#[derive(Debug, Deserialize)]
struct ImpulseSection {
    rate_hz: f64,
    amplitude: f64,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    rate_bpm: f64,
    trial: u32,
    seed: u64,
    peaks: Vec<usize>,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    sample_rate: u32,
    duration: f64,
    waveform: String,
    files: Vec<ManifestEntry>,
}

fn parse_rates(s: &str) -> Result<Vec<f64>> {
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let step: f64 = parts[1].parse().context("Invalid step value")?;
        if step <= 0.0 {
            anyhow::bail!("Range step must be positive");
        }
        let range_parts: Vec<&str> = parts[0].split('-').collect();
        if range_parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let start: f64 = range_parts[0].parse().context("Invalid start value")?;
        let end: f64 = range_parts[1].parse().context("Invalid end value")?;

        let mut rates = Vec::new();
        let mut r = start;
        while r <= end {
            rates.push(r);
            r += step;
        }
        Ok(rates)
    } else {
        s.split(',')
            .map(|p| p.trim().parse::<f64>().context("Invalid rate value"))
            .collect()
    }
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_noise_config(toml: &TomlConfig, args: &Args, seed: u64) -> NoiseConfig {
    let mut config = NoiseConfig::default().with_seed(seed);

    if let Some(snr) = args.snr {
        config = config.with_awgn(snr);
    } else if let Some(ref awgn) = toml.awgn {
        config = config.with_awgn(awgn.snr_db);
    }

    if let Some(impulse_rate) = args.impulse_rate {
        config = config.with_impulse(impulse_rate, 1.0);
    } else if let Some(ref impulse) = toml.impulse {
        config = config.with_impulse(impulse.rate_hz, impulse.amplitude);
    }

    config
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let rates = parse_rates(&args.rates)?;
    let base_seed = args.seed.unwrap_or(0);

    let mut manifest_entries = Vec::new();
    let total_files = rates.len() * args.trials as usize;
    let mut file_count = 0;

    for &rate_bpm in &rates {
        let mut breathing =
            BreathingSignal::new(rate_bpm, args.sample_rate as f64, args.duration)
                .with_waveform(args.waveform);
        if let Some(amplitude) = args.drift {
            breathing = breathing.with_drift(amplitude, args.drift_period);
        }

        for trial in 0..args.trials {
            let seed = base_seed + trial as u64 * 1000 + (rate_bpm * 10.0) as u64;
            let noise_config = build_noise_config(&toml_config, &args, seed);
            log::debug!("{} bpm trial {}: {:?}", rate_bpm, trial, noise_config);

            let signal = generate_noisy_breathing(&breathing, &noise_config);

            let filename = format!("{}_r{:04.1}_t{:02}.wav", args.prefix, rate_bpm, trial);
            let filepath = args.output_dir.join(&filename);

            save_wav(&filepath, &signal, args.sample_rate)
                .with_context(|| format!("Failed to write {}", filepath.display()))?;

            manifest_entries.push(ManifestEntry {
                file: filename,
                rate_bpm,
                trial,
                seed,
                peaks: breathing.peak_indices(),
            });

            file_count += 1;
            eprint!("\rGenerating: {}/{}", file_count, total_files);
        }
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            sample_rate: args.sample_rate,
            duration: args.duration,
            waveform: format!("{:?}", args.waveform).to_lowercase(),
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        total_files,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates_comma_separated() {
        let rates = parse_rates("10, 15,20").unwrap();
        assert_eq!(rates, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_parse_rates_range() {
        let rates = parse_rates("6-18:4").unwrap();
        assert_eq!(rates, vec![6.0, 10.0, 14.0, 18.0]);
    }

    #[test]
    fn test_parse_rates_invalid() {
        assert!(parse_rates("6-18:0").is_err());
        assert!(parse_rates("6:2").is_err());
        assert!(parse_rates("ten").is_err());
    }

    #[test]
    fn test_cli_noise_overrides_toml() {
        let args = Args::parse_from(["generate_wav", "--snr", "5"]);
        let toml: TomlConfig = toml::from_str(
            r#"
            [awgn]
            snr_db = 20.0

            [impulse]
            rate_hz = 0.1
            amplitude = 0.5
            "#,
        )
        .unwrap();

        let config = build_noise_config(&toml, &args, 9);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.additive.map(|a| a.snr_db), Some(5.0));
        assert_eq!(config.impulse.map(|i| i.amplitude), Some(0.5));
    }
}
