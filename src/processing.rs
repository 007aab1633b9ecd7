use crate::config::{AlgorithmConfig, AnalysisConfig, secs_to_samples};
use crate::detectors::{Detection, run_algorithm};
use crate::error::{RrError, Result};
use crate::quality::{sqi_full, sqi_lite};
use crate::signal_processing::{SosFilter, z_norm};

/// Detection and quality scores for one analysis window
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WindowResult {
    /// First sample of the window in the full signal
    pub start_sample: usize,
    /// Window start in seconds
    pub start_secs: f64,
    /// Detector output; peak indices are relative to the window start
    pub detection: Detection,
    pub sqi_full: f64,
    pub sqi_lite: f64,
}

/// Sliding-window breathing rate analysis over a complete recording
///
/// Filters the whole signal once, then runs the configured detector on
/// windows of `window_secs` advanced by `step_secs`. Each call starts from
/// scratch; nothing is carried over between signals.
pub struct RrProcessor {
    config: AnalysisConfig,
    filter: Option<SosFilter>,
}

impl RrProcessor {
    /// # Errors
    /// Returns `RrError::InvalidFilter` for unusable filter sections and
    /// `RrError::Config` for a non-positive window or step.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        if !(config.window_secs > 0.0) {
            return Err(RrError::Config(format!(
                "window must be positive, got {} s",
                config.window_secs
            )));
        }
        if !(config.step_secs > 0.0) {
            return Err(RrError::Config(format!(
                "step must be positive, got {} s",
                config.step_secs
            )));
        }

        let filter = config
            .filter
            .as_deref()
            .map(SosFilter::new)
            .transpose()?;

        Ok(Self {
            config: config.clone(),
            filter,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn detector_config(&self) -> &AlgorithmConfig {
        &self.config.detectors
    }

    /// Apply the configured filter, if any
    pub fn prepare(&self, signal: &[f64]) -> Vec<f64> {
        match &self.filter {
            Some(filter) => filter.filter(signal),
            None => signal.to_vec(),
        }
    }

    fn detect(&self, window: &[f64], fs: f64) -> Result<Detection> {
        let input = if self.config.normalize {
            z_norm(window)
        } else {
            window.to_vec()
        };
        run_algorithm(&input, fs, self.config.algorithm, &self.config.detectors)
    }

    /// Run the detector once over the whole (filtered) signal
    pub fn process_whole(&self, signal: &[f64], fs: f64) -> Result<WindowResult> {
        validate(signal, fs)?;
        let filtered = self.prepare(signal);
        let detection = self.detect(&filtered, fs)?;
        Ok(WindowResult {
            start_sample: 0,
            start_secs: 0.0,
            sqi_full: sqi_full(&detection.peaks, &filtered, None),
            sqi_lite: sqi_lite(&detection.peaks, &filtered, None),
            detection,
        })
    }

    /// Run the detector over every analysis window
    ///
    /// A signal shorter than one window is analysed as a single window.
    ///
    /// # Errors
    /// Returns `RrError::EmptySignal` or `RrError::InvalidSampleRate` for
    /// unusable input.
    pub fn process_signal(&self, signal: &[f64], fs: f64) -> Result<Vec<WindowResult>> {
        validate(signal, fs)?;
        let filtered = self.prepare(signal);

        let window = secs_to_samples(self.config.window_secs, fs).clamp(1, filtered.len());
        let step = secs_to_samples(self.config.step_secs, fs).max(1);
        log::debug!(
            "Analysing {} samples in windows of {} stepping {}",
            filtered.len(),
            window,
            step
        );

        (0..=filtered.len() - window)
            .step_by(step)
            .map(|start| {
                let slice = &filtered[start..start + window];
                let detection = self.detect(slice, fs)?;
                Ok(WindowResult {
                    start_sample: start,
                    start_secs: start as f64 / fs,
                    sqi_full: sqi_full(&detection.peaks, slice, None),
                    sqi_lite: sqi_lite(&detection.peaks, slice, None),
                    detection,
                })
            })
            .collect()
    }
}

fn validate(signal: &[f64], fs: f64) -> Result<()> {
    if signal.is_empty() {
        return Err(RrError::EmptySignal);
    }
    if !(fs > 0.0 && fs.is_finite()) {
        return Err(RrError::InvalidSampleRate(fs));
    }
    Ok(())
}
