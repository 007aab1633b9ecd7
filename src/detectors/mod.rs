pub mod counting;
pub mod cwt;
pub mod find_peaks;
pub mod srmac;
pub mod terma;

pub use counting::{count_adv, count_orig};
pub use cwt::{cwt, cwt_overlap_add};
pub use find_peaks::find_peaks;
pub use srmac::srmac;
pub use terma::terma;

use crate::config::{Algorithm, AlgorithmConfig};
use crate::error::{RrError, Result};

/// Outcome of one detector run
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Detection {
    /// Breathing rate in breaths per minute
    pub rate: f64,
    /// Breath indices in ascending order
    pub peaks: Vec<usize>,
}

impl Detection {
    /// No breaths found: rate 0 and no peaks
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.peaks.len()
    }
}

/// Detector entry point shared by every dispatchable algorithm
pub type DetectorFn = fn(&[f64], f64, &AlgorithmConfig) -> Detection;

/// Whether a detector can run at all on this input
pub(crate) fn usable(data: &[f64], fs: f64) -> bool {
    if data.is_empty() {
        log::debug!("Empty signal, nothing to detect");
        return false;
    }
    if !(fs > 0.0 && fs.is_finite()) {
        log::debug!("Invalid sample rate {}", fs);
        return false;
    }
    true
}

impl Algorithm {
    /// Detector function for this algorithm
    pub fn detector(self) -> DetectorFn {
        match self {
            Algorithm::FindPeaks => |data, fs, config| find_peaks(data, fs, &config.find_peaks),
            Algorithm::Cwt => |data, fs, config| cwt(data, fs, &config.cwt),
            Algorithm::CwtOverlapAdd => |data, fs, config| cwt_overlap_add(data, fs, &config.cwt_oa),
            Algorithm::Srmac => |data, fs, config| srmac(data, fs, &config.srmac),
            Algorithm::Terma => |data, fs, config| terma(data, fs, &config.terma),
        }
    }
}

/// Validate the input and run the selected detector
///
/// # Errors
/// Returns `RrError::EmptySignal` for an empty signal and
/// `RrError::InvalidSampleRate` for a non-positive or non-finite sample rate.
pub fn run_algorithm(
    data: &[f64],
    fs: f64,
    algorithm: Algorithm,
    config: &AlgorithmConfig,
) -> Result<Detection> {
    if data.is_empty() {
        return Err(RrError::EmptySignal);
    }
    if !(fs > 0.0 && fs.is_finite()) {
        return Err(RrError::InvalidSampleRate(fs));
    }

    let detection = (algorithm.detector())(data, fs, config);
    log::debug!(
        "{}: {} peaks, {:.2} breaths/min over {} samples",
        algorithm,
        detection.count(),
        detection.rate,
        data.len()
    );
    Ok(detection)
}
