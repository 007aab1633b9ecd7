//! Detector and analysis configuration.
//!
//! Every tunable parameter is an `Option`; `None` selects the documented
//! default, so any subset of parameters can be overridden independently.
//! Time parameters are given in seconds and converted to samples with the
//! sample rate of the signal being analysed.
//!
//! ## Packed parameter arrays
//!
//! Older callers pass parameters as a flat array where a negative slot means
//! "use the default". Each detector config can import such an array with
//! `from_packed`:
//!
//! ```
//! use rralg::config::SrmacConfig;
//!
//! let config = SrmacConfig::from_packed(&[-1.0, 0.4, -1.0, 0.0]);
//! assert_eq!(config.coef_fast, None);
//! assert_eq!(config.coef_slow, Some(0.4));
//! assert_eq!(config.threshold, Some(0.0));
//! assert_eq!(config.width, None);
//! ```

use crate::error::RrError;
use crate::signal_processing::filters::SosSection;
use crate::signal_processing::wavelet::Wavelet;
use std::fmt;
use std::str::FromStr;

/// Read slot `index` of a packed array, treating negative or missing values as unset
fn slot(args: &[f64], index: usize) -> Option<f64> {
    args.get(index).copied().filter(|v| *v >= 0.0)
}

/// Convert a duration in seconds to a whole number of samples (truncating)
pub fn secs_to_samples(secs: f64, fs: f64) -> usize {
    (secs * fs).max(0.0) as usize
}

/// Breath detector selectable through the dispatcher
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Prominence, width and proximity filtered local maxima
    #[default]
    #[value(name = "find_peaks")]
    FindPeaks,
    /// Multi-scale wavelet convolution
    Cwt,
    /// Wavelet convolution computed block-wise with overlap-add
    #[value(name = "cwt_oa")]
    #[serde(rename = "cwt_oa")]
    CwtOverlapAdd,
    /// Fast/slow EWMA crossing
    Srmac,
    /// Event/cycle moving-average trend subtraction
    Terma,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::FindPeaks,
        Algorithm::Cwt,
        Algorithm::CwtOverlapAdd,
        Algorithm::Srmac,
        Algorithm::Terma,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::FindPeaks => "find_peaks",
            Algorithm::Cwt => "cwt",
            Algorithm::CwtOverlapAdd => "cwt_oa",
            Algorithm::Srmac => "srmac",
            Algorithm::Terma => "terma",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Algorithm {
    type Err = RrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" | "find_peaks" => Ok(Algorithm::FindPeaks),
            "cwt" => Ok(Algorithm::Cwt),
            "cwt_oa" => Ok(Algorithm::CwtOverlapAdd),
            "srmac" => Ok(Algorithm::Srmac),
            "terma" => Ok(Algorithm::Terma),
            other => Err(RrError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Prominence-based peak detector parameters
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindPeaksConfig {
    /// Minimum prominence on both sides of a peak (default 0.6)
    pub prominence: Option<f64>,
    /// Fraction of the smaller prominence below the peak at which width is measured (default 0.8)
    pub heval_ratio: Option<f64>,
    /// Minimum peak width in seconds (default 0.3)
    pub width: Option<f64>,
    /// Minimum distance between peaks in seconds (default 1.0)
    pub proximity: Option<f64>,
}

impl FindPeaksConfig {
    pub fn from_packed(args: &[f64]) -> Self {
        Self {
            prominence: slot(args, 0),
            heval_ratio: slot(args, 1),
            width: slot(args, 2),
            proximity: slot(args, 4),
        }
    }

    pub fn prominence(&self) -> f64 {
        self.prominence.unwrap_or(0.6)
    }

    pub fn heval_ratio(&self) -> f64 {
        self.heval_ratio.unwrap_or(0.8)
    }

    pub fn width_samples(&self, fs: f64) -> f64 {
        self.width.unwrap_or(0.3) * fs
    }

    pub fn proximity_samples(&self, fs: f64) -> f64 {
        self.proximity.unwrap_or(1.0) * fs
    }
}

/// SRMAC (dual EWMA crossing) parameters
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SrmacConfig {
    /// Fast EWMA coefficient (default 0.9)
    pub coef_fast: Option<f64>,
    /// Slow EWMA coefficient (default 0.3)
    pub coef_slow: Option<f64>,
    /// Coefficient smoothing the fast/slow difference (default 0.2)
    pub coef_cross: Option<f64>,
    /// Crossing threshold (default 0.005)
    pub threshold: Option<f64>,
    /// Minimum run width in seconds (default 0.5)
    pub width: Option<f64>,
    /// Margin ignored at both ends in seconds (default 0)
    pub margin: Option<f64>,
}

impl SrmacConfig {
    pub fn from_packed(args: &[f64]) -> Self {
        Self {
            coef_fast: slot(args, 0),
            coef_slow: slot(args, 1),
            coef_cross: slot(args, 2),
            threshold: slot(args, 3),
            width: slot(args, 4),
            margin: slot(args, 5),
        }
    }

    pub fn coef_fast(&self) -> f64 {
        self.coef_fast.unwrap_or(0.9)
    }

    pub fn coef_slow(&self) -> f64 {
        self.coef_slow.unwrap_or(0.3)
    }

    pub fn coef_cross(&self) -> f64 {
        self.coef_cross.unwrap_or(0.2)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(0.005)
    }

    pub fn width_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.width.unwrap_or(0.5), fs)
    }

    pub fn margin_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.margin.unwrap_or(0.0), fs)
    }
}

/// TERMA (trend subtraction) parameters
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TermaConfig {
    /// Event moving-average window in seconds (default 1.0)
    pub window_event: Option<f64>,
    /// Cycle moving-average window in seconds (default 3.0)
    pub window_cycle: Option<f64>,
    /// Weight of the signal mean added to the cycle average (default 0.5)
    pub b_coef: Option<f64>,
    /// Minimum run width in seconds (default 0.7)
    pub width: Option<f64>,
    /// Margin ignored at both ends in seconds (default 0)
    pub margin: Option<f64>,
}

impl TermaConfig {
    pub fn from_packed(args: &[f64]) -> Self {
        Self {
            window_event: slot(args, 0),
            window_cycle: slot(args, 1),
            b_coef: slot(args, 2),
            width: slot(args, 3),
            margin: slot(args, 4),
        }
    }

    pub fn event_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.window_event.unwrap_or(1.0), fs)
    }

    pub fn cycle_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.window_cycle.unwrap_or(3.0), fs)
    }

    pub fn b_coef(&self) -> f64 {
        self.b_coef.unwrap_or(0.5)
    }

    pub fn width_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.width.unwrap_or(0.7), fs)
    }

    pub fn margin_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.margin.unwrap_or(0.0), fs)
    }
}

/// Peak/trough cycle counting parameters
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountOrigConfig {
    /// Maximum number of troughs between two peaks of a valid cycle (default 1)
    pub max_troughs: Option<usize>,
    /// Percentile of peak heights the threshold is based on (default 75)
    pub percentile: Option<f64>,
    /// Multiplier applied to the percentile (default 0.2)
    pub th_coef: Option<f64>,
}

impl CountOrigConfig {
    pub fn from_packed(args: &[f64]) -> Self {
        Self {
            max_troughs: slot(args, 0).map(|v| v as usize),
            percentile: slot(args, 1),
            th_coef: slot(args, 2),
        }
    }

    pub fn max_troughs(&self) -> usize {
        self.max_troughs.unwrap_or(1)
    }

    pub fn percentile(&self) -> f64 {
        self.percentile.unwrap_or(75.0)
    }

    pub fn th_coef(&self) -> f64 {
        self.th_coef.unwrap_or(0.2)
    }
}

/// Extrema-elimination counting parameters
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountAdvConfig {
    /// Percentile of neighbouring extrema differences (default 75)
    pub percentile: Option<f64>,
    /// Multiplier applied to the percentile (default 0.8)
    pub th_coef: Option<f64>,
}

impl CountAdvConfig {
    pub fn from_packed(args: &[f64]) -> Self {
        Self {
            percentile: slot(args, 1),
            th_coef: slot(args, 2),
        }
    }

    pub fn percentile(&self) -> f64 {
        self.percentile.unwrap_or(75.0)
    }

    pub fn th_coef(&self) -> f64 {
        self.th_coef.unwrap_or(0.8)
    }
}

/// Wavelet convolution parameters, shared by the direct and overlap-add detectors
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CwtConfig {
    /// Number of scales (default 15)
    pub resolution: Option<usize>,
    /// Threshold on the scale-averaged response (default 0.1 direct, 0.0 overlap-add)
    pub threshold: Option<f64>,
    /// Minimum run width in seconds (default 0.5)
    pub width: Option<f64>,
    /// Margin ignored at both ends in seconds (default 0)
    pub margin: Option<f64>,
    /// Lowest analysed frequency in Hz (default 0.02)
    pub min_freq: Option<f64>,
    /// Highest analysed frequency in Hz (default 0.73)
    pub max_freq: Option<f64>,
    /// Kernel support in seconds (default 2.0)
    pub kernel_size: Option<f64>,
    /// Mother wavelet (default gaus2)
    pub wavelet: Option<Wavelet>,
}

impl CwtConfig {
    pub fn from_packed(args: &[f64]) -> Self {
        Self {
            resolution: slot(args, 0).map(|v| v as usize),
            threshold: slot(args, 1),
            width: slot(args, 2),
            margin: slot(args, 3),
            min_freq: slot(args, 4),
            max_freq: slot(args, 5),
            kernel_size: slot(args, 6),
            wavelet: None,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution.unwrap_or(15)
    }

    pub fn threshold_or(&self, default: f64) -> f64 {
        self.threshold.unwrap_or(default)
    }

    pub fn width_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.width.unwrap_or(0.5), fs)
    }

    pub fn margin_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.margin.unwrap_or(0.0), fs)
    }

    pub fn min_freq(&self) -> f64 {
        self.min_freq.unwrap_or(0.02)
    }

    pub fn max_freq(&self) -> f64 {
        self.max_freq.unwrap_or(0.73)
    }

    pub fn kernel_samples(&self, fs: f64) -> usize {
        secs_to_samples(self.kernel_size.unwrap_or(2.0), fs)
    }

    pub fn wavelet(&self) -> Wavelet {
        self.wavelet.unwrap_or_default()
    }
}

/// Parameters for every detector
///
/// The dispatcher picks the section matching the selected algorithm.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlgorithmConfig {
    pub find_peaks: FindPeaksConfig,
    pub srmac: SrmacConfig,
    pub terma: TermaConfig,
    pub count_orig: CountOrigConfig,
    pub count_adv: CountAdvConfig,
    pub cwt: CwtConfig,
    pub cwt_oa: CwtConfig,
}

impl AlgorithmConfig {
    /// Build a config where only `algorithm` takes parameters from a packed array
    pub fn from_packed(algorithm: Algorithm, args: &[f64]) -> Self {
        let mut config = Self::default();
        match algorithm {
            Algorithm::FindPeaks => config.find_peaks = FindPeaksConfig::from_packed(args),
            Algorithm::Cwt => config.cwt = CwtConfig::from_packed(args),
            Algorithm::CwtOverlapAdd => config.cwt_oa = CwtConfig::from_packed(args),
            Algorithm::Srmac => config.srmac = SrmacConfig::from_packed(args),
            Algorithm::Terma => config.terma = TermaConfig::from_packed(args),
        }
        config
    }
}

/// Windowed analysis configuration
///
/// Can be loaded from TOML:
///
/// ```
/// use rralg::config::{Algorithm, AnalysisConfig};
///
/// let config: AnalysisConfig = toml::from_str(r#"
///     algorithm = "srmac"
///     window_secs = 30.0
///
///     [detectors.srmac]
///     threshold = 0.0
/// "#).unwrap();
/// assert_eq!(config.algorithm, Algorithm::Srmac);
/// assert_eq!(config.step_secs, 1.0);
/// assert_eq!(config.detectors.srmac.threshold, Some(0.0));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Detector run on each window
    pub algorithm: Algorithm,
    /// Analysis window length in seconds
    pub window_secs: f64,
    /// Distance between window starts in seconds
    pub step_secs: f64,
    /// Z-normalize each window before detection
    pub normalize: bool,
    /// Second-order sections applied to the whole signal before windowing
    pub filter: Option<Vec<SosSection>>,
    /// Per-detector parameters
    pub detectors: AlgorithmConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            window_secs: 40.0,
            step_secs: 1.0,
            normalize: true,
            filter: None,
            detectors: AlgorithmConfig::default(),
        }
    }
}
