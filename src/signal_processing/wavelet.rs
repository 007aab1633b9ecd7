use crate::constants::WAVELET_CENTRE_FREQUENCY;
use crate::error::RrError;
use crate::signal_processing::math::linspace;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Mother wavelet used to build convolution kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Wavelet {
    /// Second-order Gaussian derivative
    #[default]
    Gaus2,
    /// Mexican hat (Ricker)
    Mexh,
}

impl Wavelet {
    /// Evaluate the unscaled mother wavelet at `t`
    pub fn mother(self, t: f64) -> f64 {
        match self {
            Wavelet::Gaus2 => gaus2(t),
            Wavelet::Mexh => mexh(t),
        }
    }

    /// Evaluate the wavelet shifted by `tau` and dilated by `scale`
    ///
    /// Normalized by `1 / sqrt(scale)`. A zero scale is meaningless and
    /// yields 0.
    pub fn evaluate(self, t: f64, tau: f64, scale: f64) -> f64 {
        if scale == 0.0 {
            log::warn!("Wavelet scale cannot be zero");
            return 0.0;
        }
        self.mother((t - tau) / scale) / scale.sqrt()
    }

    /// Sample the scaled wavelet at unit spacing over `length` points
    ///
    /// Sample `k` sits at `t = k - length / 2`, so the kernel is centred on
    /// its midpoint.
    pub fn kernel(self, scale: f64, length: usize) -> Vec<f64> {
        let offset = (length / 2) as f64;
        (0..length)
            .map(|k| self.evaluate(k as f64 - offset, 0.0, scale))
            .collect()
    }
}

impl fmt::Display for Wavelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wavelet::Gaus2 => write!(f, "gaus2"),
            Wavelet::Mexh => write!(f, "mexh"),
        }
    }
}

impl FromStr for Wavelet {
    type Err = RrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gaus2" => Ok(Wavelet::Gaus2),
            "mexh" => Ok(Wavelet::Mexh),
            other => Err(RrError::Config(format!("unknown wavelet '{}'", other))),
        }
    }
}

/// Second-order Gaussian wavelet
pub fn gaus2(t: f64) -> f64 {
    (2.0 / 3f64.sqrt()) * (2.0 / PI).powf(0.25) * (-t * t).exp() * (1.0 - 2.0 * t * t)
}

/// Mexican hat wavelet
pub fn mexh(t: f64) -> f64 {
    (2.0 / 3f64.sqrt()) * (1.0 / PI).powf(0.25) * (-t * t / 2.0).exp() * (1.0 - t * t)
}

/// Wavelet scales covering `[f_min, f_max]` Hz in `resolution` linear steps
///
/// Each scale is the wavelet centre frequency divided by the normalized
/// frequency `f / fs`.
pub fn scales(fs: f64, f_min: f64, f_max: f64, resolution: usize) -> Vec<f64> {
    linspace(f_min, f_max, resolution)
        .into_iter()
        .map(|f| WAVELET_CENTRE_FREQUENCY / (f / fs))
        .collect()
}
