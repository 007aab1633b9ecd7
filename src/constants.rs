//! Numeric constants shared by the detectors
//!
//! Epsilons guard divisions in the correlation and rate code; the wavelet
//! constants fix the scale mapping used by both CWT detectors.

/// Denominators with a magnitude below this are treated as zero.
pub const DIVISION_EPSILON: f64 = 1e-12;

/// Centre frequency of the mother wavelet, used to map frequencies to scales.
pub const WAVELET_CENTRE_FREQUENCY: f64 = 0.25;

/// Seconds per minute, for breaths-per-minute conversions.
pub const SECONDS_PER_MINUTE: f64 = 60.0;
