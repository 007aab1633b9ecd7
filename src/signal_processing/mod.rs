pub mod extrema;
pub mod fft;
pub mod filters;
pub mod math;
pub mod moving_average;
pub mod wavelet;
pub mod zero_crossing_detector;

pub use extrema::{local_maxima, local_maxima_ord, local_minima};
pub use filters::{SosFilter, SosSection};
pub use math::{LengthPolicy, linspace, mean, pearson, percentile, rmse, std_dev, z_norm};
pub use moving_average::MovingAverage;
pub use wavelet::Wavelet;
pub use zero_crossing_detector::ZeroCrossingDetector;
