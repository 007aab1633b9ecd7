pub mod config;
pub mod constants;
pub mod detectors;
pub mod error;
pub mod output;
pub mod processing;
pub mod quality;
pub mod rate;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{Algorithm, AlgorithmConfig, AnalysisConfig};
pub use detectors::{Detection, run_algorithm};
pub use error::{Result, RrError};
pub use processing::{RrProcessor, WindowResult};
pub use wav::{read_wav, save_wav};
