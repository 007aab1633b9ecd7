use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RrError {
    #[error("Signal is empty")]
    EmptySignal,

    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f64),

    #[error("Invalid filter coefficients: {0}")]
    InvalidFilter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl RrError {
    /// Legacy numeric status for callers that still expect `(error_code, [])`.
    pub fn code(&self) -> i32 {
        -1
    }
}

pub type Result<T> = std::result::Result<T, RrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_maps_to_legacy_code() {
        let errors = [
            RrError::EmptySignal,
            RrError::InvalidSampleRate(0.0),
            RrError::InvalidFilter("a0 is zero".to_string()),
            RrError::Config("step must be positive".to_string()),
            RrError::UnknownAlgorithm("fourier".to_string()),
        ];
        for err in &errors {
            assert_eq!(err.code(), -1, "{}", err);
        }
        assert_eq!(
            RrError::InvalidSampleRate(-4.0).to_string(),
            "Sample rate must be positive, got -4"
        );
    }
}
