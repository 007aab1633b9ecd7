use crate::config::{Algorithm, AnalysisConfig};
use crate::processing::RrProcessor;

use super::{BreathingSignal, NoiseConfig, generate_noisy_breathing};

/// Whole-signal rate reported for a simulated trace, `None` when nothing was detected
pub fn measure_rate(signal: &[f64], sample_rate: f64, config: &AnalysisConfig) -> Option<f64> {
    let processor = RrProcessor::new(config).ok()?;
    let result = processor.process_whole(signal, sample_rate).ok()?;
    (result.detection.rate > 0.0).then_some(result.detection.rate)
}

#[derive(Debug, Clone, Default)]
pub struct RateErrorStats {
    /// Largest absolute rate error in breaths per minute
    pub max_error: f64,
    pub mean_error: f64,
    /// Rates for which the detector reported nothing
    pub missed: usize,
}

/// Rate error of one detector over a set of breathing rates under the same noise
pub fn measure_error_across_rates(
    algorithm: Algorithm,
    template: &BreathingSignal,
    noise_config: &NoiseConfig,
    rates_bpm: &[f64],
) -> RateErrorStats {
    let config = AnalysisConfig {
        algorithm,
        ..Default::default()
    };

    let mut errors = Vec::with_capacity(rates_bpm.len());
    let mut missed = 0;

    for &rate_bpm in rates_bpm {
        let breathing = BreathingSignal {
            rate_bpm,
            ..template.clone()
        };
        let signal = generate_noisy_breathing(&breathing, noise_config);

        match measure_rate(&signal, breathing.sample_rate, &config) {
            Some(measured) => {
                log::debug!(
                    "{}: expected {:.2} measured {:.2} breaths/min",
                    algorithm,
                    rate_bpm,
                    measured
                );
                errors.push((measured - rate_bpm).abs());
            }
            None => missed += 1,
        }
    }

    let max_error = errors.iter().copied().fold(0.0, f64::max);
    let mean_error = if errors.is_empty() {
        0.0
    } else {
        errors.iter().sum::<f64>() / errors.len() as f64
    };

    RateErrorStats {
        max_error,
        mean_error,
        missed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_rate_clean_sine() {
        let signal = BreathingSignal::new(15.0, 25.0, 60.0).generate();
        let rate = measure_rate(&signal, 25.0, &AnalysisConfig::default()).unwrap();
        assert!((rate - 15.0).abs() < 0.1, "rate {}", rate);
    }

    #[test]
    fn test_measure_rate_nothing_detected() {
        let config = AnalysisConfig::default();
        assert_eq!(measure_rate(&[0.0; 100], 25.0, &config), None);
        assert_eq!(measure_rate(&[], 25.0, &config), None);
    }

    #[test]
    fn test_error_across_rates_clean() {
        let stats = measure_error_across_rates(
            Algorithm::FindPeaks,
            &BreathingSignal::new(15.0, 25.0, 60.0),
            &NoiseConfig::default(),
            &[10.0, 15.0, 20.0],
        );
        assert_eq!(stats.missed, 0);
        assert!(stats.max_error < 0.2, "max error {}", stats.max_error);
        assert!(stats.mean_error <= stats.max_error);
    }
}
