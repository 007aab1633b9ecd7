mod measure;
mod noise;
mod signal;

pub use measure::{RateErrorStats, measure_error_across_rates, measure_rate};
pub use noise::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, NoiseConfig, apply_noise, generate_noisy_breathing,
    signal_power,
};
pub use signal::{BaselineDrift, BreathingSignal, Waveform};
