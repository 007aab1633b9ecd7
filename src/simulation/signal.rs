use std::f64::consts::PI;

/// Shape of a single breath cycle
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Pure sinusoid, peak a quarter period after each cycle start
    #[default]
    Sine,
    /// Raised-cosine inhale followed by a slower exhale
    Asymmetric,
}

/// Slow sinusoidal baseline wander added on top of the breathing
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct BaselineDrift {
    pub amplitude: f64,
    pub period_secs: f64,
}

/// Synthetic breathing trace at a fixed rate
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct BreathingSignal {
    pub rate_bpm: f64,
    pub amplitude: f64,
    pub sample_rate: f64,
    pub duration_secs: f64,
    pub waveform: Waveform,
    /// Fraction of the cycle spent inhaling (asymmetric waveform only)
    pub inhale_fraction: f64,
    pub drift: Option<BaselineDrift>,
}

impl Default for BreathingSignal {
    fn default() -> Self {
        Self {
            rate_bpm: 15.0,
            amplitude: 1.0,
            sample_rate: 25.0,
            duration_secs: 60.0,
            waveform: Waveform::Sine,
            inhale_fraction: 0.4,
            drift: None,
        }
    }
}

impl BreathingSignal {
    pub fn new(rate_bpm: f64, sample_rate: f64, duration_secs: f64) -> Self {
        Self {
            rate_bpm,
            sample_rate,
            duration_secs,
            ..Default::default()
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_inhale_fraction(mut self, inhale_fraction: f64) -> Self {
        self.inhale_fraction = inhale_fraction;
        self
    }

    pub fn with_drift(mut self, amplitude: f64, period_secs: f64) -> Self {
        self.drift = Some(BaselineDrift {
            amplitude,
            period_secs,
        });
        self
    }

    pub fn num_samples(&self) -> usize {
        (self.duration_secs * self.sample_rate).max(0.0) as usize
    }

    /// Breath period in seconds, infinite for a zero rate
    pub fn period_secs(&self) -> f64 {
        if self.rate_bpm > 0.0 {
            60.0 / self.rate_bpm
        } else {
            f64::INFINITY
        }
    }

    /// Sample indices of the breath peaks (end of inhalation)
    pub fn peak_indices(&self) -> Vec<usize> {
        let period = self.period_secs();
        if !period.is_finite() || self.sample_rate <= 0.0 {
            return Vec::new();
        }
        let offset = match self.waveform {
            Waveform::Sine => 0.25,
            Waveform::Asymmetric => self.inhale_fraction.clamp(0.05, 0.95),
        };
        let n = self.num_samples();
        (0..)
            .map(|k| ((k as f64 + offset) * period * self.sample_rate).round() as usize)
            .take_while(|&i| i < n)
            .collect()
    }

    /// Cycle value in [-1, 1] for a phase in [0, 1)
    fn shape(&self, phase: f64) -> f64 {
        match self.waveform {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Asymmetric => {
                // Starts at the trough; the peak sits at the inhale fraction
                let r = self.inhale_fraction.clamp(0.05, 0.95);
                if phase < r {
                    -(PI * phase / r).cos()
                } else {
                    (PI * (phase - r) / (1.0 - r)).cos()
                }
            }
        }
    }

    pub fn generate(&self) -> Vec<f64> {
        let n = self.num_samples();
        if self.sample_rate <= 0.0 {
            return Vec::new();
        }
        let breath_hz = self.rate_bpm / 60.0;

        (0..n)
            .map(|i| {
                let t = i as f64 / self.sample_rate;
                let phase = (breath_hz * t).fract();
                let mut value = self.amplitude * self.shape(phase);
                if let Some(drift) = self.drift
                    && drift.period_secs > 0.0
                {
                    value += drift.amplitude * (2.0 * PI * t / drift.period_secs).sin();
                }
                value
            })
            .collect()
    }
}
