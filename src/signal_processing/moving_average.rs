/// Fixed-capacity moving sum over a circular buffer
///
/// Holds the most recent `capacity` values together with their running sum.
/// Each push overwrites the oldest slot, subtracting the evicted value from
/// the sum and adding the new one, so the sum always equals the total of the
/// buffer contents without rescanning it.
///
/// The average divides by the full capacity, so slots that have never been
/// written count as zeros.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    buffer: Vec<f64>,
    index: usize,
    sum: f64,
}

impl MovingAverage {
    /// Create a zero-filled moving average
    ///
    /// # Arguments
    /// * `window_size` - Number of samples in the window (at least 1)
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: vec![0.0; window_size.max(1)],
            index: 0,
            sum: 0.0,
        }
    }

    /// Create a window centred on the start of `signal`
    ///
    /// The first `window_size / 2` slots are zeros (samples before the start
    /// of the signal) and the rest hold the leading samples of `signal`, so
    /// the window covers `[-window_size / 2, window_size - window_size / 2)`.
    /// The write pointer ends up back on the oldest slot.
    pub fn centered(window_size: usize, signal: &[f64]) -> Self {
        let mut ma = Self::new(window_size);
        let half = ma.capacity() / 2;
        for i in 0..ma.capacity() {
            let value = if i < half {
                0.0
            } else {
                signal.get(i - half).copied().unwrap_or(0.0)
            };
            ma.push(value);
        }
        ma
    }

    /// Overwrite the oldest value and return it
    pub fn push(&mut self, value: f64) -> f64 {
        let evicted = self.buffer[self.index];
        self.buffer[self.index] = value;
        self.sum = self.sum - evicted + value;
        self.index = (self.index + 1) % self.buffer.len();
        evicted
    }

    /// Running sum of the window
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum divided by the window capacity
    pub fn average(&self) -> f64 {
        self.sum / self.buffer.len() as f64
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let mut ma = MovingAverage::new(3);

        ma.push(1.0);
        assert!((ma.average() - 1.0 / 3.0).abs() < 1e-12);
        ma.push(2.0);
        ma.push(3.0);
        assert!((ma.average() - 2.0).abs() < 1e-12);
        assert_eq!(ma.push(4.0), 1.0); // (2+3+4)/3
        assert!((ma.average() - 3.0).abs() < 1e-12);
        assert_eq!(ma.push(5.0), 2.0); // (3+4+5)/3
        assert!((ma.average() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_running_sum_matches_contents() {
        let mut ma = MovingAverage::new(4);
        let values = [0.5, -1.25, 3.0, 2.0, 7.5, -0.5, 1.0, 4.25, -2.0];
        for (i, &v) in values.iter().enumerate() {
            ma.push(v);
            let start = (i + 1).saturating_sub(4);
            let expected: f64 = values[start..=i].iter().sum();
            assert!(
                (ma.sum() - expected).abs() < 1e-9,
                "step {}: sum {} != {}",
                i,
                ma.sum(),
                expected
            );
        }
    }

    #[test]
    fn test_centered_seed() {
        let signal = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut ma = MovingAverage::centered(4, &signal);
        // Window holds [0, 0, 1, 2]
        assert!((ma.sum() - 3.0).abs() < 1e-12);
        // Oldest slot (a leading zero) is evicted first
        assert_eq!(ma.push(3.0), 0.0);
        assert!((ma.sum() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let ma = MovingAverage::new(0);
        assert_eq!(ma.capacity(), 1);
    }
}
