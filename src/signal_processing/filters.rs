use crate::error::{RrError, Result};

/// One second-order section: `[b0, b1, b2, a0, a1, a2]`
pub type SosSection = [f64; 6];

/// Cascade of second-order (biquad) sections applied one after another
///
/// Coefficients are designed elsewhere and handed in ready to use. Each
/// section runs in direct form I over the whole signal before the next
/// section starts.
#[derive(Debug, Clone)]
pub struct SosFilter {
    sections: Vec<SosSection>,
}

impl SosFilter {
    /// Create a filter from a list of sections
    ///
    /// Coefficients are normalized by `a0`.
    ///
    /// # Errors
    /// Returns `RrError::InvalidFilter` if there are no sections or any
    /// section has a zero `a0`.
    pub fn new(sections: &[SosSection]) -> Result<Self> {
        if sections.is_empty() {
            return Err(RrError::InvalidFilter("no sections".to_string()));
        }

        let mut normalized = Vec::with_capacity(sections.len());
        for (i, section) in sections.iter().enumerate() {
            let a0 = section[3];
            if a0 == 0.0 || !a0.is_finite() {
                return Err(RrError::InvalidFilter(format!(
                    "section {} has a0 = {}",
                    i, a0
                )));
            }
            let mut s = *section;
            for c in s.iter_mut() {
                *c /= a0;
            }
            normalized.push(s);
        }

        Ok(Self {
            sections: normalized,
        })
    }

    pub fn sections(&self) -> &[SosSection] {
        &self.sections
    }

    /// Filter a complete signal, returning the filtered copy
    ///
    /// Signals shorter than three samples are returned unchanged. The first
    /// sample primes each section's input history and passes through as is.
    pub fn filter(&self, signal: &[f64]) -> Vec<f64> {
        let mut y = signal.to_vec();
        if y.len() < 3 {
            return y;
        }

        for &[b0, b1, b2, _, a1, a2] in &self.sections {
            let (mut x1, mut x2) = (y[0], y[0]);
            let (mut y1, mut y2) = (0.0, 0.0);

            for sample in y.iter_mut().skip(1) {
                let x0 = *sample;
                let y0 = b0 * x0 + b1 * x1 + b2 * x2 - a1 * y1 - a2 * y2;
                *sample = y0;
                x2 = x1;
                x1 = x0;
                y2 = y1;
                y1 = y0;
            }
        }

        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: SosSection = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

    #[test]
    fn test_sos_rejects_bad_sections() {
        assert!(SosFilter::new(&[]).is_err());
        assert!(SosFilter::new(&[[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]]).is_err());
    }

    #[test]
    fn test_sos_identity() {
        let filter = SosFilter::new(&[IDENTITY, IDENTITY]).unwrap();
        let signal = vec![0.5, -1.0, 2.0, 3.0, -4.0];
        assert_eq!(filter.filter(&signal), signal);
    }

    #[test]
    fn test_sos_short_signal_passes_through() {
        let filter = SosFilter::new(&[[0.5, 0.5, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(filter.filter(&[1.0, 2.0]), vec![1.0, 2.0]);
        assert!(filter.filter(&[]).is_empty());
    }

    #[test]
    fn test_sos_normalizes_by_a0() {
        let filter = SosFilter::new(&[[2.0, 0.0, 0.0, 2.0, 0.0, 0.0]]).unwrap();
        assert_eq!(filter.sections()[0], IDENTITY);
    }

    #[test]
    fn test_sos_two_tap_average() {
        // y[n] = (x[n] + x[n-1]) / 2, history primed with x[0]
        let filter = SosFilter::new(&[[0.5, 0.5, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        let out = filter.filter(&[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(out, vec![2.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_sos_feedback_section() {
        // y[n] = x[n] + 0.5 * y[n-1]
        let filter = SosFilter::new(&[[1.0, 0.0, 0.0, 1.0, -0.5, 0.0]]).unwrap();
        let out = filter.filter(&[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(out, vec![0.0, 1.0, 0.5, 0.25]);
    }
}
