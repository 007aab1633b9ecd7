//! Wavelet convolution breath detectors
//!
//! The signal is convolved with a bank of scaled wavelets spanning the
//! breathing band, the responses are averaged across scales, and each run of
//! the averaged response above the threshold becomes one breath.
//!
//! The direct variant does one large FFT convolution per scale. The
//! overlap-add variant splits the signal into kernel-length blocks and
//! convolves them with small FFTs, accumulating the overlapping tails; both
//! produce the same response.

use super::{Detection, usable};
use crate::config::CwtConfig;
use crate::rate::find_rr_dist;
use crate::signal_processing::fft::{fft, ifft, to_complex_padded};
use crate::signal_processing::wavelet;
use crate::signal_processing::zero_crossing_detector::ZeroCrossingDetector;
use num_complex::Complex64;

const CWT_THRESHOLD: f64 = 0.1;
const CWT_OA_THRESHOLD: f64 = 0.0;
const MAX_FFT_SIZE: usize = isize::MAX as usize / std::mem::size_of::<Complex64>();

/// One sampled kernel per scale, or `None` if the configuration is unusable
fn kernel_bank(fs: f64, config: &CwtConfig) -> Option<Vec<Vec<f64>>> {
    let resolution = config.resolution();
    let (f_min, f_max) = (config.min_freq(), config.max_freq());
    if resolution == 0 || f_min <= 0.0 || f_max <= 0.0 {
        log::warn!(
            "Unusable wavelet frequency set: {} scales over {}..{} Hz",
            resolution,
            f_min,
            f_max
        );
        return None;
    }

    let length = config.kernel_samples(fs);
    if length == 0 {
        log::warn!("Wavelet kernel is shorter than one sample");
        return None;
    }
    if padded_size(length, length).is_none() {
        log::warn!("Wavelet kernel of {} samples is too long", length);
        return None;
    }

    let shape = config.wavelet();
    let kernels = wavelet::scales(fs, f_min, f_max, resolution)
        .into_iter()
        .map(|scale| shape.kernel(scale, length))
        .collect();
    Some(kernels)
}

/// Power-of-two FFT size holding a linear convolution of `a` and `b` samples
fn padded_size(a: usize, b: usize) -> Option<usize> {
    a.checked_add(b)?
        .checked_sub(1)?
        .checked_next_power_of_two()
        .filter(|&size| size <= MAX_FFT_SIZE)
}

fn average(rows: &[Vec<f64>], len: usize) -> Vec<f64> {
    let mut avg = vec![0.0; len];
    for row in rows {
        for (a, v) in avg.iter_mut().zip(row) {
            *a += v;
        }
    }
    let count = rows.len() as f64;
    avg.iter_mut().for_each(|a| *a /= count);
    avg
}

/// Scale-averaged wavelet response, one FFT convolution per scale
///
/// The response is aligned with the input: sample `i` is the convolution
/// centred on input sample `i`.
pub fn response(data: &[f64], fs: f64, config: &CwtConfig) -> Option<Vec<f64>> {
    if data.is_empty() {
        return None;
    }
    let kernels = kernel_bank(fs, config)?;
    let n = data.len();
    let length = kernels[0].len();
    let Some(size) = padded_size(n, length) else {
        log::warn!("Cannot convolve {} samples with a {} sample kernel", n, length);
        return None;
    };

    let mut spectrum = to_complex_padded(data, size);
    fft(&mut spectrum);

    let rows: Vec<Vec<f64>> = kernels
        .iter()
        .map(|kernel| {
            let mut product = to_complex_padded(kernel, size);
            fft(&mut product);
            for (k, s) in product.iter_mut().zip(&spectrum) {
                *k *= s;
            }
            ifft(&mut product);
            product[length / 2..length / 2 + n].iter().map(|c| c.re).collect()
        })
        .collect();

    Some(average(&rows, n))
}

/// Scale-averaged wavelet response computed block-wise with overlap-add
pub fn response_overlap_add(data: &[f64], fs: f64, config: &CwtConfig) -> Option<Vec<f64>> {
    if data.is_empty() {
        return None;
    }
    let kernels = kernel_bank(fs, config)?;
    let n = data.len();
    let length = kernels[0].len();
    let size = padded_size(length, length)?;
    let blocks = n.div_ceil(length);

    let block_spectra: Vec<Vec<Complex64>> = data
        .chunks(length)
        .map(|block| {
            let mut spectrum = to_complex_padded(block, size);
            fft(&mut spectrum);
            spectrum
        })
        .collect();

    let rows: Vec<Vec<f64>> = kernels
        .iter()
        .map(|kernel| {
            let mut kernel_spectrum = to_complex_padded(kernel, size);
            fft(&mut kernel_spectrum);

            let mut accumulated = vec![0.0; (blocks + 1) * length];
            for (b, block) in block_spectra.iter().enumerate() {
                let mut product: Vec<Complex64> =
                    block.iter().zip(&kernel_spectrum).map(|(x, k)| x * k).collect();
                ifft(&mut product);
                for (j, c) in product.iter().take(2 * length).enumerate() {
                    accumulated[b * length + j] += c.re;
                }
            }
            accumulated[length / 2..length / 2 + n].to_vec()
        })
        .collect();

    Some(average(&rows, n))
}

fn detect(data: &[f64], fs: f64, config: &CwtConfig, trace: Option<Vec<f64>>, threshold: f64) -> Detection {
    let Some(trace) = trace else {
        return Detection::empty();
    };
    let detector = ZeroCrossingDetector::new(
        config.width_samples(fs),
        config.margin_samples(fs),
        config.threshold_or(threshold),
    );
    let (_, peaks) = detector.find_peaks(&trace);
    log::debug!("cwt: {} breaths in {} samples", peaks.len(), data.len());

    Detection {
        rate: find_rr_dist(&peaks, fs),
        peaks,
    }
}

/// Detect breaths in the scale-averaged wavelet response
pub fn cwt(data: &[f64], fs: f64, config: &CwtConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }
    detect(data, fs, config, response(data, fs, config), CWT_THRESHOLD)
}

/// Detect breaths in the wavelet response computed with overlap-add
pub fn cwt_overlap_add(data: &[f64], fs: f64, config: &CwtConfig) -> Detection {
    if !usable(data, fs) {
        return Detection::empty();
    }
    detect(data, fs, config, response_overlap_add(data, fs, config), CWT_OA_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::math::linspace;
    use crate::signal_processing::wavelet::Wavelet;
    use std::f64::consts::PI;

    fn sine() -> Vec<f64> {
        linspace(0.0, 4.0 * PI, 256).iter().map(|t| t.sin()).collect()
    }

    fn breathing_band() -> CwtConfig {
        CwtConfig {
            resolution: Some(5),
            threshold: Some(0.0),
            width: Some(0.1),
            min_freq: Some(0.5),
            max_freq: Some(4.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_response_matches_direct_convolution() {
        let data: Vec<f64> = (0..40).map(|i| ((i * 3) % 11) as f64 - 5.0).collect();
        let fs = 4.0;
        let config = CwtConfig {
            resolution: Some(1),
            min_freq: Some(0.5),
            max_freq: Some(0.5),
            kernel_size: Some(2.0),
            ..Default::default()
        };
        let kernel = Wavelet::Gaus2.kernel(0.25 / (0.5 / fs), 8);
        let trace = response(&data, fs, &config).unwrap();

        for (i, &value) in trace.iter().enumerate() {
            // Full convolution sample i + len/2
            let k = i + 4;
            let expected: f64 = (0..kernel.len())
                .filter(|&m| m <= k && k - m < data.len())
                .map(|m| kernel[m] * data[k - m])
                .sum();
            assert!((value - expected).abs() < 1e-9, "sample {}: {} != {}", i, value, expected);
        }
    }

    #[test]
    fn test_overlap_add_matches_direct() {
        let data = sine();
        let config = breathing_band();
        let direct = response(&data, 64.0, &config).unwrap();
        let blocked = response_overlap_add(&data, 64.0, &config).unwrap();

        assert_eq!(direct.len(), data.len());
        assert_eq!(blocked.len(), data.len());
        for (i, (a, b)) in direct.iter().zip(&blocked).enumerate() {
            assert!((a - b).abs() < 1e-9, "sample {}: {} != {}", i, a, b);
        }
    }

    #[test]
    fn test_overlap_add_partial_last_block() {
        let data: Vec<f64> = sine().into_iter().take(200).collect();
        let config = breathing_band();
        let direct = response(&data, 64.0, &config).unwrap();
        let blocked = response_overlap_add(&data, 64.0, &config).unwrap();
        for (a, b) in direct.iter().zip(&blocked) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cwt_sine() {
        let data = sine();
        for detection in [
            cwt(&data, 64.0, &breathing_band()),
            cwt_overlap_add(&data, 64.0, &breathing_band()),
        ] {
            assert!(detection.rate > 0.0);
            assert!(!detection.peaks.is_empty());
        }
    }

    #[test]
    fn test_cwt_unusable_frequencies() {
        let config = CwtConfig {
            resolution: Some(0),
            ..Default::default()
        };
        assert_eq!(cwt(&sine(), 64.0, &config), Detection::empty());

        let config = CwtConfig {
            min_freq: Some(0.0),
            ..Default::default()
        };
        assert_eq!(cwt_overlap_add(&sine(), 64.0, &config), Detection::empty());
    }

    #[test]
    fn test_cwt_oversized_kernel_and_margin() {
        let config = CwtConfig {
            kernel_size: Some(1e300),
            ..Default::default()
        };
        assert!(response(&sine(), 64.0, &config).is_none());
        assert!(response_overlap_add(&sine(), 64.0, &config).is_none());
        assert_eq!(cwt(&sine(), 64.0, &config), Detection::empty());

        let config = CwtConfig {
            margin: Some(1e300),
            ..breathing_band()
        };
        assert_eq!(cwt_overlap_add(&sine(), 64.0, &config), Detection::empty());
    }

    #[test]
    fn test_cwt_degenerate() {
        let config = CwtConfig::default();
        assert_eq!(cwt(&[], 64.0, &config), Detection::empty());
        assert_eq!(cwt(&[1.0], 64.0, &config), Detection::empty());
        assert_eq!(cwt_overlap_add(&[0.0; 128], 64.0, &config), Detection::empty());
    }
}
