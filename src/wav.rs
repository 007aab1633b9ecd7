use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Write a mono 32-bit float WAV file
pub fn save_wav<P: AsRef<Path>>(path: P, samples: &[f64], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Read the first channel of a WAV file
///
/// Integer samples are scaled to ±1. Returns the samples and the sample rate.
pub fn read_wav<P: AsRef<Path>>(path: P) -> anyhow::Result<(Vec<f64>, u32)> {
    let mut reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = 2_i64.pow(spec.bits_per_sample as u32 - 1) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    if channels > 1 {
        log::info!(
            "{}: using channel 1 of {}",
            path.as_ref().display(),
            channels
        );
    }
    let samples = interleaved.into_iter().step_by(channels).collect();
    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let path = std::env::temp_dir().join(format!("rralg_wav_{}.wav", std::process::id()));
        let samples: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin() * 0.5).collect();

        save_wav(&path, &samples, 25).unwrap();
        let (read, sample_rate) = read_wav(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(sample_rate, 25);
        assert_eq!(read.len(), samples.len());
        for (a, b) in read.iter().zip(&samples) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_read_first_channel_of_int_stereo() {
        let path = std::env::temp_dir().join(format!("rralg_stereo_{}.wav", std::process::id()));
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (left, right) in [(16384i16, -1i16), (-16384, -1), (0, -1)] {
            writer.write_sample(left).unwrap();
            writer.write_sample(right).unwrap();
        }
        writer.finalize().unwrap();

        let (read, _) = read_wav(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(read, vec![0.5, -0.5, 0.0]);
    }
}
