//! Mono sample sources feeding the output stream.

use std::path::Path;

use tracing::info;

use crate::error::AudioError;

/// Endless mono sample stream pulled by the audio callback
pub trait SampleSource: Send {
    fn next_sample(&mut self) -> f32;
}

/// WAV file decoded up front and played in a loop.
///
/// Channels are averaged to mono. The file is resampled to the device rate
/// with linear interpolation.
#[derive(Debug, Clone)]
pub struct WavLoop {
    samples: Vec<f32>,
    /// Source frames advanced per output sample
    step: f64,
    position: f64,
}

impl WavLoop {
    /// Decode `path` for playback at `output_rate`
    pub fn open(path: &Path, output_rate: u32) -> Result<Self, AudioError> {
        let open_err = |source| AudioError::OpenFile {
            path: path.to_path_buf(),
            source,
        };
        let reader = hound::WavReader::open(path).map_err(open_err)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(open_err)?,
            hound::SampleFormat::Int => {
                let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(open_err)?
            }
        };

        let samples = downmix(&interleaved, spec.channels as usize);
        if samples.is_empty() {
            return Err(AudioError::EmptyFile(path.to_path_buf()));
        }

        info!(
            "Audio file: {} ({} ch @ {}Hz, {:.1}s)",
            path.display(),
            spec.channels,
            spec.sample_rate,
            samples.len() as f32 / spec.sample_rate as f32
        );

        Ok(Self::from_samples(samples, spec.sample_rate, output_rate))
    }

    /// Loop already-decoded mono samples
    pub fn from_samples(samples: Vec<f32>, source_rate: u32, output_rate: u32) -> Self {
        Self {
            samples,
            step: source_rate as f64 / output_rate as f64,
            position: 0.0,
        }
    }
}

impl SampleSource for WavLoop {
    fn next_sample(&mut self) -> f32 {
        let len = self.samples.len();
        if len == 0 {
            return 0.0;
        }

        let index = self.position as usize;
        let frac = (self.position - index as f64) as f32;
        let a = self.samples[index % len];
        let b = self.samples[(index + 1) % len];

        self.position += self.step;
        if self.position >= len as f64 {
            self.position -= len as f64;
        }

        a + (b - a) * frac
    }
}

/// Average interleaved frames down to one channel
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_loop_wraps_around() {
        let mut source = WavLoop::from_samples(vec![0.1, 0.2, 0.3], 48_000, 48_000);
        let played: Vec<f32> = (0..7).map(|_| source.next_sample()).collect();
        assert_eq!(played, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]);
    }

    #[test]
    fn test_upsampling_interpolates() {
        let mut source = WavLoop::from_samples(vec![0.0, 1.0], 24_000, 48_000);
        assert_eq!(source.next_sample(), 0.0);
        assert_eq!(source.next_sample(), 0.5);
        assert_eq!(source.next_sample(), 1.0);
    }

    #[test]
    fn test_stereo_file_is_downmixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, &[16384, 0, -16384, -16384]);

        let mut source = WavLoop::open(&path, 8000).unwrap();
        assert_eq!(source.samples.len(), 2);
        assert!((source.next_sample() - 0.25).abs() < 1e-6);
        assert!((source.next_sample() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 1, &[]);
        assert!(matches!(
            WavLoop::open(&path, 8000),
            Err(AudioError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = WavLoop::open(Path::new("/nonexistent/loop.wav"), 8000).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/loop.wav"));
    }
}
