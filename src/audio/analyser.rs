//! Byte spectrum analysis and its background thread.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;
use crate::params::AnalyserConfig;
use crate::spectrum::SharedSpectrum;

/// Turns the latest `fft_size` samples into `fft_size / 2` bytes.
///
/// Windowed magnitudes are smoothed against the previous analysis, then
/// mapped from `[min_decibels, max_decibels]` onto `0..=255`.
pub struct ByteSpectrumAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Most recent samples, oldest first
    history: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl ByteSpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.fft_size;
        let bins = config.bin_count();

        let mut planner = FftPlanner::new();
        Ok(Self {
            fft: planner.plan_fft_forward(size),
            window: (0..size).map(|i| blackman_window(i, size)).collect(),
            history: vec![0.0; size],
            scratch: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; bins],
            bytes: vec![0; bins],
            config,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.bytes.len()
    }

    /// Append mono samples, keeping only the newest `fft_size`
    pub fn push_samples(&mut self, samples: &[f32]) {
        let size = self.history.len();
        if samples.len() >= size {
            self.history
                .copy_from_slice(&samples[samples.len() - size..]);
        } else {
            self.history.rotate_left(samples.len());
            self.history[size - samples.len()..].copy_from_slice(samples);
        }
    }

    /// Analyse the current history and return the byte frame
    pub fn analyse(&mut self) -> &[u8] {
        let size = self.config.fft_size as f32;
        for ((out, &sample), &w) in self.scratch.iter_mut().zip(&self.history).zip(&self.window) {
            *out = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let tau = self.config.smoothing_time_constant;
        let min_db = self.config.min_decibels;
        let db_range = self.config.max_decibels - min_db;

        for ((smoothed, byte), bin) in self
            .smoothed
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .zip(&self.scratch)
        {
            let magnitude = bin.norm() / size;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;

            // log10(0) is -inf, which clamps to 0
            let db = 20.0 * smoothed.log10();
            let scaled = 255.0 * (db - min_db) / db_range;
            *byte = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }

        &self.bytes
    }
}

/// Blackman window function for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}

/// Spawn analysis thread.
///
/// Every `update_interval_ms` it drains samples queued by the audio
/// callback and publishes a new frame. With nothing queued (paused or
/// stalled output) the last published frame stays in place.
pub fn spawn_analysis_thread(
    mut analyser: ByteSpectrumAnalyser,
    interval: Duration,
    pending: Arc<Mutex<Vec<f32>>>,
    spectrum: SharedSpectrum,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut fresh = Vec::new();
        let mut frames: u64 = 0;

        while running.load(Ordering::Relaxed) {
            thread::sleep(interval);

            {
                let mut queue = pending.lock().unwrap_or_else(|e| e.into_inner());
                std::mem::swap(&mut fresh, &mut *queue);
            }
            if fresh.is_empty() {
                continue;
            }

            analyser.push_samples(&fresh);
            fresh.clear();
            spectrum.publish(analyser.analyse());

            frames += 1;
            if frames % 600 == 0 {
                debug!(frames, "spectrum frames published");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyser() -> ByteSpectrumAnalyser {
        ByteSpectrumAnalyser::new(AnalyserConfig::default()).unwrap()
    }

    fn sine(bin: usize, amplitude: f32, size: usize) -> Vec<f32> {
        (0..size)
            .map(|n| amplitude * (2.0 * PI * bin as f32 * n as f32 / size as f32).sin())
            .collect()
    }

    #[test]
    fn test_blackman_window() {
        let size = 512;

        // Zero at the start, peak of 1 at the centre
        assert!(blackman_window(0, size).abs() < 1e-6);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 1e-6);
        assert!(blackman_window(size / 4, size) < blackman_window(size / 2, size));
    }

    #[test]
    fn test_silence_is_all_zero() {
        let mut analyser = analyser();
        analyser.push_samples(&vec![0.0; 512]);
        let frame = analyser.analyse();
        assert_eq!(frame.len(), 256);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let config = AnalyserConfig {
            smoothing_time_constant: 0.0,
            ..AnalyserConfig::default()
        };
        let mut analyser = ByteSpectrumAnalyser::new(config).unwrap();
        // Quiet enough that the main lobe stays below full scale
        analyser.push_samples(&sine(32, 0.05, 512));
        let frame = analyser.analyse().to_vec();

        let peak = frame
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 32);
        assert!(frame[32] > frame[31]);
        assert!(frame[32] > frame[33]);
        assert!(frame[128] < frame[32] / 2);
    }

    #[test]
    fn test_smoothing_decays_gradually() {
        let mut analyser = analyser();
        for _ in 0..20 {
            analyser.push_samples(&sine(40, 0.05, 512));
            analyser.analyse();
        }
        let loud = analyser.analyse()[40];

        analyser.push_samples(&vec![0.0; 512]);
        let after_one = analyser.analyse()[40];
        assert!(after_one > 0);
        assert!(after_one < loud);
    }

    #[test]
    fn test_short_pushes_shift_history() {
        let mut analyser = analyser();
        analyser.push_samples(&[1.0, 2.0]);
        analyser.push_samples(&[3.0]);
        assert_eq!(&analyser.history[509..], &[1.0, 2.0, 3.0]);

        let long: Vec<f32> = (0..600).map(|i| i as f32).collect();
        analyser.push_samples(&long);
        assert_eq!(analyser.history[0], 88.0);
        assert_eq!(analyser.history[511], 599.0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalyserConfig {
            fft_size: 300,
            ..AnalyserConfig::default()
        };
        assert!(ByteSpectrumAnalyser::new(config).is_err());
    }
}
