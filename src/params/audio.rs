//! Audio analysis configuration and constants.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Byte-spectrum analyser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2, produces fft_size / 2 bins)
    pub fft_size: usize,

    /// Analysis update interval (milliseconds)
    /// 16 ms ≈ one analysis per 60 Hz display frame
    pub update_interval_ms: u64,

    /// Exponential smoothing between successive spectra (0 = none, 1 = frozen)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            update_interval_ms: 16,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of bins in each published frame
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 4 {
            return Err(ConfigError::invalid(
                "fft_size",
                format!("must be a power of 2 and at least 4, got {}", self.fft_size),
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::invalid(
                "smoothing_time_constant",
                format!("must be in [0, 1], got {}", self.smoothing_time_constant),
            ));
        }
        if !self.min_decibels.is_finite()
            || !self.max_decibels.is_finite()
            || self.min_decibels >= self.max_decibels
        {
            return Err(ConfigError::invalid(
                "min_decibels",
                format!(
                    "must be finite and below max_decibels ({} >= {})",
                    self.min_decibels, self.max_decibels
                ),
            ));
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::invalid("update_interval_ms", "must be > 0"));
        }
        Ok(())
    }
}

/// Audio source and initial transport state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioParams {
    /// WAV file to loop; the built-in synth plays when unset
    pub file: Option<PathBuf>,

    /// Initial linear gain (0 = silent, 1 = unity, max 2)
    pub gain: f32,

    /// Start with playback paused
    pub start_paused: bool,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            file: None,
            gain: 1.0,
            start_paused: false,
        }
    }
}

impl AudioParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=audio_constants::MAX_GAIN).contains(&self.gain) {
            return Err(ConfigError::invalid(
                "gain",
                format!("must be in [0, {}], got {}", audio_constants::MAX_GAIN, self.gain),
            ));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Upper gain bound
    pub const MAX_GAIN: f32 = 2.0;

    /// Gain change per key press
    pub const GAIN_STEP: f32 = 0.1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyser_yields_256_bins() {
        let config = AnalyserConfig::default();
        assert_eq!(config.bin_count(), 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let config = AnalyserConfig {
            fft_size: 500,
            ..AnalyserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_decibel_range() {
        let config = AnalyserConfig {
            min_decibels: -30.0,
            max_decibels: -100.0,
            ..AnalyserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gain_bounds() {
        let loud = AudioParams {
            gain: 2.5,
            ..AudioParams::default()
        };
        assert!(loud.validate().is_err());
        assert!(AudioParams::default().validate().is_ok());
    }
}
