//! Spectral feature extraction settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Divisor applied when reducing a band to a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureNormalization {
    /// Divide the band's peak/mean by the band length (damped, the shipped look)
    #[default]
    BandLength,

    /// Divide by 255, the largest possible bin value
    FullScale,
}

/// Spectrum frame layout and feature reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumParams {
    /// Bins per frame (half the analyser FFT size, >= 2)
    pub bin_count: usize,

    /// Feature divisor
    pub normalization: FeatureNormalization,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            bin_count: 256,
            normalization: FeatureNormalization::BandLength,
        }
    }
}

impl SpectrumParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bin_count < 2 {
            return Err(ConfigError::InvalidSpectrumSize {
                bins: self.bin_count,
            });
        }
        Ok(())
    }
}
