//! Top-level application configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalyserConfig, AudioParams, CameraPreset, MorphParams, RenderConfig, SpectrumParams};
use crate::error::ConfigError;

/// Every tunable the application reads at startup.
///
/// Each section falls back to its defaults, so a config file only needs the
/// keys it changes:
///
/// ```toml
/// [morph]
/// base_radius = 12.0
///
/// [camera]
/// kind = "orbit"
/// distance = 80.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub morph: MorphParams,
    pub spectrum: SpectrumParams,
    pub analyser: AnalyserConfig,
    pub audio: AudioParams,
    pub render: RenderConfig,
    pub camera: CameraPreset,
}

impl AppConfig {
    /// Read a config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every section plus the cross-section constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.morph.validate()?;
        self.spectrum.validate()?;
        self.analyser.validate()?;
        self.audio.validate()?;

        if self.analyser.bin_count() != self.spectrum.bin_count {
            return Err(ConfigError::invalid(
                "analyser.fft_size",
                format!(
                    "produces {} bins but spectrum.bin_count is {}",
                    self.analyser.bin_count(),
                    self.spectrum.bin_count
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{NoiseKind, OrbitCamera};
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[morph]
base_radius = 12.5
noise = "perlin"

[camera]
kind = "orbit"
distance = 80.0
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.morph.base_radius, 12.5);
        assert_eq!(config.morph.noise, NoiseKind::Perlin);
        assert_eq!(config.morph.amplitude, 5.0);
        assert_eq!(config.spectrum.bin_count, 256);
        assert_eq!(
            config.camera,
            CameraPreset::Orbit(OrbitCamera {
                distance: 80.0,
                ..OrbitCamera::default()
            })
        );
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AppConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "morph = 3").unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_bin_count_must_match_fft_size() {
        let mut config = AppConfig::default();
        config.analyser.fft_size = 1024;
        assert!(config.validate().is_err());

        config.spectrum.bin_count = 512;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tiny_spectrum_rejected() {
        let mut config = AppConfig::default();
        config.spectrum.bin_count = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpectrumSize { bins: 1 })
        ));
    }
}
