//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::error::ConfigError;
use crate::params::{AppConfig, CameraPreset, FixedCamera, NoiseKind, OrbitCamera};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "audiomorph")]
#[command(about = "Audio-reactive morphing sphere", long_about = None)]
pub struct Args {
    /// TOML config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// WAV file to loop
    #[arg(long, value_name = "WAV", conflicts_with = "synth")]
    pub audio: Option<PathBuf>,

    /// Play the built-in synth even if the config names a file
    #[arg(long)]
    pub synth: bool,

    /// Icosphere subdivision level
    #[arg(long, value_name = "LEVEL")]
    pub detail: Option<u32>,

    /// Undisplaced sphere radius (world units)
    #[arg(long, value_name = "UNITS")]
    pub radius: Option<f32>,

    /// Noise permutation seed
    #[arg(long)]
    pub seed: Option<u32>,

    /// Noise algorithm
    #[arg(long, value_name = "KIND", value_parser = ["simplex", "perlin"])]
    pub noise: Option<String>,

    /// Start with playback paused
    #[arg(long)]
    pub paused: bool,

    /// Draw the wireframe overlay
    #[arg(long, value_name = "BOOL")]
    pub wireframe: Option<bool>,

    /// Initial output gain (0 to 2)
    #[arg(long)]
    pub gain: Option<f32>,

    /// Camera preset
    #[arg(long, value_name = "PRESET", value_parser = ["fixed", "orbit"])]
    pub camera: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,
}

impl Args {
    /// Load the config file (or defaults), apply flag overrides, validate
    pub fn resolve_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Config: {}", path.display());
                AppConfig::load(path)?
            }
            None => AppConfig::default(),
        };
        self.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite config values with any flags that were given
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(path) = &self.audio {
            config.audio.file = Some(path.clone());
        }
        if self.synth {
            config.audio.file = None;
        }
        if let Some(detail) = self.detail {
            config.morph.mesh_detail = detail;
        }
        if let Some(radius) = self.radius {
            config.morph.base_radius = radius;
        }
        if let Some(seed) = self.seed {
            config.morph.noise_seed = seed;
        }
        match self.noise.as_deref() {
            Some("simplex") => config.morph.noise = NoiseKind::Simplex,
            Some("perlin") => config.morph.noise = NoiseKind::Perlin,
            _ => {}
        }
        if self.paused {
            config.audio.start_paused = true;
        }
        if let Some(wireframe) = self.wireframe {
            config.render.wireframe = wireframe;
        }
        if let Some(gain) = self.gain {
            config.audio.gain = gain;
        }
        // Keep file-provided camera settings when the kind already matches
        match (self.camera.as_deref(), &config.camera) {
            (Some("fixed"), CameraPreset::Orbit(_)) => {
                config.camera = CameraPreset::Fixed(FixedCamera::default());
            }
            (Some("orbit"), CameraPreset::Fixed(_)) => {
                config.camera = CameraPreset::Orbit(OrbitCamera::default());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("audiomorph").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let config = parse(&[]).resolve_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&[
            "--detail", "2", "--radius", "6.5", "--seed", "9", "--noise", "perlin", "--paused",
            "--wireframe", "false", "--gain", "0.5", "--camera", "orbit",
        ]);
        let config = args.resolve_config().unwrap();

        assert_eq!(config.morph.mesh_detail, 2);
        assert_eq!(config.morph.base_radius, 6.5);
        assert_eq!(config.morph.noise_seed, 9);
        assert_eq!(config.morph.noise, NoiseKind::Perlin);
        assert!(config.audio.start_paused);
        assert!(!config.render.wireframe);
        assert_eq!(config.audio.gain, 0.5);
        assert!(matches!(config.camera, CameraPreset::Orbit(_)));
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[morph]\nbase_radius = 20.0\nmesh_detail = 3\n\n[audio]\nfile = \"loop.wav\"\n\n[camera]\nkind = \"orbit\"\ndistance = 55.0"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = parse(&["--config", path, "--radius", "4", "--synth", "--camera", "orbit"])
            .resolve_config()
            .unwrap();

        assert_eq!(config.morph.base_radius, 4.0);
        assert_eq!(config.morph.mesh_detail, 3);
        assert_eq!(config.audio.file, None);
        // Same kind keeps the file's orbit settings
        let CameraPreset::Orbit(orbit) = config.camera else {
            panic!("expected orbit camera");
        };
        assert_eq!(orbit.distance, 55.0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = parse(&["--gain", "5"]).resolve_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "gain", .. }));
    }

    #[test]
    fn test_audio_and_synth_conflict() {
        let result = Args::try_parse_from(["audiomorph", "--audio", "a.wav", "--synth"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_noise_rejected() {
        assert!(Args::try_parse_from(["audiomorph", "--noise", "worley"]).is_err());
    }
}
