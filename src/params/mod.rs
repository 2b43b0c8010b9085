//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers of the morph pipeline live here with:
//! - Units (radians per tick, milliseconds, decibels, etc.)
//! - Documented ranges and meanings
//! - A `validate` step that rejects bad values before the first frame

mod audio;
mod camera;
mod config;
mod morph;
mod render;
mod spectrum;

// Re-export all types
pub use audio::{audio_constants, AnalyserConfig, AudioParams};
pub use camera::{CameraPreset, FixedCamera, OrbitCamera};
pub use config::AppConfig;
pub use morph::{MorphParams, NoiseKind, RotationDeltas, ValueRange};
pub use render::RenderConfig;
pub use spectrum::{FeatureNormalization, SpectrumParams};
