//! Error types for setup, per-frame processing, audio and rendering.
//!
//! Setup failures (`ConfigError`) abort initialization. Per-frame failures
//! (`FrameError`) are recovered inside the scheduler tick and never reach
//! the render loop as a panic.

use std::path::PathBuf;

/// Invalid configuration detected before the first frame runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Spectrum must contain at least two bins
    #[error("spectrum must have at least 2 bins, got {bins}")]
    InvalidSpectrumSize { bins: usize },

    /// Modulation input range has zero width or non-finite bounds
    #[error("modulation input range [{min}, {max}] is degenerate")]
    DegenerateRange { min: f32, max: f32 },

    /// Position and normal buffers disagree in length
    #[error("mesh has {positions} positions but {normals} normals")]
    MeshMismatch { positions: usize, normals: usize },

    /// Triangle list references a vertex that does not exist
    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    InvalidIndex { index: u32, vertex_count: usize },

    /// Triangle list length is not a multiple of three
    #[error("triangle index count {0} is not a multiple of 3")]
    RaggedTriangles(usize),

    /// A scalar parameter is outside its documented range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `AppConfig`
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Recoverable problem with a single frame's input data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Spectrum frame length differs from the configured bin count
    #[error("spectrum frame has {actual} bins, expected {expected}")]
    SpectrumLength { expected: usize, actual: usize },
}

/// Audio device, stream or source failure.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to query output config: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to open audio file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("audio file {0} contains no samples")]
    EmptyFile(PathBuf),

    #[error("synthesis engine failed to start: {0}")]
    Synthesis(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// GPU setup or per-frame presentation failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported formats")]
    NoSurfaceFormat,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
