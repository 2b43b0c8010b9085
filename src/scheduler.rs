//! Per-refresh driver tying spectrum, modulation, morph and renderer together.

use tracing::{trace, warn};

use crate::error::{ConfigError, FrameError};
use crate::mesh::Mesh;
use crate::morph::MeshMorphEngine;
use crate::noise::NoiseField;
use crate::params::{MorphParams, SpectrumParams};
use crate::spectrum::{
    BandFeatures, BandModulators, BandSignals, SpectralFeatureExtractor, SpectrumSource,
};

/// Transport flag read once per tick
pub trait PlaybackState {
    fn is_playing(&self) -> bool;
}

impl PlaybackState for bool {
    fn is_playing(&self) -> bool {
        *self
    }
}

/// Linear output volume, adjustable from the UI thread while audio plays
pub trait GainControl {
    /// Set the gain; implementations clamp to their supported range
    fn set_gain(&self, gain: f32);

    fn gain(&self) -> f32;
}

/// Consumer of the finished mesh, called once per tick after mutation
pub trait Renderer {
    type Error;

    fn draw(&mut self, mesh: &Mesh) -> Result<(), Self::Error>;
}

/// Everything a tick reads or mutates
pub struct FrameContext<'a> {
    pub mesh: &'a mut Mesh,
    pub spectrum: &'a dyn SpectrumSource,
    pub playback: &'a dyn PlaybackState,
    /// Milliseconds since the animation started
    pub elapsed_ms: f64,
}

/// What a tick did to the mesh shape
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Spectrum applied
    Morphed {
        features: BandFeatures,
        signals: BandSignals,
    },
    /// Paused: rotation only
    Idle,
    /// Bad input: rotation only, previous shape kept
    Skipped(FrameError),
}

/// Single-threaded frame driver. Never blocks; one call per display refresh.
#[derive(Debug)]
pub struct FrameScheduler {
    extractor: SpectralFeatureExtractor,
    modulators: BandModulators,
    engine: MeshMorphEngine,
    /// Reused copy of the latest spectrum frame
    frame: Vec<u8>,
    ticks: u64,
    last_error: Option<FrameError>,
}

impl FrameScheduler {
    /// Build the pipeline, rejecting invalid configuration up front
    pub fn new(
        morph: &MorphParams,
        spectrum: &SpectrumParams,
        noise: NoiseField,
    ) -> Result<Self, ConfigError> {
        morph.validate()?;
        let extractor = SpectralFeatureExtractor::new(spectrum.bin_count, spectrum.normalization)?;
        let modulators = BandModulators::from_params(morph)?;

        Ok(Self {
            frame: Vec::with_capacity(extractor.bin_count()),
            extractor,
            modulators,
            engine: MeshMorphEngine::new(morph, noise),
            ticks: 0,
            last_error: None,
        })
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Rotate, and morph if playing. Does not draw.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> TickOutcome {
        self.ticks += 1;
        self.engine.rotate(ctx.mesh);

        if !ctx.playback.is_playing() {
            return TickOutcome::Idle;
        }

        let expected = self.extractor.bin_count();
        let advertised = ctx.spectrum.bin_count();
        let extracted = if advertised == expected {
            ctx.spectrum.read_frame(&mut self.frame);
            self.extractor.extract(&self.frame)
        } else {
            Err(FrameError::SpectrumLength {
                expected,
                actual: advertised,
            })
        };
        let features = match extracted {
            Ok(features) => features,
            Err(err) => {
                if self.last_error.as_ref() != Some(&err) {
                    warn!("Skipping morph: {}", err);
                    self.last_error = Some(err.clone());
                }
                return TickOutcome::Skipped(err);
            }
        };
        self.last_error = None;

        let signals = self.modulators.apply(features);
        trace!(
            tick = self.ticks,
            bass = signals.bass_frequency,
            treble = signals.treble_frequency,
            "morph"
        );
        self.engine.displace(ctx.mesh, signals, ctx.elapsed_ms);

        TickOutcome::Morphed { features, signals }
    }

    /// One full tick: update, then hand the finished mesh to the renderer
    pub fn tick<R: Renderer>(
        &mut self,
        mut ctx: FrameContext<'_>,
        renderer: &mut R,
    ) -> Result<TickOutcome, R::Error> {
        let outcome = self.update(&mut ctx);
        renderer.draw(ctx.mesh)?;
        Ok(outcome)
    }
}
