//! Audio playback and byte spectrum analysis.
//!
//! The output callback pulls mono samples from a `SampleSource`, applies
//! the shared gain and queues them for the analysis thread, which
//! publishes byte frames into a `SharedSpectrum`.

mod analyser;
mod source;
mod synthesis;
mod system;

pub use analyser::{blackman_window, spawn_analysis_thread, ByteSpectrumAnalyser};
pub use source::{SampleSource, WavLoop};
pub use synthesis::{SynthSource, GLICOL_COMPOSITION};
pub use system::AudioSystem;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::params::audio_constants::MAX_GAIN;
use crate::scheduler::{GainControl, PlaybackState};

/// Gain shared with the audio callback (f32 stored as bits)
#[derive(Clone, Debug)]
pub struct SharedGain {
    bits: Arc<AtomicU32>,
}

impl SharedGain {
    pub fn new(gain: f32) -> Self {
        let shared = Self {
            bits: Arc::new(AtomicU32::new(0)),
        };
        shared.set_gain(gain);
        shared
    }
}

impl GainControl for SharedGain {
    fn set_gain(&self, gain: f32) {
        let clamped = if gain.is_nan() {
            0.0
        } else {
            gain.clamp(0.0, MAX_GAIN)
        };
        self.bits.store(clamped.to_bits(), Ordering::Relaxed);
    }

    fn gain(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Play/pause flag shared with the audio callback
#[derive(Clone, Debug)]
pub struct Transport {
    playing: Arc<AtomicBool>,
}

impl Transport {
    pub fn new(playing: bool) -> Self {
        Self {
            playing: Arc::new(AtomicBool::new(playing)),
        }
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Relaxed);
    }

    /// Flip the state, returning the new one
    pub fn toggle(&self) -> bool {
        !self.playing.fetch_xor(true, Ordering::Relaxed)
    }
}

impl PlaybackState for Transport {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}
