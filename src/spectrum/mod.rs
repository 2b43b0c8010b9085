//! Spectrum input: frame sources, two-band feature extraction and
//! range modulation.

mod features;
mod modulate;

pub use features::{BandFeatures, SpectralFeatureExtractor};
pub use modulate::{modulate, BandModulators, BandSignals, SignalModulator};

use std::sync::{Arc, Mutex};

/// Supplier of fixed-length byte spectra (one 0-255 value per bin)
pub trait SpectrumSource {
    /// Bins per frame
    fn bin_count(&self) -> usize;

    /// Copy the most recently delivered frame into `out`.
    ///
    /// Returns the number of bins written. A source that has not produced
    /// anything yet reports an all-zero frame.
    fn read_frame(&self, out: &mut Vec<u8>) -> usize;
}

/// Frame buffer shared between the analysis thread and the render thread
#[derive(Clone, Debug)]
pub struct SharedSpectrum {
    bins: Arc<Mutex<Vec<u8>>>,
}

impl SharedSpectrum {
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: Arc::new(Mutex::new(vec![0; bin_count])),
        }
    }

    /// Replace the published frame (called by the analysis thread)
    pub fn publish(&self, frame: &[u8]) {
        let mut bins = self.bins.lock().unwrap_or_else(|e| e.into_inner());
        bins.clear();
        bins.extend_from_slice(frame);
    }
}

impl SpectrumSource for SharedSpectrum {
    fn bin_count(&self) -> usize {
        self.bins.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn read_frame(&self, out: &mut Vec<u8>) -> usize {
        let bins = self.bins.lock().unwrap_or_else(|e| e.into_inner());
        out.clear();
        out.extend_from_slice(&bins);
        out.len()
    }
}

/// Constant frame, for silent runs and tests
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticSpectrum(pub Vec<u8>);

impl StaticSpectrum {
    pub fn filled(bin_count: usize, value: u8) -> Self {
        Self(vec![value; bin_count])
    }
}

impl SpectrumSource for StaticSpectrum {
    fn bin_count(&self) -> usize {
        self.0.len()
    }

    fn read_frame(&self, out: &mut Vec<u8>) -> usize {
        out.clear();
        out.extend_from_slice(&self.0);
        out.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_spectrum_starts_silent() {
        let shared = SharedSpectrum::new(8);
        let mut out = Vec::new();
        assert_eq!(shared.read_frame(&mut out), 8);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_shared_spectrum_keeps_last_published_frame() {
        let shared = SharedSpectrum::new(4);
        let reader = shared.clone();
        shared.publish(&[1, 2, 3, 4]);

        let mut out = Vec::new();
        reader.read_frame(&mut out);
        assert_eq!(out, vec![1, 2, 3, 4]);

        // No new publish: the same frame is read again
        reader.read_frame(&mut out);
        assert_eq!(out, vec![1, 2, 3, 4]);
    }
}
