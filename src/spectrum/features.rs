//! Two-band (bass/treble) feature extraction.

use std::ops::Range;

use crate::error::{ConfigError, FrameError};
use crate::params::FeatureNormalization;

/// Per-frame scalar features
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandFeatures {
    /// Peak of the bass band, normalized
    pub bass: f32,
    /// Mean of the treble band, normalized
    pub treble: f32,
}

/// Splits a byte spectrum into bass and treble bands and reduces each to a
/// single scalar.
///
/// With `h = N/2 - 1` the bands are `[0, h)` and `[h, N - 1)`: the split
/// sits one bin below the midpoint and the last bin belongs to neither band.
#[derive(Clone, Debug)]
pub struct SpectralFeatureExtractor {
    bin_count: usize,
    bass: Range<usize>,
    treble: Range<usize>,
    normalization: FeatureNormalization,
}

impl SpectralFeatureExtractor {
    pub fn new(
        bin_count: usize,
        normalization: FeatureNormalization,
    ) -> Result<Self, ConfigError> {
        if bin_count < 2 {
            return Err(ConfigError::InvalidSpectrumSize { bins: bin_count });
        }
        let split = bin_count / 2 - 1;
        Ok(Self {
            bin_count,
            bass: 0..split,
            treble: split..bin_count - 1,
            normalization,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Bin range of the bass band
    pub fn bass_bins(&self) -> Range<usize> {
        self.bass.clone()
    }

    /// Bin range of the treble band
    pub fn treble_bins(&self) -> Range<usize> {
        self.treble.clone()
    }

    /// Reduce one frame to its features
    pub fn extract(&self, frame: &[u8]) -> Result<BandFeatures, FrameError> {
        if frame.len() != self.bin_count {
            return Err(FrameError::SpectrumLength {
                expected: self.bin_count,
                actual: frame.len(),
            });
        }

        let bass = &frame[self.bass.clone()];
        let treble = &frame[self.treble.clone()];

        Ok(BandFeatures {
            bass: self.normalize(peak(bass), bass.len()),
            treble: self.normalize(mean(treble), treble.len()),
        })
    }

    fn normalize(&self, value: f32, band_len: usize) -> f32 {
        match self.normalization {
            // An empty band has no energy; avoid 0/0
            FeatureNormalization::BandLength if band_len == 0 => 0.0,
            FeatureNormalization::BandLength => value / band_len as f32,
            FeatureNormalization::FullScale => value / u8::MAX as f32,
        }
    }
}

fn peak(band: &[u8]) -> f32 {
    band.iter().copied().max().unwrap_or(0) as f32
}

fn mean(band: &[u8]) -> f32 {
    if band.is_empty() {
        return 0.0;
    }
    let sum: u32 = band.iter().map(|&b| b as u32).sum();
    sum as f32 / band.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(bins: usize) -> SpectralFeatureExtractor {
        SpectralFeatureExtractor::new(bins, FeatureNormalization::BandLength).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        for bins in [0, 1] {
            assert!(matches!(
                SpectralFeatureExtractor::new(bins, FeatureNormalization::BandLength),
                Err(ConfigError::InvalidSpectrumSize { .. })
            ));
        }
    }

    #[test]
    fn test_band_split_for_256_bins() {
        // Split is one below the midpoint and the final bin is dropped
        let ex = extractor(256);
        assert_eq!(ex.bass_bins(), 0..127);
        assert_eq!(ex.treble_bins(), 127..255);
    }

    #[test]
    fn test_two_bins_gives_empty_bass() {
        let ex = extractor(2);
        assert_eq!(ex.bass_bins(), 0..0);
        assert_eq!(ex.treble_bins(), 0..1);

        let features = ex.extract(&[200, 50]).unwrap();
        assert_eq!(features.bass, 0.0);
        assert_eq!(features.treble, 200.0);
    }

    #[test]
    fn test_bass_is_peak_over_band_length() {
        let ex = extractor(8);
        // bass = [0, 3), treble = [3, 7), bin 7 ignored
        let frame = [10, 90, 30, 4, 8, 12, 16, 255];
        let features = ex.extract(&frame).unwrap();
        assert_eq!(features.bass, 90.0 / 3.0);
        assert_eq!(features.treble, 10.0 / 4.0);
    }

    #[test]
    fn test_last_bin_does_not_affect_features() {
        let ex = extractor(16);
        let mut frame = [7u8; 16];
        let before = ex.extract(&frame).unwrap();
        frame[15] = 255;
        assert_eq!(ex.extract(&frame).unwrap(), before);
    }

    #[test]
    fn test_full_scale_normalization() {
        let ex = SpectralFeatureExtractor::new(8, FeatureNormalization::FullScale).unwrap();
        let features = ex.extract(&[255; 8]).unwrap();
        assert_eq!(features.bass, 1.0);
        assert_eq!(features.treble, 1.0);
    }

    #[test]
    fn test_band_length_normalization_stays_in_unit_range_for_512_bins() {
        let ex = extractor(512);
        let features = ex.extract(&[255; 512]).unwrap();
        assert!((0.0..=1.0).contains(&features.bass));
        assert!((0.0..=1.0).contains(&features.treble));
        assert_eq!(features.bass, 1.0); // 255 / 255 bins
    }

    #[test]
    fn test_wrong_length_is_frame_error() {
        let ex = extractor(256);
        assert_eq!(
            ex.extract(&[0; 128]),
            Err(FrameError::SpectrumLength {
                expected: 256,
                actual: 128
            })
        );
    }

    #[test]
    fn test_silence_gives_zero_features() {
        let features = extractor(256).extract(&[0; 256]).unwrap();
        assert_eq!(features, BandFeatures::default());
    }
}
