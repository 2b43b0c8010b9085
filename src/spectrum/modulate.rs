//! Linear range remapping with optional power-curve shaping.

use super::BandFeatures;
use crate::error::ConfigError;
use crate::params::{MorphParams, ValueRange};

/// Remap `signal` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// No clamping: values outside the input range extrapolate linearly.
/// Callers must not pass `in_min == in_max`; `SignalModulator` rejects
/// that at construction.
pub fn modulate(signal: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let fraction = (signal - in_min) / (in_max - in_min);
    out_min + fraction * (out_max - out_min)
}

/// Validated remapping from one range to another
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalModulator {
    input: ValueRange,
    output: ValueRange,
    exponent: Option<f32>,
}

impl SignalModulator {
    pub fn new(input: ValueRange, output: ValueRange) -> Result<Self, ConfigError> {
        let degenerate = ConfigError::DegenerateRange {
            min: input.min,
            max: input.max,
        };
        if !input.min.is_finite() || !input.max.is_finite() || input.span() == 0.0 {
            return Err(degenerate);
        }
        if !output.min.is_finite() || !output.max.is_finite() {
            return Err(ConfigError::invalid("output range", "bounds must be finite"));
        }
        Ok(Self {
            input,
            output,
            exponent: None,
        })
    }

    /// Raise the signal to `exponent` before remapping
    pub fn with_exponent(mut self, exponent: f32) -> Self {
        self.exponent = Some(exponent);
        self
    }

    pub fn apply(&self, signal: f32) -> f32 {
        let shaped = match self.exponent {
            Some(exponent) => signal.powf(exponent),
            None => signal,
        };
        modulate(
            shaped,
            self.input.min,
            self.input.max,
            self.output.min,
            self.output.max,
        )
    }
}

/// Modulated per-frame signals driving the displacement
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandSignals {
    /// Added to the base radius
    pub bass_frequency: f32,
    /// Scales the noise displacement
    pub treble_frequency: f32,
}

/// Bass and treble modulators as configured by `MorphParams`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandModulators {
    pub bass: SignalModulator,
    pub treble: SignalModulator,
}

impl BandModulators {
    /// Bass gets the power curve, treble is linear
    pub fn from_params(params: &MorphParams) -> Result<Self, ConfigError> {
        Ok(Self {
            bass: SignalModulator::new(params.feature_input, params.bass_output)?
                .with_exponent(params.bass_exponent),
            treble: SignalModulator::new(params.feature_input, params.treble_output)?,
        })
    }

    pub fn apply(&self, features: BandFeatures) -> BandSignals {
        BandSignals {
            bass_frequency: self.bass.apply(features.bass),
            treble_frequency: self.treble.apply(features.treble),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: ValueRange = ValueRange::new(0.0, 1.0);

    #[test]
    fn test_endpoints_map_to_output_bounds() {
        assert_eq!(modulate(0.0, 0.0, 1.0, 0.0, 8.0), 0.0);
        assert_eq!(modulate(1.0, 0.0, 1.0, 0.0, 8.0), 8.0);
        assert_eq!(modulate(0.5, 0.0, 1.0, 0.0, 4.0), 2.0);
    }

    #[test]
    fn test_extrapolates_outside_input_range() {
        assert_eq!(modulate(2.0, 0.0, 1.0, 0.0, 4.0), 8.0);
        assert_eq!(modulate(-1.0, 0.0, 1.0, 0.0, 4.0), -4.0);
    }

    #[test]
    fn test_zero_width_range_rejected() {
        let err = SignalModulator::new(ValueRange::new(3.0, 3.0), UNIT).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateRange { .. }));
    }

    #[test]
    fn test_non_finite_range_rejected() {
        assert!(SignalModulator::new(ValueRange::new(0.0, f32::INFINITY), UNIT).is_err());
        assert!(SignalModulator::new(UNIT, ValueRange::new(f32::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_exponent_boosts_small_values() {
        let shaped = SignalModulator::new(UNIT, ValueRange::new(0.0, 8.0))
            .unwrap()
            .with_exponent(0.8);
        let linear = SignalModulator::new(UNIT, ValueRange::new(0.0, 8.0)).unwrap();

        assert!(shaped.apply(0.1) > linear.apply(0.1));
        assert_eq!(shaped.apply(0.0), 0.0);
        assert_eq!(shaped.apply(1.0), 8.0);
    }

    #[test]
    fn test_band_modulators_shape_bass_only() {
        let mods = BandModulators::from_params(&MorphParams::default()).unwrap();
        let signals = mods.apply(BandFeatures {
            bass: 0.25,
            treble: 0.25,
        });
        assert_eq!(signals.bass_frequency, 0.25f32.powf(0.8) * 8.0);
        assert_eq!(signals.treble_frequency, 1.0);
    }

    #[test]
    fn test_saturated_features_reach_output_max() {
        let mods = BandModulators::from_params(&MorphParams::default()).unwrap();
        let signals = mods.apply(BandFeatures {
            bass: 1.0,
            treble: 1.0,
        });
        assert_eq!(signals.bass_frequency, 8.0);
        assert_eq!(signals.treble_frequency, 4.0);
    }
}
