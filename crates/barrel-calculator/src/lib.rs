//! The volume correction calculator for the Barrel allocation engine.
//!
//! This crate turns one partner's gross reading into a standardized net volume
//! by chaining three correction factors (water cut, temperature, API gravity),
//! and provides the range checks the caller runs before submitting entries.

use barrel_types::AllocationInput;

pub mod calculator;
pub mod correction;
pub mod validation;

/// A single multiplicative step of the correction chain.
/// Factors are stateless and thread-safe.
pub trait CorrectionFactor: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the factor to apply to the entry's volume. `reference_api` is the
    /// terminal gravity all partners are corrected against.
    fn factor(&self, entry: &AllocationInput, reference_api: f64) -> f64;
}

/// Rounds to two decimal places, half away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds down to two decimal places.
pub fn floor_to_cents(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// Bounds `value` to `[min, max]` without panicking on inverted limits.
pub(crate) fn bounded(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub use calculator::{CorrectionLimits, VolumeCorrectionCalculator};
pub use correction::{
    api_gravity::{ApiGravityCorrection, specific_gravity},
    temperature::{TemperatureCorrection, thermal_coefficients},
    water_cut::WaterCutFactor,
};
pub use validation::{validate_inputs, validate_terminal};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to_cents(1.005_000_1), 1.01);
        assert_eq!(round_to_cents(2.344), 2.34);
        assert_eq!(round_to_cents(-2.345_000_1), -2.35);
    }

    #[test]
    fn floors_to_cents() {
        assert_eq!(floor_to_cents(998.999), 998.99);
        assert_eq!(floor_to_cents(10.0), 10.0);
    }

    #[test]
    fn bounded_tolerates_inverted_limits() {
        assert_eq!(bounded(5.0, 0.0, 1.0), 1.0);
        assert_eq!(bounded(-5.0, 0.0, 1.0), 0.0);
        // Inverted limits must not panic the way f64::clamp would.
        let _ = bounded(0.5, 1.0, 0.0);
    }
}
