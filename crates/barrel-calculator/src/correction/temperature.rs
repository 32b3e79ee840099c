//! Temperature Correction
//!
//! Standardizes a volume observed at `T` °F to the 60°F reference:
//!
//! VCF = 1 - α·ΔT - β·ΔT², with ΔT = T - 60
//!
//! `(α, β)` depend on the partner's own API gravity and are interpolated
//! linearly inside each gravity band:
//!
//! | Band        | API          | α               | β                   |
//! |-------------|--------------|-----------------|---------------------|
//! | heavy       | ≤ 10         | 0.0003          | 1e-7                |
//! | medium      | (10, 25]     | 0.0003 → 0.0004 | 1e-7 → 2e-7         |
//! | light       | (25, 45]     | 0.0004 → 0.0005 | 2e-7 → 5e-7         |
//! | condensate  | > 45         | 0.0005          | 5e-7                |
//!
//! The result is clamped, never rejected.

use barrel_types::AllocationInput;

use crate::{CorrectionFactor, bounded};

pub const REFERENCE_TEMPERATURE_F: f64 = 60.0;
pub const VCF_MIN: f64 = 0.95;
pub const VCF_MAX: f64 = 1.05;

/// Returns the thermal expansion coefficients `(alpha, beta)` for a gravity.
pub fn thermal_coefficients(api_gravity: f64) -> (f64, f64) {
    if api_gravity <= 10.0 {
        (0.0003, 0.000_000_1)
    } else if api_gravity <= 25.0 {
        let t = (api_gravity - 10.0) / 15.0;
        (lerp(0.0003, 0.0004, t), lerp(0.000_000_1, 0.000_000_2, t))
    } else if api_gravity <= 45.0 {
        let t = (api_gravity - 25.0) / 20.0;
        (lerp(0.0004, 0.0005, t), lerp(0.000_000_2, 0.000_000_5, t))
    } else {
        (0.0005, 0.000_000_5)
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[derive(Debug, Clone, Copy)]
pub struct TemperatureCorrection {
    pub reference_temperature_f: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for TemperatureCorrection {
    fn default() -> Self {
        Self { reference_temperature_f: REFERENCE_TEMPERATURE_F, min: VCF_MIN, max: VCF_MAX }
    }
}

impl TemperatureCorrection {
    /// Unclamped volume correction factor.
    pub fn raw_vcf(&self, temperature_f: f64, api_gravity: f64) -> f64 {
        let (alpha, beta) = thermal_coefficients(api_gravity);
        let delta_t = temperature_f - self.reference_temperature_f;
        1.0 - alpha * delta_t - beta * delta_t * delta_t
    }

    pub fn vcf(&self, temperature_f: f64, api_gravity: f64) -> f64 {
        bounded(self.raw_vcf(temperature_f, api_gravity), self.min, self.max)
    }
}

impl CorrectionFactor for TemperatureCorrection {
    fn name(&self) -> &str {
        "temperature"
    }

    fn factor(&self, entry: &AllocationInput, _reference_api: f64) -> f64 {
        self.vcf(entry.temperature_deg_f, entry.api_gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn coefficients_follow_gravity_bands() {
        assert_eq!(thermal_coefficients(5.0), (0.0003, 0.000_000_1));
        assert_eq!(thermal_coefficients(60.0), (0.0005, 0.000_000_5));

        let (alpha, beta) = thermal_coefficients(17.5);
        assert!(close(alpha, 0.00035));
        assert!(close(beta, 0.000_000_15));

        let (alpha, beta) = thermal_coefficients(35.0);
        assert!(close(alpha, 0.00045));
        assert!(close(beta, 0.000_000_35));
    }

    #[test]
    fn bands_meet_at_their_edges() {
        let (a10, b10) = thermal_coefficients(10.0);
        assert!(close(a10, 0.0003) && close(b10, 0.000_000_1));
        let (a25, b25) = thermal_coefficients(25.0);
        assert!(close(a25, 0.0004) && close(b25, 0.000_000_2));
        let (a45, b45) = thermal_coefficients(45.0);
        assert!(close(a45, 0.0005) && close(b45, 0.000_000_5));
    }

    #[test]
    fn reference_temperature_is_neutral() {
        let correction = TemperatureCorrection::default();
        assert_eq!(correction.vcf(60.0, 30.0), 1.0);
    }

    #[test]
    fn warm_oil_shrinks_and_cold_oil_expands() {
        let correction = TemperatureCorrection::default();
        assert!(correction.vcf(80.0, 30.0) < 1.0);
        assert!(correction.vcf(40.0, 30.0) > 1.0);
    }

    #[test]
    fn extreme_heat_is_clamped() {
        let correction = TemperatureCorrection::default();
        // 1 - 0.0005*140 - 5e-7*140^2 = 0.9202
        assert!(correction.raw_vcf(200.0, 45.0) < VCF_MIN);
        assert_eq!(correction.vcf(200.0, 45.0), VCF_MIN);
    }

    #[test]
    fn extreme_cold_stays_within_bounds() {
        let correction = TemperatureCorrection::default();
        for api in [10.0, 25.0, 45.0] {
            let vcf = correction.vcf(-50.0, api);
            assert!((VCF_MIN..=VCF_MAX).contains(&vcf), "api {api}: {vcf}");
        }
    }
}
