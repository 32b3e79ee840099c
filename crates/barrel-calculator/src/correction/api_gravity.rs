//! API Gravity Correction
//!
//! Compares a partner's reported gravity to the terminal's reference gravity
//! through the specific gravity ratio:
//!
//! SG(api) = 141.5 / (api + 131.5)
//! correction = SG(terminal) / SG(partner)
//!
//! Clamped to `[0.90, 1.15]`.

use barrel_types::AllocationInput;

use crate::{CorrectionFactor, bounded};

pub const API_CORRECTION_MIN: f64 = 0.90;
pub const API_CORRECTION_MAX: f64 = 1.15;

/// Specific gravity at 60°F for a given API gravity.
pub fn specific_gravity(api_gravity: f64) -> f64 {
    141.5 / (api_gravity + 131.5)
}

#[derive(Debug, Clone, Copy)]
pub struct ApiGravityCorrection {
    pub min: f64,
    pub max: f64,
}

impl Default for ApiGravityCorrection {
    fn default() -> Self {
        Self { min: API_CORRECTION_MIN, max: API_CORRECTION_MAX }
    }
}

impl ApiGravityCorrection {
    pub fn correction(&self, partner_api: f64, terminal_api: f64) -> f64 {
        let ratio = specific_gravity(terminal_api) / specific_gravity(partner_api);
        bounded(ratio, self.min, self.max)
    }
}

impl CorrectionFactor for ApiGravityCorrection {
    fn name(&self) -> &str {
        "api_gravity"
    }

    fn factor(&self, entry: &AllocationInput, reference_api: f64) -> f64 {
        self.correction(entry.api_gravity, reference_api)
    }
}
