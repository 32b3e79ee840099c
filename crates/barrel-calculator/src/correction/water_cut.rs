//! Water Cut Factor
//!
//! Removes basic sediment and water from the gross reading.
//!
//! factor = 1 - bsw_percent / 100

use barrel_types::AllocationInput;

use crate::CorrectionFactor;

#[derive(Debug, Default, Clone, Copy)]
pub struct WaterCutFactor;

impl WaterCutFactor {
    pub fn compute(bsw_percent: f64) -> f64 {
        1.0 - bsw_percent / 100.0
    }
}

impl CorrectionFactor for WaterCutFactor {
    fn name(&self) -> &str {
        "water_cut"
    }

    fn factor(&self, entry: &AllocationInput, _reference_api: f64) -> f64 {
        Self::compute(entry.bsw_percent)
    }
}
