use barrel_types::{AllocationInput, CorrectedEntry, CorrectionFactors};
use serde::{Deserialize, Serialize};

use crate::correction::api_gravity::{API_CORRECTION_MAX, API_CORRECTION_MIN, ApiGravityCorrection};
use crate::correction::temperature::{
    REFERENCE_TEMPERATURE_F, TemperatureCorrection, VCF_MAX, VCF_MIN,
};
use crate::correction::water_cut::WaterCutFactor;
use crate::{CorrectionFactor, round_to_cents};

/// Clamp bounds and reference conditions for the correction chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionLimits {
    pub reference_temperature_f: f64,
    pub vcf_min: f64,
    pub vcf_max: f64,
    pub api_correction_min: f64,
    pub api_correction_max: f64,
}

impl Default for CorrectionLimits {
    fn default() -> Self {
        Self {
            reference_temperature_f: REFERENCE_TEMPERATURE_F,
            vcf_min: VCF_MIN,
            vcf_max: VCF_MAX,
            api_correction_min: API_CORRECTION_MIN,
            api_correction_max: API_CORRECTION_MAX,
        }
    }
}

/// Converts gross partner readings into net volumes.
///
/// `net = gross × water_cut × vcf × api_correction`, rounded to cents. The
/// calculator never rejects an entry: out-of-band factors are clamped.
#[derive(Debug, Clone, Default)]
pub struct VolumeCorrectionCalculator {
    water_cut: WaterCutFactor,
    temperature: TemperatureCorrection,
    gravity: ApiGravityCorrection,
}

impl VolumeCorrectionCalculator {
    pub fn new(limits: CorrectionLimits) -> Self {
        Self {
            water_cut: WaterCutFactor,
            temperature: TemperatureCorrection {
                reference_temperature_f: limits.reference_temperature_f,
                min: limits.vcf_min,
                max: limits.vcf_max,
            },
            gravity: ApiGravityCorrection {
                min: limits.api_correction_min,
                max: limits.api_correction_max,
            },
        }
    }

    /// The factors in the order they are applied.
    pub fn chain(&self) -> [&dyn CorrectionFactor; 3] {
        [&self.water_cut, &self.temperature, &self.gravity]
    }

    pub fn correction_factors(
        &self,
        entry: &AllocationInput,
        reference_api: f64,
    ) -> CorrectionFactors {
        let water_cut_factor = self.water_cut.factor(entry, reference_api);
        let vcf = self.temperature.factor(entry, reference_api);
        let api_correction = self.gravity.factor(entry, reference_api);
        let net_volume =
            round_to_cents(entry.gross_volume_bbl * water_cut_factor * vcf * api_correction);

        tracing::trace!(
            partner = %entry.partner,
            water_cut_factor,
            vcf,
            api_correction,
            net_volume,
            "corrected entry"
        );

        CorrectionFactors { water_cut_factor, vcf, api_correction, net_volume }
    }

    pub fn net_volume(&self, entry: &AllocationInput, reference_api: f64) -> f64 {
        let corrected = self
            .chain()
            .iter()
            .fold(entry.gross_volume_bbl, |volume, f| volume * f.factor(entry, reference_api));
        round_to_cents(corrected)
    }

    pub fn correct(&self, entry: &AllocationInput, reference_api: f64) -> CorrectedEntry {
        CorrectedEntry { input: entry.clone(), net_volume: self.net_volume(entry, reference_api) }
    }
}
