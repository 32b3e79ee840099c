//! Engine configuration.
//!
//! Every field defaults to the industry constants the allocation rules are
//! defined with, so an empty file (or no file) yields the standard engine.

use std::fs;
use std::path::Path;

use barrel_calculator::CorrectionLimits;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BarrelError, BarrelResult};

pub const CONFIG_PATH_ENV: &str = "BARREL_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "barrel.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Highest percentage any single partner can hold
    #[serde(default = "default_percentage_ceiling")]
    pub percentage_ceiling: f64,
    /// Fraction of a partner's gross volume it may be allocated at most
    #[serde(default = "default_gross_cap_ratio")]
    pub gross_cap_ratio: f64,
    /// Sort partners by name before allocating so tie-breaks do not depend on caller order
    #[serde(default)]
    pub sort_partners_by_name: bool,
    #[serde(default)]
    pub corrections: CorrectionLimits,
}

fn default_percentage_ceiling() -> f64 {
    99.99999
}

fn default_gross_cap_ratio() -> f64 {
    0.999
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            percentage_ceiling: default_percentage_ceiling(),
            gross_cap_ratio: default_gross_cap_ratio(),
            sort_partners_by_name: false,
            corrections: CorrectionLimits::default(),
        }
    }
}

impl AllocationConfig {
    pub fn from_toml_str(raw: &str) -> BarrelResult<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| BarrelError::Configuration { message: e.to_string(), setting: None })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates the configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> BarrelResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| BarrelError::Io {
            message: e.to_string(),
            path: path.display().to_string(),
        })?;
        let config = Self::from_toml_str(&raw)?;
        info!(path = %path.display(), "Loaded allocation configuration");
        Ok(config)
    }

    /// Loads from `$BARREL_CONFIG_PATH` (or `barrel.toml`), falling back to
    /// defaults when the file does not exist. A file that exists but is invalid
    /// is still an error.
    pub fn load_from_env() -> BarrelResult<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            warn!("Configuration file '{}' not found. Using default configuration.", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn validate(&self) -> BarrelResult<()> {
        if !(self.percentage_ceiling > 0.0 && self.percentage_ceiling <= 100.0) {
            return Err(BarrelError::configuration(
                "percentage_ceiling",
                format!("must be in (0, 100], got {}", self.percentage_ceiling),
            ));
        }
        if !(self.gross_cap_ratio > 0.0 && self.gross_cap_ratio <= 1.0) {
            return Err(BarrelError::configuration(
                "gross_cap_ratio",
                format!("must be in (0, 1], got {}", self.gross_cap_ratio),
            ));
        }

        let c = &self.corrections;
        if !(c.vcf_min > 0.0 && c.vcf_min <= c.vcf_max) {
            return Err(BarrelError::configuration(
                "corrections.vcf_min",
                format!("expected 0 < vcf_min <= vcf_max, got {} / {}", c.vcf_min, c.vcf_max),
            ));
        }
        if !(c.api_correction_min > 0.0 && c.api_correction_min <= c.api_correction_max) {
            return Err(BarrelError::configuration(
                "corrections.api_correction_min",
                format!(
                    "expected 0 < api_correction_min <= api_correction_max, got {} / {}",
                    c.api_correction_min, c.api_correction_max
                ),
            ));
        }
        if !c.reference_temperature_f.is_finite() {
            return Err(BarrelError::configuration(
                "corrections.reference_temperature_f",
                "must be a finite temperature",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AllocationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.percentage_ceiling, 99.99999);
        assert_eq!(config.gross_cap_ratio, 0.999);
        assert_eq!(config.corrections.vcf_min, 0.95);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AllocationConfig::from_toml_str("").unwrap();
        assert_eq!(config, AllocationConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let raw = r#"
sort_partners_by_name = true

[corrections]
vcf_max = 1.02
"#;
        let config = AllocationConfig::from_toml_str(raw).unwrap();
        assert!(config.sort_partners_by_name);
        assert_eq!(config.corrections.vcf_max, 1.02);
        assert_eq!(config.corrections.vcf_min, 0.95);
        assert_eq!(config.gross_cap_ratio, 0.999);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let raw = r#"
[corrections]
vcf_min = 1.1
vcf_max = 1.0
"#;
        let err = AllocationConfig::from_toml_str(raw).unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let config = AllocationConfig { gross_cap_ratio: 1.5, ..AllocationConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AllocationConfig::load("/definitely/not/here/barrel.toml").unwrap_err();
        assert_eq!(err.category(), "io");
    }
}
