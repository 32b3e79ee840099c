//! The allocation engine: correction, allocation and report stamping behind
//! one stateless façade.
//!
//! The engine holds only its configuration. Each call builds its own working
//! state, so one engine can serve concurrent reconciliation runs.

use barrel_calculator::{VolumeCorrectionCalculator, validate_inputs, validate_terminal};
use barrel_types::{
    AllocationInput, AllocationOutput, AllocationPeriod, AllocationReport, CorrectedEntry,
    CorrectionFactors, TerminalReading,
};
use chrono::Utc;
use tracing::{debug, instrument};

use crate::allocator::ProportionalAllocator;
use crate::config::AllocationConfig;
use crate::error::BarrelResult;
use crate::integrity;

#[derive(Debug, Clone)]
pub struct AllocationEngine {
    config: AllocationConfig,
    calculator: VolumeCorrectionCalculator,
    allocator: ProportionalAllocator,
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationEngine {
    /// Engine with the standard correction bounds and caps.
    pub fn new() -> Self {
        Self::build(AllocationConfig::default())
    }

    /// Engine with custom settings, validated first.
    pub fn with_config(config: AllocationConfig) -> BarrelResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: AllocationConfig) -> Self {
        Self {
            calculator: VolumeCorrectionCalculator::new(config.corrections),
            allocator: ProportionalAllocator::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Net volume of a single entry against the terminal's reference gravity.
    /// Usable on its own for previews.
    pub fn compute_net_volume(&self, entry: &AllocationInput, terminal_api_gravity: f64) -> f64 {
        self.calculator.net_volume(entry, terminal_api_gravity)
    }

    pub fn compute_correction_factors(
        &self,
        entry: &AllocationInput,
        terminal_api_gravity: f64,
    ) -> CorrectionFactors {
        self.calculator.correction_factors(entry, terminal_api_gravity)
    }

    /// Corrects every entry and distributes the terminal volume across partners.
    ///
    /// Returns [`BarrelError::EmptyInput`](crate::BarrelError::EmptyInput) when
    /// `entries` is empty. Entries are expected to have passed
    /// [`validate_inputs`](Self::validate_inputs); the engine does not re-check them.
    #[instrument(skip_all, fields(partners = entries.len(), terminal_volume = terminal.final_volume_bbl))]
    pub fn compute_allocation(
        &self,
        entries: &[AllocationInput],
        terminal: &TerminalReading,
    ) -> BarrelResult<AllocationOutput> {
        let corrected: Vec<CorrectedEntry> = entries
            .iter()
            .map(|entry| self.calculator.correct(entry, terminal.api_gravity))
            .collect();

        let output = self.allocator.allocate(&corrected, terminal.final_volume_bbl)?;
        debug!(
            total_net_volume = output.total_net_volume,
            shrinkage_factor = output.shrinkage_factor,
            unallocated_volume = output.unallocated_volume,
            warnings = output.warnings.len(),
            "allocation computed"
        );
        Ok(output)
    }

    pub fn validate_inputs(&self, entries: &[AllocationInput]) -> Vec<String> {
        validate_inputs(entries)
    }

    pub fn validate_terminal(&self, terminal: &TerminalReading) -> Vec<String> {
        validate_terminal(terminal)
    }

    /// Validates a whole period: entries first, then the terminal reading.
    pub fn validate_period(&self, period: &AllocationPeriod) -> Vec<String> {
        let mut violations = validate_inputs(&period.entries);
        violations.extend(validate_terminal(&period.terminal));
        violations
    }

    /// Runs the allocation for a period and stamps the result with the digests
    /// of its inputs and of the output itself.
    pub fn stamp_report(&self, period: &AllocationPeriod) -> BarrelResult<AllocationReport> {
        let output = self.compute_allocation(&period.entries, &period.terminal)?;
        let input_hash = integrity::hash(period)?;
        let output_hash = integrity::hash(&output)?;
        Ok(AllocationReport { output, input_hash, output_hash, generated_at: Utc::now() })
    }

    /// Checks a stored report against the period it claims to come from.
    ///
    /// Both digests must match: the period must hash to `input_hash` and the
    /// report's output must hash to `output_hash`.
    pub fn verify_report(&self, period: &AllocationPeriod, report: &AllocationReport) -> bool {
        integrity::verify_hash(period, &report.input_hash)
            && integrity::verify_hash(&report.output, &report.output_hash)
    }
}
