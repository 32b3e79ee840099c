use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One partner's raw measurement for a reconciliation period.
///
/// Produced by the data layer from already validated production entries. All
/// volumes are in barrels, temperatures in °F and gravities in °API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationInput {
    /// Partner name, must be non-empty
    pub partner: String,
    /// Gross observed volume in barrels
    pub gross_volume_bbl: f64,
    /// Basic sediment and water content, percent of gross
    pub bsw_percent: f64,
    /// Observed temperature in °F
    #[serde(rename = "temperature_degF")]
    pub temperature_deg_f: f64,
    /// Partner's reported API gravity
    pub api_gravity: f64,
}

impl AllocationInput {
    /// Convenience constructor used by callers that build entries by hand.
    pub fn new(
        partner: impl Into<String>,
        gross_volume_bbl: f64,
        bsw_percent: f64,
        temperature_deg_f: f64,
        api_gravity: f64,
    ) -> Self {
        Self {
            partner: partner.into(),
            gross_volume_bbl,
            bsw_percent,
            temperature_deg_f,
            api_gravity,
        }
    }
}

/// The authoritative terminal measurement for a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalReading {
    /// Volume actually received at the terminal, in barrels
    pub final_volume_bbl: f64,
    /// Reference gravity every partner is corrected against
    pub api_gravity: f64,
}

impl TerminalReading {
    /// Creates a terminal reading.
    pub const fn new(final_volume_bbl: f64, api_gravity: f64) -> Self {
        Self { final_volume_bbl, api_gravity }
    }
}

/// Everything the engine needs for one period: partner entries plus the terminal reading.
///
/// This is also the document the input hash of an [`AllocationReport`] is computed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPeriod {
    /// Partner entries, already filtered to the period by the caller
    pub entries: Vec<AllocationInput>,
    /// Terminal measurement for the same period
    pub terminal: TerminalReading,
}

/// Breakdown of the correction chain applied to a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFactors {
    /// `1 - bsw/100`
    pub water_cut_factor: f64,
    /// Thermal volume correction factor to 60°F, clamped
    pub vcf: f64,
    /// Specific gravity ratio against the terminal, clamped
    pub api_correction: f64,
    /// Corrected volume, rounded to cents
    pub net_volume: f64,
}

/// An input entry together with its corrected net volume.
///
/// Only lives for the duration of an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedEntry {
    /// Original partner entry
    #[serde(flatten)]
    pub input: AllocationInput,
    /// Net volume derived from `input`
    pub net_volume: f64,
}

/// Final allocation for one partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerAllocation {
    /// Partner name
    pub partner: String,
    /// Gross volume the partner reported
    pub input_volume: f64,
    /// Corrected net volume
    pub net_volume: f64,
    /// Share of the terminal volume assigned to the partner
    pub allocated_volume: f64,
    /// Share of the total allocation, in percent
    pub percentage: f64,
    /// `input_volume - allocated_volume`; negative means a gain
    pub volume_loss: f64,
}

/// Result of an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutput {
    /// Terminal volume being distributed
    pub total_terminal_volume: f64,
    /// Sum of gross partner volumes
    pub total_input_volume: f64,
    /// Sum of corrected partner volumes
    pub total_net_volume: f64,
    /// `(net - terminal) / net * 100`; positive is a loss in transit
    pub shrinkage_factor: f64,
    /// Terminal volume no partner could absorb under the gross-input cap
    pub unallocated_volume: f64,
    /// Per-partner results, in allocation order
    pub allocation_results: Vec<PartnerAllocation>,
    /// Diagnostics for degenerate cases, for the caller to surface
    pub warnings: Vec<String>,
}

impl AllocationOutput {
    /// Sum of allocated volumes across partners.
    pub fn total_allocated(&self) -> f64 {
        self.allocation_results.iter().map(|r| r.allocated_volume).sum()
    }

    /// Looks up a partner's allocation by name.
    pub fn partner(&self, name: &str) -> Option<&PartnerAllocation> {
        self.allocation_results.iter().find(|r| r.partner == name)
    }
}

/// Audit-log record whose digest is stored for tamper detection.
///
/// Field names serialize in camelCase so digests match the ones the rest of the
/// system computes over the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Action performed, e.g. `reconciliation.create`
    pub action: String,
    /// Identifier of the affected record
    pub entity_id: String,
    /// Identifier of the acting user
    pub user_id: String,
    /// ISO-8601 UTC timestamp with millisecond precision
    pub timestamp: String,
    /// Optional change set; serialized as `null` when absent
    pub changes: Option<serde_json::Value>,
}

/// Allocation output stamped with integrity hashes of its inputs and itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// The allocation result
    pub output: AllocationOutput,
    /// SHA-256 of the canonical [`AllocationPeriod`]
    pub input_hash: String,
    /// SHA-256 of the canonical `output`
    pub output_hash: String,
    /// When the report was stamped; not covered by either hash
    pub generated_at: DateTime<Utc>,
}
