//! Range checks for partner entries and terminal readings.
//!
//! Violations are reported as human-readable messages rather than errors; the
//! caller decides whether a non-empty list blocks submission.

use barrel_types::{AllocationInput, TerminalReading};

pub const TEMPERATURE_MIN_F: f64 = -50.0;
pub const TEMPERATURE_MAX_F: f64 = 200.0;
pub const API_GRAVITY_MIN: f64 = 10.0;
pub const API_GRAVITY_MAX: f64 = 45.0;
pub const BSW_MIN: f64 = 0.0;
pub const BSW_MAX_EXCLUSIVE: f64 = 100.0;

/// Inclusive range check. Non-finite values are never in range.
fn within(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

/// Validates every entry, returning one message per violation.
///
/// Entries are numbered from 1 in the messages.
pub fn validate_inputs(entries: &[AllocationInput]) -> Vec<String> {
    let mut violations = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        let position = idx + 1;
        let label = if entry.partner.trim().is_empty() {
            violations.push(format!("Entry {position}: partner name is required"));
            format!("Entry {position}")
        } else {
            format!("Entry {position} ({})", entry.partner)
        };

        if !(entry.gross_volume_bbl.is_finite() && entry.gross_volume_bbl > 0.0) {
            violations.push(format!(
                "{label}: gross volume must be greater than 0 bbl (got {})",
                entry.gross_volume_bbl
            ));
        }

        let bsw = entry.bsw_percent;
        if !(bsw.is_finite() && bsw >= BSW_MIN && bsw < BSW_MAX_EXCLUSIVE) {
            violations.push(format!(
                "{label}: BS&W must be at least {BSW_MIN}% and below {BSW_MAX_EXCLUSIVE}% (got {bsw})"
            ));
        }

        if !within(entry.temperature_deg_f, TEMPERATURE_MIN_F, TEMPERATURE_MAX_F) {
            violations.push(format!(
                "{label}: temperature must be between {TEMPERATURE_MIN_F}°F and {TEMPERATURE_MAX_F}°F (got {})",
                entry.temperature_deg_f
            ));
        }

        if !within(entry.api_gravity, API_GRAVITY_MIN, API_GRAVITY_MAX) {
            violations.push(format!(
                "{label}: API gravity must be between {API_GRAVITY_MIN} and {API_GRAVITY_MAX} (got {})",
                entry.api_gravity
            ));
        }
    }

    violations
}

/// Validates the terminal reading the period is reconciled against.
pub fn validate_terminal(terminal: &TerminalReading) -> Vec<String> {
    let mut violations = Vec::new();

    if !(terminal.final_volume_bbl.is_finite() && terminal.final_volume_bbl > 0.0) {
        violations.push(format!(
            "Terminal: final volume must be greater than 0 bbl (got {})",
            terminal.final_volume_bbl
        ));
    }
    if !within(terminal.api_gravity, API_GRAVITY_MIN, API_GRAVITY_MAX) {
        violations.push(format!(
            "Terminal: API gravity must be between {API_GRAVITY_MIN} and {API_GRAVITY_MAX} (got {})",
            terminal.api_gravity
        ));
    }

    violations
}
