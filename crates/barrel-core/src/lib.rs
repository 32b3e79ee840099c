//! Core functionality for the Barrel allocation engine.
//!
//! Reconciles hydrocarbon volumes reported by production partners against a
//! single terminal measurement: every partner's gross reading is corrected to a
//! net volume, the terminal volume is distributed in proportion to net
//! contribution under percentage and gross-input caps, and results can be
//! stamped with SHA-256 digests for tamper detection.
//!
//! The engine performs no I/O and keeps no state between calls.

/// Proportional allocation with capping and residual redistribution
pub mod allocator;
/// Engine settings and TOML loading
pub mod config;
/// Stateless engine façade
pub mod engine;
/// Typed engine errors
pub mod error;
/// Canonical JSON hashing and audit digests
pub mod integrity;

pub use allocator::ProportionalAllocator;
pub use config::AllocationConfig;
pub use engine::AllocationEngine;
pub use error::{BarrelError, BarrelResult};
pub use integrity::{canonical_json, create_audit_hash, hash, verify_hash};

pub use barrel_types::{
    AllocationInput, AllocationOutput, AllocationPeriod, AllocationReport, AuditEntry,
    CorrectedEntry, CorrectionFactors, PartnerAllocation, TerminalReading,
};
