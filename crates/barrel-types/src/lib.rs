//! Barrel Types
//!
//! This crate defines the plain data structures exchanged between the Barrel
//! crates (`barrel-calculator`, `barrel-core` and the `barrel` binary) and the
//! reconciliation orchestrator that calls them. Everything here is a value type:
//! no behaviour beyond construction helpers and serde support.

#![deny(missing_docs)]

mod types;
pub use types::{
    AllocationInput, AllocationOutput, AllocationPeriod, AllocationReport, AuditEntry,
    CorrectedEntry, CorrectionFactors, PartnerAllocation, TerminalReading,
};
