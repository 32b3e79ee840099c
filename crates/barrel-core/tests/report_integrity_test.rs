use barrel_core::integrity::{audit_entry, sha256_hex};
use barrel_core::{
    AllocationEngine, AllocationInput, AllocationPeriod, TerminalReading, canonical_json,
    create_audit_hash, hash, verify_hash,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;

fn period() -> AllocationPeriod {
    AllocationPeriod {
        entries: vec![
            AllocationInput::new("A", 1000.0, 2.0, 80.0, 30.0),
            AllocationInput::new("B", 800.0, 3.0, 75.0, 28.0),
        ],
        terminal: TerminalReading::new(950.0, 32.0),
    }
}

#[test]
fn stamped_report_verifies_against_its_period() {
    let engine = AllocationEngine::new();
    let period = period();
    let report = engine.stamp_report(&period).unwrap();

    assert_eq!(report.input_hash.len(), 64);
    assert_eq!(report.output_hash, hash(&report.output).unwrap());
    assert!(engine.verify_report(&period, &report));
}

#[test]
fn tampered_output_fails_verification() {
    let engine = AllocationEngine::new();
    let period = period();
    let mut report = engine.stamp_report(&period).unwrap();
    report.output.allocation_results[0].allocated_volume += 0.01;
    assert!(!engine.verify_report(&period, &report));
}

#[test]
fn tampered_inputs_fail_verification() {
    let engine = AllocationEngine::new();
    let mut period = period();
    let report = engine.stamp_report(&period).unwrap();
    period.entries[1].bsw_percent = 3.5;
    assert!(!engine.verify_report(&period, &report));
}

#[test]
fn stamping_twice_gives_the_same_digests() {
    let engine = AllocationEngine::new();
    let period = period();
    let one = engine.stamp_report(&period).unwrap();
    let two = engine.stamp_report(&period).unwrap();
    assert_eq!(one.input_hash, two.input_hash);
    assert_eq!(one.output_hash, two.output_hash);
}

#[test]
fn period_serializes_with_sorted_keys() {
    let canonical = canonical_json(&period().terminal).unwrap();
    assert_eq!(canonical, r#"{"api_gravity":32.0,"final_volume_bbl":950.0}"#);

    let entry = canonical_json(&period().entries[0]).unwrap();
    assert!(entry.starts_with(r#"{"api_gravity":30.0,"bsw_percent":2.0,"gross_volume_bbl":1000.0,"partner":"A","temperature_degF":80.0}"#));
}

#[test]
fn audit_hash_matches_hash_of_audit_entry() {
    let ts = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
    let changes = Some(json!({"status": "approved"}));
    let entry = audit_entry("approve", "rec-42", "user-7", ts, changes.clone());
    assert_eq!(entry.timestamp, "2025-06-30T23:59:59.000Z");
    assert_eq!(
        create_audit_hash("approve", "rec-42", "user-7", ts, changes).unwrap(),
        hash(&entry).unwrap()
    );
    assert_eq!(hash(&entry).unwrap(), sha256_hex(canonical_json(&entry).unwrap().as_bytes()));
}

proptest! {
    #[test]
    fn hash_round_trips_and_detects_mutation(
        partner in "[A-Za-z ]{1,20}",
        gross in 0.01f64..1_000_000.0,
        bsw in 0.0f64..99.0,
    ) {
        let record = AllocationInput::new(partner, gross, bsw, 60.0, 30.0);
        let digest = hash(&record).unwrap();
        prop_assert!(verify_hash(&record, &digest));

        let mut mutated = record.clone();
        mutated.gross_volume_bbl = gross + 1.0;
        prop_assert!(!verify_hash(&mutated, &digest));

        let mut renamed = record;
        renamed.partner.push('x');
        prop_assert!(!verify_hash(&renamed, &digest));
    }
}
