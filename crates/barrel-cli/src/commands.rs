use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use barrel_core::{AllocationConfig, AllocationEngine, AllocationPeriod, integrity};
use serde::Serialize;
use tracing::{info, warn};

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn engine(config: Option<&Path>) -> Result<AllocationEngine> {
    let config = match config {
        Some(path) => AllocationConfig::load(path)?,
        None => AllocationConfig::load_from_env()?,
    };
    Ok(AllocationEngine::with_config(config)?)
}

fn print<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered =
        if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    println!("{rendered}");
    Ok(())
}

pub fn allocate(input: &Path, config: Option<&Path>, pretty: bool) -> Result<ExitCode> {
    let engine = engine(config)?;
    let period: AllocationPeriod = read_json(input)?;

    let violations = engine.validate_period(&period);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("{violation}");
        }
        warn!(count = violations.len(), "period rejected by validation");
        return Ok(ExitCode::FAILURE);
    }

    let report = engine.stamp_report(&period)?;
    for warning in &report.output.warnings {
        warn!("{}", warning);
    }
    info!(
        partners = report.output.allocation_results.len(),
        output_hash = %report.output_hash,
        "allocation complete"
    );
    print(&report, pretty)?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct NetVolumePreview<'a> {
    partner: &'a str,
    #[serde(flatten)]
    factors: barrel_core::CorrectionFactors,
}

pub fn net_volume(input: &Path, config: Option<&Path>) -> Result<ExitCode> {
    let engine = engine(config)?;
    let period: AllocationPeriod = read_json(input)?;

    let previews: Vec<NetVolumePreview<'_>> = period
        .entries
        .iter()
        .map(|entry| NetVolumePreview {
            partner: &entry.partner,
            factors: engine.compute_correction_factors(entry, period.terminal.api_gravity),
        })
        .collect();
    print(&previews, true)?;
    Ok(ExitCode::SUCCESS)
}

pub fn hash(input: &Path) -> Result<ExitCode> {
    let document: serde_json::Value = read_json(input)?;
    println!("{}", integrity::hash(&document)?);
    Ok(ExitCode::SUCCESS)
}

pub fn verify(input: &Path, expected: &str) -> Result<ExitCode> {
    let document: serde_json::Value = read_json(input)?;
    if integrity::verify_hash(&document, expected) {
        println!("OK");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("MISMATCH");
        Ok(ExitCode::FAILURE)
    }
}
