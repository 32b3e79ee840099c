//! Integrity hashing for allocation records and audit-log entries.
//!
//! Every digest is SHA-256 over the canonical JSON form of a value: object keys
//! sorted lexicographically at every depth, no insignificant whitespace, and
//! serde_json's shortest round-trip float formatting. Any implementation that
//! follows the same rules reproduces the same hex digest.
//!
//! Verification is equality of a recomputed digest against a stored one. The
//! hasher never interprets or repairs data.

use barrel_types::AuditEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::BarrelResult;

/// Lower-case hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Serializes `data` to canonical JSON.
pub fn canonical_json<T: Serialize + ?Sized>(data: &T) -> BarrelResult<String> {
    let value = canonicalize(serde_json::to_value(data)?);
    Ok(serde_json::to_string(&value)?)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(String, Value)> = map.into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(fields.into_iter().map(|(k, v)| (k, canonicalize(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// SHA-256 hex digest of the canonical JSON form of `data`.
pub fn hash<T: Serialize + ?Sized>(data: &T) -> BarrelResult<String> {
    Ok(sha256_hex(canonical_json(data)?.as_bytes()))
}

/// Recomputes the digest of `data` and compares it to `expected_hash`.
///
/// Data that cannot be serialized never verifies.
pub fn verify_hash<T: Serialize + ?Sized>(data: &T, expected_hash: &str) -> bool {
    match hash(data) {
        Ok(actual) => actual == expected_hash,
        Err(err) => {
            tracing::debug!(error = %err, "hash verification could not serialize data");
            false
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn audit_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn audit_entry(
    action: &str,
    entity_id: &str,
    user_id: &str,
    timestamp: DateTime<Utc>,
    changes: Option<Value>,
) -> AuditEntry {
    AuditEntry {
        action: action.to_string(),
        entity_id: entity_id.to_string(),
        user_id: user_id.to_string(),
        timestamp: audit_timestamp(timestamp),
        changes,
    }
}

/// Digest of an audit-log record `{action, entityId, userId, timestamp, changes}`.
pub fn create_audit_hash(
    action: &str,
    entity_id: &str,
    user_id: &str,
    timestamp: DateTime<Utc>,
    changes: Option<Value>,
) -> BarrelResult<String> {
    hash(&audit_entry(action, entity_id, user_id, timestamp, changes))
}
