//! Ingestion pipeline types
//!
//! A raw spreadsheet row either fully resolves to a [`CanonicalRow`] or
//! yields a [`RowError`]; the per-batch ledger of both is the
//! [`BatchResult`]. Nothing here is ever partially persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use scorecard_common::db::models::{MetricRecord, Person};
use scorecard_common::RecordKind;

/// Overall batch outcome, derived purely from per-row counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Every processed row persisted
    Success,
    /// Some rows persisted, some failed
    Partial,
    /// No row persisted
    Error,
}

/// One failed row: index into the submitted matrix, the raw cells for user
/// correction, and a specific reason. Never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub index: usize,
    pub record: Vec<Value>,
    pub error: String,
}

/// Per-batch ledger of row outcomes
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Count of non-blank rows; always `success.len() + failed.len()`
    pub total: usize,
    pub success: Vec<MetricRecord>,
    pub failed: Vec<RowError>,
    pub status: BatchStatus,
}

impl BatchResult {
    /// Assemble the ledger and derive the overall status from counts
    pub fn new(success: Vec<MetricRecord>, failed: Vec<RowError>) -> BatchResult {
        let status = if success.is_empty() {
            BatchStatus::Error
        } else if failed.is_empty() {
            BatchStatus::Success
        } else {
            BatchStatus::Partial
        };

        BatchResult {
            total: success.len() + failed.len(),
            success,
            failed,
            status,
        }
    }
}

/// Resolved identity of a record's subject, fresh from the directory.
///
/// Never cached across requests; the directory can change between uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonLink {
    pub person_id: Uuid,
    /// Canonical display name from the directory entry
    pub display_name: String,
    /// Stable contact address used as the digest grouping key
    pub email: String,
    pub external_id: Option<String>,
}

impl From<Person> for PersonLink {
    fn from(person: Person) -> PersonLink {
        PersonLink {
            person_id: person.id,
            display_name: person.display_name,
            email: person.email,
            external_id: person.external_id,
        }
    }
}

/// Batch-level metadata shared by every row of an upload
#[derive(Debug, Clone, Deserialize)]
pub struct BatchMeta {
    /// The uploading manager's identity; scopes duplicate checks
    pub manager_id: Uuid,
    /// Reporting year; absent falls back to the engine clock
    #[serde(default)]
    pub year: Option<i32>,
    /// Shared reporting month for uploads without a month column
    #[serde(default)]
    pub month: Option<String>,
    /// Shared reporting week for uploads without a week column
    #[serde(default)]
    pub week: Option<String>,
}

/// One fully resolved, validated-ready row
#[derive(Debug, Clone)]
pub struct CanonicalRow {
    /// 0-based index into the submitted matrix
    pub index: usize,
    pub person: PersonLink,
    pub year: i32,
    pub month: String,
    pub week: Option<String>,
    /// Normalized numeric fields, keyed by canonical field name
    pub metrics: BTreeMap<String, f64>,
}

impl CanonicalRow {
    /// Stamp the row into a persistable record
    pub fn into_record(
        self,
        kind: RecordKind,
        manager_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> MetricRecord {
        MetricRecord {
            id: Uuid::new_v4(),
            kind,
            person_id: self.person.person_id,
            person_name: self.person.display_name,
            manager_id,
            year: self.year,
            month: self.month,
            week: self.week,
            metrics: self.metrics,
            created_at,
        }
    }
}
