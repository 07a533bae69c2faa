//! Database models

use crate::kinds::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One directory entry: a person records can be filed against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    /// Badge / DA ID as printed on uploads, if known
    pub external_id: Option<String>,
    pub display_name: String,
    /// Stable contact address; digests are keyed by this
    pub email: String,
    pub active: bool,
}

/// One persisted performance metric record.
///
/// Created by ingestion, never mutated by it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub id: Uuid,
    pub kind: RecordKind,
    pub person_id: Uuid,
    /// The directory's canonical display name, not the spreadsheet spelling
    pub person_name: String,
    /// The uploading manager's scope
    pub manager_id: Uuid,
    pub year: i32,
    pub month: String,
    /// `"Week {n}"` for weekly kinds, absent for monthly ones
    pub week: Option<String>,
    /// Normalized numeric fields, keyed by canonical field name
    pub metrics: BTreeMap<String, f64>,
    pub created_at: DateTime<Utc>,
}
