//! HTTP API for the import module

pub mod health;
pub mod ingest;
pub mod mapping;
pub mod records;

use crate::error::ApiError;
use scorecard_common::RecordKind;

/// Parse the `{kind}` path segment, naming the accepted kinds on failure
pub(crate) fn parse_kind(raw: &str) -> Result<RecordKind, ApiError> {
    RecordKind::parse(raw).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Unknown record kind: {} (expected productivity or reliability)",
            raw
        ))
    })
}
