//! Bulk ingestion endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::parse_kind;
use crate::error::{ApiError, ApiResult};
use crate::models::{BatchMeta, BatchResult, BatchStatus};
use crate::services::column_resolver::{
    missing_required, resolve_columns, validate_mapping, ColumnMapping, MappingProposal,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/import/:kind", post(bulk_import))
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    /// Raw header row, order and casing preserved
    pub headers: Vec<String>,
    /// Raw row matrix; cells may be strings, numbers, or null
    pub rows: Vec<Vec<Value>>,
    /// Confirmed mapping; absent means auto-resolution
    #[serde(default)]
    pub mapping: Option<ColumnMapping>,
    /// Shared period and scope for every row
    pub metadata: BatchMeta,
}

/// POST /api/import/{kind}
///
/// Batch status maps onto the response code: success → 201, partial → 207,
/// error → 400. The full per-row ledger is returned in every case; an
/// incomplete mapping is rejected before any row is processed.
async fn bulk_import(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<BulkImportRequest>,
) -> ApiResult<(StatusCode, Json<BatchResult>)> {
    let kind = parse_kind(&kind)?;

    let mapping = settle_mapping(kind, request.mapping, &request.headers)?;

    tracing::info!(
        kind = kind.as_str(),
        rows = request.rows.len(),
        manager = %request.metadata.manager_id,
        "Starting bulk ingestion"
    );

    let result = state
        .engine()
        .run(kind, &mapping, &request.headers, &request.metadata, &request.rows)
        .await;

    let status = match result.status {
        BatchStatus::Success => StatusCode::CREATED,
        BatchStatus::Partial => StatusCode::MULTI_STATUS,
        BatchStatus::Error => StatusCode::BAD_REQUEST,
    };

    Ok((status, Json(result)))
}

/// Settle on the mapping for this batch: validate a user-confirmed one or
/// auto-resolve, then require completeness either way.
fn settle_mapping(
    kind: scorecard_common::RecordKind,
    supplied: Option<ColumnMapping>,
    headers: &[String],
) -> Result<ColumnMapping, ApiError> {
    match supplied {
        Some(supplied) => {
            let mapping = validate_mapping(kind, &supplied, headers)
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;

            let missing = missing_required(kind, &mapping);
            if !missing.is_empty() {
                return Err(ApiError::MappingIncomplete(MappingProposal {
                    mapping,
                    unmapped_required: missing,
                }));
            }
            Ok(mapping)
        }
        None => {
            let proposal = resolve_columns(kind, headers);
            if !proposal.is_complete() {
                return Err(ApiError::MappingIncomplete(proposal));
            }
            Ok(proposal.mapping)
        }
    }
}
