//! Column-mapping confirmation endpoint
//!
//! Lets a caller preview what auto-resolution would do with an upload's
//! headers, so a human can complete the mapping before ingestion runs.

use axum::{
    extract::Path,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::api::parse_kind;
use crate::error::ApiResult;
use crate::services::column_resolver::{resolve_columns, MappingProposal};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/import/:kind/mapping", post(propose_mapping))
}

#[derive(Debug, Deserialize)]
pub struct MappingRequest {
    /// Raw header row, order and casing preserved
    pub headers: Vec<String>,
}

/// POST /api/import/{kind}/mapping
///
/// Never fails on unmappable headers; unresolved required fields are
/// reported for the caller to fill in.
async fn propose_mapping(
    Path(kind): Path<String>,
    Json(request): Json<MappingRequest>,
) -> ApiResult<Json<MappingProposal>> {
    let kind = parse_kind(&kind)?;
    let proposal = resolve_columns(kind, &request.headers);

    tracing::debug!(
        kind = kind.as_str(),
        headers = request.headers.len(),
        mapped = proposal.mapping.entries.len(),
        unmapped_required = proposal.unmapped_required.len(),
        "Proposed column mapping"
    );

    Ok(Json(proposal))
}
