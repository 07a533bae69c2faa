//! Single-record creation
//!
//! The one path that consults the duplicate checker: creating the same
//! (person, period, manager) record twice is rejected with 409, unlike bulk
//! ingestion which appends.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::parse_kind;
use crate::db::records;
use crate::error::{ApiError, ApiResult};
use crate::models::CanonicalRow;
use crate::services::notifier;
use crate::services::row_resolver::cell_text;
use crate::services::validation;
use crate::AppState;
use scorecard_common::db::models::MetricRecord;
use scorecard_common::normalize;
use scorecard_common::{FieldClass, RecordKind};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/records/:kind", post(create_record))
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    /// Display name or external ID, resolved against the directory
    pub person: String,
    pub manager_id: Uuid,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub week: Option<String>,
    /// Metric values keyed by canonical field name; strings and numbers
    /// both accepted and run through the same normalizers as bulk uploads
    #[serde(default)]
    pub metrics: HashMap<String, Value>,
}

/// POST /api/records/{kind}
///
/// 201 on create, 409 on duplicate-for-period, 400 on validation failure.
async fn create_record(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<CreateRecordRequest>,
) -> ApiResult<(StatusCode, Json<MetricRecord>)> {
    let kind = parse_kind(&kind)?;

    let person = state
        .directory
        .lookup(&request.person, true)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Associate not found in directory: {}",
                request.person
            ))
        })?;

    let metrics = normalize_metrics(kind, &request.metrics)?;

    let row = CanonicalRow {
        index: 0,
        person: person.clone(),
        year: request.year.unwrap_or_else(|| state.clock.current_year()),
        month: request
            .month
            .as_deref()
            .map(normalize::normalize_month)
            .unwrap_or_else(|| state.clock.current_month_name()),
        week: request.week.as_deref().map(normalize::normalize_week),
        metrics,
    };

    validation::validate(kind, &row).map_err(ApiError::BadRequest)?;

    let exists = records::exists_for_period(
        &state.db,
        kind,
        row.person.person_id,
        row.year,
        &row.month,
        row.week.as_deref(),
        request.manager_id,
    )
    .await?;

    if exists {
        return Err(ApiError::Conflict(format!(
            "A {} record already exists for {} in {} {}{}",
            kind.as_str(),
            person.display_name,
            row.month,
            row.year,
            row.week
                .as_deref()
                .map(|w| format!(" ({})", w))
                .unwrap_or_default(),
        )));
    }

    let record = row.into_record(kind, request.manager_id, state.clock.now());
    records::insert_record(&state.db, &record).await?;

    tracing::info!(
        kind = kind.as_str(),
        person = %record.person_name,
        "Created single record"
    );

    // Same best-effort digest as a one-row batch
    let digests = notifier::group_digests(&[(person, record.clone())]);
    let notifier_handle = Arc::clone(&state.notifier);
    tokio::spawn(async move {
        notifier::fan_out(notifier_handle, digests).await;
    });

    Ok((StatusCode::CREATED, Json(record)))
}

/// Normalize the request's metric values by field class, rejecting names
/// the kind does not declare as numeric fields.
fn normalize_metrics(
    kind: RecordKind,
    supplied: &HashMap<String, Value>,
) -> Result<BTreeMap<String, f64>, ApiError> {
    let mut metrics = BTreeMap::new();

    for (name, value) in supplied {
        let spec = kind.field(name).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unknown metric field for {}: {}",
                kind.as_str(),
                name
            ))
        })?;

        let text = cell_text(value);
        let normalized = match spec.class {
            FieldClass::Percentage => normalize::normalize_percentage(&text),
            FieldClass::Count => normalize::normalize_count(&text),
            _ => {
                return Err(ApiError::BadRequest(format!(
                    "Field {} is not a metric value",
                    name
                )));
            }
        };

        metrics.insert(spec.name.to_string(), normalized);
    }

    Ok(metrics)
}
