//! Metric record persistence

use sqlx::SqlitePool;
use uuid::Uuid;

use scorecard_common::db::models::MetricRecord;
use scorecard_common::{Error, RecordKind, Result};

/// Insert one record. Each row of a batch is its own INSERT; there is no
/// cross-row transaction, so a failed row never rolls back its neighbors.
pub async fn insert_record(pool: &SqlitePool, record: &MetricRecord) -> Result<()> {
    let metrics = serde_json::to_string(&record.metrics)
        .map_err(|e| Error::Internal(format!("Failed to serialize metrics: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO metric_records (
            id, kind, person_id, person_name, manager_id,
            year, month, week, metrics, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.kind.as_str())
    .bind(record.person_id.to_string())
    .bind(&record.person_name)
    .bind(record.manager_id.to_string())
    .bind(record.year as i64)
    .bind(&record.month)
    .bind(&record.week)
    .bind(&metrics)
    .bind(record.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Duplicate checker: does a record already exist for this person, period,
/// and manager scope? Consulted by single-record creation only; bulk
/// ingestion appends without asking.
pub async fn exists_for_period(
    pool: &SqlitePool,
    kind: RecordKind,
    person_id: Uuid,
    year: i32,
    month: &str,
    week: Option<&str>,
    manager_id: Uuid,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM metric_records
        WHERE kind = ?
          AND person_id = ?
          AND year = ?
          AND month = ?
          AND (week = ? OR (week IS NULL AND ? IS NULL))
          AND manager_id = ?
        "#,
    )
    .bind(kind.as_str())
    .bind(person_id.to_string())
    .bind(year as i64)
    .bind(month)
    .bind(week)
    .bind(week)
    .bind(manager_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Count of stored records for one kind (used by tests and diagnostics)
pub async fn count_records(pool: &SqlitePool, kind: RecordKind) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM metric_records WHERE kind = ?")
        .bind(kind.as_str())
        .fetch_one(pool)
        .await?;

    Ok(count)
}
