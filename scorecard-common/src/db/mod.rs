//! Database initialization shared by Scorecard services

pub mod models;

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create all Scorecard tables (idempotent, safe to call multiple times)
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    create_people_table(pool).await?;
    create_metric_records_table(pool).await?;
    Ok(())
}

/// People directory table.
///
/// Lookup is by display name or external ID, case-insensitive; `active`
/// filters out departed associates.
pub async fn create_people_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS people (
            id TEXT PRIMARY KEY,
            external_id TEXT,
            display_name TEXT NOT NULL,
            email TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Persisted metric records.
///
/// `metrics` holds the normalized numeric fields as a JSON object; the
/// period key is (year, month, week) with week NULL for monthly kinds.
pub async fn create_metric_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metric_records (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            person_id TEXT NOT NULL REFERENCES people(id),
            person_name TEXT NOT NULL,
            manager_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            month TEXT NOT NULL,
            week TEXT,
            metrics TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_metric_records_period
        ON metric_records (kind, person_id, year, month, week, manager_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
