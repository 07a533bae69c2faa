//! Person directory lookup
//!
//! The directory is an external read path as far as ingestion is concerned:
//! rows carry a display name or badge ID, and each row resolves it fresh
//! (the directory can change between uploads). The trait seam exists so the
//! pipeline can be exercised against a canned directory in tests.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::PersonLink;
use scorecard_common::normalize::normalize_identifier;
use scorecard_common::{Error, Result};

/// Lookup by display name or external ID, case-insensitive
#[async_trait]
pub trait PersonDirectory: Send + Sync {
    /// Find one matching entry, or None. `active_only` filters out
    /// departed associates; ingestion always passes true.
    async fn lookup(&self, identifier: &str, active_only: bool) -> Result<Option<PersonLink>>;
}

/// Directory backed by the shared `people` table
pub struct SqlitePersonDirectory {
    db: SqlitePool,
}

impl SqlitePersonDirectory {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonDirectory for SqlitePersonDirectory {
    async fn lookup(&self, identifier: &str, active_only: bool) -> Result<Option<PersonLink>> {
        let needle = normalize_identifier(identifier);
        if needle.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, (String, Option<String>, String, String)>(
            r#"
            SELECT id, external_id, display_name, email
            FROM people
            WHERE (LOWER(display_name) = LOWER(?1) OR LOWER(external_id) = LOWER(?1))
              AND (?2 = 0 OR active = 1)
            LIMIT 1
            "#,
        )
        .bind(needle)
        .bind(active_only as i64)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some((id, external_id, display_name, email)) => {
                let person_id = Uuid::parse_str(&id)
                    .map_err(|e| Error::Internal(format!("Corrupt person id {}: {}", id, e)))?;
                Ok(Some(PersonLink {
                    person_id,
                    display_name,
                    email,
                    external_id,
                }))
            }
            None => Ok(None),
        }
    }
}
