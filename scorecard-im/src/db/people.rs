//! People table operations
//!
//! Directory maintenance (hiring, offboarding) happens outside this module;
//! ingestion only reads. Inserts exist for seeding and tests.

use sqlx::SqlitePool;

use scorecard_common::db::models::Person;
use scorecard_common::Result;

/// Insert one directory entry
pub async fn insert_person(pool: &SqlitePool, person: &Person) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO people (id, external_id, display_name, email, active)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(person.id.to_string())
    .bind(&person.external_id)
    .bind(&person.display_name)
    .bind(&person.email)
    .bind(person.active as i64)
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark a directory entry inactive (departed associate)
pub async fn deactivate_person(pool: &SqlitePool, person_id: &str) -> Result<()> {
    sqlx::query("UPDATE people SET active = 0 WHERE id = ?")
        .bind(person_id)
        .execute(pool)
        .await?;

    Ok(())
}
