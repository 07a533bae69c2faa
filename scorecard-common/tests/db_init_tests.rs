//! Database initialization tests

use scorecard_common::db;

#[tokio::test]
async fn init_creates_database_file_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("scorecard.db");

    let pool = db::init_database(&db_path).await.unwrap();
    assert!(db_path.exists());

    // Both tables exist and are queryable
    let people: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(people, 0);

    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM metric_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 0);
}

#[tokio::test]
async fn init_is_idempotent_and_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("scorecard.db");

    let pool = db::init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO people (id, external_id, display_name, email, active) VALUES (?, ?, ?, ?, 1)")
        .bind("00000000-0000-0000-0000-000000000001")
        .bind("DA100")
        .bind("Jane Doe")
        .bind("jane@example.com")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    // Re-open the same file; schema creation must not clobber data
    let pool = db::init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
