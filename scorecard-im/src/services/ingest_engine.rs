//! Batch ingestion engine
//!
//! Runs one upload as a single sequential pass: resolve → validate →
//! persist per row, with every failure captured as a row-scoped ledger
//! entry. A bad row never stops the batch; a submitted batch always runs to
//! completion. After aggregation the per-person digests are handed to a
//! detached notification task, so delivery can neither delay nor fail the
//! response.

use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::records;
use crate::models::{BatchMeta, BatchResult, RowError};
use crate::services::column_resolver::ColumnMapping;
use crate::services::directory::PersonDirectory;
use crate::services::notifier::{self, Notifier};
use crate::services::row_resolver::{RowOutcome, RowResolver};
use crate::services::validation;
use scorecard_common::{Clock, RecordKind};

pub struct IngestEngine {
    db: SqlitePool,
    directory: Arc<dyn PersonDirectory>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl IngestEngine {
    pub fn new(
        db: SqlitePool,
        directory: Arc<dyn PersonDirectory>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            directory,
            notifier,
            clock,
        }
    }

    /// Ingest one batch. The mapping must already be complete; callers
    /// check that precondition before any row is touched.
    ///
    /// Bulk ingestion deliberately skips the duplicate checker: re-importing
    /// an overlapping spreadsheet appends a second set of records. Only
    /// single-record creation rejects duplicates.
    pub async fn run(
        &self,
        kind: RecordKind,
        mapping: &ColumnMapping,
        headers: &[String],
        meta: &BatchMeta,
        rows: &[Vec<Value>],
    ) -> BatchResult {
        let resolver = RowResolver::new(
            kind,
            mapping,
            headers,
            meta,
            self.directory.as_ref(),
            self.clock.as_ref(),
        );

        let mut successes = Vec::new();
        let mut failed = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            match resolver.resolve(index, row).await {
                RowOutcome::Skipped => {
                    tracing::debug!(row = index, "Skipping blank row");
                }
                RowOutcome::Failed(reason) => {
                    failed.push(RowError {
                        index,
                        record: row.clone(),
                        error: reason,
                    });
                }
                RowOutcome::Resolved(canonical) => {
                    if let Err(reason) = validation::validate(kind, &canonical) {
                        failed.push(RowError {
                            index,
                            record: row.clone(),
                            error: reason,
                        });
                        continue;
                    }

                    let person = canonical.person.clone();
                    let record = canonical.into_record(kind, meta.manager_id, self.clock.now());

                    // Each row persists independently; no cross-row transaction
                    match records::insert_record(&self.db, &record).await {
                        Ok(()) => successes.push((person, record)),
                        Err(e) => {
                            tracing::error!(
                                row = index,
                                person = %record.person_name,
                                error = %e,
                                "Failed to persist record"
                            );
                            failed.push(RowError {
                                index,
                                record: row.clone(),
                                error: format!("Failed to save record: {}", e),
                            });
                        }
                    }
                }
            }
        }

        let result = BatchResult::new(
            successes.iter().map(|(_, record)| record.clone()).collect(),
            failed,
        );

        tracing::info!(
            kind = kind.as_str(),
            total = result.total,
            success = result.success.len(),
            failed = result.failed.len(),
            status = ?result.status,
            "Batch ingestion complete"
        );

        // Fire-and-forget: the response never waits on delivery
        let digests = notifier::group_digests(&successes);
        if !digests.is_empty() {
            let notifier = Arc::clone(&self.notifier);
            tokio::spawn(async move {
                let (sent, failed) = notifier::fan_out(notifier, digests).await;
                tracing::debug!(sent, failed, "Digest fan-out finished");
            });
        }

        result
    }
}
