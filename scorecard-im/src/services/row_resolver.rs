//! Row resolver
//!
//! Turns one raw spreadsheet row into a [`CanonicalRow`]: extracts the
//! mapped cells, runs each through its field's normalizer, resolves the
//! associate against the person directory, and fills the reporting period
//! from batch metadata or the engine clock. A row either fully resolves or
//! produces a single row-scoped failure reason; blank rows are skipped
//! without counting as errors.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::models::{BatchMeta, CanonicalRow};
use crate::services::column_resolver::ColumnMapping;
use crate::services::directory::PersonDirectory;
use scorecard_common::normalize;
use scorecard_common::{Clock, FieldClass, RecordKind};

/// Outcome of resolving one row
#[derive(Debug)]
pub enum RowOutcome {
    Resolved(CanonicalRow),
    /// Entirely blank row; not an error
    Skipped,
    /// Row-scoped failure with a user-actionable reason
    Failed(String),
}

pub struct RowResolver<'a> {
    kind: RecordKind,
    /// Canonical field name → column index in the submitted matrix
    indexes: HashMap<String, usize>,
    meta: &'a BatchMeta,
    directory: &'a dyn PersonDirectory,
    clock: &'a dyn Clock,
}

impl<'a> RowResolver<'a> {
    pub fn new(
        kind: RecordKind,
        mapping: &ColumnMapping,
        headers: &[String],
        meta: &'a BatchMeta,
        directory: &'a dyn PersonDirectory,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            kind,
            indexes: mapping.column_indexes(headers),
            meta,
            directory,
            clock,
        }
    }

    /// Resolve one row. `index` is the row's 0-based position in the
    /// submitted matrix and is carried through to the result ledger.
    pub async fn resolve(&self, index: usize, row: &[Value]) -> RowOutcome {
        if is_blank(row) {
            return RowOutcome::Skipped;
        }

        let person = match self.resolve_person(row).await {
            Ok(Some(person)) => person,
            Ok(None) => {
                return RowOutcome::Failed(match self.identifier_cells(row) {
                    Some(identifier) => {
                        format!("Associate not found in directory: {}", identifier)
                    }
                    None => "Row has no associate name or ID".to_string(),
                });
            }
            Err(e) => return RowOutcome::Failed(format!("Directory lookup failed: {}", e)),
        };

        let mut metrics = BTreeMap::new();
        let mut row_month = None;
        let mut row_week = None;

        for spec in self.kind.fields() {
            let Some(raw) = self.raw_cell(row, spec.name) else {
                continue;
            };

            match spec.class {
                FieldClass::Identifier => {} // consumed by person resolution
                FieldClass::Month => row_month = Some(normalize::normalize_month(&raw)),
                FieldClass::Week => row_week = Some(normalize::normalize_week(&raw)),
                FieldClass::Percentage => {
                    metrics.insert(
                        spec.name.to_string(),
                        normalize::normalize_percentage(&raw),
                    );
                }
                FieldClass::Count => {
                    metrics.insert(spec.name.to_string(), normalize::normalize_count(&raw));
                }
            }
        }

        // Period defaults: row value, then batch metadata, then the clock.
        // Week is never guessed from the clock; a weekly kind with no week
        // anywhere fails in the validation gate.
        let year = self.meta.year.unwrap_or_else(|| self.clock.current_year());
        let month = row_month
            .or_else(|| {
                self.meta
                    .month
                    .as_deref()
                    .map(normalize::normalize_month)
            })
            .unwrap_or_else(|| self.clock.current_month_name());
        let week = row_week.or_else(|| self.meta.week.as_deref().map(normalize::normalize_week));

        RowOutcome::Resolved(CanonicalRow {
            index,
            person,
            year,
            month,
            week,
            metrics,
        })
    }

    /// Try the external-ID field first, then the display-name field,
    /// against active directory entries only.
    async fn resolve_person(
        &self,
        row: &[Value],
    ) -> scorecard_common::Result<Option<crate::models::PersonLink>> {
        for field in ["associateId", "associateName"] {
            if let Some(identifier) = self.raw_cell(row, field) {
                if let Some(person) = self.directory.lookup(&identifier, true).await? {
                    return Ok(Some(person));
                }
            }
        }
        Ok(None)
    }

    /// The identifier the row actually carried, for error messages
    fn identifier_cells(&self, row: &[Value]) -> Option<String> {
        self.raw_cell(row, "associateId")
            .or_else(|| self.raw_cell(row, "associateName"))
    }

    /// Trimmed text of the mapped cell, or None when the field is unmapped,
    /// the row is short, or the cell is empty
    fn raw_cell(&self, row: &[Value], field: &str) -> Option<String> {
        let i = *self.indexes.get(field)?;
        let text = normalize::normalize_identifier(&cell_text(row.get(i)?));
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// True when every cell is empty, null, or whitespace
pub fn is_blank(row: &[Value]) -> bool {
    row.iter().all(|cell| cell_text(cell).trim().is_empty())
}

/// Render one JSON cell as the text a spreadsheet user typed
pub(crate) fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonLink;
    use crate::services::column_resolver::resolve_columns;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use scorecard_common::time::FixedClock;
    use serde_json::json;
    use uuid::Uuid;

    struct CannedDirectory {
        people: Vec<PersonLink>,
    }

    #[async_trait]
    impl PersonDirectory for CannedDirectory {
        async fn lookup(
            &self,
            identifier: &str,
            _active_only: bool,
        ) -> scorecard_common::Result<Option<PersonLink>> {
            let needle = identifier.trim().to_lowercase();
            Ok(self
                .people
                .iter()
                .find(|p| {
                    p.display_name.to_lowercase() == needle
                        || p.external_id.as_deref().map(str::to_lowercase) == Some(needle.clone())
                })
                .cloned())
        }
    }

    fn jane() -> PersonLink {
        PersonLink {
            person_id: Uuid::new_v4(),
            display_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            external_id: Some("DA100".to_string()),
        }
    }

    fn meta() -> BatchMeta {
        BatchMeta {
            manager_id: Uuid::new_v4(),
            year: Some(2024),
            month: None,
            week: None,
        }
    }

    fn clock() -> FixedClock {
        FixedClock(chrono::Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap())
    }

    fn productivity_headers() -> Vec<String> {
        ["Associate Name", "Month", "Week", "Productivity %"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    #[tokio::test]
    async fn resolves_a_typical_row() {
        let headers = productivity_headers();
        let mapping = resolve_columns(RecordKind::Productivity, &headers).mapping;
        let directory = CannedDirectory { people: vec![jane()] };
        let meta = meta();
        let clock = clock();
        let resolver = RowResolver::new(
            RecordKind::Productivity,
            &mapping,
            &headers,
            &meta,
            &directory,
            &clock,
        );

        let row = vec![json!("jane doe"), json!("mar"), json!("week 11"), json!("0.92")];
        let outcome = resolver.resolve(0, &row).await;

        let RowOutcome::Resolved(canonical) = outcome else {
            panic!("expected resolution, got {:?}", outcome);
        };
        // Canonical display name, not the spreadsheet spelling
        assert_eq!(canonical.person.display_name, "Jane Doe");
        assert_eq!(canonical.month, "March");
        assert_eq!(canonical.week.as_deref(), Some("Week 11"));
        assert_eq!(canonical.year, 2024);
        assert_eq!(canonical.metrics["productivityPercentage"], 92.0);
    }

    #[tokio::test]
    async fn blank_rows_are_skipped() {
        let headers = productivity_headers();
        let mapping = resolve_columns(RecordKind::Productivity, &headers).mapping;
        let directory = CannedDirectory { people: vec![] };
        let meta = meta();
        let clock = clock();
        let resolver = RowResolver::new(
            RecordKind::Productivity,
            &mapping,
            &headers,
            &meta,
            &directory,
            &clock,
        );

        let row = vec![json!(""), json!(null), json!("   "), json!(null)];
        assert!(matches!(resolver.resolve(4, &row).await, RowOutcome::Skipped));
    }

    #[tokio::test]
    async fn unknown_person_fails_with_the_identifier() {
        let headers = productivity_headers();
        let mapping = resolve_columns(RecordKind::Productivity, &headers).mapping;
        let directory = CannedDirectory { people: vec![jane()] };
        let meta = meta();
        let clock = clock();
        let resolver = RowResolver::new(
            RecordKind::Productivity,
            &mapping,
            &headers,
            &meta,
            &directory,
            &clock,
        );

        let row = vec![json!("Nobody Here"), json!("3"), json!("12"), json!("80")];
        let RowOutcome::Failed(reason) = resolver.resolve(2, &row).await else {
            panic!("expected failure");
        };
        assert!(reason.contains("Nobody Here"), "reason: {}", reason);
    }

    #[tokio::test]
    async fn period_defaults_come_from_metadata_then_clock() {
        let headers = vec!["Associate Name".to_string(), "Productivity %".to_string()];
        let mapping = resolve_columns(RecordKind::Productivity, &headers).mapping;
        let directory = CannedDirectory { people: vec![jane()] };
        let meta = BatchMeta {
            manager_id: Uuid::new_v4(),
            year: None,
            month: None,
            week: Some("week 9".to_string()),
        };
        let clock = clock();
        let resolver = RowResolver::new(
            RecordKind::Productivity,
            &mapping,
            &headers,
            &meta,
            &directory,
            &clock,
        );

        let row = vec![json!("DA100"), json!(95)];
        let RowOutcome::Resolved(canonical) = resolver.resolve(0, &row).await else {
            panic!("expected resolution");
        };
        assert_eq!(canonical.year, 2024); // clock
        assert_eq!(canonical.month, "March"); // clock
        assert_eq!(canonical.week.as_deref(), Some("Week 9")); // metadata, normalized
    }

    #[tokio::test]
    async fn numeric_cells_may_be_json_numbers() {
        let headers = productivity_headers();
        let mapping = resolve_columns(RecordKind::Productivity, &headers).mapping;
        let directory = CannedDirectory { people: vec![jane()] };
        let meta = meta();
        let clock = clock();
        let resolver = RowResolver::new(
            RecordKind::Productivity,
            &mapping,
            &headers,
            &meta,
            &directory,
            &clock,
        );

        let row = vec![json!("DA100"), json!(3), json!(12), json!(0.85)];
        let RowOutcome::Resolved(canonical) = resolver.resolve(0, &row).await else {
            panic!("expected resolution");
        };
        assert_eq!(canonical.month, "March");
        assert_eq!(canonical.week.as_deref(), Some("Week 12"));
        assert_eq!(canonical.metrics["productivityPercentage"], 85.0);
    }
}
