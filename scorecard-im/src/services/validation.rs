//! Validation gate
//!
//! Domain acceptance rules applied to a resolved row before persistence.
//! Every rejection names the offending field and value; the normalizers
//! deliberately pass unrecognized input through so the messages here can
//! quote exactly what the spreadsheet said.

use crate::models::CanonicalRow;
use scorecard_common::normalize::MONTH_NAMES;
use scorecard_common::{FieldClass, RecordKind};

/// Check one resolved row against its kind's rules.
///
/// Returns the first violation as a user-actionable message. Bulk ingestion
/// calls this per row; single-record creation additionally consults the
/// duplicate checker (bulk deliberately does not, see the engine).
pub fn validate(kind: RecordKind, row: &CanonicalRow) -> Result<(), String> {
    // Month must have normalized to a canonical name
    if !MONTH_NAMES.contains(&row.month.as_str()) {
        return Err(format!("Unrecognized month: {}", row.month));
    }

    // Weekly kinds need a parseable week label
    if kind.period_field() == "week" {
        match &row.week {
            None => return Err("Missing required field: week".to_string()),
            Some(week) if !is_canonical_week(week) => {
                return Err(format!("Unrecognized week: {}", week));
            }
            Some(_) => {}
        }
    } else if let Some(week) = &row.week {
        // A stray week on a monthly kind is accepted only in canonical form
        if !is_canonical_week(week) {
            return Err(format!("Unrecognized week: {}", week));
        }
    }

    for spec in kind.fields() {
        let is_numeric = matches!(spec.class, FieldClass::Percentage | FieldClass::Count);
        if !is_numeric {
            continue;
        }

        match row.metrics.get(spec.name) {
            None if spec.required => {
                // Absence is an error, not a default substitution
                return Err(format!("Missing required field: {}", spec.name));
            }
            None => {}
            Some(&value) => {
                if let Some(range) = spec.range {
                    if !range.contains(value) {
                        return Err(format!(
                            "{} value {} out of range (expected {})",
                            spec.name,
                            value,
                            range.describe()
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

/// `"Week {n}"` with n in 1-53, exactly as the normalizer emits it
fn is_canonical_week(week: &str) -> bool {
    week.strip_prefix("Week ")
        .and_then(|n| n.parse::<u32>().ok())
        .map(|n| (1..=53).contains(&n))
        .unwrap_or(false)
}
