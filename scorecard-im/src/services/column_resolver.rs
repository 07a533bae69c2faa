//! Column resolver
//!
//! Maps canonical field names onto whatever headers an uploaded spreadsheet
//! happens to use. Resolution is best-effort and always overridable: the
//! proposal is returned to the caller for confirmation, and ingestion only
//! proceeds once every required field has a target header.
//!
//! Per-field priority order, first hit wins:
//! 1. Exact case-insensitive header match
//! 2. Case-insensitive substring match in either direction
//! 3. Synonym match from the field's keyword table
//!
//! A header claimed by one field is not offered to later fields, so the
//! proposal can never map two fields to the same column.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use scorecard_common::normalize::fold_identifier;
use scorecard_common::RecordKind;

/// One confirmed (canonical field → raw header) assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    pub field: String,
    pub header: String,
}

/// Ordered field-to-header mapping for one upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub entries: Vec<MappingEntry>,
}

impl ColumnMapping {
    /// Header chosen for a canonical field, if any
    pub fn header_for(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.header.as_str())
    }

    /// Resolve each mapped field to its column index in the upload's header
    /// row (case-insensitive header comparison, first occurrence wins).
    pub fn column_indexes(&self, headers: &[String]) -> HashMap<String, usize> {
        let folded: Vec<String> = headers.iter().map(|h| fold_identifier(h)).collect();
        let mut indexes = HashMap::new();

        for entry in &self.entries {
            let target = fold_identifier(&entry.header);
            if let Some(i) = folded.iter().position(|h| *h == target) {
                indexes.insert(entry.field.clone(), i);
            }
        }

        indexes
    }
}

/// Auto-resolution output: the proposal plus what still needs a human
#[derive(Debug, Clone, Serialize)]
pub struct MappingProposal {
    pub mapping: ColumnMapping,
    /// Required canonical fields with no resolvable header; non-empty
    /// blocks automatic ingestion
    pub unmapped_required: Vec<String>,
}

impl MappingProposal {
    pub fn is_complete(&self) -> bool {
        self.unmapped_required.is_empty()
    }
}

/// Problems with a user-supplied mapping
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Unknown canonical field for {kind}: {field}")]
    UnknownField { kind: &'static str, field: String },

    #[error("Header not present in upload: {header} (mapped to {field})")]
    UnknownHeader { field: String, header: String },

    #[error("Two fields mapped to the same header {header}: {first} and {second}")]
    DuplicateTarget {
        header: String,
        first: String,
        second: String,
    },
}

/// Propose a mapping for the given headers.
///
/// Never fails; fields with no plausible header are simply absent from the
/// proposal and, when required, listed in `unmapped_required`.
pub fn resolve_columns(kind: RecordKind, headers: &[String]) -> MappingProposal {
    let folded: Vec<String> = headers.iter().map(|h| fold_identifier(h)).collect();
    let mut claimed = vec![false; headers.len()];
    let mut entries = Vec::new();

    for spec in kind.fields() {
        if let Some(i) = find_header(spec.name, spec.synonyms, &folded, &claimed) {
            claimed[i] = true;
            entries.push(MappingEntry {
                field: spec.name.to_string(),
                header: headers[i].clone(),
            });
        }
    }

    let unmapped_required = kind
        .required_fields()
        .into_iter()
        .filter(|field| !entries.iter().any(|e| e.field == *field))
        .map(|field| field.to_string())
        .collect();

    MappingProposal {
        mapping: ColumnMapping { entries },
        unmapped_required,
    }
}

fn find_header(
    field: &str,
    synonyms: &[&str],
    folded_headers: &[String],
    claimed: &[bool],
) -> Option<usize> {
    let field_folded = field.to_lowercase();

    let available = |i: &usize| !claimed[*i] && !folded_headers[*i].is_empty();

    // Tier 1: exact match
    if let Some(i) = (0..folded_headers.len())
        .filter(available)
        .find(|&i| folded_headers[i] == field_folded)
    {
        return Some(i);
    }

    // Tier 2: substring in either direction
    if let Some(i) = (0..folded_headers.len()).filter(available).find(|&i| {
        folded_headers[i].contains(&field_folded) || field_folded.contains(&folded_headers[i])
    }) {
        return Some(i);
    }

    // Tier 3: first header containing any synonym
    (0..folded_headers.len())
        .filter(available)
        .find(|&i| synonyms.iter().any(|syn| folded_headers[i].contains(syn)))
}

/// Validate a user-supplied mapping against the kind and the upload headers.
///
/// Rejects unknown fields, headers not present in the upload, and two fields
/// aimed at one header (rejection, not silent preference). Returns the
/// mapping reordered into the kind's canonical field order.
pub fn validate_mapping(
    kind: RecordKind,
    supplied: &ColumnMapping,
    headers: &[String],
) -> Result<ColumnMapping, MappingError> {
    let folded_headers: Vec<String> = headers.iter().map(|h| fold_identifier(h)).collect();

    for entry in &supplied.entries {
        if kind.field(&entry.field).is_none() {
            return Err(MappingError::UnknownField {
                kind: kind.as_str(),
                field: entry.field.clone(),
            });
        }

        let target = fold_identifier(&entry.header);
        if !folded_headers.iter().any(|h| *h == target) {
            return Err(MappingError::UnknownHeader {
                field: entry.field.clone(),
                header: entry.header.clone(),
            });
        }
    }

    for (a, entry) in supplied.entries.iter().enumerate() {
        for other in &supplied.entries[a + 1..] {
            if fold_identifier(&entry.header) == fold_identifier(&other.header) {
                return Err(MappingError::DuplicateTarget {
                    header: entry.header.clone(),
                    first: entry.field.clone(),
                    second: other.field.clone(),
                });
            }
        }
    }

    // Canonical field order, so downstream output is deterministic
    let entries = kind
        .fields()
        .iter()
        .filter_map(|spec| {
            supplied.entries.iter().find(|e| e.field == spec.name).map(|e| MappingEntry {
                field: e.field.clone(),
                header: e.header.clone(),
            })
        })
        .collect();

    Ok(ColumnMapping { entries })
}

/// Required fields the mapping leaves uncovered
pub fn missing_required(kind: RecordKind, mapping: &ColumnMapping) -> Vec<String> {
    kind.required_fields()
        .into_iter()
        .filter(|field| mapping.header_for(field).is_none())
        .map(|field| field.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn resolves_typical_productivity_headers() {
        let headers = headers(&["Associate Name", "Month", "Week", "Productivity %"]);
        let proposal = resolve_columns(RecordKind::Productivity, &headers);

        assert!(proposal.is_complete(), "unmapped: {:?}", proposal.unmapped_required);
        assert_eq!(
            proposal.mapping.header_for("associateName"),
            Some("Associate Name")
        );
        assert_eq!(proposal.mapping.header_for("month"), Some("Month"));
        assert_eq!(proposal.mapping.header_for("week"), Some("Week"));
        assert_eq!(
            proposal.mapping.header_for("productivityPercentage"),
            Some("Productivity %")
        );
    }

    #[test]
    fn resolves_reliability_synonyms() {
        let headers = headers(&["DA Name", "Badge", "Period", "Overall Score", "Opps"]);
        let proposal = resolve_columns(RecordKind::Reliability, &headers);

        assert_eq!(proposal.mapping.header_for("associateName"), Some("DA Name"));
        assert_eq!(proposal.mapping.header_for("associateId"), Some("Badge"));
        assert_eq!(proposal.mapping.header_for("month"), Some("Period"));
        assert_eq!(
            proposal.mapping.header_for("overallReliabilityScore"),
            Some("Overall Score")
        );
        assert_eq!(proposal.mapping.header_for("opportunities"), Some("Opps"));
        assert!(proposal.is_complete());
    }

    #[test]
    fn reports_unmapped_required_fields() {
        let headers = headers(&["Associate Name", "Month"]);
        let proposal = resolve_columns(RecordKind::Productivity, &headers);

        assert!(!proposal.is_complete());
        assert!(proposal.unmapped_required.contains(&"week".to_string()));
        assert!(proposal
            .unmapped_required
            .contains(&"productivityPercentage".to_string()));
    }

    #[test]
    fn one_header_is_never_claimed_twice() {
        // "Name" could plausibly match both identifier fields; only the
        // first may take it
        let headers = headers(&["Name", "Week", "Productivity"]);
        let proposal = resolve_columns(RecordKind::Productivity, &headers);

        assert_eq!(proposal.mapping.header_for("associateName"), Some("Name"));
        assert_eq!(proposal.mapping.header_for("associateId"), None);
    }

    #[test]
    fn blank_headers_are_skipped() {
        let headers = headers(&["", "Week", "Productivity %", "Associate Name"]);
        let proposal = resolve_columns(RecordKind::Productivity, &headers);

        // The empty header must not win via the substring tier
        assert_eq!(
            proposal.mapping.header_for("associateName"),
            Some("Associate Name")
        );
    }

    #[test]
    fn validate_rejects_duplicate_targets() {
        let supplied = ColumnMapping {
            entries: vec![
                MappingEntry {
                    field: "associateName".to_string(),
                    header: "Name".to_string(),
                },
                MappingEntry {
                    field: "associateId".to_string(),
                    header: "name".to_string(),
                },
            ],
        };
        let headers = headers(&["Name", "Week", "Productivity %"]);

        let err = validate_mapping(RecordKind::Productivity, &supplied, &headers).unwrap_err();
        assert!(matches!(err, MappingError::DuplicateTarget { .. }));
    }

    #[test]
    fn validate_rejects_unknown_field_and_header() {
        let headers = headers(&["Name", "Week"]);

        let supplied = ColumnMapping {
            entries: vec![MappingEntry {
                field: "favoriteColor".to_string(),
                header: "Name".to_string(),
            }],
        };
        assert!(matches!(
            validate_mapping(RecordKind::Productivity, &supplied, &headers).unwrap_err(),
            MappingError::UnknownField { .. }
        ));

        let supplied = ColumnMapping {
            entries: vec![MappingEntry {
                field: "associateName".to_string(),
                header: "Missing Column".to_string(),
            }],
        };
        assert!(matches!(
            validate_mapping(RecordKind::Productivity, &supplied, &headers).unwrap_err(),
            MappingError::UnknownHeader { .. }
        ));
    }

    #[test]
    fn column_indexes_match_case_insensitively() {
        let headers = headers(&["ASSOCIATE NAME", "Week"]);
        let mapping = ColumnMapping {
            entries: vec![MappingEntry {
                field: "associateName".to_string(),
                header: "Associate Name".to_string(),
            }],
        };

        let indexes = mapping.column_indexes(&headers);
        assert_eq!(indexes.get("associateName"), Some(&0));
    }
}
