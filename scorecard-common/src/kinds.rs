//! Record kind descriptors
//!
//! One importable metric family (productivity, reliability) is described by a
//! `RecordKind` plus its static field table. The descriptors parametrize the
//! single generic ingestion pipeline: which canonical fields exist, which are
//! required, which normalizer applies, which synonyms the column resolver may
//! match, and which numeric ranges the validation gate enforces.

use serde::{Deserialize, Serialize};

/// How a canonical field's raw cell gets normalized and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Name or external ID; trimmed, case preserved
    Identifier,
    /// Month name or number; canonical form is the full English name
    Month,
    /// Week label; canonical form is `"Week {n}"`
    Week,
    /// Percentage-like number, subject to the fraction-rescale heuristic
    Percentage,
    /// Non-negative-ish count; no fractional rescaling
    Count,
}

/// Inclusive-by-default numeric domain for a field
#[derive(Debug, Clone, Copy)]
pub struct NumericRange {
    pub min: f64,
    /// Whether `min` itself is excluded (e.g. a denominator must be > 0)
    pub min_exclusive: bool,
    pub max: Option<f64>,
}

impl NumericRange {
    /// Check a normalized value against the range
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };
        above_min && self.max.map_or(true, |max| value <= max)
    }

    /// Human-readable form for validation messages, e.g. "> 0" or "0-100"
    pub fn describe(&self) -> String {
        match (self.min_exclusive, self.max) {
            (true, None) => format!("> {}", self.min),
            (false, None) => format!(">= {}", self.min),
            (true, Some(max)) => format!("> {} and <= {}", self.min, max),
            (false, Some(max)) => format!("{}-{}", self.min, max),
        }
    }
}

/// Descriptor for one canonical field of a record kind
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical field name, independent of spreadsheet spelling
    pub name: &'static str,
    /// Required fields must be mapped to a header before ingestion runs
    pub required: bool,
    pub class: FieldClass,
    /// Human-friendly fragments the column resolver may match in headers
    pub synonyms: &'static [&'static str],
    /// Numeric domain, enforced post-normalization when the value is present
    pub range: Option<NumericRange>,
}

const PRODUCTIVITY_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "associateName",
        required: true,
        class: FieldClass::Identifier,
        synonyms: &["associate", "name", "employee"],
        range: None,
    },
    FieldSpec {
        name: "associateId",
        required: false,
        class: FieldClass::Identifier,
        synonyms: &["badge", "da id", "worker id", "id"],
        range: None,
    },
    FieldSpec {
        name: "month",
        required: false,
        class: FieldClass::Month,
        synonyms: &["month"],
        range: None,
    },
    FieldSpec {
        name: "week",
        required: true,
        class: FieldClass::Week,
        synonyms: &["week", "wk"],
        range: None,
    },
    FieldSpec {
        name: "productivityPercentage",
        required: true,
        class: FieldClass::Percentage,
        synonyms: &["productivity", "prod"],
        range: Some(NumericRange {
            min: 0.0,
            min_exclusive: false,
            max: Some(500.0),
        }),
    },
    FieldSpec {
        name: "tasksCompleted",
        required: false,
        class: FieldClass::Count,
        synonyms: &["tasks", "completed", "units"],
        range: Some(NumericRange {
            min: 0.0,
            min_exclusive: false,
            max: None,
        }),
    },
];

const RELIABILITY_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "associateName",
        required: true,
        class: FieldClass::Identifier,
        synonyms: &["associate", "name", "employee"],
        range: None,
    },
    FieldSpec {
        name: "associateId",
        required: false,
        class: FieldClass::Identifier,
        synonyms: &["badge", "da id", "worker id", "id"],
        range: None,
    },
    FieldSpec {
        name: "month",
        required: true,
        class: FieldClass::Month,
        synonyms: &["month", "period"],
        range: None,
    },
    FieldSpec {
        name: "overallReliabilityScore",
        required: true,
        class: FieldClass::Percentage,
        synonyms: &["score", "reliability", "overall"],
        range: Some(NumericRange {
            min: 0.0,
            min_exclusive: false,
            max: Some(100.0),
        }),
    },
    FieldSpec {
        name: "opportunities",
        required: true,
        class: FieldClass::Count,
        synonyms: &["opportunities", "opps", "denominator"],
        range: Some(NumericRange {
            min: 0.0,
            min_exclusive: true,
            max: None,
        }),
    },
];

/// One importable metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Productivity,
    Reliability,
}

impl RecordKind {
    /// Parse the kind from its URL / storage form
    pub fn parse(s: &str) -> Option<RecordKind> {
        match s.to_lowercase().as_str() {
            "productivity" => Some(RecordKind::Productivity),
            "reliability" => Some(RecordKind::Reliability),
            _ => None,
        }
    }

    /// URL / storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Productivity => "productivity",
            RecordKind::Reliability => "reliability",
        }
    }

    /// Ordered canonical field descriptors for this kind
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            RecordKind::Productivity => PRODUCTIVITY_FIELDS,
            RecordKind::Reliability => RELIABILITY_FIELDS,
        }
    }

    /// Look up one field descriptor by canonical name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Canonical names of the fields that must be mapped before ingestion
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    /// The field carrying the reporting period inside the row
    /// (productivity is weekly, reliability is monthly)
    pub fn period_field(&self) -> &'static str {
        match self {
            RecordKind::Productivity => "week",
            RecordKind::Reliability => "month",
        }
    }

    /// The headline metric for this kind
    pub fn primary_metric(&self) -> &'static str {
        match self {
            RecordKind::Productivity => "productivityPercentage",
            RecordKind::Reliability => "overallReliabilityScore",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for kind in [RecordKind::Productivity, RecordKind::Reliability] {
            assert_eq!(RecordKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RecordKind::parse("Productivity"), Some(RecordKind::Productivity));
        assert_eq!(RecordKind::parse("attendance"), None);
    }

    #[test]
    fn required_fields_cover_identity_period_and_metric() {
        let required = RecordKind::Productivity.required_fields();
        assert!(required.contains(&"associateName"));
        assert!(required.contains(&"week"));
        assert!(required.contains(&"productivityPercentage"));
        assert!(!required.contains(&"associateId"));

        let required = RecordKind::Reliability.required_fields();
        assert!(required.contains(&"month"));
        assert!(required.contains(&"overallReliabilityScore"));
        assert!(required.contains(&"opportunities"));
    }

    #[test]
    fn primary_metric_is_a_declared_field() {
        for kind in [RecordKind::Productivity, RecordKind::Reliability] {
            assert!(kind.field(kind.primary_metric()).is_some());
            assert!(kind.field(kind.period_field()).is_some());
        }
    }

    #[test]
    fn numeric_range_boundaries() {
        let score = RecordKind::Reliability
            .field("overallReliabilityScore")
            .unwrap()
            .range
            .unwrap();
        assert!(score.contains(0.0));
        assert!(score.contains(100.0));
        assert!(!score.contains(100.1));

        let opportunities = RecordKind::Reliability
            .field("opportunities")
            .unwrap()
            .range
            .unwrap();
        assert!(!opportunities.contains(0.0));
        assert!(opportunities.contains(1.0));
        assert_eq!(opportunities.describe(), "> 0");
    }
}
