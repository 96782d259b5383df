//! Validation findings, per record and for the whole catalogue.

use serde::Serialize;

use qsocat_shared::Kind;

/// A schema violation found in one record.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The record uses keys the schema does not declare.
    #[error("invalid property keys: {}", .keys.join(", "))]
    InvalidKeys { keys: Vec<String> },

    /// A required key is absent.
    #[error("missing required property {key}")]
    MissingRequired { key: String },

    /// A required key is present but its value is empty.
    #[error("{key} is a required value, it must be set")]
    EmptyRequired { key: String },

    /// A required value has the wrong runtime type.
    #[error("value for {key} must be {expected}, found {actual}")]
    TypeMismatch {
        key: String,
        expected: Kind,
        actual: String,
    },

    /// The record file could not be read or parsed.
    #[error("unreadable record: {message}")]
    Unreadable { message: String },
}

/// Outcome of validating a single record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReport {
    /// Record name (file stem).
    pub record: String,
    /// Hard failures.
    pub violations: Vec<Violation>,
    /// Schema keys the record does not define (informational).
    pub unused_keys: Vec<String>,
}

impl RecordReport {
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            violations: Vec::new(),
            unused_keys: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Outcome of validating every record of a catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueReport {
    /// Schema name from `list.yaml`.
    pub schema: String,
    /// One report per record file, in file-name order.
    pub records: Vec<RecordReport>,
}

impl CatalogueReport {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            records: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.records.iter().all(RecordReport::is_valid)
    }

    /// Records with at least one violation.
    pub fn failures(&self) -> impl Iterator<Item = &RecordReport> {
        self.records.iter().filter(|r| !r.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_messages_name_the_key() {
        let v = Violation::TypeMismatch {
            key: "default_z".into(),
            expected: Kind::Float,
            actual: "string".into(),
        };
        assert_eq!(v.to_string(), "value for default_z must be float, found string");

        let v = Violation::InvalidKeys {
            keys: vec!["a".into(), "b".into()],
        };
        assert_eq!(v.to_string(), "invalid property keys: a, b");
    }

    #[test]
    fn report_serializes_to_json() {
        let mut record = RecordReport::new("2015Natur_J0100");
        record.violations.push(Violation::EmptyRequired {
            key: "default_z".into(),
        });
        let report = CatalogueReport {
            schema: "QSOs".into(),
            records: vec![record],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["violations"][0]["kind"], "empty_required");
        assert_eq!(json["records"][0]["violations"][0]["key"], "default_z");
        assert!(!report.is_valid());
    }
}
