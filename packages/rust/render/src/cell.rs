//! Per-column cell rendering.
//!
//! Each data column is classified into a [`CellKind`] from its name and the
//! keys the record carries, then rendered by the matching arm.

use serde_yaml::Value;

use qsocat_shared::{ObjectRecord, display_value, is_truthy};

use crate::href;

/// Root of ADS abstract links.
pub const ADS_ABSTRACT_ROOT: &str = "https://ui.adsabs.harvard.edu/abs/";

/// Field holding the first author of the reference paper.
pub const FIRST_AUTHOR_KEY: &str = "default_first_author";

/// Columns rendered as links to their ADS abstract.
pub const REFERENCE_COLUMNS: [&str; 2] = ["default_ref", "default_ref_paper"];

/// How a data column is rendered for a given record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// Bibliographic reference linked to ADS.
    Reference,
    /// Value with separate upper and lower errors.
    AsymmetricError { up: String, low: String },
    /// Value with a single ± error.
    SymmetricError { err: String },
    /// The bare value.
    Plain,
}

impl CellKind {
    /// Classify `column` for `record`.
    pub fn resolve(column: &str, record: &ObjectRecord) -> Self {
        if REFERENCE_COLUMNS.contains(&column) {
            return Self::Reference;
        }

        let fields = record.fields();
        let up = format!("{column}_err_up");
        let low = format!("{column}_err_low");
        if fields.contains_key(&up) && fields.contains_key(&low) {
            return Self::AsymmetricError { up, low };
        }

        let err = format!("{column}_err");
        if fields.contains_key(&err) {
            return Self::SymmetricError { err };
        }

        Self::Plain
    }

    /// Render the inner HTML of the cell for `column`.
    pub fn render(&self, column: &str, record: &ObjectRecord) -> String {
        let null = Value::Null;
        let value = record.value(column).unwrap_or(&null);
        let text = display_value(value);

        match self {
            Self::Reference => reference_link(value, record),
            Self::AsymmetricError { up, low } => {
                match (truthy(record, up), truthy(record, low)) {
                    (Some(up), Some(low)) => format!(
                        "{text}<span class=\"supsub\"><sup>+{}</sup><sub>-{}</sub></span>",
                        display_value(up),
                        display_value(low)
                    ),
                    _ => text,
                }
            }
            Self::SymmetricError { err } => match truthy(record, err) {
                Some(err) if is_truthy(value) => format!("{text} &plusmn; {}", display_value(err)),
                _ => text,
            },
            Self::Plain => text,
        }
    }
}

fn truthy<'a>(record: &'a ObjectRecord, key: &str) -> Option<&'a Value> {
    record.value(key).filter(|v| is_truthy(v))
}

/// `{first_author} et al. ({year})` linked to the ADS abstract.
fn reference_link(value: &Value, record: &ObjectRecord) -> String {
    if !is_truthy(value) {
        return String::new();
    }

    let reference = display_value(value);
    let url = format!("{ADS_ABSTRACT_ROOT}{reference}/abstract");
    let label = match truthy(record, FIRST_AUTHOR_KEY) {
        Some(author) => {
            let year: String = reference.chars().take(4).collect();
            format!("{} et al. ({year})", display_value(author))
        }
        None => reference.clone(),
    };

    href(&url, &label)
}
