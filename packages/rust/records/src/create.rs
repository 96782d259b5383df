//! Derive one object record from the template and write it to disk.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use qsocat_shared::{CatalogueError, ObjectRecord, Result, Template};

/// Populate a copy of `template` with `entries` and write it to `records_dir`.
///
/// Every mandatory template field must be supplied with a non-null value,
/// and every supplied field must exist in the template. On either failure
/// nothing is written. Integers supplied for a field whose template entry
/// declares `kind: float` are stored as floats. An existing record with the
/// same file name is overwritten.
pub fn create(template: &Template, entries: &[(String, Value)], records_dir: &Path) -> Result<PathBuf> {
    for key in template.mandatory_keys() {
        let supplied = entries
            .iter()
            .any(|(field, value)| field == key && !value.is_null());
        if !supplied {
            return Err(CatalogueError::MissingField { key: key.into() });
        }
    }

    let mut fields = template.fields().clone();
    for (key, value) in entries {
        let desc = fields
            .get_mut(key)
            .ok_or_else(|| CatalogueError::UnknownField { key: key.clone() })?;
        desc.value = match desc.declared_kind() {
            Some(kind) => kind.coerce(value.clone()),
            None => value.clone(),
        };
    }

    let record = ObjectRecord::from_fields(fields)?;
    let path = records_dir.join(record.file_name());

    let yaml = serde_yaml::to_string(record.fields())
        .map_err(|e| CatalogueError::parse(&path, e.to_string()))?;
    std::fs::write(&path, yaml).map_err(|e| CatalogueError::io(&path, e))?;

    debug!(path = %path.display(), "wrote record");
    Ok(path)
}
