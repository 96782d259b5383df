//! Template loading and schema derivation.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, instrument};

use qsocat_shared::{
    CatalogueError, Fields, Kind, Property, Result, Schema, Template, is_mandatory, read_yaml,
};

/// File name of the template inside the record directory.
pub const TEMPLATE_FILE_NAME: &str = "TEMPLATE";

/// Load the record template.
///
/// Every top-level entry must be a mapping with a `value` key.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_template(path: &Path) -> Result<Template> {
    if !path.is_file() {
        return Err(CatalogueError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let raw: Mapping = read_yaml(path)?;
    for (key, entry) in &raw {
        let key = key.as_str().unwrap_or("<non-string key>");
        let has_value = entry
            .as_mapping()
            .is_some_and(|m| m.contains_key("value"));
        if !has_value {
            return Err(CatalogueError::parse(
                path,
                format!("template entry `{key}` has no `value` sub-key"),
            ));
        }
    }

    let fields: Fields = serde_yaml::from_value(Value::Mapping(raw))
        .map_err(|e| CatalogueError::parse(path, e.to_string()))?;

    debug!(keys = fields.len(), "loaded template");
    Ok(Template::new(fields))
}

/// Build a `list.yaml` schema skeleton from the template.
///
/// Mandatory fields are required. The kind comes from a `kind` metadata
/// entry when present, else from the default value, else `string`.
pub fn derive_schema(template: &Template, name: &str, description: &str) -> Schema {
    let properties = template
        .fields()
        .iter()
        .map(|(key, desc)| Property {
            key: key.clone(),
            kind: desc
                .declared_kind()
                .or_else(|| Kind::of(&desc.value))
                .unwrap_or(Kind::String),
            required: is_mandatory(key),
        })
        .collect();

    Schema {
        name: name.to_string(),
        description: description.to_string(),
        properties,
    }
}
