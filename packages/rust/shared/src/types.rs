//! Core domain types for the catalogue: templates, object records, schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{CatalogueError, Result};
use crate::value::{display_value, type_name};

/// Marker contained in the name of every mandatory field.
pub const MANDATORY_MARKER: &str = "default";

/// Field holding the object's name.
pub const NAME_KEY: &str = "default_name";

/// Field holding the object's bibliographic reference.
pub const REFERENCE_KEY: &str = "default_ref";

/// Extension of object record files.
pub const RECORD_EXTENSION: &str = "yml";

// ---------------------------------------------------------------------------
// FieldDescriptor / Fields
// ---------------------------------------------------------------------------

/// One field of a template or record: a `value` plus free-form metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The field value; null when unset.
    #[serde(default)]
    pub value: Value,
    /// Any other descriptor keys (units, description, kind, ...).
    #[serde(flatten)]
    pub meta: BTreeMap<String, Value>,
}

impl FieldDescriptor {
    /// Kind named by the `kind` metadata entry, if it is a known kind.
    pub fn declared_kind(&self) -> Option<Kind> {
        self.meta
            .get("kind")
            .and_then(|k| serde_yaml::from_value(k.clone()).ok())
    }
}

/// Field name → descriptor, in key order.
pub type Fields = BTreeMap<String, FieldDescriptor>;

/// Whether a field name denotes a mandatory field.
pub fn is_mandatory(key: &str) -> bool {
    key.contains(MANDATORY_MARKER)
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// The canonical field skeleton every object record is derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    fields: Fields,
}

impl Template {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Keys of the mandatory fields, in key order.
    pub fn mandatory_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str).filter(|k| is_mandatory(k))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

// ---------------------------------------------------------------------------
// ObjectRecord
// ---------------------------------------------------------------------------

/// One catalogued object: its identity plus the full field map.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    name: String,
    reference: String,
    fields: Fields,
}

impl ObjectRecord {
    /// Build a record from a populated field map.
    ///
    /// The name and reference fields must be present.
    pub fn from_fields(fields: Fields) -> Result<Self> {
        let name = identity_value(&fields, NAME_KEY)?;
        let reference = identity_value(&fields, REFERENCE_KEY)?;
        Ok(Self {
            name,
            reference,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Value of a field, if the record has it.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).map(|f| &f.value)
    }

    /// File name this record is stored under: `{reference}_{name}.yml`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.{RECORD_EXTENSION}", self.reference, self.name)
    }
}

fn identity_value(fields: &Fields, key: &str) -> Result<String> {
    fields
        .get(key)
        .map(|f| display_value(&f.value))
        .ok_or_else(|| CatalogueError::MissingField { key: key.into() })
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Declared type of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Float,
    Int,
}

impl Kind {
    /// Whether the runtime type of `value` is exactly this kind.
    pub fn matches(self, value: &Value) -> bool {
        type_name(value) == self.as_str()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Float => "float",
            Self::Int => "int",
        }
    }

    /// Kind of a default value, if it is a string or a number.
    pub fn of(value: &Value) -> Option<Self> {
        match type_name(value) {
            "string" => Some(Self::String),
            "float" => Some(Self::Float),
            "int" => Some(Self::Int),
            _ => None,
        }
    }

    /// Widen an integer to a float when this kind is `float`.
    ///
    /// Whole numbers in a float column parse as integers one cell at a time;
    /// everything else is returned unchanged.
    pub fn coerce(self, value: Value) -> Value {
        match self {
            Self::Float if value.is_i64() || value.is_u64() => {
                value.as_f64().map_or(value, Value::from)
            }
            _ => value,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared record key in `list.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub kind: Kind,
    #[serde(default)]
    pub required: bool,
}

/// The catalogue schema stored in `list.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub description: String,
    pub properties: Vec<Property>,
}

impl Schema {
    /// Top-level keys every `list.yaml` must declare.
    pub const REQUIRED_KEYS: [&'static str; 3] = ["name", "description", "properties"];

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.key.as_str())
    }

    pub fn required(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: impl Into<Value>) -> FieldDescriptor {
        FieldDescriptor {
            value: value.into(),
            meta: BTreeMap::new(),
        }
    }

    #[test]
    fn record_file_name_from_identity() {
        let mut fields = Fields::new();
        fields.insert(NAME_KEY.into(), field("J0100+2802"));
        fields.insert(REFERENCE_KEY.into(), field("2015Natur.518..512W"));
        fields.insert("default_z".into(), field(6.3));

        let record = ObjectRecord::from_fields(fields).unwrap();
        assert_eq!(record.file_name(), "2015Natur.518..512W_J0100+2802.yml");
        assert_eq!(record.value("default_z"), Some(&Value::from(6.3)));
    }

    #[test]
    fn record_without_reference_rejected() {
        let mut fields = Fields::new();
        fields.insert(NAME_KEY.into(), field("J0100+2802"));
        let err = ObjectRecord::from_fields(fields).unwrap_err();
        assert!(matches!(err, CatalogueError::MissingField { key } if key == REFERENCE_KEY));
    }

    #[test]
    fn descriptor_keeps_metadata() {
        let yaml = "value: 6.3\nunit: none\ndescription: redshift\n";
        let desc: FieldDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(desc.value, Value::from(6.3));
        assert_eq!(desc.meta.len(), 2);
        assert_eq!(desc.meta["unit"], Value::from("none"));
    }

    #[test]
    fn kind_is_strict() {
        assert!(Kind::Float.matches(&Value::from(3.14)));
        assert!(!Kind::Float.matches(&Value::from(3)));
        assert!(!Kind::Float.matches(&Value::from("abc")));
        assert!(Kind::Int.matches(&Value::from(3)));
        assert!(Kind::String.matches(&Value::from("abc")));
    }

    #[test]
    fn float_kind_widens_whole_numbers() {
        assert_eq!(Kind::Float.coerce(Value::from(15)), Value::from(15.0));
        assert!(Kind::Float.matches(&Kind::Float.coerce(Value::from(7))));
        assert_eq!(Kind::Float.coerce(Value::from(6.3)), Value::from(6.3));
        assert_eq!(Kind::Float.coerce(Value::Null), Value::Null);
        assert_eq!(Kind::Int.coerce(Value::from(7)), Value::from(7));
        assert_eq!(Kind::String.coerce(Value::from("J0100")), Value::from("J0100"));
    }

    #[test]
    fn declared_kind_from_metadata() {
        let desc: FieldDescriptor = serde_yaml::from_str("value:\nkind: float\n").unwrap();
        assert_eq!(desc.declared_kind(), Some(Kind::Float));

        let desc: FieldDescriptor = serde_yaml::from_str("value:\nkind: complex\n").unwrap();
        assert_eq!(desc.declared_kind(), None);
        assert_eq!(field(1.0).declared_kind(), None);
    }

    #[test]
    fn schema_parses() {
        let yaml = r#"
name: QSOs
description: z > 5.3 quasars
properties:
  - key: default_name
    kind: string
    required: true
  - key: extra_L3000
    kind: float
    required: false
"#;
        let schema: Schema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.required().count(), 1);
        assert_eq!(schema.properties[1].kind, Kind::Float);
    }
}
