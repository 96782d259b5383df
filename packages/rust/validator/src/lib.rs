//! Catalogue validator: checks every object record against `list.yaml`.
//!
//! Each record is validated on its own and yields a [`RecordReport`]; a
//! broken record never stops the others from being checked. Only missing
//! inputs (schema file, record directory) are fatal.

pub mod report;

use std::path::Path;

use serde_yaml::Mapping;
use tracing::{debug, info, instrument, warn};

use qsocat_shared::{
    CatalogueError, Fields, Result, Schema, is_truthy, read_yaml, record_files, type_name,
};

pub use report::{CatalogueReport, RecordReport, Violation};

/// Schema file name at the catalogue root.
pub const SCHEMA_FILE_NAME: &str = "list.yaml";

/// Record directory name at the catalogue root.
pub const RECORDS_DIR_NAME: &str = "QSOs";

/// Check that the catalogue root holds a schema file and that the record
/// directory exists.
pub fn check_layout(root: &Path, records_dir: &Path) -> Result<()> {
    let schema = root.join(SCHEMA_FILE_NAME);
    if !schema.is_file() {
        return Err(CatalogueError::MissingFile { path: schema });
    }
    if !records_dir.is_dir() {
        return Err(CatalogueError::MissingFile {
            path: records_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Load `list.yaml`, naming any missing top-level key.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_schema(path: &Path) -> Result<Schema> {
    let raw: Mapping = read_yaml(path)?;

    for key in Schema::REQUIRED_KEYS {
        if !raw.contains_key(key) {
            return Err(CatalogueError::parse(
                path,
                format!("`{SCHEMA_FILE_NAME}` is missing `{key}` property"),
            ));
        }
    }

    let schema: Schema = serde_yaml::from_value(serde_yaml::Value::Mapping(raw))
        .map_err(|e| CatalogueError::parse(path, e.to_string()))?;

    debug!(
        properties = schema.properties.len(),
        required = schema.required().count(),
        "loaded schema"
    );
    Ok(schema)
}

/// Validate one record's fields against the schema.
pub fn validate_record(schema: &Schema, record: &str, fields: &Fields) -> RecordReport {
    let mut report = RecordReport::new(record);

    // Key validity: the record may only use declared keys.
    let mut invalid: Vec<String> = fields
        .keys()
        .filter(|k| !schema.keys().any(|s| s == k.as_str()))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        invalid.sort();
        report.violations.push(Violation::InvalidKeys { keys: invalid });
    }

    // Completeness is informational only.
    report.unused_keys = schema
        .keys()
        .filter(|k| !fields.contains_key(*k))
        .map(String::from)
        .collect();
    if !report.unused_keys.is_empty() {
        warn!(
            record,
            keys = ?report.unused_keys,
            "record does not define every schema property"
        );
    }

    for property in schema.required() {
        let key = property.key.clone();
        let Some(desc) = fields.get(&property.key) else {
            report.violations.push(Violation::MissingRequired { key });
            continue;
        };
        if !is_truthy(&desc.value) {
            report.violations.push(Violation::EmptyRequired { key });
            continue;
        }
        if !property.kind.matches(&desc.value) {
            report.violations.push(Violation::TypeMismatch {
                key,
                expected: property.kind,
                actual: type_name(&desc.value).to_string(),
            });
        }
    }

    report
}

/// Validate every `*.yml` record in `records_dir`, in file-name order.
#[instrument(skip_all, fields(records = %records_dir.display()))]
pub fn validate_catalogue(schema: &Schema, records_dir: &Path) -> Result<CatalogueReport> {
    let files = record_files(records_dir)?;
    let mut report = CatalogueReport::new(&schema.name);

    for file in &files {
        let name = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let record_report = match read_yaml::<Fields>(file) {
            Ok(fields) => validate_record(schema, &name, &fields),
            Err(e) => {
                let mut r = RecordReport::new(&name);
                r.violations.push(Violation::Unreadable {
                    message: e.to_string(),
                });
                r
            }
        };

        for violation in &record_report.violations {
            warn!(record = %name, %violation, "record failed validation");
        }
        report.records.push(record_report);
    }

    info!(
        records = report.records.len(),
        failed = report.failures().count(),
        "catalogue validation complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qsocat_shared::{FieldDescriptor, Kind};
    use rstest::rstest;
    use serde_yaml::Value;

    const SCHEMA: &str = r#"
name: QSOs
description: Quasars at z > 5.3
properties:
  - key: default_name
    kind: string
    required: true
  - key: default_ref
    kind: string
    required: true
  - key: default_z
    kind: float
    required: true
  - key: extra_L3000
    kind: float
    required: false
"#;

    fn schema() -> Schema {
        serde_yaml::from_str(SCHEMA).unwrap()
    }

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    (*k).to_string(),
                    FieldDescriptor {
                        value: v.clone(),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    fn good() -> Fields {
        fields(&[
            ("default_name", Value::from("J0100+2802")),
            ("default_ref", Value::from("2015Natur.518..512W")),
            ("default_z", Value::from(6.3)),
            ("extra_L3000", Value::from(46.9)),
        ])
    }

    #[test]
    fn complete_record_passes() {
        let report = validate_record(&schema(), "good", &good());
        assert!(report.is_valid());
        assert!(report.unused_keys.is_empty());
    }

    #[test]
    fn extra_keys_named() {
        let mut record = good();
        record.insert("extra_zz".into(), FieldDescriptor::default());
        record.insert("extra_aa".into(), FieldDescriptor::default());

        let report = validate_record(&schema(), "r", &record);
        assert_eq!(
            report.violations,
            vec![Violation::InvalidKeys {
                keys: vec!["extra_aa".into(), "extra_zz".into()]
            }]
        );
    }

    #[test]
    fn absent_optional_key_is_informational() {
        let mut record = good();
        record.remove("extra_L3000");

        let report = validate_record(&schema(), "r", &record);
        assert!(report.is_valid());
        assert_eq!(report.unused_keys, vec!["extra_L3000".to_string()]);
    }

    #[rstest]
    #[case("default_name")]
    #[case("default_ref")]
    #[case("default_z")]
    fn required_key_absent_fails(#[case] key: &str) {
        let mut record = good();
        record.remove(key);

        let report = validate_record(&schema(), "r", &record);
        assert_eq!(
            report.violations,
            vec![Violation::MissingRequired { key: key.into() }]
        );
    }

    #[rstest]
    #[case("default_name", Value::from(""))]
    #[case("default_ref", Value::Null)]
    #[case("default_z", Value::from(0.0))]
    fn required_key_empty_fails(#[case] key: &str, #[case] value: Value) {
        let mut record = good();
        record.get_mut(key).unwrap().value = value;

        let report = validate_record(&schema(), "r", &record);
        assert_eq!(
            report.violations,
            vec![Violation::EmptyRequired { key: key.into() }]
        );
    }

    #[rstest]
    #[case(Value::from("abc"), Some("string"))]
    #[case(Value::from(6), Some("int"))]
    #[case(Value::from(3.14), None)]
    fn float_kind_conformance(#[case] value: Value, #[case] actual: Option<&str>) {
        let mut record = good();
        record.get_mut("default_z").unwrap().value = value;

        let report = validate_record(&schema(), "r", &record);
        let expected: Vec<Violation> = actual
            .map(|a| Violation::TypeMismatch {
                key: "default_z".into(),
                expected: Kind::Float,
                actual: a.into(),
            })
            .into_iter()
            .collect();
        assert_eq!(report.violations, expected);
    }

    #[test]
    fn schema_missing_key_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCHEMA_FILE_NAME);
        std::fs::write(&path, "name: QSOs\nproperties: []\n").unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(err.to_string().contains("missing `description` property"));
    }

    #[test]
    fn layout_requires_schema_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join(RECORDS_DIR_NAME);
        let err = check_layout(dir.path(), &records).unwrap_err();
        assert!(err.to_string().contains(SCHEMA_FILE_NAME));

        std::fs::write(dir.path().join(SCHEMA_FILE_NAME), SCHEMA).unwrap();
        let err = check_layout(dir.path(), &records).unwrap_err();
        assert!(err.to_string().contains(RECORDS_DIR_NAME));

        std::fs::create_dir(&records).unwrap();
        assert!(check_layout(dir.path(), &records).is_ok());
    }

    #[test]
    fn layout_accepts_custom_records_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SCHEMA_FILE_NAME), SCHEMA).unwrap();
        let records = dir.path().join("objects");
        std::fs::create_dir(&records).unwrap();

        assert!(check_layout(dir.path(), &records).is_ok());
        assert!(check_layout(dir.path(), &dir.path().join(RECORDS_DIR_NAME)).is_err());
    }

    #[test]
    fn catalogue_validates_each_record_independently() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, record: &Fields| {
            let yaml = serde_yaml::to_string(record).unwrap();
            std::fs::write(dir.path().join(name), yaml).unwrap();
        };

        let mut bad = good();
        bad.get_mut("default_z").unwrap().value = Value::from("abc");
        write("a_bad.yml", &bad);
        write("b_good.yml", &good());
        std::fs::write(dir.path().join("c_broken.yml"), "default_name: [unclosed").unwrap();
        std::fs::write(dir.path().join("TEMPLATE"), "ignored: {value: 1}").unwrap();

        let report = validate_catalogue(&schema(), dir.path()).unwrap();
        let names: Vec<&str> = report.records.iter().map(|r| r.record.as_str()).collect();
        assert_eq!(names, vec!["a_bad", "b_good", "c_broken"]);

        assert!(!report.records[0].is_valid());
        assert!(report.records[1].is_valid());
        assert!(matches!(
            report.records[2].violations[0],
            Violation::Unreadable { .. }
        ));
        assert_eq!(report.failures().count(), 2);
        assert!(!report.is_valid());
    }
}
