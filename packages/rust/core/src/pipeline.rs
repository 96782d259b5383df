//! End-to-end workflows: table → records, records → report, records → site.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use qsocat_records::generate_records;
use qsocat_shared::{Result, Schema, SiteConfig};
use qsocat_validator::{
    CatalogueReport, RECORDS_DIR_NAME, SCHEMA_FILE_NAME, check_layout, load_schema,
    validate_catalogue,
};

use crate::site::{BuildResult, build_site};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a record file is written by the generator.
    fn record_written(&self, path: &str, current: usize, total: usize);
    /// Called when a record is rendered into the table.
    fn record_rendered(&self, name: &str, current: usize, total: usize);
    /// Called when the workflow completes.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_written(&self, _path: &str, _current: usize, _total: usize) {}
    fn record_rendered(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self) {}
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

/// Configuration for the `generate` workflow.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Source CSV table.
    pub table: PathBuf,
    /// Object record directory (holds `TEMPLATE`).
    pub records_dir: PathBuf,
}

/// Result of the `generate` workflow.
#[derive(Debug)]
pub struct GenerateSummary {
    /// Written record files, in table order.
    pub written: Vec<PathBuf>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Generate one object record per table row.
#[instrument(skip_all, fields(table = %config.table.display()))]
pub fn generate(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<GenerateSummary> {
    let start = Instant::now();

    progress.phase("Generating records");
    let result = generate_records(&config.table, &config.records_dir, |path, current, total| {
        progress.record_written(&path.display().to_string(), current, total);
    })?;
    progress.done();

    Ok(GenerateSummary {
        written: result.written,
        elapsed: start.elapsed(),
    })
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Configuration for the `validate` workflow.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Catalogue root holding `list.yaml`.
    pub root: PathBuf,
    /// Record directory; `root/QSOs` when unset.
    pub records_dir: Option<PathBuf>,
}

impl ValidateConfig {
    /// Record directory the workflow validates.
    pub fn records_dir(&self) -> PathBuf {
        self.records_dir
            .clone()
            .unwrap_or_else(|| self.root.join(RECORDS_DIR_NAME))
    }
}

/// Check the catalogue layout, load the schema and validate every record.
#[instrument(skip_all, fields(root = %config.root.display()))]
pub fn validate(config: &ValidateConfig, progress: &dyn ProgressReporter) -> Result<CatalogueReport> {
    let records_dir = config.records_dir();
    progress.phase("Checking catalogue layout");
    check_layout(&config.root, &records_dir)?;

    progress.phase("Loading schema");
    let schema: Schema = load_schema(&config.root.join(SCHEMA_FILE_NAME))?;

    progress.phase("Validating records");
    let report = validate_catalogue(&schema, &records_dir)?;
    progress.done();

    Ok(report)
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// Result of the `build` workflow.
#[derive(Debug)]
pub struct BuildSummary {
    pub site: BuildResult,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Render the static site described by `config`.
#[instrument(skip_all, fields(title = %config.title))]
pub fn build(config: &SiteConfig, progress: &dyn ProgressReporter) -> Result<BuildSummary> {
    let start = Instant::now();
    let site = build_site(config, progress)?;
    progress.done();

    info!(sha256 = %site.index_sha256, "index.html written");
    Ok(BuildSummary {
        site,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsocat_records::{COLUMNS, TEMPLATE_FILE_NAME, derive_schema, load_template};
    use std::cell::RefCell;

    /// Records progress calls for assertions.
    #[derive(Default)]
    struct RecordingProgress {
        phases: RefCell<Vec<String>>,
        written: RefCell<usize>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.borrow_mut().push(name.to_string());
        }
        fn record_written(&self, _path: &str, _current: usize, _total: usize) {
            *self.written.borrow_mut() += 1;
        }
        fn record_rendered(&self, _name: &str, _current: usize, _total: usize) {}
        fn done(&self) {}
    }

    /// Catalogue root with a full template and a CSV table.
    ///
    /// Position and redshift are declared `kind: float`; the first row
    /// carries whole numbers in those columns.
    fn catalogue(root: &std::path::Path, records: &std::path::Path) -> PathBuf {
        std::fs::create_dir_all(records).unwrap();
        let template: String = COLUMNS
            .iter()
            .map(|(_, field)| match *field {
                "default_ra" | "default_dec" | "default_z" => {
                    format!("{field}:\n  value:\n  kind: float\n")
                }
                _ => format!("{field}:\n  value:\n"),
            })
            .collect();
        std::fs::write(records.join(TEMPLATE_FILE_NAME), template).unwrap();

        let header: Vec<&str> = COLUMNS.iter().map(|(c, _)| *c).collect();
        let table = root.join("table.csv");
        std::fs::write(
            &table,
            format!(
                "{}\n{}\n\
J0100+2802,15,28,7,2015Natur.518..512W,17.6,-29.1,6.327,0.005,r,5130,150,150,46.9,0.1,0.1,10.1,r\n\
J1120+0641,170.0,6.69,7.08,2011Natur.474..616M,20.4,-26.6,,,,,,,,,,,\n",
                header.join(","),
                ",".repeat(COLUMNS.len() - 1)
            ),
        )
        .unwrap();
        table
    }

    #[test]
    fn generated_records_pass_template_derived_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let records_dir = tmp.path().join(RECORDS_DIR_NAME);
        let table = catalogue(tmp.path(), &records_dir);

        let progress = RecordingProgress::default();
        let summary = generate(
            &GenerateConfig {
                table,
                records_dir: records_dir.clone(),
            },
            &progress,
        )
        .unwrap();
        assert_eq!(summary.written.len(), 2);
        assert_eq!(*progress.written.borrow(), 2);

        let template = load_template(&records_dir.join(TEMPLATE_FILE_NAME)).unwrap();
        let schema = derive_schema(&template, "QSOs", "test catalogue");
        std::fs::write(
            tmp.path().join(SCHEMA_FILE_NAME),
            serde_yaml::to_string(&schema).unwrap(),
        )
        .unwrap();

        let report = validate(
            &ValidateConfig {
                root: tmp.path().to_path_buf(),
                records_dir: None,
            },
            &progress,
        )
        .unwrap();

        assert_eq!(report.records.len(), 2);
        assert!(report.is_valid(), "{report:?}");
        assert!(progress.phases.borrow().contains(&"Validating records".to_string()));
    }

    #[test]
    fn validate_reads_custom_records_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let records_dir = tmp.path().join("objects");
        let table = catalogue(tmp.path(), &records_dir);
        generate(
            &GenerateConfig {
                table,
                records_dir: records_dir.clone(),
            },
            &SilentProgress,
        )
        .unwrap();

        let template = load_template(&records_dir.join(TEMPLATE_FILE_NAME)).unwrap();
        std::fs::write(
            tmp.path().join(SCHEMA_FILE_NAME),
            serde_yaml::to_string(&derive_schema(&template, "QSOs", "")).unwrap(),
        )
        .unwrap();

        let default_layout = ValidateConfig {
            root: tmp.path().to_path_buf(),
            records_dir: None,
        };
        assert!(validate(&default_layout, &SilentProgress).is_err());

        let custom = ValidateConfig {
            records_dir: Some(records_dir),
            ..default_layout
        };
        let report = validate(&custom, &SilentProgress).unwrap();
        assert_eq!(report.records.len(), 2);
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn validate_without_schema_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join(RECORDS_DIR_NAME)).unwrap();

        let err = validate(
            &ValidateConfig {
                root: tmp.path().to_path_buf(),
                records_dir: None,
            },
            &SilentProgress,
        )
        .unwrap_err();
        assert!(matches!(err, qsocat_shared::CatalogueError::MissingFile { .. }));
    }
}
