//! Record generator: source table → one YAML object record per row.
//!
//! The template (`<records_dir>/TEMPLATE`) is loaded once; every table row
//! is zipped onto the fixed column → field mapping in [`table::COLUMNS`]
//! and written as `{reference}_{name}.yml` next to the template.

pub mod create;
pub mod table;
pub mod template;

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use qsocat_shared::Result;

pub use create::create;
pub use table::{COLUMNS, HEADER_ROWS, Row, read_table};
pub use template::{TEMPLATE_FILE_NAME, derive_schema, load_template};

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Written record files, in table order.
    pub written: Vec<PathBuf>,
}

/// Generate one record per data row of `table_path` into `records_dir`.
///
/// `on_record` is called after each written record with the path and
/// the running count. The first failing row aborts the run.
#[instrument(skip_all, fields(table = %table_path.display(), records = %records_dir.display()))]
pub fn generate_records(
    table_path: &Path,
    records_dir: &Path,
    mut on_record: impl FnMut(&Path, usize, usize),
) -> Result<GenerateResult> {
    let template = load_template(&records_dir.join(TEMPLATE_FILE_NAME))?;
    let rows = read_table(table_path)?;
    let total = rows.len();

    let mut written = Vec::with_capacity(total);
    for row in &rows {
        let path = create(&template, &row.entries, records_dir).map_err(|e| {
            tracing::error!(line = row.line, error = %e, "record creation failed");
            e
        })?;
        on_record(&path, written.len() + 1, total);
        written.push(path);
    }

    info!(count = written.len(), "record generation complete");
    Ok(GenerateResult { written })
}
