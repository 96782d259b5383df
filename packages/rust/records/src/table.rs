//! Reader for the fixed-layout source table.

use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, instrument};

use qsocat_shared::{CatalogueError, Result, parse_cell};

/// Number of leading rows (column names and units) skipped before data.
pub const HEADER_ROWS: usize = 2;

/// Source table columns and the record field each one populates, in file order.
pub const COLUMNS: [(&str, &str); 18] = [
    ("Quasar", "default_name"),
    ("ra", "default_ra"),
    ("dec", "default_dec"),
    ("redshift", "default_z"),
    ("redshift_reference", "default_ref"),
    ("m1450", "photometry_m1450"),
    ("Mabs1450", "photometry_absM1450"),
    ("redshift_mgii", "extra_z_mgii"),
    ("redshift_mgii_err", "extra_z_mgii_err"),
    ("redshift_mgii_ref", "extra_z_mgii_ref"),
    ("fwhm_mgii", "extra_fwhm_mgii"),
    ("fwhm_mgii_err_up", "extra_fwhm_mgii_err_up"),
    ("fwhm_mgii_err_low", "extra_fwhm_mgii_err_low"),
    ("L3000", "extra_L3000"),
    ("L3000err_up", "extra_L3000_err_up"),
    ("L3000err_low", "extra_L3000_err_low"),
    ("BHmass", "extra_BHmass"),
    ("BHmass_reference", "extra_BHmass_ref"),
];

/// One data row of the table, zipped onto record field names.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the source file.
    pub line: u64,
    /// `(field, value)` pairs in column order.
    pub entries: Vec<(String, Value)>,
}

/// Read the source table, skipping the header rows.
///
/// The first header row must name [`COLUMNS`] in order, and every data row
/// must have exactly [`COLUMNS`]`.len()` cells; any mismatch fails the
/// whole load.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_table(path: &Path) -> Result<Vec<Row>> {
    if !path.is_file() {
        return Err(CatalogueError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CatalogueError::parse(path, e.to_string()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CatalogueError::parse(path, e.to_string()))?;
        let line = record
            .position()
            .map_or(index as u64 + 1, |pos| pos.line());

        if index == 0 {
            check_header(&record, line)?;
        }
        if index < HEADER_ROWS {
            continue;
        }

        if record.len() != COLUMNS.len() {
            return Err(CatalogueError::Table {
                line,
                message: format!(
                    "expected {} columns, found {}",
                    COLUMNS.len(),
                    record.len()
                ),
            });
        }

        let entries = COLUMNS
            .iter()
            .zip(record.iter())
            .map(|((_, field), cell)| ((*field).to_string(), parse_cell(cell)))
            .collect();

        rows.push(Row { line, entries });
    }

    debug!(rows = rows.len(), "read source table");
    Ok(rows)
}

/// Column names must match [`COLUMNS`] in count and order.
fn check_header(record: &csv::StringRecord, line: u64) -> Result<()> {
    if record.len() != COLUMNS.len() {
        return Err(CatalogueError::Table {
            line,
            message: format!(
                "header names {} columns, expected {}",
                record.len(),
                COLUMNS.len()
            ),
        });
    }

    for (position, ((expected, _), found)) in COLUMNS.iter().zip(record.iter()).enumerate() {
        if found.trim() != *expected {
            return Err(CatalogueError::Table {
                line,
                message: format!(
                    "column {} is `{found}`, expected `{expected}`",
                    position + 1
                ),
            });
        }
    }
    Ok(())
}
