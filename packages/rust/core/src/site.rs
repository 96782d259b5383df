//! Build directory assembler.
//!
//! Recreates the build directory, copies theme assets and object records
//! into it, then renders `index.html` from the copied records.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use qsocat_render::{leftover_placeholders, render_index, table_head, table_row};
use qsocat_shared::{
    BUILD_RECORDS_DIR, CatalogueError, Fields, ObjectRecord, Result, SiteConfig, read_yaml,
    record_files,
};

use crate::pipeline::ProgressReporter;

/// Output from a successful site build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The build directory.
    pub build_dir: PathBuf,
    /// Path of the written `index.html`.
    pub index_path: PathBuf,
    /// Number of records rendered into the table.
    pub record_count: usize,
    /// Number of asset files copied.
    pub asset_count: usize,
    /// SHA-256 of the written `index.html`.
    pub index_sha256: String,
}

/// Build the static site described by `config`.
///
/// Creates the following layout:
/// ```text
/// <builddir>/
/// ├── index.html
/// ├── assets/      (copied from <themedir>/assets)
/// └── QSOs/        (copied from <recordsdir>)
/// ```
#[instrument(skip_all, fields(build = %config.builddir.display()))]
pub fn build_site(config: &SiteConfig, progress: &dyn ProgressReporter) -> Result<BuildResult> {
    let theme_assets = config.theme_dir().join("assets");
    let records_dir = config.records_dir();
    let index_template = config.index_template();

    // Inputs are checked before the previous build is destroyed.
    for input in [&theme_assets, &records_dir, &index_template] {
        if !input.exists() {
            return Err(CatalogueError::MissingFile {
                path: input.clone(),
            });
        }
    }
    let template = std::fs::read_to_string(&index_template)
        .map_err(|e| CatalogueError::io(&index_template, e))?;

    info!(
        source = %config.sourcedir.display(),
        theme = %config.theme_dir().display(),
        records = %records_dir.display(),
        "generating website"
    );

    progress.phase("Preparing build directory");
    recreate_dir(&config.builddir, &config.sourcedir)?;

    progress.phase("Copying assets");
    let asset_count = copy_dir(&theme_assets, &config.builddir.join("assets"))?;
    let build_records = config.builddir.join(BUILD_RECORDS_DIR);
    copy_dir(&records_dir, &build_records)?;

    progress.phase("Rendering catalogue");
    let records = load_records(&build_records)?;
    let head = table_head(&config.columns_title);
    let mut body = String::new();
    for (i, record) in records.iter().enumerate() {
        body.push_str(&table_row(record, &config.columns, &config.base_url));
        progress.record_rendered(record.name(), i + 1, records.len());
    }

    let html = render_index(&template, &config.title, &head, &body);
    for placeholder in leftover_placeholders(&html) {
        warn!(%placeholder, "unreplaced placeholder in index template");
    }

    let index_path = config.builddir.join("index.html");
    write_atomic(&index_path, &html)?;

    let index_sha256 = format!("{:x}", Sha256::digest(html.as_bytes()));

    info!(
        records = records.len(),
        assets = asset_count,
        path = %config.builddir.display(),
        "website generated"
    );

    Ok(BuildResult {
        build_dir: config.builddir.clone(),
        index_path,
        record_count: records.len(),
        asset_count,
        index_sha256,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Delete `build_dir` if it exists and create it empty.
///
/// Refuses to delete a directory that contains the source tree.
fn recreate_dir(build_dir: &Path, source_dir: &Path) -> Result<()> {
    if build_dir.exists() {
        let build = std::fs::canonicalize(build_dir).map_err(|e| CatalogueError::io(build_dir, e))?;
        let source =
            std::fs::canonicalize(source_dir).map_err(|e| CatalogueError::io(source_dir, e))?;
        if source.starts_with(&build) {
            return Err(CatalogueError::config(format!(
                "builddir {} contains sourcedir {}",
                build_dir.display(),
                source_dir.display()
            )));
        }

        std::fs::remove_dir_all(build_dir).map_err(|e| CatalogueError::io(build_dir, e))?;
        debug!(path = %build_dir.display(), "removed previous build");
    }

    std::fs::create_dir_all(build_dir).map_err(|e| CatalogueError::io(build_dir, e))
}

/// Recursively copy `src` into `dst`. Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    std::fs::create_dir_all(dst).map_err(|e| CatalogueError::io(dst, e))?;

    let mut copied = 0;
    for entry in std::fs::read_dir(src).map_err(|e| CatalogueError::io(src, e))? {
        let entry = entry.map_err(|e| CatalogueError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if from.is_dir() {
            copied += copy_dir(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| CatalogueError::io(&from, e))?;
            copied += 1;
        }
    }

    debug!(from = %src.display(), to = %dst.display(), files = copied, "copied directory");
    Ok(copied)
}

/// Load every record file of `dir`, in file-name order.
fn load_records(dir: &Path) -> Result<Vec<ObjectRecord>> {
    record_files(dir)?
        .iter()
        .map(|path| {
            let fields: Fields = read_yaml(path)?;
            ObjectRecord::from_fields(fields)
                .map_err(|e| CatalogueError::parse(path, e.to_string()))
        })
        .collect()
}

/// Write a file via a temp file and rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| CatalogueError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| CatalogueError::io(path, e))?;

    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
