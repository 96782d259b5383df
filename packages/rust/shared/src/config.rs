//! Site configuration for the catalogue renderer.
//!
//! The config lives in a YAML file (default `./config.yml`) next to the
//! catalogue sources. It is loaded once and passed by reference to every
//! stage; nothing mutates it after [`load_site_config`] returns.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogueError, Result};

/// Default configuration file name, relative to the working directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Directory name of copied records inside the build directory.
pub const BUILD_RECORDS_DIR: &str = "QSOs";

// ---------------------------------------------------------------------------
// Config structs (matching config.yml)
// ---------------------------------------------------------------------------

/// Top-level site config, deserialized from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the catalogue sources (theme and records live below it).
    pub sourcedir: PathBuf,

    /// Output directory. Destroyed and recreated on every build.
    pub builddir: PathBuf,

    /// Page title substituted into `{{site-title}}`.
    pub title: String,

    /// Prefix for record download links (e.g. `https://example.org/catalogue/`).
    #[serde(rename = "baseURL", default)]
    pub base_url: String,

    /// Record field keys shown in the table. The first one is the name column.
    pub columns: Vec<String>,

    /// Header labels, one per entry of `columns`.
    pub columns_title: Vec<String>,

    /// Theme directory holding `index.html` and `assets/`, relative to `sourcedir`.
    #[serde(default = "default_themedir")]
    pub themedir: PathBuf,

    /// Object record directory, relative to `sourcedir`.
    #[serde(default = "default_recordsdir")]
    pub recordsdir: PathBuf,
}

fn default_themedir() -> PathBuf {
    "theme".into()
}
fn default_recordsdir() -> PathBuf {
    "QSOs".into()
}

impl SiteConfig {
    /// Theme directory resolved against `sourcedir`.
    pub fn theme_dir(&self) -> PathBuf {
        self.sourcedir.join(&self.themedir)
    }

    /// Object record directory resolved against `sourcedir`.
    pub fn records_dir(&self) -> PathBuf {
        self.sourcedir.join(&self.recordsdir)
    }

    /// Path to the index page template.
    pub fn index_template(&self) -> PathBuf {
        self.theme_dir().join("index.html")
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(CatalogueError::config("`columns` must not be empty"));
        }
        if self.columns.len() != self.columns_title.len() {
            return Err(CatalogueError::config(format!(
                "`columns` has {} entries but `columns_title` has {}",
                self.columns.len(),
                self.columns_title.len()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file in the current working directory.
pub fn default_config_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| CatalogueError::io(".", e))?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Load and validate the site config from a specific file path.
///
/// A missing file is fatal.
pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    if !path.is_file() {
        return Err(CatalogueError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| CatalogueError::io(path, e))?;

    let config: SiteConfig = serde_yaml::from_str(&content).map_err(|e| {
        CatalogueError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(?path, columns = config.columns.len(), "loaded site config");
    Ok(config)
}
