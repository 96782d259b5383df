//! Shared types, error model, and configuration for qsocat.
//!
//! This crate is the foundation depended on by all other qsocat crates.
//! It provides:
//! - [`CatalogueError`], the unified error type
//! - Domain types ([`Template`], [`ObjectRecord`], [`Schema`])
//! - Site configuration ([`SiteConfig`], config loading)
//! - Value helpers (truthiness, display, cell parsing)
//! - File helpers shared by the pipeline stages

pub mod config;
pub mod error;
pub mod io;
pub mod types;
pub mod value;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BUILD_RECORDS_DIR, CONFIG_FILE_NAME, SiteConfig, default_config_path, load_site_config,
};
pub use error::{CatalogueError, Result};
pub use io::{read_yaml, record_files};
pub use types::{
    FieldDescriptor, Fields, Kind, MANDATORY_MARKER, NAME_KEY, ObjectRecord, Property,
    RECORD_EXTENSION, REFERENCE_KEY, Schema, Template, is_mandatory,
};
pub use value::{display_value, is_truthy, parse_cell, type_name};
