//! qsocat CLI: build a static quasar catalogue from a CSV table.
//!
//! Generates per-object YAML records, validates them against `list.yaml`
//! and renders the catalogue website.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
