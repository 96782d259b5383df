//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qsocat_core::pipeline::{self, GenerateConfig, ProgressReporter, ValidateConfig};
use qsocat_records::{TEMPLATE_FILE_NAME, derive_schema, load_template};
use qsocat_shared::{SiteConfig, default_config_path, load_site_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// qsocat: turn a quasar table into a browsable catalogue website.
#[derive(Parser)]
#[command(
    name = "qsocat",
    version,
    about = "Generate, validate and render a static quasar catalogue.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write one YAML record per row of a CSV table.
    Generate {
        /// Source CSV table (18 columns, 2 header rows).
        table: PathBuf,

        /// Record directory holding the TEMPLATE file.
        #[arg(short, long, default_value = "QSOs")]
        records: PathBuf,
    },

    /// Validate every record against list.yaml.
    Validate {
        /// Catalogue root holding list.yaml and QSOs/.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Record directory, when it is not ROOT/QSOs (e.g. a custom
        /// `recordsdir` in the site config).
        #[arg(short, long)]
        records: Option<PathBuf>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render the catalogue website into the build directory.
    Build {
        /// Site configuration file (defaults to ./config.yml).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a list.yaml skeleton derived from the record template.
    Schema {
        /// Record directory holding the TEMPLATE file.
        #[arg(short, long, default_value = "QSOs")]
        records: PathBuf,

        /// Catalogue name.
        #[arg(long, default_value = "QSOs")]
        name: String,

        /// Catalogue description.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the resolved site configuration.
    Show {
        /// Site configuration file (defaults to ./config.yml).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "qsocat=info",
        1 => "qsocat=debug",
        _ => "qsocat=trace",
    };

    let env_filter = EnvFilter::new(filter);

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate { table, records } => cmd_generate(table, records),
        Command::Validate {
            root,
            records,
            json,
        } => cmd_validate(root, records, json),
        Command::Build { config } => cmd_build(config.as_deref()),
        Command::Schema {
            records,
            name,
            description,
        } => cmd_schema(&records, &name, &description),
        Command::Config { action } => match action {
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

/// Resolve the config path (explicit or `./config.yml`) and load it.
fn resolve_config(path: Option<&Path>) -> Result<SiteConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    Ok(load_site_config(&path)?)
}

fn cmd_generate(table: PathBuf, records_dir: PathBuf) -> Result<()> {
    info!(table = %table.display(), records = %records_dir.display(), "generating records");

    let reporter = CliProgress::new();
    let summary = pipeline::generate(&GenerateConfig { table, records_dir }, &reporter)?;

    println!();
    println!("  Records written: {}", summary.written.len());
    println!("  Time:            {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_validate(root: PathBuf, records_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let reporter = CliProgress::new();
    let report = pipeline::validate(&ValidateConfig { root, records_dir }, &reporter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for record in report.failures() {
            println!("{}:", record.record);
            for violation in &record.violations {
                println!("  - {violation}");
            }
        }
        println!(
            "{} records checked, {} failed",
            report.records.len(),
            report.failures().count()
        );
    }

    if !report.is_valid() {
        return Err(eyre!(
            "{} of {} records failed validation",
            report.failures().count(),
            report.records.len()
        ));
    }
    Ok(())
}

fn cmd_build(config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    info!(title = %config.title, build = %config.builddir.display(), "building website");

    let reporter = CliProgress::new();
    let summary = pipeline::build(&config, &reporter)?;

    println!();
    println!("  Website generated into {}", summary.site.build_dir.display());
    println!("  Records: {}", summary.site.record_count);
    println!("  Assets:  {}", summary.site.asset_count);
    println!("  SHA-256: {}", summary.site.index_sha256);
    println!("  Time:    {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_schema(records: &Path, name: &str, description: &str) -> Result<()> {
    let template = load_template(&records.join(TEMPLATE_FILE_NAME))?;
    let schema = derive_schema(&template, name, description);
    print!("{}", serde_yaml::to_string(&schema)?);
    Ok(())
}

fn cmd_config_show(config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_written(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {path}"));
    }

    fn record_rendered(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {name}"));
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
