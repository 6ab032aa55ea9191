//! Portrait Patch - Converts PyTK based HD portrait mods to HD Portraits
//!
//! Command line entry point.
//!
//! # Overview
//!
//! Point the tool at a Content Patcher portrait pack (`[CP] ...`) or at a folder
//! holding several of them. For every pack it:
//! - splits each `Portraits/<name>` change into an image load and a metadata load
//! - generates `<image>.json` metadata from every `<image>.pytk.json`
//! - replaces the `Platonymous.Toolkit` dependency with `tlitookilakin.HDPortraits`
//!
//! # Modes
//!
//! - `internal` (default): rewrites the pack in place. `content.json` and
//!   `manifest.json` are renamed to `.bak` the first time, and later runs read from
//!   those backups, so the migration can be repeated safely.
//! - `copy`: writes the migrated files into a mirrored output folder and leaves the
//!   pack untouched.
//!
//! # Configuration
//!
//! Constants such as the portrait load prefix or the default frame rate come from
//! `portrait_patch.yaml` (optional) and `PORTRAIT_PATCH__*` environment variables.

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use portrait_patch::config::{ConfigManager, SETTINGS_FILE};
use portrait_patch::{APP_NAME, RunMode, VERSION, services};
use std::process;

/// How migrated files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Rewrite the mod folder, keeping .bak copies of edited documents
    Internal,
    /// Write into a separate output folder
    Copy,
}

/// Converts PyTK based HD portrait mods to HD Portraits.
#[derive(Parser, Debug)]
#[command(name = "portrait-patch", version, about)]
struct Cli {
    /// Mod folder, or a folder containing several mod folders
    path: Utf8PathBuf,

    /// Where migrated files go
    #[arg(long, value_enum, default_value = "internal")]
    mode: Mode,

    /// Output folder for copy mode [default: <PATH>/<output_dir_name>]
    #[arg(long, short)]
    output: Option<Utf8PathBuf>,

    /// Load directory for portrait images, overriding the settings file
    #[arg(long)]
    target_prefix: Option<String>,

    /// Settings file
    #[arg(long, default_value = SETTINGS_FILE)]
    config: Utf8PathBuf,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Also write logs to daily files in this folder
    #[arg(long)]
    log_dir: Option<Utf8PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let _guard = match portrait_patch::logging::setup_logging_with_console(
        cli.log_dir.as_deref(),
        APP_NAME,
        cli.debug,
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every package migrated
fn run(cli: Cli) -> Result<bool> {
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    if !cli.path.is_dir() {
        bail!("{} is not a folder", cli.path);
    }
    let path = cli
        .path
        .canonicalize_utf8()
        .with_context(|| format!("Failed to resolve {}", cli.path))?;

    let mut settings = ConfigManager::new(&cli.config).load_settings()?;
    if let Some(prefix) = cli.target_prefix {
        settings.portrait_target_prefix = prefix;
    }

    let mode = match (cli.mode, cli.output) {
        (Mode::Internal, Some(_)) => bail!("--output is only used with --mode copy"),
        (Mode::Internal, None) => RunMode::Internal,
        (Mode::Copy, None) => RunMode::copy_into_default(&path, &settings),
        (Mode::Copy, Some(output)) => {
            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create output folder {}", output))?;
            let output = output
                .canonicalize_utf8()
                .with_context(|| format!("Failed to resolve {}", output))?;
            RunMode::Copy { output }
        }
    };

    tracing::info!(
        "Migrating {} ({}), portraits load into {}",
        path,
        match &mode {
            RunMode::Internal => "in place".to_string(),
            RunMode::Copy { output } => format!("copy to {}", output),
        },
        settings.portrait_target_prefix
    );

    let report = services::run(&path, &settings, &mode)?;
    report.log_summary();

    Ok(report.is_success())
}
