//! Runs the migration over a single package or a folder of packages.
//!
//! When the given path is not itself a recognized package, each immediate
//! subfolder is classified and migrated on its own, in name order. A package that
//! fails is logged and recorded; the remaining packages are still migrated.

use super::classifier::classify;
use super::strategy::strategy_for;
use super::tree::clone_structure;
use super::writer::{OutputMode, OutputWriter};
use crate::metrics::MigrationMetrics;
use crate::models::{MigrationSettings, ModPackage};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// How the migration writes its results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Rewrite packages in place, keeping `.bak` copies of edited documents
    Internal,
    /// Mirror a single package into `output`, or each package of a folder
    /// into `<output>/<package folder>`
    Copy { output: Utf8PathBuf },
}

impl RunMode {
    /// Copy mode into the configured output folder under `path`
    pub fn copy_into_default(path: &Utf8Path, settings: &MigrationSettings) -> Self {
        RunMode::Copy {
            output: path.join(&settings.output_dir_name),
        }
    }
}

/// Outcome of a run over one or more packages
#[derive(Debug, Default)]
pub struct BatchReport {
    pub migrated: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub skipped: Vec<String>,
    pub totals: MigrationMetrics,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Packages: {} migrated, {} failed, {} skipped",
            self.migrated.len(),
            self.failed.len(),
            self.skipped.len()
        );
        for (name, error) in &self.failed {
            tracing::error!("{} failed: {}", name, error);
        }
        self.totals.log_summary("all packages");
    }
}

/// Migrate `path`, either as a package or as a folder of packages.
///
/// Only problems with `path` itself are returned as errors; package failures are
/// collected in the report.
pub fn run(path: &Utf8Path, settings: &MigrationSettings, mode: &RunMode) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    if let Some(kind) = classify(path, settings) {
        migrate_into_report(&ModPackage::new(path, kind), settings, mode, &mut report);
        return Ok(report);
    }

    tracing::info!("{} is not a mod package, scanning its subfolders", path);

    let excluded = match mode {
        RunMode::Copy { output } => Some(output.as_path()),
        RunMode::Internal => None,
    };

    let mut folders = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("Failed to list {}", path))? {
        let entry = entry.with_context(|| format!("Failed to list {}", path))?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        match Utf8PathBuf::try_from(entry.path()) {
            Ok(folder) if Some(folder.as_path()) != excluded => folders.push(folder),
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping non UTF-8 folder: {}", e),
        }
    }
    folders.sort();

    for folder in folders {
        match classify(&folder, settings) {
            Some(kind) => {
                let package = ModPackage::new(folder, kind);
                let package_mode = match mode {
                    RunMode::Copy { output } => RunMode::Copy {
                        output: output.join(package.name()),
                    },
                    RunMode::Internal => RunMode::Internal,
                };
                migrate_into_report(&package, settings, &package_mode, &mut report)
            }
            None => {
                tracing::debug!("Skipping unrecognized folder {}", folder);
                report
                    .skipped
                    .push(folder.file_name().unwrap_or(folder.as_str()).to_string());
            }
        }
    }

    if report.migrated.is_empty() && report.failed.is_empty() {
        tracing::warn!("No mod packages found under {}", path);
    }

    Ok(report)
}

fn migrate_into_report(
    package: &ModPackage,
    settings: &MigrationSettings,
    mode: &RunMode,
    report: &mut BatchReport,
) {
    match migrate_package(package, settings, mode) {
        Ok(metrics) => {
            metrics.log_summary(package.name());
            report.totals.absorb(&metrics);
            report.migrated.push(package.name().to_string());
        }
        Err(e) => {
            tracing::error!("Failed to migrate {}: {:#}", package.name(), e);
            report.failed.push((package.name().to_string(), format!("{:#}", e)));
        }
    }
}

/// Migrate one classified package with a fresh processed-file set
pub fn migrate_package(
    package: &ModPackage,
    settings: &MigrationSettings,
    mode: &RunMode,
) -> Result<MigrationMetrics> {
    tracing::info!("Migrating {} ({})", package.name(), package.kind());

    let output_mode = match mode {
        RunMode::Internal => OutputMode::InPlace,
        RunMode::Copy { output } => {
            clone_structure(package.root(), output, Some(output))?;
            OutputMode::Mirrored {
                root: output.clone(),
            }
        }
    };

    let writer = OutputWriter::new(output_mode, package.root(), &settings.backup_extension);
    strategy_for(package.kind()).migrate(package, &writer, settings)
}
