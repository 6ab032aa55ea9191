//! Writes migrated documents either over the package (keeping one pristine backup)
//! or into a mirrored output tree.

use crate::document::to_pretty_string;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fs;
use std::io::Write;
use tempfile::Builder;

/// Where migrated files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Overwrite the package, renaming each hand-authored document to a backup first
    InPlace,
    /// Write into a separate tree rooted at `root`; the package is never modified
    Mirrored { root: Utf8PathBuf },
}

pub struct OutputWriter {
    mode: OutputMode,
    package_root: Utf8PathBuf,
    backup_extension: String,
}

impl OutputWriter {
    pub fn new(mode: OutputMode, package_root: &Utf8Path, backup_extension: &str) -> Self {
        Self {
            mode,
            package_root: package_root.to_path_buf(),
            backup_extension: backup_extension.trim_start_matches('.').to_string(),
        }
    }

    /// Backup location for a hand-authored document (`content.json` -> `content.bak`)
    pub fn backup_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        path.with_extension(&self.backup_extension)
    }

    /// The untouched version of a document: its backup if an earlier in-place run
    /// made one, otherwise the document itself.
    pub fn pristine_source(&self, path: &Utf8Path) -> Utf8PathBuf {
        let backup = self.backup_path(path);
        if backup.is_file() {
            tracing::info!("Reading {} from backup {}", path, backup);
            backup
        } else {
            path.to_path_buf()
        }
    }

    /// Where a file of the package ends up in the current mode
    pub fn destination(&self, path: &Utf8Path) -> Result<Utf8PathBuf> {
        match &self.mode {
            OutputMode::InPlace => Ok(path.to_path_buf()),
            OutputMode::Mirrored { root } => {
                let relative = path.strip_prefix(&self.package_root).with_context(|| {
                    format!("{} is not inside package {}", path, self.package_root)
                })?;
                Ok(root.join(relative))
            }
        }
    }

    /// Replace a hand-authored document such as `content.json`.
    ///
    /// In place, the original is renamed to its backup unless a backup already
    /// exists, so repeated runs keep the first pristine copy.
    pub fn write_document<T: Serialize>(&self, path: &Utf8Path, document: &T) -> Result<Utf8PathBuf> {
        let contents = to_pretty_string(document)?;
        let destination = self.destination(path)?;

        match self.mode {
            OutputMode::InPlace => {
                let staged = stage(&destination, &contents)?;

                let backup = self.backup_path(&destination);
                if !backup.exists() && destination.exists() {
                    fs::rename(&destination, &backup).with_context(|| {
                        format!("Failed to back up {} to {}", destination, backup)
                    })?;
                    tracing::info!("Backed up {} to {}", destination, backup);
                }

                persist(staged, &destination)?;
            }
            OutputMode::Mirrored { .. } => {
                persist(stage(&destination, &contents)?, &destination)?;
            }
        }

        tracing::info!("Wrote {}", destination);
        Ok(destination)
    }

    /// Write a generated file such as a portrait's `.json` sidecar, always overwriting
    pub fn write_generated<T: Serialize>(&self, path: &Utf8Path, document: &T) -> Result<Utf8PathBuf> {
        let contents = to_pretty_string(document)?;
        let destination = self.destination(path)?;
        persist(stage(&destination, &contents)?, &destination)?;
        tracing::debug!("Wrote {}", destination);
        Ok(destination)
    }
}

/// Write `contents` to a temp file next to `destination`
fn stage(destination: &Utf8Path, contents: &str) -> Result<tempfile::NamedTempFile> {
    let dir = destination
        .parent()
        .with_context(|| format!("{} has no parent directory", destination))?;
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir))?;

    let mut staged = Builder::new()
        .prefix(".portrait-patch.")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir))?;

    staged
        .write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write temp file for {}", destination))?;
    staged
        .flush()
        .with_context(|| format!("Failed to flush temp file for {}", destination))?;

    Ok(staged)
}

fn persist(staged: tempfile::NamedTempFile, destination: &Utf8Path) -> Result<()> {
    staged
        .persist(destination)
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("Failed to persist {}", destination))
}
