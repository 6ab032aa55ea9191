//! Rewrites a Content Patcher change list for HD Portraits.
//!
//! Every change that targets `Portraits/<asset>` becomes two `Load` changes at the
//! same position:
//!
//! 1. the image itself, loaded into `<portrait prefix>/<asset>`
//! 2. the HD Portraits metadata sidecar, loaded into `<metadata prefix>/<asset>`
//!
//! While walking the list, a metadata sidecar is generated from the PyTK descriptor
//! of every image the change resolves to. A [`ProcessedFiles`] set, owned by the
//! migrator, makes sure an image reachable from several changes (a template plus a
//! literal override, say) is only handled once per run.

use super::error::MigrationError;
use super::metadata::MetadataDeriver;
use super::resolver::{
    PathResolver, legacy_descriptor_path, metadata_path, metadata_reference, normalize_reference,
};
use super::writer::OutputWriter;
use crate::metrics::MigrationMetrics;
use crate::models::{ChangeEntry, MigrationSettings, split_target};
use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde_json::Value;

/// How an image was first reached during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessedTag {
    /// Through a literal `FromFile`
    Individual,
    /// Through a templated `FromFile`
    Globbed,
}

/// Images whose metadata has been handled in the current run, keyed by their
/// path relative to the package root
#[derive(Debug, Default, Clone)]
pub struct ProcessedFiles {
    files: IndexMap<Utf8PathBuf, ProcessedTag>,
}

impl ProcessedFiles {
    pub fn tag(&self, file: &Utf8Path) -> Option<ProcessedTag> {
        self.files.get(file).copied()
    }

    pub fn contains(&self, file: &Utf8Path) -> bool {
        self.files.contains_key(file)
    }

    fn mark(&mut self, file: Utf8PathBuf, tag: ProcessedTag) {
        self.files.entry(file).or_insert(tag);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Migrates the change list of one package. Create one per package; the
/// processed set must not leak into another package's run.
pub struct ChangeListMigrator<'a> {
    settings: &'a MigrationSettings,
    package_root: &'a Utf8Path,
    writer: &'a OutputWriter,
    resolver: PathResolver,
    deriver: MetadataDeriver,
    processed: ProcessedFiles,
    metrics: MigrationMetrics,
}

impl<'a> ChangeListMigrator<'a> {
    pub fn new(
        settings: &'a MigrationSettings,
        package_root: &'a Utf8Path,
        writer: &'a OutputWriter,
    ) -> Self {
        Self {
            settings,
            package_root,
            writer,
            resolver: PathResolver::new(&settings.image_extension),
            deriver: MetadataDeriver::new(settings.base_unit, settings.default_fps),
            processed: ProcessedFiles::default(),
            metrics: MigrationMetrics::new(),
        }
    }

    pub fn processed(&self) -> &ProcessedFiles {
        &self.processed
    }

    pub fn metrics(&self) -> &MigrationMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> MigrationMetrics {
        self.metrics
    }

    /// Rewrite the `Changes` of a parsed `content.json`, writing metadata sidecars
    /// as a side effect. The returned document keeps every other key as it was.
    pub fn migrate(&mut self, content: &Value, source: &Utf8Path) -> Result<Value> {
        let mut document = content.clone();

        let changes = document
            .get("Changes")
            .ok_or_else(|| MigrationError::MalformedChangeList {
                path: source.to_path_buf(),
                reason: "no Changes list".to_string(),
            })?
            .as_array()
            .ok_or_else(|| MigrationError::MalformedChangeList {
                path: source.to_path_buf(),
                reason: "Changes is not a list".to_string(),
            })?;

        // Built from a frozen copy; the original list is only replaced at the end
        let snapshot = changes.clone();
        let mut rewritten = Vec::with_capacity(snapshot.len() * 2);

        for change in snapshot {
            let entry = match change {
                Value::Object(fields) => ChangeEntry::from_map(fields),
                other => {
                    rewritten.push(other);
                    self.metrics.record_entry_passed_through();
                    continue;
                }
            };

            match self.migrate_entry(&entry)? {
                Some((portrait, metadata)) => {
                    rewritten.push(portrait.into_value());
                    rewritten.push(metadata.into_value());
                    self.metrics.record_entry_migrated();
                }
                None => {
                    rewritten.push(entry.into_value());
                    self.metrics.record_entry_passed_through();
                }
            }
        }

        document["Changes"] = Value::Array(rewritten);
        Ok(document)
    }

    /// Split one change into its portrait and metadata loads, or `None` when the
    /// change has nothing to do with portraits.
    fn migrate_entry(&mut self, entry: &ChangeEntry) -> Result<Option<(ChangeEntry, ChangeEntry)>> {
        let (Some(target), Some(from_file)) = (entry.target(), entry.from_file()) else {
            return Ok(None);
        };
        let Some((parent, asset)) = split_target(target) else {
            return Ok(None);
        };
        if !parent.eq_ignore_ascii_case(&self.settings.portraits_dir) {
            return Ok(None);
        }

        tracing::debug!("Migrating change {} <- {}", target, from_file);

        let resolution = self.resolver.resolve(from_file, self.package_root)?;
        let tag = if resolution.is_templated() {
            ProcessedTag::Globbed
        } else {
            ProcessedTag::Individual
        };
        let templated_asset = self.resolver.is_templated(asset);

        for image in resolution.files() {
            if self.processed.contains(image) {
                tracing::debug!("Already handled {}, skipping", image);
                self.metrics.record_duplicate_skipped();
                continue;
            }

            let asset_name = if templated_asset {
                image.file_stem().unwrap_or(asset)
            } else {
                asset
            };
            self.write_metadata(image, asset_name, tag)?;
        }

        let portrait = entry.to_load(
            &self.settings.portrait_target(asset),
            &normalize_reference(from_file),
        );
        let metadata = entry.to_load(
            &self.settings.metadata_target(asset),
            &metadata_reference(from_file, &self.settings.image_extension),
        );

        Ok(Some((portrait, metadata)))
    }

    fn write_metadata(&mut self, image: &Utf8Path, asset: &str, tag: ProcessedTag) -> Result<()> {
        let absolute = self.package_root.join(image);
        let legacy = legacy_descriptor_path(&absolute);

        let Some(metadata) = self
            .deriver
            .derive(&legacy, &self.settings.portrait_target(asset))?
        else {
            tracing::warn!("No PyTK descriptor for {}, metadata not generated", image);
            self.metrics.record_descriptor_missing();
            return Ok(());
        };

        self.writer.write_generated(&metadata_path(&absolute), &metadata)?;
        self.processed.mark(image.to_path_buf(), tag);
        self.metrics
            .record_metadata_written(tag == ProcessedTag::Globbed);
        Ok(())
    }
}
