//! One migration strategy per mod framework.

use super::error::MigrationError;
use super::manifest::rewrite_manifest;
use super::migrator::ChangeListMigrator;
use super::writer::OutputWriter;
use crate::document::load_document;
use crate::metrics::MigrationMetrics;
use crate::models::{FrameworkKind, MigrationSettings, ModPackage};
use anyhow::Result;

/// Migrates a classified package, writing through `writer`
pub trait MigrationStrategy {
    fn kind(&self) -> FrameworkKind;

    fn migrate(
        &self,
        package: &ModPackage,
        writer: &OutputWriter,
        settings: &MigrationSettings,
    ) -> Result<MigrationMetrics>;
}

/// Strategy for a framework kind
pub fn strategy_for(kind: FrameworkKind) -> Box<dyn MigrationStrategy> {
    match kind {
        FrameworkKind::ContentPatcher => Box::new(ContentPatcherStrategy),
        FrameworkKind::ShopFramework => Box::new(ShopFrameworkStrategy),
    }
}

/// Rewrites `content.json`, generates portrait metadata and swaps the manifest dependency
pub struct ContentPatcherStrategy;

impl MigrationStrategy for ContentPatcherStrategy {
    fn kind(&self) -> FrameworkKind {
        FrameworkKind::ContentPatcher
    }

    fn migrate(
        &self,
        package: &ModPackage,
        writer: &OutputWriter,
        settings: &MigrationSettings,
    ) -> Result<MigrationMetrics> {
        let root = package.root();
        let content_path = root.join(&settings.content_file);
        if !content_path.is_file() && !writer.backup_path(&content_path).is_file() {
            return Err(MigrationError::MissingChangeList(content_path).into());
        }

        let content_source = writer.pristine_source(&content_path);
        let content = load_document(&content_source)?;

        let mut migrator = ChangeListMigrator::new(settings, root, writer);
        let migrated = migrator.migrate(&content, &content_source)?;
        writer.write_document(&content_path, &migrated)?;

        let manifest_path = root.join(&settings.manifest_file);
        let manifest_source = writer.pristine_source(&manifest_path);
        if manifest_source.is_file() {
            let mut manifest = load_document(&manifest_source)?;
            let changes = rewrite_manifest(
                &mut manifest,
                &settings.legacy_dependency,
                &settings.successor_dependency,
                settings.dedupe_dependencies,
            )?;
            tracing::info!(
                "Manifest: {} {} removed, {} {}",
                changes.removed,
                settings.legacy_dependency,
                settings.successor_dependency,
                if changes.appended { "added" } else { "already listed" }
            );
            writer.write_document(&manifest_path, &manifest)?;
        } else {
            tracing::warn!("{} has no {}, dependencies not updated", package.name(), settings.manifest_file);
        }

        Ok(migrator.into_metrics())
    }
}

/// Shop Tile Framework packs are recognized but have nothing to migrate yet
pub struct ShopFrameworkStrategy;

impl MigrationStrategy for ShopFrameworkStrategy {
    fn kind(&self) -> FrameworkKind {
        FrameworkKind::ShopFramework
    }

    fn migrate(
        &self,
        package: &ModPackage,
        _writer: &OutputWriter,
        _settings: &MigrationSettings,
    ) -> Result<MigrationMetrics> {
        tracing::info!("{}: {} packages are left as they are", package.name(), self.kind());
        Ok(MigrationMetrics::new())
    }
}
