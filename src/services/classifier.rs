//! Identifies which framework a mod folder was authored for.
//!
//! Stardew Valley mod folders conventionally carry their framework in the name:
//! `[CP] High Res Portraits` is a Content Patcher pack, `[STF] Portrait Shop` a
//! Shop Tile Framework pack.
//!
//! # Examples
//!
//! ```ignore
//! use portrait_patch::services::classify;
//!
//! let kind = classify(Utf8Path::new("Mods/[CP] High Res Portraits"), &settings);
//! assert_eq!(kind, Some(FrameworkKind::ContentPatcher));
//! ```

use crate::models::{FrameworkKind, MigrationSettings};
use camino::Utf8Path;

/// Classify `dir` by its folder name and contents.
///
/// A Content Patcher folder must also have its change list at the root; without
/// one there is nothing to migrate and the folder is treated as unrecognized.
pub fn classify(dir: &Utf8Path, settings: &MigrationSettings) -> Option<FrameworkKind> {
    let name = dir.file_name()?.trim_start();

    if has_marker(name, &settings.content_patcher_marker) {
        if dir.join(&settings.content_file).is_file() {
            tracing::debug!("{} is a Content Patcher package", dir);
            return Some(FrameworkKind::ContentPatcher);
        }
        tracing::warn!(
            "{} looks like a Content Patcher package but has no {}",
            dir,
            settings.content_file
        );
        return None;
    }

    if has_marker(name, &settings.shop_framework_marker) {
        tracing::debug!("{} is a Shop Tile Framework package", dir);
        return Some(FrameworkKind::ShopFramework);
    }

    None
}

fn has_marker(name: &str, marker: &str) -> bool {
    !marker.is_empty()
        && name
            .get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
}
