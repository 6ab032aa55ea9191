//! Swaps the PyTK dependency for HD Portraits in a SMAPI `manifest.json`.

use super::error::MigrationError;
use anyhow::Result;
use serde_json::{Map, Value, json};

/// What [`rewrite_manifest`] changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestChanges {
    pub appended: bool,
    pub removed: usize,
}

/// Rewrite the `Dependencies` list of `manifest` in place.
///
/// - A missing `Dependencies` key is created as an empty list.
/// - `{"UniqueID": successor}` is appended. With `dedupe` set the append is skipped
///   when a record with that UniqueID (case-insensitive, as SMAPI compares them) is
///   already present; without it every call appends.
/// - Records structurally equal to `{"UniqueID": legacy}` are removed. Finding none
///   is not an error.
pub fn rewrite_manifest(
    manifest: &mut Value,
    legacy: &str,
    successor: &str,
    dedupe: bool,
) -> Result<ManifestChanges> {
    let root = manifest
        .as_object_mut()
        .ok_or_else(|| MigrationError::MalformedManifest("root is not an object".to_string()))?;

    let dependencies = root
        .entry("Dependencies")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| MigrationError::MalformedManifest("Dependencies is not a list".to_string()))?;

    let mut changes = ManifestChanges::default();

    let already_listed = dependencies.iter().any(|dependency| {
        dependency
            .get("UniqueID")
            .and_then(Value::as_str)
            .is_some_and(|id| id.eq_ignore_ascii_case(successor))
    });
    if !(dedupe && already_listed) {
        dependencies.push(json!({ "UniqueID": successor }));
        changes.appended = true;
    }

    let legacy_record = dependency_record(legacy);
    let before = dependencies.len();
    dependencies.retain(|dependency| *dependency != legacy_record);
    changes.removed = before - dependencies.len();

    if changes.removed == 0 {
        tracing::debug!("Manifest does not depend on {}", legacy);
    }

    Ok(changes)
}

fn dependency_record(unique_id: &str) -> Value {
    let mut record = Map::new();
    record.insert("UniqueID".to_string(), Value::from(unique_id));
    Value::Object(record)
}
