//! Data models for the portrait migration.
//!
//! - [`MigrationSettings`]: Every tunable constant, loaded from `portrait_patch.yaml`
//! - [`ModPackage`] / [`FrameworkKind`]: A mod folder and the framework it was authored for
//! - [`ChangeEntry`]: One element of a Content Patcher `Changes` array
//! - [`LegacyDescriptor`]: PyTK `.pytk.json` sidecar (input, never mutated)
//! - [`DerivedMetadata`]: HD Portraits `.json` sidecar (output)

pub mod change;
pub mod config;
pub mod descriptor;
pub mod package;

pub use change::{ChangeEntry, LOAD_ACTION, split_target};
pub use self::config::MigrationSettings;
pub use descriptor::{DerivedAnimation, DerivedMetadata, LegacyAnimation, LegacyDescriptor};
pub use package::{FrameworkKind, ModPackage};
