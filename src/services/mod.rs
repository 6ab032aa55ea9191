//! Services module - The migration engine.
//!
//! Everything that turns a PyTK portrait pack into an HD Portraits pack lives here.
//! The services have no knowledge of the command line; `main.rs` only parses
//! arguments and hands a path, settings and a [`RunMode`] to [`run`].
//!
//! # Components
//!
//! - [`classify`]: Decides which framework a mod folder belongs to
//! - [`PathResolver`]: Expands `FromFile` references, including `{{token}}` templates
//! - [`MetadataDeriver`]: Converts `.pytk.json` descriptors to HD Portraits metadata
//! - [`ChangeListMigrator`]: Splits each portrait change into image + metadata loads
//! - [`rewrite_manifest`]: Swaps the PyTK dependency for HD Portraits
//! - [`OutputWriter`]: In-place writes with a one-time backup, or a mirrored tree
//! - [`MigrationStrategy`]: One implementation per [`FrameworkKind`](crate::models::FrameworkKind)
//! - [`run`]: Single package or batch over a folder of packages
//!
//! # Flow
//!
//! 1. Classify the input folder; if it is not a package, classify each subfolder
//! 2. Pick the strategy for the package's framework
//! 3. Read `content.json` (or its backup from an earlier run) and migrate the changes
//! 4. Write the change list and the rewritten `manifest.json`

pub mod batch;
pub mod classifier;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod migrator;
pub mod resolver;
pub mod strategy;
pub mod tree;
pub mod writer;

pub use batch::{BatchReport, RunMode, migrate_package, run};
pub use classifier::classify;
pub use error::MigrationError;
pub use manifest::{ManifestChanges, rewrite_manifest};
pub use metadata::MetadataDeriver;
pub use migrator::{ChangeListMigrator, ProcessedFiles, ProcessedTag};
pub use resolver::{PathResolver, Resolution};
pub use strategy::{MigrationStrategy, strategy_for};
pub use tree::clone_structure;
pub use writer::{OutputMode, OutputWriter};
