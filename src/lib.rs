// Portrait Patch - Converts PyTK based HD portrait mods to HD Portraits
//
// This is the library crate containing the migration engine and data structures.
// The binary crate (main.rs) provides the command line entry point.

pub mod config;
pub mod document;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::config::ConfigManager;
pub use models::{FrameworkKind, MigrationSettings, ModPackage};
pub use services::{BatchReport, RunMode};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
