use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that stop the migration of a single package
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Change list not found: {0}")]
    MissingChangeList(Utf8PathBuf),

    #[error("Change list {path} is malformed: {reason}")]
    MalformedChangeList { path: Utf8PathBuf, reason: String },

    #[error("PyTK descriptor {path} is malformed: {source}")]
    MalformedDescriptor {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest is malformed: {0}")]
    MalformedManifest(String),
}
