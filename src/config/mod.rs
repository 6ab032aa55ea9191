use crate::models::MigrationSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config, Environment, File, FileFormat};
use std::fs;

/// Default settings file, looked up in the working directory
pub const SETTINGS_FILE: &str = "portrait_patch.yaml";

/// Prefix of environment variables overriding settings (`PORTRAIT_PATCH__DEFAULT_FPS=20`)
pub const ENV_PREFIX: &str = "PORTRAIT_PATCH";

/// Configuration manager for the migration settings.
///
/// Settings are layered, later sources winning:
/// 1. Built-in defaults ([`MigrationSettings::default`])
/// 2. The YAML settings file, if present
/// 3. `PORTRAIT_PATCH__*` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager reading from `settings_path`.
    ///
    /// The file does not have to exist.
    pub fn new<P: AsRef<Utf8Path>>(settings_path: P) -> Self {
        Self {
            settings_path: settings_path.as_ref().to_path_buf(),
        }
    }

    /// Load the effective settings.
    pub fn load_settings(&self) -> Result<MigrationSettings> {
        if self.settings_path.exists() {
            tracing::info!("Loading settings from {}", self.settings_path);
        } else {
            tracing::debug!("No settings file at {}, using defaults", self.settings_path);
        }

        let settings = Config::builder()
            .add_source(
                File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: MigrationSettings = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        Ok(settings)
    }

    /// Save settings to the YAML settings file.
    pub fn save_settings(&self, settings: &MigrationSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        if let Some(parent) = self.settings_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create settings directory: {}", parent))?;
            }
        }

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new(SETTINGS_FILE)
    }
}
