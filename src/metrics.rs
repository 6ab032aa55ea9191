// Migration metrics
//
// Counters collected while one package is migrated, logged when it finishes

use std::time::{Duration, Instant};

/// Counters for a single package migration.
///
/// The migration is single-threaded, so plain integers are enough; each package
/// gets its own instance and the batch runner folds them together.
#[derive(Debug, Clone)]
pub struct MigrationMetrics {
    /// Change entries split into a portrait/metadata pair
    pub entries_migrated: usize,

    /// Change entries left untouched (not under the portraits folder)
    pub entries_passed_through: usize,

    /// Metadata sidecars written
    pub metadata_written: usize,

    /// Resolved images without a PyTK descriptor
    pub descriptors_missing: usize,

    /// Resolved images skipped because an earlier entry already handled them
    pub duplicates_skipped: usize,

    /// Images reached through a literal `FromFile`
    pub individual_files: usize,

    /// Images reached through a templated `FromFile`
    pub globbed_files: usize,

    start_time: Instant,
}

impl MigrationMetrics {
    pub fn new() -> Self {
        Self {
            entries_migrated: 0,
            entries_passed_through: 0,
            metadata_written: 0,
            descriptors_missing: 0,
            duplicates_skipped: 0,
            individual_files: 0,
            globbed_files: 0,
            start_time: Instant::now(),
        }
    }

    pub fn record_entry_migrated(&mut self) {
        self.entries_migrated += 1;
    }

    pub fn record_entry_passed_through(&mut self) {
        self.entries_passed_through += 1;
    }

    pub fn record_metadata_written(&mut self, globbed: bool) {
        self.metadata_written += 1;
        if globbed {
            self.globbed_files += 1;
        } else {
            self.individual_files += 1;
        }
    }

    pub fn record_descriptor_missing(&mut self) {
        self.descriptors_missing += 1;
    }

    pub fn record_duplicate_skipped(&mut self) {
        self.duplicates_skipped += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Add another package's counters to these
    pub fn absorb(&mut self, other: &MigrationMetrics) {
        self.entries_migrated += other.entries_migrated;
        self.entries_passed_through += other.entries_passed_through;
        self.metadata_written += other.metadata_written;
        self.descriptors_missing += other.descriptors_missing;
        self.duplicates_skipped += other.duplicates_skipped;
        self.individual_files += other.individual_files;
        self.globbed_files += other.globbed_files;
    }

    pub fn log_summary(&self, label: &str) {
        tracing::info!("=== Migration summary: {} ===", label);
        tracing::info!(
            "Entries: {} migrated, {} passed through",
            self.entries_migrated,
            self.entries_passed_through
        );
        tracing::info!(
            "Metadata: {} written ({} individual, {} globbed), {} missing descriptors, {} duplicates skipped",
            self.metadata_written,
            self.individual_files,
            self.globbed_files,
            self.descriptors_missing,
            self.duplicates_skipped
        );
        tracing::info!("Elapsed: {:.2}s", self.elapsed().as_secs_f64());
    }
}

impl Default for MigrationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
