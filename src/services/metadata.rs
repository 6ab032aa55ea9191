//! Converts PyTK portrait descriptors into HD Portraits metadata.
//!
//! PyTK describes a portrait by its scale relative to the vanilla 64px portrait and,
//! for animated portraits, the pixel size of one frame plus a frame rate. HD Portraits
//! wants the absolute sprite size, the frame grid and the milliseconds per frame.
//!
//! All divisions truncate toward zero. Degenerate descriptors (scale below 1, zero
//! FPS) produce degenerate numbers rather than errors.

use super::error::MigrationError;
use crate::document::load_document;
use crate::models::{DerivedAnimation, DerivedMetadata, LegacyDescriptor};
use anyhow::Result;
use camino::Utf8Path;

pub struct MetadataDeriver {
    base_unit: u32,
    default_fps: f64,
}

impl MetadataDeriver {
    pub fn new(base_unit: u32, default_fps: f64) -> Self {
        Self {
            base_unit,
            default_fps,
        }
    }

    /// Read the PyTK descriptor at `legacy_path` and derive metadata for `portrait_target`.
    ///
    /// Returns `Ok(None)` when there is no descriptor, and
    /// [`MigrationError::MalformedDescriptor`] when it cannot be interpreted.
    pub fn derive(
        &self,
        legacy_path: &Utf8Path,
        portrait_target: &str,
    ) -> Result<Option<DerivedMetadata>> {
        if !legacy_path.is_file() {
            tracing::debug!("No PyTK descriptor at {}", legacy_path);
            return Ok(None);
        }

        let document = load_document(legacy_path)?;
        let descriptor: LegacyDescriptor =
            serde_json::from_value(document).map_err(|source| MigrationError::MalformedDescriptor {
                path: legacy_path.to_path_buf(),
                source,
            })?;

        Ok(Some(self.derive_from(&descriptor, portrait_target)))
    }

    pub fn derive_from(&self, descriptor: &LegacyDescriptor, portrait_target: &str) -> DerivedMetadata {
        let size = (descriptor.scale.trunc() as i64).saturating_mul(i64::from(self.base_unit));

        let animation = descriptor.animation.as_ref().map(|animation| {
            let frame_width = animation.frame_width.unwrap_or(size as f64);
            let frame_height = animation.frame_height.unwrap_or(size as f64);
            let fps = animation.fps.unwrap_or(self.default_fps);

            DerivedAnimation {
                h_frames: truncating_div(frame_width, size as f64),
                v_frames: truncating_div(frame_height, size as f64),
                speed: truncating_div(1000.0, fps),
            }
        });

        DerivedMetadata {
            size,
            portrait: portrait_target.to_string(),
            animation,
        }
    }
}

/// `numerator / denominator` truncated toward zero; a zero denominator saturates
fn truncating_div(numerator: f64, denominator: f64) -> i64 {
    (numerator / denominator).trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LegacyAnimation;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn deriver() -> MetadataDeriver {
        MetadataDeriver::new(64, 30.0)
    }

    fn animated(scale: f64, width: Option<f64>, height: Option<f64>, fps: Option<f64>) -> LegacyDescriptor {
        LegacyDescriptor {
            scale,
            animation: Some(LegacyAnimation {
                frame_width: width,
                frame_height: height,
                fps,
            }),
        }
    }

    #[test]
    fn test_animated_descriptor() {
        let descriptor = animated(2.0, Some(256.0), Some(128.0), Some(30.0));
        let metadata = deriver().derive_from(&descriptor, "Mods/HDPortraitsPatch/Abigail");

        assert_eq!(metadata.size, 128);
        assert_eq!(
            metadata.animation,
            Some(DerivedAnimation {
                h_frames: 2,
                v_frames: 1,
                speed: 33,
            })
        );
        assert_eq!(metadata.portrait, "Mods/HDPortraitsPatch/Abigail");
    }

    #[test]
    fn test_static_descriptor() {
        let descriptor = LegacyDescriptor {
            scale: 4.0,
            animation: None,
        };
        let metadata = deriver().derive_from(&descriptor, "Mods/HDPortraitsPatch/Leah");
        assert_eq!(metadata.size, 256);
        assert!(metadata.animation.is_none());
    }

    #[test]
    fn test_animation_defaults() {
        let descriptor = animated(2.0, None, None, None);
        let animation = deriver().derive_from(&descriptor, "x").animation.unwrap();
        assert_eq!(animation.h_frames, 1);
        assert_eq!(animation.v_frames, 1);
        assert_eq!(animation.speed, 33);

        let animation = MetadataDeriver::new(64, 20.0)
            .derive_from(&descriptor, "x")
            .animation
            .unwrap();
        assert_eq!(animation.speed, 50);
    }

    #[test]
    fn test_fractional_scale_truncates() {
        let descriptor = LegacyDescriptor {
            scale: 2.9,
            animation: None,
        };
        assert_eq!(deriver().derive_from(&descriptor, "x").size, 128);
    }

    #[test]
    fn test_degenerate_scale_does_not_panic() {
        let descriptor = animated(0.5, Some(128.0), Some(128.0), Some(0.0));
        let metadata = deriver().derive_from(&descriptor, "x");
        assert_eq!(metadata.size, 0);
        assert!(metadata.animation.is_some());
    }

    #[test]
    fn test_missing_descriptor_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8Path::from_path(temp_dir.path()).unwrap().join("Abigail.pytk.json");
        assert!(deriver().derive(&path, "x").unwrap().is_none());
    }

    #[test]
    fn test_reads_json5_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8Path::from_path(temp_dir.path()).unwrap().join("Abigail.pytk.json");
        fs::write(
            &path,
            "{\n  // PyTK\n  \"Scale\": 2,\n  \"Animation\": { \"FrameWidth\": 256, \"FrameHeight\": 128, \"FPS\": 30, },\n}",
        )
        .unwrap();

        let metadata = deriver().derive(&path, "Mods/HDPortraitsPatch/Abigail").unwrap().unwrap();
        assert_eq!(metadata.size, 128);
        assert_eq!(metadata.animation.unwrap().h_frames, 2);
    }

    #[test]
    fn test_malformed_descriptor_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8Path::from_path(temp_dir.path()).unwrap().join("Abigail.pytk.json");
        fs::write(&path, r#"{"Scale": "huge"}"#).unwrap();

        let error = deriver().derive(&path, "x").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MigrationError>(),
            Some(MigrationError::MalformedDescriptor { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_size_is_scale_times_base(scale in 1u32..16) {
            let descriptor = LegacyDescriptor { scale: f64::from(scale), animation: None };
            let metadata = deriver().derive_from(&descriptor, "x");
            prop_assert_eq!(metadata.size, i64::from(scale) * 64);
        }

        #[test]
        fn prop_frame_grid_matches_sheet(scale in 1u32..8, columns in 1u32..12, rows in 1u32..12) {
            let size = f64::from(scale * 64);
            let descriptor = animated(
                f64::from(scale),
                Some(size * f64::from(columns)),
                Some(size * f64::from(rows)),
                None,
            );
            let animation = deriver().derive_from(&descriptor, "x").animation.unwrap();
            prop_assert_eq!(animation.h_frames, i64::from(columns));
            prop_assert_eq!(animation.v_frames, i64::from(rows));
        }
    }
}
