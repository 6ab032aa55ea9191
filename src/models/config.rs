use serde::{Deserialize, Serialize};

/// Migration settings, loaded from `portrait_patch.yaml` and `PORTRAIT_PATCH__*`
/// environment variables on top of these defaults.
///
/// Every constant the migration depends on lives here so a mod author can adapt
/// the tool to a package that deviates from the usual PyTK layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    /// Pixel size of one portrait frame at scale 1
    pub base_unit: u32,

    /// Frame rate assumed when a PyTK animation block has no `FPS`
    pub default_fps: f64,

    /// Parent segment of change targets that hold portraits (`Portraits/Abigail`)
    pub portraits_dir: String,

    /// Load directory for the generated HD Portraits metadata
    pub metadata_target_prefix: String,

    /// Load directory for the portrait images referenced by the metadata
    pub portrait_target_prefix: String,

    /// Folder name prefix identifying a Content Patcher package
    pub content_patcher_marker: String,

    /// Folder name prefix identifying a Shop Tile Framework package
    pub shop_framework_marker: String,

    pub content_file: String,
    pub manifest_file: String,

    /// Extension given to the pristine copy of a rewritten document
    pub backup_extension: String,

    pub image_extension: String,

    /// UniqueID of the dependency being replaced
    pub legacy_dependency: String,

    /// UniqueID of the dependency added in its place
    pub successor_dependency: String,

    /// Skip appending the successor dependency when it is already listed
    pub dedupe_dependencies: bool,

    /// Folder created under the input path for copy mode when no output is given
    pub output_dir_name: String,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            base_unit: 64,
            default_fps: 30.0,
            portraits_dir: "Portraits".to_string(),
            metadata_target_prefix: "Mods/HDPortraits".to_string(),
            portrait_target_prefix: "Mods/HDPortraitsPatch".to_string(),
            content_patcher_marker: "[CP]".to_string(),
            shop_framework_marker: "[STF]".to_string(),
            content_file: "content.json".to_string(),
            manifest_file: "manifest.json".to_string(),
            backup_extension: "bak".to_string(),
            image_extension: "png".to_string(),
            legacy_dependency: "Platonymous.Toolkit".to_string(),
            successor_dependency: "tlitookilakin.HDPortraits".to_string(),
            dedupe_dependencies: true,
            output_dir_name: "PortraitPatch Output".to_string(),
        }
    }
}

impl MigrationSettings {
    /// Target for the metadata entry of a portrait asset
    pub fn metadata_target(&self, asset: &str) -> String {
        join_target(&self.metadata_target_prefix, asset)
    }

    /// Target for the image entry of a portrait asset
    pub fn portrait_target(&self, asset: &str) -> String {
        join_target(&self.portrait_target_prefix, asset)
    }
}

fn join_target(prefix: &str, asset: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        asset.to_string()
    } else {
        format!("{}/{}", prefix, asset)
    }
}
