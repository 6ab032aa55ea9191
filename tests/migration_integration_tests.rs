//! Integration tests for migrating a single Content Patcher package
//!
//! These tests verify:
//! - The change list rewrite and generated metadata on a realistic package
//! - Backups and re-running on an already migrated package
//! - Copy mode leaving the package untouched
//! - Manifest dependency replacement

use camino::{Utf8Path, Utf8PathBuf};
use portrait_patch::document::load_document;
use portrait_patch::services::{self, RunMode};
use portrait_patch::MigrationSettings;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

const CONTENT: &str = r#"{
    // Converted with PyTK
    "Format": "1.28.0",
    "Changes": [
        {
            "LogName": "Abigail",
            "Action": "EditImage",
            "Target": "Portraits/Abigail",
            "FromFile": "assets/Abigail.png",
        },
        {
            "Action": "Load",
            "Target": "Characters/Abigail",
            "FromFile": "assets/sprites/Abigail.png",
        },
        {
            "Action": "Load",
            "Target": "Portraits/Leah",
            "FromFile": "assets/Leah.png",
            "When": { "Season": "Winter" },
        },
    ],
}"#;

const MANIFEST: &str = r#"{
    "Name": "High Res Portraits",
    "UniqueID": "DCBurger.HighResPortraits",
    "Dependencies": [
        { "UniqueID": "Pathoschild.ContentPatcher" },
        { "UniqueID": "Platonymous.Toolkit" },
    ],
    "ContentPackFor": { "UniqueID": "Pathoschild.ContentPatcher" },
}"#;

fn create_package() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf())
        .unwrap()
        .join("[CP] DCBurger's High Res Portraits");
    fs::create_dir_all(root.join("assets/sprites")).unwrap();

    fs::write(root.join("content.json"), CONTENT).unwrap();
    fs::write(root.join("manifest.json"), MANIFEST).unwrap();

    fs::write(root.join("assets/Abigail.png"), b"png").unwrap();
    fs::write(
        root.join("assets/Abigail.pytk.json"),
        r#"{"Scale": 2, "Animation": {"FrameWidth": 256, "FrameHeight": 128, "FPS": 30}}"#,
    )
    .unwrap();
    fs::write(root.join("assets/Leah.png"), b"png").unwrap();
    fs::write(root.join("assets/Leah.pytk.json"), r#"{"Scale": 4}"#).unwrap();
    fs::write(root.join("assets/sprites/Abigail.png"), b"png").unwrap();

    (temp_dir, root)
}

fn targets(document: &Value) -> Vec<String> {
    document["Changes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["Target"].as_str().unwrap().to_string())
        .collect()
}

fn dependency_ids(manifest: &Value) -> Vec<String> {
    manifest["Dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["UniqueID"].as_str().unwrap().to_string())
        .collect()
}

fn backups(root: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".bak"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_in_place_migration() {
    let (_temp_dir, root) = create_package();
    let settings = MigrationSettings::default();

    let report = services::run(&root, &settings, &RunMode::Internal).unwrap();
    assert!(report.is_success());
    assert_eq!(report.migrated.len(), 1);

    let content = load_document(&root.join("content.json")).unwrap();
    assert_eq!(content["Format"], "1.28.0");
    assert_eq!(
        targets(&content),
        vec![
            "Mods/HDPortraitsPatch/Abigail",
            "Mods/HDPortraits/Abigail",
            "Characters/Abigail",
            "Mods/HDPortraitsPatch/Leah",
            "Mods/HDPortraits/Leah",
        ]
    );
    assert_eq!(
        content["Changes"][0],
        json!({
            "LogName": "Abigail",
            "Action": "Load",
            "Target": "Mods/HDPortraitsPatch/Abigail",
            "FromFile": "assets/Abigail.png"
        })
    );
    assert_eq!(content["Changes"][4]["FromFile"], "assets/Leah.json");
    assert_eq!(content["Changes"][4]["When"], json!({"Season": "Winter"}));

    let abigail = load_document(&root.join("assets/Abigail.json")).unwrap();
    assert_eq!(
        abigail,
        json!({
            "Size": 128,
            "Portrait": "Mods/HDPortraitsPatch/Abigail",
            "Animation": {"HFrames": 2, "VFrames": 1, "Speed": 33}
        })
    );
    let leah = load_document(&root.join("assets/Leah.json")).unwrap();
    assert_eq!(leah, json!({"Size": 256, "Portrait": "Mods/HDPortraitsPatch/Leah"}));
    assert!(!root.join("assets/sprites/Abigail.json").exists());

    let manifest = load_document(&root.join("manifest.json")).unwrap();
    assert_eq!(
        dependency_ids(&manifest),
        vec!["Pathoschild.ContentPatcher", "tlitookilakin.HDPortraits"]
    );
    assert_eq!(manifest["ContentPackFor"]["UniqueID"], "Pathoschild.ContentPatcher");

    assert_eq!(backups(&root), vec!["content.bak", "manifest.bak"]);
    assert_eq!(fs::read_to_string(root.join("content.bak")).unwrap(), CONTENT);
}

#[test]
fn test_rerun_is_stable() {
    let (_temp_dir, root) = create_package();
    let settings = MigrationSettings::default();

    services::run(&root, &settings, &RunMode::Internal).unwrap();
    let first_content = fs::read_to_string(root.join("content.json")).unwrap();
    let first_manifest = fs::read_to_string(root.join("manifest.json")).unwrap();

    let report = services::run(&root, &settings, &RunMode::Internal).unwrap();
    assert!(report.is_success());

    assert_eq!(fs::read_to_string(root.join("content.json")).unwrap(), first_content);
    assert_eq!(fs::read_to_string(root.join("manifest.json")).unwrap(), first_manifest);
    assert_eq!(backups(&root), vec!["content.bak", "manifest.bak"]);
    assert_eq!(fs::read_to_string(root.join("content.bak")).unwrap(), CONTENT);
    assert_eq!(fs::read_to_string(root.join("manifest.bak")).unwrap(), MANIFEST);
}

#[test]
fn test_written_documents_are_strict_json() {
    let (_temp_dir, root) = create_package();
    services::run(&root, &MigrationSettings::default(), &RunMode::Internal).unwrap();

    let raw = fs::read_to_string(root.join("content.json")).unwrap();
    let strict: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(strict["Changes"].as_array().unwrap().len(), 5);
    assert!(raw.contains("\n    \"Format\": \"1.28.0\""));
}

#[test]
fn test_copy_mode_leaves_package_untouched() {
    let (temp_dir, root) = create_package();
    let output = Utf8PathBuf::try_from(temp_dir.path().join("out")).unwrap();
    let mode = RunMode::Copy {
        output: output.clone(),
    };

    let report = services::run(&root, &MigrationSettings::default(), &mode).unwrap();
    assert!(report.is_success());

    assert_eq!(fs::read_to_string(root.join("content.json")).unwrap(), CONTENT);
    assert_eq!(fs::read_to_string(root.join("manifest.json")).unwrap(), MANIFEST);
    assert!(backups(&root).is_empty());
    assert!(!root.join("assets/Abigail.json").exists());

    let mirror = output;
    assert!(mirror.join("assets/sprites").is_dir());
    assert!(mirror.join("assets/Abigail.json").is_file());
    assert!(mirror.join("assets/Leah.json").is_file());
    assert!(!mirror.join("assets/Abigail.png").exists());
    assert!(backups(&mirror).is_empty());

    let content = load_document(&mirror.join("content.json")).unwrap();
    assert_eq!(content["Changes"].as_array().unwrap().len(), 5);
}

#[test]
fn test_copy_mode_default_output_inside_package() {
    let (_temp_dir, root) = create_package();
    let settings = MigrationSettings::default();
    let mode = RunMode::copy_into_default(&root, &settings);

    services::run(&root, &settings, &mode).unwrap();

    let mirror = root.join(&settings.output_dir_name);
    assert!(mirror.join("content.json").is_file());
    assert!(!mirror.join("[CP] DCBurger's High Res Portraits").exists());
    assert!(mirror.join("assets/Abigail.json").is_file());
    assert!(!mirror.join(&settings.output_dir_name).exists());
}

#[test]
fn test_target_prefix_override() {
    let (_temp_dir, root) = create_package();
    let settings = MigrationSettings {
        portrait_target_prefix: "Mods/MyPortraits".to_string(),
        ..Default::default()
    };

    services::run(&root, &settings, &RunMode::Internal).unwrap();

    let content = load_document(&root.join("content.json")).unwrap();
    assert_eq!(content["Changes"][0]["Target"], "Mods/MyPortraits/Abigail");
    let abigail = load_document(&root.join("assets/Abigail.json")).unwrap();
    assert_eq!(abigail["Portrait"], "Mods/MyPortraits/Abigail");
}

#[test]
fn test_default_fps_from_settings() {
    let (_temp_dir, root) = create_package();
    fs::write(
        root.join("assets/Leah.pytk.json"),
        r#"{"Scale": 1, "Animation": {"FrameWidth": 128}}"#,
    )
    .unwrap();
    let settings = MigrationSettings {
        default_fps: 20.0,
        ..Default::default()
    };

    services::run(&root, &settings, &RunMode::Internal).unwrap();

    let leah = load_document(&root.join("assets/Leah.json")).unwrap();
    assert_eq!(leah["Animation"], json!({"HFrames": 2, "VFrames": 1, "Speed": 50}));
}

#[test]
fn test_manifest_without_pytk_only_gains_hd_portraits() {
    let (_temp_dir, root) = create_package();
    fs::write(
        root.join("manifest.json"),
        r#"{"Name": "Portraits", "Dependencies": [{"UniqueID": "Pathoschild.ContentPatcher"}]}"#,
    )
    .unwrap();

    services::run(&root, &MigrationSettings::default(), &RunMode::Internal).unwrap();

    let manifest = load_document(&root.join("manifest.json")).unwrap();
    assert_eq!(
        dependency_ids(&manifest),
        vec!["Pathoschild.ContentPatcher", "tlitookilakin.HDPortraits"]
    );
}
