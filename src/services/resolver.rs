//! Resolves a `FromFile` reference to the image files it stands for.
//!
//! Content Patcher lets a change use tokens such as `{{TargetWithoutPath}}` so one
//! entry covers a whole folder of portraits. The tokens are never evaluated here:
//! a templated reference simply expands to every image in its folder.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::fs;

/// Outcome of resolving one `FromFile` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Literal reference; `None` when the file does not exist
    Literal(Option<Utf8PathBuf>),
    /// Templated reference, expanded to the images in its folder sorted by name
    Templated(Vec<Utf8PathBuf>),
}

impl Resolution {
    pub fn is_templated(&self) -> bool {
        matches!(self, Resolution::Templated(_))
    }

    /// Resolved files, relative to the package root
    pub fn files(&self) -> &[Utf8PathBuf] {
        match self {
            Resolution::Literal(Some(path)) => std::slice::from_ref(path),
            Resolution::Literal(None) => &[],
            Resolution::Templated(paths) => paths,
        }
    }
}

pub struct PathResolver {
    /// Matches a `{{...}}` token anywhere in a reference
    token_pattern: Regex,

    image_extension: String,
}

impl PathResolver {
    pub fn new(image_extension: &str) -> Self {
        Self {
            token_pattern: Regex::new(r"\{\{[^{}]*\}\}").expect("Invalid token regex"),
            image_extension: image_extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn is_templated(&self, source_ref: &str) -> bool {
        self.token_pattern.is_match(source_ref)
    }

    /// Resolve `source_ref` against `package_root`.
    ///
    /// Returned paths are relative to the package root and use `/` separators.
    pub fn resolve(&self, source_ref: &str, package_root: &Utf8Path) -> Result<Resolution> {
        let reference = normalize_reference(source_ref);

        if !self.is_templated(&reference) {
            let exists = package_root.join(&reference).is_file();
            if !exists {
                tracing::warn!("Referenced file does not exist: {}", reference);
            }
            return Ok(Resolution::Literal(exists.then(|| Utf8PathBuf::from(reference))));
        }

        let relative_dir = Utf8Path::new(&reference)
            .parent()
            .unwrap_or_else(|| Utf8Path::new(""));
        let dir = package_root.join(relative_dir);

        if !dir.is_dir() {
            tracing::warn!("Template {} points at missing folder {}", reference, dir);
            return Ok(Resolution::Templated(Vec::new()));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir))? {
            let entry = entry.with_context(|| format!("Failed to list {}", dir))?;
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!("Skipping non UTF-8 file name in {}", dir);
                continue;
            };
            let is_image = Utf8Path::new(&name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.image_extension));
            if is_image && entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                names.push(name);
            }
        }
        names.sort();

        let files = names
            .into_iter()
            .map(|name| {
                if relative_dir.as_str().is_empty() {
                    Utf8PathBuf::from(name)
                } else {
                    Utf8PathBuf::from(format!("{}/{}", relative_dir, name))
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!("Template {} expanded to {} files", reference, files.len());
        Ok(Resolution::Templated(files))
    }
}

/// Use `/` separators and drop a leading `./`
pub fn normalize_reference(source_ref: &str) -> String {
    let reference = source_ref.trim().replace('\\', "/");
    reference.trim_start_matches("./").to_string()
}

/// HD Portraits metadata path for an image (`Abigail.png` -> `Abigail.json`)
pub fn metadata_path(image: &Utf8Path) -> Utf8PathBuf {
    image.with_extension("json")
}

/// PyTK descriptor path for an image (`Abigail.png` -> `Abigail.pytk.json`)
pub fn legacy_descriptor_path(image: &Utf8Path) -> Utf8PathBuf {
    image.with_extension("pytk.json")
}

/// Swap the image extension of a possibly templated reference for `json`.
///
/// Anything else after the last dot, such as `{{Target.Name}}`, is kept and
/// `.json` is appended.
pub fn metadata_reference(source_ref: &str, image_extension: &str) -> String {
    let reference = normalize_reference(source_ref);
    let path = Utf8Path::new(&reference);
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(image_extension.trim_start_matches('.')) => {
            path.with_extension("json").into_string()
        }
        _ => format!("{}.json", reference),
    }
}
