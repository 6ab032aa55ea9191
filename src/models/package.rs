use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Authoring framework of a mod package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameworkKind {
    /// Content Patcher package with a `content.json` change list
    ContentPatcher,
    /// Shop Tile Framework package
    ShopFramework,
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkKind::ContentPatcher => write!(f, "Content Patcher"),
            FrameworkKind::ShopFramework => write!(f, "Shop Tile Framework"),
        }
    }
}

/// A classified mod folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPackage {
    root: Utf8PathBuf,
    kind: FrameworkKind,
}

impl ModPackage {
    pub fn new(root: impl Into<Utf8PathBuf>, kind: FrameworkKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn kind(&self) -> FrameworkKind {
        self.kind
    }

    /// Folder name, used for logging and for the mirror directory in copy mode
    pub fn name(&self) -> &str {
        self.root.file_name().unwrap_or(self.root.as_str())
    }
}
