use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use walkdir::WalkDir;

/// Recreate every subdirectory of `source` under `dest`, copying no files.
///
/// `exclude` names a subtree of `source` that is not mirrored; copy mode uses it
/// when the output folder lives inside the package being migrated. Returns the
/// number of directories created or already present.
pub fn clone_structure(
    source: &Utf8Path,
    dest: &Utf8Path,
    exclude: Option<&Utf8Path>,
) -> Result<usize> {
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest))?;

    let mut count = 0;
    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match exclude {
            Some(excluded) => entry.path() != excluded.as_std_path(),
            None => true,
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", source))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let path = Utf8PathBuf::try_from(entry.into_path())
            .with_context(|| format!("Non UTF-8 folder name under {}", source))?;
        let relative = path
            .strip_prefix(source)
            .with_context(|| format!("{} is not under {}", path, source))?;
        let target = dest.join(relative);

        fs::create_dir_all(&target).with_context(|| format!("Failed to create {}", target))?;
        count += 1;
    }

    tracing::debug!("Mirrored {} folders from {} to {}", count, source, dest);
    Ok(count)
}
