use crate::error::{EngineError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Check that `root` exists and is a directory, returning its canonical form.
///
/// # Errors
///
/// Returns `EngineError::InvalidPath` if the root is missing, is not a
/// directory, or cannot be canonicalized.
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| EngineError::InvalidPath {
        path: root.to_path_buf(),
        reason,
    };

    let meta = std::fs::metadata(root).map_err(|e| invalid(e.to_string()))?;
    if !meta.is_dir() {
        return Err(invalid("not a directory".into()));
    }
    root.canonicalize().map_err(|e| invalid(e.to_string()))
}

/// Serial recursive walk yielding every regular file under `root`.
///
/// Hidden files and ignore files are not honored: the whole tree is
/// visited. Directory symlinks are not descended into; a symlink whose
/// target is a regular file is yielded under its own path. An unreadable
/// directory shows up as an `Err` item and the walk carries on with its
/// siblings.
///
/// # Errors
///
/// Fails up front if the root does not pass [`validate_root`].
pub fn walk_files(root: &Path) -> Result<impl Iterator<Item = Result<PathBuf>> + use<>> {
    let root = validate_root(root)?;

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    Ok(walker.filter_map(|entry| match entry {
        Ok(entry) => {
            let is_file = entry.file_type().is_some_and(|ft| {
                ft.is_file()
                    || (ft.is_symlink()
                        && std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file()))
            });
            is_file.then(|| Ok(entry.into_path()))
        }
        Err(e) => Some(Err(EngineError::from(e))),
    }))
}
