use std::path::Path;

use crate::error::{CreateError, Result};

/// Entries that may already sit in a directory we scaffold into.
pub const ALLOWED_ENTRIES: [&str; 6] = [
    ".DS_Store",
    "Thumbs.db",
    ".git",
    ".gitignore",
    "README.md",
    "LICENSE",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Created,
    Reused,
}

/// Makes sure `path` is a directory the template may be copied into.
///
/// A missing directory is created (one level only). An existing one is
/// reused as long as every entry in it is in [`ALLOWED_ENTRIES`].
///
/// # Errors
///
/// - [`CreateError::DirectoryCreate`] if the directory can not be created
/// - [`CreateError::NotADirectory`] if `path` is something else
/// - [`CreateError::UnsafeDirectory`] listing the entries that are not allowed
pub fn prepare_target(path: &Path) -> Result<Target> {
    if !path.exists() {
        std::fs::create_dir(path).map_err(|source| CreateError::DirectoryCreate {
            path: path.to_path_buf(),
            source,
        })?;

        return Ok(Target::Created);
    }

    if !path.is_dir() {
        return Err(CreateError::NotADirectory(path.to_path_buf()));
    }

    let conflicts = conflicting_entries(path)?;
    if !conflicts.is_empty() {
        return Err(CreateError::UnsafeDirectory {
            path: path.to_path_buf(),
            conflicts,
        });
    }

    Ok(Target::Reused)
}

fn conflicting_entries(path: &Path) -> Result<Vec<String>> {
    let read_err = |source| CreateError::DirectoryRead {
        path: path.to_path_buf(),
        source,
    };

    let mut conflicts = Vec::new();
    for entry in path.read_dir().map_err(read_err)? {
        let name = entry
            .map_err(read_err)?
            .file_name()
            .to_string_lossy()
            .into_owned();

        if !ALLOWED_ENTRIES.contains(&name.as_str()) {
            conflicts.push(name);
        }
    }

    conflicts.sort();
    Ok(conflicts)
}
