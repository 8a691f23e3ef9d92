use std::path::{Path, PathBuf};

use fs_extra::file::CopyOptions;
use include_dir::{include_dir, Dir, DirEntry};
use walkdir::WalkDir;

use crate::{
    error::{CreateError, Result},
    manifest::{Manifest, MANIFEST_FILE},
    trace,
};

static BUNDLED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/template");

/// The tree copied into every new project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// The `template/` directory compiled into the binary
    #[default]
    Bundled,
    Directory(PathBuf),
}

impl TemplateSource {
    /// The template's own manifest, if it has one.
    pub fn manifest(&self) -> Result<Option<Manifest>> {
        match self {
            TemplateSource::Directory(root) => Manifest::load_optional(&root.join(MANIFEST_FILE)),
            TemplateSource::Bundled => {
                let Some(file) = BUNDLED.get_file(MANIFEST_FILE) else {
                    return Ok(None);
                };

                let path = PathBuf::from("<bundled>").join(MANIFEST_FILE);
                let contents = std::str::from_utf8(file.contents()).map_err(|e| {
                    CreateError::ManifestRead {
                        path: path.clone(),
                        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                    }
                })?;

                Manifest::parse(contents)
                    .map(Some)
                    .map_err(|source| CreateError::ManifestParse { path, source })
            }
        }
    }

    /// Copies the whole template into `target`, overwriting files that are
    /// already there. Returns the relative paths of the files written.
    ///
    /// Nothing is rolled back on failure; whatever was copied before the
    /// failing file stays in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::Copy`] naming the path that could not be read
    /// or written.
    pub fn materialize(&self, target: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        match self {
            TemplateSource::Bundled => extract(&BUNDLED, target, &mut files)?,
            TemplateSource::Directory(root) => copy_tree(root, target, &mut files)?,
        }

        files.sort();
        Ok(files)
    }
}

fn extract(dir: &Dir<'_>, target: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in dir.entries() {
        let dest = target.join(entry.path());

        match entry {
            DirEntry::Dir(sub) => {
                std::fs::create_dir_all(&dest).map_err(|source| CreateError::Copy {
                    path: dest.clone(),
                    source,
                })?;
                extract(sub, target, files)?;
            }
            DirEntry::File(file) => {
                trace!("Writing {}", dest.display());
                std::fs::write(&dest, file.contents())
                    .map_err(|source| CreateError::Copy { path: dest, source })?;
                files.push(file.path().to_path_buf());
            }
        }
    }

    Ok(())
}

fn copy_tree(root: &Path, target: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !root.is_dir() {
        return Err(CreateError::Copy {
            path: root.to_path_buf(),
            source: std::io::ErrorKind::NotFound.into(),
        });
    }

    let mut options = CopyOptions::new();
    options.overwrite = true;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| CreateError::Copy {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let dest = target.join(&relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(|source| CreateError::Copy {
                path: dest.clone(),
                source,
            })?;
        } else {
            trace!("Copying {} to {}", entry.path().display(), dest.display());
            fs_extra::file::copy(entry.path(), &dest, &options).map_err(|e| CreateError::Copy {
                path: entry.path().to_path_buf(),
                source: std::io::Error::other(e),
            })?;
            files.push(relative);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_template_has_a_manifest() {
        let manifest = TemplateSource::Bundled.manifest().unwrap().unwrap();
        assert!(manifest.name.is_some());
    }

    #[test]
    fn bundled_template_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let files = TemplateSource::Bundled.materialize(dir.path()).unwrap();

        assert!(files.contains(&PathBuf::from(MANIFEST_FILE)));
        for file in &files {
            let written = std::fs::read(dir.path().join(file)).unwrap();
            let bundled = BUNDLED.get_file(file).unwrap().contents();
            assert_eq!(written, bundled, "{} differs", file.display());
        }
    }

    #[test]
    fn directory_template_is_copied_byte_for_byte() {
        let template = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(template.path().join("src/components")).unwrap();
        std::fs::write(template.path().join("package.json"), r#"{"name":"t"}"#).unwrap();
        std::fs::write(
            template.path().join("src/components/Button.jsx"),
            b"\xde\xad\xbe\xef",
        )
        .unwrap();

        let target = tempfile::tempdir().unwrap();
        std::fs::write(target.path().join("README.md"), "old").unwrap();

        let files = TemplateSource::Directory(template.path().to_path_buf())
            .materialize(target.path())
            .unwrap();

        assert_eq!(
            files,
            [
                PathBuf::from("package.json"),
                PathBuf::from("src/components/Button.jsx")
            ]
        );
        assert_eq!(
            std::fs::read(target.path().join("src/components/Button.jsx")).unwrap(),
            b"\xde\xad\xbe\xef"
        );
        assert_eq!(std::fs::read_to_string(target.path().join("README.md")).unwrap(), "old");
    }

    #[test]
    fn existing_files_are_overlaid() {
        let template = tempfile::tempdir().unwrap();
        std::fs::write(template.path().join("README.md"), "new").unwrap();

        let target = tempfile::tempdir().unwrap();
        std::fs::write(target.path().join("README.md"), "old").unwrap();

        TemplateSource::Directory(template.path().to_path_buf())
            .materialize(target.path())
            .unwrap();

        assert_eq!(std::fs::read_to_string(target.path().join("README.md")).unwrap(), "new");
    }

    #[test]
    fn failed_copy_keeps_earlier_files() {
        let template = tempfile::tempdir().unwrap();
        std::fs::create_dir(template.path().join("src")).unwrap();
        std::fs::write(template.path().join("package.json"), r#"{"name":"t"}"#).unwrap();
        std::fs::write(template.path().join("src/index.js"), "export {};\n").unwrap();

        let target = tempfile::tempdir().unwrap();
        std::fs::write(target.path().join("src"), "in the way").unwrap();

        let result = TemplateSource::Directory(template.path().to_path_buf())
            .materialize(target.path());

        match result {
            Err(CreateError::Copy { path, .. }) => assert_eq!(path, target.path().join("src")),
            other => panic!("expected copy error, got {other:?}"),
        }
        assert_eq!(
            std::fs::read_to_string(target.path().join("package.json")).unwrap(),
            r#"{"name":"t"}"#
        );
        assert!(target.path().join("src").is_file());
    }

    #[test]
    fn missing_template_is_a_copy_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = TemplateSource::Directory(dir.path().join("nope"));

        assert!(matches!(
            source.materialize(dir.path()),
            Err(CreateError::Copy { .. })
        ));
    }
}
