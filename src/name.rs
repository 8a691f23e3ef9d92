use std::path::Path;

use crate::{
    error::{CreateError, Result},
    manifest::{Manifest, MANIFEST_FILE},
};

/// Rejects a project name that would shadow a dependency of the package the
/// tool is invoked from.
///
/// The invoking package is the `package.json` inside `working_dir`. Without
/// one there is nothing to collide with.
///
/// # Errors
///
/// Returns [`CreateError::NameCollision`] carrying every reserved name when
/// `name` matches one of them exactly.
pub fn check_name(name: &str, working_dir: &Path) -> Result<()> {
    let Some(manifest) = Manifest::load_optional(&working_dir.join(MANIFEST_FILE))? else {
        return Ok(());
    };

    check_name_against(name, &manifest)
}

pub fn check_name_against(name: &str, manifest: &Manifest) -> Result<()> {
    let reserved = manifest.dependency_names();

    if reserved.iter().any(|dep| dep == name) {
        return Err(CreateError::NameCollision {
            name: name.to_owned(),
            reserved,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoking_package(dir: &Path) {
        std::fs::write(
            dir.join(MANIFEST_FILE),
            r#"{
                "name": "host",
                "dependencies": { "chalk": "^5.0.0" },
                "devDependencies": { "react": "^18.0.0" }
            }"#,
        )
        .unwrap();
    }

    #[test]
    fn dependency_names_collide() {
        let dir = tempfile::tempdir().unwrap();
        invoking_package(dir.path());

        for name in ["chalk", "react"] {
            match check_name(name, dir.path()) {
                Err(CreateError::NameCollision { name: got, reserved }) => {
                    assert_eq!(got, name);
                    assert_eq!(reserved, ["chalk", "react"]);
                }
                other => panic!("expected collision for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        invoking_package(dir.path());

        assert!(check_name("React", dir.path()).is_ok());
        assert!(check_name("my-app", dir.path()).is_ok());
    }

    #[test]
    fn no_invoking_manifest_passes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_name("react", dir.path()).is_ok());
    }
}
