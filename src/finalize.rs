use std::path::Path;

use subprocess::{Exec, ExitStatus};

use crate::{
    error::{CreateError, Result},
    manifest::{Manifest, MANIFEST_FILE},
    trace,
};

/// Renames the copied manifest at `root` to `name` and writes it back.
///
/// # Errors
///
/// Returns a manifest error if `<root>/package.json` can not be read, parsed
/// or written.
pub fn patch_manifest(root: &Path, name: &str) -> Result<Manifest> {
    let path = root.join(MANIFEST_FILE);
    let mut manifest = Manifest::load(&path)?;

    trace!(
        "Renaming package {} to {name}",
        manifest.name.as_deref().unwrap_or("<unnamed>")
    );
    manifest.set_name(name);
    manifest.save(&path)?;

    Ok(manifest)
}

/// The package installer run inside the new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installer {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            program: "npm".into(),
            args: vec!["install".into()],
        }
    }
}

impl Installer {
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the installer with `root` as its working directory and waits for
    /// it. Standard streams are shared with this process.
    ///
    /// # Errors
    ///
    /// - [`CreateError::InstallSpawn`] if the installer can not be started
    /// - [`CreateError::Install`] if it exits unsuccessfully
    pub fn run(&self, root: &Path) -> Result<()> {
        trace!("Running `{}` in {}", self.command_line(), root.display());

        let status = Exec::cmd(&self.program)
            .args(self.args.as_slice())
            .cwd(root)
            .join()
            .map_err(|source| CreateError::InstallSpawn {
                command: self.command_line(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CreateError::Install {
                command: self.command_line(),
                status: describe(status),
            })
        }
    }
}

fn describe(status: ExitStatus) -> String {
    match status {
        ExitStatus::Exited(code) => format!("exit code {code}"),
        ExitStatus::Signaled(signal) => format!("killed by signal {signal}"),
        ExitStatus::Other(code) => format!("status {code}"),
        ExitStatus::Undetermined => "unknown status".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_is_renamed_in_place() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name":"template","version":"0.1.0","dependencies":{"react":"^18.2.0"}}"#,
        )
        .unwrap();

        patch_manifest(dir.path(), "my-app").unwrap();

        let written = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let manifest = Manifest::parse(&written).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("my-app"));
        assert_eq!(manifest.dependency_names(), ["react"]);
        assert!(written.starts_with("{\n  \"name\": \"my-app\",\n"));
    }

    #[test]
    fn missing_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            patch_manifest(dir.path(), "my-app"),
            Err(CreateError::ManifestRead { .. })
        ));
    }

    #[test]
    fn command_line_joins_args() {
        assert_eq!(Installer::default().command_line(), "npm install");
    }

    #[cfg(unix)]
    #[test]
    fn installer_runs_in_root() {
        let dir = tempfile::tempdir().unwrap();
        let installer = Installer {
            program: "sh".into(),
            args: vec!["-c".into(), "touch installed".into()],
        };

        installer.run(dir.path()).unwrap();
        assert!(dir.path().join("installed").exists());
    }

    #[cfg(unix)]
    #[test]
    fn installer_failure_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let installer = Installer {
            program: "sh".into(),
            args: vec!["-c".into(), "exit 2".into()],
        };

        match installer.run(dir.path()) {
            Err(CreateError::Install { command, status }) => {
                assert_eq!(command, "sh -c exit 2");
                assert_eq!(status, "exit code 2");
            }
            other => panic!("expected install error, got {other:?}"),
        }
    }

    #[test]
    fn missing_installer_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let installer = Installer {
            program: "definitely-not-an-installer".into(),
            args: vec![],
        };

        assert!(matches!(
            installer.run(dir.path()),
            Err(CreateError::InstallSpawn { .. })
        ));
    }
}
