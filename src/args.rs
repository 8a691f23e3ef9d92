use std::path::PathBuf;

pub use clap::Parser;
use semver::Version;

use crate::{engines::Runtime, finalize::Installer, template::TemplateSource};

/// Create a new React component package
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Name of (or path to) the directory to create the project in
    pub project: PathBuf,

    /// Copy this template directory instead of the bundled one
    #[clap(long, env = "CREATE_APP_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Package installer to run inside the new project
    #[clap(long, env = "CREATE_APP_INSTALLER", default_value = "npm")]
    pub installer: String,

    /// Arguments passed to the installer
    #[clap(
        long = "installer-arg",
        default_value = "install",
        allow_hyphen_values = true
    )]
    pub installer_args: Vec<String>,

    /// Node executable whose version is checked against `engines.node`
    #[clap(long, env = "CREATE_APP_NODE", default_value = "node")]
    pub node: String,

    /// Assume this Node version instead of asking the executable
    #[clap(long, env = "CREATE_APP_RUNTIME_VERSION", value_parser = parse_version)]
    pub runtime_version: Option<Version>,
}

fn parse_version(s: &str) -> Result<Version, semver::Error> {
    crate::engines::parse_runtime_version(s)
}

impl Args {
    #[must_use]
    pub fn template_source(&self) -> TemplateSource {
        self.template
            .clone()
            .map_or(TemplateSource::Bundled, TemplateSource::Directory)
    }

    #[must_use]
    pub fn installer(&self) -> Installer {
        Installer {
            program: self.installer.clone(),
            args: self.installer_args.clone(),
        }
    }

    #[must_use]
    pub fn runtime(&self) -> Runtime {
        match &self.runtime_version {
            Some(version) => Runtime::Fixed(version.clone()),
            None => Runtime::Probe {
                program: self.node.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["create-app", "my-app"]).unwrap();

        assert_eq!(args.project, PathBuf::from("my-app"));
        assert_eq!(args.template_source(), TemplateSource::Bundled);
        assert_eq!(args.installer(), Installer::default());
        assert!(matches!(args.runtime(), Runtime::Probe { program } if program == "node"));
    }

    #[test]
    fn installer_args_replace_default() {
        let args = Args::try_parse_from([
            "create-app",
            "my-app",
            "--installer",
            "sh",
            "--installer-arg",
            "-c",
            "--installer-arg",
            "exit 2",
            "--runtime-version",
            "v20.1.0",
        ])
        .unwrap();

        assert_eq!(args.installer().command_line(), "sh -c exit 2");
        assert!(matches!(args.runtime(), Runtime::Fixed(v) if v == Version::new(20, 1, 0)));
    }

    #[test]
    fn project_is_required() {
        assert!(Args::try_parse_from(["create-app"]).is_err());
    }
}
