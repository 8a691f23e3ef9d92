use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = CreateError> = std::result::Result<T, E>;

/// Every way a scaffolding run can stop.
#[derive(Error, Debug)]
pub enum CreateError {
    #[error("can't use '{name}' as the app name because a dependency with the same name exists")]
    NameCollision { name: String, reserved: Vec<String> },

    #[error("can't derive a project name from {}", .0.display())]
    InvalidTarget(PathBuf),

    #[error("failed to create directory {}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read directory {}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path {} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("the directory `{}` contains file(s) that could conflict. Aborting", path.display())]
    UnsafeDirectory {
        path: PathBuf,
        conflicts: Vec<String>,
    },

    #[error("failed to read manifest {}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write manifest {}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid engines.node range '{range}'")]
    InvalidRange {
        range: String,
        #[source]
        source: semver::Error,
    },

    #[error("failed to determine the version of `{program}`: {reason}")]
    RuntimeProbe { program: String, reason: String },

    #[error(
        "you are currently running Node v{actual} but this template requires {required}. \
         Please use a supported version of Node"
    )]
    RuntimeVersion {
        required: String,
        actual: semver::Version,
    },

    #[error("failed to copy template file {}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start `{command}`")]
    InstallSpawn {
        command: String,
        #[source]
        source: subprocess::PopenError,
    },

    #[error("`{command}` failed ({status})")]
    Install { command: String, status: String },
}
