//! Typed view over a `package.json`.
//!
//! Only the fields the scaffolder reads or writes are named. Everything else
//! rides along in [`Manifest::extra`] so a load/save cycle keeps it intact.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CreateError, Result};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Map<String, Value>>,

    #[serde(
        rename = "devDependencies",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dev_dependencies: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<Engines>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Engines {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::ManifestRead`] if the file can not be read and
    /// [`CreateError::ManifestParse`] if it is not a valid manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CreateError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents).map_err(|source| CreateError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Manifest::load`], but a missing file yields `None`.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.is_file() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn parse(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Names declared under `dependencies` and `devDependencies`, sorted and
    /// without duplicates.
    #[must_use]
    pub fn dependency_names(&self) -> Vec<String> {
        let mut names = [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .flatten()
            .flat_map(|table| table.keys().cloned())
            .collect::<Vec<_>>();

        names.sort();
        names.dedup();
        names
    }

    #[must_use]
    pub fn engine_node(&self) -> Option<&str> {
        self.engines.as_ref().and_then(|e| e.node.as_deref())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Renders the manifest with two space indentation and a trailing newline.
    pub fn to_pretty_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self).map(|mut s| {
            s.push('\n');
            s
        })
    }

    /// Overwrites the file at `path` with this manifest.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::ManifestWrite`] on any IO failure.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self
            .to_pretty_string()
            .map_err(|e| CreateError::ManifestWrite {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        std::fs::write(path, contents).map_err(|source| CreateError::ManifestWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
