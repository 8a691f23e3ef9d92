use std::path::{Path, PathBuf};

use derive_builder::Builder;
use path_absolutize::Absolutize;

use crate::{
    engines::{check_engines, Runtime},
    error::{CreateError, Result},
    finalize::{patch_manifest, Installer},
    guard::{prepare_target, Target},
    info,
    name::check_name,
    template::TemplateSource,
    trace, warn,
};

/// One scaffolding run.
#[derive(Builder, Debug)]
#[builder(setter(into))]
pub struct Scaffold {
    /// Directory name or path given by the user
    project: PathBuf,
    /// Directory relative paths resolve against, and where the invoking
    /// package lives
    working_dir: PathBuf,
    #[builder(default)]
    template: TemplateSource,
    #[builder(default)]
    installer: Installer,
    #[builder(default)]
    runtime: Runtime,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub name: String,
    pub root: PathBuf,
    pub target: Target,
    pub files: Vec<PathBuf>,
}

/// The resolved directory a project goes into and the name derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub name: String,
    pub root: PathBuf,
}

impl TargetDescriptor {
    /// Resolves `project` against `working_dir` and takes its last segment
    /// as the project name.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::InvalidTarget`] when the resolved path has no
    /// final segment or it is not valid UTF-8.
    pub fn resolve(project: &Path, working_dir: &Path) -> Result<Self> {
        let root = project
            .absolutize_from(working_dir)
            .map_err(|_| CreateError::InvalidTarget(project.to_path_buf()))?
            .into_owned();

        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CreateError::InvalidTarget(project.to_path_buf()))?
            .to_owned();

        Ok(Self { name, root })
    }
}

impl Scaffold {
    /// Create a new [`Scaffold`] builder
    #[must_use]
    pub fn builder() -> ScaffoldBuilder {
        ScaffoldBuilder::default()
    }

    /// Runs every stage in order, stopping at the first failure.
    ///
    /// Files already copied when a later stage fails are left on disk.
    ///
    /// # Errors
    ///
    /// Returns the [`CreateError`] of the first stage that failed.
    pub fn run(&self) -> Result<Created> {
        let TargetDescriptor { name, root } =
            TargetDescriptor::resolve(&self.project, &self.working_dir)?;
        trace!("Resolved {} to {}", self.project.display(), root.display());

        check_name(&name, &self.working_dir)?;

        let target = prepare_target(&root)?;
        if target == Target::Reused {
            warn!("Directory {} already exists, the template is copied over it", root.display());
        }

        self.check_runtime()?;

        info!("Creating a new React app in {}.", root.display());

        let files = self.template.materialize(&root)?;
        info!("Files copied!");
        trace!("Materialized {} files", files.len());

        patch_manifest(&root, &name)?;

        info!("Installing packages. This might take a couple minutes.");
        info!("Running `{}`", self.installer.command_line());
        println!();

        self.installer.run(&root)?;

        Ok(Created {
            name,
            root,
            target,
            files,
        })
    }

    /// Gates on the template's manifest. A target that passed the guard has
    /// no `package.json` of its own, so this is the one about to land there.
    fn check_runtime(&self) -> Result<()> {
        match self.template.manifest()? {
            Some(manifest) => check_engines(&manifest, &self.runtime),
            None => Ok(()),
        }
    }
}
