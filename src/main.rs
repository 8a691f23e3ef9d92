use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use create_app::{
    args::{Args, Parser},
    error, info, log, trace, CreateError, Scaffold,
};

fn app(args: &Args) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to get current dir")?;
    trace!("Working directory: {}", working_dir.display());

    let scaffold = Scaffold::builder()
        .project(args.project.clone())
        .working_dir(working_dir)
        .template(args.template_source())
        .installer(args.installer())
        .runtime(args.runtime())
        .build()
        .map_err(|e| anyhow!("{e}"))?;

    let created = scaffold.run()?;
    info!("Component {} created successfully", created.name);

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match app(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            if let Some(err) = e.downcast_ref::<CreateError>() {
                log::report(err);
            }
            ExitCode::FAILURE
        }
    }
}
