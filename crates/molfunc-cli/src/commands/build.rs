use crate::cli::BuildArgs;
use crate::commands::load_library;
use crate::config::PartialBuildConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molfunc::core::io::traits::MolecularFile;
use molfunc::core::io::xyz::XyzFile;
use molfunc::engine::progress::ProgressReporter;
use molfunc::workflows::build::{self, BuildRequest, BuildResult};
use tracing::{debug, info};

pub fn run(args: BuildArgs, show_progress: bool) -> Result<()> {
    info!("Starting build command.");

    let resolved = PartialBuildConfig::for_args(&args)?.merge_with_cli(&args)?;
    debug!(config = ?resolved.placement, "Resolved placement configuration.");

    let library = load_library(&resolved.libraries)?;

    info!(path = %args.core.display(), "Reading core structure.");
    let core = XyzFile::read_from_path(&args.core).map_err(|e| CliError::FileParsing {
        path: args.core.clone(),
        source: e.into(),
    })?;

    let handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let request = BuildRequest {
        core,
        fragment_names: args.fragments.clone(),
        library: &library,
        config: resolved.placement,
    };
    let result = build::run(request, &reporter)?;

    XyzFile::write_to_path(&result.molecule, &args.output).map_err(|e| CliError::FileParsing {
        path: args.output.clone(),
        source: e.into(),
    })?;
    info!(path = %args.output.display(), "Wrote assembled structure.");

    println!("{}", summary(&result, &args));
    Ok(())
}

fn summary(result: &BuildResult, args: &BuildArgs) -> String {
    format!(
        "Wrote {} atoms to {}\n  repulsion: {:.6}\n  angle:     {:.6}\n  total:     {:.6}",
        result.molecule.n_atoms(),
        args.output.display(),
        result.energy.repulsion,
        result.energy.angle,
        result.energy.total(),
    )
}
