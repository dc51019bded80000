use crate::core::forcefield::term::EnergyTerm;
use crate::core::fragments::library::FragmentLibrary;
use crate::core::models::core_molecule::CoreMolecule;
use crate::core::models::fragment::Fragment;
use crate::core::models::molecule::Molecule;
use crate::engine::combined::CombinedMolecule;
use crate::engine::config::PlacementConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// Everything needed to build one functionalized structure.
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    /// The core structure, dummy atoms included.
    pub core: Molecule,
    /// Fragment names or aliases, assigned to sites in order.
    pub fragment_names: Vec<String>,
    pub library: &'a FragmentLibrary,
    pub config: PlacementConfig,
}

#[derive(Debug, Clone)]
pub struct BuildResult {
    pub combined: CombinedMolecule,
    /// The assembled structure, titled with the fragments used.
    pub molecule: Molecule,
    pub energy: EnergyTerm,
}

#[instrument(skip_all, name = "build_workflow")]
pub fn run(request: BuildRequest, reporter: &ProgressReporter) -> Result<BuildResult, EngineError> {
    let BuildRequest {
        core,
        fragment_names,
        library,
        config,
    } = request;

    // === Phase 1: Resolve inputs ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let title = core.title.clone();
    let core = CoreMolecule::try_from(core)?;
    let fragments = resolve_fragments(&fragment_names, library)?;
    info!(
        sites = core.n_sites(),
        fragments = fragments.len(),
        "Inputs resolved."
    );
    if fragments.is_empty() && core.n_sites() > 0 {
        warn!(
            sites = core.n_sites(),
            "No fragments given; attachment sites are left empty."
        );
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Placement ===
    let mut combined = CombinedMolecule::with_config(core, fragments, &config, reporter)?;

    // === Phase 3: Scoring ===
    reporter.report(Progress::PhaseStart { name: "Scoring" });
    if config.generate_angle_potentials {
        let count = combined.gen_angle_potentials()?;
        reporter.message(format!("Generated {count} angle potential(s)"));
    }

    let molecule = combined
        .to_molecule()
        .with_title(assembled_title(&title, &fragment_names));
    let energy = combined.energy_breakdown(&molecule.coordinates())?;
    reporter.report(Progress::PhaseFinish);

    info!(
        n_atoms = molecule.n_atoms(),
        repulsion = energy.repulsion,
        angle = energy.angle,
        "Build complete."
    );

    Ok(BuildResult {
        combined,
        molecule,
        energy,
    })
}

fn resolve_fragments(
    names: &[String],
    library: &FragmentLibrary,
) -> Result<Vec<Fragment>, EngineError> {
    names
        .iter()
        .map(|name| library.fragment(name).map_err(EngineError::from))
        .collect()
}

fn assembled_title(core_title: &str, fragment_names: &[String]) -> String {
    match (core_title.trim(), fragment_names.is_empty()) {
        (core, true) => core.to_string(),
        ("", false) => format!("molfunc: {}", fragment_names.join(", ")),
        (core, false) => format!("{core} + {}", fragment_names.join(", ")),
    }
}
