use super::config::PlacementConfig;
use super::error::EngineError;
use super::placement::place_fragment;
use super::progress::{Progress, ProgressReporter};
use crate::core::forcefield::angle::AnglePotentialSet;
use crate::core::forcefield::motif::{SiteContext, angle_potentials};
use crate::core::forcefield::scoring::{EnergyError, repulsive_energy};
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::atom::Atom;
use crate::core::models::core_molecule::CoreMolecule;
use crate::core::models::fragment::Fragment;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use tracing::{debug, info, instrument};

/// A core with fragments placed on its attachment sites.
///
/// Two atom orderings are used throughout:
///
/// - the *working* order, returned by [`coordinates`](Self::coordinates): every core
///   atom followed by every atom of each fragment, dummy atoms included;
/// - the *assembled* order, returned by [`to_molecule`](Self::to_molecule): the same
///   sequence with all dummy atoms removed.
///
/// Index bookkeeping ([`fragment_origin_idxs`](Self::fragment_origin_idxs),
/// [`fragments_atom_idxs`](Self::fragments_atom_idxs)) and angle potentials refer to
/// the assembled order.
#[derive(Debug, Clone)]
pub struct CombinedMolecule {
    core: CoreMolecule,
    /// One fragment per attachment site, in site order. Public so that fragments can
    /// be swapped or moved after construction; call
    /// [`gen_fragment_idxs`](Self::gen_fragment_idxs) after changing the list.
    pub fragments: Vec<Fragment>,
    config: PlacementConfig,
    fragment_origin_idxs: Vec<usize>,
    fragments_atom_idxs: Vec<Vec<usize>>,
    angle_potentials: AnglePotentialSet,
}

impl CombinedMolecule {
    /// Places `fragments` on `core` with the default configuration.
    pub fn new(core: CoreMolecule, fragments: Vec<Fragment>) -> Result<Self, EngineError> {
        Self::with_config(
            core,
            fragments,
            &PlacementConfig::default(),
            &ProgressReporter::new(),
        )
    }

    /// Assigns fragments to sites and places each of them in site order.
    ///
    /// With fewer fragments than sites the list is cycled; with no fragments the core
    /// is left bare.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if `config` fails validation,
    /// [`EngineError::Cardinality`] if there are more fragments than sites, and
    /// [`EngineError::Placement`] if a site or fragment bond has zero length.
    #[instrument(skip_all, name = "combined_molecule", fields(sites = core.n_sites(), fragments = fragments.len()))]
    pub fn with_config(
        core: CoreMolecule,
        fragments: Vec<Fragment>,
        config: &PlacementConfig,
        reporter: &ProgressReporter,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let fragments = assign_fragments(core.n_sites(), fragments)?;

        let mut molecule = Self {
            core,
            fragments,
            config: config.clone(),
            fragment_origin_idxs: Vec::new(),
            fragments_atom_idxs: Vec::new(),
            angle_potentials: AnglePotentialSet::new(),
        };
        molecule.place_all(reporter)?;
        molecule.gen_fragment_idxs();

        info!(
            n_atoms = molecule.n_atoms(),
            n_fragments = molecule.fragments.len(),
            "Combined molecule assembled."
        );
        Ok(molecule)
    }

    fn place_all(&mut self, reporter: &ProgressReporter) -> Result<(), EngineError> {
        if self.fragments.is_empty() {
            return Ok(());
        }

        reporter.report(Progress::PhaseStart {
            name: "Fragment Placement",
        });
        reporter.report(Progress::TaskStart {
            total: self.fragments.len() as u64,
        });

        let mut environment = self.core.real_positions();
        for (site_idx, (fragment, site)) in self
            .fragments
            .iter_mut()
            .zip(self.core.sites())
            .enumerate()
        {
            let scan = place_fragment(
                fragment,
                self.core.atoms(),
                site,
                &environment,
                &self.config,
            )
            .map_err(|source| EngineError::Placement {
                site: site_idx,
                fragment: fragment.name().to_string(),
                source,
            })?;

            debug!(
                site = site_idx,
                fragment = fragment.name(),
                angle = scan.angle_degrees,
                energy = scan.energy,
                "Fragment placed."
            );
            environment.extend(fragment.real_positions());
            reporter.report(Progress::TaskIncrement);
        }

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        Ok(())
    }

    /// Recomputes the assembled-order indices of every fragment from the current
    /// fragment list.
    pub fn gen_fragment_idxs(&mut self) {
        self.fragment_origin_idxs.clear();
        self.fragments_atom_idxs.clear();

        let mut offset = self.core.n_real_atoms();
        for fragment in &self.fragments {
            let n = fragment.n_real_atoms();
            self.fragment_origin_idxs.push(offset);
            self.fragments_atom_idxs.push((offset..offset + n).collect());
            offset += n;
        }
    }

    /// Replaces the angle potentials with those implied by each fragment's motif and
    /// returns how many were generated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cardinality`] if the fragment list has been extended past
    /// the number of sites.
    pub fn gen_angle_potentials(&mut self) -> Result<usize, EngineError> {
        let n_sites = self.core.n_sites();
        if self.fragments.len() > n_sites {
            return Err(EngineError::Cardinality {
                fragments: self.fragments.len(),
                sites: n_sites,
            });
        }
        self.gen_fragment_idxs();
        self.angle_potentials.clear();

        for ((fragment, site), &origin) in self
            .fragments
            .iter()
            .zip(self.core.sites())
            .zip(&self.fragment_origin_idxs)
        {
            let Some(core_neighbor) = self.core.assembled_index(site.neighbor_idx) else {
                continue;
            };
            let context = SiteContext {
                core_neighbor,
                fragment_origin: origin,
            };
            self.angle_potentials.extend(angle_potentials(
                fragment,
                &context,
                self.config.angle_force_constant,
            ));
        }

        debug!(
            count = self.angle_potentials.len(),
            "Angle potentials generated."
        );
        Ok(self.angle_potentials.len())
    }

    fn working_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.core
            .atoms()
            .iter()
            .chain(self.fragments.iter().flat_map(|f| f.atoms().iter()))
    }

    /// Positions in working order (dummy atoms included).
    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.working_atoms().map(|atom| atom.position).collect()
    }

    /// The assembled, dummy-free structure at current coordinates.
    pub fn to_molecule(&self) -> Molecule {
        Molecule::new(
            self.working_atoms()
                .filter(|atom| !atom.is_dummy())
                .cloned()
                .collect(),
        )
    }

    /// Number of atoms in the assembled structure.
    pub fn n_atoms(&self) -> usize {
        self.core.n_real_atoms() + self.fragments.iter().map(Fragment::n_real_atoms).sum::<usize>()
    }

    fn n_working_atoms(&self) -> usize {
        self.core.n_atoms() + self.fragments.iter().map(Fragment::n_atoms).sum::<usize>()
    }

    /// Repulsion over all real atoms at current coordinates.
    pub fn repulsive_energy(&self) -> f64 {
        let points: Vec<Point3<f64>> = self
            .working_atoms()
            .filter(|atom| !atom.is_dummy())
            .map(|atom| atom.position)
            .collect();
        repulsive_energy(&points)
    }

    /// Repulsion plus angle potentials for the given coordinates.
    ///
    /// `coords` may be in assembled order or in working order; dummy positions of the
    /// latter are ignored.
    pub fn total_energy(&self, coords: &[Point3<f64>]) -> Result<f64, EnergyError> {
        Ok(self.energy_breakdown(coords)?.total())
    }

    /// Repulsion and angle terms for `coords`, kept separate.
    pub fn energy_breakdown(&self, coords: &[Point3<f64>]) -> Result<EnergyTerm, EnergyError> {
        let assembled = self.assembled_coordinates(coords)?;
        Ok(EnergyTerm::new(
            repulsive_energy(&assembled),
            self.angle_potentials.value(&assembled)?,
        ))
    }

    fn assembled_coordinates(&self, coords: &[Point3<f64>]) -> Result<Vec<Point3<f64>>, EnergyError> {
        let assembled = self.n_atoms();
        let working = self.n_working_atoms();

        if coords.len() == assembled {
            Ok(coords.to_vec())
        } else if coords.len() == working {
            Ok(self
                .working_atoms()
                .zip(coords)
                .filter(|(atom, _)| !atom.is_dummy())
                .map(|(_, point)| *point)
                .collect())
        } else {
            Err(EnergyError::CoordinateCount {
                found: coords.len(),
                assembled,
                working,
            })
        }
    }

    pub fn core(&self) -> &CoreMolecule {
        &self.core
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Assembled index of each fragment's first atom.
    pub fn fragment_origin_idxs(&self) -> &[usize] {
        &self.fragment_origin_idxs
    }

    /// Assembled indices of each fragment's atoms.
    pub fn fragments_atom_idxs(&self) -> &[Vec<usize>] {
        &self.fragments_atom_idxs
    }

    pub fn angle_potentials(&self) -> &AnglePotentialSet {
        &self.angle_potentials
    }
}

fn assign_fragments(n_sites: usize, fragments: Vec<Fragment>) -> Result<Vec<Fragment>, EngineError> {
    let n_fragments = fragments.len();
    if n_fragments > n_sites {
        return Err(EngineError::Cardinality {
            fragments: n_fragments,
            sites: n_sites,
        });
    }
    if n_fragments == 0 || n_fragments == n_sites {
        return Ok(fragments);
    }

    debug!(
        n_fragments,
        n_sites, "Fewer fragments than sites, cycling fragments."
    );
    Ok(fragments.iter().cycle().take(n_sites).cloned().collect())
}
