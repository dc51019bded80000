use super::config::{BondLengthMode, ConfigError, PlacementConfig};
use crate::core::forcefield::scoring::interaction_repulsion;
use crate::core::models::atom::Atom;
use crate::core::models::fragment::Fragment;
use crate::core::models::site::AttachmentSite;
use crate::core::utils::elements::covalent_bond_length;
use crate::core::utils::geometry::{
    GEOMETRY_EPSILON, rotate_about, rotation_from_axis_angle, rotation_to_align,
};
use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::{trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Zero-length {part} bond vector, cannot define an attachment direction")]
    DegenerateBond { part: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Outcome of the rotation search for one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationScan {
    /// Winning rotation about the attachment bond, in degrees.
    pub angle_degrees: f64,
    /// Fragment-environment repulsion at that angle.
    pub energy: f64,
    pub samples: usize,
}

/// Places `fragment` on `site` of the core described by `core_atoms`.
///
/// The fragment is aligned so that its attachment bond points back along the site
/// bond, translated onto the site, then rotated about the bond to the grid angle
/// with the least repulsion against `environment`. The fragment is modified in place.
pub fn place_fragment(
    fragment: &mut Fragment,
    core_atoms: &[Atom],
    site: &AttachmentSite,
    environment: &[Point3<f64>],
    config: &PlacementConfig,
) -> Result<RotationScan, PlacementError> {
    align_fragment(fragment, core_atoms, site, config)?;

    let axis = site.bond_vector;
    let scan = scan_rotations(fragment, &axis, environment, config)?;

    let root = fragment.root_position();
    fragment.rotate(&rotation_from_axis_angle(&axis, scan.angle_degrees), &root);

    trace!(
        fragment = fragment.name(),
        angle = scan.angle_degrees,
        energy = scan.energy,
        "Fragment rotation selected"
    );
    Ok(scan)
}

/// Rotates the fragment so its bond vector is anti-parallel to the site's, then
/// moves its root atom to the attachment position.
pub fn align_fragment(
    fragment: &mut Fragment,
    core_atoms: &[Atom],
    site: &AttachmentSite,
    config: &PlacementConfig,
) -> Result<(), PlacementError> {
    if site.bond_vector.norm() < GEOMETRY_EPSILON {
        return Err(PlacementError::DegenerateBond { part: "site" });
    }
    let rotation = rotation_to_align(&fragment.bond_vector(), &(-site.bond_vector))
        .ok_or(PlacementError::DegenerateBond { part: "fragment" })?;

    let root = fragment.root_position();
    fragment.rotate(&rotation, &root);

    let target = attachment_position(fragment, core_atoms, site, config.bond_length);
    fragment.set_position(&target);
    Ok(())
}

fn attachment_position(
    fragment: &Fragment,
    core_atoms: &[Atom],
    site: &AttachmentSite,
    mode: BondLengthMode,
) -> Point3<f64> {
    let dummy = core_atoms[site.dummy_idx].position;
    match mode {
        BondLengthMode::DummyPosition => dummy,
        BondLengthMode::CovalentRadii => {
            let neighbor = &core_atoms[site.neighbor_idx];
            let root = &fragment.atoms()[fragment.root_idx()];
            match covalent_bond_length(&neighbor.symbol, &root.symbol) {
                Some(length) => neighbor.position + site.bond_vector.normalize() * length,
                None => {
                    warn!(
                        core_atom = %neighbor.symbol,
                        fragment_atom = %root.symbol,
                        "No covalent radius known, placing fragment on the dummy atom"
                    );
                    dummy
                }
            }
        }
    }
}

/// Scores every grid rotation of the fragment's real atoms about `axis` (through the
/// root) against `environment`, returning the lowest.
///
/// Energies may be computed in parallel; the minimum is always selected in angle
/// order, so the result does not depend on the `parallel` feature.
pub fn scan_rotations(
    fragment: &Fragment,
    axis: &Vector3<f64>,
    environment: &[Point3<f64>],
    config: &PlacementConfig,
) -> Result<RotationScan, ConfigError> {
    let angles = config.rotation_angles()?;
    let origin = fragment.root_position();
    let positions = fragment.real_positions();

    #[cfg(not(feature = "parallel"))]
    let iterator = angles.iter();

    #[cfg(feature = "parallel")]
    let iterator = angles.par_iter();

    let energies: Vec<f64> = iterator
        .map(|&angle| {
            let rotation = rotation_from_axis_angle(axis, angle);
            let rotated: Vec<Point3<f64>> = positions
                .iter()
                .map(|p| rotate_about(p, &rotation, &origin))
                .collect();
            interaction_repulsion(&rotated, environment)
        })
        .collect();

    let best = select_minimum(&energies).unwrap_or(0);
    Ok(RotationScan {
        angle_degrees: angles.get(best).copied().unwrap_or(0.0),
        energy: energies.get(best).copied().unwrap_or(0.0),
        samples: angles.len(),
    })
}

/// Index of the smallest value. Ties keep the earliest index and NaN is never chosen.
pub fn select_minimum(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, best_value)| value < best_value) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::core_molecule::CoreMolecule;

    fn methyl_core() -> CoreMolecule {
        CoreMolecule::new(vec![
            Atom::from_xyz("C", 1.57959, -1.40470, 0.00000),
            Atom::from_xyz("R", 2.68899, -1.40471, 0.00000),
            Atom::from_xyz("H", 1.20979, -0.63118, -0.70404),
            Atom::from_xyz("H", 1.20978, -1.18174, 1.02191),
            Atom::from_xyz("H", 1.20978, -2.40119, -0.31787),
        ])
        .unwrap()
    }

    fn bromide() -> Fragment {
        Fragment::new(
            vec![
                Atom::from_xyz("Br", 0.0, 0.0, 0.0),
                Atom::from_xyz("R", 0.0, 1.0, 0.0),
            ],
            vec![],
        )
        .unwrap()
    }

    fn hydroxyl() -> Fragment {
        Fragment::new(
            vec![
                Atom::from_xyz("O", 0.0, 0.0, 0.0),
                Atom::from_xyz("R", -1.43, 0.0, 0.0),
                Atom::from_xyz("H", 0.32, 0.0, 0.91),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn align_fragment_puts_root_on_dummy_and_bond_anti_parallel() {
        let core = methyl_core();
        let site = core.sites()[0];
        let mut fragment = hydroxyl();
        align_fragment(&mut fragment, core.atoms(), &site, &PlacementConfig::default()).unwrap();

        assert!((fragment.root_position() - core.atoms()[1].position).norm() < 1e-9);
        let cos = fragment.bond_vector().normalize().dot(&site.bond_vector.normalize());
        assert!((cos + 1.0).abs() < 1e-9);
    }

    #[test]
    fn align_fragment_with_covalent_radii_uses_sum_of_radii() {
        let core = methyl_core();
        let site = core.sites()[0];
        let config = PlacementConfig {
            bond_length: BondLengthMode::CovalentRadii,
            ..PlacementConfig::default()
        };
        let mut fragment = bromide();
        align_fragment(&mut fragment, core.atoms(), &site, &config).unwrap();

        let dist = nalgebra::distance(&fragment.root_position(), &core.atoms()[0].position);
        assert!((dist - 1.96).abs() < 1e-9);
    }

    #[test]
    fn align_fragment_with_unknown_radius_falls_back_to_dummy() {
        let core = methyl_core();
        let site = core.sites()[0];
        let config = PlacementConfig {
            bond_length: BondLengthMode::CovalentRadii,
            ..PlacementConfig::default()
        };
        let mut fragment = Fragment::new(
            vec![
                Atom::from_xyz("Xx", 0.0, 0.0, 0.0),
                Atom::from_xyz("R", 1.0, 0.0, 0.0),
            ],
            vec![],
        )
        .unwrap();
        align_fragment(&mut fragment, core.atoms(), &site, &config).unwrap();
        assert!((fragment.root_position() - core.atoms()[1].position).norm() < 1e-9);
    }

    #[test]
    fn align_fragment_rejects_degenerate_bonds() {
        let atoms = vec![
            Atom::from_xyz("C", 0.0, 0.0, 0.0),
            Atom::from_xyz("R", 0.0, 0.0, 0.0),
        ];
        let site = AttachmentSite::resolve(&atoms, 1).unwrap();
        let result = align_fragment(&mut bromide(), &atoms, &site, &PlacementConfig::default());
        assert_eq!(result, Err(PlacementError::DegenerateBond { part: "site" }));

        let core = methyl_core();
        let mut collapsed = Fragment::new(
            vec![
                Atom::from_xyz("Br", 0.0, 0.0, 0.0),
                Atom::from_xyz("R", 0.0, 0.0, 0.0),
            ],
            vec![],
        )
        .unwrap();
        let result = align_fragment(
            &mut collapsed,
            core.atoms(),
            &core.sites()[0],
            &PlacementConfig::default(),
        );
        assert_eq!(result, Err(PlacementError::DegenerateBond { part: "fragment" }));
    }

    #[test]
    fn place_fragment_keeps_geometry_finite_and_rigid() {
        let core = methyl_core();
        let site = core.sites()[0];
        let mut fragment = hydroxyl();
        let oh_before = fragment.atoms()[0].distance_to(&fragment.atoms()[2]);

        let scan = place_fragment(
            &mut fragment,
            core.atoms(),
            &site,
            &core.real_positions(),
            &PlacementConfig::default(),
        )
        .unwrap();

        assert_eq!(scan.samples, 72);
        assert!(scan.energy.is_finite() && scan.energy > 0.0);
        assert!(
            fragment
                .coordinates()
                .iter()
                .all(|p| p.coords.iter().all(|c| c.is_finite()))
        );
        let oh_after = fragment.atoms()[0].distance_to(&fragment.atoms()[2]);
        assert!((oh_before - oh_after).abs() < 1e-9);
    }

    #[test]
    fn scan_rotations_returns_the_grid_minimum() {
        let core = methyl_core();
        let site = core.sites()[0];
        let config = PlacementConfig::default();
        let mut fragment = hydroxyl();
        align_fragment(&mut fragment, core.atoms(), &site, &config).unwrap();

        let environment = core.real_positions();
        let scan =
            scan_rotations(&fragment, &site.bond_vector, &environment, &config).unwrap();

        for angle in config.rotation_angles().unwrap() {
            let rotation = rotation_from_axis_angle(&site.bond_vector, angle);
            let rotated: Vec<_> = fragment
                .real_positions()
                .iter()
                .map(|p| rotate_about(p, &rotation, &fragment.root_position()))
                .collect();
            assert!(interaction_repulsion(&rotated, &environment) >= scan.energy - 1e-12);
        }
    }

    #[test]
    fn scan_rotations_with_empty_environment_picks_zero() {
        let config = PlacementConfig::default();
        let scan = scan_rotations(&hydroxyl(), &Vector3::x(), &[], &config).unwrap();
        assert_eq!(scan.angle_degrees, 0.0);
        assert_eq!(scan.energy, 0.0);
    }

    #[test]
    fn place_fragment_rejects_a_zero_angle_step() {
        let core = methyl_core();
        let config = PlacementConfig {
            angle_step_degrees: 0.0,
            ..PlacementConfig::default()
        };
        let result = place_fragment(
            &mut hydroxyl(),
            core.atoms(),
            &core.sites()[0],
            &core.real_positions(),
            &config,
        );
        assert!(matches!(result, Err(PlacementError::Config(_))));
    }

    #[test]
    fn select_minimum_prefers_first_of_equal_values_and_skips_nan() {
        assert_eq!(select_minimum(&[3.0, 1.0, 1.0, 2.0]), Some(1));
        assert_eq!(select_minimum(&[f64::NAN, 5.0, 4.0]), Some(2));
        assert_eq!(select_minimum(&[f64::NAN]), None);
        assert_eq!(select_minimum(&[]), None);
    }
}
