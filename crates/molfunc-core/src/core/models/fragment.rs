use super::atom::Atom;
use super::site::{AttachmentSite, SiteError};
use crate::core::forcefield::motif::Motif;
use crate::core::utils::geometry::rotate_about;
use nalgebra::{Point3, Rotation3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FragmentError {
    #[error("Fragment '{name}' has no dummy atom")]
    NoDummy { name: String },

    #[error("Fragment '{name}' has {count} dummy atoms, expected exactly one")]
    MultipleDummies { name: String, count: usize },

    #[error("Fragment '{name}' has an invalid attachment site: {source}")]
    Site {
        name: String,
        #[source]
        source: SiteError,
    },
}

/// A small rigid structure with exactly one attachment site.
///
/// The atom bonded to the dummy atom is the *root*; during placement it takes the
/// position of a core dummy atom. A fragment is a value object: it is cloned when
/// assigned to several sites and moved in place while being placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    name: String,
    atoms: Vec<Atom>,
    tags: Vec<String>,
    dummy_idx: usize,
    root_idx: usize,
}

impl Fragment {
    /// Builds an anonymous fragment, validating that it has exactly one dummy atom
    /// bonded to a real atom.
    pub fn new(atoms: Vec<Atom>, tags: Vec<String>) -> Result<Self, FragmentError> {
        Self::with_name("", atoms, tags)
    }

    pub fn with_name(
        name: &str,
        atoms: Vec<Atom>,
        tags: Vec<String>,
    ) -> Result<Self, FragmentError> {
        let dummies: Vec<usize> = atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.is_dummy())
            .map(|(idx, _)| idx)
            .collect();

        let dummy_idx = match dummies.as_slice() {
            [] => {
                return Err(FragmentError::NoDummy {
                    name: name.to_string(),
                });
            }
            [idx] => *idx,
            _ => {
                return Err(FragmentError::MultipleDummies {
                    name: name.to_string(),
                    count: dummies.len(),
                });
            }
        };

        let site =
            AttachmentSite::resolve(&atoms, dummy_idx).map_err(|source| FragmentError::Site {
                name: name.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            atoms,
            tags,
            dummy_idx,
            root_idx: site.neighbor_idx,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Number of atoms the fragment contributes to an assembled molecule.
    pub fn n_real_atoms(&self) -> usize {
        self.atoms.len() - 1
    }

    pub fn dummy_idx(&self) -> usize {
        self.dummy_idx
    }

    pub fn root_idx(&self) -> usize {
        self.root_idx
    }

    pub fn root_position(&self) -> Point3<f64> {
        self.atoms[self.root_idx].position
    }

    pub fn dummy_position(&self) -> Point3<f64> {
        self.atoms[self.dummy_idx].position
    }

    /// `dummy - root`, pointing away from the fragment along the attachment bond.
    pub fn bond_vector(&self) -> Vector3<f64> {
        self.dummy_position() - self.root_position()
    }

    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|atom| atom.position).collect()
    }

    /// Positions of the non-dummy atoms, in fragment order.
    pub fn real_positions(&self) -> Vec<Point3<f64>> {
        self.real_atoms().map(|atom| atom.position).collect()
    }

    pub fn real_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|atom| !atom.is_dummy())
    }

    pub fn translate(&mut self, vector: &Vector3<f64>) {
        for atom in &mut self.atoms {
            atom.translate_by(vector);
        }
    }

    pub fn rotate(&mut self, rotation: &Rotation3<f64>, origin: &Point3<f64>) {
        for atom in &mut self.atoms {
            atom.position = rotate_about(&atom.position, rotation, origin);
        }
    }

    /// Translates the fragment rigidly so that its root atom sits at `position`.
    pub fn set_position(&mut self, position: &Point3<f64>) {
        let shift = position - self.root_position();
        self.translate(&shift);
    }

    /// The first tag that names a known motif, if any.
    pub fn motif(&self) -> Option<Motif> {
        self.tags.iter().find_map(|tag| Motif::from_tag(tag))
    }

    /// Maps a fragment-local atom index to its offset within the fragment's block of
    /// an assembled (dummy-free) molecule. Returns `None` for the dummy atom.
    pub fn assembled_offset(&self, local_idx: usize) -> Option<usize> {
        match local_idx {
            idx if idx == self.dummy_idx || idx >= self.atoms.len() => None,
            idx if idx > self.dummy_idx => Some(idx - 1),
            idx => Some(idx),
        }
    }

    /// The real atom closest to the root (excluding the root itself).
    pub fn nearest_real_neighbor(&self) -> Option<usize> {
        let root = &self.atoms[self.root_idx];
        self.atoms
            .iter()
            .enumerate()
            .filter(|(idx, atom)| *idx != self.root_idx && !atom.is_dummy())
            .map(|(idx, atom)| (idx, root.distance_to(atom)))
            .fold(None, |best: Option<(usize, f64)>, (idx, dist)| match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((idx, dist)),
            })
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydroxyl() -> Vec<Atom> {
        vec![
            Atom::from_xyz("O", 0.0, 0.0, 0.0),
            Atom::from_xyz("R", -1.0, 0.0, 0.0),
            Atom::from_xyz("H", 0.32, 0.91, 0.0),
        ]
    }

    #[test]
    fn new_identifies_dummy_and_root() {
        let frag = Fragment::with_name("OH", hydroxyl(), vec!["hydroxyl".into()]).unwrap();
        assert_eq!(frag.name(), "OH");
        assert_eq!(frag.dummy_idx(), 1);
        assert_eq!(frag.root_idx(), 0);
        assert_eq!(frag.n_atoms(), 3);
        assert_eq!(frag.n_real_atoms(), 2);
        assert_eq!(frag.bond_vector(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn new_rejects_fragment_without_dummy() {
        let atoms = vec![Atom::from_xyz("O", 0.0, 0.0, 0.0), Atom::from_xyz("H", 1.0, 0.0, 0.0)];
        assert!(matches!(
            Fragment::new(atoms, vec![]),
            Err(FragmentError::NoDummy { .. })
        ));
    }

    #[test]
    fn new_rejects_fragment_with_two_dummies() {
        let mut atoms = hydroxyl();
        atoms.push(Atom::from_xyz("R", 0.0, -1.0, 0.0));
        assert_eq!(
            Fragment::with_name("bad", atoms, vec![]),
            Err(FragmentError::MultipleDummies {
                name: "bad".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn new_rejects_isolated_dummy() {
        let atoms = vec![Atom::from_xyz("C", 0.0, 0.0, 0.0), Atom::from_xyz("R", 9.0, 0.0, 0.0)];
        assert!(matches!(
            Fragment::new(atoms, vec![]),
            Err(FragmentError::Site { .. })
        ));
    }

    #[test]
    fn set_position_moves_root_rigidly() {
        let mut frag = Fragment::new(hydroxyl(), vec![]).unwrap();
        let target = Point3::new(2.0, 3.0, -1.0);
        frag.set_position(&target);
        assert_eq!(frag.root_position(), target);
        assert!((frag.atoms()[2].distance_to(&frag.atoms()[0]) - 0.9646).abs() < 1e-3);
    }

    #[test]
    fn rotate_about_root_keeps_root_fixed() {
        let mut frag = Fragment::new(hydroxyl(), vec![]).unwrap();
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), 1.0);
        frag.rotate(&rotation, &frag.root_position());
        assert!((frag.root_position() - Point3::origin()).norm() < 1e-12);
        assert!((frag.bond_vector().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn motif_is_resolved_from_first_matching_tag() {
        let frag =
            Fragment::new(hydroxyl(), vec!["OH-group".into(), "Hydroxy".into()]).unwrap();
        assert_eq!(frag.motif(), Some(Motif::Hydroxyl));

        let untagged = Fragment::new(hydroxyl(), vec![]).unwrap();
        assert_eq!(untagged.motif(), None);
    }

    #[test]
    fn assembled_offset_skips_dummy() {
        let frag = Fragment::new(hydroxyl(), vec![]).unwrap();
        assert_eq!(frag.assembled_offset(0), Some(0));
        assert_eq!(frag.assembled_offset(1), None);
        assert_eq!(frag.assembled_offset(2), Some(1));
        assert_eq!(frag.assembled_offset(3), None);
    }

    #[test]
    fn nearest_real_neighbor_excludes_root_and_dummy() {
        let frag = Fragment::new(hydroxyl(), vec![]).unwrap();
        assert_eq!(frag.nearest_real_neighbor(), Some(2));

        let halide = Fragment::new(
            vec![Atom::from_xyz("Br", 0.0, 0.0, 0.0), Atom::from_xyz("R", -1.0, 0.0, 0.0)],
            vec![],
        )
        .unwrap();
        assert_eq!(halide.nearest_real_neighbor(), None);
    }
}
