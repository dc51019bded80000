use super::atom::Atom;
use super::molecule::Molecule;
use super::site::{AttachmentSite, SiteError};
use nalgebra::Point3;

/// The scaffold that fragments are attached to.
///
/// Every dummy atom defines one attachment site. Sites are resolved once at
/// construction and are ordered by the position of their dummy atom.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreMolecule {
    atoms: Vec<Atom>,
    sites: Vec<AttachmentSite>,
}

impl CoreMolecule {
    pub fn new(atoms: Vec<Atom>) -> Result<Self, SiteError> {
        let sites = AttachmentSite::resolve_all(&atoms)?;
        Ok(Self { atoms, sites })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn sites(&self) -> &[AttachmentSite] {
        &self.sites
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn n_real_atoms(&self) -> usize {
        self.atoms.len() - self.sites.len()
    }

    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|atom| atom.position).collect()
    }

    pub fn real_positions(&self) -> Vec<Point3<f64>> {
        self.real_atoms().map(|atom| atom.position).collect()
    }

    pub fn real_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|atom| !atom.is_dummy())
    }

    /// Index of core atom `idx` once all dummy atoms are removed, or `None` if the
    /// atom is itself a dummy.
    pub fn assembled_index(&self, idx: usize) -> Option<usize> {
        let atom = self.atoms.get(idx)?;
        if atom.is_dummy() {
            return None;
        }
        Some(idx - self.atoms[..idx].iter().filter(|a| a.is_dummy()).count())
    }
}

impl TryFrom<Molecule> for CoreMolecule {
    type Error = SiteError;

    fn try_from(molecule: Molecule) -> Result<Self, Self::Error> {
        Self::new(molecule.atoms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_site_core() -> Vec<Atom> {
        vec![
            Atom::from_xyz("C", 0.0, 0.0, 0.0),
            Atom::from_xyz("R", 1.1, 0.0, 0.0),
            Atom::from_xyz("R", -0.37, 1.04, 0.0),
            Atom::from_xyz("H", -0.37, -0.52, 0.9),
            Atom::from_xyz("H", -0.37, -0.52, -0.9),
        ]
    }

    #[test]
    fn new_resolves_sites_in_order() {
        let core = CoreMolecule::new(two_site_core()).unwrap();
        assert_eq!(core.n_atoms(), 5);
        assert_eq!(core.n_sites(), 2);
        assert_eq!(core.n_real_atoms(), 3);
        assert_eq!(core.sites()[0].dummy_idx, 1);
        assert_eq!(core.sites()[1].dummy_idx, 2);
    }

    #[test]
    fn core_without_dummies_has_no_sites() {
        let core = CoreMolecule::new(vec![Atom::from_xyz("He", 0.0, 0.0, 0.0)]).unwrap();
        assert_eq!(core.n_sites(), 0);
        assert_eq!(core.real_positions().len(), 1);
    }

    #[test]
    fn assembled_index_skips_preceding_dummies() {
        let core = CoreMolecule::new(two_site_core()).unwrap();
        assert_eq!(core.assembled_index(0), Some(0));
        assert_eq!(core.assembled_index(1), None);
        assert_eq!(core.assembled_index(3), Some(1));
        assert_eq!(core.assembled_index(4), Some(2));
        assert_eq!(core.assembled_index(5), None);
    }

    #[test]
    fn try_from_molecule_propagates_site_errors() {
        let molecule = Molecule::new(vec![
            Atom::from_xyz("C", 0.0, 0.0, 0.0),
            Atom::from_xyz("R", 20.0, 0.0, 0.0),
        ]);
        assert!(matches!(
            CoreMolecule::try_from(molecule),
            Err(SiteError::IsolatedDummy { index: 1, .. })
        ));
    }
}
