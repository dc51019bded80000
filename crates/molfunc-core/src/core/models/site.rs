use super::atom::Atom;
use nalgebra::Vector3;
use thiserror::Error;

/// Largest dummy-neighbor separation still accepted as a bond, in Angstroms.
pub const MAX_BOND_LENGTH: f64 = 4.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SiteError {
    #[error("Atom {index} is not a dummy atom")]
    NotADummy { index: usize },

    #[error("Dummy atom {index} has no real atom within {max_distance} Å to bond to")]
    IsolatedDummy { index: usize, max_distance: f64 },
}

/// A dummy atom together with the real atom it is bonded to.
///
/// The neighbor is perceived geometrically as the nearest non-dummy atom. When two
/// candidates are equidistant the one with the lower index wins; a well-formed
/// (monovalent) dummy atom never hits that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentSite {
    /// Index of the dummy atom in its parent structure.
    pub dummy_idx: usize,
    /// Index of the real atom bonded to the dummy atom.
    pub neighbor_idx: usize,
    /// `dummy - neighbor`, pointing out of the structure along the bond.
    pub bond_vector: Vector3<f64>,
}

impl AttachmentSite {
    pub fn resolve(atoms: &[Atom], dummy_idx: usize) -> Result<Self, SiteError> {
        let dummy = atoms
            .get(dummy_idx)
            .filter(|atom| atom.is_dummy())
            .ok_or(SiteError::NotADummy { index: dummy_idx })?;

        let mut nearest: Option<(usize, f64)> = None;
        for (idx, atom) in atoms.iter().enumerate() {
            if atom.is_dummy() {
                continue;
            }
            let dist = dummy.distance_to(atom);
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((idx, dist));
            }
        }

        match nearest {
            Some((neighbor_idx, dist)) if dist <= MAX_BOND_LENGTH => Ok(Self {
                dummy_idx,
                neighbor_idx,
                bond_vector: dummy.position - atoms[neighbor_idx].position,
            }),
            _ => Err(SiteError::IsolatedDummy {
                index: dummy_idx,
                max_distance: MAX_BOND_LENGTH,
            }),
        }
    }

    /// Resolves every dummy atom in `atoms`, in order of appearance.
    pub fn resolve_all(atoms: &[Atom]) -> Result<Vec<Self>, SiteError> {
        atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.is_dummy())
            .map(|(idx, _)| Self::resolve(atoms, idx))
            .collect()
    }

    pub fn bond_length(&self) -> f64 {
        self.bond_vector.norm()
    }
}
