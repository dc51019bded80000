use super::atom::Atom;
use crate::core::utils::geometry::rotate_about;
use nalgebra::{Point3, Rotation3, Vector3};

/// An ordered, rigid collection of atoms.
///
/// This is the plain structure exchanged with file readers and writers. Atom order
/// is significant and is never changed by any operation on the molecule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Free-text title (the comment line of an XYZ file).
    pub title: String,
    pub atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self {
            title: String::new(),
            atoms,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Distance between atoms `i` and `j`, or `None` if either index is out of range.
    pub fn distance(&self, i: usize, j: usize) -> Option<f64> {
        Some(self.atoms.get(i)?.distance_to(self.atoms.get(j)?))
    }

    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|atom| atom.position).collect()
    }

    /// Indices of all dummy atoms, in order of appearance.
    pub fn dummy_indices(&self) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.is_dummy())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn translate(&mut self, vector: &Vector3<f64>) {
        for atom in &mut self.atoms {
            atom.translate_by(vector);
        }
    }

    pub fn rotate_about(&mut self, rotation: &Rotation3<f64>, origin: &Point3<f64>) {
        for atom in &mut self.atoms {
            atom.position = rotate_about(&atom.position, rotation, origin);
        }
    }
}

impl From<Vec<Atom>> for Molecule {
    fn from(atoms: Vec<Atom>) -> Self {
        Self::new(atoms)
    }
}
