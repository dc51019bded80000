use super::potentials::{CLASH_SENTINEL, harmonic_angle};
use super::scoring::EnergyError;
use crate::core::utils::geometry::bond_angle;
use nalgebra::Point3;
use std::ops::Index;

/// A harmonic penalty on the angle `i-j-k`, with `j` the vertex.
///
/// Indices refer to the assembled (dummy-free) molecule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnglePotential {
    pub atom_idxs: [usize; 3],
    /// Target angle in radians.
    pub ideal_angle: f64,
    pub force_constant: f64,
}

impl AnglePotential {
    pub fn new(atom_idxs: [usize; 3], ideal_angle_degrees: f64, force_constant: f64) -> Self {
        Self {
            atom_idxs,
            ideal_angle: ideal_angle_degrees.to_radians(),
            force_constant,
        }
    }

    pub fn value(&self, coords: &[Point3<f64>]) -> Result<f64, EnergyError> {
        let [i, j, k] = self.atom_idxs;
        let point = |idx: usize| {
            coords.get(idx).ok_or(EnergyError::AtomIndexOutOfRange {
                index: idx,
                n_atoms: coords.len(),
            })
        };
        let (a, vertex, c) = (point(i)?, point(j)?, point(k)?);

        Ok(match bond_angle(a, vertex, c) {
            Some(theta) => harmonic_angle(theta, self.ideal_angle, self.force_constant),
            None => CLASH_SENTINEL,
        })
    }
}

/// An ordered collection of angle potentials, empty until generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnglePotentialSet {
    potentials: Vec<AnglePotential>,
}

impl AnglePotentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, potential: AnglePotential) {
        self.potentials.push(potential);
    }

    pub fn clear(&mut self) {
        self.potentials.clear();
    }

    pub fn len(&self) -> usize {
        self.potentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potentials.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnglePotential> {
        self.potentials.iter()
    }

    /// Sum of all potentials at `coords`. An empty set contributes zero.
    pub fn value(&self, coords: &[Point3<f64>]) -> Result<f64, EnergyError> {
        self.potentials.iter().map(|p| p.value(coords)).sum()
    }
}

impl Index<usize> for AnglePotentialSet {
    type Output = AnglePotential;

    fn index(&self, index: usize) -> &Self::Output {
        &self.potentials[index]
    }
}

impl Extend<AnglePotential> for AnglePotentialSet {
    fn extend<T: IntoIterator<Item = AnglePotential>>(&mut self, iter: T) {
        self.potentials.extend(iter);
    }
}

impl<'a> IntoIterator for &'a AnglePotentialSet {
    type Item = &'a AnglePotential;
    type IntoIter = std::slice::Iter<'a, AnglePotential>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
