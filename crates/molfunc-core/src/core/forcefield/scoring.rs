use super::potentials::inverse_quartic;
use itertools::Itertools;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnergyError {
    #[error(
        "Expected {assembled} (dummy-free) or {working} (with dummies) coordinates, got {found}"
    )]
    CoordinateCount {
        found: usize,
        assembled: usize,
        working: usize,
    },
    #[error("Atom index {index} is out of range for {n_atoms} coordinates")]
    AtomIndexOutOfRange { index: usize, n_atoms: usize },
}

/// Sum of the repulsive pair term over all unique pairs in `points`.
pub fn repulsive_energy(points: &[Point3<f64>]) -> f64 {
    points
        .iter()
        .tuple_combinations()
        .map(|(a, b)| inverse_quartic(nalgebra::distance(a, b)))
        .sum()
}

/// Repulsion between every `query` point and every `environment` point.
///
/// Pairs within `query` are not counted; a rigid body rotating in place has a
/// constant internal term.
pub fn interaction_repulsion(query: &[Point3<f64>], environment: &[Point3<f64>]) -> f64 {
    query
        .iter()
        .cartesian_product(environment.iter())
        .map(|(a, b)| inverse_quartic(nalgebra::distance(a, b)))
        .sum()
}
