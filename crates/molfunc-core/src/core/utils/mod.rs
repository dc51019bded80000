//! Small numeric helpers shared by the models, the forcefield and the placement engine.
//!
//! - [`geometry`] - Rigid-body rotations, alignment of vectors, bond angles
//! - [`elements`] - Per-element constants (covalent radii)

pub mod elements;
pub mod geometry;
