//! # Force Field Module
//!
//! Heuristic energy terms used to rank fragment geometries. None of these are
//! physical energies; they only separate plausible placements from clashing ones.
//!
//! ## Key Components
//!
//! - [`potentials`] - Pair and angle functional forms (`r^-4`, harmonic in the angle)
//! - [`scoring`] - Repulsion summed over point sets, and the coordinate-indexing errors
//! - [`angle`] - Angle potentials and the set owned by a combined molecule
//! - [`motif`] - Recognized fragment motifs and the angle rules they imply
//! - [`term`] - Repulsion/angle breakdown of a total energy
//!
//! Coincident atoms never produce NaN or infinity. The pair term and the angle term
//! both return [`potentials::CLASH_SENTINEL`] for degenerate geometry instead.

pub mod angle;
pub mod motif;
pub mod potentials;
pub mod scoring;
pub mod term;
