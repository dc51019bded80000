//! Provides input/output for molecular structure files.
//!
//! The [`traits::MolecularFile`] trait is the common interface; [`xyz::XyzFile`] is
//! the only format molfunc needs, since dummy atoms are plain `R` records.

pub mod traits;
pub mod xyz;
