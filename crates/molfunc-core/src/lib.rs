//! # molfunc Core Library
//!
//! Builds functionalized molecules by attaching rigid fragments to the dummy atoms
//! (`R`) of a core structure, choosing each fragment's orientation to minimize a
//! simple repulsive clash score.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Fragment`,
//!   `CoreMolecule`), the heuristic energy terms, the fragment library and XYZ I/O.
//!
//! - **[`engine`]: The Logic Core.** Fragment alignment, the rotation scan, sequential
//!   placement and the `CombinedMolecule` with its index bookkeeping.
//!
//! - **[`workflows`]: The Public API.** One call from a core structure and a list of
//!   fragment names to an assembled, scored molecule.

pub mod core;
pub mod engine;
pub mod workflows;
