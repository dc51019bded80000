//! # Core Models Module
//!
//! Data structures for the rigid structures handled by molfunc.
//!
//! ## Key Components
//!
//! - [`atom`] - Element symbol plus Cartesian position; `R` marks a dummy atom
//! - [`molecule`] - Plain ordered atom list exchanged with file readers and writers
//! - [`site`] - Attachment sites: a dummy atom and the real atom it is bonded to
//! - [`fragment`] - A rigid structure with exactly one attachment site
//! - [`core_molecule`] - The scaffold carrying zero or more attachment sites
//!
//! Bonds are never stored. The only bond the engine needs, the one between a dummy
//! atom and its neighbor, is perceived from distances when a structure is built.
//!
//! ```ignore
//! use molfunc::core::models::{atom::Atom, core_molecule::CoreMolecule};
//!
//! let core = CoreMolecule::new(vec![
//!     Atom::from_xyz("C", 0.0, 0.0, 0.0),
//!     Atom::from_xyz("R", 1.1, 0.0, 0.0),
//! ])?;
//! assert_eq!(core.n_sites(), 1);
//! ```

pub mod atom;
pub mod core_molecule;
pub mod fragment;
pub mod molecule;
pub mod site;
