//! # Core Module
//!
//! The stateless building blocks of molfunc.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, molecules, attachment sites,
//!   fragments and cores
//! - **Energy Terms** ([`forcefield`]) - Repulsion, angle potentials and motif rules
//! - **Fragment Libraries** ([`fragments`]) - Built-in and user-supplied TOML libraries
//! - **File I/O** ([`io`]) - Reading and writing XYZ files
//! - **Utilities** ([`utils`]) - Geometry helpers and element data

pub mod forcefield;
pub mod fragments;
pub mod io;
pub mod models;
pub mod utils;
