//! # Workflows Module
//!
//! High-level entry points that tie the fragment library, the engine and the models
//! together.
//!
//! - **Build Workflow** ([`build`]) - Resolve fragment names, place them on a core,
//!   optionally add angle potentials, and score the assembled structure.

pub mod build;
