//! # Engine Module
//!
//! The stateful layer that turns a core and a list of fragments into a combined
//! structure.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Rotation grid, bond length mode, angle force constant
//! - **Placement** ([`placement`]) - Alignment of one fragment onto one site and the
//!   rotation scan about the attachment bond
//! - **Combined Structure** ([`combined`]) - Site assignment, sequential placement,
//!   index bookkeeping and energy queries
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! Fragments are always placed one after another in site order, each one scored
//! against the core and every fragment placed before it. Only the rotation scan of a
//! single fragment runs in parallel (with the `parallel` feature).

pub mod combined;
pub mod config;
pub mod error;
pub mod placement;
pub mod progress;
