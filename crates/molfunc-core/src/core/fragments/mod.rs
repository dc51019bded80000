//! Fragment libraries.
//!
//! A library file is a TOML document with one table per fragment:
//!
//! ```toml
//! [OH]
//! aliases = ["hydroxyl", "hydroxy"]
//! atoms = [
//!     { symbol = "O", position = [0.0, 0.0, 0.0] },
//!     { symbol = "R", position = [-1.43, 0.0, 0.0] },
//!     { symbol = "H", position = [0.32, 0.0, 0.91] },
//! ]
//! ```
//!
//! The built-in library is compiled into the crate; user files are merged on top.

pub mod library;
pub mod record;
