use crate::core::models::atom::Atom;
use serde::Deserialize;

/// One atom of a fragment as written in a library file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentAtomData {
    /// Element symbol, or `R` for the attachment point.
    pub symbol: String,
    /// Cartesian coordinates in Angstroms.
    pub position: [f64; 3],
}

/// A fragment entry of a library file, keyed by its name in the enclosing table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentData {
    /// Alternative names; matched case-insensitively and used as motif tags.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub atoms: Vec<FragmentAtomData>,
}

impl FragmentData {
    pub fn to_atoms(&self) -> Vec<Atom> {
        self.atoms
            .iter()
            .map(|data| {
                let [x, y, z] = data.position;
                Atom::from_xyz(&data.symbol, x, y, z)
            })
            .collect()
    }
}
