use nalgebra::{Point3, Vector3};

/// Element symbol reserved for dummy atoms that mark attachment points.
pub const DUMMY_SYMBOL: &str = "R";

/// A single atom: an element symbol and a Cartesian position in Angstroms.
///
/// Atoms carry no connectivity. Bonds relevant to fragment attachment are
/// perceived geometrically (see [`super::site::AttachmentSite`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "Br"), or [`DUMMY_SYMBOL`] for a dummy atom.
    pub symbol: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(symbol: &str, position: Point3<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
        }
    }

    pub fn from_xyz(symbol: &str, x: f64, y: f64, z: f64) -> Self {
        Self::new(symbol, Point3::new(x, y, z))
    }

    /// Whether this atom is a dummy (attachment point) rather than a real atom.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.symbol == DUMMY_SYMBOL
    }

    #[inline]
    pub fn translate_by(&mut self, vector: &Vector3<f64>) {
        self.position += vector;
    }

    #[inline]
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
