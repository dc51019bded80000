use super::angle::AnglePotential;
use crate::core::models::fragment::Fragment;
use phf::{Map, phf_map};
use std::fmt;

/// Chemical groups with a known preferred angle at the root atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motif {
    Hydroxyl,
    Thiol,
    Methoxy,
    Methylthio,
}

/// Lowercase fragment tags and the motif each one denotes.
#[rustfmt::skip]
static MOTIF_ALIASES: Map<&'static str, Motif> = phf_map! {
    "hydroxyl" => Motif::Hydroxyl, "hydroxy" => Motif::Hydroxyl, "oh" => Motif::Hydroxyl, "alcohol" => Motif::Hydroxyl,
    "thiol" => Motif::Thiol, "sh" => Motif::Thiol, "sulfanyl" => Motif::Thiol, "mercapto" => Motif::Thiol,
    "methoxy" => Motif::Methoxy, "ome" => Motif::Methoxy,
    "methylthio" => Motif::Methylthio, "sme" => Motif::Methylthio, "methylsulfanyl" => Motif::Methylthio,
};

impl Motif {
    /// Case-insensitive lookup of a fragment tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        MOTIF_ALIASES
            .get(tag.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Ideal `neighbor-root-substituent` angle in degrees.
    pub fn ideal_angle_degrees(self) -> f64 {
        match self {
            Motif::Hydroxyl => 108.5,
            Motif::Thiol => 96.5,
            Motif::Methoxy => 111.7,
            Motif::Methylthio => 99.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Motif::Hydroxyl => "hydroxyl",
            Motif::Thiol => "thiol",
            Motif::Methoxy => "methoxy",
            Motif::Methylthio => "methylthio",
        }
    }
}

impl fmt::Display for Motif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a placed fragment sits in the assembled molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteContext {
    /// Assembled index of the core atom the fragment is bonded to.
    pub core_neighbor: usize,
    /// Assembled index of the fragment's first atom.
    pub fragment_origin: usize,
}

/// Angle potentials implied by the fragment's motif.
///
/// Every motif constrains the angle between the core neighbor, the fragment root
/// and the real fragment atom nearest the root. Untagged fragments, and fragments
/// whose root has no other real atom, yield nothing.
pub fn angle_potentials(
    fragment: &Fragment,
    context: &SiteContext,
    force_constant: f64,
) -> Vec<AnglePotential> {
    let Some(motif) = fragment.motif() else {
        return Vec::new();
    };

    let global = |local_idx: usize| {
        fragment
            .assembled_offset(local_idx)
            .map(|offset| context.fragment_origin + offset)
    };

    let triple = global(fragment.root_idx()).zip(fragment.nearest_real_neighbor().and_then(global));

    match triple {
        Some((root, substituent)) => vec![AnglePotential::new(
            [context.core_neighbor, root, substituent],
            motif.ideal_angle_degrees(),
            force_constant,
        )],
        None => Vec::new(),
    }
}
