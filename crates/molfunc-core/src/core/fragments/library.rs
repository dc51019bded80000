use super::record::FragmentData;
use crate::core::models::fragment::{Fragment, FragmentError};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

type RawFragmentFile = BTreeMap<String, FragmentData>;

const BUILTIN_FRAGMENTS: &str = include_str!("../../../data/fragments.toml");

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Fragment '{0}' not found in the library")]
    NotFound(String),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid fragment definition: {0}")]
    InvalidFragment(#[from] FragmentError),

    #[error("Name or alias '{name}' is already used by fragment '{existing}'")]
    DuplicateName { name: String, existing: String },
}

/// A named collection of fragments.
///
/// Fragments are looked up by exact name first, then case-insensitively by name or
/// alias. Each fragment carries its name and aliases as tags, which is how motif
/// rules recognize library fragments.
#[derive(Debug, Clone, Default)]
pub struct FragmentLibrary {
    fragments: BTreeMap<String, Fragment>,
    /// Lowercase name or alias -> canonical name.
    index: HashMap<String, String>,
}

impl FragmentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fragments shipped with the crate.
    pub fn builtin() -> Result<Self, LibraryError> {
        Self::parse(BUILTIN_FRAGMENTS, "<builtin>")
    }

    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path).map_err(|e| LibraryError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LibraryError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, LibraryError> {
        let raw: RawFragmentFile = toml::from_str(content).map_err(|e| LibraryError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let mut library = Self::new();
        for (name, data) in raw {
            let tags: Vec<String> = std::iter::once(name.clone())
                .chain(data.aliases.iter().cloned())
                .collect();
            let fragment = Fragment::with_name(&name, data.to_atoms(), tags)?;
            library.insert(fragment)?;
        }

        debug!(origin, count = library.len(), "Loaded fragment library");
        Ok(library)
    }

    /// Adds a fragment, registering its name and every tag as lookup keys.
    pub fn insert(&mut self, fragment: Fragment) -> Result<(), LibraryError> {
        let name = fragment.name().to_string();
        let keys: Vec<String> = std::iter::once(name.to_ascii_lowercase())
            .chain(fragment.tags().iter().map(|t| t.to_ascii_lowercase()))
            .collect();

        for key in &keys {
            if let Some(existing) = self.index.get(key) {
                if *existing != name {
                    return Err(LibraryError::DuplicateName {
                        name: key.clone(),
                        existing: existing.clone(),
                    });
                }
            }
        }
        if self.fragments.contains_key(&name) {
            return Err(LibraryError::DuplicateName {
                name: name.clone(),
                existing: name,
            });
        }

        for key in keys {
            self.index.insert(key, name.clone());
        }
        self.fragments.insert(name, fragment);
        Ok(())
    }

    /// Adds every fragment of `other`. Entries of `other` replace same-named entries.
    pub fn merge(&mut self, other: FragmentLibrary) -> Result<(), LibraryError> {
        for (name, fragment) in other.fragments {
            if self.fragments.remove(&name).is_some() {
                debug!(name = %name, "Overriding library fragment");
                self.index.retain(|_, target| *target != name);
            }
            self.insert(fragment)?;
        }
        Ok(())
    }

    /// A fresh copy of the named fragment, ready to be placed.
    pub fn fragment(&self, name: &str) -> Result<Fragment, LibraryError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name).or_else(|| {
            self.index
                .get(&name.to_ascii_lowercase())
                .and_then(|canonical| self.fragments.get(canonical))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical fragment names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.values()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
