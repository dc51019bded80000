use thiserror::Error;

use super::config::ConfigError;
use super::placement::PlacementError;
use crate::core::forcefield::scoring::EnergyError;
use crate::core::fragments::library::LibraryError;
use crate::core::models::site::SiteError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Core has {sites} attachment site(s) but {fragments} fragment(s) were supplied")]
    Cardinality { fragments: usize, sites: usize },

    #[error("Invalid placement configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid core structure: {source}")]
    Site {
        #[from]
        source: SiteError,
    },

    #[error("Failed to place fragment '{fragment}' on site {site}: {source}")]
    Placement {
        site: usize,
        fragment: String,
        #[source]
        source: PlacementError,
    },

    #[error("Energy evaluation failed: {source}")]
    Energy {
        #[from]
        source: EnergyError,
    },

    #[error("Fragment library error: {source}")]
    Library {
        #[from]
        source: LibraryError,
    },
}
