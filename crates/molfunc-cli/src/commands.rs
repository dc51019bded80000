pub mod build;
pub mod fragments;

use crate::error::Result;
use molfunc::core::fragments::library::FragmentLibrary;
use std::path::PathBuf;
use tracing::{debug, info};

/// The built-in library with each extra library merged on top, in order.
pub fn load_library(extra: &[PathBuf]) -> Result<FragmentLibrary> {
    let mut library = FragmentLibrary::builtin()?;
    debug!(count = library.len(), "Loaded built-in fragment library.");

    for path in extra {
        let user = FragmentLibrary::load(path)?;
        info!(path = %path.display(), count = user.len(), "Merging fragment library.");
        library.merge(user)?;
    }
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    const ACETYLENE_LIBRARY: &str = r#"
[ethynyl]
aliases = ["CCH"]
atoms = [
    { symbol = "C", position = [0.0, 0.0, 0.0] },
    { symbol = "R", position = [-1.06, 0.0, 0.0] },
    { symbol = "C", position = [1.20, 0.0, 0.0] },
    { symbol = "H", position = [2.26, 0.0, 0.0] },
]
"#;

    #[test]
    fn builtin_only_when_no_extra_paths() {
        let library = load_library(&[]).unwrap();
        assert_eq!(library.len(), FragmentLibrary::builtin().unwrap().len());
    }

    #[test]
    fn extra_library_fragments_become_available() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("extra.toml");
        fs::write(&path, ACETYLENE_LIBRARY).unwrap();

        let library = load_library(&[path]).unwrap();
        assert!(library.contains("ethynyl"));
        assert!(library.contains("cch"));
        assert!(library.contains("Me"));
    }

    #[test]
    fn missing_library_file_is_reported() {
        let result = load_library(&[PathBuf::from("/definitely/not/here.toml")]);
        assert!(matches!(result, Err(CliError::Library(_))));
    }
}
