use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use molfunc::engine::config::{BondLengthMode, PlacementConfig, PlacementConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPlacementSection {
    #[serde(rename = "angle-step")]
    angle_step: Option<f64>,
    #[serde(rename = "bond-length")]
    bond_length: Option<String>,
    #[serde(rename = "angle-force-constant")]
    angle_force_constant: Option<f64>,
    #[serde(rename = "angle-potentials")]
    angle_potentials: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialLibrarySection {
    #[serde(default)]
    paths: Vec<PathBuf>,
}

/// The contents of a `--config` file. Every field is optional; anything left unset
/// falls back to the engine defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialBuildConfig {
    placement: Option<PartialPlacementSection>,
    library: Option<PartialLibrarySection>,
}

/// Settings resolved from the config file, `--set` overrides and CLI flags.
#[derive(Debug, Clone)]
pub struct ResolvedBuildConfig {
    pub placement: PlacementConfig,
    /// Extra fragment libraries, file entries first, then `--library` flags.
    pub libraries: Vec<PathBuf>,
}

impl PartialBuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut partial: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        // Library paths in a config file are relative to that file.
        if let (Some(library), Some(base)) = (partial.library.as_mut(), path.parent()) {
            for lib_path in library.paths.iter_mut() {
                if lib_path.is_relative() {
                    *lib_path = base.join(&*lib_path);
                }
            }
        }
        Ok(partial)
    }

    /// Loads `args.config` if given, otherwise starts from an empty config.
    pub fn for_args(args: &BuildArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Precedence, highest first: explicit CLI flags, `--set` values, the config
    /// file, engine defaults.
    pub fn merge_with_cli(mut self, args: &BuildArgs) -> Result<ResolvedBuildConfig> {
        self.apply_set_values(&args.set_values)?;

        let placement = self.placement.take().unwrap_or_default();
        let library = self.library.take().unwrap_or_default();

        let mut builder = PlacementConfigBuilder::new();

        if let Some(step) = args.angle_step.or(placement.angle_step) {
            builder = builder.angle_step_degrees(step);
        }

        if args.covalent_bonds {
            builder = builder.bond_length(BondLengthMode::CovalentRadii);
        } else if let Some(mode) = placement.bond_length.as_deref() {
            builder = builder.bond_length(mode.parse()?);
        }

        if let Some(k) = placement.angle_force_constant {
            builder = builder.angle_force_constant(k);
        }

        if args.angle_potentials {
            builder = builder.generate_angle_potentials(true);
        } else if let Some(enabled) = placement.angle_potentials {
            builder = builder.generate_angle_potentials(enabled);
        }

        let placement = builder.build()?;

        let mut libraries = library.paths;
        libraries.extend(args.libraries.iter().cloned());

        Ok(ResolvedBuildConfig {
            placement,
            libraries,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value_str = value_str.trim();

            let placement = self.placement.get_or_insert_with(Default::default);
            match key {
                "placement.angle-step" => {
                    placement.angle_step = Some(parse_value(key, value_str, "float")?);
                }
                "placement.bond-length" => {
                    placement.bond_length = Some(value_str.to_string());
                }
                "placement.angle-force-constant" => {
                    placement.angle_force_constant = Some(parse_value(key, value_str, "float")?);
                }
                "placement.angle-potentials" => {
                    placement.angle_potentials = Some(parse_value(key, value_str, "boolean")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use molfunc::engine::config::DEFAULT_ANGLE_STEP_DEGREES;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn build_args(extra: &[&str]) -> BuildArgs {
        let mut argv = vec!["molfunc", "build", "-c", "core.xyz", "-o", "out.xyz"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Build(args) => args,
            _ => panic!("expected build command"),
        }
    }

    fn resolve(args: &BuildArgs) -> Result<ResolvedBuildConfig> {
        PartialBuildConfig::for_args(args)?.merge_with_cli(args)
    }

    #[test]
    fn no_config_file_yields_engine_defaults() {
        let resolved = resolve(&build_args(&[])).unwrap();
        assert_eq!(resolved.placement, PlacementConfig::default());
        assert_eq!(
            resolved.placement.angle_step_degrees,
            DEFAULT_ANGLE_STEP_DEGREES
        );
        assert!(resolved.libraries.is_empty());
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempdir().unwrap();
        let config = write_config_file(
            &dir,
            "molfunc.toml",
            r#"
            [placement]
            angle-step = 10.0
            bond-length = "covalent"
            angle-force-constant = 2.5
            angle-potentials = true

            [library]
            paths = ["extra.toml"]
            "#,
        );
        let args = build_args(&["--config", config.to_str().unwrap()]);
        let resolved = resolve(&args).unwrap();

        assert_eq!(resolved.placement.angle_step_degrees, 10.0);
        assert_eq!(resolved.placement.bond_length, BondLengthMode::CovalentRadii);
        assert_eq!(resolved.placement.angle_force_constant, 2.5);
        assert!(resolved.placement.generate_angle_potentials);
        assert_eq!(resolved.libraries, vec![dir.path().join("extra.toml")]);
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let dir = tempdir().unwrap();
        let config = write_config_file(
            &dir,
            "molfunc.toml",
            "[placement]\nangle-step = 10.0\nangle-force-constant = 2.0\n",
        );
        let args = build_args(&[
            "--config",
            config.to_str().unwrap(),
            "-S",
            "placement.angle-step=20",
            "-S",
            "placement.angle-force-constant=3.0",
            "--angle-step",
            "30",
        ]);
        let resolved = resolve(&args).unwrap();

        assert_eq!(resolved.placement.angle_step_degrees, 30.0);
        assert_eq!(resolved.placement.angle_force_constant, 3.0);
    }

    #[test]
    fn cli_libraries_follow_file_libraries() {
        let dir = tempdir().unwrap();
        let config = write_config_file(
            &dir,
            "molfunc.toml",
            "[library]\npaths = [\"a.toml\"]\n",
        );
        let args = build_args(&["--config", config.to_str().unwrap(), "-l", "b.toml"]);
        let resolved = resolve(&args).unwrap();

        assert_eq!(
            resolved.libraries,
            vec![dir.path().join("a.toml"), PathBuf::from("b.toml")]
        );
    }

    #[test]
    fn unknown_file_key_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let config = write_config_file(&dir, "bad.toml", "[placement]\nangle-stepp = 5.0\n");
        let args = build_args(&["--config", config.to_str().unwrap()]);

        assert!(matches!(resolve(&args), Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        let missing_eq = build_args(&["-S", "placement.angle-step"]);
        assert!(matches!(resolve(&missing_eq), Err(CliError::Config(_))));

        let unknown_key = build_args(&["-S", "placement.temperature=300"]);
        assert!(matches!(resolve(&unknown_key), Err(CliError::Config(_))));

        let bad_float = build_args(&["-S", "placement.angle-step=fast"]);
        assert!(matches!(resolve(&bad_float), Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_bond_length_mode_is_a_config_error() {
        let args = build_args(&["-S", "placement.bond-length=ionic"]);
        assert!(matches!(resolve(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn non_positive_angle_step_is_rejected_by_the_builder() {
        let args = build_args(&["--angle-step", "0"]);
        assert!(matches!(resolve(&args), Err(CliError::Config(_))));
    }
}
