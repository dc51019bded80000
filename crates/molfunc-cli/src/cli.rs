use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molfunc - attach molecular fragments to the dummy atoms (R) of a core structure.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for the rotation scan.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a functionalized structure from a core and a list of fragments.
    Build(BuildArgs),
    /// List the fragments available in the built-in and any extra libraries.
    Fragments(FragmentsArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    // --- Core Arguments ---
    /// Path to the core structure in XYZ format, with dummy atoms named 'R'.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub core: PathBuf,

    /// Fragment to attach, by name or alias. Repeat for several sites; fewer
    /// fragments than sites are cycled over the remaining sites.
    #[arg(short, long = "fragment", value_name = "NAME")]
    pub fragments: Vec<String>,

    /// Path for the output XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra fragment library in TOML format. Can be used multiple times; later
    /// libraries override same-named fragments.
    #[arg(short, long = "library", value_name = "PATH")]
    pub libraries: Vec<PathBuf>,

    // --- Placement Overrides ---
    /// Override the rotation scan step in degrees.
    #[arg(short = 'a', long, value_name = "DEGREES")]
    pub angle_step: Option<f64>,

    /// Place fragment roots at covalent bond length instead of on the dummy atom.
    #[arg(long)]
    pub covalent_bonds: bool,

    /// Add motif angle potentials to the reported total energy.
    #[arg(long)]
    pub angle_potentials: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S placement.angle-step=10
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `fragments` subcommand.
#[derive(Args, Debug)]
pub struct FragmentsArgs {
    /// Extra fragment library in TOML format to include in the listing.
    #[arg(short, long = "library", value_name = "PATH")]
    pub libraries: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_parses_repeated_fragments_and_flags() {
        let cli = Cli::parse_from([
            "molfunc",
            "-vv",
            "build",
            "-c",
            "core.xyz",
            "-f",
            "Me",
            "-f",
            "OH",
            "-o",
            "out.xyz",
            "--angle-step",
            "10",
            "--covalent-bonds",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.fragments, ["Me", "OH"]);
        assert_eq!(args.angle_step, Some(10.0));
        assert!(args.covalent_bonds);
        assert!(!args.angle_potentials);
        assert!(args.config.is_none());
    }

    #[test]
    fn build_requires_core_and_output() {
        assert!(Cli::try_parse_from(["molfunc", "build", "-f", "Me"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["molfunc", "-q", "-v", "fragments"]).is_err());
    }
}
