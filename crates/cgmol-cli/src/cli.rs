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
    author = "cgmol contributors",
    version,
    about = "cgmol CLI - Reduce a protein structure to a coarse-grained model and derive the contacts and constraint graph needed to simulate it.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the coarse-grained topology of a PDB file and export it as JSON.
    Build(BuildArgs),
    /// Print a summary of the coarse-grained model and its topology.
    Inspect(InspectArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the JSON scene export.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Also write the retained CA/CG atoms as a PDB file.
    #[arg(long, value_name = "PATH")]
    pub coarse_pdb: Option<PathBuf>,

    #[command(flatten)]
    pub topology: TopologyArgs,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub topology: TopologyArgs,
}

/// Options shared by every command that builds a topology.
#[derive(Args, Debug, Clone, Default)]
pub struct TopologyArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the element radius table with a TOML file.
    #[arg(long, value_name = "PATH")]
    pub element_table: Option<PathBuf>,

    /// Override the multiplier on the squared radius sum in the contact test.
    #[arg(long, value_name = "FLOAT")]
    pub contact_scale: Option<f64>,

    /// Override the distance below which proximity constraints are drawn.
    #[arg(long, value_name = "FLOAT")]
    pub proximity_cutoff: Option<f64>,

    /// Search contacts with a k-d tree instead of scanning all pairs.
    #[arg(long)]
    pub kd_tree: bool,

    /// Link consecutive residues even when their chain identifiers differ.
    #[arg(long)]
    pub ignore_chains: bool,

    /// Skip malformed ATOM records instead of failing.
    #[arg(long)]
    pub skip_bad_records: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S constraints.proximity-cutoff=6.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
