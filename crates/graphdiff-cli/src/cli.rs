use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "graphdiff",
    about = "graphdiff: structural comparison of JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented change tree
    #[default]
    Text,
    /// One line per most specific change
    Paths,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a working document against a base document
    Diff(DiffArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// The new (working) JSON document
    pub working: PathBuf,
    /// The old (base) JSON document
    pub base: PathBuf,
    /// TOML file with identity declarations and exclusions
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Include untouched nodes
    #[arg(long)]
    pub all: bool,
    /// Only show the subtree at this path, e.g. /members[3]/name
    #[arg(long)]
    pub path: Option<String>,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
