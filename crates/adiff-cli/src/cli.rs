use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "adiff",
    about = "Insert/remove diffs of line lists and sectioned line lists",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with comparison and parsing options
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff two files line by line
    Diff(PairArgs),
    /// Diff two sectioned files: sections by name, then lines within each section
    Nested(PairArgs),
    /// Map a line number from one file to the other
    Translate(TranslateArgs),
}

#[derive(Args)]
pub struct PairArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("direction")
        .required(true)
        .args(["old_index", "new_index"]),
))]
pub struct TranslateArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Zero-based line index in the old file
    #[arg(long)]
    pub old_index: Option<usize>,
    /// Zero-based line index in the new file
    #[arg(long)]
    pub new_index: Option<usize>,
}
