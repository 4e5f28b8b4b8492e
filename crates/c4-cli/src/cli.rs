use std::path::PathBuf;

use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "c4",
    about = "Generate C4 IDs for files and data",
    long_about = "Generate C4 IDs for files and data.\n\nWith no FILES and a non-terminal stdin, the ID of stdin is printed.",
    version,
    disable_version_flag = true
)]
pub struct Cli {
    /// Recursively identify all files
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Output absolute paths
    #[arg(short, long)]
    pub absolute: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub links: bool,

    /// Directory depth limit (0 = unlimited)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Include metadata
    #[arg(short, long)]
    pub metadata: bool,

    /// Include filenames in output
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Show path before ID in output
    #[arg(short, long)]
    pub path_first: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Read default options from a TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    pub version: (),

    /// Files or directories to identify
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
