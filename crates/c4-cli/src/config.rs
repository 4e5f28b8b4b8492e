use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};

/// Options controlling how paths are walked and how ids are printed.
///
/// Loaded from an optional TOML file; command-line flags are applied on top,
/// and a flag given on the command line always wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentifyConfig {
    pub recursive: bool,
    pub absolute: bool,
    pub follow_links: bool,
    /// Directory levels below a root to descend into; 0 means unlimited.
    pub depth: usize,
    pub metadata: bool,
    pub verbose: bool,
    pub path_first: bool,
    pub format: OutputFormat,
}

impl IdentifyConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the effective config for an invocation.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_cli(cli))
    }

    /// Overlay command-line flags.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        self.recursive |= cli.recursive;
        self.absolute |= cli.absolute;
        self.follow_links |= cli.links;
        self.metadata |= cli.metadata;
        self.verbose |= cli.verbose;
        self.path_first |= cli.path_first;
        if let Some(depth) = cli.depth {
            self.depth = depth;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        self
    }
}
