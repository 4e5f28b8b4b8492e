//! Rendering identified paths as text or JSON lines.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;

use c4_types::Identifier;

use crate::cli::OutputFormat;
use crate::config::IdentifyConfig;

/// Size and timestamps of an identified file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub created: Option<DateTime<Local>>,
}

impl FileMetadata {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::from),
            created: meta.created().ok().map(DateTime::from),
        })
    }
}

/// One line (or block) of output.
#[derive(Clone, Debug, Serialize)]
pub struct Record {
    pub id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub metadata: Option<FileMetadata>,
}

impl Record {
    /// A record for data read from stdin.
    pub fn stream(id: Identifier) -> Self {
        Self {
            id,
            path: None,
            metadata: None,
        }
    }

    pub fn file(id: Identifier, path: PathBuf, metadata: Option<FileMetadata>) -> Self {
        Self {
            id,
            path: Some(path),
            metadata,
        }
    }

    pub fn render(&self, config: &IdentifyConfig) -> anyhow::Result<String> {
        match config.format {
            OutputFormat::Text => Ok(self.render_text(config)),
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
        }
    }

    fn render_text(&self, config: &IdentifyConfig) -> String {
        let Some(path) = &self.path else {
            return self.id.to_string();
        };
        let path = path.display();

        if let Some(meta) = &self.metadata {
            let mut lines = if config.path_first {
                vec![path.to_string(), format!("ID: {}", self.id)]
            } else {
                vec![format!("ID: {}", self.id), format!("Path: {path}")]
            };
            lines.push(format!("Size: {} bytes", meta.size));
            lines.push(format!("Modified: {}", timestamp(meta.modified)));
            lines.push(format!("Created: {}", timestamp(meta.created)));
            return lines.join("\n");
        }

        match (config.verbose, config.path_first) {
            (false, _) => self.id.to_string(),
            (true, true) => format!("{path}: {}", self.id),
            (true, false) => format!("{}: {path}", self.id),
        }
    }
}

fn timestamp(time: Option<DateTime<Local>>) -> String {
    match time {
        Some(t) => t.to_rfc3339_opts(SecondsFormat::Secs, false),
        None => "unknown".to_string(),
    }
}
