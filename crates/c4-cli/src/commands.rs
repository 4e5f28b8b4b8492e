use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use c4_crypto::identify;
use c4_types::Identifier;

use crate::cli::Cli;
use crate::config::IdentifyConfig;
use crate::output::{FileMetadata, Record};

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = IdentifyConfig::resolve(&cli)?;
    let mut session = Session::new(&config, io::stdout().lock(), io::stderr().lock());

    if cli.files.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            debug!("no files given and stdin is a terminal");
            return Ok(ExitCode::SUCCESS);
        }
        session.identify_stream(stdin.lock())?;
    } else {
        for path in &cli.files {
            session.identify_path(path)?;
        }
    }

    Ok(if session.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Identify a single file.
pub fn identify_file(path: &Path) -> anyhow::Result<Identifier> {
    let file = File::open(path)?;
    let id = identify(file)?;
    id.require_value()?;
    Ok(id)
}

/// One invocation's worth of output and failure tracking.
///
/// Problems with individual paths are reported on `err` and remembered;
/// only failures to write output abort the session.
pub struct Session<'a, W, E> {
    config: &'a IdentifyConfig,
    out: W,
    err: E,
    failed: bool,
}

impl<'a, W: Write, E: Write> Session<'a, W, E> {
    pub fn new(config: &'a IdentifyConfig, out: W, err: E) -> Self {
        Self {
            config,
            out,
            err,
            failed: false,
        }
    }

    /// Returns `true` if any path could not be identified.
    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn identify_stream<R: Read>(&mut self, reader: R) -> anyhow::Result<()> {
        let id = identify(reader).context("reading stdin")?;
        id.require_value().context("processing stdin")?;
        self.emit(&Record::stream(id))
    }

    pub fn identify_path(&mut self, path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            return self.report(format!("Path '{}' does not exist.", path.display()));
        }

        if path.is_dir() {
            if self.config.recursive {
                return self.identify_dir(path);
            }
            return self.report(format!(
                "{} is a directory (use -R to identify its files)",
                path.display()
            ));
        }

        match self.record_for(path) {
            Ok(record) => self.emit(&record),
            Err(e) => self.report(format!("processing {}: {e:#}", path.display())),
        }
    }

    fn identify_dir(&mut self, root: &Path) -> anyhow::Result<()> {
        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name();
        if self.config.depth > 0 {
            // Files directly under root are at walk depth 1.
            walker = walker.max_depth(self.config.depth + 1);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "directory walk error");
                    self.report(format!("processing directory {}: {e}", root.display()))?;
                    continue;
                }
            };
            // Unfollowed symlinks to regular files are still listed.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            match self.record_for(entry.path()) {
                Ok(record) => self.emit(&record)?,
                Err(e) => {
                    self.report(format!("processing {}: {e:#}", entry.path().display()))?
                }
            }
        }
        Ok(())
    }

    fn record_for(&self, path: &Path) -> anyhow::Result<Record> {
        let id = identify_file(path)?;
        debug!(path = %path.display(), %id, "identified file");

        let metadata = if self.config.metadata {
            Some(FileMetadata::read(path)?)
        } else {
            None
        };
        Ok(Record::file(id, self.display_path(path)?, metadata))
    }

    fn display_path(&self, path: &Path) -> io::Result<PathBuf> {
        if self.config.absolute {
            std::path::absolute(path)
        } else {
            Ok(path.to_path_buf())
        }
    }

    fn emit(&mut self, record: &Record) -> anyhow::Result<()> {
        let line = record.render(self.config)?;
        writeln!(self.out, "{line}").context("writing output")
    }

    fn report(&mut self, message: String) -> anyhow::Result<()> {
        self.failed = true;
        writeln!(self.err, "{} {message}", "Error:".red().bold()).context("writing error output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c4_crypto::identify_bytes;
    use c4_types::{Digest, ID_LEN, NIL_ID};
    use std::fs;
    use std::io::Cursor;

    use crate::cli::OutputFormat;

    struct Captured {
        out: String,
        err: String,
        failed: bool,
    }

    fn run_paths(config: &IdentifyConfig, paths: &[PathBuf]) -> Captured {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut session = Session::new(config, &mut out, &mut err);
        for p in paths {
            session.identify_path(p).unwrap();
        }
        let failed = session.failed();
        Captured {
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
            failed,
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn identify_file_matches_in_memory_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "content.txt", "This is test content");
        let id = identify_file(&path).unwrap();
        assert_eq!(id, identify_bytes(b"This is test content"));
    }

    #[test]
    fn empty_file_is_nil() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty", "");
        assert_eq!(identify_file(&path).unwrap(), NIL_ID);
    }

    #[test]
    fn single_file_prints_bare_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "hello");
        let cap = run_paths(&IdentifyConfig::default(), &[path]);
        let line = cap.out.trim_end();
        assert_eq!(line.len(), ID_LEN);
        assert!(line.starts_with("c4"));
        assert!(!cap.failed);
        assert!(cap.err.is_empty());
    }

    #[test]
    fn verbose_and_path_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "hello");
        let id = identify_bytes(b"hello");

        let verbose = IdentifyConfig {
            verbose: true,
            ..Default::default()
        };
        let cap = run_paths(&verbose, &[path.clone()]);
        assert_eq!(cap.out, format!("{id}: {}\n", path.display()));

        let path_first = IdentifyConfig {
            verbose: true,
            path_first: true,
            ..Default::default()
        };
        let cap = run_paths(&path_first, &[path.clone()]);
        assert!(cap.out.starts_with(&path.display().to_string()));
    }

    #[test]
    fn missing_path_is_reported_and_processing_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.txt", "fine");
        let missing = dir.path().join("missing.txt");

        let cap = run_paths(&IdentifyConfig::default(), &[missing, good]);
        assert!(cap.failed);
        assert!(cap.err.contains("does not exist"));
        assert_eq!(cap.out.lines().count(), 1);
    }

    #[test]
    fn directory_needs_recursive_flag() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "a");
        let cap = run_paths(&IdentifyConfig::default(), &[dir.path().to_path_buf()]);
        assert!(cap.failed);
        assert!(cap.err.contains("is a directory"));
        assert!(cap.out.is_empty());
    }

    #[test]
    fn recursive_lists_every_file_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            write(dir.path(), &format!("test{i}.txt"), &format!("Content {i}"));
        }
        let config = IdentifyConfig {
            recursive: true,
            ..Default::default()
        };
        let cap = run_paths(&config, &[dir.path().to_path_buf()]);
        let lines: Vec<&str> = cap.out.lines().collect();
        assert_eq!(lines.len(), 3);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.len(), ID_LEN);
            let expected = identify_bytes(format!("Content {i}").as_bytes());
            assert_eq!(*line, expected.to_string());
        }
    }

    #[test]
    fn depth_limits_descent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "top.txt", "0");
        write(dir.path(), "a/one.txt", "1");
        write(dir.path(), "a/b/two.txt", "2");

        let limited = IdentifyConfig {
            recursive: true,
            depth: 1,
            ..Default::default()
        };
        let cap = run_paths(&limited, &[dir.path().to_path_buf()]);
        assert_eq!(cap.out.lines().count(), 2);

        let unlimited = IdentifyConfig {
            recursive: true,
            ..Default::default()
        };
        let cap = run_paths(&unlimited, &[dir.path().to_path_buf()]);
        assert_eq!(cap.out.lines().count(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn recursive_includes_symlinked_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = write(dir.path(), "a.txt", "linked content");
        std::os::unix::fs::symlink(&target, dir.path().join("b.txt")).unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write(&sub, "c.txt", "nested");
        std::os::unix::fs::symlink(&sub, dir.path().join("sub-link")).unwrap();

        let config = IdentifyConfig {
            recursive: true,
            ..Default::default()
        };
        let cap = run_paths(&config, &[dir.path().to_path_buf()]);
        let lines: Vec<&str> = cap.out.lines().collect();
        // a.txt, b.txt and sub/c.txt; the directory link is not descended.
        assert_eq!(lines.len(), 3);
        let linked = identify_bytes(b"linked content").to_string();
        assert_eq!(lines.iter().filter(|l| **l == linked).count(), 2);
        assert!(!cap.failed);
    }

    #[test]
    fn absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "a");
        let config = IdentifyConfig {
            recursive: true,
            absolute: true,
            verbose: true,
            path_first: true,
            ..Default::default()
        };
        let cap = run_paths(&config, &[dir.path().to_path_buf()]);
        let (path, _) = cap.out.trim_end().split_once(": ").unwrap();
        assert!(Path::new(path).is_absolute());
    }

    #[test]
    fn metadata_includes_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "twelve bytes");
        let config = IdentifyConfig {
            metadata: true,
            ..Default::default()
        };
        let cap = run_paths(&config, &[path]);
        assert!(cap.out.contains("Size: 12 bytes"));
        assert!(cap.out.starts_with("ID: c4"));
    }

    #[test]
    fn json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "json");
        let config = IdentifyConfig {
            format: OutputFormat::Json,
            ..Default::default()
        };
        let cap = run_paths(&config, &[path]);
        let value: serde_json::Value = serde_json::from_str(cap.out.trim_end()).unwrap();
        let id: Digest = value["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(id.id(), identify_bytes(b"json"));
    }

    #[test]
    fn stream_is_identified() {
        let config = IdentifyConfig::default();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut session = Session::new(&config, &mut out, &mut err);
        session
            .identify_stream(Cursor::new(b"Hello, World!".to_vec()))
            .unwrap();
        assert!(!session.failed());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("{}\n", identify_bytes(b"Hello, World!")));
    }
}
