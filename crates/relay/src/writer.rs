use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::path::resolve_log_path;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Append-only writer for one log source, with size-based rotation and a
/// single backup generation.
#[derive(Debug)]
pub struct RotatingLogWriter {
    path: PathBuf,
    backup_path: PathBuf,
    threshold: u64,
    file: fs::File,
    written: u64,
}

impl RotatingLogWriter {
    /// Opens the active file for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file cannot be opened.
    pub async fn open(path: PathBuf, threshold: u64) -> Result<Self> {
        let file = open_append(&path).await?;
        let written = file
            .metadata()
            .await
            .map_err(|source| write_err(&path, source))?
            .len();
        let backup_path = backup_path_for(&path);
        Ok(Self {
            path,
            backup_path,
            threshold,
            file,
            written,
        })
    }

    /// Appends `line` plus a trailing newline.
    ///
    /// When the pending write would push the active file past the
    /// threshold, the active file is first renamed onto the backup slot
    /// (clobbering any previous backup) and a fresh file is opened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if rotation or the append fails.
    pub async fn append(&mut self, line: &str) -> Result<()> {
        let mut record = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line.as_bytes());
        record.push(b'\n');

        if self.written > 0 && self.written + record.len() as u64 > self.threshold {
            self.rotate().await?;
        }

        self.file
            .write_all(&record)
            .await
            .map_err(|source| write_err(&self.path, source))?;
        self.file
            .flush()
            .await
            .map_err(|source| write_err(&self.path, source))?;
        self.written += record.len() as u64;
        Ok(())
    }

    async fn rotate(&mut self) -> Result<()> {
        self.file
            .flush()
            .await
            .map_err(|source| write_err(&self.path, source))?;
        fs::rename(&self.path, &self.backup_path)
            .await
            .map_err(|source| write_err(&self.path, source))?;
        self.file = open_append(&self.path).await?;
        self.written = 0;
        Ok(())
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn open_append(path: &Path) -> Result<fs::File> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| write_err(path, source))
}

fn write_err(path: &Path, source: io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".1");
    PathBuf::from(name)
}

/// Owns the per-source rotating writers, creating them lazily on the first
/// message for a never-seen source.
///
/// Names that fail resolution are remembered, so a malformed name is
/// resolved once and every later message for it is dropped cheaply.
#[derive(Debug)]
pub struct WriterRegistry {
    root: PathBuf,
    threshold: u64,
    writers: HashMap<String, RotatingLogWriter>,
    rejected: HashSet<String>,
}

impl WriterRegistry {
    /// Creates an empty registry writing under `root`.
    #[must_use]
    pub fn new(root: PathBuf, threshold: u64) -> Self {
        Self {
            root,
            threshold,
            writers: HashMap::new(),
            rejected: HashSet::new(),
        }
    }

    /// Creates a registry from the shared relay config.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.root_dir.clone(), config.rotate_threshold)
    }

    /// Routes one line to its source's writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathEscape`] for names resolving outside the root
    /// (the line is dropped) and [`Error::Write`] when this source's file
    /// cannot be written. A failure for one source never affects another.
    pub async fn route(&mut self, source: &str, line: &str) -> Result<()> {
        if self.rejected.contains(source) {
            return Err(Error::PathEscape {
                name: source.to_string(),
            });
        }

        let writer = match self.writers.entry(source.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = match resolve_log_path(&self.root, source).await {
                    Ok(path) => path,
                    Err(error) => {
                        if matches!(error, Error::PathEscape { .. }) {
                            self.rejected.insert(source.to_string());
                        }
                        return Err(error);
                    }
                };
                entry.insert(RotatingLogWriter::open(path, self.threshold).await?)
            }
        };

        writer.append(line).await
    }
}
