use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::copier::CopyLogEntry;
use crate::error::Error;

const SEPARATOR_WIDTH: usize = 50;

/// Destination for the per-run operation log.
pub trait LogStore {
    /// Append one block holding the entries of a single run.
    ///
    /// # Errors
    /// Returns an error if the block could not be stored.
    fn append(&mut self, entries: &[CopyLogEntry]) -> Result<(), Error>;

    /// File the log is written to, if any.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Append-only text file log.
#[derive(Debug, Clone)]
pub struct FileLogStore {
    path: PathBuf,
}

/// Keeps the rendered blocks in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogStore {
    pub blocks: Vec<String>,
}

/// Render one log block: separator line, local timestamp, and one line per entry.
#[must_use]
pub fn format_block(entries: &[CopyLogEntry], timestamp: &str) -> String {
    let mut block = format!("\n{}\n{timestamp}\n", "=".repeat(SEPARATOR_WIDTH));
    for entry in entries {
        block.push_str(&entry.to_string());
        block.push('\n');
    }
    block
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl FileLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_block(&self, block: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(block.as_bytes())?;
        writer.flush()
    }
}

impl LogStore for FileLogStore {
    fn append(&mut self, entries: &[CopyLogEntry]) -> Result<(), Error> {
        let block = format_block(entries, &timestamp());
        self.write_block(&block).map_err(|source| Error::LogStore {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

impl LogStore for MemoryLogStore {
    fn append(&mut self, entries: &[CopyLogEntry]) -> Result<(), Error> {
        self.blocks.push(format_block(entries, &timestamp()));
        Ok(())
    }
}
