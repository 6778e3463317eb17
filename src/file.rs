//! File Operations
//!
//! Thin path abstraction used by the processor and the CLI: whole-file reads
//! and writes with contextual errors, output path derivation, and the
//! modification time stored in Literal Data packets.
//!
//! Every handle is opened and closed inside a single call, so nothing stays
//! open across an error return.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result, ensure};

use crate::config::FILE_EXTENSION;
use crate::types::ProcessorMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Final path component, lossily converted; empty when the path has none.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
    }

    /// Modification time in whole seconds since the Unix epoch, clamped to
    /// the 32-bit field of a Literal Data packet. Unavailable times map to 0.
    pub fn modified_timestamp(&self) -> Result<u32> {
        let meta = fs::metadata(&self.path).with_context(|| format!("failed to get metadata: {}", self.path.display()))?;
        let seconds = meta.modified().ok().and_then(|time| time.duration_since(UNIX_EPOCH).ok()).map_or(0, |elapsed| elapsed.as_secs());
        Ok(u32::try_from(seconds).unwrap_or(u32::MAX))
    }

    pub fn read_all(&self) -> Result<Vec<u8>> {
        ensure!(!self.path.is_dir(), "not a file: {}", self.path.display());
        fs::read(&self.path).with_context(|| format!("failed to read file: {}", self.path.display()))
    }

    /// Creates or truncates the file, creating missing parent directories.
    pub fn write_all(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to create file: {}", self.path.display()))?;

        let mut writer = BufWriter::new(file);
        writer.write_all(data).with_context(|| format!("failed to write file: {}", self.path.display()))?;
        writer.flush().with_context(|| format!("failed to write file: {}", self.path.display()))
    }

    /// Default output path: `.gpg` appended on encryption, stripped on decryption.
    #[must_use]
    pub fn output_path(&self, mode: ProcessorMode) -> PathBuf {
        match mode {
            ProcessorMode::Encrypt => {
                let mut name = self.path.as_os_str().to_os_string();
                name.push(FILE_EXTENSION);
                PathBuf::from(name)
            }
            ProcessorMode::Decrypt => self.path.to_string_lossy().strip_suffix(FILE_EXTENSION).map_or_else(|| self.path.clone(), PathBuf::from),
        }
    }

    /// Path for a file named `name` in the same directory as this one. Only
    /// the final component of `name` is used, so a stored name cannot escape
    /// the directory.
    #[must_use]
    pub fn sibling(&self, name: &str) -> Option<PathBuf> {
        let name = Path::new(name).file_name()?;
        Some(self.path.parent().map_or_else(|| PathBuf::from(name), |parent| parent.join(name)))
    }
}
