//! Content-hash ledger
//!
//! Maps absolute paths to the blake3 hash of their last known content. The orchestrator
//! owns one ledger per session; it gates writes of generated files and lets watch events
//! for untouched sources be dropped early.

use crate::extractors::base::hash_content;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentLedger {
    hashes: HashMap<PathBuf, String>,
}

impl ContentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `content` as the current state of `path`
    pub fn record(&mut self, path: &Path, content: &[u8]) {
        self.hashes
            .insert(path.to_path_buf(), hash_content(content));
    }

    /// Seed the ledger from a file already on disk; missing files are ignored
    pub fn record_existing(&mut self, path: &Path) -> io::Result<bool> {
        match fs::read(path) {
            Ok(content) => {
                self.record(path, &content);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn forget(&mut self, path: &Path) {
        self.hashes.remove(path);
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.hashes.get(path).map(|hash| hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// True unless `content` hashes to what was last recorded for `path`
    pub fn is_changed(&self, path: &Path, content: &[u8]) -> bool {
        self.get(path) != Some(hash_content(content).as_str())
    }

    /// Write `content` to `path` only when it differs from the recorded hash
    ///
    /// Returns whether the file was written. Parent directories are created as needed.
    pub fn write_if_changed(&mut self, path: &Path, content: &str) -> io::Result<bool> {
        let hash = hash_content(content.as_bytes());
        if self.get(path) == Some(hash.as_str()) {
            debug!("Unchanged, skipping write: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        self.hashes.insert(path.to_path_buf(), hash);
        Ok(true)
    }
}
