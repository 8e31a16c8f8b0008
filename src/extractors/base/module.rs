//! A parsed TypeScript source file

use super::tree_methods::TsNode;
use crate::error::{PipelineError, Result};
use crate::language::{create_parser, detect_language_from_path};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::Tree;

/// Source text, its path and the syntax tree parsed from it
pub struct SourceModule {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for SourceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceModule")
            .field("path", &self.path)
            .field("len", &self.source.len())
            .finish()
    }
}

impl SourceModule {
    /// Read and parse a file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_source(path, source)
    }

    /// Parse in-memory source; the dialect is picked from the path's extension
    pub fn from_source(path: &Path, source: String) -> Result<Self> {
        let language = detect_language_from_path(path).unwrap_or("typescript");
        let mut parser = create_parser(language)?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| PipelineError::Parse(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            source,
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> TsNode<'_> {
        TsNode::new(self.tree.root_node(), &self.source)
    }

    /// 0-based line and column (in characters) of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let before = self.source.get(..offset).unwrap_or("");
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count();
        (line, column)
    }

    /// Blake3 hash of the module text
    pub fn content_hash(&self) -> String {
        hash_content(self.source.as_bytes())
    }
}

/// Blake3 hex digest, the hash format used by every ledger in the crate
pub fn hash_content(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}
