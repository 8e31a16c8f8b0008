//! Fatal pipeline errors
//!
//! Store-level problems (bad state getter, missing export, lifecycle conflicts) are never
//! errors here; they are collected as [`crate::linting::Diagnostics`]. Anything in this
//! module halts the current operation because no meaningful partial result exists.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not find a tsconfig.json in '{}' or any parent directory", .0.display())]
    MissingTsConfig(PathBuf),

    #[error("Failed to parse compiler configuration '{}': {message}", .path.display())]
    InvalidTsConfig { path: PathBuf, message: String },

    #[error("Failed to parse plugin options '{}': {message}", .path.display())]
    InvalidPluginConfig { path: PathBuf, message: String },

    #[error("Failed to load tree-sitter grammar: {0}")]
    Language(String),

    #[error("Failed to parse source file '{}'", .0.display())]
    Parse(PathBuf),

    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("File watcher failed: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
