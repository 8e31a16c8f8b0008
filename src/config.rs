//! Project configuration
//!
//! Two layers: the TypeScript compiler configuration (`tsconfig.json`), which decides the
//! authoritative file list, and the plugin options (`class-stores.json` plus overrides),
//! which locate the stores directory and the generated artifacts.

use crate::error::{PipelineError, Result};
use crate::utils::paths::normalize;
use indexmap::IndexSet;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub const TSCONFIG_FILE: &str = "tsconfig.json";
pub const PLUGIN_CONFIG_FILE: &str = "class-stores.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

/// A parsed `tsconfig.json`
#[derive(Debug, Clone)]
pub struct TsConfig {
    path: PathBuf,
    raw: RawTsConfig,
}

impl TsConfig {
    /// Walk from `start` upward until a `tsconfig.json` is found
    pub fn find(start: &Path) -> Result<PathBuf> {
        let mut current = Some(start);
        while let Some(dir) = current {
            let candidate = dir.join(TSCONFIG_FILE);
            if candidate.is_file() {
                return Ok(candidate);
            }
            current = dir.parent();
        }
        Err(PipelineError::MissingTsConfig(start.to_path_buf()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(path, &text)
    }

    pub fn find_and_load(start: &Path) -> Result<Self> {
        Self::load(&Self::find(start)?)
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let cleaned = strip_json_comments(text);
        let raw = if cleaned.trim().is_empty() {
            RawTsConfig::default()
        } else {
            serde_json::from_str(&cleaned).map_err(|e| PipelineError::InvalidTsConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(Self {
            path: path.to_path_buf(),
            raw,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative entries are resolved against
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Absolute TypeScript sources named by `files` and `include`, minus `exclude`
    pub fn file_names(&self) -> Result<Vec<PathBuf>> {
        let dir = self.dir();
        let mut found: IndexSet<PathBuf> = IndexSet::new();

        for file in self.raw.files.iter().flatten() {
            let path = normalize(&dir.join(file));
            if path.is_file() {
                found.insert(path);
            }
        }

        let default_include = vec!["**/*".to_string()];
        let include = match (&self.raw.include, &self.raw.files) {
            (Some(include), _) => include,
            (None, Some(_)) => return Ok(found.into_iter().collect()),
            (None, None) => &default_include,
        };

        let exclude = self
            .raw
            .exclude
            .iter()
            .flatten()
            .map(|pattern| compile_pattern(dir, pattern))
            .collect::<Result<Vec<_>>>()?;

        for pattern in include {
            let absolute = expand_directory_pattern(dir, pattern);
            let entries = glob::glob(&absolute).map_err(|e| PipelineError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;

            for entry in entries.flatten() {
                let path = normalize(&entry);
                if !path.is_file() || !is_typescript_source(&path) || in_node_modules(&path) {
                    continue;
                }
                if exclude.iter().any(|p| p.matches_path(&path)) {
                    continue;
                }
                found.insert(path);
            }
        }

        debug!(
            "Resolved {} files from {}",
            found.len(),
            self.path.display()
        );
        Ok(found.into_iter().collect())
    }
}

/// `src` means everything below `src`
fn expand_directory_pattern(dir: &Path, pattern: &str) -> String {
    let joined = dir.join(pattern);
    let has_magic = pattern.contains(['*', '?', '[']);
    if !has_magic && joined.is_dir() {
        joined.join("**").join("*").to_string_lossy().to_string()
    } else {
        joined.to_string_lossy().to_string()
    }
}

fn compile_pattern(dir: &Path, pattern: &str) -> Result<glob::Pattern> {
    let absolute = expand_directory_pattern(dir, pattern);
    glob::Pattern::new(&absolute).map_err(|e| PipelineError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

pub fn is_typescript_source(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.ends_with(".ts") || name.ends_with(".tsx") || name.ends_with(".mts")
}

fn in_node_modules(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
}

/// Remove `//` and `/* */` comments and trailing commas, leaving string literals intact
pub fn strip_json_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                out.push(c);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    i += 1;
                    if chars[i - 1] == '"' {
                        break;
                    }
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            ',' => {
                let next = chars[i + 1..]
                    .iter()
                    .copied()
                    .find(|ch| !ch.is_whitespace());
                // A trailing comma may still be followed by a comment
                let next = match next {
                    Some('/') => next_significant(&chars, i + 1),
                    other => other,
                };
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn next_significant(chars: &[char], mut i: usize) -> Option<char> {
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            c => return Some(c),
        }
    }
    None
}

/// Plugin options, as read from `class-stores.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub project_root: Option<PathBuf>,
    pub stores_path: Option<PathBuf>,
    pub stores_file_name: String,
    pub store_loader_file: String,
    pub generated_dir_name: String,
    pub file_patterns: Vec<String>,
    pub runtime_package: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            stores_path: None,
            stores_file_name: "stores.d.ts".to_string(),
            store_loader_file: "StoreLoader.ts".to_string(),
            generated_dir_name: "Generated".to_string(),
            file_patterns: vec!["*Store.ts".to_string(), "*store.ts".to_string()],
            runtime_package: "@idevelopthings/vue-class-stores/vue".to_string(),
        }
    }
}

impl PluginConfig {
    /// Read `class-stores.json` from `root` if present, else defaults
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(PLUGIN_CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)?;
        let config: Self =
            serde_json::from_str(&strip_json_comments(&text)).map_err(|e| {
                PipelineError::InvalidPluginConfig {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?;
        debug!("Loaded plugin options from {}", path.display());
        Ok(config)
    }

    pub fn with_stores_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stores_path = Some(path.into());
        self
    }

    pub fn with_stores_file_name(mut self, name: impl Into<String>) -> Self {
        self.stores_file_name = name.into();
        self
    }

    /// Absolute paths for a project rooted at `root`
    ///
    /// `storesPath` defaults to `src/Stores`, the layout the runtime package documents.
    pub fn resolve(&self, root: &Path) -> ResolvedConfig {
        let project_root = normalize(&match &self.project_root {
            Some(configured) => root.join(configured),
            None => root.to_path_buf(),
        });
        let stores_dir = normalize(
            &project_root.join(
                self.stores_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("src/Stores")),
            ),
        );
        let generated_dir = stores_dir.join(&self.generated_dir_name);

        ResolvedConfig {
            loader_path: generated_dir.join(&self.store_loader_file),
            declaration_path: generated_dir.join(&self.stores_file_name),
            project_root,
            stores_dir,
            generated_dir,
            file_patterns: self.file_patterns.clone(),
            runtime_package: self.runtime_package.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub project_root: PathBuf,
    pub stores_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub loader_path: PathBuf,
    pub declaration_path: PathBuf,
    pub file_patterns: Vec<String>,
    pub runtime_package: String,
}

impl ResolvedConfig {
    pub fn is_generated_file(&self, path: &Path) -> bool {
        normalize(path).starts_with(&self.generated_dir)
    }

    pub fn is_in_stores_dir(&self, path: &Path) -> bool {
        normalize(path).starts_with(&self.stores_dir)
    }
}
