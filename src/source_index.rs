//! Source discovery and the parsed program
//!
//! The file set is every store-pattern match below the stores directory, unioned with the
//! tsconfig file list so decorator declarations living elsewhere in the project resolve.
//! The whole program is re-parsed on every reload; store directories are small.

use crate::config::{ResolvedConfig, TsConfig};
use crate::error::{PipelineError, Result};
use crate::extractors::base::SourceModule;
use crate::extractors::typescript::function_declarations;
use crate::utils::paths::normalize;
use indexmap::{IndexMap, IndexSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Decorator function name to its declared parameter names, per declaring module
#[derive(Debug, Clone, Default)]
pub struct DecoratorIndex {
    entries: IndexMap<String, Vec<(PathBuf, Vec<String>)>>,
}

impl DecoratorIndex {
    pub fn add(&mut self, name: impl Into<String>, module: &Path, parameters: Vec<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push((module.to_path_buf(), parameters));
    }

    pub fn collect_from_module(&mut self, module: &SourceModule) {
        for function in function_declarations(module.root()) {
            self.add(function.name, module.path(), function.parameters);
        }
    }

    /// Parameter names of `name`, preferring a declaration in `module`
    pub fn lookup(&self, name: &str, module: &Path) -> Option<&[String]> {
        let declarations = self.entries.get(name)?;
        declarations
            .iter()
            .find(|(path, _)| path == module)
            .or_else(|| declarations.first())
            .map(|(_, parameters)| parameters.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Store-pattern matches below the stores directory, then the tsconfig files, deduplicated
pub fn discover_files(config: &ResolvedConfig, tsconfig: &TsConfig) -> Result<Vec<PathBuf>> {
    let mut files: IndexSet<PathBuf> = IndexSet::new();

    for pattern in &config.file_patterns {
        let absolute = config.stores_dir.join("**").join(pattern);
        let entries =
            glob::glob(&absolute.to_string_lossy()).map_err(|e| PipelineError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(normalize(&path));
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path while indexing stores: {}", e),
            }
        }
    }

    files.extend(tsconfig.file_names()?);

    Ok(files
        .into_iter()
        .filter(|path| !config.is_generated_file(path))
        .collect())
}

/// Every indexed module, parsed, with the decorator declarations found in them
#[derive(Debug, Default)]
pub struct Program {
    modules: Vec<SourceModule>,
    decorators: DecoratorIndex,
}

impl Program {
    pub fn load(config: &ResolvedConfig, tsconfig: &TsConfig) -> Result<Self> {
        let started = Instant::now();
        let files = discover_files(config, tsconfig)?;

        let mut modules = Vec::with_capacity(files.len());
        for path in files {
            match SourceModule::load(&path) {
                Ok(module) => modules.push(module),
                // A file can vanish between discovery and reading while watching
                Err(PipelineError::Io(e)) => {
                    warn!("Could not read {}: {}", path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        let program = Self::from_modules(modules);
        debug!(
            "Indexed {} modules ({} decorator declarations) in {:?}",
            program.modules.len(),
            program.decorators.len(),
            started.elapsed()
        );
        Ok(program)
    }

    pub fn from_modules(modules: Vec<SourceModule>) -> Self {
        let mut decorators = DecoratorIndex::default();
        for module in &modules {
            decorators.collect_from_module(module);
        }
        Self {
            modules,
            decorators,
        }
    }

    pub fn modules(&self) -> &[SourceModule] {
        &self.modules
    }

    pub fn module(&self, path: &Path) -> Option<&SourceModule> {
        let path = normalize(path);
        self.modules.iter().find(|module| module.path() == path)
    }

    pub fn decorators(&self) -> &DecoratorIndex {
        &self.decorators
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
