//! Build session orchestration
//!
//! A [`Context`] owns everything that lives across rebuilds: the resolved configuration,
//! the parsed program, the current store list, accumulated diagnostics and the
//! content-hash ledger. One filesystem event is handled to completion before the next.

use crate::builders;
use crate::config::{ResolvedConfig, TsConfig};
use crate::error::Result;
use crate::ledger::ContentLedger;
use crate::linting::Diagnostics;
use crate::meta::{extract_stores, StoreMeta};
use crate::source_index::Program;
use crate::utils::paths::normalize;
use crate::utils::to_relative_unix_style;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Filesystem change kinds the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Added,
    Changed,
    Removed,
}

impl FileEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileEventKind::Added => "add",
            FileEventKind::Changed => "change",
            FileEventKind::Removed => "unlink",
        }
    }
}

/// What a `write_files` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// No valid stores; nothing was rendered
    pub skipped: bool,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl WriteReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Outside the stores directory, or generated output
    Ignored,
    /// Content identical to what was last loaded
    Unchanged,
    /// Relevant path, but it does not declare a store
    NotAStore,
    Rebuilt(WriteReport),
}

pub struct Context {
    config: ResolvedConfig,
    tsconfig: TsConfig,
    program: Program,
    stores: Vec<StoreMeta>,
    diagnostics: Diagnostics,
    ledger: ContentLedger,
}

impl Context {
    pub fn init(config: ResolvedConfig) -> Result<Self> {
        Self::with_ledger(config, ContentLedger::new())
    }

    /// Start a session with an existing ledger, e.g. one carried over from a previous run
    pub fn with_ledger(config: ResolvedConfig, ledger: ContentLedger) -> Result<Self> {
        let started = Instant::now();
        let tsconfig = TsConfig::find_and_load(&config.project_root)?;
        debug!("Using compiler configuration {}", tsconfig.path().display());

        let mut context = Self {
            config,
            tsconfig,
            program: Program::default(),
            stores: Vec::new(),
            diagnostics: Diagnostics::new(),
            ledger,
        };

        context.reload_modules()?;
        context.process();

        // A restart must not rewrite output that is already up to date
        for generated in [
            context.config.loader_path.clone(),
            context.config.declaration_path.clone(),
        ] {
            context.ledger.record_existing(&generated)?;
        }

        debug!("Context initialised in {:?}", started.elapsed());
        Ok(context)
    }

    /// Re-discover and re-parse every indexed module
    pub fn reload_modules(&mut self) -> Result<()> {
        self.program = Program::load(&self.config, &self.tsconfig)?;
        for module in self.program.modules() {
            self.ledger.record(module.path(), module.source().as_bytes());
        }
        Ok(())
    }

    /// Rebuild the store list from the current program
    pub fn process(&mut self) {
        let started = Instant::now();
        self.stores.clear();

        for module in self.program.modules() {
            let (stores, diagnostics) = extract_stores(
                module,
                self.program.decorators(),
                &self.config.stores_dir,
                &self.config.generated_dir,
            );
            self.diagnostics.merge(diagnostics);

            for mut store in stores {
                if !store.is_valid() {
                    continue;
                }
                store.finalize();
                self.stores.push(store);
            }
        }

        debug!(
            "Processed {} modules into {} stores in {:?}",
            self.program.len(),
            self.stores.len(),
            started.elapsed()
        );
    }

    /// Render both generated files and write the ones whose content changed
    pub fn write_files(&mut self) -> Result<WriteReport> {
        if self.stores.is_empty() {
            warn!("No stores located... skipping code-gen.");
            return Ok(WriteReport::skipped());
        }

        info!("Located {} stores:", self.stores.len());
        for store in &self.stores {
            info!(
                "   - {} ({})",
                store.class_name.as_deref().unwrap_or_default(),
                store.relative_path
            );
        }

        let outputs = [
            (self.config.loader_path.clone(), self.render_loader()),
            (
                self.config.declaration_path.clone(),
                self.render_declarations(),
            ),
        ];

        let mut report = WriteReport::default();
        for (path, content) in outputs {
            if self.ledger.write_if_changed(&path, &content)? {
                info!("Generated {}", self.display_path(&path));
                report.written.push(path);
            } else {
                debug!("{} is up to date", self.display_path(&path));
                report.unchanged.push(path);
            }
        }

        Ok(report)
    }

    pub fn rebuild(&mut self) -> Result<WriteReport> {
        self.process();
        self.write_files()
    }

    /// React to one filesystem event
    pub fn handle_file_event(&mut self, kind: FileEventKind, path: &Path) -> Result<WatchOutcome> {
        let path = normalize(path);
        if self.config.is_generated_file(&path) || !self.config.is_in_stores_dir(&path) {
            return Ok(WatchOutcome::Ignored);
        }

        if kind == FileEventKind::Changed {
            if let Ok(content) = fs::read(&path) {
                if !self.ledger.is_changed(&path, &content) {
                    debug!("Content unchanged: {}", self.display_path(&path));
                    return Ok(WatchOutcome::Unchanged);
                }
            }
        }

        if kind == FileEventKind::Removed {
            self.ledger.forget(&path);
        }
        self.reload_modules()?;

        if kind != FileEventKind::Added {
            if let Some(store) = self.store_by_file_path(&path) {
                let class_name = store.class_name.clone().unwrap_or_default();
                match kind {
                    FileEventKind::Removed => info!("Store file deletion detected: {}", class_name),
                    _ => info!("Store file change detected: {}", class_name),
                }
                info!("Rebuilding stores...");
                return Ok(WatchOutcome::Rebuilt(self.rebuild()?));
            }
            if kind == FileEventKind::Removed {
                return Ok(WatchOutcome::NotAStore);
            }
        }

        // Only write when the file turns out to declare a store
        info!("New file detected: {}", self.display_path(&path));
        self.process();
        let added = self
            .store_by_file_path(&path)
            .map(|store| store.class_name.clone().unwrap_or_default());
        match added {
            Some(class_name) => {
                info!("Addition was a new store: {}", class_name);
                info!("Rebuilding stores...");
                Ok(WatchOutcome::Rebuilt(self.write_files()?))
            }
            None => Ok(WatchOutcome::NotAStore),
        }
    }

    pub fn store_by_file_path(&self, path: &Path) -> Option<&StoreMeta> {
        let path = normalize(path);
        self.stores.iter().find(|store| store.abs_file_path == path)
    }

    pub fn is_store_file(&self, path: &Path) -> bool {
        self.store_by_file_path(path).is_some()
    }

    pub fn stores(&self) -> &[StoreMeta] {
        &self.stores
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn ledger(&self) -> &ContentLedger {
        &self.ledger
    }

    /// End the session, handing the ledger back to the caller
    pub fn into_ledger(self) -> ContentLedger {
        self.ledger
    }

    /// Diagnostics gathered since the last call
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        mem::take(&mut self.diagnostics)
    }

    pub fn render_loader(&self) -> String {
        builders::render_loader(&self.stores, &self.config.runtime_package)
    }

    pub fn render_declarations(&self) -> String {
        builders::render_declarations(&self.stores)
    }

    fn display_path(&self, path: &Path) -> String {
        to_relative_unix_style(path, &self.config.project_root)
            .unwrap_or_else(|_| path.display().to_string())
    }
}
