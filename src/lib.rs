// Class Stores Codegen - static analysis and code generation for class-based Vue stores
//
// Pipeline: discover + parse store modules (source_index), match store classes and extract
// their metadata (extractors, meta), collect diagnostics (linting), render the loader and
// component typings (builders), and write them through a content-hash gate (ledger).
// `context` drives one build session; `watcher` keeps it running on filesystem changes.

pub mod builders;
pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod language;
pub mod ledger;
pub mod linting;
pub mod meta;
pub mod processing;
pub mod source_index;
pub mod transform;
pub mod utils;
pub mod watcher;

pub use context::{Context, FileEventKind, WatchOutcome, WriteReport};
pub use error::{PipelineError, Result};
