//! TypeScript store matchers with modular architecture
//!
//! Structural recognizers over the [`SyntaxNode`](crate::extractors::base::SyntaxNode) trait:
//!
//! - **classes**: store factory base class, binding field, `state` getter and its keys
//! - **signatures**: method parameters and decorator arguments
//! - **exports**: top-level declarations and `export const x = new Store()`
//! - **functions**: decorator function declarations for the decorator index
//! - **helpers**: shared node inspections

mod classes;
mod exports;
mod functions;
mod helpers;
mod signatures;

pub use classes::{
    extends_store_factory, is_binding_declaration, is_state_getter_node, state_keys,
    StateGetterMatch,
};
pub use exports::{is_export_const, top_level_declarations, ExportConst};
pub use functions::{function_declarations, FunctionDecl};
pub use helpers::{decorator_name, has_decorator, member_name, short_decorator_name};
pub use signatures::{
    extract_decorators_from_signature, extract_signature_meta, parameter_names, SignatureMeta,
};
