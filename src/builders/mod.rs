//! Code generation for the loader module and the type declaration file
//!
//! Both renderers are pure functions of the store list: the same input always produces
//! byte-identical output, which is what the write gate in [`crate::ledger`] relies on.

pub mod imports;
pub mod store_loader;
pub mod value;
pub mod vue_dts;

pub use store_loader::render_loader;
pub use value::{CodeNode, MetaValue};
pub use vue_dts::render_declarations;
