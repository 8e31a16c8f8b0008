//! Syntax access and structural matchers for store modules
//!
//! - `base` - parser-independent node vocabulary, the tree-sitter backing and parsed modules
//! - `typescript` - matchers for store classes, exports, decorators and signatures

pub mod base;
pub mod typescript;
