// Base AST access for the store extractors
//
// - ast.rs: parser-independent node vocabulary (SyntaxKind, Field, Span) and the SyntaxNode trait
// - tree_methods.rs: SyntaxNode implementation over tree-sitter nodes
// - module.rs: a parsed source file (path + text + tree)
//
// Matchers only ever see `SyntaxNode`; tree-sitter kind names never leak past tree_methods.rs.

pub mod ast;
pub mod module;
pub mod tree_methods;

pub use ast::{Accessibility, AccessorKind, Field, Span, SyntaxKind, SyntaxNode};
pub use module::{hash_content, SourceModule};
pub use tree_methods::TsNode;
