//! Decorator function declarations
//!
//! Collects every top-level function shape a decorator can be declared with, so call
//! arguments on a decorator can be keyed by the declared parameter names.

use super::exports::top_level_declarations;
use super::helpers::member_name;
use super::signatures::parameter_names;
use crate::extractors::base::{Field, SyntaxKind, SyntaxNode};

/// A function declared at module level with its parameter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<String>,
}

/// `function f(...)`, `declare function f(...)`, `const f = (...) => ...`,
/// `const f = function (...) {...}` and `const f: (...) => T`
pub fn function_declarations<'a, N: SyntaxNode<'a>>(root: N) -> Vec<FunctionDecl> {
    let mut found = Vec::new();

    for (declaration, _) in top_level_declarations(root) {
        match declaration.kind() {
            SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionSignature => {
                if let Some(name) = member_name(declaration) {
                    found.push(FunctionDecl {
                        name: name.to_string(),
                        parameters: parameter_names(declaration),
                    });
                }
            }
            SyntaxKind::LexicalDeclaration | SyntaxKind::VariableDeclaration => {
                for declarator in declaration.children_of_kind(SyntaxKind::VariableDeclarator) {
                    if let Some(function) = declarator_function(declarator) {
                        found.push(function);
                    }
                }
            }
            _ => {}
        }
    }

    found
}

fn declarator_function<'a, N: SyntaxNode<'a>>(declarator: N) -> Option<FunctionDecl> {
    let name = declarator.field(Field::Name)?;
    if name.kind() != SyntaxKind::Identifier {
        return None;
    }

    let function = match declarator.field(Field::Value) {
        Some(value) if value.kind().is_function_like() => value,
        Some(_) => return None,
        // Only a type annotation, e.g. `declare const On: (event: string) => MethodDecorator`
        None => declarator
            .field(Field::Type)?
            .first_named_child()
            .filter(|ty| ty.kind() == SyntaxKind::FunctionType)?,
    };

    Some(FunctionDecl {
        name: name.text().to_string(),
        parameters: parameter_names(function),
    })
}
