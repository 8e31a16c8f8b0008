//! Top-level declarations and store instance exports

use super::helpers::unwrap_expression;
use crate::extractors::base::{Field, SyntaxKind, SyntaxNode};

/// `export const name = new Constructor(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConst {
    pub name: String,
    /// Name of the constructed class, when the initializer is a `new` expression on an identifier
    pub constructed: Option<String>,
}

/// Statements at module level, looking through `export` and `declare` wrappers
///
/// Each item pairs the declaration with whether it was exported.
pub fn top_level_declarations<'a, N: SyntaxNode<'a>>(root: N) -> Vec<(N, bool)> {
    let mut declarations = Vec::new();

    for statement in root.named_children() {
        match statement.kind() {
            SyntaxKind::ExportStatement => {
                if let Some(declaration) = statement.field(Field::Declaration) {
                    push_declaration(declaration, true, &mut declarations);
                }
            }
            _ => push_declaration(statement, false, &mut declarations),
        }
    }

    declarations
}

fn push_declaration<'a, N: SyntaxNode<'a>>(node: N, exported: bool, out: &mut Vec<(N, bool)>) {
    if node.kind() == SyntaxKind::AmbientDeclaration {
        for inner in node.named_children() {
            out.push((inner, exported));
        }
    } else {
        out.push((node, exported));
    }
}

/// Match an exported single-declarator `const` whose initializer constructs a class
///
/// `statement` is the declaration itself, as yielded by [`top_level_declarations`].
pub fn is_export_const<'a, N: SyntaxNode<'a>>(statement: N) -> Option<ExportConst> {
    if statement.kind() != SyntaxKind::LexicalDeclaration || !statement.has_keyword("const") {
        return None;
    }

    let declarators = statement.children_of_kind(SyntaxKind::VariableDeclarator);
    let [declarator] = declarators.as_slice() else {
        return None;
    };

    let name = declarator.field(Field::Name)?;
    if name.kind() != SyntaxKind::Identifier {
        return None;
    }

    let value = unwrap_expression(declarator.field(Field::Value)?);
    if value.kind() != SyntaxKind::NewExpression {
        return None;
    }

    let constructed = value
        .field(Field::Constructor)
        .filter(|ctor| ctor.kind() == SyntaxKind::Identifier)
        .map(|ctor| ctor.text().to_string());

    Some(ExportConst {
        name: name.text().to_string(),
        constructed,
    })
}
