//! Helper functions for the store matchers
//!
//! Small node inspections shared by the class, signature and export matchers.

use crate::extractors::base::{Field, SyntaxKind, SyntaxNode};

/// Name of a member or declaration, if it is a plain identifier
pub fn member_name<'a, N: SyntaxNode<'a>>(node: N) -> Option<&'a str> {
    let name = node.field(Field::Name)?;
    if name.kind().is_name() {
        Some(name.text())
    } else {
        None
    }
}

/// Value of a string literal node, without its quotes
pub fn string_literal_value<'a, N: SyntaxNode<'a>>(node: N) -> Option<String> {
    if node.kind() != SyntaxKind::String {
        return None;
    }
    Some(unquote(node.text()))
}

pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), text.chars().last()) {
        (Some(open), Some(close))
            if text.len() >= 2 && open == close && matches!(open, '"' | '\'' | '`') =>
        {
            text[1..text.len() - 1].to_string()
        }
        _ => text.to_string(),
    }
}

/// Look through parentheses and `as`/`satisfies` casts
pub fn unwrap_expression<'a, N: SyntaxNode<'a>>(node: N) -> N {
    let mut current = node;
    loop {
        match current.kind() {
            SyntaxKind::ParenthesizedExpression | SyntaxKind::AsExpression => {
                match current.first_named_child() {
                    Some(inner) => current = inner,
                    None => return current,
                }
            }
            _ => return current,
        }
    }
}

/// Name a decorator is referred to by: `@Computed` and `@Computed()` are both `Computed`
pub fn decorator_name<'a, N: SyntaxNode<'a>>(decorator: N) -> Option<&'a str> {
    let expression = decorator.first_named_child()?;
    match expression.kind() {
        SyntaxKind::Identifier | SyntaxKind::MemberExpression => Some(expression.text()),
        SyntaxKind::CallExpression => {
            let callee = expression.field(Field::Function)?;
            match callee.kind() {
                SyntaxKind::Identifier | SyntaxKind::MemberExpression => Some(callee.text()),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Decorator name without its namespace: `Lib.OnInit` is `OnInit`
pub fn short_decorator_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Case-insensitive decorator check on a class member, ignoring any namespace qualifier
pub fn has_decorator<'a, N: SyntaxNode<'a>>(member: N, name: &str) -> bool {
    member
        .decorators()
        .into_iter()
        .filter_map(decorator_name)
        .any(|found| short_decorator_name(found).eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'$user'"), "$user");
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("`t`"), "t");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("'mixed\""), "'mixed\"");
    }

    #[test]
    fn test_short_decorator_name() {
        assert_eq!(short_decorator_name("OnInit"), "OnInit");
        assert_eq!(short_decorator_name("Lib.OnInit"), "OnInit");
        assert_eq!(short_decorator_name("a.b.Computed"), "Computed");
    }
}
