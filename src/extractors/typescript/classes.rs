//! Store class matchers
//!
//! Structural checks over a class declaration and its members: the store factory base class,
//! the static binding field and the `state` getter.

use super::helpers::{member_name, string_literal_value, unquote, unwrap_expression};
use crate::extractors::base::{Accessibility, AccessorKind, Field, SyntaxKind, SyntaxNode};
use crate::linting::messages::state_getter;
use crate::processing::ProcessingContext;

const BINDING_FIELD: &str = "vueBinding";
const STATE_GETTER: &str = "state";

/// Outcome of checking a member for the `state` getter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateGetterMatch<N> {
    /// Not a member named `state`
    NotState,
    /// Named `state` but malformed; a diagnostic has been recorded
    Rejected,
    /// A valid getter; carries the returned object literal
    Accepted(N),
}

/// True iff the class is declared as `class X extends Store<...>()`
///
/// The base class must be a call expression whose callee is an identifier named `store`
/// (any case). Plain `extends Store` does not qualify.
pub fn extends_store_factory<'a, N: SyntaxNode<'a>>(class: N) -> bool {
    if class.kind() != SyntaxKind::ClassDeclaration {
        return false;
    }

    let mut candidates = Vec::new();
    for heritage in class.children_of_kind(SyntaxKind::ClassHeritage) {
        for child in heritage.named_children() {
            if child.kind() == SyntaxKind::ExtendsClause {
                candidates.extend(child.named_children());
            } else {
                candidates.push(child);
            }
        }
    }

    candidates.into_iter().any(|base| {
        if base.kind() != SyntaxKind::CallExpression {
            return false;
        }
        match base.field(Field::Function) {
            Some(callee) if callee.kind() == SyntaxKind::Identifier => {
                callee.text().eq_ignore_ascii_case("store")
            }
            _ => false,
        }
    })
}

/// `public static vueBinding = "literal";` yields the literal
pub fn is_binding_declaration<'a, N: SyntaxNode<'a>>(member: N) -> Option<String> {
    if member.kind() != SyntaxKind::FieldDefinition || !member.is_static() {
        return None;
    }
    if matches!(
        member.accessibility(),
        Some(Accessibility::Private) | Some(Accessibility::Protected)
    ) {
        return None;
    }
    if member_name(member)? != BINDING_FIELD {
        return None;
    }

    string_literal_value(member.field(Field::Value)?)
}

/// Check a member for the `state` getter, recording a diagnostic when it is malformed
pub fn is_state_getter_node<'a, N: SyntaxNode<'a>>(
    member: N,
    ctx: &mut ProcessingContext,
) -> StateGetterMatch<N> {
    if member_name(member) != Some(STATE_GETTER) {
        return StateGetterMatch::NotState;
    }

    match member.kind() {
        SyntaxKind::FieldDefinition => {
            ctx.error(state_getter::must_be_getter(), member.span());
            return StateGetterMatch::Rejected;
        }
        SyntaxKind::MethodDefinition => {}
        _ => return StateGetterMatch::NotState,
    }

    match member.accessor() {
        Some(AccessorKind::Get) => {}
        // `set state(v)` is an ordinary setter
        Some(AccessorKind::Set) => return StateGetterMatch::NotState,
        None => {
            ctx.error(state_getter::must_be_getter(), member.span());
            return StateGetterMatch::Rejected;
        }
    }

    if member.accessibility() == Some(Accessibility::Protected) {
        ctx.error(state_getter::public_or_private(), member.span());
        return StateGetterMatch::Rejected;
    }

    if member.is_static() {
        ctx.error(state_getter::non_static(), member.span());
        return StateGetterMatch::Rejected;
    }

    match returned_object(member) {
        Some(object) => StateGetterMatch::Accepted(object),
        None => {
            ctx.error(state_getter::invalid_body(), member.span());
            StateGetterMatch::Rejected
        }
    }
}

/// The object literal of a body consisting of exactly `return { ... };`
fn returned_object<'a, N: SyntaxNode<'a>>(member: N) -> Option<N> {
    let body = member.field(Field::Body)?;
    let statements = body.named_children();
    if statements.len() != 1 || statements[0].kind() != SyntaxKind::ReturnStatement {
        return None;
    }

    let returned = unwrap_expression(statements[0].first_named_child()?);
    if returned.kind() == SyntaxKind::Object {
        Some(returned)
    } else {
        None
    }
}

/// Top-level property names of the state object literal, in source order
///
/// Spread elements, methods and computed keys carry no static name and are skipped.
pub fn state_keys<'a, N: SyntaxNode<'a>>(object: N) -> Vec<String> {
    let mut keys = Vec::new();
    for property in object.named_children() {
        match property.kind() {
            SyntaxKind::Pair => {
                let Some(key) = property.field(Field::Key) else {
                    continue;
                };
                match key.kind() {
                    SyntaxKind::PropertyIdentifier | SyntaxKind::Identifier => {
                        keys.push(key.text().to_string())
                    }
                    SyntaxKind::String => keys.push(unquote(key.text())),
                    SyntaxKind::Number => keys.push(key.text().to_string()),
                    _ => {}
                }
            }
            SyntaxKind::ShorthandProperty => keys.push(property.text().to_string()),
            _ => {}
        }
    }
    keys
}
