//! Diagnostic message catalogue
//!
//! Each function returns the message parts for one problem: plain text lines, optionally
//! followed by a [`CodeSnippet`] that shows the shape the user should have written.

use crate::meta::LifeCycleEvent;
use crate::utils::create_export_name;

/// Where an included example is printed relative to the offending code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetPlacement {
    Before,
    After,
}

/// A canonical-usage example attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    pub content: String,
    pub example_text: String,
    /// Render next to the real source lines instead of as a standalone example
    pub include_code_snippet: bool,
    pub placement: Option<SnippetPlacement>,
}

impl CodeSnippet {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            example_text: "Example:".to_string(),
            include_code_snippet: false,
            placement: None,
        }
    }

    pub fn with_example_text(mut self, text: impl Into<String>) -> Self {
        self.example_text = text.into();
        self
    }

    /// Interleave the example with the offending source
    pub fn included(mut self, placement: SnippetPlacement) -> Self {
        self.include_code_snippet = true;
        self.placement = Some(placement);
        self
    }

    pub fn can_include_code_snippet(&self) -> bool {
        self.include_code_snippet && self.placement.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    Text(String),
    Snippet(CodeSnippet),
}

impl From<&str> for MessagePart {
    fn from(value: &str) -> Self {
        MessagePart::Text(value.to_string())
    }
}

impl From<String> for MessagePart {
    fn from(value: String) -> Self {
        MessagePart::Text(value)
    }
}

impl From<CodeSnippet> for MessagePart {
    fn from(value: CodeSnippet) -> Self {
        MessagePart::Snippet(value)
    }
}

const STATE_GETTER_EXAMPLE: &str = "get state(): IMyStoreType {\n\treturn { ... }\n}";

pub mod state_getter {
    use super::*;

    pub fn public_or_private() -> Vec<MessagePart> {
        vec![
            "The 'state' property must be public or private.".into(),
            CodeSnippet::new(STATE_GETTER_EXAMPLE).into(),
        ]
    }

    pub fn non_static() -> Vec<MessagePart> {
        vec![
            "The 'state' property must not be static.".into(),
            CodeSnippet::new(STATE_GETTER_EXAMPLE).into(),
        ]
    }

    pub fn invalid_body() -> Vec<MessagePart> {
        vec![
            "The 'state' getter must have a body with a single return object statement.".into(),
            CodeSnippet::new(STATE_GETTER_EXAMPLE).into(),
        ]
    }

    pub fn must_be_getter() -> Vec<MessagePart> {
        vec![
            "The 'state' property must be a JS/TS getter.".into(),
            CodeSnippet::new(STATE_GETTER_EXAMPLE).into(),
        ]
    }

    pub fn missing(class_name: &str) -> Vec<MessagePart> {
        vec![
            format!("Could not find state getter object for store: {}", class_name).into(),
            "Ensure you have a state object for your store".into(),
            CodeSnippet::new("get state() : IMyStateType {\n\treturn { ... };\n}").into(),
        ]
    }

    pub fn duplicate(class_name: &str) -> Vec<MessagePart> {
        vec![
            format!(
                "Store {} defines more than one 'state' getter; only the first one is used.",
                class_name
            )
            .into(),
        ]
    }
}

pub mod store {
    use super::*;

    pub fn missing_export(class_name: &str) -> Vec<MessagePart> {
        vec![
            format!("Could not find export for your store: {}", class_name).into(),
            "You need to define an export for your store class so it can be used".into(),
            CodeSnippet::new(format!(
                "export const {} = new {}();",
                create_export_name(class_name),
                class_name
            ))
            .with_example_text("For example, add this to the end of your module:")
            .included(SnippetPlacement::Before)
            .into(),
        ]
    }
}

pub mod lifecycle {
    use super::*;

    /// One method carries more than one lifecycle decorator
    pub fn multiple_handlers_on_method(
        method: &str,
        class_name: &str,
        existing: LifeCycleEvent,
    ) -> Vec<MessagePart> {
        vec![
            format!(
                "Method '{}' on store {} is already the {} handler.",
                method, class_name, existing
            )
            .into(),
            "A method can only handle one lifecycle event.".into(),
        ]
    }

    /// A second method tries to claim an event that is already bound
    pub fn event_already_handled(
        method: &str,
        event: LifeCycleEvent,
        handler: &str,
    ) -> Vec<MessagePart> {
        vec![
            format!(
                "Cannot register '{}' as the {} handler, '{}' already handles this event.",
                method, event, handler
            )
            .into(),
            "Each lifecycle event can only have one handler per store.".into(),
        ]
    }
}

pub mod setter {
    use super::*;

    pub fn unresolved_accessor(text: &str, class_name: &str) -> Vec<MessagePart> {
        vec![
            format!(
                "Could not resolve the accessor name for setter '{}' in {}.",
                text, class_name
            )
            .into(),
            "Setters need a plain identifier name so they can be paired with their getter.".into(),
        ]
    }
}
