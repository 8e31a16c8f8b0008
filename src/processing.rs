//! Explicit processing state threaded through class traversal
//!
//! Matchers and metadata builders receive `&mut ProcessingContext` so diagnostics can be
//! attributed to the module, class and method being processed. One context is created per
//! module and finished into that module's [`Diagnostics`].

use crate::extractors::base::{SourceModule, Span};
use crate::linting::messages::{state_getter, store as store_messages, MessagePart};
use crate::linting::{Diagnostics, Linter};
use crate::meta::StoreMeta;
use crate::source_index::DecoratorIndex;

/// The method currently being turned into an action
#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentAction {
    name: String,
    span: Span,
}

pub struct ProcessingContext<'m> {
    module: &'m SourceModule,
    decorators: &'m DecoratorIndex,
    linter: Linter<'m>,
    class_span: Option<Span>,
    class_name: Option<String>,
    action: Option<CurrentAction>,
}

impl<'m> ProcessingContext<'m> {
    pub fn new(module: &'m SourceModule, decorators: &'m DecoratorIndex) -> Self {
        Self {
            module,
            decorators,
            linter: Linter::for_module(module),
            class_span: None,
            class_name: None,
            action: None,
        }
    }

    pub fn module(&self) -> &'m SourceModule {
        self.module
    }

    pub fn decorators(&self) -> &'m DecoratorIndex {
        self.decorators
    }

    /// Name of the store class being processed, empty outside a class
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or_default()
    }

    /// Name of the method being processed as an action, empty outside one
    pub fn action_name(&self) -> &str {
        self.action
            .as_ref()
            .map(|action| action.name.as_str())
            .unwrap_or_default()
    }

    pub fn error(&mut self, parts: Vec<MessagePart>, span: Span) {
        self.linter.error(parts, Some(span));
    }

    pub fn warn(&mut self, parts: Vec<MessagePart>, span: Span) {
        self.linter.warn(parts, Some(span));
    }

    /// Report an error on the current action, or the current class outside one
    pub fn action_error(&mut self, parts: Vec<MessagePart>) {
        let span = self
            .action
            .as_ref()
            .map(|action| action.span)
            .or(self.class_span);
        self.linter.error(parts, span);
    }

    /// Run `handler` with `class` set as the store class being processed
    pub fn processing_store_class<R>(
        &mut self,
        name: &str,
        span: Span,
        handler: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.class_span = Some(span);
        self.class_name = Some(name.to_string());
        let result = handler(self);
        self.class_span = None;
        self.class_name = None;
        result
    }

    /// Run `handler` with the given method set as the current action
    pub fn processing_action<R>(
        &mut self,
        name: &str,
        span: Span,
        handler: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.action = Some(CurrentAction {
            name: name.to_string(),
            span,
        });
        let result = handler(self);
        self.action = None;
        result
    }

    /// Report the store-level problems that exclude a store from the output
    pub fn validate(&mut self, store: &StoreMeta) {
        let (Some(class_name), Some(span)) = (store.class_name.as_deref(), store.class_span())
        else {
            return;
        };

        if store.export_name.is_none() {
            self.linter
                .error(store_messages::missing_export(class_name), Some(span));
        }

        // A rejected state getter has already been reported with a more specific message
        if !store.has_state_getter() && !store.state_getter_rejected() {
            self.linter
                .error(state_getter::missing(class_name), Some(span));
        }
    }

    pub fn finish(self) -> Diagnostics {
        self.linter.finish()
    }
}
