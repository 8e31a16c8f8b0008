//! Store diagnostics
//!
//! A [`Linter`] is created per source module and records messages keyed to spans in that
//! module. Finishing it yields a [`Diagnostics`] value; the caller merges batches from every
//! module and decides when to render and clear them.
//!
//! Nothing here fails on malformed input. A span that cannot be resolved against the module
//! simply renders without source context.

pub mod messages;
mod render;

use crate::extractors::base::{SourceModule, Span};
use messages::MessagePart;
use std::io::{self, Write};
use tracing::warn;

pub use messages::{CodeSnippet, SnippetPlacement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

/// The offending source text, resolved when the message was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnippet {
    pub code: String,
    /// 0-based line of the first code line
    pub start_line: usize,
    /// `file:line:col`, 1-based
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintingMessage {
    pub severity: Severity,
    pub parts: Vec<MessagePart>,
    pub span: Option<Span>,
    pub code_snippet: Option<SourceSnippet>,
}

impl LintingMessage {
    /// Plain text lines of the message, snippets excluded
    pub fn text_lines(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text(text) => Some(text.as_str()),
                MessagePart::Snippet(_) => None,
            })
            .collect()
    }

    pub fn example(&self) -> Option<&CodeSnippet> {
        self.parts.iter().find_map(|part| match part {
            MessagePart::Snippet(snippet) => Some(snippet),
            MessagePart::Text(_) => None,
        })
    }
}

/// Per-module message recorder
pub struct Linter<'m> {
    module: &'m SourceModule,
    messages: Vec<LintingMessage>,
}

impl<'m> Linter<'m> {
    pub fn for_module(module: &'m SourceModule) -> Self {
        Self {
            module,
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, parts: Vec<MessagePart>, span: Option<Span>) {
        self.add(Severity::Error, parts, span);
    }

    pub fn warn(&mut self, parts: Vec<MessagePart>, span: Option<Span>) {
        self.add(Severity::Warning, parts, span);
    }

    pub fn info(&mut self, parts: Vec<MessagePart>, span: Option<Span>) {
        self.add(Severity::Info, parts, span);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn finish(self) -> Diagnostics {
        Diagnostics {
            messages: self.messages,
        }
    }

    fn add(&mut self, severity: Severity, parts: Vec<MessagePart>, span: Option<Span>) {
        let code_snippet = span.and_then(|span| self.resolve(span));
        self.messages.push(LintingMessage {
            severity,
            parts,
            span,
            code_snippet,
        });
    }

    fn resolve(&self, span: Span) -> Option<SourceSnippet> {
        let source = self.module.source();
        let code = source.get(span.start..span.end)?;
        let (line, column) = self.module.line_col(span.start);

        Some(SourceSnippet {
            code: code.trim().to_string(),
            start_line: line,
            location: format!(
                "{}:{}:{}",
                self.module.path().display(),
                line + 1,
                column + 1
            ),
        })
    }
}

/// A batch of messages from one or more modules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<LintingMessage>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another batch, keeping arrival order
    pub fn merge(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn messages(&self) -> &[LintingMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Render every message without consuming them
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let width = render::terminal_width();
        for message in &self.messages {
            render::render_message(out, message, width)?;
        }
        Ok(())
    }

    pub fn render_to_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.render(&mut buffer);
        String::from_utf8_lossy(&buffer).to_string()
    }

    /// Render to stdout, then clear. A no-op when empty.
    pub fn print(&mut self) {
        if self.messages.is_empty() {
            return;
        }

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = self.render(&mut handle) {
            warn!("Failed to print diagnostics: {}", e);
        }
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn module(source: &str) -> SourceModule {
        SourceModule::from_source(Path::new("/app/stores/TestStore.ts"), source.to_string())
            .unwrap()
    }

    #[test]
    fn test_linter_resolves_span_to_location() {
        let module = module("const a = 1;\nclass Bad {}\n");
        let mut linter = Linter::for_module(&module);
        linter.error(vec!["broken".into()], Some(Span::new(13, 25)));

        let diagnostics = linter.finish();
        let snippet = diagnostics.messages()[0].code_snippet.as_ref().unwrap();
        assert_eq!(snippet.code, "class Bad {}");
        assert_eq!(snippet.start_line, 1);
        assert_eq!(snippet.location, "/app/stores/TestStore.ts:2:1");
    }

    #[test]
    fn test_unresolvable_span_keeps_text_only() {
        let module = module("const a = 1;");
        let mut linter = Linter::for_module(&module);
        linter.warn(vec!["out of range".into()], Some(Span::new(500, 600)));
        linter.info(vec!["no span".into()], None);

        let diagnostics = linter.finish();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.messages().iter().all(|m| m.code_snippet.is_none()));

        colored::control::set_override(false);
        let rendered = diagnostics.render_to_string();
        assert!(rendered.contains(" out of range"));
        assert!(!rendered.contains("Location:"));
    }

    #[test]
    fn test_merge_keeps_order_and_counts() {
        let first = module("a");
        let second = module("b");

        let mut linter = Linter::for_module(&first);
        linter.error(vec!["one".into()], None);
        let mut all = linter.finish();

        let mut linter = Linter::for_module(&second);
        linter.warn(vec!["two".into()], None);
        linter.error(vec!["three".into()], None);
        all.merge(linter.finish());

        let texts: Vec<&str> = all.messages().iter().map(|m| m.text_lines()[0]).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(all.count(Severity::Error), 2);
        assert!(all.has_errors());
    }

    #[test]
    fn test_print_drains_and_empty_print_is_noop() {
        let module = module("a");
        let mut linter = Linter::for_module(&module);
        linter.info(vec!["hello".into()], None);
        let mut diagnostics = linter.finish();

        colored::control::set_override(false);
        diagnostics.print();
        assert!(diagnostics.is_empty());

        // Second print has nothing to do
        diagnostics.print();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_render_is_not_destructive() {
        let module = module("a");
        let mut linter = Linter::for_module(&module);
        linter.error(vec!["kept".into()], None);
        let diagnostics = linter.finish();

        colored::control::set_override(false);
        let first = diagnostics.render_to_string();
        let second = diagnostics.render_to_string();
        assert_eq!(first, second);
        assert_eq!(diagnostics.len(), 1);
    }
}
