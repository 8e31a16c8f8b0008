//! Code-generation value model
//!
//! Generated modules are built from [`MetaValue`] trees. Plain data (strings, booleans,
//! arrays, objects) is serialized as literals; [`CodeNode`] fragments are emitted as source
//! code verbatim in structure (constructor calls, lazy-import thunks). Keeping the two apart
//! lets the object serializer special-case fragments while everything else stays data.
//!
//! Output is deterministic: object keys follow insertion order, indentation is four spaces,
//! strings are JSON-escaped.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

const INDENT: &str = "    ";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

/// A generated source fragment, as opposed to a data literal
#[derive(Debug, Clone, PartialEq)]
pub enum CodeNode {
    /// `new Class(arg, ...)`
    NewInstance { class: String, args: Vec<MetaValue> },
    /// `() => import.meta.glob("path", { eager: true })`
    LazyImport { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Undefined,
    Null,
    Bool(bool),
    Number(i64),
    Str(String),
    Array(Vec<MetaValue>),
    Object(IndexMap<String, MetaValue>),
    Node(CodeNode),
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<Option<String>> for MetaValue {
    fn from(value: Option<String>) -> Self {
        value.map(MetaValue::Str).unwrap_or(MetaValue::Undefined)
    }
}

impl From<CodeNode> for MetaValue {
    fn from(value: CodeNode) -> Self {
        MetaValue::Node(value)
    }
}

impl MetaValue {
    /// Build an object literal, keeping the given key order
    pub fn object<I, K>(entries: I) -> MetaValue
    where
        I: IntoIterator<Item = (K, MetaValue)>,
        K: Into<String>,
    {
        MetaValue::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn new_instance(class: impl Into<String>, args: Vec<MetaValue>) -> MetaValue {
        MetaValue::Node(CodeNode::NewInstance {
            class: class.into(),
            args,
        })
    }

    pub fn lazy_import(path: impl Into<String>) -> MetaValue {
        MetaValue::Node(CodeNode::LazyImport { path: path.into() })
    }

    fn is_scalar(&self) -> bool {
        matches!(
            self,
            MetaValue::Undefined
                | MetaValue::Null
                | MetaValue::Bool(_)
                | MetaValue::Number(_)
                | MetaValue::Str(_)
        )
    }

    /// Render as TypeScript source at top-level indentation
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.emit(0, &mut out);
        out
    }

    pub(crate) fn emit(&self, depth: usize, out: &mut String) {
        match self {
            MetaValue::Undefined => out.push_str("undefined"),
            MetaValue::Null => out.push_str("null"),
            MetaValue::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            MetaValue::Number(value) => out.push_str(&value.to_string()),
            MetaValue::Str(value) => out.push_str(&quote(value)),
            MetaValue::Array(items) => emit_array(items, depth, out),
            MetaValue::Object(entries) => emit_object(entries, depth, out),
            MetaValue::Node(node) => emit_node(node, depth, out),
        }
    }
}

/// JSON-escaped, double-quoted string literal
pub fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

/// Object keys are written bare when they are valid identifiers
pub fn property_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn emit_array(items: &[MetaValue], depth: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }

    // Arrays of plain scalars stay on one line
    if items.iter().all(MetaValue::is_scalar) {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            item.emit(depth, out);
        }
        out.push(']');
        return;
    }

    out.push_str("[\n");
    for (i, item) in items.iter().enumerate() {
        push_indent(depth + 1, out);
        item.emit(depth + 1, out);
        if i + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(depth, out);
    out.push(']');
}

fn emit_object(entries: &IndexMap<String, MetaValue>, depth: usize, out: &mut String) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }

    out.push_str("{\n");
    for (i, (key, value)) in entries.iter().enumerate() {
        push_indent(depth + 1, out);
        out.push_str(&property_key(key));
        out.push_str(": ");
        value.emit(depth + 1, out);
        if i + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(depth, out);
    out.push('}');
}

fn emit_node(node: &CodeNode, depth: usize, out: &mut String) {
    match node {
        CodeNode::NewInstance { class, args } => {
            out.push_str("new ");
            out.push_str(class);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                arg.emit(depth, out);
            }
            out.push(')');
        }
        CodeNode::LazyImport { path } => {
            out.push_str("() => import.meta.glob(");
            out.push_str(&quote(path));
            out.push_str(", { eager: true })");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(MetaValue::Undefined.render(), "undefined");
        assert_eq!(MetaValue::Null.render(), "null");
        assert_eq!(MetaValue::Bool(true).render(), "true");
        assert_eq!(MetaValue::Number(-3).render(), "-3");
        assert_eq!(MetaValue::from("a \"b\"\n").render(), r#""a \"b\"\n""#);
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let value = MetaValue::object([
            ("zeta", MetaValue::from("z")),
            ("alpha", MetaValue::Bool(false)),
            ("needs-quotes", MetaValue::Null),
        ]);

        assert_eq!(
            value.render(),
            "{\n    zeta: \"z\",\n    alpha: false,\n    \"needs-quotes\": null\n}"
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(MetaValue::Array(vec![]).render(), "[]");
        assert_eq!(MetaValue::Object(IndexMap::new()).render(), "{}");
    }

    #[test]
    fn test_scalar_array_is_inline() {
        let value = MetaValue::Array(vec!["a".into(), "b".into()]);
        assert_eq!(value.render(), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_code_nodes_are_not_quoted() {
        let value = MetaValue::object([
            ("module", MetaValue::lazy_import("../UserStore.ts")),
            (
                "meta",
                MetaValue::new_instance(
                    "StoreMetaGetterSetterData",
                    vec!["getter".into(), MetaValue::object([("n", "count".into())])],
                ),
            ),
        ]);

        assert_eq!(
            value.render(),
            concat!(
                "{\n",
                "    module: () => import.meta.glob(\"../UserStore.ts\", { eager: true }),\n",
                "    meta: new StoreMetaGetterSetterData(\"getter\", {\n",
                "        n: \"count\"\n",
                "    })\n",
                "}"
            )
        );
    }

    #[test]
    fn test_nested_array_of_objects_indents() {
        let value = MetaValue::Array(vec![MetaValue::object([("n", "x".into())])]);
        assert_eq!(value.render(), "[\n    {\n        n: \"x\"\n    }\n]");
    }

    #[test]
    fn test_optional_string_maps_to_undefined() {
        assert_eq!(MetaValue::from(None::<String>).render(), "undefined");
        assert_eq!(MetaValue::from(Some("10".to_string())).render(), "\"10\"");
    }
}
