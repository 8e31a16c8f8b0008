// Tree-sitter backing for the SyntaxNode trait
//
// The only place in the crate that knows tree-sitter-typescript node and field names.

use super::ast::{Accessibility, AccessorKind, Field, Span, SyntaxKind, SyntaxNode};
use tree_sitter::Node;

/// A tree-sitter node paired with the source it was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> TsNode<'a> {
    pub fn new(node: Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    pub fn has_error(&self) -> bool {
        self.node.has_error() || self.node.kind() == "ERROR"
    }

    fn wrap(&self, node: Node<'a>) -> Self {
        Self {
            node,
            source: self.source,
        }
    }
}

fn map_kind(kind: &str) -> SyntaxKind {
    match kind {
        "program" => SyntaxKind::Program,
        "export_statement" => SyntaxKind::ExportStatement,
        "class_declaration" => SyntaxKind::ClassDeclaration,
        "class_body" => SyntaxKind::ClassBody,
        "class_heritage" => SyntaxKind::ClassHeritage,
        "extends_clause" => SyntaxKind::ExtendsClause,
        "method_definition" => SyntaxKind::MethodDefinition,
        "public_field_definition" | "field_definition" => SyntaxKind::FieldDefinition,
        "decorator" => SyntaxKind::Decorator,
        "call_expression" => SyntaxKind::CallExpression,
        "member_expression" => SyntaxKind::MemberExpression,
        "new_expression" => SyntaxKind::NewExpression,
        "arguments" => SyntaxKind::Arguments,
        "identifier" => SyntaxKind::Identifier,
        "type_identifier" => SyntaxKind::TypeIdentifier,
        "property_identifier" => SyntaxKind::PropertyIdentifier,
        "private_property_identifier" => SyntaxKind::PrivatePropertyIdentifier,
        "computed_property_name" => SyntaxKind::ComputedPropertyName,
        "formal_parameters" => SyntaxKind::FormalParameters,
        "required_parameter" => SyntaxKind::RequiredParameter,
        "optional_parameter" => SyntaxKind::OptionalParameter,
        "type_annotation" => SyntaxKind::TypeAnnotation,
        "statement_block" => SyntaxKind::StatementBlock,
        "return_statement" => SyntaxKind::ReturnStatement,
        "parenthesized_expression" => SyntaxKind::ParenthesizedExpression,
        "as_expression" | "satisfies_expression" => SyntaxKind::AsExpression,
        "object" => SyntaxKind::Object,
        "pair" => SyntaxKind::Pair,
        "shorthand_property_identifier" => SyntaxKind::ShorthandProperty,
        "spread_element" => SyntaxKind::SpreadElement,
        "string" => SyntaxKind::String,
        "number" => SyntaxKind::Number,
        "true" => SyntaxKind::True,
        "false" => SyntaxKind::False,
        "template_string" => SyntaxKind::TemplateString,
        "lexical_declaration" => SyntaxKind::LexicalDeclaration,
        "variable_declaration" => SyntaxKind::VariableDeclaration,
        "variable_declarator" => SyntaxKind::VariableDeclarator,
        "function_declaration" | "generator_function_declaration" => {
            SyntaxKind::FunctionDeclaration
        }
        "function_signature" => SyntaxKind::FunctionSignature,
        "function_expression" | "function" | "generator_function" => {
            SyntaxKind::FunctionExpression
        }
        "arrow_function" => SyntaxKind::ArrowFunction,
        "function_type" => SyntaxKind::FunctionType,
        "ambient_declaration" => SyntaxKind::AmbientDeclaration,
        "comment" => SyntaxKind::Comment,
        _ => SyntaxKind::Other,
    }
}

fn field_name(field: Field) -> &'static str {
    match field {
        Field::Name => "name",
        Field::Body => "body",
        Field::Value => "value",
        Field::Function => "function",
        Field::Arguments => "arguments",
        Field::Constructor => "constructor",
        Field::Parameters => "parameters",
        Field::Parameter => "parameter",
        Field::Pattern => "pattern",
        Field::Type => "type",
        Field::Declaration => "declaration",
        Field::Key => "key",
        Field::Object => "object",
        Field::Property => "property",
    }
}

impl<'a> SyntaxNode<'a> for TsNode<'a> {
    fn kind(&self) -> SyntaxKind {
        map_kind(self.node.kind())
    }

    fn span(&self) -> Span {
        Span::new(self.node.start_byte(), self.node.end_byte())
    }

    fn text(&self) -> &'a str {
        let source: &'a str = self.source;
        source
            .get(self.node.start_byte()..self.node.end_byte())
            .unwrap_or("")
    }

    fn field(&self, field: Field) -> Option<Self> {
        self.node
            .child_by_field_name(field_name(field))
            .map(|node| self.wrap(node))
    }

    fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| self.wrap(child))
            .collect()
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        let mut cursor = self.node.walk();
        let found = self
            .node
            .children(&mut cursor)
            .any(|child| !child.is_named() && child.kind() == keyword);
        found
    }

    fn accessibility(&self) -> Option<Accessibility> {
        let mut cursor = self.node.walk();
        let modifier = self
            .node
            .children(&mut cursor)
            .find(|child| child.kind() == "accessibility_modifier")?;

        match self.wrap(modifier).text().trim() {
            "public" => Some(Accessibility::Public),
            "private" => Some(Accessibility::Private),
            "protected" => Some(Accessibility::Protected),
            _ => None,
        }
    }

    fn accessor(&self) -> Option<AccessorKind> {
        if self.node.kind() != "method_definition" {
            return None;
        }
        if self.has_keyword("get") {
            Some(AccessorKind::Get)
        } else if self.has_keyword("set") {
            Some(AccessorKind::Set)
        } else {
            None
        }
    }

    fn decorators(&self) -> Vec<Self> {
        let mut found = Vec::new();

        // Inside a class body, method decorators are parsed as the member's preceding siblings
        let in_class_body = self
            .node
            .parent()
            .map(|parent| parent.kind() == "class_body")
            .unwrap_or(false);
        if in_class_body {
            let mut sibling = self.node.prev_named_sibling();
            while let Some(node) = sibling {
                match node.kind() {
                    "decorator" => found.push(self.wrap(node)),
                    "comment" => {}
                    _ => break,
                }
                sibling = node.prev_named_sibling();
            }
            found.reverse();
        }

        let mut cursor = self.node.walk();
        for child in self.node.named_children(&mut cursor) {
            if child.kind() == "decorator" {
                found.push(self.wrap(child));
            }
        }

        found
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(|node| self.wrap(node))
    }
}
