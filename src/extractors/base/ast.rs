//! Parser-independent view of a TypeScript syntax tree
//!
//! The store pipeline needs a narrow set of structural queries: node kind, named children,
//! field lookup, span and source text, plus a handful of modifier checks. Any parser that can
//! answer these can drive the matchers in [`crate::extractors::typescript`].

/// Byte range of a node within its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The node kinds the pipeline distinguishes; everything else is `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Program,
    ExportStatement,
    ClassDeclaration,
    ClassBody,
    ClassHeritage,
    ExtendsClause,
    MethodDefinition,
    FieldDefinition,
    Decorator,
    CallExpression,
    MemberExpression,
    NewExpression,
    Arguments,
    Identifier,
    TypeIdentifier,
    PropertyIdentifier,
    PrivatePropertyIdentifier,
    ComputedPropertyName,
    FormalParameters,
    RequiredParameter,
    OptionalParameter,
    TypeAnnotation,
    StatementBlock,
    ReturnStatement,
    ParenthesizedExpression,
    AsExpression,
    Object,
    Pair,
    ShorthandProperty,
    SpreadElement,
    String,
    Number,
    True,
    False,
    TemplateString,
    LexicalDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionSignature,
    FunctionExpression,
    ArrowFunction,
    FunctionType,
    AmbientDeclaration,
    Comment,
    Other,
}

impl SyntaxKind {
    /// Any of the identifier-like leaves that can name a member or binding
    pub fn is_name(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Identifier
                | SyntaxKind::TypeIdentifier
                | SyntaxKind::PropertyIdentifier
                | SyntaxKind::PrivatePropertyIdentifier
        )
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionSignature
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::FunctionType
        )
    }
}

/// Named child slots used by the matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Body,
    Value,
    Function,
    Arguments,
    Constructor,
    Parameters,
    /// Single unparenthesized arrow-function parameter (`x => x`)
    Parameter,
    Pattern,
    Type,
    Declaration,
    Key,
    Object,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Private,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

/// The query surface the structural matchers are written against
pub trait SyntaxNode<'a>: Copy + Sized {
    fn kind(&self) -> SyntaxKind;

    fn span(&self) -> Span;

    /// Source text covered by this node
    fn text(&self) -> &'a str;

    fn field(&self, field: Field) -> Option<Self>;

    /// Named children in source order, comments excluded
    fn named_children(&self) -> Vec<Self>;

    /// True if an anonymous keyword token (`static`, `get`, `async`, ...) is a direct child
    fn has_keyword(&self, keyword: &str) -> bool;

    /// Explicit `public`/`private`/`protected` modifier, if written
    fn accessibility(&self) -> Option<Accessibility>;

    /// `get`/`set` for accessor methods
    fn accessor(&self) -> Option<AccessorKind>;

    /// Decorators attached to this class member, in source order
    fn decorators(&self) -> Vec<Self>;

    fn parent(&self) -> Option<Self>;

    fn is_static(&self) -> bool {
        self.has_keyword("static")
    }

    fn field_text(&self, field: Field) -> Option<&'a str> {
        self.field(field).map(|node| node.text())
    }

    fn first_named_child(&self) -> Option<Self> {
        self.named_children().into_iter().next()
    }

    fn children_of_kind(&self, kind: SyntaxKind) -> Vec<Self> {
        self.named_children()
            .into_iter()
            .filter(|child| child.kind() == kind)
            .collect()
    }

    /// Pre-order walk over this node and all named descendants
    fn walk<F>(&self, visitor: &mut F)
    where
        F: FnMut(Self),
    {
        visitor(*self);
        for child in self.named_children() {
            child.walk(visitor);
        }
    }
}
