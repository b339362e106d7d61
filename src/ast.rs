//! The format-preserving tree model.
//!
//! Every node in the tree carries the insignificant structure (whitespace and
//! comments) that surrounded it in the source, so that a parse followed by a write
//! reproduces the original text byte-for-byte. The payload of a [Value] is a closed
//! [Content] enumeration, which keeps every consumer of the tree an exhaustive match.

use crate::coords::Span;

/// Classification of a piece of preserved structure
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StructuralKind {
    /// A run of whitespace
    Whitespace,
    /// A line or block comment, delimiters included
    Comment,
}

/// A verbatim chunk of whitespace or comment text. The text holds the complete
/// original bytes (comment delimiters included), so concatenating the items of a
/// slot reproduces the source exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralItem {
    pub kind: StructuralKind,
    pub text: String,
}

impl StructuralItem {
    pub fn whitespace(text: impl Into<String>) -> Self {
        StructuralItem {
            kind: StructuralKind::Whitespace,
            text: text.into(),
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        StructuralItem {
            kind: StructuralKind::Comment,
            text: text.into(),
        }
    }
}

/// An ordered run of [StructuralItem]s filling one attachment slot
pub type Structure = Vec<StructuralItem>;

/// The universal container: structure before the payload, the payload itself, and
/// structure after it. Wrapping every value this way is what lets whole documents,
/// not just object properties, remember their surroundings.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub prefix: Structure,
    pub content: Content,
    pub suffix: Structure,
}

/// The payload of a [Value]
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Object(Object),
    Array(Array),
    Literal(Literal),
}

impl Content {
    /// A short noun for the payload kind, used within error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Content::Object(_) => "an object",
            Content::Array(_) => "an array",
            Content::Literal(_) => "a literal",
        }
    }
}

/// An ordered collection of properties between `{` and `}`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    /// The properties, in source order
    pub children: Vec<Property>,
    /// Structure between the last property (or the `{` when empty) and the `}`
    pub suffix: Structure,
    /// Byte interval covering the object, braces included
    pub span: Span,
}

/// A single `key: value` pair. The four structure slots of a property live on its
/// two children: `key.prefix` (before the key), `key.suffix` (between key and
/// colon), `value.prefix` (between colon and value) and `value.suffix` (after the
/// value, up to the separator or closing brace).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Identifier,
    pub value: Value,
    /// Whether a `,` followed this property in the source
    pub has_comma_separator: bool,
}

/// An object key, remembering which quote character delimited it
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub prefix: Structure,
    /// The key text, exclusive of delimiters
    pub name: String,
    /// The quote character used in the source
    pub delimiter: char,
    pub suffix: Structure,
}

/// An ordered collection of items between `[` and `]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    /// The items, in source order
    pub children: Vec<ArrayItem>,
    /// Structure between the last item (or the `[` when empty) and the `]`
    pub suffix: Structure,
    /// Byte interval covering the array, brackets included
    pub span: Span,
}

/// A single array element with its two structure slots
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub prefix: Structure,
    pub value: Content,
    pub suffix: Structure,
    /// Whether a `,` followed this item in the source
    pub has_comma_separator: bool,
}

/// A scalar value. When [Literal::original_rendering] is present the writer emits it
/// verbatim instead of re-formatting the resolved value: re-formatting a float can
/// change its textual spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    /// The quote character which delimited a string literal
    pub delimiter: Option<char>,
    /// The untouched source text of a number
    pub original_rendering: Option<String>,
}

/// The resolved value of a [Literal]
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

/// Whether a document's top-level value is an object or an array. Path queries
/// validate their first selector against this.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RootType {
    Object,
    Array,
}

/// The root of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    pub value: Value,
    pub root_type: RootType,
}
