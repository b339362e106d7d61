//! The parser: consumes tokens and builds the format-preserving tree.
//!
//! Each construct (object, array, property) is driven by its own explicit state
//! enumeration rather than implicit recursion state. Whitespace and comment tokens
//! encountered between meaningful tokens are never discarded: they are routed into
//! the [Structure] slot that is open at that point, which is the mechanism that
//! makes `write(parse(text)) == text` hold.
//!
//! Errors are accumulated rather than short-circuited whilst members are being
//! parsed, so several syntax problems can be reported jointly; the root entry point
//! fails once no value could be produced at all, or once any error was recorded.

use crate::ast::{
    Array, ArrayItem, Content, Identifier, Literal, LiteralValue, Object, Property, RootNode,
    RootType, Structure, StructuralItem, Value,
};
use crate::errors::{Details, Error, ParserResult, Stage};
use crate::lexer::{IllegalReason, Lexer, Token, TokenKind};

/// States for the object construct: `{` → properties separated by commas → `}`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ObjectState {
    Start,
    Open,
    Property,
    Comma,
}

/// States for the array construct: `[` → items separated by commas → `]`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ArrayState {
    Start,
    Open,
    Value,
    Comma,
}

/// States for the property construct: key → `:` → value
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PropertyState {
    Start,
    Key,
    Colon,
}

/// Main parser struct. Owns its [Lexer] and pumps one token of lookahead through
/// [Parser::next_token]; every parse call owns an independent instance, so two
/// parses never share state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    errors: Vec<Error>,
}

impl<'a> Parser<'a> {
    /// Construct a parser over the given source text, priming the current token
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            errors: vec![],
        }
    }

    /// Parse a complete document. The leading structure becomes the root value's
    /// prefix, everything after its payload (through end of input) becomes its
    /// suffix, and a leftover non-structural token is an error: nothing is ever
    /// silently dropped.
    pub fn parse(mut self) -> ParserResult<RootNode> {
        let prefix = self.collect_structure();
        let root_type = if self.current.kind == TokenKind::LeftBracket {
            RootType::Array
        } else {
            RootType::Object
        };
        match self.parse_content() {
            Some(content) => {
                let suffix = self.collect_structure();
                if self.current.kind != TokenKind::EndOfInput {
                    self.record(Details::UnexpectedToken {
                        expected: "end of input",
                        found: self.current.describe(),
                    });
                }
                if !self.errors.is_empty() {
                    return Err(self.into_aggregate());
                }
                Ok(RootNode {
                    value: Value {
                        prefix,
                        content,
                        suffix,
                    },
                    root_type,
                })
            }
            None => {
                self.record(Details::NoRootValue);
                Err(self.into_aggregate())
            }
        }
    }

    fn next_token(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn record(&mut self, details: Details) {
        self.errors.push(Error {
            stage: Stage::Parser,
            details,
            line: Some(self.current.line),
        });
    }

    /// Map an [TokenKind::Illegal] token onto the corresponding lexical error
    fn record_illegal(&mut self, reason: IllegalReason) {
        let details = match reason {
            IllegalReason::UnknownCharacter => Details::IllegalCharacter(
                self.current.literal.chars().next().unwrap_or('\u{fffd}'),
            ),
            IllegalReason::UnterminatedString => Details::UnterminatedString,
            IllegalReason::UnterminatedBlockComment => Details::UnterminatedBlockComment,
            IllegalReason::InvalidCommentStart => Details::InvalidCommentStart,
            IllegalReason::UnrecognisedIdentifier => {
                Details::UnrecognisedIdentifier(self.current.literal.clone())
            }
        };
        self.errors.push(Error {
            stage: Stage::Lexer,
            details,
            line: Some(self.current.line),
        });
    }

    fn into_aggregate(mut self) -> Error {
        if self.errors.len() == 1 {
            return self.errors.remove(0);
        }
        Error {
            stage: Stage::Parser,
            details: Details::Multiple(self.errors),
            line: None,
        }
    }

    /// Gather consecutive whitespace/comment tokens into the currently open slot,
    /// re-attaching comment delimiters so each item holds its verbatim source text
    fn collect_structure(&mut self) -> Structure {
        let mut items = Structure::new();
        loop {
            match self.current.kind {
                TokenKind::Whitespace => {
                    items.push(StructuralItem::whitespace(self.current.literal.clone()));
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    let mut text = String::from(self.current.prefix.unwrap_or_default());
                    text.push_str(&self.current.literal);
                    text.push_str(self.current.suffix.unwrap_or_default());
                    items.push(StructuralItem::comment(text));
                }
                _ => return items,
            }
            self.next_token();
        }
    }

    /// Dynamic entry point for any value payload: all parsing scenarios dispatch
    /// through these arms
    fn parse_content(&mut self) -> Option<Content> {
        match self.current.kind {
            TokenKind::LeftBrace => self.parse_object().map(Content::Object),
            TokenKind::LeftBracket => self.parse_array().map(Content::Array),
            TokenKind::Str
            | TokenKind::Number
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => self.parse_literal().map(Content::Literal),
            TokenKind::Illegal(reason) => {
                self.record_illegal(reason);
                None
            }
            _ => {
                self.record(Details::UnexpectedToken {
                    expected: "a value",
                    found: self.current.describe(),
                });
                None
            }
        }
    }

    /// Resolve a literal token into a [Literal] node and consume it. Number tokens
    /// attempt an integer parse first and fall back to a float parse; the raw text
    /// is always retained so the writer can reproduce the original spelling.
    fn parse_literal(&mut self) -> Option<Literal> {
        let literal = match self.current.kind {
            TokenKind::Str => Literal {
                value: LiteralValue::String(self.current.literal.clone()),
                delimiter: self.current.delimiter(),
                original_rendering: None,
            },
            TokenKind::Number => {
                let text = self.current.literal.clone();
                let value = match parse_integer(&text) {
                    Some(i) => LiteralValue::Integer(i),
                    None => match fast_float::parse::<f64, _>(text.as_bytes()) {
                        Ok(f) => LiteralValue::Float(f),
                        Err(_) => {
                            self.record(Details::InvalidNumericRepresentation(text));
                            return None;
                        }
                    },
                };
                Literal {
                    value,
                    delimiter: None,
                    original_rendering: Some(text),
                }
            }
            TokenKind::True => Literal {
                value: LiteralValue::Boolean(true),
                delimiter: None,
                original_rendering: None,
            },
            TokenKind::False => Literal {
                value: LiteralValue::Boolean(false),
                delimiter: None,
                original_rendering: None,
            },
            _ => Literal {
                value: LiteralValue::Null,
                delimiter: None,
                original_rendering: None,
            },
        };
        self.next_token();
        Some(literal)
    }

    /// Parse an object, called with the current token on `{`. Comma tokens mark the
    /// preceding property's separator flag; reaching end of input in any state
    /// before the closing brace is a hard error.
    fn parse_object(&mut self) -> Option<Object> {
        let mut object = Object::default();
        let mut state = ObjectState::Start;
        loop {
            match state {
                ObjectState::Start => {
                    if self.current.kind != TokenKind::LeftBrace {
                        self.record(Details::UnexpectedToken {
                            expected: "'{'",
                            found: self.current.describe(),
                        });
                        return None;
                    }
                    object.span.start = self.current.span.start;
                    self.next_token();
                    state = ObjectState::Open;
                }
                ObjectState::Open => {
                    let structure = self.collect_structure();
                    if self.current.kind == TokenKind::RightBrace {
                        object.suffix = structure;
                        object.span.end = self.current.span.end;
                        self.next_token();
                        return Some(object);
                    }
                    let property = self.parse_property(structure)?;
                    object.children.push(property);
                    state = ObjectState::Property;
                }
                ObjectState::Property => match self.current.kind {
                    TokenKind::RightBrace => {
                        object.span.end = self.current.span.end;
                        self.next_token();
                        return Some(object);
                    }
                    TokenKind::Comma => {
                        if let Some(last) = object.children.last_mut() {
                            last.has_comma_separator = true;
                        }
                        self.next_token();
                        state = ObjectState::Comma;
                    }
                    _ => {
                        self.record(Details::UnexpectedToken {
                            expected: "',' or '}'",
                            found: self.current.describe(),
                        });
                        return None;
                    }
                },
                ObjectState::Comma => {
                    let structure = self.collect_structure();
                    if self.current.kind == TokenKind::RightBrace {
                        // trailing comma: the gathered structure belongs to the object
                        object.suffix = structure;
                        object.span.end = self.current.span.end;
                        self.next_token();
                        return Some(object);
                    }
                    let property = self.parse_property(structure)?;
                    object.children.push(property);
                    state = ObjectState::Property;
                }
            }
        }
    }

    /// Parse a single `key: value` property. The structure gathered by the caller
    /// (between `{`/`,` and the key) arrives as the key's prefix slot.
    fn parse_property(&mut self, key_prefix: Structure) -> Option<Property> {
        let mut key = Identifier {
            prefix: key_prefix,
            name: String::new(),
            delimiter: '"',
            suffix: Structure::new(),
        };
        let mut state = PropertyState::Start;
        loop {
            match state {
                PropertyState::Start => match self.current.kind {
                    TokenKind::Str => {
                        key.name = self.current.literal.clone();
                        if let Some(delimiter) = self.current.delimiter() {
                            key.delimiter = delimiter;
                        }
                        self.next_token();
                        state = PropertyState::Key;
                    }
                    TokenKind::Illegal(reason) => {
                        self.record_illegal(reason);
                        return None;
                    }
                    _ => {
                        self.record(Details::UnexpectedToken {
                            expected: "a property key",
                            found: self.current.describe(),
                        });
                        return None;
                    }
                },
                PropertyState::Key => {
                    key.suffix = self.collect_structure();
                    if self.current.kind != TokenKind::Colon {
                        self.record(Details::UnexpectedToken {
                            expected: "':'",
                            found: self.current.describe(),
                        });
                        return None;
                    }
                    self.next_token();
                    state = PropertyState::Colon;
                }
                PropertyState::Colon => {
                    let value = self.parse_value()?;
                    return Some(Property {
                        key,
                        value,
                        has_comma_separator: false,
                    });
                }
            }
        }
    }

    /// Parse a fully wrapped value: structure before the payload, the payload, and
    /// the structure after it (up to the next separator or close)
    fn parse_value(&mut self) -> Option<Value> {
        let prefix = self.collect_structure();
        let content = self.parse_content()?;
        let suffix = self.collect_structure();
        Some(Value {
            prefix,
            content,
            suffix,
        })
    }

    /// Parse an array, called with the current token on `[`; the same comma-marking
    /// discipline as objects, operating on [ArrayItem]s
    fn parse_array(&mut self) -> Option<Array> {
        let mut array = Array::default();
        let mut state = ArrayState::Start;
        loop {
            match state {
                ArrayState::Start => {
                    if self.current.kind != TokenKind::LeftBracket {
                        self.record(Details::UnexpectedToken {
                            expected: "'['",
                            found: self.current.describe(),
                        });
                        return None;
                    }
                    array.span.start = self.current.span.start;
                    self.next_token();
                    state = ArrayState::Open;
                }
                ArrayState::Open => {
                    let structure = self.collect_structure();
                    if self.current.kind == TokenKind::RightBracket {
                        array.suffix = structure;
                        array.span.end = self.current.span.end;
                        self.next_token();
                        return Some(array);
                    }
                    let item = self.parse_array_item(structure)?;
                    array.children.push(item);
                    state = ArrayState::Value;
                }
                ArrayState::Value => match self.current.kind {
                    TokenKind::RightBracket => {
                        array.span.end = self.current.span.end;
                        self.next_token();
                        return Some(array);
                    }
                    TokenKind::Comma => {
                        if let Some(last) = array.children.last_mut() {
                            last.has_comma_separator = true;
                        }
                        self.next_token();
                        state = ArrayState::Comma;
                    }
                    _ => {
                        self.record(Details::UnexpectedToken {
                            expected: "',' or ']'",
                            found: self.current.describe(),
                        });
                        return None;
                    }
                },
                ArrayState::Comma => {
                    let structure = self.collect_structure();
                    if self.current.kind == TokenKind::RightBracket {
                        // trailing comma: the gathered structure belongs to the array
                        array.suffix = structure;
                        array.span.end = self.current.span.end;
                        self.next_token();
                        return Some(array);
                    }
                    let item = self.parse_array_item(structure)?;
                    array.children.push(item);
                    state = ArrayState::Value;
                }
            }
        }
    }

    fn parse_array_item(&mut self, prefix: Structure) -> Option<ArrayItem> {
        let value = self.parse_content()?;
        let suffix = self.collect_structure();
        Some(ArrayItem {
            prefix,
            value,
            suffix,
            has_comma_separator: false,
        })
    }
}

/// Attempt an integer parse of a number literal
#[cfg(feature = "mixed_numerics")]
fn parse_integer(text: &str) -> Option<i64> {
    lexical::parse::<i64, _>(text.as_bytes()).ok()
}

/// Attempt an integer parse of a number literal
#[cfg(not(feature = "mixed_numerics"))]
fn parse_integer(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::ast::{Content, LiteralValue, RootNode, RootType, StructuralKind};
    use crate::errors::{Details, ParserResult};

    fn parse(input: &str) -> ParserResult<RootNode> {
        Parser::new(input).parse()
    }

    #[test]
    fn should_detect_root_types() {
        assert_eq!(parse(r#"{"a": 1}"#).unwrap().root_type, RootType::Object);
        assert_eq!(parse("[1, 2]").unwrap().root_type, RootType::Array);
    }

    #[test]
    fn should_build_object_properties_in_order() {
        let root = parse(r#"{"a": 1, "b": 2}"#).unwrap();
        let object = match root.value.content {
            Content::Object(object) => object,
            content => panic!("expected an object, got {content:?}"),
        };
        assert_eq!(object.children.len(), 2);
        assert_eq!(object.children[0].key.name, "a");
        assert!(object.children[0].has_comma_separator);
        assert_eq!(object.children[1].key.name, "b");
        assert!(!object.children[1].has_comma_separator);
    }

    #[test]
    fn should_record_object_spans_over_the_braces() {
        let input = r#"  {"a": 1}  "#;
        let root = parse(input).unwrap();
        match root.value.content {
            Content::Object(object) => {
                assert_eq!(&input[object.span.start..object.span.end], r#"{"a": 1}"#);
            }
            content => panic!("expected an object, got {content:?}"),
        }
    }

    #[test]
    fn should_route_structure_into_the_open_slot() {
        let root = parse("{ /* note */ \"a\" : 1 ,\n\"b\": 2 }").unwrap();
        let object = match root.value.content {
            Content::Object(object) => object,
            content => panic!("expected an object, got {content:?}"),
        };
        let first = &object.children[0];
        assert_eq!(first.key.prefix.len(), 3);
        assert_eq!(first.key.prefix[1].kind, StructuralKind::Comment);
        assert_eq!(first.key.prefix[1].text, "/* note */");
        assert_eq!(first.key.suffix[0].text, " ");
        assert_eq!(first.value.prefix[0].text, " ");
        assert_eq!(first.value.suffix[0].text, " ");
        let second = &object.children[1];
        assert_eq!(second.key.prefix[0].text, "\n");
        assert_eq!(second.value.suffix[0].text, " ");
        assert!(object.suffix.is_empty());
    }

    #[test]
    fn should_handle_trailing_commas() {
        let root = parse("{\"a\": 1,\n}").unwrap();
        let object = match root.value.content {
            Content::Object(object) => object,
            content => panic!("expected an object, got {content:?}"),
        };
        assert!(object.children[0].has_comma_separator);
        assert_eq!(object.suffix[0].text, "\n");

        let root = parse("[1, 2, ]").unwrap();
        let array = match root.value.content {
            Content::Array(array) => array,
            content => panic!("expected an array, got {content:?}"),
        };
        assert_eq!(array.children.len(), 2);
        assert!(array.children[1].has_comma_separator);
        assert_eq!(array.suffix[0].text, " ");
    }

    #[test]
    fn should_resolve_literals() {
        let root = parse(r#"["s", 42, -1.5, true, false, null]"#).unwrap();
        let array = match root.value.content {
            Content::Array(array) => array,
            content => panic!("expected an array, got {content:?}"),
        };
        let literals: Vec<&LiteralValue> = array
            .children
            .iter()
            .map(|item| match &item.value {
                Content::Literal(literal) => &literal.value,
                content => panic!("expected a literal, got {content:?}"),
            })
            .collect();
        assert_eq!(literals[0], &LiteralValue::String("s".to_string()));
        assert_eq!(literals[1], &LiteralValue::Integer(42));
        assert_eq!(literals[2], &LiteralValue::Float(-1.5));
        assert_eq!(literals[3], &LiteralValue::Boolean(true));
        assert_eq!(literals[4], &LiteralValue::Boolean(false));
        assert_eq!(literals[5], &LiteralValue::Null);
    }

    #[test]
    fn should_retain_the_original_rendering_of_numbers() {
        let root = parse("[1.50, 2.0]").unwrap();
        let array = match root.value.content {
            Content::Array(array) => array,
            content => panic!("expected an array, got {content:?}"),
        };
        match &array.children[0].value {
            Content::Literal(literal) => {
                assert_eq!(literal.original_rendering.as_deref(), Some("1.50"));
            }
            content => panic!("expected a literal, got {content:?}"),
        }
    }

    #[test]
    fn should_preserve_key_delimiters() {
        let root = parse(r#"{'single': 1, "double": 2}"#).unwrap();
        let object = match root.value.content {
            Content::Object(object) => object,
            content => panic!("expected an object, got {content:?}"),
        };
        assert_eq!(object.children[0].key.delimiter, '\'');
        assert_eq!(object.children[1].key.delimiter, '"');
    }

    #[test]
    fn should_fail_on_empty_input() {
        let result = parse("");
        assert!(result.is_err());
    }

    #[test]
    fn should_fail_on_a_missing_colon() {
        let result = parse(r#"{"a" 1}"#);
        assert!(result.is_err());
        let rendered = result.unwrap_err().to_string();
        assert!(rendered.contains("expected ':'"));
    }

    #[test]
    fn should_fail_on_unterminated_objects() {
        assert!(parse(r#"{"a": 1"#).is_err());
        assert!(parse(r#"{"a": "#).is_err());
        assert!(parse("{").is_err());
    }

    #[test]
    fn should_fail_on_malformed_numbers() {
        let result = parse("[1-2]");
        assert!(result.is_err());
        let rendered = result.unwrap_err().to_string();
        assert!(rendered.contains("invalid numeric representation"));
    }

    #[test]
    fn should_fail_on_trailing_garbage() {
        let result = parse(r#"{"a": 1} true"#);
        assert!(result.is_err());
        let rendered = result.unwrap_err().to_string();
        assert!(rendered.contains("expected end of input"));
    }

    #[test]
    fn should_accept_trailing_structure() {
        let root = parse("{\"a\": 1}\n// done\n").unwrap();
        assert_eq!(root.value.suffix.len(), 2);
        assert_eq!(root.value.suffix[1].text, "// done\n");
    }

    #[test]
    fn should_aggregate_multiple_errors() {
        let result = Parser::new("").parse();
        match result {
            Err(error) => match error.details {
                Details::Multiple(errors) => assert!(errors.len() >= 2),
                details => panic!("expected an aggregate error, got {details:?}"),
            },
            Ok(_) => panic!("expected a parse failure"),
        }
    }

    #[test]
    fn should_surface_lexical_failures() {
        let result = parse(r#"{"a": farse}"#);
        assert!(result.is_err());
        let rendered = result.unwrap_err().to_string();
        assert!(rendered.contains("identifier"));
    }
}
