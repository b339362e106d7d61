//! The document client: a parsed tree together with the source buffer it came from.
//!
//! Object and array nodes record byte spans into the original source, which is how
//! a query for a nested container returns the verbatim sub-document without
//! re-serialising it. [Document] keeps the buffer and the tree side by side so
//! those spans stay meaningful for the lifetime of every query.

use std::fs;
use std::path::Path;

use crate::ast::{Array, Content, LiteralValue, Object, RootNode};
use crate::errors::{Details, ParserResult};
use crate::parser::Parser;
use crate::parser_error;
use crate::paths::{scan_path, PathComponent};
use crate::query_error;
use crate::{merge, writer};

/// A parsed document and the source text it was parsed from. Once constructed the
/// tree is read-only: queries never mutate it, and merging produces fresh output.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    root: RootNode,
}

/// Cursor over the container currently being traversed by a query
#[derive(Copy, Clone)]
enum Cursor<'a> {
    Object(&'a Object),
    Array(&'a Array),
}

impl Document {
    /// Parse a document from a string slice
    pub fn from_str(source: &str) -> ParserResult<Document> {
        let root = Parser::new(source).parse()?;
        Ok(Document {
            source: source.to_string(),
            root,
        })
    }

    /// Parse a document from a byte buffer, which must hold valid UTF-8
    pub fn from_bytes(bytes: &[u8]) -> ParserResult<Document> {
        match std::str::from_utf8(bytes) {
            Ok(source) => Self::from_str(source),
            Err(_) => parser_error!(Details::NonUtf8Input),
        }
    }

    /// Parse a document directly from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ParserResult<Document> {
        match fs::read(path.as_ref()) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(_) => parser_error!(Details::InvalidFile),
        }
    }

    /// The parsed tree
    pub fn root(&self) -> &RootNode {
        &self.root
    }

    /// The original source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the tree back into text. For an unmodified document this reproduces
    /// the source byte-for-byte.
    pub fn write(&self) -> String {
        writer::write(&self.root)
    }

    /// Execute a path query and return the textual result: strings raw, booleans
    /// and nulls as their literal text, numbers in fixed six-fractional-digit form,
    /// and nested containers as the verbatim source slice they occupy
    pub fn get(&self, query: &str) -> ParserResult<String> {
        let components = scan_path(query, self.root.root_type)?;
        self.execute(&components)
    }

    /// Alias for [Document::get], named for the shape of the result
    pub fn get_string(&self, query: &str) -> ParserResult<String> {
        self.get(query)
    }

    /// Execute a path query and convert the result to a boolean
    pub fn get_bool(&self, query: &str) -> ParserResult<bool> {
        let result = self.get(query)?;
        match result.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => query_error!(Details::ValueConversion {
                wanted: "a boolean",
                found: result,
            }),
        }
    }

    /// Execute a path query and convert the result to a float
    pub fn get_float(&self, query: &str) -> ParserResult<f64> {
        let result = self.get(query)?;
        match result.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => query_error!(Details::ValueConversion {
                wanted: "a float",
                found: result,
            }),
        }
    }

    /// Merge another document into this one and render the result. This document's
    /// formatting wins for everything it already holds; additions keep the incoming
    /// document's formatting.
    pub fn merge(&self, incoming: &Document) -> ParserResult<String> {
        let merged = merge::merge(&self.root, &incoming.root)?;
        Ok(writer::write(&merged))
    }

    fn execute(&self, components: &[PathComponent]) -> ParserResult<String> {
        let mut cursor = match &self.root.value.content {
            Content::Object(object) => Cursor::Object(object),
            Content::Array(array) => Cursor::Array(array),
            Content::Literal(_) => {
                return query_error!(Details::TraversalIntoLiteral("$".to_string()))
            }
        };
        let mut path = String::from("$");
        for (i, component) in components.iter().enumerate() {
            // resolve the target of this step before deciding whether to descend
            let content = match (component, cursor) {
                (PathComponent::Name(key), Cursor::Object(object)) => {
                    match object.children.iter().find(|p| p.key.name == *key) {
                        Some(property) => &property.value.content,
                        None => return query_error!(Details::KeyNotFound(key.clone())),
                    }
                }
                (PathComponent::Name(_), Cursor::Array(_)) => {
                    return query_error!(Details::AccessMismatch {
                        selector: "a key",
                        node: "an array",
                    })
                }
                (PathComponent::Index(index), Cursor::Array(array)) => {
                    match array.children.get(*index) {
                        Some(item) => &item.value,
                        None => {
                            return query_error!(Details::IndexOutOfRange {
                                index: *index,
                                len: array.children.len(),
                            })
                        }
                    }
                }
                (PathComponent::Index(_), Cursor::Object(_)) => {
                    return query_error!(Details::AccessMismatch {
                        selector: "an index",
                        node: "an object",
                    })
                }
            };
            path.push_str(&component.to_string());
            if i == components.len() - 1 {
                return Ok(self.format_content(content));
            }
            cursor = match content {
                Content::Object(object) => Cursor::Object(object),
                Content::Array(array) => Cursor::Array(array),
                Content::Literal(_) => {
                    return query_error!(Details::TraversalIntoLiteral(path))
                }
            };
        }
        query_error!(Details::IncompleteSelector)
    }

    fn format_content(&self, content: &Content) -> String {
        match content {
            Content::Literal(literal) => match &literal.value {
                LiteralValue::String(value) => value.clone(),
                LiteralValue::Boolean(value) => value.to_string(),
                LiteralValue::Null => "null".to_string(),
                LiteralValue::Integer(value) => format!("{:.6}", *value as f64),
                LiteralValue::Float(value) => format!("{:.6}", value),
            },
            Content::Object(object) => self.source[object.span.start..object.span.end].to_string(),
            Content::Array(array) => self.source[array.span.start..array.span.end].to_string(),
        }
    }
}
