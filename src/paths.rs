//! Path-query scanning.
//!
//! The query dialect is deliberately minimal: a mandatory `$` root followed by any
//! sequence of `.key` and `[index]` steps. No wildcard, slice or recursive-descent
//! operators. The first step must agree with the document's root type, which the
//! scanner validates up front so that execution never starts from a dead end.

use std::fmt::Display;

use crate::ast::RootType;
use crate::errors::{Details, ParserResult};
use crate::query_error;

/// One parsed step of a path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    /// A key selection on an object, e.g. `.name`
    Name(String),
    /// An index selection on an array, e.g. `[2]`
    Index(usize),
}

impl Display for PathComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, ".{}", name),
            Self::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A key may be made of letters, digits and underscores
fn is_property_key(char: u8) -> bool {
    char.is_ascii_alphanumeric() || char == b'_'
}

/// Render the character at a byte offset for an error message, or a marker once the
/// query has run out
fn char_at(query: &str, offset: usize) -> String {
    query[offset..]
        .chars()
        .next()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "end of query".to_string())
}

/// Scan a query string into an ordered sequence of [PathComponent]s, validating the
/// `$` root and the agreement between the first selector and the document root type
pub fn scan_path(query: &str, root_type: RootType) -> ParserResult<Vec<PathComponent>> {
    let bytes = query.as_bytes();
    if bytes.first() != Some(&b'$') {
        return query_error!(Details::MissingRootSelector);
    }
    match root_type {
        RootType::Object => {
            if bytes.get(1) != Some(&b'.') {
                return query_error!(Details::WrongObjectRootSelector);
            }
        }
        RootType::Array => {
            if bytes.get(1) != Some(&b'[') {
                return query_error!(Details::WrongArrayRootSelector);
            }
        }
    }

    let mut components = vec![];
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                i += 1;
                let start = i;
                while i < bytes.len() && is_property_key(bytes[i]) {
                    i += 1;
                }
                if i == start {
                    return query_error!(Details::InvalidObjectSelector(char_at(query, i)));
                }
                components.push(PathComponent::Name(query[start..i].to_string()));
            }
            b'[' => {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i == start {
                    return query_error!(Details::InvalidArraySelector(char_at(query, i)));
                }
                if bytes.get(i) != Some(&b']') {
                    return query_error!(Details::IncompleteSelector);
                }
                let index = match query[start..i].parse::<usize>() {
                    Ok(index) => index,
                    Err(_) => {
                        return query_error!(Details::InvalidArraySelector(
                            query[start..i].to_string()
                        ))
                    }
                };
                components.push(PathComponent::Index(index));
                i += 1;
            }
            _ => return query_error!(Details::SelectorSyntax(char_at(query, i))),
        }
    }

    Ok(components)
}
