//! A format-preserving JSON toolkit.
//!
//! Parsing produces a tree that retains every byte of insignificant structure —
//! whitespace, `//` and `/* */` comments, comma placement, quote style, and the
//! original spelling of numbers — so that writing the tree back out reproduces the
//! source exactly. On top of that tree sit a minimal path-query language and a
//! structural merge that keeps the surviving document's formatting intact.
//!
//! ```
//! use verbatim_json::Document;
//!
//! let source = "{ 'kind': \"greeting\", \"count\": 2 } // a comment";
//! let document = Document::from_str(source).unwrap();
//!
//! // lossless round-trip
//! assert_eq!(document.write(), source);
//!
//! // path queries
//! assert_eq!(document.get("$.kind").unwrap(), "greeting");
//! assert_eq!(document.get("$.count").unwrap(), "2.000000");
//! ```

pub mod ast;
pub mod coords;
pub mod document;
pub mod errors;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod paths;
pub mod writer;

pub use crate::ast::{RootNode, RootType};
pub use crate::document::Document;
pub use crate::errors::{Details, Error, ParserResult, Stage};

/// Parse source text into a format-preserving tree
pub fn parse(source: &str) -> ParserResult<RootNode> {
    parser::Parser::new(source).parse()
}

/// Render a tree back into text; the exact inverse of [parse] for parser-produced
/// trees
pub fn write(root: &RootNode) -> String {
    writer::write(root)
}
