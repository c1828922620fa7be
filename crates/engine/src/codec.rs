//! Codec seam between the engine and the text representation.
//!
//! The concrete delimited-text codec lives in the io crate; the session
//! only needs parse/serialize plus a structured validation error.

use std::fmt;

use crate::document::Document;

/// Validation failure while parsing structured text: a data record whose
/// field count disagrees with the header. Line numbers are 1-based, so
/// the first data record is line 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {} has {} columns, expected {}.",
            self.line, self.actual, self.expected
        )
    }
}

impl std::error::Error for ParseError {}

/// Parses raw text into a document and serializes a document back to text.
///
/// `parse` is atomic: it returns either a fully valid document or an
/// error, never a partial result. Empty input is a valid empty document.
/// Implementations must uphold the round-trip law
/// `parse(serialize(d)) == d` for documents with non-NUL cell text.
pub trait TextCodec {
    fn parse(&self, text: &str) -> Result<Document, ParseError>;
    fn serialize(&self, doc: &Document) -> String;
}
