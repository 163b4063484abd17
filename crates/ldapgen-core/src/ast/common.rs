//! Common AST types.

use crate::lexer::Span;
use alloc::string::String;

/// Descriptor or OID with source location.
///
/// Schema identifiers are case-insensitive; the text is kept as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Source location.
    pub span: Span,
}

impl Ident {
    /// Create a new identifier.
    #[must_use]
    pub fn new(name: String, span: Span) -> Self {
        Self { name, span }
    }

    /// Check if this identifier is a dotted numeric OID.
    #[must_use]
    pub fn is_numeric_oid(&self) -> bool {
        !self.name.is_empty()
            && self.name.split('.').all(|arc| {
                !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit())
            })
    }
}

/// Quoted string with source location.
///
/// The value has its quotes stripped and internal whitespace runs collapsed
/// to a single space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotedString {
    /// The string content.
    pub value: String,
    /// Source location (excludes quotes).
    pub span: Span,
}

impl QuotedString {
    /// Create a new quoted string.
    #[must_use]
    pub fn new(value: String, span: Span) -> Self {
        Self { value, span }
    }
}
