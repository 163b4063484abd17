//! Token types and spans.

use super::ByteOffset;
use core::fmt;

/// Span of source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: ByteOffset,
    /// End byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: ByteOffset, end: ByteOffset) -> Self {
        Self { start, end }
    }

    /// Get the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> ByteOffset {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extend this span to cover `other`.
    #[must_use]
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// 1-based line and column of the span start within `source`.
    ///
    /// Columns count bytes, not characters.
    #[must_use]
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = (self.start as usize).min(source.len());
        let before = &source.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        (line, offset - line_start + 1)
    }
}

/// Token with kind and source span.
///
/// The token text is not stored; it is recovered from the source via the
/// span. For quoted values the span excludes the surrounding apostrophes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Location in source text.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Source text covered by this token.
    #[must_use]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source
            .get(self.span.start as usize..self.span.end as usize)
            .unwrap_or("")
    }
}

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // === Special ===
    /// End of input. Also produced after a lexical error.
    Eof = 0,

    // === Statement keywords ===
    /// `attributetype`
    KwAttributeType,
    /// `objectclass`
    KwObjectClass,

    // === Field keywords ===
    /// `NAME`
    KwName,
    /// `DESC`
    KwDesc,
    /// `OBSOLETE`
    KwObsolete,
    /// `SUP`
    KwSup,
    /// `EQUALITY`
    KwEquality,
    /// `ORDERING`
    KwOrdering,
    /// `SUBSTR`
    KwSubstr,
    /// `SYNTAX`
    KwSyntax,
    /// `SINGLE-VALUE`
    KwSingleValue,
    /// `COLLECTIVE`
    KwCollective,
    /// `NO-USER-MODIFICATION`
    KwNoUserModification,
    /// `USAGE`
    KwUsage,
    /// `ABSTRACT`
    KwAbstract,
    /// `STRUCTURAL`
    KwStructural,
    /// `AUXILIARY`
    KwAuxiliary,
    /// `MUST`
    KwMust,
    /// `MAY`
    KwMay,
    /// `X-` prefixed extension keyword.
    Extension,

    // === Punctuation ===
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `$`
    Dollar,

    // === Values ===
    /// Quoted or bare string value.
    String,
    /// Descriptor or OID reference.
    Oid,
    /// Numeric object identifier.
    NumericOid,
}

impl TokenKind {
    /// Check if this kind starts a statement.
    #[must_use]
    pub const fn is_statement_keyword(self) -> bool {
        matches!(self, Self::KwAttributeType | Self::KwObjectClass)
    }

    /// Check if this kind is a field keyword.
    #[must_use]
    pub const fn is_field_keyword(self) -> bool {
        (self as u8) >= (Self::KwName as u8) && (self as u8) <= (Self::Extension as u8)
    }

    /// Short human-readable name used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Eof => "end of input",
            Self::KwAttributeType => "attributetype",
            Self::KwObjectClass => "objectclass",
            Self::KwName => "NAME",
            Self::KwDesc => "DESC",
            Self::KwObsolete => "OBSOLETE",
            Self::KwSup => "SUP",
            Self::KwEquality => "EQUALITY",
            Self::KwOrdering => "ORDERING",
            Self::KwSubstr => "SUBSTR",
            Self::KwSyntax => "SYNTAX",
            Self::KwSingleValue => "SINGLE-VALUE",
            Self::KwCollective => "COLLECTIVE",
            Self::KwNoUserModification => "NO-USER-MODIFICATION",
            Self::KwUsage => "USAGE",
            Self::KwAbstract => "ABSTRACT",
            Self::KwStructural => "STRUCTURAL",
            Self::KwAuxiliary => "AUXILIARY",
            Self::KwMust => "MUST",
            Self::KwMay => "MAY",
            Self::Extension => "extension",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Dollar => "'$'",
            Self::String => "string",
            Self::Oid => "oid",
            Self::NumericOid => "numeric oid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
