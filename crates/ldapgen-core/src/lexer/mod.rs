//! Schema lexer module.
//!
//! Tokenizes OpenLDAP-style schema text into a token stream. The lexer is a
//! pull-based state machine: each state knows which fields may follow, so
//! words like `cn` or `top` become `Oid` tokens after `MUST` and `String`
//! tokens after `NAME` without any backtracking.

// Allow truncation casts - we limit source size to u32::MAX bytes
#![allow(clippy::cast_possible_truncation)]

mod fields;
mod keyword;
mod token;

pub use keyword::{is_extension, lookup_keyword, lookup_statement};
pub use token::{Span, Token, TokenKind};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use fields::{Field, Fields};

/// Byte offset into source text.
pub type ByteOffset = u32;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Blocks progress; the input is malformed.
    Error,
    /// Informational; processing continues.
    Warning,
}

/// A diagnostic message from the lexer, parser or registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Location in source text.
    pub span: Span,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic.
    #[must_use]
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic.
    #[must_use]
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            message: message.into(),
        }
    }

    /// Check if this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{level} at {}..{}: {}",
            self.span.start, self.span.end, self.message
        )
    }
}

/// Lexer state: what the next field is expected to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexerState {
    /// Between statements; anything but a statement keyword is skipped.
    Text,
    /// After a statement keyword; expects `(`.
    LeftParen,
    /// After `(`; expects the stanza's numeric OID.
    NumericOid,
    /// Inside a stanza body; expects a field keyword or `)`.
    Fields,
    /// After `NAME`; expects one name or `(`.
    Name,
    /// Inside a `NAME ( ... )` list.
    NameList,
    /// After `DESC`; expects a quoted string.
    QuotedString,
    /// After `EQUALITY`, `ORDERING` or `SUBSTR`; expects one OID.
    Oid,
    /// After `SUP`, `MUST` or `MAY`; expects one OID or `(`.
    Oids,
    /// Inside a `$`-separated OID list.
    OidList,
    /// After `SYNTAX`; expects a numeric OID with optional `{length}`.
    NoidLength,
    /// After `USAGE`; expects a usage keyword.
    Usage,
    /// After an `X-` keyword; expects one quoted string or `(`.
    Extension,
    /// Inside an extension value list.
    ExtensionList,
    /// End of input or a lexical error was reached.
    Done,
}

/// Schema lexer.
///
/// Produces tokens on demand. A lexical error is recorded as a diagnostic
/// and ends the stream with `Eof`; once `Eof` is returned every further call
/// returns `Eof` again.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Field scanner.
    fields: Fields<'src>,
    /// Current lexer state.
    state: LexerState,
    /// Collected diagnostics.
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            fields: Fields::new(source),
            state: LexerState::Text,
            diagnostics: Vec::new(),
        }
    }

    /// Source text being tokenized.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Consume the lexer and return collected diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get a reference to collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Tokenize the entire source and return all tokens.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        if self.state == LexerState::Done {
            return self.eof();
        }
        if self.state == LexerState::Text {
            return self.lex_text();
        }

        let Some(field) = self.fields.next() else {
            return self.eof();
        };

        let token = match self.state {
            LexerState::LeftParen => self.lex_left_paren(field),
            LexerState::NumericOid => self.lex_numeric_oid(field),
            LexerState::Fields => self.lex_field_keyword(field),
            LexerState::Name => self.lex_name(field),
            LexerState::NameList => self.lex_name_list(field),
            LexerState::QuotedString => {
                self.state = LexerState::Fields;
                self.lex_quoted(field)
            }
            LexerState::Oid => {
                self.state = LexerState::Fields;
                Token::new(TokenKind::Oid, unquoted(field))
            }
            LexerState::Oids => self.lex_oids(field),
            LexerState::OidList => self.lex_oid_list(field),
            LexerState::NoidLength => self.lex_noid_length(field),
            LexerState::Usage => {
                self.state = LexerState::Fields;
                Token::new(TokenKind::String, unquoted(field))
            }
            LexerState::Extension => self.lex_extension(field),
            LexerState::ExtensionList => self.lex_extension_list(field),
            LexerState::Text | LexerState::Done => self.eof(),
        };
        log::trace!(
            "token {:?} {:?}",
            token.kind,
            token.text(self.source)
        );
        token
    }

    /// Produce `Eof` and stop the lexer.
    fn eof(&mut self) -> Token {
        self.state = LexerState::Done;
        let len = self.source.len() as ByteOffset;
        Token::new(TokenKind::Eof, Span::new(len, len))
    }

    /// Record a lexical error and stop the lexer.
    fn fail(&mut self, span: Span, message: String) -> Token {
        self.diagnostics.push(Diagnostic::error(span, message));
        self.eof()
    }

    fn lex_text(&mut self) -> Token {
        for field in self.fields.by_ref() {
            if let Some(kind) = lookup_statement(field.text) {
                self.state = LexerState::LeftParen;
                return Token::new(kind, field.span);
            }
        }
        self.eof()
    }

    fn lex_left_paren(&mut self, field: Field<'src>) -> Token {
        if field.text == "(" {
            self.state = LexerState::NumericOid;
            Token::new(TokenKind::LParen, field.span)
        } else {
            self.fail(
                field.span,
                format!("expected '(' to open definition, found '{}'", field.text),
            )
        }
    }

    fn lex_numeric_oid(&mut self, field: Field<'src>) -> Token {
        if field.text == "(" || field.text == ")" {
            return self.fail(
                field.span,
                format!("expected numeric oid, found '{}'", field.text),
            );
        }
        self.state = LexerState::Fields;
        Token::new(TokenKind::NumericOid, unquoted(field))
    }

    fn lex_field_keyword(&mut self, field: Field<'src>) -> Token {
        if field.text == ")" {
            self.state = LexerState::Text;
            return Token::new(TokenKind::RParen, field.span);
        }

        if let Some(kind) = lookup_keyword(field.text) {
            self.state = match kind {
                TokenKind::KwName => LexerState::Name,
                TokenKind::KwDesc => LexerState::QuotedString,
                TokenKind::KwSup | TokenKind::KwMust | TokenKind::KwMay => LexerState::Oids,
                TokenKind::KwEquality | TokenKind::KwOrdering | TokenKind::KwSubstr => {
                    LexerState::Oid
                }
                TokenKind::KwSyntax => LexerState::NoidLength,
                TokenKind::KwUsage => LexerState::Usage,
                _ => LexerState::Fields,
            };
            return Token::new(kind, field.span);
        }

        if is_extension(field.text) {
            self.state = LexerState::Extension;
            return Token::new(TokenKind::Extension, field.span);
        }

        self.fail(field.span, format!("unknown field '{}'", field.text))
    }

    fn lex_name(&mut self, field: Field<'src>) -> Token {
        if field.text == "(" {
            self.state = LexerState::NameList;
            Token::new(TokenKind::LParen, field.span)
        } else {
            self.state = LexerState::Fields;
            Token::new(TokenKind::String, unquoted(field))
        }
    }

    fn lex_name_list(&mut self, field: Field<'src>) -> Token {
        if field.text == ")" {
            self.state = LexerState::Fields;
            Token::new(TokenKind::RParen, field.span)
        } else {
            Token::new(TokenKind::String, unquoted(field))
        }
    }

    fn lex_oids(&mut self, field: Field<'src>) -> Token {
        if field.text == "(" {
            self.state = LexerState::OidList;
            Token::new(TokenKind::LParen, field.span)
        } else {
            self.state = LexerState::Fields;
            Token::new(TokenKind::Oid, unquoted(field))
        }
    }

    fn lex_oid_list(&mut self, field: Field<'src>) -> Token {
        match field.text {
            ")" => {
                self.state = LexerState::Fields;
                Token::new(TokenKind::RParen, field.span)
            }
            "$" => Token::new(TokenKind::Dollar, field.span),
            _ => Token::new(TokenKind::Oid, unquoted(field)),
        }
    }

    fn lex_noid_length(&mut self, field: Field<'src>) -> Token {
        self.state = LexerState::Fields;
        let mut span = unquoted(field);
        let text = Token::new(TokenKind::NumericOid, span).text(self.source);
        if let Some(idx) = text.find('{') {
            span.end = span.start + idx as ByteOffset;
        }
        Token::new(TokenKind::NumericOid, span)
    }

    fn lex_extension(&mut self, field: Field<'src>) -> Token {
        if field.text == "(" {
            self.state = LexerState::ExtensionList;
            Token::new(TokenKind::LParen, field.span)
        } else {
            self.state = LexerState::Fields;
            self.lex_quoted(field)
        }
    }

    fn lex_extension_list(&mut self, field: Field<'src>) -> Token {
        if field.text == ")" {
            self.state = LexerState::Fields;
            Token::new(TokenKind::RParen, field.span)
        } else {
            self.lex_quoted(field)
        }
    }

    /// Lex a quoted string that may span several fields.
    ///
    /// The token span covers the text between the apostrophes. A field
    /// without a leading apostrophe is taken as a bare one-word string.
    fn lex_quoted(&mut self, first: Field<'src>) -> Token {
        let Some(rest) = first.text.strip_prefix('\'') else {
            return Token::new(TokenKind::String, first.span);
        };
        let start = first.span.start + 1;
        if let Some(inner) = rest.strip_suffix('\'') {
            return Token::new(
                TokenKind::String,
                Span::new(start, start + inner.len() as ByteOffset),
            );
        }

        while let Some(field) = self.fields.next() {
            if field.text.ends_with('\'') {
                return Token::new(TokenKind::String, Span::new(start, field.span.end - 1));
            }
        }
        let end = self.fields.offset();
        self.fail(
            Span::new(first.span.start, end),
            String::from("unterminated quoted string"),
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to and including the first `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.state == LexerState::Done {
            return None;
        }
        Some(self.next_token())
    }
}

/// Span of a single field with one leading and all trailing apostrophes
/// removed.
fn unquoted(field: Field<'_>) -> Span {
    let mut start = field.span.start;
    let mut text = field.text;
    if let Some(rest) = text.strip_prefix('\'') {
        start += 1;
        text = rest;
    }
    let text = text.trim_end_matches('\'');
    Span::new(start, start + text.len() as ByteOffset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source).tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        let (tokens, _) = Lexer::new(source).tokenize();
        tokens.into_iter().map(|t| t.text(source)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  # only a comment\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_text_outside_statements_is_skipped() {
        assert_eq!(kinds("include foo.schema\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_attribute_type_tokens() {
        let source = "attributetype ( 2.5.4.3 NAME ( 'cn' 'commonName' ) \
                      DESC 'common name' SUP name )";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::KwAttributeType,
                TokenKind::LParen,
                TokenKind::NumericOid,
                TokenKind::KwName,
                TokenKind::LParen,
                TokenKind::String,
                TokenKind::String,
                TokenKind::RParen,
                TokenKind::KwDesc,
                TokenKind::String,
                TokenKind::KwSup,
                TokenKind::Oid,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            texts(source),
            vec![
                "attributetype",
                "(",
                "2.5.4.3",
                "NAME",
                "(",
                "cn",
                "commonName",
                ")",
                "DESC",
                "common name",
                "SUP",
                "name",
                ")",
                "",
            ]
        );
    }

    #[test]
    fn test_object_class_oid_list() {
        let source = "objectclass ( 2.5.6.6 NAME 'person' SUP top STRUCTURAL \
                      MUST ( sn $ cn ) MAY userPassword )";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::KwObjectClass,
                TokenKind::LParen,
                TokenKind::NumericOid,
                TokenKind::KwName,
                TokenKind::String,
                TokenKind::KwSup,
                TokenKind::Oid,
                TokenKind::KwStructural,
                TokenKind::KwMust,
                TokenKind::LParen,
                TokenKind::Oid,
                TokenKind::Dollar,
                TokenKind::Oid,
                TokenKind::RParen,
                TokenKind::KwMay,
                TokenKind::Oid,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_syntax_length_is_dropped() {
        let source = "attributetype ( 1.1 SYNTAX 1.3.6.1.4.1.1466.115.121.1.15{32768} )";
        let texts = texts(source);
        assert_eq!(texts[4], "1.3.6.1.4.1.1466.115.121.1.15");
    }

    #[test]
    fn test_quoted_syntax() {
        let source = "attributetype ( 1.1 SYNTAX '1.2.3{8}' )";
        assert_eq!(texts(source)[4], "1.2.3");
    }

    #[test]
    fn test_multiline_description() {
        let source = "attributetype ( 1.1 DESC 'spans\n   two lines' )";
        let texts = texts(source);
        assert_eq!(texts[4], "spans\n   two lines");
    }

    #[test]
    fn test_description_with_hash() {
        let source = "attributetype ( 1.1 DESC 'a # b' ) # comment";
        assert_eq!(texts(source)[4], "a # b");
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let source = "ObjectClass ( 1.1 name 'x' must cn )";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::KwObjectClass,
                TokenKind::LParen,
                TokenKind::NumericOid,
                TokenKind::KwName,
                TokenKind::String,
                TokenKind::KwMust,
                TokenKind::Oid,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_extension_values() {
        let source = "attributetype ( 1.1 X-ORIGIN 'RFC 4519' X-TAGS ( 'a' 'b c' ) )";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::KwAttributeType,
                TokenKind::LParen,
                TokenKind::NumericOid,
                TokenKind::Extension,
                TokenKind::String,
                TokenKind::Extension,
                TokenKind::LParen,
                TokenKind::String,
                TokenKind::String,
                TokenKind::RParen,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
        let texts = texts(source);
        assert_eq!(texts[4], "RFC 4519");
        assert_eq!(texts[8], "b c");
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let (tokens, diagnostics) = Lexer::new("attributetype ( 1.1 BOGUS )").tokenize();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(tokens.len(), 4);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert!(diagnostics[0].message.contains("BOGUS"));
    }

    #[test]
    fn test_missing_left_paren_is_an_error() {
        let (tokens, diagnostics) = Lexer::new("objectclass 1.1 )").tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let (_, diagnostics) = Lexer::new("attributetype ( 1.1 DESC 'never closed )").tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unterminated"));
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("attributetype ( 1.1 BOGUS )");
        while lexer.next_token().kind != TokenKind::Eof {}
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let tokens: Vec<_> = Lexer::new("attributetype ( 1.1 )").collect();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn test_statements_after_close_paren() {
        let source = "attributetype ( 1.1 NAME 'a' ) garbage objectclass ( 1.2 NAME 'b' )";
        let kinds = kinds(source);
        assert_eq!(
            kinds.iter().filter(|k| k.is_statement_keyword()).count(),
            2
        );
    }
}
