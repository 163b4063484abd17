//! Schema parser module.
//!
//! Recursive descent over the lexer's token stream with one token of
//! lookahead. Tokens are pulled from the lexer on demand.

use crate::ast::{
    AttributeField, AttributeTypeStmt, ExtensionClause, Ident, ObjectClassField, ObjectClassStmt,
    QuotedString, Statement,
};
use crate::lexer::{Diagnostic, Lexer, Span, Token, TokenKind};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// Result of parsing a schema text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedSchema {
    /// Successfully parsed statements in source order.
    pub statements: Vec<Statement>,
    /// Lexer and parser diagnostics, ordered by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedSchema {
    /// Check if any error diagnostics were produced.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Iterate over the error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Grammar context, used to phrase syntax errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseContext {
    TopLevel,
    Header,
    AttributeFields,
    ObjectClassFields,
    NameList,
    OidList,
    ExtensionValues,
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseContext::TopLevel => "schema",
            ParseContext::Header => "definition header",
            ParseContext::AttributeFields => "attributetype",
            ParseContext::ObjectClassFields => "objectclass",
            ParseContext::NameList => "NAME list",
            ParseContext::OidList => "oid list",
            ParseContext::ExtensionValues => "extension values",
        })
    }
}

/// Schema parser.
///
/// A syntax error discards the stanza being parsed, records a diagnostic
/// and skips ahead to the next statement keyword.
pub struct Parser<'src> {
    /// Source text (for extracting token content).
    source: &'src str,
    /// Token source.
    lexer: Lexer<'src>,
    /// Lookahead token.
    current: Token,
    /// Grammar context for diagnostics.
    context: ParseContext,
    /// Parser diagnostics.
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            source,
            lexer,
            current,
            context: ParseContext::TopLevel,
            diagnostics: Vec::new(),
        }
    }

    /// Parse all statements in the source.
    #[must_use]
    pub fn parse_schema(mut self) -> ParsedSchema {
        let mut statements = Vec::new();

        while !self.is_eof() {
            let result = match self.peek().kind {
                TokenKind::KwAttributeType => {
                    self.parse_attribute_type().map(Statement::AttributeType)
                }
                TokenKind::KwObjectClass => self.parse_object_class().map(Statement::ObjectClass),
                _ => {
                    let token = self.advance();
                    Err(self.unexpected(token))
                }
            };
            self.context = ParseContext::TopLevel;

            match result {
                Ok(statement) => {
                    log::debug!("parsed definition {}", statement.oid().name);
                    statements.push(statement);
                }
                Err(diag) => {
                    log::debug!("discarding definition: {}", diag.message);
                    self.diagnostics.push(diag);
                    self.recover_to_statement();
                }
            }
        }

        let mut diagnostics = self.lexer.into_diagnostics();
        diagnostics.extend(self.diagnostics);
        diagnostics.sort_by_key(|d| d.span.start);

        ParsedSchema {
            statements,
            diagnostics,
        }
    }

    // === Token access methods ===

    /// Check if we're at EOF.
    fn is_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Peek at current token.
    fn peek(&self) -> Token {
        self.current
    }

    /// Advance and return current token.
    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        core::mem::replace(&mut self.current, next)
    }

    /// Check if current token is of given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume token of given kind, or return error.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(self.current))
        }
    }

    /// Syntax error for an unexpected token.
    fn unexpected(&self, token: Token) -> Diagnostic {
        let found = match token.kind {
            TokenKind::Eof => String::from("end of input"),
            TokenKind::LParen | TokenKind::RParen | TokenKind::Dollar => format!("{}", token.kind),
            kind => format!("{kind} '{}'", token.text(self.source)),
        };
        Diagnostic::error(
            token.span,
            format!("syntax error in {}: unexpected {found}", self.context),
        )
    }

    /// Skip to the next statement keyword or EOF.
    fn recover_to_statement(&mut self) {
        while !self.is_eof() && !self.peek().kind.is_statement_keyword() {
            self.advance();
        }
    }

    // === Value helpers ===

    fn expect_ident(&mut self, kind: TokenKind) -> Result<Ident, Diagnostic> {
        let token = self.expect(kind)?;
        Ok(Ident::new(token.text(self.source).into(), token.span))
    }

    fn expect_string(&mut self) -> Result<QuotedString, Diagnostic> {
        let token = self.expect(TokenKind::String)?;
        Ok(QuotedString::new(
            collapse_whitespace(token.text(self.source)),
            token.span,
        ))
    }

    /// Parse `'a'` or `( 'a' 'b' ... )`.
    fn parse_strings(&mut self, list_context: ParseContext) -> Result<Vec<QuotedString>, Diagnostic> {
        if !self.check(TokenKind::LParen) {
            return Ok(vec![self.expect_string()?]);
        }
        self.advance();
        let outer = core::mem::replace(&mut self.context, list_context);
        let mut values = vec![self.expect_string()?];
        while self.check(TokenKind::String) {
            values.push(self.expect_string()?);
        }
        self.expect(TokenKind::RParen)?;
        self.context = outer;
        Ok(values)
    }

    /// Parse `oid` or `( oid $ oid ... )`.
    fn parse_oids(&mut self) -> Result<Vec<Ident>, Diagnostic> {
        if !self.check(TokenKind::LParen) {
            return Ok(vec![self.expect_ident(TokenKind::Oid)?]);
        }
        self.advance();
        let outer = core::mem::replace(&mut self.context, ParseContext::OidList);
        let mut oids = vec![self.expect_ident(TokenKind::Oid)?];
        while self.check(TokenKind::Dollar) {
            self.advance();
            oids.push(self.expect_ident(TokenKind::Oid)?);
        }
        self.expect(TokenKind::RParen)?;
        self.context = outer;
        Ok(oids)
    }

    fn parse_extension(&mut self, keyword: Token) -> Result<ExtensionClause, Diagnostic> {
        let name = Ident::new(keyword.text(self.source).into(), keyword.span);
        let values = self.parse_strings(ParseContext::ExtensionValues)?;
        Ok(ExtensionClause { name, values })
    }

    /// Parse `keyword ( numericoid` and return the keyword span and OID.
    fn parse_header(&mut self) -> Result<(Span, Ident), Diagnostic> {
        self.context = ParseContext::Header;
        let keyword = self.advance().span;
        self.expect(TokenKind::LParen)?;
        let oid = self.expect_ident(TokenKind::NumericOid)?;
        Ok((keyword, oid))
    }

    // === Statements ===

    fn parse_attribute_type(&mut self) -> Result<AttributeTypeStmt, Diagnostic> {
        let (keyword, oid) = self.parse_header()?;
        self.context = ParseContext::AttributeFields;

        let mut fields = Vec::new();
        while !self.check(TokenKind::RParen) {
            fields.push(self.parse_attribute_field()?);
        }
        let close = self.advance().span;

        Ok(AttributeTypeStmt {
            oid,
            fields,
            span: keyword.to(close),
        })
    }

    fn parse_attribute_field(&mut self) -> Result<AttributeField, Diagnostic> {
        let token = self.advance();
        let field = match token.kind {
            TokenKind::KwName => AttributeField::Name(self.parse_strings(ParseContext::NameList)?),
            TokenKind::KwDesc => AttributeField::Desc(self.expect_string()?),
            TokenKind::KwObsolete => AttributeField::Obsolete,
            TokenKind::KwSup => AttributeField::Sup(self.expect_ident(TokenKind::Oid)?),
            TokenKind::KwEquality => AttributeField::Equality(self.expect_ident(TokenKind::Oid)?),
            TokenKind::KwOrdering => AttributeField::Ordering(self.expect_ident(TokenKind::Oid)?),
            TokenKind::KwSubstr => AttributeField::Substr(self.expect_ident(TokenKind::Oid)?),
            TokenKind::KwSyntax => {
                AttributeField::Syntax(self.expect_ident(TokenKind::NumericOid)?)
            }
            TokenKind::KwSingleValue => AttributeField::SingleValue,
            TokenKind::KwCollective => AttributeField::Collective,
            TokenKind::KwNoUserModification => AttributeField::NoUserModification,
            TokenKind::KwUsage => AttributeField::Usage(self.expect_ident(TokenKind::String)?),
            TokenKind::Extension => AttributeField::Extension(self.parse_extension(token)?),
            _ => return Err(self.unexpected(token)),
        };
        Ok(field)
    }

    fn parse_object_class(&mut self) -> Result<ObjectClassStmt, Diagnostic> {
        let (keyword, oid) = self.parse_header()?;
        self.context = ParseContext::ObjectClassFields;

        let mut fields = Vec::new();
        while !self.check(TokenKind::RParen) {
            fields.push(self.parse_object_class_field()?);
        }
        let close = self.advance().span;

        Ok(ObjectClassStmt {
            oid,
            fields,
            span: keyword.to(close),
        })
    }

    fn parse_object_class_field(&mut self) -> Result<ObjectClassField, Diagnostic> {
        let token = self.advance();
        let field = match token.kind {
            TokenKind::KwName => {
                ObjectClassField::Name(self.parse_strings(ParseContext::NameList)?)
            }
            TokenKind::KwDesc => ObjectClassField::Desc(self.expect_string()?),
            TokenKind::KwObsolete => ObjectClassField::Obsolete,
            TokenKind::KwSup => ObjectClassField::Sup(self.parse_oids()?),
            TokenKind::KwAbstract => ObjectClassField::Abstract,
            TokenKind::KwStructural => ObjectClassField::Structural,
            TokenKind::KwAuxiliary => ObjectClassField::Auxiliary,
            TokenKind::KwMust => ObjectClassField::Must(self.parse_oids()?),
            TokenKind::KwMay => ObjectClassField::May(self.parse_oids()?),
            TokenKind::Extension => ObjectClassField::Extension(self.parse_extension(token)?),
            _ => return Err(self.unexpected(token)),
        };
        Ok(field)
    }
}

/// Collapse every whitespace run to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_ascii_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
