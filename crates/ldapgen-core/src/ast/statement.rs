//! Statement AST types.

use super::{Ident, QuotedString};
use crate::lexer::Span;
use alloc::vec::Vec;

/// A top-level schema statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// `attributetype ( ... )`
    AttributeType(AttributeTypeStmt),
    /// `objectclass ( ... )`
    ObjectClass(ObjectClassStmt),
}

impl Statement {
    /// Numeric OID of the defined element.
    #[must_use]
    pub fn oid(&self) -> &Ident {
        match self {
            Statement::AttributeType(stmt) => &stmt.oid,
            Statement::ObjectClass(stmt) => &stmt.oid,
        }
    }

    /// Span of the whole stanza.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Statement::AttributeType(stmt) => stmt.span,
            Statement::ObjectClass(stmt) => stmt.span,
        }
    }
}

/// An attribute type stanza.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeTypeStmt {
    /// Numeric OID.
    pub oid: Ident,
    /// Fields in source order.
    pub fields: Vec<AttributeField>,
    /// Source location.
    pub span: Span,
}

/// A field of an attribute type stanza.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeField {
    /// `NAME 'a'` or `NAME ( 'a' 'b' )`
    Name(Vec<QuotedString>),
    /// `DESC '...'`
    Desc(QuotedString),
    /// `OBSOLETE`
    Obsolete,
    /// `SUP oid`
    Sup(Ident),
    /// `EQUALITY oid`
    Equality(Ident),
    /// `ORDERING oid`
    Ordering(Ident),
    /// `SUBSTR oid`
    Substr(Ident),
    /// `SYNTAX noid{len}`; the length bound is dropped.
    Syntax(Ident),
    /// `SINGLE-VALUE`
    SingleValue,
    /// `COLLECTIVE`
    Collective,
    /// `NO-USER-MODIFICATION`
    NoUserModification,
    /// `USAGE keyword`
    Usage(Ident),
    /// `X-NAME 'value'` or `X-NAME ( 'a' 'b' )`
    Extension(ExtensionClause),
}

/// An object class stanza.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectClassStmt {
    /// Numeric OID.
    pub oid: Ident,
    /// Fields in source order.
    pub fields: Vec<ObjectClassField>,
    /// Source location.
    pub span: Span,
}

/// A field of an object class stanza.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectClassField {
    /// `NAME 'a'` or `NAME ( 'a' 'b' )`
    Name(Vec<QuotedString>),
    /// `DESC '...'`
    Desc(QuotedString),
    /// `OBSOLETE`
    Obsolete,
    /// `SUP oid` or `SUP ( a $ b )`
    Sup(Vec<Ident>),
    /// `ABSTRACT`
    Abstract,
    /// `STRUCTURAL`
    Structural,
    /// `AUXILIARY`
    Auxiliary,
    /// `MUST oid` or `MUST ( a $ b )`
    Must(Vec<Ident>),
    /// `MAY oid` or `MAY ( a $ b )`
    May(Vec<Ident>),
    /// `X-NAME 'value'` or `X-NAME ( 'a' 'b' )`
    Extension(ExtensionClause),
}

/// A private `X-` extension with its values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionClause {
    /// Extension keyword, e.g. `X-ORIGIN`.
    pub name: Ident,
    /// Values in source order.
    pub values: Vec<QuotedString>,
}
