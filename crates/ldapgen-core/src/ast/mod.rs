//! Abstract syntax tree for schema statements.
//!
//! Each stanza parses into one immutable statement. Fields are kept in
//! source order, including repeats; folding them into definitions happens
//! when statements are registered.

mod common;
mod statement;

pub use common::{Ident, QuotedString};
pub use statement::{
    AttributeField, AttributeTypeStmt, ExtensionClause, ObjectClassField, ObjectClassStmt,
    Statement,
};
