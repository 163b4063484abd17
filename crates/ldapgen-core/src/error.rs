//! Error types.

use crate::lexer::Diagnostic;
use crate::schema::CapacityError;
use alloc::format;
use alloc::string::String;
use thiserror::Error;

/// Errors that reject a single object descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A listed object class is not in the schema.
    #[error("undefined object class {0}")]
    UndefinedObjectClass(String),

    /// A DN format was given without the attributes that fill it.
    #[error("DNFormat without DNAttributes")]
    DnFormatWithoutAttributes,

    /// A DN attribute is not among the object's attributes.
    #[error("undefined attribute {0} in DNAttributes")]
    UndefinedDnAttribute(String),

    /// The DN format's placeholders do not match the DN attributes.
    #[error("DNFormat has {placeholders} placeholder(s) but {attributes} DNAttributes")]
    DnPlaceholderMismatch {
        /// `%v`/`%s` placeholders in the format.
        placeholders: usize,
        /// Entries in DNAttributes.
        attributes: usize,
    },

    /// A name yields no usable Rust identifier.
    #[error("cannot derive a Rust identifier from {0:?}")]
    InvalidIdentifier(String),

    /// A type name would shadow an item of the Rust prelude.
    #[error("type name {0} shadows a Rust prelude item")]
    ReservedTypeName(String),

    /// Two generated members would share one identifier.
    #[error("identifier {ident} would be generated for both {first} and {second}")]
    IdentifierCollision {
        /// The clashing Rust identifier.
        ident: String,
        /// First schema name mapped to it.
        first: String,
        /// Second schema name mapped to it.
        second: String,
    },

    /// Another descriptor in the batch already produced this type.
    #[error("type {0} is generated more than once")]
    DuplicateTypeName(String),
}

/// Crate error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema text has lexical or syntax errors.
    #[error("invalid schema: {}", summarize(.0))]
    Schema(alloc::vec::Vec<Diagnostic>),

    /// The registry is full.
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// A descriptor could not be resolved or emitted.
    #[error("{object}: {source}")]
    Semantic {
        /// Descriptor name.
        object: String,
        /// Underlying error.
        source: SemanticError,
    },
}

/// Crate result type.
pub type Result<T> = core::result::Result<T, Error>;

fn summarize(diagnostics: &[Diagnostic]) -> String {
    let mut errors = diagnostics.iter().filter(|d| d.is_error());
    match (errors.next(), errors.count()) {
        (None, _) => String::from("no errors reported"),
        (Some(first), 0) => first.message.clone(),
        (Some(first), more) => format!("{} (and {more} more)", first.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_semantic_messages() {
        assert_eq!(
            SemanticError::UndefinedObjectClass("posixAccount".into()).to_string(),
            "undefined object class posixAccount"
        );
        assert_eq!(
            SemanticError::DnFormatWithoutAttributes.to_string(),
            "DNFormat without DNAttributes"
        );
        assert_eq!(
            SemanticError::UndefinedDnAttribute("sn".into()).to_string(),
            "undefined attribute sn in DNAttributes"
        );
    }

    #[test]
    fn test_schema_error_summary() {
        let err = Error::Schema(vec![
            Diagnostic::warning(Span::new(0, 1), "ignored"),
            Diagnostic::error(Span::new(2, 3), "first"),
            Diagnostic::error(Span::new(4, 5), "second"),
        ]);
        assert_eq!(err.to_string(), "invalid schema: first (and 1 more)");
    }

    #[test]
    fn test_semantic_error_names_object() {
        let err = Error::Semantic {
            object: "Account".into(),
            source: SemanticError::DnFormatWithoutAttributes,
        };
        assert_eq!(err.to_string(), "Account: DNFormat without DNAttributes");
    }
}
