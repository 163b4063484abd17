//! ldapgen-runtime: Support types for generated directory objects
//!
//! Generated types implement [`Item`], converting themselves to and from an
//! [`Entry`]: a DN plus ordered, multi-valued attributes. Attribute names are
//! matched without regard to ASCII case.

mod entry;

pub use entry::{Attribute, Entry};

use thiserror::Error;

/// Attribute that lists an entry's object classes.
pub const OBJECT_CLASS: &str = "objectClass";

/// Errors raised while converting between objects and entries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MarshalError {
    /// A required attribute holds no value.
    #[error("marshalling {object}: attribute {attribute} is empty")]
    EmptyAttribute {
        /// Generated object name.
        object: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },
}

/// A generated directory object.
pub trait Item {
    /// Duplicate the object. The copy shares no state with the original.
    fn copy(&self) -> Self
    where
        Self: Sized;

    /// Convert the object into an entry.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::EmptyAttribute`] if an attribute required by
    /// one of the object's set classes has no value.
    fn marshal(&self) -> Result<Entry, MarshalError>;

    /// Overwrite the object from an entry.
    ///
    /// # Errors
    ///
    /// Generated implementations never fail; the signature leaves room for
    /// hand-written ones.
    fn unmarshal(&mut self, entry: &Entry) -> Result<(), MarshalError>;

    /// Distinguished name of the object.
    fn dn(&self) -> String;

    /// Object class to filter on when searching for objects of this type.
    fn filter_object_class(&self) -> &str;
}
