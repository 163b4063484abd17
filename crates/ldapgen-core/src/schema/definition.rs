//! Registered schema definitions.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// Description given to attributes that are referenced but never defined.
pub const MISSING_ATTRIBUTE_DESCRIPTION: &str = "attribute definition missing";

/// Intended use of an attribute type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Usage {
    /// User attribute.
    #[default]
    UserApplications,
    /// Operational attribute for directory operation.
    DirectoryOperation,
    /// Operational attribute shared between DSAs.
    DistributedOperation,
    /// Operational attribute local to one DSA.
    DsaOperation,
}

impl Usage {
    /// Parse a `USAGE` keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_keyword(text: &str) -> Option<Self> {
        [
            Self::UserApplications,
            Self::DirectoryOperation,
            Self::DistributedOperation,
            Self::DsaOperation,
        ]
        .into_iter()
        .find(|usage| usage.as_str().eq_ignore_ascii_case(text))
    }

    /// Schema keyword for this usage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserApplications => "userApplications",
            Self::DirectoryOperation => "directoryOperation",
            Self::DistributedOperation => "distributedOperation",
            Self::DsaOperation => "dSAOperation",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an object class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ClassKind {
    /// May be the basis of an entry.
    #[default]
    Structural,
    /// Only used as a superior of other classes.
    Abstract,
    /// Adds attributes to entries of other classes.
    Auxiliary,
}

/// A private `X-` extension attached to a definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extension {
    /// Extension keyword, e.g. `X-ORIGIN`.
    pub name: String,
    /// Values in source order.
    pub values: Vec<String>,
}

/// A registered attribute type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeTypeDef {
    /// Numeric OID.
    pub oid: String,
    /// Names in declaration order; the first is the primary name.
    pub names: Vec<String>,
    /// Free text description.
    pub description: String,
    /// `OBSOLETE` flag.
    pub obsolete: bool,
    /// Superior attribute type. Recorded only; never followed.
    pub superior: Option<String>,
    /// Equality matching rule.
    pub equality: Option<String>,
    /// Ordering matching rule.
    pub ordering: Option<String>,
    /// Substring matching rule.
    pub substr: Option<String>,
    /// Syntax OID without its length bound.
    pub syntax: Option<String>,
    /// `SINGLE-VALUE` flag.
    pub single_value: bool,
    /// `COLLECTIVE` flag.
    pub collective: bool,
    /// `NO-USER-MODIFICATION` flag.
    pub no_user_modification: bool,
    /// Intended use.
    pub usage: Usage,
    /// Private extensions in source order.
    pub extensions: Vec<Extension>,
}

impl AttributeTypeDef {
    /// Create an empty definition for the given OID.
    #[must_use]
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            ..Self::default()
        }
    }

    /// Stand-in for an attribute that is referenced but not defined.
    ///
    /// The stand-in is multi-valued and carries only the referenced name.
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self {
            names: vec![String::from(name)],
            description: String::from(MISSING_ATTRIBUTE_DESCRIPTION),
            ..Self::default()
        }
    }

    /// Primary name, or the OID when the definition has no name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.names.first().map_or(self.oid.as_str(), String::as_str)
    }

    /// Check if `name` is one of this definition's names or its OID.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.oid == name || self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Check if this is a stand-in for a missing definition.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.oid.is_empty() && self.description == MISSING_ATTRIBUTE_DESCRIPTION
    }
}

/// A registered object class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectClassDef {
    /// Numeric OID.
    pub oid: String,
    /// Name; the first `NAME` value, or the OID when there is none.
    pub name: String,
    /// Additional names beyond the first.
    pub aliases: Vec<String>,
    /// Free text description.
    pub description: String,
    /// `OBSOLETE` flag.
    pub obsolete: bool,
    /// Superior classes. Recorded only; never expanded into MUST/MAY.
    pub superiors: Vec<String>,
    /// Class kind.
    pub kind: ClassKind,
    /// Required attribute names in declaration order.
    pub must: Vec<String>,
    /// Optional attribute names in declaration order.
    pub may: Vec<String>,
    /// Private extensions in source order.
    pub extensions: Vec<Extension>,
}

impl ObjectClassDef {
    /// Create an empty definition for the given OID.
    #[must_use]
    pub fn new(oid: impl Into<String>) -> Self {
        let oid = oid.into();
        Self {
            name: oid.clone(),
            oid,
            ..Self::default()
        }
    }
}
