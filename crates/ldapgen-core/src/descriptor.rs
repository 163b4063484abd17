//! Object descriptors.
//!
//! A descriptor names a generated type and the object classes it carries.
//! With the `serde` feature descriptors read from JSON documents such as:
//!
//! ```json
//! [{
//!     "Name": "Account",
//!     "Desc": "a POSIX account",
//!     "ObjectClasses": ["posixAccount"],
//!     "FilterObjectClass": "posixAccount",
//!     "DNFormat": "uid=%v,ou=people,dc=example,dc=com",
//!     "DNAttributes": ["uid"]
//! }]
//! ```

use alloc::string::String;
use alloc::vec::Vec;

/// Describes one generated object type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct ObjectDescriptor {
    /// Generated type name.
    pub name: String,
    /// Free text description, emitted as documentation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub desc: String,
    /// Object classes in order. Order drives attribute order.
    pub object_classes: Vec<String>,
    /// Object class used to search for entries of this type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub filter_object_class: String,
    /// DN template with `%v` placeholders, one per DN attribute.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "DNFormat", skip_serializing_if = "Option::is_none")
    )]
    pub dn_format: Option<String>,
    /// Attributes substituted into the DN template in order.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "DNAttributes", skip_serializing_if = "Vec::is_empty")
    )]
    pub dn_attributes: Vec<String>,
}

impl ObjectDescriptor {
    /// Create a descriptor for the given object classes.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, object_classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            object_classes: object_classes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Set the filter object class.
    #[must_use]
    pub fn with_filter_object_class(mut self, class: impl Into<String>) -> Self {
        self.filter_object_class = class.into();
        self
    }

    /// Set the DN template and the attributes that fill it.
    #[must_use]
    pub fn with_dn<I, S>(mut self, format: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dn_format = Some(format.into());
        self.dn_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// DN template, treating an empty string as absent.
    #[must_use]
    pub fn dn_format(&self) -> Option<&str> {
        self.dn_format.as_deref().filter(|f| !f.is_empty())
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let json = r#"[{
            "Name": "Account",
            "Desc": "a POSIX account",
            "ObjectClasses": ["posixAccount", "shadowAccount"],
            "FilterObjectClass": "posixAccount",
            "DNFormat": "uid=%v,ou=people",
            "DNAttributes": ["uid"]
        }]"#;
        let descriptors: Vec<ObjectDescriptor> = serde_json::from_str(json).unwrap();
        let expected = ObjectDescriptor::new("Account", ["posixAccount", "shadowAccount"])
            .with_desc("a POSIX account")
            .with_filter_object_class("posixAccount")
            .with_dn("uid=%v,ou=people", ["uid"]);
        assert_eq!(descriptors, [expected]);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"Name": "Group", "ObjectClasses": ["posixGroup"]}"#;
        let descriptor: ObjectDescriptor = serde_json::from_str(json).unwrap();
        assert!(descriptor.desc.is_empty());
        assert!(descriptor.dn_format().is_none());
        assert!(descriptor.dn_attributes.is_empty());
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn test_empty_format_is_absent() {
        let descriptor = ObjectDescriptor::new("A", ["top"]).with_dn("", ["cn"]);
        assert!(descriptor.dn_format().is_none());
    }
}
