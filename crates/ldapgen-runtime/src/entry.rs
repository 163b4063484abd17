//! Directory entry model.

use crate::OBJECT_CLASS;

/// A named attribute with its values in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as first added.
    pub name: String,
    /// Values in insertion order.
    pub values: Vec<String>,
}

/// A directory entry: a DN and its attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    dn: String,
    attributes: Vec<Attribute>,
}

impl Entry {
    /// Create an entry with no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
        }
    }

    /// Distinguished name.
    #[must_use]
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Replace the distinguished name.
    pub fn set_dn(&mut self, dn: impl Into<String>) {
        self.dn = dn.into();
    }

    /// Append a value to an attribute, creating the attribute if needed.
    pub fn add_value(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attribute_mut(name) {
            Some(attribute) => attribute.values.push(value),
            None => self.attributes.push(Attribute {
                name: name.to_owned(),
                values: vec![value],
            }),
        }
    }

    /// Append several values to an attribute.
    ///
    /// Adding no values leaves the entry unchanged.
    pub fn add_values<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add_value(name, value);
        }
    }

    /// Values of an attribute, empty if absent.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.attribute(name)
            .map(|a| a.values.as_slice())
            .unwrap_or_default()
    }

    /// First value of an attribute.
    #[must_use]
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// Check if the entry lists an object class, ignoring ASCII case.
    #[must_use]
    pub fn has_object_class(&self, class: &str) -> bool {
        self.values(OBJECT_CLASS)
            .iter()
            .any(|v| v.eq_ignore_ascii_case(class))
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_keep_order() {
        let mut entry = Entry::new("uid=jdoe,ou=people");
        entry.add_value("mail", "a@example.com");
        entry.add_values("MAIL", ["b@example.com", "c@example.com"]);
        assert_eq!(
            entry.values("Mail"),
            ["a@example.com", "b@example.com", "c@example.com"]
        );
        assert_eq!(entry.attributes().len(), 1);
        assert_eq!(entry.attributes()[0].name, "mail");
    }

    #[test]
    fn test_absent_attribute() {
        let entry = Entry::new("cn=x");
        assert!(entry.values("cn").is_empty());
        assert_eq!(entry.first_value("cn"), None);
        assert!(entry.attribute("cn").is_none());
    }

    #[test]
    fn test_add_no_values() {
        let mut entry = Entry::new("cn=x");
        entry.add_values("cn", Vec::<String>::new());
        assert!(entry.attributes().is_empty());
    }

    #[test]
    fn test_object_class_ignores_case() {
        let mut entry = Entry::new("cn=x");
        entry.add_value("objectClass", "posixAccount");
        assert!(entry.has_object_class("POSIXACCOUNT"));
        assert!(!entry.has_object_class("person"));
    }

    #[test]
    fn test_set_dn() {
        let mut entry = Entry::new("cn=a");
        entry.set_dn("cn=b");
        assert_eq!(entry.dn(), "cn=b");
    }
}
