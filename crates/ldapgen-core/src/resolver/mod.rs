//! Object resolution.
//!
//! Turns an [`ObjectDescriptor`] into a [`ResolvedObject`]: the merged,
//! deduplicated MUST and MAY attributes of its object classes, with each
//! attribute bound to its registered definition.
//!
//! Only the MUST and MAY lists written on each listed class are used.
//! Superior classes are not expanded.

use crate::descriptor::ObjectDescriptor;
use crate::error::SemanticError;
use crate::schema::{fold_name, AttributeTypeDef, AttributeTypeId, Schema};
use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Whether an attribute is required or optional on the object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Listed as MUST by at least one class.
    Must,
    /// Listed only as MAY.
    May,
}

/// An attribute of a resolved object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAttribute<'s> {
    /// Name as first written in a class's MUST or MAY list.
    pub name: String,
    /// Registered definition, or a stand-in when the schema lacks one.
    pub definition: Cow<'s, AttributeTypeDef>,
}

impl ResolvedAttribute<'_> {
    /// Check if the attribute holds at most one value.
    #[must_use]
    pub fn is_single_valued(&self) -> bool {
        self.definition.single_value
    }

    /// Check if the schema has no definition for this attribute.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self.definition, Cow::Owned(_))
    }
}

/// One object class of a resolved object, with the attributes it lists.
///
/// Attribute names are the canonical names used in
/// [`ResolvedObject::must`] and [`ResolvedObject::may`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedClass {
    /// Registered object class name.
    pub name: String,
    /// Other names the class is declared under.
    pub aliases: Vec<String>,
    /// Attributes this class requires.
    pub must: Vec<String>,
    /// Attributes this class allows.
    pub may: Vec<String>,
}

impl ResolvedClass {
    /// Check if this class lists the attribute at all.
    #[must_use]
    pub fn lists(&self, attribute: &str) -> bool {
        self.requires(attribute) || self.may.iter().any(|a| a == attribute)
    }

    /// Check if this class requires the attribute.
    #[must_use]
    pub fn requires(&self, attribute: &str) -> bool {
        self.must.iter().any(|a| a == attribute)
    }
}

/// A descriptor resolved against a schema.
///
/// `must` and `may` are disjoint, and each is in first-insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedObject<'s> {
    /// Generated type name as written in the descriptor.
    pub name: String,
    /// Description.
    pub description: String,
    /// Filter object class.
    pub filter_object_class: String,
    /// Object classes in descriptor order, duplicates removed.
    pub classes: Vec<ResolvedClass>,
    /// Required attributes.
    pub must: Vec<ResolvedAttribute<'s>>,
    /// Optional attributes.
    pub may: Vec<ResolvedAttribute<'s>>,
    /// DN template, if any.
    pub dn_format: Option<String>,
    /// Canonical names of the DN attributes, in order.
    pub dn_attributes: Vec<String>,
}

impl<'s> ResolvedObject<'s> {
    /// Iterate over MUST then MAY attributes.
    pub fn attributes(&self) -> impl Iterator<Item = (Presence, &ResolvedAttribute<'s>)> {
        self.must
            .iter()
            .map(|a| (Presence::Must, a))
            .chain(self.may.iter().map(|a| (Presence::May, a)))
    }

    /// Find an attribute by canonical name, ignoring ASCII case.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&ResolvedAttribute<'s>> {
        self.attributes()
            .map(|(_, a)| a)
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Presence of an attribute, if the object has it.
    #[must_use]
    pub fn presence(&self, name: &str) -> Option<Presence> {
        self.attributes()
            .find(|(_, a)| a.name.eq_ignore_ascii_case(name))
            .map(|(p, _)| p)
    }
}

/// Identity of an attribute for deduplication.
///
/// Names that resolve to one definition are the same attribute; undefined
/// names are compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum AttributeKey {
    Defined(AttributeTypeId),
    Undefined(String),
}

fn key_for(schema: &Schema, name: &str) -> AttributeKey {
    match schema.attribute_type_id(name) {
        Some(id) => AttributeKey::Defined(id),
        None => AttributeKey::Undefined(fold_name(name)),
    }
}

/// Accumulates MUST and MAY attributes in insertion order.
struct AttributeSet<'s> {
    schema: &'s Schema,
    must: Vec<ResolvedAttribute<'s>>,
    may: Vec<ResolvedAttribute<'s>>,
    index: BTreeMap<AttributeKey, (Presence, String)>,
}

impl<'s> AttributeSet<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            must: Vec::new(),
            may: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Insert an attribute and return its canonical name.
    ///
    /// A MUST insertion promotes an attribute previously added as MAY.
    fn insert(&mut self, name: &str, presence: Presence) -> String {
        let key = key_for(self.schema, name);

        if let Some((existing, canonical)) = self.index.get(&key).cloned() {
            if existing == Presence::May && presence == Presence::Must {
                if let Some(pos) = self.may.iter().position(|a| a.name == canonical) {
                    let attribute = self.may.remove(pos);
                    log::debug!("attribute {canonical} promoted from MAY to MUST");
                    self.must.push(attribute);
                }
                self.index.insert(key, (Presence::Must, canonical.clone()));
            }
            return canonical;
        }

        let definition = match self.schema.attribute_type(name) {
            Some(def) => Cow::Borrowed(def),
            None => {
                log::warn!("attribute {name} has no definition; treating it as multi-valued");
                Cow::Owned(AttributeTypeDef::missing(name))
            }
        };
        let attribute = ResolvedAttribute {
            name: String::from(name),
            definition,
        };
        match presence {
            Presence::Must => self.must.push(attribute),
            Presence::May => self.may.push(attribute),
        }
        self.index.insert(key, (presence, String::from(name)));
        String::from(name)
    }

    fn canonical(&self, name: &str) -> Option<&str> {
        self.index
            .get(&key_for(self.schema, name))
            .map(|(_, canonical)| canonical.as_str())
    }
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !list.contains(&name) {
        list.push(name);
    }
}

/// Resolve a descriptor against a schema.
///
/// # Errors
///
/// Returns a [`SemanticError`] if a listed object class is undefined, if a
/// DN format is given without DN attributes, or if a DN attribute is not
/// among the object's attributes.
pub fn resolve<'s>(
    descriptor: &ObjectDescriptor,
    schema: &'s Schema,
) -> Result<ResolvedObject<'s>, SemanticError> {
    let mut attributes = AttributeSet::new(schema);
    let mut classes: Vec<ResolvedClass> = Vec::new();

    for class_name in &descriptor.object_classes {
        let class = schema
            .object_class(class_name)
            .ok_or_else(|| SemanticError::UndefinedObjectClass(class_name.clone()))?;

        if classes.iter().any(|c| c.name == class.name) {
            log::debug!("{}: object class {class_name} listed twice", descriptor.name);
            continue;
        }
        if !class.superiors.is_empty() {
            log::debug!(
                "{}: superiors of {class_name} ({}) are not expanded",
                descriptor.name,
                class.superiors.join(", ")
            );
        }

        let mut resolved = ResolvedClass {
            name: class.name.clone(),
            aliases: class.aliases.clone(),
            ..ResolvedClass::default()
        };
        for name in &class.must {
            let canonical = attributes.insert(name, Presence::Must);
            push_unique(&mut resolved.must, canonical);
        }
        for name in &class.may {
            let canonical = attributes.insert(name, Presence::May);
            if !resolved.must.contains(&canonical) {
                push_unique(&mut resolved.may, canonical);
            }
        }
        classes.push(resolved);
    }

    if descriptor.dn_format().is_some() && descriptor.dn_attributes.is_empty() {
        return Err(SemanticError::DnFormatWithoutAttributes);
    }
    let dn_attributes = descriptor
        .dn_attributes
        .iter()
        .map(|name| {
            attributes
                .canonical(name)
                .map(String::from)
                .ok_or_else(|| SemanticError::UndefinedDnAttribute(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "resolved {}: {} MUST, {} MAY",
        descriptor.name,
        attributes.must.len(),
        attributes.may.len()
    );

    Ok(ResolvedObject {
        name: descriptor.name.clone(),
        description: descriptor.desc.clone(),
        filter_object_class: descriptor.filter_object_class.clone(),
        classes,
        must: attributes.must,
        may: attributes.may,
        dn_format: descriptor.dn_format().map(String::from),
        dn_attributes,
    })
}
