//! Intermediate representation for generated object types.
//!
//! Lowering assigns every Rust identifier up front and records, for each
//! attribute field, which object class flags carry and require it. The
//! emitter then only has to print.

use super::dn;
use super::ident::{field_ident, flag_ident, is_prelude_name, type_ident};
use crate::error::SemanticError;
use crate::resolver::{Presence, ResolvedObject};
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Identifier of the private field holding the stored DN.
pub const DN_FIELD: &str = "dn";

/// Value shape of an attribute field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// `SINGLE-VALUE` attribute, held as `String`.
    Single,
    /// Multi-valued attribute, held as `Vec<String>`.
    Multi,
}

/// A `bool` field recording whether an object class applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagIr {
    /// Rust field identifier.
    pub ident: String,
    /// Object class name written as the `objectClass` value.
    pub object_class: String,
    /// Other names that also set the flag when read back.
    pub aliases: Vec<String>,
}

/// An attribute field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIr {
    /// Rust field identifier.
    pub ident: String,
    /// LDAP attribute name.
    pub attribute: String,
    /// Value shape.
    pub cardinality: Cardinality,
    /// MUST or MAY on the object as a whole.
    pub presence: Presence,
    /// Attribute description, used as documentation.
    pub description: String,
    /// Indices into [`ObjectIr::flags`] of classes listing this attribute.
    pub carried_by: Vec<usize>,
    /// Indices into [`ObjectIr::flags`] of classes requiring this attribute.
    pub required_by: Vec<usize>,
}

/// How the object computes its DN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DnIr {
    /// The DN is whatever was last stored.
    Stored,
    /// The DN is formatted from attribute fields.
    Formatted {
        /// `format!` pattern with one `{}` per argument.
        pattern: String,
        /// Indices into [`ObjectIr::fields`], in argument order.
        arguments: Vec<usize>,
    },
}

/// A generated object type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectIr {
    /// Rust type identifier.
    pub type_name: String,
    /// Descriptor name, reported in marshal errors.
    pub object_name: String,
    /// Type documentation.
    pub description: String,
    /// Filter object class.
    pub filter_object_class: String,
    /// Object class flags in descriptor order.
    pub flags: Vec<FlagIr>,
    /// Attribute fields, MUST first.
    pub fields: Vec<FieldIr>,
    /// DN computation.
    pub dn: DnIr,
}

/// Tracks assigned identifiers so that no two members share one.
struct IdentTable {
    owners: BTreeMap<String, String>,
}

impl IdentTable {
    fn new() -> Self {
        let mut owners = BTreeMap::new();
        owners.insert(String::from(DN_FIELD), String::from("the stored DN"));
        Self { owners }
    }

    fn claim(&mut self, ident: String, owner: String) -> Result<String, SemanticError> {
        if ident.is_empty() || ident == "is_" {
            return Err(SemanticError::InvalidIdentifier(owner));
        }
        if let Some(first) = self.owners.get(&ident) {
            return Err(SemanticError::IdentifierCollision {
                ident,
                first: first.clone(),
                second: owner,
            });
        }
        self.owners.insert(ident.clone(), owner);
        Ok(ident)
    }
}

/// Lower a resolved object.
///
/// # Errors
///
/// Returns a [`SemanticError`] if an identifier cannot be derived, if the
/// type name would shadow a prelude item, if two
/// members map to one identifier, or if the DN template's placeholder count
/// differs from the number of DN attributes.
pub fn lower_object(object: &ResolvedObject<'_>) -> Result<ObjectIr, SemanticError> {
    let type_name = type_ident(&object.name);
    if type_name.is_empty() {
        return Err(SemanticError::InvalidIdentifier(object.name.clone()));
    }
    if is_prelude_name(&type_name) {
        return Err(SemanticError::ReservedTypeName(type_name));
    }

    let mut idents = IdentTable::new();

    let flags = object
        .classes
        .iter()
        .map(|class| {
            let ident = idents.claim(
                flag_ident(&class.name),
                format!("object class {}", class.name),
            )?;
            Ok(FlagIr {
                ident,
                object_class: class.name.clone(),
                aliases: class.aliases.clone(),
            })
        })
        .collect::<Result<Vec<_>, SemanticError>>()?;

    let mut fields = Vec::with_capacity(object.must.len() + object.may.len());
    for (presence, attribute) in object.attributes() {
        let ident = idents.claim(
            field_ident(&attribute.name),
            format!("attribute {}", attribute.name),
        )?;
        let carried_by = object
            .classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.lists(&attribute.name))
            .map(|(i, _)| i)
            .collect();
        let required_by = object
            .classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.requires(&attribute.name))
            .map(|(i, _)| i)
            .collect();
        fields.push(FieldIr {
            ident,
            attribute: attribute.name.clone(),
            cardinality: if attribute.is_single_valued() {
                Cardinality::Single
            } else {
                Cardinality::Multi
            },
            presence,
            description: attribute.definition.description.clone(),
            carried_by,
            required_by,
        });
    }

    let dn = match &object.dn_format {
        None => DnIr::Stored,
        Some(template) => {
            let translated = dn::translate(template);
            if translated.placeholders != object.dn_attributes.len() {
                return Err(SemanticError::DnPlaceholderMismatch {
                    placeholders: translated.placeholders,
                    attributes: object.dn_attributes.len(),
                });
            }
            let arguments = object
                .dn_attributes
                .iter()
                .map(|name| {
                    fields
                        .iter()
                        .position(|f: &FieldIr| &f.attribute == name)
                        .ok_or_else(|| SemanticError::UndefinedDnAttribute(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            DnIr::Formatted {
                pattern: translated.pattern,
                arguments,
            }
        }
    };

    Ok(ObjectIr {
        type_name,
        object_name: object.name.clone(),
        description: object.description.clone(),
        filter_object_class: object.filter_object_class.clone(),
        flags,
        fields,
        dn,
    })
}
