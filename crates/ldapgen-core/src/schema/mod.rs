//! Schema registry.
//!
//! Definitions live in arenas addressed by [`AttributeTypeId`] and
//! [`ObjectClassId`]. Name lookup goes through ordered indices keyed by the
//! lowercased name, so every lookup is case-insensitive. A [`SchemaBuilder`]
//! collects definitions while parsing; [`SchemaBuilder::build`] freezes them
//! into an immutable [`Schema`].

mod definition;
mod ids;
mod lower;

pub use definition::{
    AttributeTypeDef, ClassKind, Extension, ObjectClassDef, Usage, MISSING_ATTRIBUTE_DESCRIPTION,
};
pub use ids::{AttributeTypeId, ObjectClassId};

use crate::ast::Statement;
use crate::lexer::{Diagnostic, Span};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use thiserror::Error;

/// Error returned when a registry arena is full.
///
/// Ids are `NonZeroU32`, limiting each arena to `u32::MAX - 1` entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("schema capacity exceeded: too many {kind} (limit: {limit})", limit = u32::MAX - 1)]
pub struct CapacityError {
    /// The kind of definition that exceeded capacity.
    pub kind: &'static str,
}

/// Fold a name into its index key.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Frozen schema registry.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    attribute_types: Vec<AttributeTypeDef>,
    object_classes: Vec<ObjectClassDef>,
    attribute_index: BTreeMap<String, AttributeTypeId>,
    object_class_index: BTreeMap<String, ObjectClassId>,
}

impl Schema {
    /// Look up an attribute type by any of its names or its OID.
    #[must_use]
    pub fn attribute_type(&self, name: &str) -> Option<&AttributeTypeDef> {
        self.attribute_type_id(name)
            .and_then(|id| self.get_attribute_type(id))
    }

    /// Look up the id of an attribute type by any of its names or its OID.
    #[must_use]
    pub fn attribute_type_id(&self, name: &str) -> Option<AttributeTypeId> {
        self.attribute_index.get(&fold_name(name)).copied()
    }

    /// Get an attribute type by id.
    #[must_use]
    pub fn get_attribute_type(&self, id: AttributeTypeId) -> Option<&AttributeTypeDef> {
        self.attribute_types.get(id.to_index())
    }

    /// Look up an object class by any of its names or its OID.
    #[must_use]
    pub fn object_class(&self, name: &str) -> Option<&ObjectClassDef> {
        self.object_class_id(name)
            .and_then(|id| self.get_object_class(id))
    }

    /// Look up the id of an object class by any of its names or its OID.
    #[must_use]
    pub fn object_class_id(&self, name: &str) -> Option<ObjectClassId> {
        self.object_class_index.get(&fold_name(name)).copied()
    }

    /// Get an object class by id.
    #[must_use]
    pub fn get_object_class(&self, id: ObjectClassId) -> Option<&ObjectClassDef> {
        self.object_classes.get(id.to_index())
    }

    /// Iterate over all registered attribute types in registration order.
    ///
    /// Definitions replaced by a later redefinition are still included.
    pub fn attribute_types(&self) -> impl Iterator<Item = (AttributeTypeId, &AttributeTypeDef)> {
        self.attribute_types
            .iter()
            .enumerate()
            .filter_map(|(i, def)| Some((AttributeTypeId::from_index(i)?, def)))
    }

    /// Iterate over all registered object classes in registration order.
    pub fn object_classes(&self) -> impl Iterator<Item = (ObjectClassId, &ObjectClassDef)> {
        self.object_classes
            .iter()
            .enumerate()
            .filter_map(|(i, def)| Some((ObjectClassId::from_index(i)?, def)))
    }

    /// Number of registered attribute types.
    #[must_use]
    pub fn attribute_type_count(&self) -> usize {
        self.attribute_types.len()
    }

    /// Number of registered object classes.
    #[must_use]
    pub fn object_class_count(&self) -> usize {
        self.object_classes.len()
    }

    /// Check if the schema has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attribute_types.is_empty() && self.object_classes.is_empty()
    }

    /// All transitive superiors of an object class, nearest first.
    ///
    /// Superiors that are not registered are skipped. Cycles are tolerated.
    /// Attribute resolution never consults this chain.
    #[must_use]
    pub fn superiors(&self, name: &str) -> Vec<&ObjectClassDef> {
        let mut chain = Vec::new();
        let Some(start) = self.object_class_id(name) else {
            return chain;
        };

        let mut visited = BTreeSet::new();
        visited.insert(start);
        let mut queue: Vec<ObjectClassId> = Vec::new();
        let mut next = 0;
        queue.push(start);

        while let Some(&id) = queue.get(next) {
            next += 1;
            let Some(class) = self.get_object_class(id) else {
                continue;
            };
            for superior in &class.superiors {
                let Some(sup_id) = self.object_class_id(superior) else {
                    continue;
                };
                if visited.insert(sup_id) {
                    if let Some(def) = self.get_object_class(sup_id) {
                        chain.push(def);
                    }
                    queue.push(sup_id);
                }
            }
        }

        chain
    }
}

/// Mutable registry used while parsing.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings produced while registering.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Lower and register a parsed statement.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the matching arena is full.
    pub fn add_statement(&mut self, statement: &Statement) -> Result<(), CapacityError> {
        let oid = statement.oid();
        if !oid.is_numeric_oid() {
            self.diagnostics.push(Diagnostic::warning(
                oid.span,
                format!("definition oid '{}' is not a numeric OID", oid.name),
            ));
        }
        match statement {
            Statement::AttributeType(stmt) => {
                let def = lower::lower_attribute_type(stmt, &mut self.diagnostics);
                self.insert_attribute_type(def, stmt.span)?;
            }
            Statement::ObjectClass(stmt) => {
                let def = lower::lower_object_class(stmt, &mut self.diagnostics);
                self.insert_object_class(def, stmt.span)?;
            }
        }
        Ok(())
    }

    /// Register an attribute type under its OID and every name.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the schema already holds `u32::MAX - 1`
    /// attribute types.
    pub fn add_attribute_type(
        &mut self,
        def: AttributeTypeDef,
    ) -> Result<AttributeTypeId, CapacityError> {
        self.insert_attribute_type(def, Span::default())
    }

    /// Register an object class under its OID, name and aliases.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the schema already holds `u32::MAX - 1`
    /// object classes.
    pub fn add_object_class(&mut self, def: ObjectClassDef) -> Result<ObjectClassId, CapacityError> {
        self.insert_object_class(def, Span::default())
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Schema {
        self.finish().0
    }

    /// Freeze the registry and return the registration warnings.
    #[must_use]
    pub fn finish(self) -> (Schema, Vec<Diagnostic>) {
        log::debug!(
            "schema built: {} attribute types, {} object classes",
            self.schema.attribute_types.len(),
            self.schema.object_classes.len()
        );
        (self.schema, self.diagnostics)
    }

    fn insert_attribute_type(
        &mut self,
        def: AttributeTypeDef,
        span: Span,
    ) -> Result<AttributeTypeId, CapacityError> {
        let id = AttributeTypeId::from_index(self.schema.attribute_types.len())
            .ok_or(CapacityError { kind: "attribute types" })?;

        let keys = core::iter::once(&def.oid).chain(def.names.iter());
        for key in keys {
            let previous = self.schema.attribute_index.insert(fold_name(key), id);
            if previous.is_some_and(|prev| prev != id) && key != &def.oid {
                self.diagnostics.push(Diagnostic::warning(
                    span,
                    format!("redefinition of attribute type '{key}'"),
                ));
            }
        }

        log::trace!("registered attribute type {} ({})", def.name(), def.oid);
        self.schema.attribute_types.push(def);
        Ok(id)
    }

    fn insert_object_class(
        &mut self,
        def: ObjectClassDef,
        span: Span,
    ) -> Result<ObjectClassId, CapacityError> {
        let id = ObjectClassId::from_index(self.schema.object_classes.len())
            .ok_or(CapacityError { kind: "object classes" })?;

        let keys = core::iter::once(&def.oid)
            .chain(core::iter::once(&def.name))
            .chain(def.aliases.iter());
        for key in keys {
            let previous = self.schema.object_class_index.insert(fold_name(key), id);
            if previous.is_some_and(|prev| prev != id) && key != &def.oid {
                self.diagnostics.push(Diagnostic::warning(
                    span,
                    format!("redefinition of object class '{key}'"),
                ));
            }
        }

        log::trace!("registered object class {} ({})", def.name, def.oid);
        self.schema.object_classes.push(def);
        Ok(id)
    }
}
