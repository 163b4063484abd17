//! ldapgen-core: LDAP schema compiler
//!
//! Parses `attributetype` / `objectclass` schema text into a [`Schema`]
//! registry, resolves object descriptors against it, and emits Rust types
//! that marshal to and from directory entries.
//! It is `no_std` compatible and IO-free.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ast;
pub mod codegen;
pub mod descriptor;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod schema;

pub use codegen::{EmitOptions, Emitter};
pub use descriptor::ObjectDescriptor;
pub use error::{Error, Result, SemanticError};
pub use lexer::{Diagnostic, Severity, Span};
pub use resolver::{resolve, ResolvedObject};
pub use schema::Schema;

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use parser::Parser;
use schema::SchemaBuilder;

/// Parse schema text into a registry, returning the warnings as well.
///
/// # Errors
///
/// Returns [`Error::Schema`] with every diagnostic if the text has lexical or
/// syntax errors, and [`Error::Capacity`] if the registry overflows.
pub fn build_schema(source: &str) -> Result<(Schema, Vec<Diagnostic>)> {
    let parsed = Parser::new(source).parse_schema();
    if parsed.has_errors() {
        return Err(Error::Schema(parsed.diagnostics));
    }

    let mut builder = SchemaBuilder::new();
    for statement in &parsed.statements {
        builder.add_statement(statement)?;
    }
    let (schema, registration) = builder.finish();

    let mut warnings = parsed.diagnostics;
    warnings.extend(registration);
    warnings.sort_by_key(|d| d.span.start);

    log::info!(
        "parsed {} statements: {} attribute types, {} object classes",
        parsed.statements.len(),
        schema.attribute_type_count(),
        schema.object_class_count()
    );
    Ok((schema, warnings))
}

/// Parse schema text into a registry, logging any warnings.
///
/// # Errors
///
/// See [`build_schema`].
pub fn parse_schema(source: &str) -> Result<Schema> {
    let (schema, warnings) = build_schema(source)?;
    for warning in &warnings {
        log::warn!("{warning}");
    }
    Ok(schema)
}

/// Output of a batch generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generated {
    /// Rust source for every descriptor that succeeded.
    pub source: String,
    /// Type names emitted, in descriptor order.
    pub objects: Vec<String>,
    /// Descriptors that were rejected, by descriptor name.
    pub failures: Vec<(String, SemanticError)>,
}

impl Generated {
    /// Check if every descriptor produced code.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Rejected descriptors as crate errors.
    pub fn errors(&self) -> impl Iterator<Item = Error> + '_ {
        self.failures.iter().map(|(object, source)| Error::Semantic {
            object: object.clone(),
            source: source.clone(),
        })
    }
}

/// Parse a schema and generate code for a batch of descriptors.
///
/// Schema errors fail the whole batch. A descriptor that cannot be resolved
/// or emitted is recorded in [`Generated::failures`] and the rest are still
/// generated.
///
/// # Errors
///
/// See [`build_schema`].
pub fn generate(
    schema_source: &str,
    descriptors: &[ObjectDescriptor],
    options: &EmitOptions,
) -> Result<Generated> {
    let schema = parse_schema(schema_source)?;
    Ok(generate_with_schema(&schema, descriptors, options))
}

/// Generate code for a batch of descriptors against a parsed schema.
#[must_use]
pub fn generate_with_schema(
    schema: &Schema,
    descriptors: &[ObjectDescriptor],
    options: &EmitOptions,
) -> Generated {
    let mut generated = Generated::default();
    let mut irs = Vec::with_capacity(descriptors.len());
    let mut type_names = BTreeSet::new();

    for descriptor in descriptors {
        let lowered = resolve(descriptor, schema).and_then(|object| codegen::lower_object(&object));
        let result = lowered.and_then(|ir| {
            if type_names.insert(ir.type_name.clone()) {
                Ok(ir)
            } else {
                Err(SemanticError::DuplicateTypeName(ir.type_name))
            }
        });
        match result {
            Ok(ir) => {
                log::debug!("generated {} for {}", ir.type_name, descriptor.name);
                generated.objects.push(ir.type_name.clone());
                irs.push(ir);
            }
            Err(err) => {
                log::warn!("{}: {err}", descriptor.name);
                generated.failures.push((descriptor.name.clone(), err));
            }
        }
    }

    generated.source = Emitter::with_options(options.clone()).emit_module(&irs);
    log::info!(
        "generated {} of {} objects",
        generated.objects.len(),
        descriptors.len()
    );
    generated
}
