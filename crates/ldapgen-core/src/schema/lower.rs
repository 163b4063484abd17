//! Lowering from AST statements to registry definitions.
//!
//! Fields are folded in source order. A repeated field overwrites the
//! earlier value, except for extensions, which accumulate.

use super::definition::{AttributeTypeDef, ClassKind, Extension, ObjectClassDef, Usage};
use crate::ast::{AttributeField, AttributeTypeStmt, ExtensionClause, Ident, ObjectClassField, ObjectClassStmt};
use crate::lexer::Diagnostic;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Lower an attribute type stanza.
pub(crate) fn lower_attribute_type(
    stmt: &AttributeTypeStmt,
    diagnostics: &mut Vec<Diagnostic>,
) -> AttributeTypeDef {
    let mut def = AttributeTypeDef::new(stmt.oid.name.clone());

    for field in &stmt.fields {
        match field {
            AttributeField::Name(names) => {
                def.names = names.iter().map(|n| n.value.clone()).collect();
            }
            AttributeField::Desc(desc) => def.description = desc.value.clone(),
            AttributeField::Obsolete => def.obsolete = true,
            AttributeField::Sup(oid) => def.superior = Some(oid.name.clone()),
            AttributeField::Equality(oid) => def.equality = Some(oid.name.clone()),
            AttributeField::Ordering(oid) => def.ordering = Some(oid.name.clone()),
            AttributeField::Substr(oid) => def.substr = Some(oid.name.clone()),
            AttributeField::Syntax(oid) => def.syntax = Some(oid.name.clone()),
            AttributeField::SingleValue => def.single_value = true,
            AttributeField::Collective => def.collective = true,
            AttributeField::NoUserModification => def.no_user_modification = true,
            AttributeField::Usage(keyword) => match Usage::from_keyword(&keyword.name) {
                Some(usage) => def.usage = usage,
                None => diagnostics.push(Diagnostic::warning(
                    keyword.span,
                    format!(
                        "unknown usage '{}' for attribute type {}, keeping {}",
                        keyword.name, stmt.oid.name, def.usage
                    ),
                )),
            },
            AttributeField::Extension(ext) => def.extensions.push(lower_extension(ext)),
        }
    }

    if def.names.is_empty() {
        diagnostics.push(Diagnostic::warning(
            stmt.span,
            format!(
                "attribute type {} has no NAME; registered under its OID only",
                stmt.oid.name
            ),
        ));
    }

    def
}

/// Lower an object class stanza.
pub(crate) fn lower_object_class(
    stmt: &ObjectClassStmt,
    diagnostics: &mut Vec<Diagnostic>,
) -> ObjectClassDef {
    let mut def = ObjectClassDef::new(stmt.oid.name.clone());
    let mut named = false;

    for field in &stmt.fields {
        match field {
            ObjectClassField::Name(names) => {
                if let Some((first, rest)) = names.split_first() {
                    def.name = first.value.clone();
                    def.aliases = rest.iter().map(|n| n.value.clone()).collect();
                    named = true;
                }
            }
            ObjectClassField::Desc(desc) => def.description = desc.value.clone(),
            ObjectClassField::Obsolete => def.obsolete = true,
            ObjectClassField::Sup(oids) => def.superiors = names_of(oids),
            ObjectClassField::Abstract => def.kind = ClassKind::Abstract,
            ObjectClassField::Structural => def.kind = ClassKind::Structural,
            ObjectClassField::Auxiliary => def.kind = ClassKind::Auxiliary,
            ObjectClassField::Must(oids) => def.must = names_of(oids),
            ObjectClassField::May(oids) => def.may = names_of(oids),
            ObjectClassField::Extension(ext) => def.extensions.push(lower_extension(ext)),
        }
    }

    if !named {
        diagnostics.push(Diagnostic::warning(
            stmt.span,
            format!(
                "object class {} has no NAME; registered under its OID only",
                stmt.oid.name
            ),
        ));
    }

    def
}

fn names_of(oids: &[Ident]) -> Vec<String> {
    oids.iter().map(|oid| oid.name.clone()).collect()
}

fn lower_extension(ext: &ExtensionClause) -> Extension {
    Extension {
        name: ext.name.name.clone(),
        values: ext.values.iter().map(|v| v.value.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::parser::Parser;

    fn parse_one(source: &str) -> Statement {
        let parsed = Parser::new(source).parse_schema();
        assert!(!parsed.has_errors(), "{:?}", parsed.diagnostics);
        parsed.statements.into_iter().next().unwrap()
    }

    fn lower_attr(source: &str) -> (AttributeTypeDef, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let def = match parse_one(source) {
            Statement::AttributeType(stmt) => lower_attribute_type(&stmt, &mut diagnostics),
            Statement::ObjectClass(_) => panic!("expected attributetype"),
        };
        (def, diagnostics)
    }

    fn lower_class(source: &str) -> (ObjectClassDef, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let def = match parse_one(source) {
            Statement::ObjectClass(stmt) => lower_object_class(&stmt, &mut diagnostics),
            Statement::AttributeType(_) => panic!("expected objectclass"),
        };
        (def, diagnostics)
    }

    #[test]
    fn test_attribute_fields() {
        let (def, diagnostics) = lower_attr(
            "attributetype ( 1.3.6.1.1.1.1.0 NAME 'uidNumber' DESC 'numeric uid' \
             EQUALITY integerMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.27 SINGLE-VALUE \
             X-ORIGIN 'RFC 2307' )",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(def.oid, "1.3.6.1.1.1.1.0");
        assert_eq!(def.names, ["uidNumber"]);
        assert_eq!(def.description, "numeric uid");
        assert_eq!(def.equality.as_deref(), Some("integerMatch"));
        assert_eq!(def.syntax.as_deref(), Some("1.3.6.1.4.1.1466.115.121.1.27"));
        assert!(def.single_value);
        assert_eq!(def.usage, Usage::UserApplications);
        assert_eq!(def.extensions[0].name, "X-ORIGIN");
        assert_eq!(def.extensions[0].values, ["RFC 2307"]);
    }

    #[test]
    fn test_last_field_wins() {
        let (def, _) = lower_attr("attributetype ( 1.1 NAME 'a' DESC 'first' DESC 'second' )");
        assert_eq!(def.description, "second");
    }

    #[test]
    fn test_unknown_usage_warns() {
        let (def, diagnostics) = lower_attr("attributetype ( 1.1 NAME 'a' USAGE whenever )");
        assert_eq!(def.usage, Usage::UserApplications);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_nameless_attribute_warns() {
        let (def, diagnostics) = lower_attr("attributetype ( 1.1 SINGLE-VALUE )");
        assert!(def.names.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_object_class_fields() {
        let (def, diagnostics) = lower_class(
            "objectclass ( 1.3.6.1.1.1.2.0 NAME ( 'posixAccount' 'posixUser' ) SUP top AUXILIARY \
             MUST ( cn $ uid $ uidNumber $ gidNumber $ homeDirectory ) \
             MAY ( userPassword $ loginShell $ gecos $ description ) )",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(def.name, "posixAccount");
        assert_eq!(def.aliases, ["posixUser"]);
        assert_eq!(def.superiors, ["top"]);
        assert_eq!(def.kind, ClassKind::Auxiliary);
        assert_eq!(def.must.len(), 5);
        assert_eq!(def.may.len(), 4);
    }

    #[test]
    fn test_nameless_object_class_uses_oid() {
        let (def, diagnostics) = lower_class("objectclass ( 1.2.3 MUST cn )");
        assert_eq!(def.name, "1.2.3");
        assert_eq!(diagnostics.len(), 1);
    }
}
