//! Rust code generation.
//!
//! A [`ResolvedObject`] is lowered to an [`ObjectIr`] and printed as a
//! struct plus an implementation of the runtime's `Item` trait. Generated
//! code names runtime items by full path, so it needs no `use` declarations
//! and several objects can share one file.

pub mod dn;
pub mod ident;
pub mod ir;

pub use ir::{lower_object, Cardinality, DnIr, FieldIr, FlagIr, ObjectIr};

use crate::error::SemanticError;
use crate::resolver::ResolvedObject;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};
use ident::string_literal;

/// Default path of the runtime crate in generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::ldapgen_runtime";

/// First line of every generated module.
pub const GENERATED_MARKER: &str = "// @generated by ldapgen. Do not edit.";

/// Configuration for code generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Path under which generated code reaches `Entry`, `Item` and
    /// `MarshalError`.
    pub runtime_path: String,
    /// Extra comment lines written after the module marker.
    pub header: Vec<String>,
    /// Derive `serde::Serialize` and `serde::Deserialize` on generated
    /// structs. Empty attribute fields are skipped when serializing and the
    /// DN is not serialized.
    pub derive_serde: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_path: String::from(DEFAULT_RUNTIME_PATH),
            header: Vec::new(),
            derive_serde: false,
        }
    }
}

/// Prints object IRs as Rust source.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    options: EmitOptions,
}

impl Emitter {
    /// Create an emitter with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter with the given options.
    #[must_use]
    pub fn with_options(options: EmitOptions) -> Self {
        Self { options }
    }

    /// Emitter options.
    #[must_use]
    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Lower and print one resolved object.
    ///
    /// # Errors
    ///
    /// Returns a [`SemanticError`] if the object cannot be lowered.
    pub fn emit(&self, object: &ResolvedObject<'_>) -> Result<String, SemanticError> {
        let ir = lower_object(object)?;
        Ok(self.emit_ir(&ir))
    }

    /// Print one object.
    #[must_use]
    pub fn emit_ir(&self, ir: &ObjectIr) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_object(&mut out, ir);
        out
    }

    /// Print a module holding several objects, headed by the marker line.
    #[must_use]
    pub fn emit_module(&self, objects: &[ObjectIr]) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_MARKER);
        out.push('\n');
        for line in &self.options.header {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
        for ir in objects {
            out.push('\n');
            let _ = self.write_object(&mut out, ir);
        }
        out
    }

    fn write_object(&self, out: &mut String, ir: &ObjectIr) -> fmt::Result {
        self.write_struct(out, ir)?;
        out.push('\n');
        self.write_inherent_impl(out, ir)?;
        out.push('\n');
        self.write_item_impl(out, ir)
    }

    fn write_struct(&self, out: &mut String, ir: &ObjectIr) -> fmt::Result {
        write_doc(out, "", &ir.description)?;
        if !ir.description.is_empty() {
            writeln!(out, "///")?;
        }
        let classes: Vec<String> = ir
            .flags
            .iter()
            .map(|f| format!("`{}`", f.object_class))
            .collect();
        writeln!(out, "/// Object classes: {}.", classes.join(", "))?;
        let serde = self.options.derive_serde;
        if serde {
            writeln!(
                out,
                "#[derive(Clone, Debug, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]"
            )?;
            writeln!(out, "#[serde(default)]")?;
        } else {
            writeln!(out, "#[derive(Clone, Debug, Default, PartialEq, Eq)]")?;
        }
        writeln!(out, "pub struct {} {{", ir.type_name)?;
        if serde {
            writeln!(out, "    #[serde(skip)]")?;
        }
        writeln!(out, "    {}: String,", ir::DN_FIELD)?;
        for flag in &ir.flags {
            writeln!(
                out,
                "    /// Set when the entry carries the `{}` object class.",
                flag.object_class
            )?;
            writeln!(out, "    pub {}: bool,", flag.ident)?;
        }
        for field in &ir.fields {
            write_doc(out, "    ", &field.description)?;
            let (ty, is_empty) = match field.cardinality {
                Cardinality::Single => ("String", "String::is_empty"),
                Cardinality::Multi => ("Vec<String>", "Vec::is_empty"),
            };
            if serde {
                writeln!(
                    out,
                    "    #[serde(rename = {}, skip_serializing_if = \"{is_empty}\")]",
                    string_literal(&field.attribute)
                )?;
            }
            writeln!(out, "    pub {}: {ty},", field.ident)?;
        }
        writeln!(out, "}}")
    }

    fn write_inherent_impl(&self, out: &mut String, ir: &ObjectIr) -> fmt::Result {
        writeln!(out, "impl {} {{", ir.type_name)?;
        writeln!(out, "    /// Name reported in marshal errors.")?;
        writeln!(
            out,
            "    pub const OBJECT_NAME: &'static str = {};",
            string_literal(&ir.object_name)
        )?;
        writeln!(out, "    /// Object class used to search for entries of this type.")?;
        writeln!(
            out,
            "    pub const FILTER_OBJECT_CLASS: &'static str = {};",
            string_literal(&ir.filter_object_class)
        )?;
        writeln!(out)?;
        writeln!(out, "    /// Create an empty object with the given DN.")?;
        writeln!(out, "    pub fn new(dn: impl Into<String>) -> Self {{")?;
        writeln!(out, "        Self {{")?;
        writeln!(out, "            {}: dn.into(),", ir::DN_FIELD)?;
        writeln!(out, "            ..Self::default()")?;
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    /// Replace the stored DN.")?;
        writeln!(out, "    pub fn set_dn(&mut self, dn: impl Into<String>) {{")?;
        writeln!(out, "        self.{} = dn.into();", ir::DN_FIELD)?;
        writeln!(out, "    }}")?;

        if let DnIr::Formatted { pattern, arguments } = &ir.dn {
            let names: Vec<String> = arguments
                .iter()
                .filter_map(|&i| ir.fields.get(i))
                .map(|f| format!("`{}`", f.attribute))
                .collect();
            let args: Vec<String> = arguments
                .iter()
                .filter_map(|&i| ir.fields.get(i))
                .map(dn_argument)
                .collect();
            writeln!(out)?;
            writeln!(out, "    /// Compute the DN from {}.", names.join(", "))?;
            writeln!(out, "    pub fn formatted_dn(&self) -> String {{")?;
            writeln!(
                out,
                "        format!({}, {})",
                string_literal(pattern),
                args.join(", ")
            )?;
            writeln!(out, "    }}")?;
            writeln!(out)?;
            writeln!(out, "    /// Store the computed DN.")?;
            writeln!(out, "    pub fn format_dn(&mut self) {{")?;
            writeln!(out, "        self.{} = self.formatted_dn();", ir::DN_FIELD)?;
            writeln!(out, "    }}")?;
        }
        writeln!(out, "}}")
    }

    fn write_item_impl(&self, out: &mut String, ir: &ObjectIr) -> fmt::Result {
        let rt = self.options.runtime_path.as_str();

        writeln!(out, "impl {rt}::Item for {} {{", ir.type_name)?;
        writeln!(out, "    fn copy(&self) -> Self {{")?;
        writeln!(out, "        self.clone()")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    fn dn(&self) -> String {{")?;
        match ir.dn {
            DnIr::Stored => writeln!(out, "        self.{}.clone()", ir::DN_FIELD)?,
            DnIr::Formatted { .. } => writeln!(out, "        self.formatted_dn()")?,
        }
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    fn filter_object_class(&self) -> &str {{")?;
        writeln!(out, "        Self::FILTER_OBJECT_CLASS")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        self.write_marshal(out, ir)?;
        writeln!(out)?;
        self.write_unmarshal(out, ir)?;
        writeln!(out, "}}")
    }

    fn write_marshal(&self, out: &mut String, ir: &ObjectIr) -> fmt::Result {
        let rt = self.options.runtime_path.as_str();

        writeln!(
            out,
            "    fn marshal(&self) -> Result<{rt}::Entry, {rt}::MarshalError> {{"
        )?;
        writeln!(out, "        let mut entry = {rt}::Entry::new({rt}::Item::dn(self));")?;
        for flag in &ir.flags {
            writeln!(out, "        if self.{} {{", flag.ident)?;
            writeln!(
                out,
                "            entry.add_value(\"objectClass\", {});",
                string_literal(&flag.object_class)
            )?;
            writeln!(out, "        }}")?;
        }

        for field in &ir.fields {
            let attribute = string_literal(&field.attribute);
            writeln!(out, "        if {} {{", any_flag(ir, &field.carried_by))?;
            if !field.required_by.is_empty() {
                if field.required_by == field.carried_by {
                    writeln!(out, "            if self.{}.is_empty() {{", field.ident)?;
                } else {
                    writeln!(
                        out,
                        "            if ({}) && self.{}.is_empty() {{",
                        any_flag(ir, &field.required_by),
                        field.ident
                    )?;
                }
                writeln!(
                    out,
                    "                return Err({rt}::MarshalError::EmptyAttribute {{"
                )?;
                writeln!(out, "                    object: Self::OBJECT_NAME,")?;
                writeln!(out, "                    attribute: {attribute},")?;
                writeln!(out, "                }});")?;
                writeln!(out, "            }}")?;
            }
            match field.cardinality {
                Cardinality::Multi => {
                    writeln!(
                        out,
                        "            entry.add_values({attribute}, &self.{});",
                        field.ident
                    )?;
                }
                Cardinality::Single => {
                    writeln!(out, "            if !self.{}.is_empty() {{", field.ident)?;
                    writeln!(
                        out,
                        "                entry.add_value({attribute}, self.{}.as_str());",
                        field.ident
                    )?;
                    writeln!(out, "            }}")?;
                }
            }
            writeln!(out, "        }}")?;
        }

        writeln!(out, "        Ok(entry)")?;
        writeln!(out, "    }}")
    }

    fn write_unmarshal(&self, out: &mut String, ir: &ObjectIr) -> fmt::Result {
        let rt = self.options.runtime_path.as_str();

        writeln!(
            out,
            "    fn unmarshal(&mut self, entry: &{rt}::Entry) -> Result<(), {rt}::MarshalError> {{"
        )?;
        writeln!(out, "        self.{} = entry.dn().to_owned();", ir::DN_FIELD)?;
        for flag in &ir.flags {
            let checks: Vec<String> = core::iter::once(&flag.object_class)
                .chain(&flag.aliases)
                .map(|name| format!("entry.has_object_class({})", string_literal(name)))
                .collect();
            writeln!(out, "        self.{} = {};", flag.ident, checks.join(" || "))?;
        }
        for field in &ir.fields {
            let attribute = string_literal(&field.attribute);
            match field.cardinality {
                Cardinality::Multi => writeln!(
                    out,
                    "        self.{} = entry.values({attribute}).to_vec();",
                    field.ident
                )?,
                Cardinality::Single => writeln!(
                    out,
                    "        self.{} = entry.first_value({attribute}).unwrap_or_default().to_owned();",
                    field.ident
                )?,
            }
        }
        writeln!(out, "        Ok(())")?;
        writeln!(out, "    }}")
    }
}

/// Lower and print one resolved object with default options.
///
/// # Errors
///
/// Returns a [`SemanticError`] if the object cannot be lowered.
pub fn emit(object: &ResolvedObject<'_>) -> Result<String, SemanticError> {
    Emitter::new().emit(object)
}

/// `self.is_a || self.is_b` for the given flag indices.
fn any_flag(ir: &ObjectIr, indices: &[usize]) -> String {
    let parts: Vec<String> = indices
        .iter()
        .filter_map(|&i| ir.flags.get(i))
        .map(|flag| format!("self.{}", flag.ident))
        .collect();
    if parts.is_empty() {
        String::from("false")
    } else {
        parts.join(" || ")
    }
}

/// Expression yielding the DN text of one field.
fn dn_argument(field: &FieldIr) -> String {
    match field.cardinality {
        Cardinality::Single => format!("self.{}", field.ident),
        Cardinality::Multi => format!(
            "self.{}.first().map_or(\"\", String::as_str)",
            field.ident
        ),
    }
}

fn write_doc(out: &mut String, indent: &str, text: &str) -> fmt::Result {
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            writeln!(out, "{indent}///")?;
        } else {
            writeln!(out, "{indent}/// {line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ObjectDescriptor;
    use crate::parse_schema;
    use crate::resolver::resolve;
    use alloc::vec;

    const SCHEMA: &str = "
        attributetype ( 2.5.4.3 NAME ( 'cn' 'commonName' ) DESC 'common name(s)' )
        attributetype ( 0.9.2342.19200300.100.1.1 NAME 'uid' )
        attributetype ( 1.3.6.1.1.1.1.0 NAME 'uidNumber' SINGLE-VALUE )
        attributetype ( 1.3.6.1.1.1.1.1 NAME 'gidNumber' SINGLE-VALUE )
        attributetype ( 1.3.6.1.1.1.1.3 NAME 'homeDirectory' SINGLE-VALUE )
        attributetype ( 2.5.4.35 NAME 'userPassword' )
        attributetype ( 2.5.4.13 NAME 'description' )
        objectclass ( 1.3.6.1.1.1.2.0 NAME ( 'posixAccount' 'posixUser' ) SUP top AUXILIARY
            MUST ( cn $ uid $ uidNumber $ gidNumber $ homeDirectory )
            MAY userPassword )
        objectclass ( 9.9.9 NAME 'described' AUXILIARY MUST description )
        objectclass ( 9.9.8 NAME 'annotated' AUXILIARY MAY description )
    ";

    fn generate(descriptor: &ObjectDescriptor) -> String {
        let schema = parse_schema(SCHEMA).unwrap();
        let object = resolve(descriptor, &schema).unwrap();
        emit(&object).unwrap()
    }

    fn account() -> ObjectDescriptor {
        ObjectDescriptor::new("Account", ["posixAccount"])
            .with_desc("A POSIX account.")
            .with_filter_object_class("posixAccount")
    }

    #[test]
    fn test_struct_fields() {
        let code = generate(&account());
        assert!(code.contains("/// A POSIX account.\n///\n/// Object classes: `posixAccount`.\n"));
        assert!(code.contains("pub struct Account {\n    dn: String,\n"));
        assert!(code.contains("    pub is_posix_account: bool,\n"));
        assert!(code.contains("    /// common name(s)\n    pub cn: Vec<String>,\n"));
        assert!(code.contains("    pub uid_number: String,\n"));
        assert!(code.contains("    pub user_password: Vec<String>,\n"));
    }

    #[test]
    fn test_item_impl() {
        let code = generate(&account());
        assert!(code.contains("impl ::ldapgen_runtime::Item for Account {"));
        assert!(code.contains("pub const FILTER_OBJECT_CLASS: &'static str = \"posixAccount\";"));
        assert!(code.contains("pub const OBJECT_NAME: &'static str = \"Account\";"));
        assert!(code.contains("        self.dn.clone()\n"));
    }

    #[test]
    fn test_marshal_checks_required() {
        let code = generate(&account());
        assert!(code.contains(
            "        if self.is_posix_account {\n\
             \x20           if self.uid.is_empty() {\n\
             \x20               return Err(::ldapgen_runtime::MarshalError::EmptyAttribute {\n\
             \x20                   object: Self::OBJECT_NAME,\n\
             \x20                   attribute: \"uid\",\n"
        ));
        assert!(code.contains("entry.add_value(\"objectClass\", \"posixAccount\");"));
        assert!(code.contains("entry.add_values(\"uid\", &self.uid);"));
        assert!(code.contains("entry.add_value(\"uidNumber\", self.uid_number.as_str());"));
    }

    #[test]
    fn test_optional_attribute_has_no_check() {
        let code = generate(&account());
        assert!(!code.contains("self.user_password.is_empty()"));
    }

    #[test]
    fn test_unmarshal_without_aliases() {
        let code = generate(&ObjectDescriptor::new("Note", ["described"]));
        assert!(code.contains("        self.is_described = entry.has_object_class(\"described\");\n"));
    }

    #[test]
    fn test_partially_required_attribute() {
        let code = generate(&ObjectDescriptor::new("Note", ["annotated", "described"]));
        assert!(code.contains("        if self.is_annotated || self.is_described {\n"));
        assert!(code.contains("            if (self.is_described) && self.description.is_empty() {\n"));
    }

    #[test]
    fn test_unmarshal() {
        let code = generate(&account());
        assert!(code.contains(
            "self.is_posix_account = entry.has_object_class(\"posixAccount\") \
             || entry.has_object_class(\"posixUser\");"
        ));
        assert!(code.contains("self.cn = entry.values(\"cn\").to_vec();"));
        assert!(code.contains(
            "self.home_directory = entry.first_value(\"homeDirectory\").unwrap_or_default().to_owned();"
        ));
    }

    #[test]
    fn test_formatted_dn() {
        let code = generate(&account().with_dn("uid=%v,gid=%v,ou={people}", ["uid", "gidNumber"]));
        assert!(code.contains(
            "format!(\"uid={},gid={},ou={{people}}\", \
             self.uid.first().map_or(\"\", String::as_str), self.gid_number)"
        ));
        assert!(code.contains("    pub fn format_dn(&mut self) {"));
        assert!(code.contains("        self.formatted_dn()\n"));
    }

    #[test]
    fn test_runtime_path_option() {
        let schema = parse_schema(SCHEMA).unwrap();
        let object = resolve(&account(), &schema).unwrap();
        let emitter = Emitter::with_options(EmitOptions {
            runtime_path: "crate::runtime".into(),
            header: vec!["extra".into()],
            ..EmitOptions::default()
        });
        let ir = lower_object(&object).unwrap();
        let code = emitter.emit_module(&[ir]);
        assert!(code.starts_with("// @generated by ldapgen. Do not edit.\n// extra\n\n"));
        assert!(code.contains("impl crate::runtime::Item for Account {"));
        assert!(!code.contains("ldapgen_runtime"));
    }

    #[test]
    fn test_no_serde_by_default() {
        let code = generate(&account());
        assert!(!code.contains("serde"));
    }

    #[test]
    fn test_derive_serde() {
        let schema = parse_schema(SCHEMA).unwrap();
        let object = resolve(&account(), &schema).unwrap();
        let emitter = Emitter::with_options(EmitOptions {
            derive_serde: true,
            ..EmitOptions::default()
        });
        let code = emitter.emit(&object).unwrap();
        assert!(code.contains(
            "#[derive(Clone, Debug, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]\n\
             #[serde(default)]\n\
             pub struct Account {\n\
             \x20   #[serde(skip)]\n\
             \x20   dn: String,\n"
        ));
        assert!(code.contains(
            "    #[serde(rename = \"cn\", skip_serializing_if = \"Vec::is_empty\")]\n    pub cn: Vec<String>,\n"
        ));
        assert!(code.contains(
            "    #[serde(rename = \"uidNumber\", skip_serializing_if = \"String::is_empty\")]\n    pub uid_number: String,\n"
        ));
        assert!(code.contains("    pub is_posix_account: bool,\n"));
    }

    #[test]
    fn test_emit_is_deterministic() {
        assert_eq!(generate(&account()), generate(&account()));
    }
}
