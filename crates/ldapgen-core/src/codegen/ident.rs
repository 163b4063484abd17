//! Rust identifier and literal rendering.
//!
//! Schema names are split into words at separators and at case changes
//! (`uidNumber` becomes `uid` + `Number`, `labeledURI` becomes `labeled` +
//! `URI`). Characters outside ASCII letters and digits separate words.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Rust keywords that must be written as raw identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// Prelude types, traits and variants in the type or value namespace.
const PRELUDE_NAMES: &[&str] = &[
    "AsMut", "AsRef", "Box", "Clone", "Copy", "Default", "DoubleEndedIterator", "Drop", "Eq",
    "Err", "ExactSizeIterator", "Extend", "Fn", "FnMut", "FnOnce", "From", "FromIterator",
    "Into", "IntoIterator", "Iterator", "None", "Ok", "Option", "Ord", "PartialEq",
    "PartialOrd", "Result", "Send", "Sized", "Some", "String", "Sync", "ToOwned", "ToString",
    "TryFrom", "TryInto", "Unpin", "Vec",
];

fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(core::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                words.push(core::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn escape_keyword(ident: String) -> String {
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

fn snake(name: &str) -> String {
    let mut out = String::new();
    for word in words(name) {
        if !out.is_empty() {
            out.push('_');
        }
        out.push_str(&word.to_ascii_lowercase());
    }
    out
}

/// Field identifier for an attribute: `uidNumber` becomes `uid_number`.
///
/// Returns an empty string if the name has no letters or digits.
#[must_use]
pub fn field_ident(name: &str) -> String {
    let ident = snake(name);
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{ident}");
    }
    escape_keyword(ident)
}

/// Flag identifier for an object class: `posixAccount` becomes
/// `is_posix_account`.
#[must_use]
pub fn flag_ident(class: &str) -> String {
    format!("is_{}", snake(class))
}

/// Type identifier for an object: `posix-account` becomes `PosixAccount`.
///
/// Returns an empty string if the name has no letters or digits.
#[must_use]
pub fn type_ident(name: &str) -> String {
    let mut out = String::new();
    for word in words(name) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{out}");
    }
    escape_keyword(out)
}

/// Check if a type identifier would shadow a prelude item in generated code.
#[must_use]
pub fn is_prelude_name(ident: &str) -> bool {
    PRELUDE_NAMES.contains(&ident)
}

/// Render a string as a Rust string literal.
#[must_use]
pub fn string_literal(value: &str) -> String {
    format!("{value:?}")
}
