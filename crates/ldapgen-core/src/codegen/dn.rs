//! DN template translation.
//!
//! DN templates use printf-style `%v` (or `%s`) placeholders. They are
//! rewritten into `format!` patterns: each placeholder becomes `{}`, `%%`
//! becomes `%`, and literal braces are doubled.

use alloc::string::String;

/// A DN template rewritten as a `format!` pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnPattern {
    /// The `format!` pattern.
    pub pattern: String,
    /// Number of `{}` arguments the pattern takes.
    pub placeholders: usize,
}

/// Translate a DN template into a `format!` pattern.
#[must_use]
pub fn translate(template: &str) -> DnPattern {
    let mut pattern = String::with_capacity(template.len());
    let mut placeholders = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '%' => match chars.peek() {
                Some('v' | 's') => {
                    chars.next();
                    pattern.push_str("{}");
                    placeholders += 1;
                }
                Some('%') => {
                    chars.next();
                    pattern.push('%');
                }
                _ => pattern.push('%'),
            },
            '{' => pattern.push_str("{{"),
            '}' => pattern.push_str("}}"),
            other => pattern.push(other),
        }
    }

    DnPattern {
        pattern,
        placeholders,
    }
}
