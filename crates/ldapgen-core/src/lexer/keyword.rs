//! Keyword lookup tables.
//!
//! Uses a sorted static array with binary search for `no_std` compatibility.
//! Field keywords are matched case-insensitively.

use super::TokenKind;

/// Keyword entry mapping text to token kind.
struct KeywordEntry {
    text: &'static str,
    kind: TokenKind,
}

/// Sorted field keyword table for binary search.
///
/// IMPORTANT: This table MUST be sorted by ASCII byte order and every entry
/// MUST be uppercase. The test `test_keywords_sorted` verifies both.
static FIELD_KEYWORDS: &[KeywordEntry] = &[
    KeywordEntry {
        text: "ABSTRACT",
        kind: TokenKind::KwAbstract,
    },
    KeywordEntry {
        text: "AUXILIARY",
        kind: TokenKind::KwAuxiliary,
    },
    KeywordEntry {
        text: "COLLECTIVE",
        kind: TokenKind::KwCollective,
    },
    KeywordEntry {
        text: "DESC",
        kind: TokenKind::KwDesc,
    },
    KeywordEntry {
        text: "EQUALITY",
        kind: TokenKind::KwEquality,
    },
    KeywordEntry {
        text: "MAY",
        kind: TokenKind::KwMay,
    },
    KeywordEntry {
        text: "MUST",
        kind: TokenKind::KwMust,
    },
    KeywordEntry {
        text: "NAME",
        kind: TokenKind::KwName,
    },
    KeywordEntry {
        text: "NO-USER-MODIFICATION",
        kind: TokenKind::KwNoUserModification,
    },
    KeywordEntry {
        text: "OBSOLETE",
        kind: TokenKind::KwObsolete,
    },
    KeywordEntry {
        text: "ORDERING",
        kind: TokenKind::KwOrdering,
    },
    KeywordEntry {
        text: "SINGLE-VALUE",
        kind: TokenKind::KwSingleValue,
    },
    KeywordEntry {
        text: "STRUCTURAL",
        kind: TokenKind::KwStructural,
    },
    KeywordEntry {
        text: "SUBSTR",
        kind: TokenKind::KwSubstr,
    },
    KeywordEntry {
        text: "SUP",
        kind: TokenKind::KwSup,
    },
    KeywordEntry {
        text: "SYNTAX",
        kind: TokenKind::KwSyntax,
    },
    KeywordEntry {
        text: "USAGE",
        kind: TokenKind::KwUsage,
    },
];

/// Look up a field keyword, ignoring ASCII case.
#[must_use]
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    FIELD_KEYWORDS
        .binary_search_by(|entry| {
            entry
                .text
                .bytes()
                .cmp(text.bytes().map(|b| b.to_ascii_uppercase()))
        })
        .ok()
        .map(|idx| FIELD_KEYWORDS[idx].kind)
}

/// Look up a statement keyword (`attributetype` or `objectclass`), ignoring
/// ASCII case.
#[must_use]
pub fn lookup_statement(text: &str) -> Option<TokenKind> {
    if text.eq_ignore_ascii_case("attributetype") {
        Some(TokenKind::KwAttributeType)
    } else if text.eq_ignore_ascii_case("objectclass") {
        Some(TokenKind::KwObjectClass)
    } else {
        None
    }
}

/// Check if a field names a private extension (`X-...`).
#[must_use]
pub fn is_extension(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 2 && bytes[0].eq_ignore_ascii_case(&b'x') && bytes[1] == b'-'
}
