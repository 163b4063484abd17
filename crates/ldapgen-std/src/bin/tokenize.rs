//! Token dump utility for inspecting how schema text is tokenized.
//!
//! Usage: ldapgen-tokenize <file>
//!
//! Outputs one token per line as `LINE:COL<TAB>KIND<TAB>text`, followed by
//! any diagnostics.

use std::env;
use std::fs;
use std::process;

use ldapgen_core::lexer::{Lexer, TokenKind};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        process::exit(1);
    }

    let path = &args[1];
    let source = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{path}: {e}");
            process::exit(1);
        }
    };

    let lexer = Lexer::new(&source);
    let (tokens, diagnostics) = lexer.tokenize();

    for token in &tokens {
        let (line, col) = token.span.line_col(&source);
        let text = escape_text(token.text(&source));
        println!("{line}:{col}\t{}\t{text}", kind_name(token.kind));
    }

    for diagnostic in &diagnostics {
        let (line, col) = diagnostic.span.line_col(&source);
        eprintln!("{path}:{line}:{col}: {diagnostic}");
    }
    if diagnostics.iter().any(|d| d.is_error()) {
        process::exit(1);
    }
}

/// Escape newlines and tabs for output.
fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Eof => "EOF",
        TokenKind::KwAttributeType => "ATTRIBUTETYPE",
        TokenKind::KwObjectClass => "OBJECTCLASS",
        TokenKind::LParen => "LPAREN",
        TokenKind::RParen => "RPAREN",
        TokenKind::Dollar => "DOLLAR",
        TokenKind::String => "STRING",
        TokenKind::Oid => "OID",
        TokenKind::NumericOid => "NUMERICOID",
        TokenKind::Extension => "EXTENSION",
        field => field.describe(),
    }
}
