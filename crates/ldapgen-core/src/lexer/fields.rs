//! Whitespace field scanner.
//!
//! Splits schema text into whitespace-delimited fields with `#` comments
//! removed. A `#` only starts a comment outside of a quoted string; an
//! apostrophe anywhere outside a comment toggles the quoted state.

use super::{ByteOffset, Span};

/// A whitespace-delimited field of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Field<'src> {
    pub text: &'src str,
    pub span: Span,
}

/// Pull scanner over the fields of a source text.
pub(crate) struct Fields<'src> {
    source: &'src str,
    pos: usize,
    in_quote: bool,
}

impl<'src> Fields<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            in_quote: false,
        }
    }

    /// Byte offset just past the last scanned field or comment.
    pub fn offset(&self) -> ByteOffset {
        self.pos as ByteOffset
    }

    fn skip_comment(&mut self) {
        let bytes = self.source.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }
}

impl<'src> Iterator for Fields<'src> {
    type Item = Field<'src>;

    fn next(&mut self) -> Option<Field<'src>> {
        let bytes = self.source.as_bytes();
        loop {
            match bytes.get(self.pos) {
                None => return None,
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') if !self.in_quote => self.skip_comment(),
                Some(_) => break,
            }
        }

        let start = self.pos;
        while let Some(&b) = bytes.get(self.pos) {
            if b.is_ascii_whitespace() || (b == b'#' && !self.in_quote) {
                break;
            }
            if b == b'\'' {
                self.in_quote = !self.in_quote;
            }
            self.pos += 1;
        }

        // Field boundaries fall on ASCII bytes, so the slice is always valid.
        Some(Field {
            text: &self.source[start..self.pos],
            span: Span::new(start as ByteOffset, self.pos as ByteOffset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn texts(source: &str) -> Vec<&str> {
        Fields::new(source).map(|f| f.text).collect()
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(texts("  a\tbb\n\nccc "), ["a", "bb", "ccc"]);
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(texts("# header\na # trailing\nb"), ["a", "b"]);
        assert_eq!(texts("a#b\nc"), ["a", "c"]);
    }

    #[test]
    fn test_hash_inside_quotes_is_kept() {
        assert_eq!(texts("'a # b' c"), ["'a", "#", "b'", "c"]);
    }

    #[test]
    fn test_quotes_inside_comment_are_ignored() {
        assert_eq!(texts("# don't\n'x' # y"), ["'x'"]);
    }

    #[test]
    fn test_spans() {
        let fields: Vec<_> = Fields::new(" ab  c").collect();
        assert_eq!(fields[0].span, Span::new(1, 3));
        assert_eq!(fields[1].span, Span::new(5, 6));
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(texts("'Prénom' é"), ["'Prénom'", "é"]);
    }
}
