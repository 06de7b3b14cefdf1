//! The raw scanner: turns a byte slice into a stream of `RawToken`s.

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken};

#[must_use]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[must_use]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Characters valid in a resource location path segment, after the `:`.
#[must_use]
fn is_resloc_path_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'/' | b'.' | b'-')
}

#[must_use]
fn is_horizontal_ws(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Tokenize an entire source buffer into raw tokens, including the trailing
/// `Eof`.
pub fn tokenize(source: &str) -> Vec<RawToken> {
    let mut scanner = RawScanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = scanner.next_token();
        let is_eof = tok.tag == RawTag::Eof;
        tokens.push(tok);
        if is_eof {
            break;
        }
    }
    tokens
}

/// Incremental raw scanner. Call [`RawScanner::next_token`] until it returns
/// a token with tag [`RawTag::Eof`].
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
    at_line_start: bool,
}

impl<'a> RawScanner<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        RawScanner {
            cursor: Cursor::new(source.as_bytes()),
            at_line_start: true,
        }
    }

    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        let at_line_start = self.at_line_start;
        let tag = self.scan_one();
        let len = u32::try_from(self.cursor.pos() - start).expect("token exceeds u32::MAX bytes");

        match tag {
            RawTag::Whitespace => {}
            RawTag::Newline => self.at_line_start = true,
            _ => self.at_line_start = false,
        }

        RawToken {
            tag,
            len,
            at_line_start,
        }
    }

    fn scan_one(&mut self) -> RawTag {
        let Some(b) = self.cursor.peek() else {
            return RawTag::Eof;
        };

        if is_horizontal_ws(b) {
            self.cursor.eat_while(is_horizontal_ws);
            return RawTag::Whitespace;
        }

        if b == b'\r' {
            self.cursor.bump();
            if self.cursor.peek() == Some(b'\n') {
                self.cursor.bump();
            }
            return RawTag::Newline;
        }
        if b == b'\n' {
            self.cursor.bump();
            return RawTag::Newline;
        }

        if b == b'/' {
            return self.scan_slash();
        }
        if b == b'"' {
            return self.scan_string();
        }
        if b.is_ascii_digit() || (b == b'-' && self.cursor.peek_at(1).is_some_and(|n| n.is_ascii_digit())) {
            return self.scan_number();
        }
        if is_ident_start(b) {
            return self.scan_ident_or_resloc();
        }

        match b {
            b':' => {
                self.cursor.bump();
                if self.cursor.peek() == Some(b':') {
                    self.cursor.bump();
                    RawTag::ColonColon
                } else {
                    RawTag::Colon
                }
            }
            b'.' => self.scan_dot(),
            b'<' => self.scan_less(),
            b'>' => {
                self.cursor.bump();
                RawTag::Greater
            }
            b'?' => {
                self.cursor.bump();
                RawTag::Question
            }
            b'@' => {
                self.cursor.bump();
                RawTag::At
            }
            b'%' => {
                self.cursor.bump();
                RawTag::Percent
            }
            b'#' => {
                self.cursor.bump();
                if self.cursor.peek() == Some(b'[') {
                    self.cursor.bump();
                    RawTag::HashBracket
                } else {
                    RawTag::Hash
                }
            }
            b'=' => {
                self.cursor.bump();
                RawTag::Equal
            }
            b'|' => {
                self.cursor.bump();
                RawTag::Pipe
            }
            b',' => {
                self.cursor.bump();
                RawTag::Comma
            }
            b'{' => {
                self.cursor.bump();
                RawTag::LBrace
            }
            b'}' => {
                self.cursor.bump();
                RawTag::RBrace
            }
            b'[' => {
                self.cursor.bump();
                RawTag::LBracket
            }
            b']' => {
                self.cursor.bump();
                RawTag::RBracket
            }
            b'(' => {
                self.cursor.bump();
                RawTag::LParen
            }
            b')' => {
                self.cursor.bump();
                RawTag::RParen
            }
            _ => {
                self.cursor.bump();
                RawTag::InvalidByte
            }
        }
    }

    /// `/` starts either a line comment, a doc comment, or (alone) is invalid.
    fn scan_slash(&mut self) -> RawTag {
        self.cursor.bump();
        if self.cursor.peek() != Some(b'/') {
            return RawTag::InvalidByte;
        }
        self.cursor.bump();
        let is_doc = self.cursor.peek() == Some(b'/');
        if is_doc {
            self.cursor.bump();
        }
        self.cursor.eat_while(|b| b != b'\n' && b != b'\r');
        if is_doc {
            RawTag::DocComment
        } else {
            RawTag::LineComment
        }
    }

    fn scan_string(&mut self) -> RawTag {
        self.cursor.bump(); // opening quote
        loop {
            match self.cursor.peek() {
                None | Some(b'\n') => return RawTag::UnterminatedString,
                Some(b'"') => {
                    self.cursor.bump();
                    return RawTag::String;
                }
                Some(b'\\') => {
                    self.cursor.bump();
                    if self.cursor.peek().is_none() {
                        return RawTag::UnterminatedString;
                    }
                    self.cursor.bump();
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// Digits, optional `.digits`, optional exponent, optional one-letter suffix.
    fn scan_number(&mut self) -> RawTag {
        if self.cursor.peek() == Some(b'-') {
            self.cursor.bump();
        }
        self.cursor.eat_while(|b| b.is_ascii_digit());

        let mut is_float = false;
        if self.cursor.peek() == Some(b'.') && self.cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            is_float = true;
            self.cursor.bump();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        if matches!(self.cursor.peek(), Some(b'e' | b'E')) && self.exponent_follows() {
            self.cursor.bump(); // e/E
            if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
                self.cursor.bump();
            }
            is_float = true;
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        // Optional single-letter type suffix, only if not immediately
        // followed by another ident char (so `5build` stays one ident-ish
        // error rather than swallowing a suffix mid-identifier).
        if let Some(c) = self.cursor.peek() {
            if c.is_ascii_alphabetic() && !self.cursor.peek_at(1).is_some_and(is_ident_continue) {
                self.cursor.bump();
            }
        }

        if is_float {
            RawTag::Float
        } else {
            RawTag::Int
        }
    }

    /// `true` if the byte at `peek()` (an `e`/`E`) is followed by an optional
    /// sign and at least one digit, i.e. actually begins an exponent.
    fn exponent_follows(&self) -> bool {
        let after_sign = if matches!(self.cursor.peek_at(1), Some(b'+' | b'-')) {
            2
        } else {
            1
        };
        self.cursor.peek_at(after_sign).is_some_and(|b| b.is_ascii_digit())
    }

    fn scan_ident_or_resloc(&mut self) -> RawTag {
        self.cursor.eat_while(is_ident_continue);
        if self.cursor.peek() == Some(b':') && self.cursor.peek_at(1).is_some_and(is_resloc_path_char) {
            self.cursor.bump(); // ':'
            self.cursor.eat_while(is_resloc_path_char);
            RawTag::ResourceLocation
        } else {
            RawTag::Ident
        }
    }

    /// `.` / `..` / `...` / `..<`
    fn scan_dot(&mut self) -> RawTag {
        self.cursor.bump();
        if self.cursor.peek() != Some(b'.') {
            return RawTag::Dot;
        }
        self.cursor.bump();
        match self.cursor.peek() {
            Some(b'.') => {
                self.cursor.bump();
                RawTag::DotDotDot
            }
            Some(b'<') => {
                self.cursor.bump();
                RawTag::DotDotLess
            }
            _ => RawTag::DotDot,
        }
    }

    /// `<` / `<..` / `<..<`
    fn scan_less(&mut self) -> RawTag {
        self.cursor.bump();
        if self.cursor.peek() != Some(b'.') || self.cursor.peek_at(1) != Some(b'.') {
            return RawTag::Less;
        }
        self.cursor.bump();
        self.cursor.bump();
        if self.cursor.peek() == Some(b'<') {
            self.cursor.bump();
            RawTag::LessDotDotLess
        } else {
            RawTag::LessDotDot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(source: &str) -> Vec<RawTag> {
        tokenize(source).into_iter().map(|t| t.tag).collect()
    }

    #[test]
    fn ident_without_colon_is_plain_ident() {
        assert_eq!(tags("Foo"), vec![RawTag::Ident, RawTag::Eof]);
    }

    #[test]
    fn ident_with_interior_colon_is_resource_location() {
        assert_eq!(tags("foo:bar"), vec![RawTag::ResourceLocation, RawTag::Eof]);
    }

    #[test]
    fn double_colon_is_not_a_resource_location() {
        assert_eq!(tags("foo::bar"), vec![RawTag::Ident, RawTag::ColonColon, RawTag::Ident, RawTag::Eof]);
    }

    #[test]
    fn range_tokens_are_longest_match() {
        assert_eq!(tags(".."), vec![RawTag::DotDot, RawTag::Eof]);
        assert_eq!(tags("..<"), vec![RawTag::DotDotLess, RawTag::Eof]);
        assert_eq!(tags("<.."), vec![RawTag::LessDotDot, RawTag::Eof]);
        assert_eq!(tags("<..<"), vec![RawTag::LessDotDotLess, RawTag::Eof]);
        assert_eq!(tags("..."), vec![RawTag::DotDotDot, RawTag::Eof]);
    }

    #[test]
    fn integer_vs_float() {
        assert_eq!(tags("5"), vec![RawTag::Int, RawTag::Eof]);
        assert_eq!(tags("5.0"), vec![RawTag::Float, RawTag::Eof]);
        assert_eq!(tags("5."), vec![RawTag::Int, RawTag::Dot, RawTag::Eof]);
    }

    #[test]
    fn negative_number_is_one_token() {
        assert_eq!(tags("-5"), vec![RawTag::Int, RawTag::Eof]);
    }

    #[test]
    fn typed_number_suffix_is_part_of_token() {
        let toks = tokenize("5b");
        assert_eq!(toks[0].tag, RawTag::Int);
        assert_eq!(toks[0].len, 2);
    }

    #[test]
    fn exponent_requires_digit_after_sign() {
        assert_eq!(tags("1e10"), vec![RawTag::Float, RawTag::Eof]);
        assert_eq!(tags("1e+10"), vec![RawTag::Float, RawTag::Eof]);
    }

    #[test]
    fn unterminated_string_is_reported() {
        assert_eq!(tags("\"abc"), vec![RawTag::UnterminatedString, RawTag::Eof]);
    }

    #[test]
    fn string_with_escapes_terminates() {
        assert_eq!(tags(r#""a\"b""#), vec![RawTag::String, RawTag::Eof]);
    }

    #[test]
    fn doc_comment_vs_line_comment() {
        assert_eq!(tags("/// doc"), vec![RawTag::DocComment, RawTag::Eof]);
        assert_eq!(tags("// plain"), vec![RawTag::LineComment, RawTag::Eof]);
    }

    #[test]
    fn single_element_tuple_marker_is_comma() {
        assert_eq!(tags("[byte,]"), vec![
            RawTag::LBracket,
            RawTag::Ident,
            RawTag::Comma,
            RawTag::RBracket,
            RawTag::Eof,
        ]);
    }

    #[test]
    fn percent_is_one_token() {
        assert_eq!(tags("%none"), vec![RawTag::Percent, RawTag::Ident, RawTag::Eof]);
    }

    #[test]
    fn attribute_opener_is_one_token() {
        assert_eq!(tags("#[foo]"), vec![
            RawTag::HashBracket,
            RawTag::Ident,
            RawTag::RBracket,
            RawTag::Eof,
        ]);
    }

    #[test]
    fn doc_comment_tracks_line_start() {
        let toks = tokenize("x /// not at line start\n/// at line start");
        let docs: Vec<_> = toks.iter().filter(|t| t.tag == RawTag::DocComment).collect();
        assert_eq!(docs.len(), 2);
        assert!(!docs[0].at_line_start);
        assert!(docs[1].at_line_start);
    }
}
