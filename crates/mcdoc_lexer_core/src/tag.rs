//! Raw token tag and token produced by the low-level scanner.

/// Raw token kind produced by the byte-level scanner.
///
/// This has no knowledge of keywords, interning, or diagnostics — it is the
/// standalone equivalent of `mcdoc_ir::TokenKind`. The cooking layer
/// (`mcdoc_lexer`) turns a stream of these into cooked tokens.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum RawTag {
    /// Identifier or keyword (classified during cooking).
    Ident,
    /// `namespace:path/segments`, distinguished from `Ident` only by an
    /// interior `:`.
    ResourceLocation,
    /// Integer literal, optionally carrying one trailing suffix letter.
    Int,
    /// Float literal (contains `.` or an exponent), optionally suffixed.
    Float,
    /// Double-quoted string literal.
    String,
    /// `///` doc comment, to end of line.
    DocComment,
    /// `//` line comment (not a doc comment), to end of line.
    LineComment,
    /// Horizontal whitespace.
    Whitespace,
    /// `\n` or `\r\n`.
    Newline,

    ColonColon,
    Dot,
    DotDot,
    DotDotLess,
    LessDotDot,
    LessDotDotLess,
    DotDotDot,
    Question,
    At,
    Percent,
    Hash,
    HashBracket,
    Equal,
    Pipe,
    Comma,
    Colon,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Less,
    Greater,

    /// Non-ASCII or control byte outside a string/comment.
    InvalidByte,
    /// Missing closing `"`.
    UnterminatedString,
    /// Unrecognized `\x` escape inside a string.
    InvalidEscape,

    Eof,
}

impl RawTag {
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::LineComment)
    }
}

/// A raw token: tag plus byte length. The cooking layer tracks the running
/// offset itself and slices the source text using `len`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
    /// `true` if this comment/doc-comment token is the first non-whitespace
    /// content on its source line (used by the cooker to flag a `///` that
    /// doesn't start its own line).
    pub at_line_start: bool,
}
