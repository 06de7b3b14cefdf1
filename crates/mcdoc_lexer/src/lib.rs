//! Cooked lexer for mcdoc.
//!
//! "Cooks" the byte-level tokens from `mcdoc_lexer_core` into
//! `mcdoc_ir::Token`s: interned identifiers and strings, classified
//! keywords, parsed numeric suffixes, and decoded string escapes. Lexical
//! errors (unterminated strings, invalid escapes, suffix/range overflow) are
//! reported here as non-fatal diagnostics; the file still lexes to
//! completion.

mod cook;
mod escape;

pub use cook::{lex, LexOutput};
