//! Cooks a raw token stream into spans-and-interning-aware compiler tokens.

use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};
use mcdoc_ir::{
    Interner, Keyword, NumberToken, NumberValue, NumericKind, ResourceLocation, Span, Token,
    TokenKind,
};
use mcdoc_lexer_core::{RawTag, RawToken};

use crate::escape::unescape;

/// The result of lexing one source file.
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: DiagnosticQueue,
}

/// Cook `source` into a token stream, interning identifiers/strings/resource
/// locations with `interner`. `logical_path` is used only to label
/// diagnostics.
#[must_use]
pub fn lex(source: &str, logical_path: &str, interner: &Interner) -> LexOutput {
    let raw_tokens = mcdoc_lexer_core::tokenize(source);
    let mut cooker = Cooker {
        source,
        logical_path,
        interner,
        offset: 0,
        tokens: Vec::new(),
        diagnostics: DiagnosticQueue::new(),
    };
    for raw in raw_tokens {
        cooker.cook(raw);
    }
    LexOutput {
        tokens: cooker.tokens,
        diagnostics: cooker.diagnostics,
    }
}

struct Cooker<'a> {
    source: &'a str,
    logical_path: &'a str,
    interner: &'a Interner,
    offset: usize,
    tokens: Vec<Token>,
    diagnostics: DiagnosticQueue,
}

impl<'a> Cooker<'a> {
    fn cook(&mut self, raw: RawToken) {
        let start = self.offset;
        let end = start + raw.len as usize;
        self.offset = end;
        let text = &self.source[start..end];
        let span = Span::from_range(start..end);

        if raw.tag.is_trivia() || raw.tag == RawTag::Newline {
            return;
        }

        let kind = match raw.tag {
            RawTag::Ident => self.cook_ident(text),
            RawTag::ResourceLocation => self.cook_resource_location(text),
            RawTag::Int => self.cook_number(text, span, false),
            RawTag::Float => self.cook_number(text, span, true),
            RawTag::String => self.cook_string(text, span, true),
            RawTag::UnterminatedString => {
                self.push(DiagnosticCode::UnterminatedString, span, "unterminated string literal");
                self.cook_string(text, span, false)
            }
            RawTag::DocComment => {
                let body = text.strip_prefix("///").unwrap_or(text).trim_start_matches(' ');
                TokenKind::DocComment(self.interner.intern(body))
            }
            RawTag::LineComment => return,
            RawTag::ColonColon => TokenKind::ColonColon,
            RawTag::Dot => TokenKind::Dot,
            RawTag::DotDot => TokenKind::DotDot,
            RawTag::DotDotLess => TokenKind::DotDotLess,
            RawTag::LessDotDot => TokenKind::LessDotDot,
            RawTag::LessDotDotLess => TokenKind::LessDotDotLess,
            RawTag::DotDotDot => TokenKind::DotDotDot,
            RawTag::Question => TokenKind::Question,
            RawTag::At => TokenKind::At,
            RawTag::Percent => TokenKind::Percent,
            RawTag::Hash => TokenKind::Hash,
            RawTag::HashBracket => TokenKind::HashBracket,
            RawTag::Equal => TokenKind::Equal,
            RawTag::Pipe => TokenKind::Pipe,
            RawTag::Comma => TokenKind::Comma,
            RawTag::Colon => TokenKind::Colon,
            RawTag::LBrace => TokenKind::LBrace,
            RawTag::RBrace => TokenKind::RBrace,
            RawTag::LBracket => TokenKind::LBracket,
            RawTag::RBracket => TokenKind::RBracket,
            RawTag::LParen => TokenKind::LParen,
            RawTag::RParen => TokenKind::RParen,
            RawTag::Less => TokenKind::Less,
            RawTag::Greater => TokenKind::Greater,
            RawTag::InvalidByte => {
                self.push(DiagnosticCode::UnexpectedToken, span, format!("invalid byte in source: {text:?}"));
                return;
            }
            RawTag::InvalidEscape => {
                self.push(DiagnosticCode::InvalidEscape, span, "invalid escape sequence");
                return;
            }
            RawTag::Whitespace | RawTag::Newline => unreachable!("trivia filtered above"),
            RawTag::Eof => TokenKind::Eof,
            #[allow(unreachable_patterns)]
            _ => unreachable!("all RawTag variants are handled above"),
        };

        self.tokens.push(Token { kind, span });
    }

    fn push(&mut self, code: DiagnosticCode, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(code, self.logical_path, span, message));
    }

    fn cook_ident(&self, text: &str) -> TokenKind {
        match Keyword::from_str(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(self.interner.intern(text)),
        }
    }

    fn cook_resource_location(&self, text: &str) -> TokenKind {
        let (ns, path) = text.split_once(':').expect("resource location token always has a ':'");
        TokenKind::ResourceLocation(ResourceLocation::new(
            self.interner.intern(ns),
            self.interner.intern(path),
        ))
    }

    fn cook_number(&mut self, text: &str, span: Span, is_float_syntax: bool) -> TokenKind {
        let (digits, suffix) = match text.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => (&text[..text.len() - 1], NumericKind::from_suffix(c)),
            _ => (text, None),
        };

        let default_kind = if is_float_syntax { NumericKind::Double } else { NumericKind::Int };
        let mut kind = suffix.unwrap_or(default_kind);
        let explicit_suffix = suffix.is_some();

        if is_float_syntax && kind.is_integral() {
            self.push(
                DiagnosticCode::NumberOutOfRangeForSuffix,
                span,
                format!("fractional literal cannot carry integral suffix `{}`", kind.name()),
            );
            kind = NumericKind::Double;
        }

        let value = if kind.is_integral() {
            match digits.parse::<i64>() {
                Ok(v) => {
                    if let Some((min, max)) = kind.integral_bounds() {
                        if v < min || v > max {
                            self.push(
                                DiagnosticCode::NumberOutOfRangeForSuffix,
                                span,
                                format!("{v} is out of range for `{}`", kind.name()),
                            );
                        }
                    }
                    NumberValue::Int(v)
                }
                Err(_) => {
                    self.push(DiagnosticCode::NumberOutOfRangeForSuffix, span, format!("{digits} does not fit in i64"));
                    NumberValue::Int(0)
                }
            }
        } else {
            match digits.parse::<f64>() {
                Ok(v) => NumberValue::Float(v),
                Err(_) => {
                    self.push(DiagnosticCode::NumberOutOfRangeForSuffix, span, format!("{digits} is not a valid number"));
                    NumberValue::Float(0.0)
                }
            }
        };

        TokenKind::Number(NumberToken { value, kind, explicit_suffix })
    }

    fn cook_string(&mut self, text: &str, span: Span, well_formed: bool) -> TokenKind {
        let body = if well_formed {
            text.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(text)
        } else {
            text.strip_prefix('"').unwrap_or(text)
        };
        match unescape(body) {
            Ok(s) => TokenKind::String(self.interner.intern(&s)),
            Err(_) => {
                self.push(DiagnosticCode::InvalidEscape, span, "invalid escape sequence in string literal");
                TokenKind::String(self.interner.intern(body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = Interner::new();
        lex(source, "test", &interner).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_are_classified() {
        assert_eq!(kinds("struct"), vec![TokenKind::Keyword(Keyword::Struct)]);
    }

    #[test]
    fn plain_ident_is_not_a_keyword() {
        let interner = Interner::new();
        let out = lex("MyStruct", "test", &interner);
        assert!(matches!(out.tokens[0].kind, TokenKind::Ident(_)));
    }

    #[test]
    fn doc_comment_text_is_trimmed() {
        let interner = Interner::new();
        let out = lex("/// hello world", "test", &interner);
        let TokenKind::DocComment(sym) = out.tokens[0].kind else {
            panic!("expected doc comment");
        };
        assert_eq!(interner.resolve(sym), "hello world");
    }

    #[test]
    fn unterminated_string_is_diagnosed() {
        let interner = Interner::new();
        let out = lex("\"abc", "test", &interner);
        assert!(!out.diagnostics.is_empty());
    }

    #[test]
    fn suffix_out_of_range_is_diagnosed() {
        let interner = Interner::new();
        let out = lex("200b", "test", &interner);
        assert!(!out.diagnostics.is_empty());
    }

    #[test]
    fn resource_location_splits_namespace_and_path() {
        let interner = Interner::new();
        let out = lex("minecraft:block/stone", "test", &interner);
        let TokenKind::ResourceLocation(loc) = &out.tokens[0].kind else {
            panic!("expected resource location");
        };
        assert_eq!(interner.resolve(loc.namespace), "minecraft");
        assert_eq!(interner.resolve(loc.path), "block/stone");
    }
}
