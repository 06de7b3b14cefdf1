//! String literal escape processing.

/// The escape sequences mcdoc string literals support: `\\`, `\"`, `\n`,
/// `\t`, `\r`, and `\u{XXXX}` (a hex Unicode scalar value).
pub fn unescape(raw: &str) -> Result<String, usize> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 'u')) => {
                if chars.next_if(|&(_, c)| c == '{').is_none() {
                    return Err(idx);
                }
                let mut hex = String::new();
                loop {
                    match chars.peek().copied() {
                        Some((_, '}')) => {
                            chars.next();
                            break;
                        }
                        Some((_, c)) if c.is_ascii_hexdigit() => {
                            hex.push(c);
                            chars.next();
                        }
                        _ => return Err(idx),
                    }
                }
                let code = u32::from_str_radix(&hex, 16).map_err(|_| idx)?;
                let ch = char::from_u32(code).ok_or(idx)?;
                out.push(ch);
            }
            _ => return Err(idx),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(unescape("hello").unwrap(), "hello");
    }

    #[test]
    fn basic_escapes() {
        assert_eq!(unescape(r#"a\nb\tc\\d\"e"#).unwrap(), "a\nb\tc\\d\"e");
    }

    #[test]
    fn unicode_escape() {
        assert_eq!(unescape(r"\u{41}").unwrap(), "A");
    }

    #[test]
    fn invalid_escape_is_reported() {
        assert!(unescape(r"\q").is_err());
    }

    #[test]
    fn unterminated_unicode_escape_is_reported() {
        assert!(unescape(r"\u{41").is_err());
    }
}
