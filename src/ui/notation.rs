//! Printable notations for key tokens.
//!
//! - **shell**: fish-style escapes, usable directly in `bind` commands
//! - **readline**: inputrc-style escapes, wrapped in double quotes
//! - **repr**: quoted byte escapes, lossless
//!
//! Shell and readline rendering work per character. Bytes that are not part
//! of valid UTF-8 are rendered as `\xNN`.

use std::fmt;
use std::str::FromStr;

use crate::core::KeyToken;
use crate::error::InputError;

/// Indicator shown instead of a skipped (absent) key.
pub const SKIPPED: &str = "(skipped)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
    #[default]
    Shell,
    Readline,
    Repr,
}

impl Notation {
    pub const ALL: [Notation; 3] = [Notation::Shell, Notation::Readline, Notation::Repr];

    pub fn name(&self) -> &'static str {
        match self {
            Notation::Shell => "shell",
            Notation::Readline => "readline",
            Notation::Repr => "repr",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Notation {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shell" | "fish" => Ok(Notation::Shell),
            "readline" | "inputrc" => Ok(Notation::Readline),
            "repr" | "raw" => Ok(Notation::Repr),
            _ => Err(InputError::UnknownNotation(s.to_string())),
        }
    }
}

/// Escapes shared by both tables.
fn common_escape(ch: char) -> Option<&'static str> {
    let escaped = match ch {
        '\x1b' => r"\e",
        '\\' => r"\\",
        '"' => r#"\""#,
        '\'' => r"\'",
        '\x07' => r"\a",
        '\x08' => r"\b",
        '\x0c' => r"\f",
        '\n' => r"\n",
        '\r' => r"\r",
        '\t' => r"\t",
        '\x0b' => r"\v",
        _ => return None,
    };
    Some(escaped)
}

/// Shell metacharacters that need escaping in fish.
fn shell_escape(ch: char) -> Option<&'static str> {
    let escaped = match ch {
        ' ' => "' '",
        '$' => r"\$",
        '*' => r"\*",
        '?' => r"\?",
        '~' => r"\~",
        '%' => r"\%",
        '#' => r"\#",
        '(' => r"\(",
        ')' => r"\)",
        '{' => r"\{",
        '}' => r"\}",
        '[' => r"\[",
        ']' => r"\]",
        '<' => r"\<",
        '>' => r"\>",
        '^' => r"\^",
        '&' => r"\&",
        ';' => r"\;",
        _ => return common_escape(ch),
    };
    Some(escaped)
}

/// `0x01..=0x1a`, rendered as prefix + letter.
fn is_named_control(code: u32) -> bool {
    (0x01..=0x1a).contains(&code)
}

/// Remaining C0 codes, DEL and C1 codes.
fn is_hex_control(code: u32) -> bool {
    code <= 0x1f || code == 0x7f || (0x80..=0x9f).contains(&code)
}

fn control_letter(code: u32) -> char {
    char::from_u32(code + 96).unwrap_or('?')
}

fn shell_char(ch: char, out: &mut String) {
    let code = ch as u32;
    if let Some(escaped) = shell_escape(ch) {
        out.push_str(escaped);
    } else if is_named_control(code) {
        out.push_str(r"\c");
        out.push(control_letter(code));
    } else if is_hex_control(code) {
        out.push_str(&format!(r"\x{:02x}", code));
    } else if code > 0xffff {
        out.push_str(&format!(r"\U{:08x}", code));
    } else if code > 0xff {
        out.push_str(&format!(r"\u{:04x}", code));
    } else {
        out.push(ch);
    }
}

fn readline_char(ch: char, out: &mut String) {
    let code = ch as u32;
    if let Some(escaped) = common_escape(ch) {
        out.push_str(escaped);
    } else if is_named_control(code) {
        out.push_str(r"\C-");
        out.push(control_letter(code));
    } else if is_hex_control(code) {
        out.push_str(&format!(r"\x{:02x}", code));
    } else if code > 0xff {
        let mut buf = [0u8; 4];
        for byte in ch.encode_utf8(&mut buf).bytes() {
            out.push_str(&format!(r"\x{:02x}", byte));
        }
    } else {
        out.push(ch);
    }
}

fn render_chars(bytes: &[u8], render_char: fn(char, &mut String)) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for chunk in bytes.utf8_chunks() {
        for ch in chunk.valid().chars() {
            render_char(ch, &mut out);
        }
        for byte in chunk.invalid() {
            out.push_str(&format!(r"\x{:02x}", byte));
        }
    }
    out
}

/// Render raw key bytes in the given notation.
pub fn render(bytes: &[u8], notation: Notation) -> String {
    match notation {
        Notation::Repr => format!("\"{}\"", bytes.escape_ascii()),
        Notation::Shell => render_chars(bytes, shell_char),
        Notation::Readline => format!("\"{}\"", render_chars(bytes, readline_char)),
    }
}

/// Render a captured key, or the skipped indicator when there is none.
pub fn render_token(token: Option<&KeyToken>, notation: Notation) -> String {
    match token {
        Some(token) => render(token.as_bytes(), notation),
        None => SKIPPED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode the escapes produced by `escape_ascii`.
    fn decode_repr(repr: &str) -> Vec<u8> {
        let inner = repr.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap();
        let bytes = inner.as_bytes();
        let mut out = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'\\' {
                out.push(bytes[i]);
                i += 1;
                continue;
            }
            match bytes[i + 1] {
                b'n' => out.push(b'\n'),
                b'r' => out.push(b'\r'),
                b't' => out.push(b'\t'),
                b'x' => {
                    let hex = std::str::from_utf8(&bytes[i + 2..i + 4]).unwrap();
                    out.push(u8::from_str_radix(hex, 16).unwrap());
                    i += 2;
                }
                other => out.push(other),
            }
            i += 2;
        }
        out
    }

    #[test]
    fn test_repr_is_lossless() {
        let samples: Vec<Vec<u8>> = vec![
            b"\x1b[A".to_vec(),
            b"\"quoted\" 'single' \\".to_vec(),
            "ü€😀".as_bytes().to_vec(),
            (0u8..=255).collect(),
        ];
        for bytes in samples {
            let repr = render(&bytes, Notation::Repr);
            assert_eq!(decode_repr(&repr), bytes, "repr {}", repr);
        }
    }

    #[test]
    fn test_plain_ascii_unchanged() {
        for byte in 0x20u8..0x7f {
            let ch = byte as char;
            if shell_escape(ch).is_some() || common_escape(ch).is_some() {
                continue;
            }
            let text = ch.to_string();
            assert_eq!(render(&[byte], Notation::Shell), text);
            assert_eq!(render(&[byte], Notation::Readline), format!("\"{}\"", text));
        }
    }

    #[test]
    fn test_control_codes_differ_between_notations() {
        for byte in 0x01u8..=0x1a {
            if common_escape(byte as char).is_some() {
                continue;
            }
            let letter = (byte + 96) as char;
            let shell = render(&[byte], Notation::Shell);
            let readline = render(&[byte], Notation::Readline);
            assert_eq!(shell, format!(r"\c{}", letter));
            assert_eq!(readline, format!(r#""\C-{}""#, letter));
        }
    }

    #[test]
    fn test_named_escapes() {
        assert_eq!(render(b"\x1b[A", Notation::Shell), r"\e\[A");
        assert_eq!(render(b"\x1b[A", Notation::Readline), r#""\e[A""#);
        assert_eq!(render(b" ", Notation::Shell), "' '");
        assert_eq!(render(b" ", Notation::Readline), "\" \"");
        assert_eq!(render(b"\r", Notation::Shell), r"\r");
        assert_eq!(render(b"\t", Notation::Readline), r#""\t""#);
        assert_eq!(render(b"$~;", Notation::Shell), r"\$\~\;");
    }

    #[test]
    fn test_hex_controls() {
        assert_eq!(render(&[0x00], Notation::Shell), r"\x00");
        assert_eq!(render(&[0x1c], Notation::Shell), r"\x1c");
        assert_eq!(render(&[0x7f], Notation::Shell), r"\x7f");
        assert_eq!(render(&[0x7f], Notation::Readline), r#""\x7f""#);
        // U+0085 (NEL) is a C1 control
        assert_eq!(render("\u{85}".as_bytes(), Notation::Shell), r"\x85");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(render("é".as_bytes(), Notation::Shell), "é");
        assert_eq!(render("€".as_bytes(), Notation::Shell), r"\u20ac");
        assert_eq!(render("😀".as_bytes(), Notation::Shell), r"\U0001f600");
        assert_eq!(render("€".as_bytes(), Notation::Readline), r#""\xe2\x82\xac""#);
        assert_eq!(render("é".as_bytes(), Notation::Readline), "\"é\"");
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        assert_eq!(render(&[0x1b, 0xff], Notation::Shell), r"\e\xff");
        assert_eq!(render(&[0xc3], Notation::Readline), r#""\xc3""#);
    }

    #[test]
    fn test_skipped_indicator() {
        assert_eq!(render_token(None, Notation::Shell), SKIPPED);
        assert_eq!(render_token(None, Notation::Repr), SKIPPED);
        let token = KeyToken::byte(b'x');
        assert_eq!(render_token(Some(&token), Notation::Repr), "\"x\"");
    }

    #[test]
    fn test_parse_notation() {
        assert_eq!("shell".parse::<Notation>().unwrap(), Notation::Shell);
        assert_eq!("Readline".parse::<Notation>().unwrap(), Notation::Readline);
        assert_eq!("repr".parse::<Notation>().unwrap(), Notation::Repr);
        assert!(matches!(
            "emacs".parse::<Notation>(),
            Err(InputError::UnknownNotation(name)) if name == "emacs"
        ));
    }
}
