//! Key tokens: the bytes a terminal produced for one key press.

use std::fmt;

pub const CTRL_C: u8 = 0x03;
pub const ESC: u8 = 0x1b;
pub const DEL: u8 = 0x7f;

/// One logical key press as an ordered, non-empty byte sequence.
///
/// A plain character, a control character, a multi-byte UTF-8 code point or
/// a whole escape sequence such as `ESC [ A`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KeyToken(Vec<u8>);

impl KeyToken {
    /// Returns `None` for an empty byte sequence.
    pub fn new(bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            Some(Self(bytes))
        }
    }

    /// Single-byte token.
    pub fn byte(byte: u8) -> Self {
        Self(vec![byte])
    }

    /// Token made of `first` followed by `rest`.
    pub fn sequence(first: u8, rest: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(rest.len() + 1);
        bytes.push(first);
        bytes.extend_from_slice(rest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the token is exactly the single byte `byte`.
    pub fn is_byte(&self, byte: u8) -> bool {
        self.0 == [byte]
    }

    pub fn is_ctrl_c(&self) -> bool {
        self.is_byte(CTRL_C)
    }

    /// Escape-introduced multi-byte sequence (arrow keys, function keys,
    /// Alt-modified keys).
    pub fn is_escape_sequence(&self) -> bool {
        self.0.len() > 1 && self.0[0] == ESC
    }

    /// The token as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyToken(\"{}\")", self.0.escape_ascii())
    }
}

impl AsRef<[u8]> for KeyToken {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_rejected() {
        assert_eq!(KeyToken::new(Vec::new()), None);
        assert_eq!(KeyToken::new(vec![b'a']), Some(KeyToken::byte(b'a')));
    }

    #[test]
    fn test_classification() {
        assert!(KeyToken::byte(CTRL_C).is_ctrl_c());
        assert!(!KeyToken::sequence(CTRL_C, b"x").is_ctrl_c());

        let up = KeyToken::sequence(ESC, b"[A");
        assert!(up.is_escape_sequence());
        assert_eq!(up.len(), 3);
        assert!(!KeyToken::byte(ESC).is_escape_sequence());

        let e_acute = KeyToken::new("é".as_bytes().to_vec()).unwrap();
        assert_eq!(e_acute.as_str(), Some("é"));
        assert!(!e_acute.is_escape_sequence());
    }

    #[test]
    fn test_debug_format() {
        let up = KeyToken::sequence(ESC, b"[A");
        assert_eq!(format!("{:?}", up), "KeyToken(\"\\x1b[A\")");
    }
}
