//! Navigation key bindings and calibration.
//!
//! Terminals disagree on what the arrow keys send (`ESC [ A` in normal
//! cursor mode, `ESC O A` in application mode), so the menu matches whole
//! tokens recorded by [`Session::query_basic_keys`] instead of assuming one.

use tracing::info;

use super::session::Session;
use crate::core::{KeyToken, TerminalDevice, ESC};
use crate::error::Result;

/// Calibrated tokens for menu navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindingTable {
    pub up: KeyToken,
    pub down: KeyToken,
    pub enter: KeyToken,
    pub esc: KeyToken,
}

impl KeyBindingTable {
    /// Bindings of a standard xterm.
    pub fn xterm(application_cursor: bool) -> Self {
        let intro = if application_cursor { b'O' } else { b'[' };
        Self {
            up: KeyToken::sequence(ESC, &[intro, b'A']),
            down: KeyToken::sequence(ESC, &[intro, b'B']),
            enter: KeyToken::byte(b'\r'),
            esc: KeyToken::byte(ESC),
        }
    }

    /// Which navigation key `token` is bound to.
    pub fn name_of(&self, token: &KeyToken) -> Option<&'static str> {
        [
            (&self.up, "Up"),
            (&self.down, "Down"),
            (&self.enter, "Enter"),
            (&self.esc, "Esc"),
        ]
        .into_iter()
        .find(|(bound, _)| *bound == token)
        .map(|(_, name)| name)
    }
}

impl Default for KeyBindingTable {
    fn default() -> Self {
        Self::xterm(false)
    }
}

impl<D: TerminalDevice> Session<D> {
    /// Ask the user to press Up, Down, Enter and Esc, in that order.
    ///
    /// Quit and Back from any of the four prompts propagate unchanged and no
    /// table is produced.
    pub fn query_basic_keys(&mut self) -> Result<KeyBindingTable> {
        let up = self.get_key_with_name("Up")?;
        let down = self.get_key_with_name("Down")?;
        let enter = self.get_key_with_name("Enter")?;
        let esc = self.get_key_with_name("Esc")?;

        let table = KeyBindingTable { up, down, enter, esc };
        info!(?table, "Key bindings calibrated");
        Ok(table)
    }
}

/// Modifier prefix for an xterm modifier parameter (`1 + bits`).
fn modifier_prefix(code: u8) -> String {
    let bits = code.saturating_sub(1);
    let mut prefix = String::new();
    if bits & 4 != 0 {
        prefix.push_str("Ctrl+");
    }
    if bits & 2 != 0 {
        prefix.push_str("Alt+");
    }
    if bits & 1 != 0 {
        prefix.push_str("Shift+");
    }
    prefix
}

fn final_key_name(key: u8) -> Option<&'static str> {
    Some(match key {
        b'A' => "Up",
        b'B' => "Down",
        b'C' => "Right",
        b'D' => "Left",
        b'H' => "Home",
        b'F' => "End",
        b'P' => "F1",
        b'Q' => "F2",
        b'R' => "F3",
        b'S' => "F4",
        _ => return None,
    })
}

fn tilde_key_name(number: u8) -> Option<&'static str> {
    Some(match number {
        2 => "Insert",
        3 => "Delete",
        5 => "PageUp",
        6 => "PageDown",
        15 => "F5",
        17 => "F6",
        18 => "F7",
        19 => "F8",
        20 => "F9",
        21 => "F10",
        23 => "F11",
        24 => "F12",
        _ => return None,
    })
}

/// Human name of a common xterm key sequence, such as `Ctrl+Left`.
pub fn xterm_key_name(bytes: &[u8]) -> Option<String> {
    match bytes {
        [b'\r'] => Some("Enter".to_string()),
        [b'\t'] => Some("Tab".to_string()),
        [0x7f] | [0x08] => Some("Backspace".to_string()),
        [ESC] => Some("Esc".to_string()),
        [ESC, b'[', b'Z'] => Some("Shift+Tab".to_string()),
        [ESC, b'O', key] => final_key_name(*key).map(str::to_string),
        [ESC, b'[', params @ .., last] => {
            let params = std::str::from_utf8(params).ok()?;
            let mut fields = params.split(';');
            let first = fields.next().unwrap_or_default();
            let modifiers = match fields.next() {
                Some(code) => modifier_prefix(code.parse().ok()?),
                None => String::new(),
            };
            if fields.next().is_some() {
                return None;
            }

            let name = if *last == b'~' {
                tilde_key_name(first.parse().ok()?)?
            } else if first.is_empty() || first == "1" {
                final_key_name(*last)?
            } else {
                return None;
            };
            Some(format!("{}{}", modifiers, name))
        }
        [ESC, rest @ ..] => {
            let text = std::str::from_utf8(rest).ok()?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if !ch.is_control() => Some(format!("Alt+{}", ch)),
                _ => None,
            }
        }
        [byte @ 0x01..=0x1a] => Some(format!("Ctrl+{}", (b'A' + byte - 1) as char)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{ScriptedTerminal, TermMode};
    use crate::ui::session::test_support::session;

    #[test]
    fn test_xterm_tables() {
        let normal = KeyBindingTable::xterm(false);
        assert_eq!(normal.up.as_bytes(), b"\x1b[A");
        assert_eq!(normal.down.as_bytes(), b"\x1b[B");
        assert_eq!(normal.enter.as_bytes(), b"\r");
        assert_eq!(normal.esc.as_bytes(), b"\x1b");

        let application = KeyBindingTable::xterm(true);
        assert_eq!(application.up.as_bytes(), b"\x1bOA");
        assert_eq!(application.down.as_bytes(), b"\x1bOB");
    }

    #[test]
    fn test_name_of() {
        let table = KeyBindingTable::default();
        assert_eq!(table.name_of(&KeyToken::sequence(ESC, b"[B")), Some("Down"));
        assert_eq!(table.name_of(&KeyToken::byte(ESC)), Some("Esc"));
        assert_eq!(table.name_of(&KeyToken::byte(b'x')), None);
    }

    #[test]
    fn test_query_basic_keys() {
        let term = ScriptedTerminal::new().keys(&[b"\x1bOA", b"\x1bOB", b"\n", b"\x1b"]);
        let mut session = session(term);
        let table = session.query_basic_keys().unwrap();
        assert_eq!(table.up.as_bytes(), b"\x1bOA");
        assert_eq!(table.down.as_bytes(), b"\x1bOB");
        assert_eq!(table.enter.as_bytes(), b"\n");
        assert_eq!(table.esc.as_bytes(), b"\x1b");

        let output = session.console.device().output_text();
        for name in ["Up", "Down", "Enter", "Esc"] {
            assert!(output.contains(name));
        }
    }

    #[test]
    fn test_query_basic_keys_quit() {
        let term = ScriptedTerminal::new().keys(&[b"\x1b[A", b"q"]);
        let mut session = session(term);
        assert!(session.query_basic_keys().unwrap_err().is_quit());
        assert_eq!(session.console.device().mode, TermMode::Cooked);
    }

    #[test]
    fn test_xterm_key_names() {
        assert_eq!(xterm_key_name(b"\x1b[A").as_deref(), Some("Up"));
        assert_eq!(xterm_key_name(b"\x1bOD").as_deref(), Some("Left"));
        assert_eq!(xterm_key_name(b"\x1b[1;5C").as_deref(), Some("Ctrl+Right"));
        assert_eq!(xterm_key_name(b"\x1b[1;2A").as_deref(), Some("Shift+Up"));
        assert_eq!(xterm_key_name(b"\x1b[3~").as_deref(), Some("Delete"));
        assert_eq!(xterm_key_name(b"\x1b[24;3~").as_deref(), Some("Alt+F12"));
        assert_eq!(xterm_key_name(b"\x1bx").as_deref(), Some("Alt+x"));
        assert_eq!(xterm_key_name(b"\x01").as_deref(), Some("Ctrl+A"));
        assert_eq!(xterm_key_name(b"\x7f").as_deref(), Some("Backspace"));
        assert_eq!(xterm_key_name(b"a"), None);
        assert_eq!(xterm_key_name(b"\x1b[99~"), None);
    }
}
