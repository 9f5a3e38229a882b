//! Minimal raw-mode line editor with pre-fill.
//!
//! Supports appending text, Backspace/DEL, Ctrl-U (kill line) and Enter.
//! Escape sequences such as arrow keys are ignored. The pre-fill text is a
//! parameter of a single read and is never remembered.

use std::io::Write;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::session::Session;
use crate::core::{KeyToken, TerminalDevice, DEL};
use crate::error::{InputError, Result};

const BACKSPACE: u8 = 0x08;
const CTRL_U: u8 = 0x15;

/// Text being edited by [`Session::read_line`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
}

/// Result of feeding one key token to a [`LineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Text was appended and must be echoed.
    Inserted(String),
    /// Characters spanning this many columns were removed.
    Erased(usize),
    Submit,
    Interrupt,
    Ignored,
}

impl LineBuffer {
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn apply(&mut self, token: &KeyToken) -> LineEdit {
        if token.is_ctrl_c() {
            return LineEdit::Interrupt;
        }
        if token.is_byte(b'\r') || token.is_byte(b'\n') {
            return LineEdit::Submit;
        }
        if token.is_byte(DEL) || token.is_byte(BACKSPACE) {
            return match self.text.pop() {
                Some(ch) => LineEdit::Erased(ch.width().unwrap_or(0)),
                None => LineEdit::Ignored,
            };
        }
        if token.is_byte(CTRL_U) {
            let width = self.text.width();
            self.text.clear();
            return if width > 0 {
                LineEdit::Erased(width)
            } else {
                LineEdit::Ignored
            };
        }

        match token.as_str() {
            Some(text) if !text.chars().any(char::is_control) => {
                self.text.push_str(text);
                LineEdit::Inserted(text.to_string())
            }
            _ => LineEdit::Ignored,
        }
    }
}

impl<D: TerminalDevice> Session<D> {
    /// Read one line after `prompt`, starting from `initial` when given.
    ///
    /// Ctrl-C raises Quit after echoing `^C`.
    pub fn read_line(&mut self, prompt: &str, initial: Option<&str>) -> Result<String> {
        let mut buffer = LineBuffer::new(initial.unwrap_or_default());
        let mut raw = self.console.raw_mode()?;

        let out = raw.output();
        write!(out, "{}", prompt)?;
        self.theme.user_input(out, buffer.text())?;
        out.flush()?;

        loop {
            let token = raw.read_key()?;
            let edit = buffer.apply(&token);
            let out = raw.output();
            match edit {
                LineEdit::Inserted(text) => self.theme.user_input(out, &text)?,
                LineEdit::Erased(columns) => {
                    for _ in 0..columns {
                        out.write_all(b"\x08 \x08")?;
                    }
                }
                LineEdit::Submit => {
                    write!(out, "\r\n")?;
                    out.flush()?;
                    break;
                }
                LineEdit::Interrupt => {
                    self.theme.control_char(out, "^C")?;
                    write!(out, "\r")?;
                    out.flush()?;
                    return Err(InputError::quit());
                }
                LineEdit::Ignored => {}
            }
            out.flush()?;
        }

        Ok(buffer.into_text())
    }
}
