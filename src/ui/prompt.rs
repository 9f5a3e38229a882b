//! Single-key prompts.
//!
//! `q` and `b` are fixed bindings for Quit and Back in [`Session::get_key`],
//! independent of the calibrated navigation keys.

use std::io::Write;

use tracing::debug;

use super::notation::{render_token, SKIPPED};
use super::session::Session;
use crate::core::{KeyToken, TerminalDevice, CTRL_C};
use crate::error::{InputError, Result};

impl<D: TerminalDevice> Session<D> {
    /// Show `prompt` and capture one key.
    ///
    /// With `allow_skip`, a space returns `Ok(None)`. Ctrl-C and `q` raise
    /// Quit; `b` raises Back. The key is echoed in the session's notation.
    pub fn get_key(&mut self, prompt: &str, allow_skip: bool) -> Result<Option<KeyToken>> {
        let mut raw = self.console.raw_mode()?;
        let out = raw.output();
        write!(out, "{}", prompt)?;
        out.flush()?;

        let token = raw.read_key()?;
        let out = raw.output();

        if allow_skip && token.is_byte(b' ') {
            self.theme.skipped(out, SKIPPED)?;
            write!(out, "\r\n")?;
            out.flush()?;
            return Ok(None);
        }

        if token.is_ctrl_c() {
            // Leaving raw mode ends the line
            self.theme.control_char(out, "^C")?;
            write!(out, "\r")?;
            out.flush()?;
            return Err(InputError::quit());
        }

        self.theme
            .user_input(out, &render_token(Some(&token), self.notation))?;
        out.flush()?;
        if token.is_byte(b'q') {
            debug!("Quit key pressed");
            return Err(InputError::quit());
        }
        if token.is_byte(b'b') {
            debug!("Back key pressed");
            return Err(InputError::back());
        }

        write!(out, "\r\n")?;
        out.flush()?;
        Ok(Some(token))
    }

    /// Ask the user to press the key called `name`. Skipping is not allowed.
    pub fn get_key_with_name(&mut self, name: &str) -> Result<KeyToken> {
        let prompt = format!("Please press {}... ", self.theme.key_name(name));
        loop {
            if let Some(token) = self.get_key(&prompt, false)? {
                return Ok(token);
            }
        }
    }

    /// Echo a captured key, or the skipped indicator.
    pub fn display_key(&mut self, token: Option<&KeyToken>) -> Result<()> {
        let text = render_token(token, self.notation);
        let out = self.console.output();
        match token {
            Some(_) => self.theme.user_input(out, &text)?,
            None => self.theme.skipped(out, &text)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Single-key yes/no confirmation.
    ///
    /// Accepts `y`/`Y`/`n`/`N`; Enter takes `default`; Ctrl-C raises Quit.
    /// Other keys are ignored.
    pub fn yes_no(&mut self, default: bool) -> Result<bool> {
        let mut raw = self.console.raw_mode()?;
        let byte = loop {
            let Some(byte) = raw.read_byte(None)? else {
                continue;
            };
            if matches!(byte, b'y' | b'Y' | b'n' | b'N' | b'\r' | b'\n' | CTRL_C) {
                break byte;
            }
        };

        let out = raw.output();
        if byte == CTRL_C {
            self.theme.control_char(out, "^C")?;
            write!(out, "\r")?;
            out.flush()?;
            return Err(InputError::quit());
        }

        let answer = matches!(byte, b'y' | b'Y') || (matches!(byte, b'\r' | b'\n') && default);
        let echo = match byte {
            b'\r' | b'\n' if answer => "(Y)".to_string(),
            b'\r' | b'\n' => "(N)".to_string(),
            other => (other as char).to_string(),
        };
        self.theme.user_input(out, &echo)?;
        write!(out, "\r\n")?;
        out.flush()?;
        Ok(answer)
    }
}
