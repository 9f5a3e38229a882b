//! Styled terminal output using crossterm.
//!
//! Prompts, echoes and menu markers are written through crossterm commands
//! queued onto the console's output stream; callers flush when a visible
//! update is complete.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{style, Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor, Stylize},
};

use crate::config::ColorConfig;

/// Colors used for prompts, echoes and menus.
#[derive(Debug, Clone)]
pub struct Theme {
    pub user_input: Color,
    pub control_char: Color,
    pub skipped: Color,
    pub marker: Color,
    pub index: Color,
    pub key_name: Color,
    pub heading_underline: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ColorConfig::default())
    }
}

impl Theme {
    pub fn from_config(colors: &ColorConfig) -> Self {
        Self {
            user_input: Color::AnsiValue(colors.user_input),
            control_char: Color::AnsiValue(colors.control_char),
            skipped: Color::AnsiValue(colors.skipped),
            marker: Color::AnsiValue(colors.marker),
            index: Color::AnsiValue(colors.index),
            key_name: Color::AnsiValue(colors.key_name),
            heading_underline: colors.heading_underline,
        }
    }

    /// Echo of something the user typed.
    pub fn user_input<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        styled(out, self.user_input, text)
    }

    /// Visible indicator for a control key such as `^C`.
    pub fn control_char<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        styled(out, self.control_char, text)
    }

    pub fn skipped<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        styled(out, self.skipped, text)
    }

    /// Heading line, terminated with CR LF so it works in raw mode too.
    pub fn heading<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        if self.heading_underline {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        queue!(out, Print(text), SetAttribute(Attribute::Reset), Print("\r\n"))
    }

    /// Key name as shown in calibration prompts.
    pub fn key_name(&self, name: &str) -> String {
        style(name).with(self.key_name).bold().to_string()
    }
}

pub(crate) fn styled<W: Write>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    queue!(out, SetForegroundColor(color), Print(text), ResetColor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_text_is_reset() {
        let theme = Theme::default();
        let mut out = Vec::new();
        theme.user_input(&mut out, "x").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[38;5;180m"));
        assert!(text.contains('x'));
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_heading_ends_line() {
        let theme = Theme::default();
        let mut out = Vec::new();
        theme.heading(&mut out, "Menu").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Menu"));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn test_key_name_contains_name() {
        let theme = Theme::default();
        assert!(theme.key_name("Up").contains("Up"));
    }
}
