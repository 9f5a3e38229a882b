//! Interactive session: a console plus presentation settings.
//!
//! Prompts, the line editor, menus and calibration are implemented as
//! methods on [`Session`] in their own modules.

use crate::core::{Console, StdTerminal, TerminalDevice};

use super::notation::Notation;
use super::output::Theme;

pub struct Session<D: TerminalDevice = StdTerminal> {
    pub console: Console<D>,
    pub theme: Theme,
    /// Notation used when echoing captured keys.
    pub notation: Notation,
}

impl<D: TerminalDevice> Session<D> {
    pub fn new(console: Console<D>, theme: Theme, notation: Notation) -> Self {
        Self {
            console,
            theme,
            notation,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::testing::{test_timing, ScriptedTerminal};

    pub fn session(term: ScriptedTerminal) -> Session<ScriptedTerminal> {
        Session::new(Console::new(term, test_timing()), Theme::default(), Notation::Shell)
    }
}
