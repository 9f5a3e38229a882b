//! Single-selection menu driven by calibrated key tokens.
//!
//! The menu is printed once below its heading; afterwards only the marker
//! column is redrawn. The cursor is hidden while the menu is active and is
//! always shown again and moved past the list on exit, whether the menu
//! returns a choice, raises Back or Quit, or fails.
//!
//! # Example
//!
//! ```ignore
//! let choices = vec![MenuChoice::new("Show keys"), MenuChoice::new("Quit")];
//! let picked = session.choose_one("Main menu", &choices, &bindings, MenuOptions::default())?;
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use bitflags::bitflags;
use crossterm::{
    cursor::{Hide, MoveDown, MoveTo, MoveToColumn, MoveUp, RestorePosition, SavePosition, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use tracing::{debug, warn};

use super::bindings::KeyBindingTable;
use super::output::{styled, Theme};
use super::session::Session;
use crate::core::{Console, KeyToken, TerminalDevice};
use crate::error::{InputError, Result};

const UNSELECTED_PREFIX: &str = " - ";
const SELECTED_PREFIX: &str = "-->";

bitflags! {
    /// Menu behavior switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MenuOptions: u8 {
        /// The calibrated Esc key raises Back.
        const HANDLE_ESC = 0b0001;
        /// Write the selected index on a debug line at the top of the screen.
        const SHOW_INDEX = 0b0010;
    }
}

impl Default for MenuOptions {
    fn default() -> Self {
        MenuOptions::empty()
    }
}

/// A menu entry: a label, free-form attributes and an opaque value.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuChoice<T = ()> {
    pub display: String,
    pub attrs: BTreeMap<String, String>,
    pub value: T,
}

impl MenuChoice<()> {
    pub fn new(display: impl Into<String>) -> Self {
        Self::with_value(display, ())
    }
}

impl<T> MenuChoice<T> {
    pub fn with_value(display: impl Into<String>, value: T) -> Self {
        Self {
            display: display.into(),
            attrs: BTreeMap::new(),
            value,
        }
    }

    /// Attach an attribute the menu itself never looks at.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// What a key token did to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Ignored,
    /// Up or Down was pressed; the marker must be redrawn.
    Moved,
    Selected(usize),
    Back,
    Interrupted,
}

/// Selection state of an open menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    len: usize,
    selected: usize,
}

impl MenuState {
    pub fn new(len: usize) -> Self {
        Self { len, selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.selected = (self.selected + 1).min(self.len.saturating_sub(1));
    }

    /// Apply one key token.
    pub fn handle(&mut self, token: &KeyToken, bindings: &KeyBindingTable, options: MenuOptions) -> MenuEvent {
        if token.is_ctrl_c() {
            MenuEvent::Interrupted
        } else if *token == bindings.up {
            self.up();
            MenuEvent::Moved
        } else if *token == bindings.down {
            self.down();
            MenuEvent::Moved
        } else if *token == bindings.enter {
            MenuEvent::Selected(self.selected)
        } else if *token == bindings.esc && options.contains(MenuOptions::HANDLE_ESC) {
            MenuEvent::Back
        } else {
            MenuEvent::Ignored
        }
    }
}

fn rows(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Open menu. Dropping it moves the cursor below the list and shows it.
struct ActiveMenu<'a, D: TerminalDevice> {
    console: &'a mut Console<D>,
    theme: &'a Theme,
    state: MenuState,
    options: MenuOptions,
}

impl<D: TerminalDevice> ActiveMenu<'_, D> {
    fn run(&mut self, bindings: &KeyBindingTable) -> Result<usize> {
        let mut raw = self.console.raw_mode()?;
        redraw(raw.output(), self.theme, &self.state, self.options)?;

        loop {
            let token = raw.read_key()?;
            match self.state.handle(&token, bindings, self.options) {
                MenuEvent::Ignored => {}
                MenuEvent::Moved => redraw(raw.output(), self.theme, &self.state, self.options)?,
                MenuEvent::Selected(index) => return Ok(index),
                MenuEvent::Back => {
                    debug!("Menu cancelled");
                    return Err(InputError::back());
                }
                MenuEvent::Interrupted => {
                    let out = raw.output();
                    self.theme.control_char(out, "^C")?;
                    write!(out, "\r")?;
                    out.flush()?;
                    return Err(InputError::quit());
                }
            }
        }
    }
}

impl<D: TerminalDevice> Drop for ActiveMenu<'_, D> {
    fn drop(&mut self) {
        let below = rows(self.state.len() - self.state.selected());
        let out = self.console.output();
        let result = queue!(out, MoveDown(below), MoveToColumn(0), Show).and_then(|()| out.flush());
        if let Err(e) = result {
            warn!("Failed to restore cursor after menu: {}", e);
        }
    }
}

/// Move the marker to the selected row.
///
/// Starts on the previously marked row and ends just after the new marker.
fn redraw<W: Write>(out: &mut W, theme: &Theme, state: &MenuState, options: MenuOptions) -> Result<()> {
    queue!(out, MoveToColumn(0))?;
    styled(out, theme.skipped, UNSELECTED_PREFIX)?;

    if options.contains(MenuOptions::SHOW_INDEX) {
        queue!(
            out,
            MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            MoveDown(2),
            Clear(ClearType::CurrentLine),
            MoveUp(1),
            Clear(ClearType::CurrentLine),
            Print("  ")
        )?;
        styled(out, theme.index, &state.selected().to_string())?;
    }

    queue!(out, RestorePosition)?;
    if state.selected() > 0 {
        queue!(out, MoveDown(rows(state.selected())))?;
    }
    styled(out, theme.marker, SELECTED_PREFIX)?;
    out.flush()?;
    Ok(())
}

impl<D: TerminalDevice> Session<D> {
    /// Show `choices` under `title` and let the user pick one with the
    /// calibrated Up/Down/Enter keys.
    ///
    /// # Errors
    ///
    /// Ctrl-C raises Quit. The calibrated Esc key raises Back when
    /// [`MenuOptions::HANDLE_ESC`] is set. An empty choice list is rejected.
    pub fn choose_one<'c, T>(
        &mut self,
        title: &str,
        choices: &'c [MenuChoice<T>],
        bindings: &KeyBindingTable,
        options: MenuOptions,
    ) -> Result<&'c MenuChoice<T>> {
        if choices.is_empty() {
            return Err(InputError::EmptyMenu);
        }

        let out = self.console.output();
        self.theme.heading(out, title)?;

        let mut menu = ActiveMenu {
            console: &mut self.console,
            theme: &self.theme,
            state: MenuState::new(choices.len()),
            options,
        };

        let out = menu.console.output();
        queue!(out, Hide)?;
        for choice in choices {
            styled(out, menu.theme.skipped, UNSELECTED_PREFIX)?;
            queue!(out, Print(&choice.display), Print("\r\n"))?;
        }
        queue!(out, MoveUp(rows(choices.len())), MoveToColumn(0), SavePosition)?;
        out.flush()?;

        let index = menu.run(bindings)?;
        debug!(index, "Menu choice selected");
        Ok(&choices[index])
    }
}
