//! keycap - see exactly what your terminal sends for each key
//!
//! A raw-input engine for POSIX terminals plus a small interactive layer:
//!
//! - **core**: raw mode, polled byte reads, key-sequence assembly
//! - **ui**: key notations, prompts, line input, calibration, menus
//! - **config**: `~/.keycap/config.toml`
//! - **error**: `InputError` and the Quit/Back control signals
//!
//! # Example
//!
//! ```no_run
//! use keycap::core::{Console, Timing};
//! use keycap::ui::{Notation, Session, Theme};
//!
//! # fn main() -> keycap::error::Result<()> {
//! let mut session = Session::new(Console::stdio(Timing::default()), Theme::default(), Notation::Shell);
//! if let Some(key) = session.get_key("Press a key: ", true)? {
//!     println!("{:?}", key);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod ui;

pub use crate::core::{Console, FdTerminal, KeyToken, RawModeGuard, StdTerminal, TerminalDevice, Timing};
pub use crate::error::{ControlSignal, InputError, Result};
