//! Core terminal input components.
//!
//! This module contains the low-level input engine:
//!
//! - **device**: POSIX terminal access (attributes, non-blocking reads, EOF)
//! - **raw_mode**: `Console` handle and scoped, nesting-safe `RawModeGuard`
//! - **reader**: polled byte reads and key-sequence assembly
//! - **key**: `KeyToken`, the bytes of one key press
//!
//! # Architecture
//!
//! ```text
//! Console
//! ├── TerminalDevice (stdin/stdout via termios)
//! ├── saved snapshot (Some while raw)
//! └── Timing (poll interval + inter-byte window)
//!     └── read_byte → read_key → KeyToken
//! ```

pub mod device;
pub mod key;
pub mod raw_mode;
pub mod reader;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{FdTerminal, StdTerminal, TerminalDevice};
pub use key::{KeyToken, CTRL_C, DEL, ESC};
pub use raw_mode::{Console, RawModeGuard};
pub use reader::Timing;
