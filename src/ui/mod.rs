//! Interactive layer on top of the input engine.
//!
//! - **session**: `Session`, a console plus theme and echo notation
//! - **notation**: key rendering in shell, readline and repr notation
//! - **output**: crossterm-styled echoes, headings and markers
//! - **prompt**: single-key prompts, yes/no confirmation
//! - **line_editor**: line input with pre-fill
//! - **bindings**: navigation key table and calibration
//! - **menu**: single-selection menu
//!
//! Quit and Back raised anywhere in here propagate to the caller as
//! [`InputError::Signal`](crate::error::InputError::Signal).

pub mod bindings;
pub mod line_editor;
pub mod menu;
pub mod notation;
pub mod output;
pub mod prompt;
pub mod session;

pub use bindings::{xterm_key_name, KeyBindingTable};
pub use line_editor::{LineBuffer, LineEdit};
pub use menu::{MenuChoice, MenuEvent, MenuOptions, MenuState};
pub use notation::{render, render_token, Notation, SKIPPED};
pub use output::Theme;
pub use session::Session;
