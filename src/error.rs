//! Error and control-signal types shared by the input engine.
//!
//! Quit and Back are not failures, but they travel the same way: as the
//! `Err` side of [`Result`], so every frame between the key capture and the
//! interactive loop that handles them unwinds with `?` and drops its guards.

use std::fmt;
use std::io;
use thiserror::Error;

/// Process-control signals raised from key capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Terminate the application.
    Quit,
    /// Abandon the current interactive step and return to the caller.
    Back,
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSignal::Quit => write!(f, "quit requested"),
            ControlSignal::Back => write!(f, "back requested"),
        }
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("{0}")]
    Signal(ControlSignal),

    #[error("Failed to read terminal attributes: {0}")]
    GetAttributes(#[source] io::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttributes(#[source] io::Error),

    #[error("Failed to change blocking mode: {0}")]
    BlockingMode(#[source] io::Error),

    #[error("Failed to read from terminal: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write to terminal: {0}")]
    Write(#[from] io::Error),

    #[error("Unknown notation: {0:?} (expected shell, readline or repr)")]
    UnknownNotation(String),

    #[error("Menu has no choices")]
    EmptyMenu,
}

impl InputError {
    pub const fn quit() -> Self {
        InputError::Signal(ControlSignal::Quit)
    }

    pub const fn back() -> Self {
        InputError::Signal(ControlSignal::Back)
    }

    /// The control signal carried by this error, if any.
    pub fn signal(&self) -> Option<ControlSignal> {
        match self {
            InputError::Signal(signal) => Some(*signal),
            _ => None,
        }
    }

    pub fn is_quit(&self) -> bool {
        self.signal() == Some(ControlSignal::Quit)
    }

    pub fn is_back(&self) -> bool {
        self.signal() == Some(ControlSignal::Back)
    }
}

pub type Result<T> = std::result::Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_accessors() {
        assert!(InputError::quit().is_quit());
        assert!(!InputError::quit().is_back());
        assert_eq!(InputError::back().signal(), Some(ControlSignal::Back));

        let err = InputError::Read(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.signal(), None);
    }

    #[test]
    fn test_io_error_converts_to_write() {
        fn fails() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(InputError::Write(_))));
    }
}
