//! Terminal device access for POSIX terminals.
//!
//! [`TerminalDevice`] is the seam between the input engine and the OS: saving
//! and restoring attributes, switching to raw flags, toggling non-blocking
//! reads, single-byte reads and the output stream. [`FdTerminal`] implements
//! it on any terminal descriptor with rustix's termios API; [`StdTerminal`] is
//! the stdin/stdout instance.

use std::io::{self, Write};
use std::os::fd::AsFd;

use rustix::fs::{self as rfs, OFlags};
use rustix::io::Errno;
use rustix::termios::{self, ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, Termios};

/// Low-level terminal operations used by [`Console`](super::Console).
pub trait TerminalDevice {
    /// Saved attribute set, restored verbatim when the raw session ends.
    type Snapshot: Clone;
    /// Stream that receives prompts, echoes and cursor sequences.
    type Output: Write;

    /// Capture the current attribute set.
    fn snapshot(&mut self) -> io::Result<Self::Snapshot>;

    /// Reapply a previously captured attribute set.
    fn restore(&mut self, snapshot: &Self::Snapshot) -> io::Result<()>;

    /// Apply raw-mode flags on top of the current attributes.
    fn make_raw(&mut self) -> io::Result<()>;

    /// Switch the input descriptor between blocking and non-blocking reads.
    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()>;

    /// Try to read one byte without blocking.
    ///
    /// Returns `Ok(None)` when no byte is available yet.
    fn try_read_byte(&mut self) -> io::Result<Option<u8>>;

    fn output(&mut self) -> &mut Self::Output;
}

/// Terminal read through an input descriptor, written through `output`.
pub struct FdTerminal<I: AsFd, O: Write> {
    input: I,
    output: O,
}

/// The process's controlling terminal on stdin/stdout.
pub type StdTerminal = FdTerminal<io::Stdin, io::Stdout>;

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl FdTerminal<io::Stdin, io::Stdout> {
    pub fn new() -> Self {
        Self::from_parts(io::stdin(), io::stdout())
    }
}

impl<I: AsFd, O: Write> FdTerminal<I, O> {
    pub fn from_parts(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Whether the input is attached to a terminal.
    pub fn is_tty(&self) -> bool {
        termios::isatty(&self.input)
    }
}

/// Clear the flags that make a terminal cooked.
///
/// Input: no break handling, parity marking, stripping, CR/NL translation or
/// XON/XOFF. Output: no post-processing. Line discipline: no echo, canonical
/// mode, signal keys or extended processing. Characters are forced to 8 bits.
pub fn apply_raw_flags(termios: &mut Termios) {
    termios.input_modes -= InputModes::IGNBRK
        | InputModes::BRKINT
        | InputModes::PARMRK
        | InputModes::ISTRIP
        | InputModes::INLCR
        | InputModes::IGNCR
        | InputModes::ICRNL
        | InputModes::IXON;
    termios.output_modes -= OutputModes::OPOST;
    termios.local_modes -= LocalModes::ECHO
        | LocalModes::ECHONL
        | LocalModes::ICANON
        | LocalModes::ISIG
        | LocalModes::IEXTEN;
    termios.control_modes -= ControlModes::CSIZE;
    termios.control_modes |= ControlModes::CS8;
}

impl<I: AsFd, O: Write> TerminalDevice for FdTerminal<I, O> {
    type Snapshot = Termios;
    type Output = O;

    fn snapshot(&mut self) -> io::Result<Termios> {
        Ok(termios::tcgetattr(&self.input)?)
    }

    fn restore(&mut self, snapshot: &Termios) -> io::Result<()> {
        termios::tcsetattr(&self.input, OptionalActions::Drain, snapshot)?;
        Ok(())
    }

    fn make_raw(&mut self) -> io::Result<()> {
        let mut attrs = termios::tcgetattr(&self.input)?;
        apply_raw_flags(&mut attrs);
        termios::tcsetattr(&self.input, OptionalActions::Drain, &attrs)?;
        Ok(())
    }

    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        let flags = rfs::fcntl_getfl(&self.input)?;
        let flags = if nonblocking {
            flags | OFlags::NONBLOCK
        } else {
            flags - OFlags::NONBLOCK
        };
        rfs::fcntl_setfl(&self.input, flags)?;
        Ok(())
    }

    fn try_read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match rustix::io::read(&self.input, &mut buf[..]) {
            Ok(0) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "terminal input closed")),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e == Errno::AGAIN || e == Errno::INTR => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn output(&mut self) -> &mut O {
        &mut self.output
    }
}
