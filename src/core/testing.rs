//! Scripted terminal device for tests.
//!
//! Bytes are queued with a delay measured from the previous delivery, so a
//! token's bytes can arrive in one burst and the next key press after a gap
//! longer than the inter-byte window.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use super::device::TerminalDevice;
use super::reader::Timing;

/// Fake attribute set: which mode the terminal is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermMode {
    Cooked,
    Raw,
}

/// Give up once the script is empty and nothing arrived for this long.
const EXHAUSTED_AFTER: Duration = Duration::from_secs(2);

/// Gap between key presses used by tests (well above [`test_timing`]'s window).
pub const KEY_GAP: Duration = Duration::from_millis(200);

pub fn test_timing() -> Timing {
    Timing {
        poll_interval: Duration::from_millis(1),
        sequence_timeout: Duration::from_millis(60),
    }
}

pub struct ScriptedTerminal {
    pending: VecDeque<(Duration, u8)>,
    last_delivery: Instant,
    pub mode: TermMode,
    pub nonblocking: bool,
    pub snapshots: usize,
    pub restores: usize,
    pub output: Vec<u8>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            last_delivery: Instant::now(),
            mode: TermMode::Cooked,
            nonblocking: false,
            snapshots: 0,
            restores: 0,
            output: Vec::new(),
        }
    }

    /// Queue one key press: the first byte after `delay`, the rest at once.
    pub fn key_after(mut self, delay: Duration, bytes: &[u8]) -> Self {
        for (i, byte) in bytes.iter().enumerate() {
            let wait = if i == 0 { delay } else { Duration::ZERO };
            self.pending.push_back((wait, *byte));
        }
        self
    }

    /// Queue a sequence of key presses separated by [`KEY_GAP`].
    pub fn keys(self, keys: &[&[u8]]) -> Self {
        keys.iter().enumerate().fold(self, |term, (i, key)| {
            let delay = if i == 0 { Duration::ZERO } else { KEY_GAP };
            term.key_after(delay, key)
        })
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl TerminalDevice for ScriptedTerminal {
    type Snapshot = TermMode;
    type Output = Vec<u8>;

    fn snapshot(&mut self) -> io::Result<TermMode> {
        self.snapshots += 1;
        Ok(self.mode)
    }

    fn restore(&mut self, snapshot: &TermMode) -> io::Result<()> {
        self.restores += 1;
        self.mode = *snapshot;
        Ok(())
    }

    fn make_raw(&mut self) -> io::Result<()> {
        self.mode = TermMode::Raw;
        Ok(())
    }

    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        self.nonblocking = nonblocking;
        Ok(())
    }

    fn try_read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.mode != TermMode::Raw || !self.nonblocking {
            return Err(io::Error::new(io::ErrorKind::Other, "read outside raw mode"));
        }
        match self.pending.front() {
            Some(&(delay, byte)) if self.last_delivery.elapsed() >= delay => {
                self.pending.pop_front();
                self.last_delivery = Instant::now();
                Ok(Some(byte))
            }
            Some(_) => Ok(None),
            None if self.last_delivery.elapsed() > EXHAUSTED_AFTER => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input script exhausted",
            )),
            None => Ok(None),
        }
    }

    fn output(&mut self) -> &mut Vec<u8> {
        &mut self.output
    }
}
