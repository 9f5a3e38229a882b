//! Byte polling and key-sequence assembly.
//!
//! Reads are non-blocking and polled: an empty read sleeps for the poll
//! interval and tries again until a byte arrives or the timeout elapses. Key
//! assembly blocks for the first byte, then keeps appending bytes while each
//! one arrives within the inter-byte window. A lone Escape press is one byte
//! followed by silence; an arrow key or a UTF-8 character arrives as a burst.

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use super::device::TerminalDevice;
use super::key::KeyToken;
use super::raw_mode::Console;
use crate::error::{InputError, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(50);

/// Polling and inter-byte timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Sleep between empty non-blocking reads.
    pub poll_interval: Duration,
    /// Maximum gap between two bytes of the same key token.
    pub sequence_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
        }
    }
}

impl<D: TerminalDevice> Console<D> {
    /// Read one byte, waiting at most `timeout` (`None` waits forever).
    ///
    /// Enters raw mode for the duration of the call when not already raw.
    /// Returns `Ok(None)` when the timeout expires first.
    pub fn read_byte(&mut self, timeout: Option<Duration>) -> Result<Option<u8>> {
        if !self.is_raw() {
            let mut raw = self.raw_mode()?;
            return raw.read_byte(timeout);
        }

        let start = Instant::now();
        loop {
            if let Some(byte) = self.device_mut().try_read_byte().map_err(InputError::Read)? {
                trace!(byte, "read byte");
                return Ok(Some(byte));
            }
            if let Some(limit) = timeout {
                if start.elapsed() > limit {
                    return Ok(None);
                }
            }
            thread::sleep(self.timing.poll_interval);
        }
    }

    /// Read one key token, waiting at most `first_byte_timeout` for it to
    /// start. Subsequent bytes use the inter-byte window.
    pub fn read_key_timeout(&mut self, first_byte_timeout: Option<Duration>) -> Result<Option<KeyToken>> {
        if !self.is_raw() {
            let mut raw = self.raw_mode()?;
            return raw.read_key_timeout(first_byte_timeout);
        }

        let window = Some(self.timing.sequence_timeout);
        let mut bytes = Vec::new();
        let mut next = self.read_byte(first_byte_timeout)?;
        while let Some(byte) = next {
            bytes.push(byte);
            next = self.read_byte(window)?;
        }

        let token = KeyToken::new(bytes);
        trace!(?token, "read key");
        Ok(token)
    }

    /// Block until a complete key token has been read.
    pub fn read_key(&mut self) -> Result<KeyToken> {
        loop {
            if let Some(token) = self.read_key_timeout(None)? {
                return Ok(token);
            }
        }
    }
}
