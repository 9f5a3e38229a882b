//! Scoped raw terminal mode.
//!
//! A [`Console`] owns the terminal device and remembers whether a raw session
//! is active. [`Console::raw_mode`] returns a [`RawModeGuard`] that derefs to
//! the console; the outermost guard saves the original attributes on entry
//! and restores them when dropped. Nested guards reuse the active session and
//! never save or restore, so the saved snapshot is always the cooked one.

use std::io::Write;
use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use super::device::{StdTerminal, TerminalDevice};
use super::reader::Timing;
use crate::error::{InputError, Result};

/// Terminal handle holding the raw-mode state.
pub struct Console<D: TerminalDevice = StdTerminal> {
    device: D,
    /// Original attributes; `Some` exactly while a raw session is active.
    saved: Option<D::Snapshot>,
    pub(crate) timing: Timing,
}

impl Console<StdTerminal> {
    /// Console on the process's stdin/stdout.
    pub fn stdio(timing: Timing) -> Self {
        Self::new(StdTerminal::new(), timing)
    }
}

impl<D: TerminalDevice> Console<D> {
    pub fn new(device: D, timing: Timing) -> Self {
        Self {
            device,
            saved: None,
            timing,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.saved.is_some()
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub(crate) fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn output(&mut self) -> &mut D::Output {
        self.device.output()
    }

    /// Enter raw mode for the lifetime of the returned guard.
    ///
    /// The first entry captures the current attributes. Every entry applies
    /// the raw flags and non-blocking reads.
    ///
    /// # Errors
    ///
    /// Fails if the attributes cannot be read or applied, or the descriptor's
    /// blocking mode cannot be changed. A failed outermost entry leaves the
    /// terminal as it found it.
    pub fn raw_mode(&mut self) -> Result<RawModeGuard<'_, D>> {
        let owner = self.saved.is_none();
        if owner {
            let snapshot = self.device.snapshot().map_err(InputError::GetAttributes)?;
            self.saved = Some(snapshot);
        }

        let configured = self
            .device
            .make_raw()
            .map_err(InputError::SetAttributes)
            .and_then(|()| {
                self.device
                    .set_nonblocking(true)
                    .map_err(InputError::BlockingMode)
            });

        if let Err(e) = configured {
            if owner {
                if let Err(restore_err) = self.leave_raw() {
                    warn!("Failed to roll back raw mode: {}", restore_err);
                }
            }
            return Err(e);
        }

        if owner {
            debug!("Entered raw mode");
        }
        Ok(RawModeGuard {
            console: self,
            owner,
        })
    }

    /// End the active raw session: blocking reads, original attributes,
    /// trailing newline. No-op when not raw.
    fn leave_raw(&mut self) -> Result<()> {
        let Some(snapshot) = self.saved.take() else {
            return Ok(());
        };

        let blocking = self
            .device
            .set_nonblocking(false)
            .map_err(InputError::BlockingMode);
        let restored = self
            .device
            .restore(&snapshot)
            .map_err(InputError::SetAttributes);

        let out = self.device.output();
        out.write_all(b"\n")?;
        out.flush()?;

        debug!("Left raw mode");
        blocking.and(restored)
    }
}

/// Active raw session, restored on drop when it is the outermost one.
pub struct RawModeGuard<'a, D: TerminalDevice> {
    console: &'a mut Console<D>,
    owner: bool,
}

impl<D: TerminalDevice> RawModeGuard<'_, D> {
    /// Whether this guard opened the session (and will close it).
    pub fn is_outermost(&self) -> bool {
        self.owner
    }

    /// Leave raw mode now, reporting restoration errors instead of logging
    /// them.
    pub fn exit(mut self) -> Result<()> {
        let owner = std::mem::replace(&mut self.owner, false);
        if owner {
            self.console.leave_raw()
        } else {
            Ok(())
        }
    }
}

impl<D: TerminalDevice> Deref for RawModeGuard<'_, D> {
    type Target = Console<D>;

    fn deref(&self) -> &Console<D> {
        self.console
    }
}

impl<D: TerminalDevice> DerefMut for RawModeGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut Console<D> {
        self.console
    }
}

impl<D: TerminalDevice> Drop for RawModeGuard<'_, D> {
    fn drop(&mut self) {
        if self.owner {
            if let Err(e) = self.console.leave_raw() {
                warn!("Failed to restore terminal mode: {}", e);
            }
        }
    }
}
