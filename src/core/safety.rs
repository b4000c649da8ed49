//! Output safety for unveiled secrets.
//!
//! Secret payloads are only ever written to sinks that are not interactive
//! terminals. Every path relaying an unveiled value goes through [`relay`].

use std::io::{self, IsTerminal, Write};

use tracing::warn;

use crate::error::{Error, Result};

/// A destination for secret bytes that knows whether a human is watching.
pub trait Sink: Write {
    /// Whether the sink is an interactive terminal.
    fn is_interactive(&self) -> bool;
}

/// Standard output.
#[derive(Debug)]
pub struct Stdout(io::Stdout);

impl Stdout {
    pub fn new() -> Self {
        Self(io::stdout())
    }
}

impl Default for Stdout {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Stdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Sink for Stdout {
    fn is_interactive(&self) -> bool {
        self.0.is_terminal()
    }
}

/// An in-memory sink, never interactive.
impl Sink for Vec<u8> {
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Fail with `CancelledForSafety` if `sink` is interactive.
pub fn ensure_not_interactive(sink: &dyn Sink) -> Result<()> {
    if sink.is_interactive() {
        warn!("refusing to write secret to a terminal");
        return Err(Error::CancelledForSafety);
    }
    Ok(())
}

/// Write `payload` to `sink` unless it is an interactive terminal.
///
/// Nothing is written when the check fails.
pub fn relay(payload: &[u8], sink: &mut dyn Sink) -> Result<()> {
    ensure_not_interactive(sink)?;
    sink.write_all(payload)?;
    sink.flush()?;
    Ok(())
}
