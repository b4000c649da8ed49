//! Cancellation and deadlines for remote calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::RemoteError;

/// Cancellation signal passed to every remote operation.
///
/// Clones share the same flag; the deadline is fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancel {
    /// A signal that never fires on its own.
    pub fn never() -> Self {
        Self::default()
    }

    /// A signal that fires once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Request cancellation of every call observing this signal.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fail if cancelled or past the deadline.
    pub fn check(&self) -> Result<(), RemoteError> {
        if self.flag.load(Ordering::SeqCst) {
            return Err(RemoteError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(RemoteError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
