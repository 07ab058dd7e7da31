#![forbid(unsafe_code)]

//! Stop requests for a playback, carrying why the playback ended early.
//!
//! A [`PlaybackHandle`](crate::PlaybackHandle) owns a [`CancellationSource`].
//! Anything holding a source clone (a signal thread, a frame sink, a UI close
//! button) can request a stop with a [`StopReason`]; the first request wins
//! and later ones are ignored. The handle checks its token before every tick,
//! and [`run_blocking`](crate::run_blocking) sleeps on it between ticks.
//!
//! ```
//! use sortviz_runtime::cancellation::{CancellationSource, StopReason};
//! use web_time::Duration;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! let remote = source.clone();
//!
//! std::thread::spawn(move || remote.cancel(StopReason::Signal(2)));
//! assert_eq!(token.wait_timeout(Duration::from_secs(5)), Some(StopReason::Signal(2)));
//! assert!(!source.cancel(StopReason::User));
//! ```

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use web_time::Duration;

/// Why a playback ended before every lane drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// [`PlaybackHandle::stop`](crate::PlaybackHandle::stop) or a caller request.
    User,
    /// A termination signal, by number.
    Signal(i32),
    /// The consumer of frames failed, e.g. a closed stdout.
    OutputFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("stopped"),
            Self::Signal(signal) => write!(f, "signal {signal}"),
            Self::OutputFailed => f.write_str("output failed"),
        }
    }
}

struct StopSlot {
    reason: Mutex<Option<StopReason>>,
    wake: Condvar,
}

impl StopSlot {
    fn lock(&self) -> MutexGuard<'_, Option<StopReason>> {
        self.reason.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write side. Clones share one slot; dropping a source does not cancel.
#[derive(Clone)]
pub struct CancellationSource {
    slot: Arc<StopSlot>,
}

/// Read side of a [`CancellationSource`].
#[derive(Clone)]
pub struct CancellationToken {
    slot: Arc<StopSlot>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(StopSlot {
                reason: Mutex::new(None),
                wake: Condvar::new(),
            }),
        }
    }

    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Record `reason` and wake waiters. Returns `false` if a stop was
    /// already requested; the earlier reason is kept.
    pub fn cancel(&self, reason: StopReason) -> bool {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(reason);
        drop(slot);
        self.slot.wake.notify_all();
        true
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// The winning stop reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        *self.slot.lock()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        *self.slot.lock()
    }

    /// Sleep up to `duration`, returning early with the reason once a stop
    /// is requested. `None` means the full duration elapsed.
    pub fn wait_timeout(&self, duration: Duration) -> Option<StopReason> {
        let guard = self.slot.lock();
        let (guard, _) = self
            .slot
            .wake
            .wait_timeout_while(guard, duration, |reason| reason.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("reason", &self.reason())
            .finish()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("reason", &self.reason())
            .finish()
    }
}
