//! SIGINT/SIGTERM handling: a signal cancels playback instead of killing
//! the process. The runtime logs the progress reached in its
//! "playback stopped" event and the binary exits with code 130.

use std::io;

use sortviz_runtime::CancellationSource;
#[cfg(unix)]
use sortviz_runtime::StopReason;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Cancels `source` on SIGINT/SIGTERM until dropped.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    pub fn install(source: CancellationSource) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                tracing::warn!(
                    target: "sortviz.playback",
                    signal,
                    "termination signal received, cancelling playback"
                );
                source.cancel(StopReason::Signal(signal));
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// No signal handling off unix; Ctrl-C terminates the process.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct SignalGuard;

#[cfg(not(unix))]
impl SignalGuard {
    pub fn install(_source: CancellationSource) -> io::Result<Self> {
        Ok(Self)
    }
}
