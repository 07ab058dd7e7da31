#![forbid(unsafe_code)]

//! Callback-driven playback handle.
//!
//! [`start_playback`] binds a [`RunState`] to two callbacks: `on_frame` for
//! every lane that advanced during a tick and `on_complete` once the run
//! finishes. The caller drives it, either by calling
//! [`PlaybackHandle::tick`] from its own timer or by handing it to
//! [`run_blocking`].
//!
//! ```
//! use sortviz_core::{Algorithm, generate_trace};
//! use sortviz_runtime::{PlaybackConfig, PlaybackSource, start_playback};
//! use web_time::{Duration, Instant};
//!
//! let trace = generate_trace(Algorithm::Bubble, &[3, 1, 2]);
//! let mut frames = 0;
//! let mut handle = start_playback(
//!     PlaybackSource::Single(trace),
//!     100,
//!     &PlaybackConfig::default(),
//!     |_, _| frames += 1,
//!     |outcome| assert_eq!(outcome.left.steps, 5),
//! );
//! let mut now = Instant::now();
//! while handle.tick(now) {
//!     now += handle.interval();
//! }
//! assert!(handle.is_finished());
//! drop(handle);
//! assert!(frames > 0);
//! ```

use std::fmt;

use sortviz_core::{Step, Trace};
use web_time::{Duration, Instant};

use crate::cancellation::{CancellationSource, CancellationToken, StopReason};
use crate::config::PlaybackConfig;
use crate::lane::LaneId;
use crate::pacing::{clamp_speed, tick_interval};
use crate::scheduler::{RunOutcome, RunState};

/// What to play.
#[derive(Debug, Clone)]
pub enum PlaybackSource {
    /// One trace on the left lane.
    Single(Trace),
    /// Two traces racing, left then right.
    Race(Trace, Trace),
}

/// How [`run_blocking`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// Every lane drained and `on_complete` ran.
    Completed,
    /// Stopped before completion, with the first stop request's reason.
    Stopped(StopReason),
}

type FrameCallback<'a> = Box<dyn FnMut(LaneId, &Step) + 'a>;
type CompleteCallback<'a> = Box<dyn FnOnce(&RunOutcome) + 'a>;

/// A running playback.
pub struct PlaybackHandle<'a> {
    run: Option<RunState>,
    config: PlaybackConfig,
    speed: u32,
    on_frame: FrameCallback<'a>,
    on_complete: Option<CompleteCallback<'a>>,
    cancel: CancellationSource,
    completed: bool,
}

/// Start playback now.
pub fn start_playback<'a>(
    source: PlaybackSource,
    speed_percent: u32,
    config: &PlaybackConfig,
    on_frame: impl FnMut(LaneId, &Step) + 'a,
    on_complete: impl FnOnce(&RunOutcome) + 'a,
) -> PlaybackHandle<'a> {
    start_playback_at(
        source,
        speed_percent,
        config,
        on_frame,
        on_complete,
        Instant::now(),
    )
}

/// Start playback with an explicit start instant.
///
/// A run that is complete at start (every trace empty) invokes
/// `on_complete` before returning.
pub fn start_playback_at<'a>(
    source: PlaybackSource,
    speed_percent: u32,
    config: &PlaybackConfig,
    on_frame: impl FnMut(LaneId, &Step) + 'a,
    on_complete: impl FnOnce(&RunOutcome) + 'a,
    now: Instant,
) -> PlaybackHandle<'a> {
    let run = match source {
        PlaybackSource::Single(trace) => RunState::single(trace, config, now),
        PlaybackSource::Race(left, right) => RunState::race(left, right, config, now),
    };
    let mut handle = PlaybackHandle {
        run: Some(run),
        config: config.clone(),
        speed: clamp_speed(speed_percent),
        on_frame: Box::new(on_frame),
        on_complete: Some(Box::new(on_complete)),
        cancel: CancellationSource::new(),
        completed: false,
    };
    let ready = handle.run.as_ref().and_then(RunState::outcome).cloned();
    if let Some(outcome) = ready {
        handle.complete(&outcome);
    }
    handle
}

impl PlaybackHandle<'_> {
    /// Change the playback speed. Takes effect from the next interval.
    pub fn set_speed(&mut self, percent: u32) {
        self.speed = clamp_speed(percent);
        tracing::debug!(
            target: "sortviz.playback",
            speed = self.speed,
            interval_ms = self.interval().as_millis() as u64,
            "speed changed"
        );
    }

    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Delay until the next tick at the current speed.
    #[must_use]
    pub fn interval(&self) -> Duration {
        tick_interval(self.speed, &self.config)
    }

    /// Run one tick at `now`. Returns `true` while more ticks are needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.cancel.is_cancelled() && self.run.is_some() {
            self.stop();
        }
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        if self.completed {
            return false;
        }
        let report = run.tick(now);
        for frame in &report.frames {
            (self.on_frame)(frame.lane, &frame.step);
        }
        match report.completed {
            Some(outcome) => {
                self.complete(&outcome);
                false
            }
            None => true,
        }
    }

    fn complete(&mut self, outcome: &RunOutcome) {
        self.completed = true;
        if let Some(callback) = self.on_complete.take() {
            callback(outcome);
        }
    }

    /// Stop now. Discards the run and its lane counters; `on_complete` is
    /// not called. Safe to call repeatedly. A stop already requested through
    /// the token keeps its own reason.
    pub fn stop(&mut self) {
        self.cancel.cancel(StopReason::User);
        if let Some(run) = self.run.take() {
            tracing::info!(
                target: "sortviz.playback",
                ticks = run.ticks(),
                progress = run.progress(),
                completed = self.completed,
                reason = %self.cancel.reason().unwrap_or(StopReason::User),
                "playback stopped"
            );
        }
        self.on_complete = None;
    }

    /// Whether the run completed or was stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed || self.run.is_none()
    }

    /// Whether the run was stopped before completing.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.run.is_none() && !self.completed
    }

    /// Live run state; `None` after [`stop`](Self::stop).
    #[must_use]
    pub const fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Final outcome, once complete.
    #[must_use]
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.run.as_ref().and_then(RunState::outcome)
    }

    /// Token that fires when this playback is cancelled or stopped.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.token()
    }

    /// Source that can cancel this playback from another thread.
    #[must_use]
    pub fn canceller(&self) -> CancellationSource {
        self.cancel.clone()
    }

    /// Replace the handle's source with one created before the handle, so
    /// the callbacks themselves can request a stop.
    #[must_use]
    pub fn with_canceller(mut self, source: CancellationSource) -> Self {
        self.cancel = source;
        self
    }

    /// Why the run stopped early; `None` while running or once completed.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.completed {
            None
        } else {
            self.cancel.reason()
        }
    }
}

impl fmt::Debug for PlaybackHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("speed", &self.speed)
            .field("completed", &self.completed)
            .field("stopped", &self.is_stopped())
            .field("ticks", &self.run.as_ref().map(RunState::ticks))
            .finish_non_exhaustive()
    }
}

/// Drive `handle` in real time until it completes or is cancelled.
///
/// Each tick waits one [`interval`](PlaybackHandle::interval) first; the wait
/// wakes early on cancellation.
pub fn run_blocking(handle: &mut PlaybackHandle<'_>) -> RunExit {
    let token = handle.cancel_token();
    while !handle.is_finished() {
        if token.wait_timeout(handle.interval()).is_some() {
            handle.stop();
            break;
        }
        handle.tick(Instant::now());
    }
    if handle.completed {
        RunExit::Completed
    } else {
        RunExit::Stopped(handle.cancel.reason().unwrap_or(StopReason::User))
    }
}
