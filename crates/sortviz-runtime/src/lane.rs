#![forbid(unsafe_code)]

//! One independently advancing trace playback.

use std::fmt;

use sortviz_core::{MetricsCollector, Step, Trace, TraceMetrics};
use web_time::{Duration, Instant};

use crate::winner::LaneSummary;

/// Which side of a run a lane plays on. Single runs use [`LaneId::Left`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LaneId {
    /// The only lane of a single run, or the left lane of a race.
    Left,
    /// The right lane of a race.
    Right,
}

impl LaneId {
    /// Lowercase label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lane lifecycle: `Idle → Running → Drained`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneState {
    /// Created, not yet started.
    Idle,
    /// Started with steps remaining.
    Running,
    /// Every step consumed. Terminal.
    Drained,
}

/// Playback position, metrics, and timing for one trace.
#[derive(Debug, Clone)]
pub struct Lane {
    id: LaneId,
    trace: Trace,
    index: usize,
    state: LaneState,
    metrics: MetricsCollector,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl Lane {
    /// Idle lane over `trace`.
    #[must_use]
    pub fn new(id: LaneId, trace: Trace) -> Self {
        Self {
            id,
            trace,
            index: 0,
            state: LaneState::Idle,
            metrics: MetricsCollector::new(),
            started_at: None,
            finished_at: None,
        }
    }

    /// `Idle → Running`. An empty trace drains immediately and finishes at
    /// `now`. Has no effect on a lane that already started.
    pub fn start(&mut self, now: Instant) {
        if self.state != LaneState::Idle {
            return;
        }
        self.started_at = Some(now);
        self.state = LaneState::Running;
        if self.trace.is_empty() {
            self.finish(now);
        }
    }

    /// Consume the next step. Returns `None` unless the lane is running.
    ///
    /// Consuming the last step drains the lane and latches its finish time.
    pub fn advance(&mut self, now: Instant) -> Option<&Step> {
        if self.state != LaneState::Running {
            return None;
        }
        let step = self.trace.get(self.index)?;
        self.metrics.observe(step);
        self.index += 1;
        if self.index == self.trace.len() {
            self.finish(now);
        }
        self.trace.get(self.index - 1)
    }

    fn finish(&mut self, now: Instant) {
        self.state = LaneState::Drained;
        if self.finished_at.is_none() {
            self.finished_at = Some(now);
        }
    }

    /// Drop back to `Idle` with all counters at zero.
    pub fn reset(&mut self) {
        self.index = 0;
        self.state = LaneState::Idle;
        self.metrics.reset();
        self.started_at = None;
        self.finished_at = None;
    }

    #[must_use]
    pub const fn id(&self) -> LaneId {
        self.id
    }

    #[must_use]
    pub const fn state(&self) -> LaneState {
        self.state
    }

    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.state == LaneState::Drained
    }

    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Steps consumed so far.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Steps not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.trace.len() - self.index
    }

    /// Most recently consumed step.
    #[must_use]
    pub fn current(&self) -> Option<&Step> {
        self.index.checked_sub(1).and_then(|i| self.trace.get(i))
    }

    /// Metrics over the consumed prefix.
    #[must_use]
    pub const fn metrics(&self) -> TraceMetrics {
        self.metrics.snapshot()
    }

    #[must_use]
    pub const fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Latched drain time; set once and never moved.
    #[must_use]
    pub const fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    /// Start-to-finish time, once drained.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end.saturating_duration_since(start)),
            _ => None,
        }
    }

    /// Summary for the winner decision, once drained.
    #[must_use]
    pub fn summary(&self) -> Option<LaneSummary> {
        let elapsed = self.elapsed()?;
        let metrics = self.metrics();
        Some(LaneSummary {
            algorithm: self.trace.algorithm(),
            steps: self.trace.len(),
            compares: metrics.compares,
            writes: metrics.writes,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortviz_core::{Algorithm, StepSorter};

    fn lane(input: &[i32]) -> Lane {
        Lane::new(LaneId::Left, Algorithm::Bubble.steps(input))
    }

    #[test]
    fn starts_idle_and_runs_after_start() {
        let mut lane = lane(&[2, 1]);
        assert_eq!(lane.state(), LaneState::Idle);
        assert!(lane.advance(Instant::now()).is_none());
        lane.start(Instant::now());
        assert_eq!(lane.state(), LaneState::Running);
    }

    #[test]
    fn drains_on_last_step_and_latches_finish() {
        let t0 = Instant::now();
        let mut lane = lane(&[3, 2, 1]);
        lane.start(t0);
        let len = lane.trace().len();
        for i in 1..=len {
            let now = t0 + Duration::from_millis(i as u64);
            assert!(lane.advance(now).is_some());
        }
        assert!(lane.is_drained());
        assert_eq!(lane.remaining(), 0);
        let finished = lane.finished_at().unwrap();
        assert_eq!(finished, t0 + Duration::from_millis(len as u64));

        assert!(lane.advance(t0 + Duration::from_secs(9)).is_none());
        assert_eq!(lane.finished_at(), Some(finished));
    }

    #[test]
    fn empty_trace_drains_at_start() {
        let t0 = Instant::now();
        let mut lane = lane(&[7]);
        lane.start(t0);
        assert!(lane.is_drained());
        assert_eq!(lane.elapsed(), Some(Duration::ZERO));
        let summary = lane.summary().unwrap();
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.compares, 0);
    }

    #[test]
    fn metrics_follow_consumed_prefix() {
        let t0 = Instant::now();
        let mut lane = lane(&[2, 1]);
        lane.start(t0);
        lane.advance(t0);
        assert_eq!(lane.metrics().compares, 1);
        assert_eq!(lane.metrics().writes, 0);
        lane.advance(t0);
        assert_eq!(lane.metrics().writes, 2);
        assert_eq!(lane.current().map(Step::data), Some(&[1, 2][..]));
    }

    #[test]
    fn restart_is_ignored() {
        let t0 = Instant::now();
        let mut lane = lane(&[2, 1]);
        lane.start(t0);
        lane.start(t0 + Duration::from_secs(1));
        assert_eq!(lane.started_at(), Some(t0));
    }

    #[test]
    fn reset_zeroes_counters() {
        let t0 = Instant::now();
        let mut lane = lane(&[2, 1]);
        lane.start(t0);
        lane.advance(t0);
        lane.reset();
        assert_eq!(lane.state(), LaneState::Idle);
        assert_eq!(lane.index(), 0);
        assert_eq!(lane.metrics(), TraceMetrics::default());
        assert!(lane.started_at().is_none());
        assert!(lane.summary().is_none());
    }
}
