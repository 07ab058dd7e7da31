#![forbid(unsafe_code)]

//! Tick-driven run state for single and race playback.
//!
//! [`RunState`] is a plain value: the caller owns the timer, calls
//! [`RunState::tick`] with the current instant, and renders whatever the
//! returned [`TickReport`] says changed. Nothing here sleeps or spawns.
//!
//! Each tick asks the [`Pacer`] for a budget of synchronized rounds. One
//! round consumes exactly one step from every lane that is still running, so
//! race lanes advance in lockstep until the shorter trace drains.

use sortviz_core::{Step, Trace};
use web_time::{Duration, Instant};

use crate::config::PlaybackConfig;
use crate::lane::{Lane, LaneId};
use crate::pacing::Pacer;
use crate::winner::{LaneSummary, Verdict, decide};

/// The newest step of a lane that advanced during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lane: LaneId,
    /// Steps consumed by the lane, including this one.
    pub index: usize,
    /// Trace length of the lane.
    pub total: usize,
    pub step: Step,
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// 0-indexed tick number.
    pub tick: u64,
    /// Synchronized rounds executed.
    pub rounds: usize,
    /// One frame per lane that advanced, left before right.
    pub frames: Vec<Frame>,
    /// Set only on the tick the run completes.
    pub completed: Option<RunOutcome>,
}

/// Final result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunOutcome {
    pub left: LaneSummary,
    /// Present in race mode.
    pub right: Option<LaneSummary>,
    /// Present in race mode.
    pub verdict: Option<Verdict>,
    /// Ticks the run took.
    pub ticks: u64,
}

/// Explicit state of one playback run.
#[derive(Debug, Clone)]
pub struct RunState {
    left: Lane,
    right: Option<Lane>,
    pacer: Pacer,
    tie_threshold: Duration,
    ticks: u64,
    outcome: Option<RunOutcome>,
}

impl RunState {
    /// Single-lane run started at `now`.
    #[must_use]
    pub fn single(trace: Trace, config: &PlaybackConfig, now: Instant) -> Self {
        let pacer = Pacer::new(trace.width(), trace.len(), &config.pacing);
        Self::start(Lane::new(LaneId::Left, trace), None, pacer, config, now)
    }

    /// Two-lane race started at `now`. Pacing follows the longer trace.
    #[must_use]
    pub fn race(left: Trace, right: Trace, config: &PlaybackConfig, now: Instant) -> Self {
        let width = left.width().max(right.width());
        let steps = left.len().max(right.len());
        let pacer = Pacer::new(width, steps, &config.pacing);
        Self::start(
            Lane::new(LaneId::Left, left),
            Some(Lane::new(LaneId::Right, right)),
            pacer,
            config,
            now,
        )
    }

    fn start(
        mut left: Lane,
        mut right: Option<Lane>,
        pacer: Pacer,
        config: &PlaybackConfig,
        now: Instant,
    ) -> Self {
        left.start(now);
        if let Some(lane) = right.as_mut() {
            lane.start(now);
        }
        tracing::info!(
            target: "sortviz.playback",
            mode = if right.is_some() { "race" } else { "single" },
            left = left.trace().algorithm().id(),
            right = right.as_ref().map(|l| l.trace().algorithm().id()),
            input_len = left.trace().width(),
            total_ticks = pacer.total_ticks(),
            target_ms = pacer.target().as_millis() as u64,
            "run started"
        );
        let mut state = Self {
            left,
            right,
            pacer,
            tie_threshold: config.race.tie_threshold(),
            ticks: 0,
            outcome: None,
        };
        state.outcome = state.settle();
        state
    }

    /// Advance one tick at `now`.
    ///
    /// After completion every further tick is a no-op report.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let tick = self.ticks;
        if self.outcome.is_some() {
            return TickReport {
                tick,
                ..TickReport::default()
            };
        }

        let span = tracing::trace_span!(
            target: "sortviz.playback",
            "playback.tick",
            tick,
            consumed = tracing::field::Empty
        )
        .entered();

        self.ticks += 1;
        let budget = self.pacer.next_budget();
        let before = (self.left.index(), self.right.as_ref().map(Lane::index));
        let mut rounds = 0;
        while rounds < budget && !self.all_drained() {
            self.left.advance(now);
            if let Some(lane) = self.right.as_mut() {
                lane.advance(now);
            }
            rounds += 1;
        }
        span.record("consumed", rounds);

        let mut frames = Vec::with_capacity(2);
        if self.left.index() != before.0 {
            frames.extend(frame_of(&self.left));
        }
        if let Some(lane) = self.right.as_ref().filter(|l| Some(l.index()) != before.1) {
            frames.extend(frame_of(lane));
        }

        let completed = self.settle();
        if let Some(outcome) = &completed {
            self.outcome = Some(outcome.clone());
        }
        TickReport {
            tick,
            rounds,
            frames,
            completed,
        }
    }

    fn all_drained(&self) -> bool {
        self.left.is_drained() && self.right.as_ref().is_none_or(Lane::is_drained)
    }

    fn settle(&self) -> Option<RunOutcome> {
        if !self.all_drained() {
            return None;
        }
        let left = self.left.summary()?;
        let right = match &self.right {
            Some(lane) => Some(lane.summary()?),
            None => None,
        };
        let verdict = right.map(|r| decide(&left, &r, self.tie_threshold));
        if let (Some(verdict), Some(r)) = (verdict, right) {
            tracing::info!(
                target: "sortviz.race",
                left = left.algorithm.id(),
                right = r.algorithm.id(),
                left_ms = left.elapsed.as_millis() as u64,
                right_ms = r.elapsed.as_millis() as u64,
                winner = ?verdict.winner,
                reason = verdict.reason.describe(),
                "race decided"
            );
        }
        tracing::info!(
            target: "sortviz.playback",
            ticks = self.ticks,
            steps = left.steps,
            compares = left.compares,
            writes = left.writes,
            "run complete"
        );
        Some(RunOutcome {
            left,
            right,
            verdict,
            ticks: self.ticks,
        })
    }

    /// Whether every lane has drained.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Outcome, once complete.
    #[must_use]
    pub const fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Fraction of all steps consumed across lanes, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let lanes = std::iter::once(&self.left).chain(self.right.as_ref());
        let (done, total) = lanes.fold((0usize, 0usize), |(d, t), lane| {
            (d + lane.index(), t + lane.trace().len())
        });
        if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        }
    }

    /// Lane by id. `Right` is `None` outside race mode.
    #[must_use]
    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        match id {
            LaneId::Left => Some(&self.left),
            LaneId::Right => self.right.as_ref(),
        }
    }

    /// Whether this run has a right lane.
    #[must_use]
    pub const fn is_race(&self) -> bool {
        self.right.is_some()
    }

    /// Ticks executed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn pacer(&self) -> &Pacer {
        &self.pacer
    }
}

fn frame_of(lane: &Lane) -> Option<Frame> {
    lane.current().map(|step| Frame {
        lane: lane.id(),
        index: lane.index(),
        total: lane.trace().len(),
        step: step.clone(),
    })
}
