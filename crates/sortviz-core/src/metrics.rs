#![forbid(unsafe_code)]

//! Trace metrics: comparison counts and approximate write counts.
//!
//! Metrics are derived from a [`Trace`] alone, never from the algorithm that
//! produced it. [`MetricsCollector`] folds steps in one at a time so a player
//! can report partial progress mid-playback; [`TraceMetrics::of`] folds a
//! whole trace at once and always agrees with a collector that observed every
//! step.
//!
//! # Approximate writes
//!
//! `writes` sums, over consecutive step pairs, the number of positions whose
//! value differs. It reports apparent value changes between frames, not the
//! memory writes the algorithm performed: a swap of equal values counts zero,
//! and a merge frame that overlays several positions counts each changed one.
//! The first step has no predecessor and contributes nothing.

use crate::step::{Step, Trace};

/// Label to show next to `writes` anywhere it is reported.
pub const WRITES_LABEL: &str = "approx. writes (changed positions between frames)";

/// Totals derived from a trace (or a prefix of one).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceMetrics {
    /// Steps with at least one compare annotation.
    pub compares: u64,
    /// Approximate writes; see the module docs.
    pub writes: u64,
}

impl TraceMetrics {
    /// Fold an entire trace.
    #[must_use]
    pub fn of(trace: &Trace) -> Self {
        let mut collector = MetricsCollector::new();
        for step in trace {
            collector.observe(step);
        }
        collector.snapshot()
    }
}

/// Incremental metrics over a stream of steps.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    totals: TraceMetrics,
    previous: Option<Step>,
    observed: u64,
}

impl MetricsCollector {
    /// Fresh collector with zero totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for the next step in trace order.
    pub fn observe(&mut self, step: &Step) {
        if step.is_compare() {
            self.totals.compares += 1;
        }
        if let Some(previous) = &self.previous {
            self.totals.writes += step.changed_positions(previous) as u64;
        }
        // Step clones share the frozen data, so this does not copy the array.
        self.previous = Some(step.clone());
        self.observed += 1;
    }

    /// Totals so far.
    #[must_use]
    pub const fn snapshot(&self) -> TraceMetrics {
        self.totals
    }

    /// Number of steps observed.
    #[must_use]
    pub const fn observed(&self) -> u64 {
        self.observed
    }

    /// Forget everything observed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
