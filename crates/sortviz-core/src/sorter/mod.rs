//! Instrumented sorters.
//!
//! Every sorter exposes two entry points over the same algorithm: a silent
//! in-place [`StepSorter::sort`] and a trace-producing [`StepSorter::steps`].
//! For equal input both end in the same ascending array.
//!
//! # Standalone structs vs. tagged enum
//!
//! Each algorithm has a standalone unit struct ([`BubbleSort`],
//! [`SelectionSort`], [`MergeSort`]) implementing [`StepSorter`]. For
//! selection by id (CLI flags, config, GUI combo boxes) use [`Algorithm`],
//! which delegates to the same logic. Callers such as the scheduler and the
//! metrics collector only ever see a [`Trace`] and never branch on which
//! algorithm produced it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::step::Trace;

mod bubble;
mod merge;
mod selection;

pub use bubble::BubbleSort;
pub use merge::MergeSort;
pub use selection::SelectionSort;

/// Capability set shared by all instrumented sorters.
///
/// `steps` must not mutate its input and must be deterministic: equal input
/// yields a field-by-field equal trace on every call.
pub trait StepSorter {
    /// Human-readable algorithm name.
    fn name(&self) -> &'static str;

    /// Sort `values` ascending, in place, without recording anything.
    fn sort(&self, values: &mut [i32]);

    /// Sort a private copy of `input`, recording every frame.
    fn steps(&self, input: &[i32]) -> Trace;
}

/// Built-in algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Adjacent compare-and-swap passes.
    Bubble,
    /// Minimum selection into the front of the unsorted window.
    Selection,
    /// Top-down recursive merge with a whole-array scratch buffer.
    Merge,
}

impl Algorithm {
    /// Every built-in algorithm, in display order.
    pub const ALL: [Self; 3] = [Self::Bubble, Self::Selection, Self::Merge];

    /// Stable lowercase identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Merge => "merge",
        }
    }
}

impl StepSorter for Algorithm {
    fn name(&self) -> &'static str {
        match self {
            Self::Bubble => BubbleSort.name(),
            Self::Selection => SelectionSort.name(),
            Self::Merge => MergeSort.name(),
        }
    }

    fn sort(&self, values: &mut [i32]) {
        match self {
            Self::Bubble => BubbleSort.sort(values),
            Self::Selection => SelectionSort.sort(values),
            Self::Merge => MergeSort.sort(values),
        }
    }

    fn steps(&self, input: &[i32]) -> Trace {
        match self {
            Self::Bubble => BubbleSort.steps(input),
            Self::Selection => SelectionSort.steps(input),
            Self::Merge => MergeSort.steps(input),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when an algorithm id is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {name} (expected one of: bubble, selection, merge)")]
pub struct ParseAlgorithmError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let id = normalized.strip_suffix("-sort").unwrap_or(&normalized);
        match id {
            "bubble" => Ok(Self::Bubble),
            "selection" => Ok(Self::Selection),
            "merge" => Ok(Self::Merge),
            _ => Err(ParseAlgorithmError { name: s.to_owned() }),
        }
    }
}

/// Produce the full replay trace for `input` under `algorithm`.
///
/// Pure and synchronous: the trace is fully materialized before returning and
/// `input` is left untouched.
#[must_use]
pub fn generate_trace(algorithm: Algorithm, input: &[i32]) -> Trace {
    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!(
        target: "sortviz.trace",
        "trace.generate",
        algorithm = algorithm.id(),
        input_len = input.len(),
        steps = tracing::field::Empty,
    )
    .entered();

    let trace = algorithm.steps(input);

    #[cfg(feature = "tracing")]
    {
        span.record("steps", trace.len());
        tracing::debug!(
            target: "sortviz.trace",
            algorithm = algorithm.id(),
            input_len = input.len(),
            steps = trace.len(),
            "trace generated"
        );
    }

    trace
}
