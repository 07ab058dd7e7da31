#![forbid(unsafe_code)]

//! Trace model: frozen visualization frames and the traces that hold them.
//!
//! A [`Step`] is one frame of a sort replay: a snapshot of the array plus
//! optional highlight annotations. A [`Trace`] is the complete, ordered,
//! finite sequence of steps produced by one instrumented sort.
//!
//! # Invariants
//!
//! 1. `Step::data` is a deep copy taken at construction and is never mutated
//!    afterwards. Sharing it by reference (the `Arc`) is always safe.
//! 2. Every step in a trace has `data.len() == trace.width()`.
//! 3. A range, when present, satisfies `left <= right < width`.
//! 4. Traces for inputs of length 0 or 1 are empty.
//!
//! # Sentinel form
//!
//! Unset annotations are `None`. Collaborators that prefer the flat sentinel
//! encoding (`-1` for "not applicable") can read it through
//! [`Step::compare_a_raw`], [`Step::compare_b_raw`] and [`Step::range_raw`].

use std::sync::Arc;

use crate::sorter::Algorithm;

/// Sentinel used by the flat encoding for an unset index.
pub const UNSET: isize = -1;

/// Inclusive bounds of the sub-array a step is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawStepRange"))]
pub struct StepRange {
    left: usize,
    right: usize,
}

/// Returned when a range's bounds are inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("range left bound {left} exceeds right bound {right}")]
pub struct InvertedStepRange {
    pub left: usize,
    pub right: usize,
}

/// Unchecked wire form; deserialization goes through [`StepRange::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawStepRange {
    left: usize,
    right: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawStepRange> for StepRange {
    type Error = InvertedStepRange;

    fn try_from(raw: RawStepRange) -> Result<Self, Self::Error> {
        Self::new(raw.left, raw.right).ok_or(InvertedStepRange {
            left: raw.left,
            right: raw.right,
        })
    }
}

impl StepRange {
    /// Create a range, returning `None` when `left > right`.
    #[must_use]
    pub const fn new(left: usize, right: usize) -> Option<Self> {
        if left <= right {
            Some(Self { left, right })
        } else {
            None
        }
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn left(&self) -> usize {
        self.left
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn right(&self) -> usize {
        self.right
    }

    /// Number of positions covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.right - self.left + 1
    }

    /// Always false; a range covers at least one position.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies inside the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }
}

/// One visualization frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    data: Arc<[i32]>,
    compare_a: Option<usize>,
    compare_b: Option<usize>,
    range: Option<StepRange>,
}

impl Step {
    /// Snapshot `data` with the given annotations.
    ///
    /// The slice is copied; the step never aliases the caller's buffer.
    #[must_use]
    pub fn new(
        data: &[i32],
        compare_a: Option<usize>,
        compare_b: Option<usize>,
        range: Option<StepRange>,
    ) -> Self {
        debug_assert!(compare_a.is_none_or(|i| i < data.len()));
        debug_assert!(compare_b.is_none_or(|i| i < data.len()));
        debug_assert!(range.is_none_or(|r| r.right() < data.len()));
        Self {
            data: Arc::from(data),
            compare_a,
            compare_b,
            range,
        }
    }

    /// Snapshot with no annotations at all.
    #[must_use]
    pub fn plain(data: &[i32]) -> Self {
        Self::new(data, None, None, None)
    }

    /// The frozen array contents.
    #[must_use]
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Shared handle to the frozen array contents.
    #[must_use]
    pub fn shared_data(&self) -> Arc<[i32]> {
        Arc::clone(&self.data)
    }

    /// First highlighted index.
    #[must_use]
    pub const fn compare_a(&self) -> Option<usize> {
        self.compare_a
    }

    /// Second highlighted index.
    #[must_use]
    pub const fn compare_b(&self) -> Option<usize> {
        self.compare_b
    }

    /// Active sub-array.
    #[must_use]
    pub const fn range(&self) -> Option<StepRange> {
        self.range
    }

    /// Whether either compare annotation is set.
    #[must_use]
    pub const fn is_compare(&self) -> bool {
        self.compare_a.is_some() || self.compare_b.is_some()
    }

    /// `compare_a` in sentinel form.
    #[must_use]
    pub fn compare_a_raw(&self) -> isize {
        raw_index(self.compare_a)
    }

    /// `compare_b` in sentinel form.
    #[must_use]
    pub fn compare_b_raw(&self) -> isize {
        raw_index(self.compare_b)
    }

    /// `(rangeL, rangeR)` in sentinel form.
    #[must_use]
    pub fn range_raw(&self) -> (isize, isize) {
        match self.range {
            Some(r) => (raw_index(Some(r.left)), raw_index(Some(r.right))),
            None => (UNSET, UNSET),
        }
    }

    /// Count positions whose value differs from `previous`.
    ///
    /// This is the apparent-change measure behind approximate write counts,
    /// not a count of actual memory writes.
    #[must_use]
    pub fn changed_positions(&self, previous: &Self) -> usize {
        self.data
            .iter()
            .zip(previous.data.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

fn raw_index(index: Option<usize>) -> isize {
    index.and_then(|i| isize::try_from(i).ok()).unwrap_or(UNSET)
}

/// The complete, ordered sequence of steps from one instrumented sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    algorithm: Algorithm,
    width: usize,
    steps: Vec<Step>,
}

impl Trace {
    /// Wrap a finished step list.
    #[must_use]
    pub fn new(algorithm: Algorithm, width: usize, steps: Vec<Step>) -> Self {
        debug_assert!(steps.iter().all(|s| s.data().len() == width));
        Self {
            algorithm,
            width,
            steps,
        }
    }

    /// An empty trace for an input of `width` elements.
    #[must_use]
    pub fn empty(algorithm: Algorithm, width: usize) -> Self {
        Self::new(algorithm, width, Vec::new())
    }

    /// Algorithm that produced this trace.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Length of the sorted input (and of every step's data).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when there is nothing to replay.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Iterate steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Last step, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Array contents of the last step.
    #[must_use]
    pub fn final_state(&self) -> Option<&[i32]> {
        self.steps.last().map(Step::data)
    }

    /// Borrow all steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
