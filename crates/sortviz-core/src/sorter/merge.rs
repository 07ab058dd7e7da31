//! [`MergeSort`]: top-down merge sort over a whole-array scratch buffer.

use super::{Algorithm, StepSorter};
use crate::step::{Step, StepRange, Trace};

/// Top-down merge sort, splitting at `(left + right) / 2`.
///
/// Trace shape: while merging `[left, right]`, every element written into the
/// scratch buffer at position `k` produces one step whose data is the live
/// working array with `left..=k` replaced by the merged prefix, so the frame
/// shows a merge in progress. While both runs still have elements the step
/// highlights both candidates; once one run is exhausted only the remaining
/// side is highlighted. Every step of a merge call carries that call's
/// `[left, right]` as its range.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSort;

impl StepSorter for MergeSort {
    fn name(&self) -> &'static str {
        "Merge Sort"
    }

    fn sort(&self, values: &mut [i32]) {
        if values.len() <= 1 {
            return;
        }
        let mut scratch = vec![0; values.len()];
        sort_range(values, &mut scratch, 0, values.len() - 1, &mut Silent);
    }

    fn steps(&self, input: &[i32]) -> Trace {
        let n = input.len();
        if n <= 1 {
            return Trace::empty(Algorithm::Merge, n);
        }
        let mut work = input.to_vec();
        let mut scratch = vec![0; n];
        let mut recorder = Recorder { steps: Vec::new() };
        sort_range(&mut work, &mut scratch, 0, n - 1, &mut recorder);
        Trace::new(Algorithm::Merge, n, recorder.steps)
    }
}

/// Observer of scratch-buffer writes during a merge.
trait MergeObserver {
    fn on_write(
        &mut self,
        work: &[i32],
        scratch: &[i32],
        range: StepRange,
        write_index: usize,
        compare: (Option<usize>, Option<usize>),
    );
}

struct Silent;

impl MergeObserver for Silent {
    #[inline]
    fn on_write(
        &mut self,
        _work: &[i32],
        _scratch: &[i32],
        _range: StepRange,
        _write_index: usize,
        _compare: (Option<usize>, Option<usize>),
    ) {
    }
}

struct Recorder {
    steps: Vec<Step>,
}

impl MergeObserver for Recorder {
    fn on_write(
        &mut self,
        work: &[i32],
        scratch: &[i32],
        range: StepRange,
        write_index: usize,
        (compare_a, compare_b): (Option<usize>, Option<usize>),
    ) {
        let mut frame = work.to_vec();
        let merged = range.left()..=write_index;
        frame[merged.clone()].copy_from_slice(&scratch[merged]);
        self.steps
            .push(Step::new(&frame, compare_a, compare_b, Some(range)));
    }
}

fn sort_range<O: MergeObserver>(
    work: &mut [i32],
    scratch: &mut [i32],
    left: usize,
    right: usize,
    observer: &mut O,
) {
    if left >= right {
        return;
    }
    let mid = left + (right - left) / 2;
    sort_range(work, scratch, left, mid, observer);
    sort_range(work, scratch, mid + 1, right, observer);
    merge(work, scratch, left, mid, right, observer);
}

fn merge<O: MergeObserver>(
    work: &mut [i32],
    scratch: &mut [i32],
    left: usize,
    mid: usize,
    right: usize,
    observer: &mut O,
) {
    let Some(range) = StepRange::new(left, right) else {
        return;
    };
    let (mut i, mut j, mut k) = (left, mid + 1, left);

    while i <= mid && j <= right {
        let compare = (Some(i), Some(j));
        if work[i] <= work[j] {
            scratch[k] = work[i];
            i += 1;
        } else {
            scratch[k] = work[j];
            j += 1;
        }
        observer.on_write(work, scratch, range, k, compare);
        k += 1;
    }
    while i <= mid {
        scratch[k] = work[i];
        observer.on_write(work, scratch, range, k, (Some(i), None));
        i += 1;
        k += 1;
    }
    while j <= right {
        scratch[k] = work[j];
        observer.on_write(work, scratch, range, k, (None, Some(j)));
        j += 1;
        k += 1;
    }

    work[left..=right].copy_from_slice(&scratch[left..=right]);
}
