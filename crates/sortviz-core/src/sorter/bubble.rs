//! [`BubbleSort`]: adjacent compare-and-swap passes.

use super::{Algorithm, StepSorter};
use crate::step::{Step, Trace};

/// Bubble sort without the early-exit optimization.
///
/// Trace shape: one step per comparison highlighting `(j, j + 1)` on the
/// pre-swap array, followed by one unannotated step showing the post-swap
/// array whenever the pair was exchanged. Each pass shrinks the unsorted
/// suffix by one. No step carries a range.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl StepSorter for BubbleSort {
    fn name(&self) -> &'static str {
        "Bubble Sort"
    }

    fn sort(&self, values: &mut [i32]) {
        let n = values.len();
        for pass in 0..n.saturating_sub(1) {
            for j in 0..n - 1 - pass {
                if values[j] > values[j + 1] {
                    values.swap(j, j + 1);
                }
            }
        }
    }

    fn steps(&self, input: &[i32]) -> Trace {
        let mut work = input.to_vec();
        let n = work.len();
        let mut steps = Vec::new();

        for pass in 0..n.saturating_sub(1) {
            for j in 0..n - 1 - pass {
                steps.push(Step::new(&work, Some(j), Some(j + 1), None));
                if work[j] > work[j + 1] {
                    work.swap(j, j + 1);
                    steps.push(Step::plain(&work));
                }
            }
        }

        Trace::new(Algorithm::Bubble, n, steps)
    }
}
