//! [`SelectionSort`]: move the minimum of the unsorted window to its front.

use super::{Algorithm, StepSorter};
use crate::step::{Step, StepRange, Trace};

/// Selection sort.
///
/// Trace shape, for each position `i` in `0..n-1`:
///
/// - one step per comparison highlighting `(j, min_index)`, where
///   `min_index` is the running minimum before that comparison;
/// - one step before and one after exchanging `min_index` into `i`, both
///   highlighting `(i, min_index)`.
///
/// Every one of those steps carries the unsorted window `[i, n-1]` as its
/// range. A final step with no annotations marks completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSort;

impl StepSorter for SelectionSort {
    fn name(&self) -> &'static str {
        "Selection Sort"
    }

    fn sort(&self, values: &mut [i32]) {
        let n = values.len();
        for i in 0..n.saturating_sub(1) {
            let mut min_index = i;
            for j in i + 1..n {
                if values[j] < values[min_index] {
                    min_index = j;
                }
            }
            values.swap(i, min_index);
        }
    }

    fn steps(&self, input: &[i32]) -> Trace {
        let n = input.len();
        if n <= 1 {
            return Trace::empty(Algorithm::Selection, n);
        }

        let mut work = input.to_vec();
        let mut steps = Vec::new();

        for i in 0..n - 1 {
            let window = StepRange::new(i, n - 1);
            let mut min_index = i;

            for j in i + 1..n {
                steps.push(Step::new(&work, Some(j), Some(min_index), window));
                if work[j] < work[min_index] {
                    min_index = j;
                }
            }

            steps.push(Step::new(&work, Some(i), Some(min_index), window));
            work.swap(i, min_index);
            steps.push(Step::new(&work, Some(i), Some(min_index), window));
        }

        steps.push(Step::plain(&work));
        Trace::new(Algorithm::Selection, n, steps)
    }
}
