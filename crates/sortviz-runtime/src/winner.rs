#![forbid(unsafe_code)]

//! Race winner decision.
//!
//! Applied once both lanes have drained. The first rule that separates the
//! lanes decides:
//!
//! 1. Finish times differ by more than the tie threshold: earlier wins.
//! 2. Fewer trace steps wins.
//! 3. Fewer compares wins.
//! 4. Fewer approximate writes wins.
//! 5. Draw.
//!
//! A difference exactly equal to the threshold is a tie on time.

use std::cmp::Ordering;
use std::fmt;

use sortviz_core::Algorithm;
use web_time::Duration;

/// Final numbers for one drained lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneSummary {
    /// Algorithm that produced the lane's trace.
    pub algorithm: Algorithm,
    /// Trace length.
    pub steps: usize,
    /// Compare-annotated steps.
    pub compares: u64,
    /// Approximate writes (changed positions between frames).
    pub writes: u64,
    /// Start-to-finish wall time.
    pub elapsed: Duration,
}

/// Which lane won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Winner {
    Left,
    Right,
    Draw,
}

/// Ladder rung that decided the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DecisionReason {
    FinishTime,
    FewerSteps,
    FewerCompares,
    FewerWrites,
    Draw,
}

impl DecisionReason {
    /// Human-readable phrase.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::FinishTime => "finished first",
            Self::FewerSteps => "fewer steps",
            Self::FewerCompares => "fewer compares",
            Self::FewerWrites => "fewer approx. writes",
            Self::Draw => "identical on every measure",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Winner plus the rung that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    pub winner: Winner,
    pub reason: DecisionReason,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Winner::Left => write!(f, "left wins ({})", self.reason),
            Winner::Right => write!(f, "right wins ({})", self.reason),
            Winner::Draw => write!(f, "draw ({})", self.reason),
        }
    }
}

/// Run the decision ladder.
#[must_use]
pub fn decide(left: &LaneSummary, right: &LaneSummary, tie_threshold: Duration) -> Verdict {
    let gap = left.elapsed.abs_diff(right.elapsed);
    if gap > tie_threshold {
        return pick(left.elapsed.cmp(&right.elapsed), DecisionReason::FinishTime);
    }

    let ladder = [
        (left.steps.cmp(&right.steps), DecisionReason::FewerSteps),
        (left.compares.cmp(&right.compares), DecisionReason::FewerCompares),
        (left.writes.cmp(&right.writes), DecisionReason::FewerWrites),
    ];
    ladder
        .into_iter()
        .find(|(ord, _)| ord.is_ne())
        .map_or(
            Verdict {
                winner: Winner::Draw,
                reason: DecisionReason::Draw,
            },
            |(ord, reason)| pick(ord, reason),
        )
}

/// `Less` means the left lane has the smaller (better) value.
fn pick(ord: Ordering, reason: DecisionReason) -> Verdict {
    let winner = match ord {
        Ordering::Less => Winner::Left,
        Ordering::Greater => Winner::Right,
        Ordering::Equal => Winner::Draw,
    };
    Verdict { winner, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIE: Duration = Duration::from_millis(25);

    fn summary(steps: usize, compares: u64, writes: u64, elapsed_ms: u64) -> LaneSummary {
        LaneSummary {
            algorithm: Algorithm::Bubble,
            steps,
            compares,
            writes,
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[test]
    fn close_finish_falls_through_to_fewer_steps() {
        let a = summary(120, 60, 40, 1_000);
        let b = summary(140, 50, 30, 990);
        let verdict = decide(&a, &b, TIE);
        assert_eq!(verdict.winner, Winner::Left);
        assert_eq!(verdict.reason, DecisionReason::FewerSteps);
    }

    #[test]
    fn clear_finish_gap_wins_on_time() {
        let a = summary(500, 400, 300, 2_000);
        let b = summary(100, 50, 30, 3_000);
        let verdict = decide(&a, &b, TIE);
        assert_eq!(verdict.winner, Winner::Left);
        assert_eq!(verdict.reason, DecisionReason::FinishTime);
    }

    #[test]
    fn gap_equal_to_threshold_is_a_tie() {
        let a = summary(100, 10, 10, 1_000);
        let b = summary(90, 10, 10, 1_025);
        let verdict = decide(&a, &b, TIE);
        assert_eq!(verdict.winner, Winner::Right);
        assert_eq!(verdict.reason, DecisionReason::FewerSteps);

        let c = summary(90, 10, 10, 1_026);
        assert_eq!(decide(&a, &c, TIE).reason, DecisionReason::FinishTime);
    }

    #[test]
    fn compares_then_writes_break_ties() {
        let a = summary(100, 30, 10, 500);
        let b = summary(100, 20, 90, 500);
        assert_eq!(
            decide(&a, &b, TIE),
            Verdict {
                winner: Winner::Right,
                reason: DecisionReason::FewerCompares
            }
        );

        let c = summary(100, 30, 5, 510);
        assert_eq!(
            decide(&a, &c, TIE),
            Verdict {
                winner: Winner::Right,
                reason: DecisionReason::FewerWrites
            }
        );
    }

    #[test]
    fn identical_lanes_draw() {
        let a = summary(10, 5, 4, 100);
        let verdict = decide(&a, &a, TIE);
        assert_eq!(verdict.winner, Winner::Draw);
        assert_eq!(verdict.reason, DecisionReason::Draw);
        assert_eq!(verdict.to_string(), "draw (identical on every measure)");
    }

    #[test]
    fn decision_is_symmetric() {
        let a = summary(120, 60, 40, 1_000);
        let b = summary(140, 50, 30, 990);
        assert_eq!(decide(&b, &a, TIE).winner, Winner::Right);
    }
}
