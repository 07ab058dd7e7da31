//! Lifecycle tests for single and race playback driven by a synthetic clock.
//!
//! Run:
//!   cargo test -p sortviz-runtime --test integration_race_lifecycle

use std::cell::RefCell;

use sortviz_core::{Algorithm, Pattern, StepSorter, Trace, generate};
use sortviz_runtime::{
    DecisionReason, LaneId, LaneState, LaneSummary, PlaybackConfig, PlaybackSource, RunOutcome,
    RunState, Winner, decide, start_playback_at,
};
use web_time::{Duration, Instant};

/// Steps the clock by one default frame per tick.
struct Clock {
    start: Instant,
    now: Instant,
}

impl Clock {
    fn new() -> Self {
        let start = Instant::now();
        Self { start, now: start }
    }

    fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    fn elapsed(&self) -> Duration {
        self.now - self.start
    }
}

fn trace(algorithm: Algorithm, input: &[i32]) -> Trace {
    algorithm.steps(input)
}

// ============================================================================
// Single lane
// ============================================================================

#[test]
fn single_run_walks_idle_running_drained() {
    let mut clock = Clock::new();
    let input = generate(Pattern::Descending, 12, 0);
    let mut run = RunState::single(
        trace(Algorithm::Selection, &input),
        &PlaybackConfig::default(),
        clock.now,
    );
    let lane = run.lane(LaneId::Left).unwrap();
    assert_eq!(lane.state(), LaneState::Running);
    assert!(run.lane(LaneId::Right).is_none());

    let mut last_progress = 0.0;
    while !run.is_complete() {
        run.tick(clock.advance(Duration::from_millis(20)));
        let progress = run.progress();
        assert!(progress >= last_progress);
        last_progress = progress;
    }
    let lane = run.lane(LaneId::Left).unwrap();
    assert_eq!(lane.state(), LaneState::Drained);
    assert_eq!(lane.finished_at().unwrap(), clock.now);
}

#[test]
fn default_pacing_lands_near_target_duration() {
    // n = 50: 10 s at 20 ms per tick, so about 500 ticks whatever the trace length.
    let input = generate(Pattern::Random, 50, 11);
    for algorithm in Algorithm::ALL {
        let mut clock = Clock::new();
        let mut run = RunState::single(
            trace(algorithm, &input),
            &PlaybackConfig::default(),
            clock.now,
        );
        assert_eq!(run.pacer().total_ticks(), 500);
        while !run.is_complete() {
            run.tick(clock.advance(Duration::from_millis(20)));
        }
        let ticks = run.ticks();
        assert!(
            (350..=650).contains(&ticks),
            "{algorithm}: {ticks} ticks over {:?}",
            clock.elapsed()
        );
    }
}

// ============================================================================
// Race
// ============================================================================

#[test]
fn race_reports_both_lanes_and_a_verdict() {
    let mut clock = Clock::new();
    let input = generate(Pattern::Descending, 40, 0);
    let bubble = trace(Algorithm::Bubble, &input);
    let merge = trace(Algorithm::Merge, &input);
    let (bubble_len, merge_len) = (bubble.len(), merge.len());

    let outcome = RefCell::new(None::<RunOutcome>);
    let frames = RefCell::new([0usize; 2]);
    let mut handle = start_playback_at(
        PlaybackSource::Race(bubble, merge),
        100,
        &PlaybackConfig::default(),
        |lane, _| {
            let slot = match lane {
                LaneId::Left => 0,
                LaneId::Right => 1,
            };
            frames.borrow_mut()[slot] += 1;
        },
        |o| *outcome.borrow_mut() = Some(o.clone()),
        clock.now,
    );
    while handle.tick(clock.now) {
        clock.advance(handle.interval());
    }
    drop(handle);

    let outcome = outcome.into_inner().expect("race completed");
    let right = outcome.right.expect("race has a right lane");
    assert_eq!(outcome.left.steps, bubble_len);
    assert_eq!(right.steps, merge_len);
    assert!(right.elapsed < outcome.left.elapsed);

    let verdict = outcome.verdict.expect("race has a verdict");
    assert_eq!(verdict.winner, Winner::Right);
    assert_eq!(verdict.reason, DecisionReason::FinishTime);

    let frames = frames.into_inner();
    assert!(frames[0] > 0 && frames[1] > 0);
    // The right lane stops producing frames once it drains.
    assert!(frames[1] <= frames[0]);
}

#[test]
fn same_algorithm_twice_is_a_draw() {
    let mut clock = Clock::new();
    let input = generate(Pattern::AlmostSorted, 30, 5);
    let mut run = RunState::race(
        trace(Algorithm::Merge, &input),
        trace(Algorithm::Merge, &input),
        &PlaybackConfig::default(),
        clock.now,
    );
    while !run.is_complete() {
        run.tick(clock.advance(Duration::from_millis(20)));
    }
    let verdict = run.outcome().unwrap().verdict.unwrap();
    assert_eq!(verdict.winner, Winner::Draw);
    assert_eq!(verdict.reason, DecisionReason::Draw);
}

#[test]
fn close_finish_is_decided_by_fewer_steps() {
    let summary = |steps, elapsed_ms| LaneSummary {
        algorithm: Algorithm::Bubble,
        steps,
        compares: 0,
        writes: 0,
        elapsed: Duration::from_millis(elapsed_ms),
    };
    let a = summary(120, 5_010);
    let b = summary(140, 5_000);
    let verdict = decide(&a, &b, PlaybackConfig::default().race.tie_threshold());
    assert_eq!(verdict.winner, Winner::Left);
    assert_eq!(verdict.reason, DecisionReason::FewerSteps);
}

#[test]
fn one_empty_lane_finishes_at_start() {
    let mut clock = Clock::new();
    let start = clock.now;
    let mut run = RunState::race(
        trace(Algorithm::Bubble, &[1]),
        trace(Algorithm::Bubble, &[3, 1, 2]),
        &PlaybackConfig::default(),
        start,
    );
    assert!(!run.is_complete());
    assert!(run.lane(LaneId::Left).unwrap().is_drained());
    assert_eq!(run.lane(LaneId::Left).unwrap().finished_at(), Some(start));
    while !run.is_complete() {
        run.tick(clock.advance(Duration::from_millis(20)));
    }
    let verdict = run.outcome().unwrap().verdict.unwrap();
    assert_eq!(verdict.winner, Winner::Left);
    assert_eq!(verdict.reason, DecisionReason::FinishTime);
}

// ============================================================================
// Speed and stop
// ============================================================================

#[test]
fn speed_changes_interval_not_step_budget() {
    let input = generate(Pattern::Random, 50, 3);
    let run_with_speed = |speed: u32| {
        let mut clock = Clock::new();
        let mut ticks = 0u64;
        let mut handle = start_playback_at(
            PlaybackSource::Single(trace(Algorithm::Bubble, &input)),
            speed,
            &PlaybackConfig::default(),
            |_, _| {},
            |_| {},
            clock.now,
        );
        while handle.tick(clock.now) {
            ticks += 1;
            clock.advance(handle.interval());
        }
        (ticks, clock.elapsed())
    };
    let (normal_ticks, normal_time) = run_with_speed(100);
    let (fast_ticks, fast_time) = run_with_speed(200);
    assert_eq!(normal_ticks, fast_ticks);
    assert!(fast_time * 2 <= normal_time + Duration::from_millis(20));
}

#[test]
fn stop_mid_race_clears_state() {
    let mut clock = Clock::new();
    let input = generate(Pattern::Random, 20, 9);
    let completed = RefCell::new(false);
    let mut handle = start_playback_at(
        PlaybackSource::Race(
            trace(Algorithm::Bubble, &input),
            trace(Algorithm::Selection, &input),
        ),
        100,
        &PlaybackConfig::default(),
        |_, _| {},
        |_| *completed.borrow_mut() = true,
        clock.now,
    );
    for _ in 0..10 {
        handle.tick(clock.advance(Duration::from_millis(20)));
    }
    handle.stop();
    assert!(handle.is_stopped());
    assert!(handle.run().is_none());
    assert!(handle.outcome().is_none());
    assert!(!handle.tick(clock.advance(Duration::from_millis(20))));
    drop(handle);
    assert!(!completed.into_inner());
}
