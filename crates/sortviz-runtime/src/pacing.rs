#![forbid(unsafe_code)]

//! Ease-in pacing: how many steps each tick consumes.
//!
//! A run aims for a wall-clock duration that depends on input size, not on
//! trace length, so a 2 000-step bubble sort and a 300-step merge sort of the
//! same input take about the same time to watch:
//!
//! ```text
//! target_ms   = clamp(base_ms_at_n50 * sqrt(50 / max(1, n)), min_ms, max_ms)
//! total_ticks = max(1, target_ms / frame_delay_ms)
//! base        = max(1, total_steps) / total_ticks
//! rate(t)     = lerp(rate_start, rate_end, min(1, t / total_ticks))
//! ```
//!
//! Each tick adds `base * rate(t)` to an accumulator and spends its whole
//! part, up to `max_steps_per_tick`. The rate starts below 1 and ends above
//! it, so playback starts slow and finishes fast.
//!
//! Speed is a separate axis: [`tick_interval`] changes how often ticks fire,
//! never how many steps a tick consumes.
//!
//! Every constant read here is clamped, so any [`PacingConfig`] yields
//! well-defined pacing.

use web_time::Duration;

use crate::config::{PacingConfig, PlaybackConfig};

/// Input length at which a run lasts exactly `base_ms_at_n50`.
const REFERENCE_LEN: f64 = 50.0;

/// Slowest and fastest accepted speed percentages.
pub const SPEED_RANGE: (u32, u32) = (1, 2_000);

/// Clamp a requested speed percentage into [`SPEED_RANGE`].
#[must_use]
pub const fn clamp_speed(percent: u32) -> u32 {
    if percent < SPEED_RANGE.0 {
        SPEED_RANGE.0
    } else if percent > SPEED_RANGE.1 {
        SPEED_RANGE.1
    } else {
        percent
    }
}

/// Tick interval for a speed percentage.
///
/// `round(frame_delay_ms * 100 / speed)`, clamped to
/// `[min_delay_ms, max_delay_ms]`. A speed of 0 is treated as 1.
#[must_use]
pub fn tick_interval(speed_percent: u32, config: &PlaybackConfig) -> Duration {
    let speed = f64::from(speed_percent.max(1));
    let frame = config.pacing.frame_delay_ms.max(1) as f64;
    let lo = config.speed.min_delay_ms.max(1);
    let hi = config.speed.max_delay_ms.max(lo);
    let raw = (frame * 100.0 / speed).round();
    let ms = if raw >= hi as f64 { hi } else { (raw as u64).max(lo) };
    Duration::from_millis(ms)
}

/// Per-run pacing state.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacer {
    target: Duration,
    total_ticks: u64,
    base: f64,
    rate_start: f64,
    rate_end: f64,
    cap: usize,
    accumulator: f64,
    tick: u64,
}

impl Pacer {
    /// Pacing for a run over an input of `input_len` values whose longest
    /// trace has `total_steps` steps.
    #[must_use]
    pub fn new(input_len: usize, total_steps: usize, config: &PacingConfig) -> Self {
        let target = Self::target_duration(input_len, config);
        let frame = config.frame_delay_ms.max(1);
        let total_ticks = (duration_ms(target) / frame).max(1);
        let base = total_steps.max(1) as f64 / total_ticks as f64;
        let defaults = PacingConfig::default();
        Self {
            target,
            total_ticks,
            base,
            rate_start: positive_or(config.rate_start, defaults.rate_start),
            rate_end: positive_or(config.rate_end, defaults.rate_end),
            cap: config.max_steps_per_tick.max(1),
            accumulator: 0.0,
            tick: 0,
        }
    }

    /// Target wall-clock duration for an input of `input_len` values.
    #[must_use]
    pub fn target_duration(input_len: usize, config: &PacingConfig) -> Duration {
        let lo = config.min_duration_ms.min(config.max_duration_ms);
        let hi = config.max_duration_ms.max(config.min_duration_ms);
        let n = input_len.max(1) as f64;
        let raw = config.base_ms_at_n50 as f64 * (REFERENCE_LEN / n).sqrt();
        let ms = raw.clamp(lo as f64, hi as f64).round() as u64;
        Duration::from_millis(ms)
    }

    /// Target duration of this run.
    #[must_use]
    pub const fn target(&self) -> Duration {
        self.target
    }

    /// Ticks the run should take at 100 % speed.
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Mean steps per tick before the ease-in rate is applied.
    #[must_use]
    pub const fn steps_per_tick_base(&self) -> f64 {
        self.base
    }

    /// Upper bound on [`next_budget`](Self::next_budget).
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Ticks consumed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    /// Fractional step credit carried into the next tick.
    #[must_use]
    pub const fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Rate multiplier on tick `tick` (0-indexed).
    #[must_use]
    pub fn rate_at(&self, tick: u64) -> f64 {
        let progress = (tick as f64 / self.total_ticks as f64).min(1.0);
        self.rate_start + (self.rate_end - self.rate_start) * progress
    }

    /// Advance one tick and return how many synchronized rounds it may run.
    ///
    /// The budget never exceeds [`cap`](Self::cap); credit beyond the cap is
    /// carried over but itself clamped to the cap so a stalled run cannot
    /// build an unbounded backlog.
    pub fn next_budget(&mut self) -> usize {
        self.accumulator += self.base * self.rate_at(self.tick);
        self.tick = self.tick.saturating_add(1);

        let whole = self.accumulator.floor();
        let budget = if whole >= self.cap as f64 {
            self.cap
        } else {
            whole as usize
        };
        self.accumulator = (self.accumulator - budget as f64).min(self.cap as f64);
        budget
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacing() -> PacingConfig {
        PacingConfig::default()
    }

    #[test]
    fn fifty_elements_take_five_hundred_ticks() {
        let pacer = Pacer::new(50, 1_225, &pacing());
        assert_eq!(pacer.target(), Duration::from_secs(10));
        assert_eq!(pacer.total_ticks(), 500);
        assert!((pacer.steps_per_tick_base() - 2.45).abs() < 1e-12);
    }

    #[test]
    fn target_duration_is_clamped() {
        // Tiny inputs hit the ceiling, huge ones the floor.
        assert_eq!(
            Pacer::target_duration(1, &pacing()),
            Duration::from_millis(15_000)
        );
        assert_eq!(
            Pacer::target_duration(0, &pacing()),
            Duration::from_millis(15_000)
        );
        assert_eq!(
            Pacer::target_duration(100_000, &pacing()),
            Duration::from_millis(2_000)
        );
        // 10000 * sqrt(50/200) = 5000
        assert_eq!(
            Pacer::target_duration(200, &pacing()),
            Duration::from_millis(5_000)
        );
    }

    #[test]
    fn inverted_clamp_bounds_do_not_panic() {
        let config = PacingConfig {
            min_duration_ms: 9_000,
            max_duration_ms: 3_000,
            ..PacingConfig::default()
        };
        let target = Pacer::target_duration(50, &config);
        assert_eq!(target, Duration::from_millis(9_000));
    }

    #[test]
    fn rate_eases_in_then_holds() {
        let pacer = Pacer::new(50, 1_000, &pacing());
        assert!((pacer.rate_at(0) - 0.6).abs() < 1e-12);
        assert!((pacer.rate_at(250) - 1.0).abs() < 1e-12);
        assert!((pacer.rate_at(500) - 1.4).abs() < 1e-12);
        assert!((pacer.rate_at(10_000) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn budgets_start_small_and_grow() {
        let mut pacer = Pacer::new(50, 5_000, &pacing());
        let early: usize = (0..50).map(|_| pacer.next_budget()).sum();
        for _ in 50..450 {
            pacer.next_budget();
        }
        let late: usize = (0..50).map(|_| pacer.next_budget()).sum();
        assert!(late > early, "late={late} early={early}");
    }

    #[test]
    fn short_trace_still_advances() {
        // base = 1 / 500; the first step lands once enough credit accrues.
        let mut pacer = Pacer::new(50, 0, &pacing());
        let first = (1..=2_000u64).find(|_| pacer.next_budget() > 0);
        assert!(first.is_some());
    }

    #[test]
    fn budget_respects_cap_and_backlog_is_bounded() {
        let config = PacingConfig {
            max_steps_per_tick: 7,
            ..PacingConfig::default()
        };
        let mut pacer = Pacer::new(2, 1_000_000, &config);
        for _ in 0..100 {
            assert!(pacer.next_budget() <= 7);
            assert!(pacer.accumulator() <= 7.0);
        }
    }

    #[test]
    fn zero_frame_delay_and_bad_rates_fall_back() {
        let config = PacingConfig {
            frame_delay_ms: 0,
            rate_start: f64::NAN,
            rate_end: 0.0,
            max_steps_per_tick: 0,
            ..PacingConfig::default()
        };
        let pacer = Pacer::new(50, 100, &config);
        assert_eq!(pacer.total_ticks(), 10_000);
        assert_eq!(pacer.cap(), 1);
        assert!((pacer.rate_at(0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn interval_scales_with_speed() {
        let config = PlaybackConfig::default();
        assert_eq!(tick_interval(100, &config), Duration::from_millis(20));
        assert_eq!(tick_interval(200, &config), Duration::from_millis(10));
        assert_eq!(tick_interval(50, &config), Duration::from_millis(40));
        assert_eq!(tick_interval(30, &config), Duration::from_millis(67));
    }

    #[test]
    fn interval_is_clamped() {
        let config = PlaybackConfig::default();
        assert_eq!(tick_interval(0, &config), Duration::from_millis(200));
        assert_eq!(tick_interval(1, &config), Duration::from_millis(200));
        assert_eq!(tick_interval(5_000, &config), Duration::from_millis(1));
    }

    #[test]
    fn speed_clamp() {
        assert_eq!(clamp_speed(0), 1);
        assert_eq!(clamp_speed(150), 150);
        assert_eq!(clamp_speed(u32::MAX), 2_000);
    }
}
