#![forbid(unsafe_code)]

//! sortviz runtime
//!
//! Plays [`sortviz_core::Trace`]s back over time.
//!
//! # Key Components
//!
//! - [`PlaybackConfig`] - Pacing, speed, and race constants as data
//! - [`Pacer`] - Ease-in step budget per tick
//! - [`Lane`] - One trace's position, live metrics, and finish time
//! - [`RunState`] - Explicit single or race run value advanced by `tick`
//! - [`decide`] - Race winner ladder
//! - [`PlaybackHandle`] - Callback binding with speed control and stop
//!
//! # How it fits in the system
//! `sortviz-core` materializes a whole trace before playback starts. This
//! crate never calls a sorter and never branches on which algorithm made a
//! trace; it only consumes steps. The caller owns the clock: every tick takes
//! the current [`web_time::Instant`], so tests drive time deterministically
//! and a GUI can bind ticks to its own timer.

pub mod cancellation;
pub mod config;
pub mod lane;
pub mod pacing;
pub mod playback;
pub mod scheduler;
pub mod winner;

pub use cancellation::{CancellationSource, CancellationToken, StopReason};
pub use config::{ConfigError, PacingConfig, PlaybackConfig, RaceConfig, SpeedConfig};
pub use lane::{Lane, LaneId, LaneState};
pub use pacing::{Pacer, SPEED_RANGE, clamp_speed, tick_interval};
pub use playback::{
    PlaybackHandle, PlaybackSource, RunExit, run_blocking, start_playback, start_playback_at,
};
pub use scheduler::{Frame, RunOutcome, RunState, TickReport};
pub use winner::{DecisionReason, LaneSummary, Verdict, Winner, decide};
