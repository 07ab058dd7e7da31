#![forbid(unsafe_code)]

//! Core: instrumented sorters, replayable traces, and trace metrics.
//!
//! # Role in sortviz
//! `sortviz-core` is the data layer. It turns an input array into a complete,
//! deterministic [`Trace`] of [`Step`] frames that a player can replay at any
//! pace, and derives [`TraceMetrics`] from those frames.
//!
//! # Primary responsibilities
//! - **Trace model**: frozen [`Step`] snapshots and the [`Trace`] that owns them.
//! - **Sorters**: [`BubbleSort`], [`SelectionSort`], [`MergeSort`] behind the
//!   [`StepSorter`] capability, selectable through [`Algorithm`].
//! - **Metrics**: comparison and approximate write counts via [`MetricsCollector`].
//! - **Input**: seeded data [`Pattern`]s and manual input parsing.
//!
//! # How it fits in the system
//! The runtime (`sortviz-runtime`) consumes traces tick by tick and never
//! looks at which algorithm produced them. Nothing in this crate touches
//! clocks or I/O, so every trace is a pure function of its input.
//!
//! ```
//! use sortviz_core::{Algorithm, generate_trace};
//!
//! let trace = generate_trace(Algorithm::Bubble, &[5, 1, 4, 2, 3]);
//! assert_eq!(trace.final_state(), Some(&[1, 2, 3, 4, 5][..]));
//! ```

pub mod input;
pub mod metrics;
pub mod sorter;
pub mod step;

pub use input::{InputError, Pattern, generate, parse_size, parse_values, random_in_range};
pub use metrics::{MetricsCollector, TraceMetrics, WRITES_LABEL};
pub use sorter::{
    Algorithm, BubbleSort, MergeSort, ParseAlgorithmError, SelectionSort, StepSorter,
    generate_trace,
};
pub use step::{InvertedStepRange, Step, StepRange, Trace, UNSET};
