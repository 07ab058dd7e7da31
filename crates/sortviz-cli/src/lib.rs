#![forbid(unsafe_code)]

//! Headless driver for sortviz: verify the sorters, inspect traces, and play
//! or race them in real time with text output.

pub mod cli;
pub mod error;
pub mod input;
pub mod inspect;
pub mod logging;
pub mod play;
pub mod signals;
pub mod verify;

pub use cli::{Cli, run, run_from_env};
pub use error::{CliError, Result};
