//! `sortviz play` and `sortviz race`: headless real-time playback.
//!
//! Frames are optional text output; the summary at the end is the point.
//! SIGINT/SIGTERM cancel the run through its cancellation token, and so does
//! a failed frame write (a closed pipe), which surfaces as an I/O error.

use std::cell::RefCell;
use std::io::{self, Write};

use clap::Args;
use serde::Serialize;
use sortviz_core::{Algorithm, Step, StepSorter, WRITES_LABEL, generate_trace};
use sortviz_runtime::{
    CancellationSource, LaneId, LaneSummary, PlaybackConfig, PlaybackSource, RunExit, RunOutcome,
    StopReason, Verdict, Winner, clamp_speed, run_blocking, start_playback,
};
use web_time::Duration;

use crate::error::{CliError, Result};
use crate::input::{InputArgs, InputOrigin, ResolvedInput};
use crate::signals::SignalGuard;

#[derive(Debug, Clone, Args)]
pub struct PlayArgs {
    /// Algorithm to play: bubble, selection, merge.
    #[arg(long, short)]
    pub algorithm: Algorithm,

    #[command(flatten)]
    pub input: InputArgs,

    /// Speed percentage (default from config, 100 unless overridden).
    #[arg(long)]
    pub speed: Option<u32>,

    /// Print every rendered frame.
    #[arg(long)]
    pub frames: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RaceArgs {
    /// Left lane algorithm.
    #[arg(long)]
    pub left: Algorithm,

    /// Right lane algorithm.
    #[arg(long)]
    pub right: Algorithm,

    #[command(flatten)]
    pub input: InputArgs,

    /// Speed percentage (default from config, 100 unless overridden).
    #[arg(long)]
    pub speed: Option<u32>,

    /// Print every rendered frame.
    #[arg(long)]
    pub frames: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaybackReport {
    pub origin: InputOrigin,
    pub input_len: usize,
    pub speed: u32,
    /// Paced run length at 100% speed.
    pub target_ms: u64,
    pub writes_note: &'static str,
    pub outcome: RunOutcome,
}

fn resolve_speed(requested: Option<u32>, config: &PlaybackConfig) -> Result<u32> {
    match requested {
        Some(0) => Err(CliError::invalid("speed must be positive")),
        Some(speed) => Ok(clamp_speed(speed)),
        None => Ok(clamp_speed(config.speed.default_percent)),
    }
}

/// Render one frame as a text line.
#[must_use]
pub fn format_frame(lane: LaneId, step: &Step, race: bool) -> String {
    let mut line = if race {
        format!("{lane:<5} {:?}", step.data())
    } else {
        format!("{:?}", step.data())
    };
    if let (Some(a), Some(b)) = (step.compare_a(), step.compare_b()) {
        line.push_str(&format!(" <{a},{b}>"));
    } else if let Some(i) = step.compare_a().or(step.compare_b()) {
        line.push_str(&format!(" <{i}>"));
    }
    line
}

/// Human-readable lane summary line.
#[must_use]
pub fn format_summary(label: &str, summary: &LaneSummary) -> String {
    format!(
        "{label:<6} {:<15} steps={:<6} compares={:<6} writes={:<6} time={} ms",
        summary.algorithm.name(),
        summary.steps,
        summary.compares,
        summary.writes,
        summary.elapsed.as_millis()
    )
}

struct Played {
    outcome: RunOutcome,
    target: Duration,
}

fn play_source<W: Write>(
    source: PlaybackSource,
    speed: u32,
    config: &PlaybackConfig,
    print_frames: bool,
    out: &mut W,
) -> Result<Played> {
    let race = matches!(source, PlaybackSource::Race(..));
    let outcome = RefCell::new(None);
    let sink_error: RefCell<Option<io::Error>> = RefCell::new(None);
    let cancel = CancellationSource::new();
    let sink = cancel.clone();

    let mut handle = start_playback(
        source,
        speed,
        config,
        |lane, step| {
            if !print_frames || sink_error.borrow().is_some() {
                return;
            }
            if let Err(error) = writeln!(out, "{}", format_frame(lane, step, race)) {
                *sink_error.borrow_mut() = Some(error);
                sink.cancel(StopReason::OutputFailed);
            }
        },
        |o: &RunOutcome| *outcome.borrow_mut() = Some(o.clone()),
    )
    .with_canceller(cancel);
    let target = handle
        .run()
        .map_or(Duration::ZERO, |run| run.pacer().target());
    let _guard = SignalGuard::install(handle.canceller())?;
    let exit = run_blocking(&mut handle);
    drop(handle);

    if let Some(error) = sink_error.into_inner() {
        return Err(CliError::Io(error));
    }
    match (exit, outcome.into_inner()) {
        (RunExit::Completed, Some(outcome)) => Ok(Played { outcome, target }),
        _ => Err(CliError::Interrupted),
    }
}

fn write_report<W: Write>(out: &mut W, report: &PlaybackReport, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        return Ok(());
    }
    let outcome = &report.outcome;
    writeln!(
        out,
        "{} values ({}) at {}% speed, {} ticks, paced for {} ms",
        report.input_len, report.origin, report.speed, outcome.ticks, report.target_ms
    )?;
    match &outcome.right {
        None => writeln!(out, "{}", format_summary("", &outcome.left))?,
        Some(right) => {
            writeln!(out, "{}", format_summary("left", &outcome.left))?;
            writeln!(out, "{}", format_summary("right", right))?;
        }
    }
    if let Some(verdict) = outcome.verdict {
        writeln!(out, "{}", describe_verdict(&verdict, outcome))?;
    }
    writeln!(out, "({WRITES_LABEL})")?;
    Ok(())
}

fn play_and_report<W: Write>(
    source: PlaybackSource,
    input: ResolvedInput,
    speed: u32,
    config: &PlaybackConfig,
    print_frames: bool,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let played = play_source(source, speed, config, print_frames, out)?;
    let report = PlaybackReport {
        origin: input.origin,
        input_len: input.values.len(),
        speed,
        target_ms: u64::try_from(played.target.as_millis()).unwrap_or(u64::MAX),
        writes_note: WRITES_LABEL,
        outcome: played.outcome,
    };
    write_report(out, &report, json)
}

/// Verdict line naming the winning algorithm.
#[must_use]
pub fn describe_verdict(verdict: &Verdict, outcome: &RunOutcome) -> String {
    let winner = match verdict.winner {
        Winner::Left => Some((LaneId::Left, outcome.left.algorithm)),
        Winner::Right => outcome.right.map(|r| (LaneId::Right, r.algorithm)),
        Winner::Draw => None,
    };
    match winner {
        Some((lane, algorithm)) => {
            format!("winner: {lane} {} ({})", algorithm.name(), verdict.reason)
        }
        None => format!("result: draw ({})", verdict.reason),
    }
}

pub fn run_play(args: PlayArgs, config: &PlaybackConfig, json: bool) -> Result<()> {
    play_to(args, config, json, &mut io::stdout().lock())
}

/// `play` writing frames and the report to `out`.
pub fn play_to<W: Write>(
    args: PlayArgs,
    config: &PlaybackConfig,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let speed = resolve_speed(args.speed, config)?;
    let resolved = args.input.resolve()?;
    let trace = generate_trace(args.algorithm, &resolved.values);
    play_and_report(
        PlaybackSource::Single(trace),
        resolved,
        speed,
        config,
        args.frames,
        json,
        out,
    )
}

pub fn run_race(args: RaceArgs, config: &PlaybackConfig, json: bool) -> Result<()> {
    race_to(args, config, json, &mut io::stdout().lock())
}

/// `race` writing frames and the report to `out`.
pub fn race_to<W: Write>(
    args: RaceArgs,
    config: &PlaybackConfig,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let speed = resolve_speed(args.speed, config)?;
    let resolved = args.input.resolve()?;
    let left = generate_trace(args.left, &resolved.values);
    let right = generate_trace(args.right, &resolved.values);
    play_and_report(
        PlaybackSource::Race(left, right),
        resolved,
        speed,
        config,
        args.frames,
        json,
        out,
    )
}
