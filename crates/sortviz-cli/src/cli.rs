use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use sortviz_core::{Algorithm, StepSorter};
use sortviz_runtime::PlaybackConfig;

use crate::error::{CliError, Result};
use crate::inspect::{InspectArgs, run_inspect};
use crate::logging;
use crate::play::{PlayArgs, RaceArgs, run_play, run_race};
use crate::verify::{VerifyArgs, run_verify};

#[derive(Debug, Parser)]
#[command(
    name = "sortviz",
    about = "Step-by-step sorting traces, paced playback, and algorithm races",
    version
)]
pub struct Cli {
    /// Playback config file (.toml or .json).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print reports and errors as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the available algorithms.
    #[command(name = "list-algorithms")]
    ListAlgorithms,

    /// Check every sorter against the standard library sort.
    Verify(VerifyArgs),

    /// Generate one trace and report its metrics.
    Inspect(InspectArgs),

    /// Play one algorithm in real time.
    Play(PlayArgs),

    /// Race two algorithms on the same input.
    Race(RaceArgs),
}

#[derive(Debug, Serialize)]
struct AlgorithmEntry {
    id: &'static str,
    name: &'static str,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_json);
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::ListAlgorithms => write_algorithms(&mut io::stdout().lock(), cli.json),
        Commands::Verify(args) => run_verify(args, cli.json),
        Commands::Inspect(args) => run_inspect(args, cli.json),
        Commands::Play(args) => run_play(args, &config, cli.json),
        Commands::Race(args) => run_race(args, &config, cli.json),
    }
}

/// Defaults without a path; otherwise the file must load and validate.
pub fn load_config(path: Option<&std::path::Path>) -> Result<PlaybackConfig> {
    let Some(path) = path else {
        return Ok(PlaybackConfig::default());
    };
    let config = PlaybackConfig::load(path).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded playback config");
    Ok(config)
}

/// `list-algorithms` output: `id<TAB>name` lines or a JSON array.
pub fn write_algorithms<W: Write>(out: &mut W, json: bool) -> Result<()> {
    if json {
        let entries: Vec<AlgorithmEntry> = Algorithm::ALL
            .iter()
            .map(|a| AlgorithmEntry {
                id: a.id(),
                name: a.name(),
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
    } else {
        for algorithm in Algorithm::ALL {
            writeln!(out, "{}\t{}", algorithm.id(), algorithm.name())?;
        }
    }
    Ok(())
}
