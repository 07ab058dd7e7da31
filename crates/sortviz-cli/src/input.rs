//! Shared input options: a generated pattern or manually entered values.

use clap::Args;
use serde::Serialize;
use sortviz_core::{Pattern, generate, parse_size, parse_values, random_in_range};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Data pattern: random, ascending, descending, almost-sorted, many-duplicates.
    #[arg(long, default_value = "random")]
    pub pattern: Pattern,

    /// Number of values to generate.
    #[arg(long, default_value = "50", allow_hyphen_values = true)]
    pub size: String,

    /// Seed for generated data. Defaults to the current time.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Lower bound for uniform random values (default 1). Replaces --pattern.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "pattern")]
    pub min: Option<i32>,

    /// Upper bound for uniform random values (default 100). Replaces --pattern.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "pattern")]
    pub max: Option<i32>,

    /// Manual input, comma and/or whitespace separated. Overrides --pattern.
    #[arg(
        long,
        allow_hyphen_values = true,
        conflicts_with_all = ["pattern", "seed", "min", "max"]
    )]
    pub values: Option<String>,
}

impl Default for InputArgs {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random,
            size: "50".to_string(),
            seed: None,
            min: None,
            max: None,
            values: None,
        }
    }
}

/// Where the values came from, echoed in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputOrigin {
    Generated { pattern: Pattern, seed: u64 },
    Range { min: i32, max: i32, seed: u64 },
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub values: Vec<i32>,
    pub origin: InputOrigin,
}

impl InputArgs {
    pub fn resolve(&self) -> Result<ResolvedInput> {
        if let Some(text) = &self.values {
            return Ok(ResolvedInput {
                values: parse_values(text)?,
                origin: InputOrigin::Manual,
            });
        }
        let size = parse_size(&self.size)?;
        let seed = self.seed.unwrap_or_else(clock_seed);
        if self.min.is_some() || self.max.is_some() {
            let (min, max) = (self.min.unwrap_or(1), self.max.unwrap_or(100));
            tracing::debug!(min, max, size, seed, "generating bounded input");
            return Ok(ResolvedInput {
                values: random_in_range(size, min, max, seed)?,
                origin: InputOrigin::Range { min, max, seed },
            });
        }
        tracing::debug!(pattern = %self.pattern, size, seed, "generating input");
        Ok(ResolvedInput {
            values: generate(self.pattern, size, seed),
            origin: InputOrigin::Generated {
                pattern: self.pattern,
                seed,
            },
        })
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

impl std::fmt::Display for InputOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated { pattern, seed } => write!(f, "{pattern} (seed {seed})"),
            Self::Range { min, max, seed } => write!(f, "random in [{min}, {max}] (seed {seed})"),
            Self::Manual => f.write_str("manual"),
        }
    }
}
