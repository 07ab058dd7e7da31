#![forbid(unsafe_code)]

//! Input production: seeded data patterns and manual input parsing.
//!
//! This is the data-production side that hands the sorters a finite integer
//! sequence. It is the only part of the crate that can fail; the sorters and
//! metrics have no error states for well-formed input.
//!
//! Generated data is reproducible for a given `(pattern, size, seed)` within
//! one build of the crate.

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Invalid input handed to the data-production layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A requested size was below zero.
    #[error("size must be non-negative, got {0}")]
    NegativeSize(i64),

    /// A size string was not an integer.
    #[error("size is not an integer: {0:?}")]
    InvalidSize(String),

    /// Manual input contained no values.
    #[error("input is empty")]
    Empty,

    /// A manual input token was not an integer.
    #[error("cannot parse {token:?} at position {position} as an integer")]
    Unparseable {
        /// The offending token.
        token: String,
        /// Zero-based token position.
        position: usize,
    },

    /// `min > max` for a bounded random range.
    #[error("min must be <= max (min={min}, max={max})")]
    InvertedRange {
        /// Requested lower bound.
        min: i32,
        /// Requested upper bound.
        max: i32,
    },

    /// A pattern name was not recognized.
    #[error("unknown pattern: {0} (expected random, ascending, descending, almost-sorted, many-duplicates)")]
    UnknownPattern(String),
}

/// Shape of generated input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Pattern {
    /// Uniform values in `1..=100`.
    Random,
    /// `1..=n`.
    Ascending,
    /// `n..=1`.
    Descending,
    /// Ascending with `max(1, n / 10)` random swaps.
    AlmostSorted,
    /// Uniform values in `1..=10`.
    ManyDuplicates,
}

impl Pattern {
    /// Every pattern, in display order.
    pub const ALL: [Self; 5] = [
        Self::Random,
        Self::Ascending,
        Self::Descending,
        Self::AlmostSorted,
        Self::ManyDuplicates,
    ];

    /// Stable kebab-case identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::AlmostSorted => "almost-sorted",
            Self::ManyDuplicates => "many-duplicates",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Pattern {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|p| p.id() == normalized)
            .ok_or_else(|| InputError::UnknownPattern(s.to_owned()))
    }
}

/// Generate `size` values shaped by `pattern`.
#[must_use]
pub fn generate(pattern: Pattern, size: usize, seed: u64) -> Vec<i32> {
    let mut rng = SmallRng::seed_from_u64(seed);
    match pattern {
        Pattern::Random => (0..size).map(|_| rng.random_range(1..=100)).collect(),
        Pattern::Ascending => ascending(size),
        Pattern::Descending => {
            let mut values = ascending(size);
            values.reverse();
            values
        }
        Pattern::AlmostSorted => {
            let mut values = ascending(size);
            if size > 0 {
                for _ in 0..(size / 10).max(1) {
                    let i = rng.random_range(0..size);
                    let j = rng.random_range(0..size);
                    values.swap(i, j);
                }
            }
            values
        }
        Pattern::ManyDuplicates => (0..size).map(|_| rng.random_range(1..=10)).collect(),
    }
}

/// Generate `size` uniform values in `min..=max`.
pub fn random_in_range(size: usize, min: i32, max: i32, seed: u64) -> Result<Vec<i32>, InputError> {
    if min > max {
        return Err(InputError::InvertedRange { min, max });
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok((0..size).map(|_| rng.random_range(min..=max)).collect())
}

/// Parse a requested size, rejecting negative values.
pub fn parse_size(text: &str) -> Result<usize, InputError> {
    let trimmed = text.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::InvalidSize(trimmed.to_owned()))?;
    if value < 0 {
        return Err(InputError::NegativeSize(value));
    }
    usize::try_from(value).map_err(|_| InputError::InvalidSize(trimmed.to_owned()))
}

/// Parse manually entered values separated by commas and/or whitespace.
pub fn parse_values(text: &str) -> Result<Vec<i32>, InputError> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(InputError::Empty);
    }
    tokens
        .into_iter()
        .enumerate()
        .map(|(position, token)| {
            token.parse().map_err(|_| InputError::Unparseable {
                token: token.to_owned(),
                position,
            })
        })
        .collect()
}

fn ascending(size: usize) -> Vec<i32> {
    (1..=size).map(|v| i32::try_from(v).unwrap_or(i32::MAX)).collect()
}
