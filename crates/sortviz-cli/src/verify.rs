//! `sortviz verify`: self-test every sorter against `std` on every pattern.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;
use sortviz_core::{Algorithm, Pattern, StepSorter, generate};
use web_time::Instant;

use crate::error::{CliError, Result};

/// `(size, seed)` pairs checked for every pattern by default.
pub const DEFAULT_CASES: [(usize, u64); 5] = [(0, 0), (1, 0), (10, 1), (50, 42), (200, 99)];

#[derive(Debug, Clone, Default, Args)]
pub struct VerifyArgs {
    /// Comma-separated sizes to check instead of the default table.
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<usize>,

    /// Seed for every case (default: per-size seeds from the default table).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only check these algorithms.
    #[arg(long = "algorithm", value_delimiter = ',')]
    pub algorithms: Vec<Algorithm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub algorithm: Algorithm,
    pub pattern: Pattern,
    pub size: usize,
    pub seed: u64,
    pub elapsed_us: u64,
    pub problems: Vec<String>,
}

impl CaseResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseResult>,
}

impl VerifyArgs {
    fn cases(&self) -> Vec<(usize, u64)> {
        if self.sizes.is_empty() {
            DEFAULT_CASES
                .iter()
                .map(|&(size, seed)| (size, self.seed.unwrap_or(seed)))
                .collect()
        } else {
            self.sizes
                .iter()
                .map(|&size| (size, self.seed.unwrap_or(0)))
                .collect()
        }
    }

    fn algorithms(&self) -> Vec<Algorithm> {
        if self.algorithms.is_empty() {
            Algorithm::ALL.to_vec()
        } else {
            self.algorithms.clone()
        }
    }
}

/// Check one algorithm on one generated input.
#[must_use]
pub fn check_case(algorithm: Algorithm, pattern: Pattern, size: usize, seed: u64) -> CaseResult {
    let input = generate(pattern, size, seed);
    let snapshot = input.clone();
    let mut expected = input.clone();
    expected.sort_unstable();

    let mut problems = Vec::new();
    let mut sorted = input.clone();
    let started = Instant::now();
    algorithm.sort(&mut sorted);
    let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    let trace = algorithm.steps(&input);

    if sorted != expected {
        problems.push(format!("sort: expected {expected:?}, got {sorted:?}"));
    }
    if input != snapshot {
        problems.push("steps mutated its input".to_string());
    }
    if size <= 1 {
        if !trace.is_empty() {
            problems.push(format!("trace for n={size} has {} steps", trace.len()));
        }
    } else if trace.final_state() != Some(&expected[..]) {
        problems.push(format!(
            "trace final state {:?} is not {expected:?}",
            trace.final_state()
        ));
    }
    for (i, step) in trace.iter().enumerate() {
        if step.data().len() != size {
            problems.push(format!("step {i}: width {} != {size}", step.data().len()));
        }
        let out_of_bounds = [step.compare_a(), step.compare_b()]
            .into_iter()
            .flatten()
            .any(|index| index >= size);
        if out_of_bounds {
            problems.push(format!("step {i}: compare index out of bounds"));
        }
        if step.range().is_some_and(|r| r.right() >= size) {
            problems.push(format!("step {i}: range out of bounds"));
        }
    }

    CaseResult {
        algorithm,
        pattern,
        size,
        seed,
        elapsed_us,
        problems,
    }
}

#[must_use]
pub fn verify(args: &VerifyArgs) -> VerifyReport {
    let mut cases = Vec::new();
    for algorithm in args.algorithms() {
        for pattern in Pattern::ALL {
            for &(size, seed) in &args.cases() {
                let result = check_case(algorithm, pattern, size, seed);
                tracing::debug!(
                    algorithm = algorithm.id(),
                    pattern = pattern.id(),
                    size,
                    passed = result.passed(),
                    "verify case"
                );
                cases.push(result);
            }
        }
    }
    let failed = cases.iter().filter(|c| !c.passed()).count();
    VerifyReport {
        passed: cases.len() - failed,
        failed,
        cases,
    }
}

pub fn run_verify(args: VerifyArgs, json: bool) -> Result<()> {
    verify_to(args, json, &mut io::stdout().lock())
}

/// `verify` writing its report to `out`. Fails on any failed case.
pub fn verify_to<W: Write>(args: VerifyArgs, json: bool, out: &mut W) -> Result<()> {
    let report = verify(&args);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        for case in &report.cases {
            writeln!(out, "{}", format_case(case))?;
            for problem in &case.problems {
                writeln!(out, "  {problem}")?;
            }
        }
        if report.failed == 0 {
            writeln!(out, "All {} cases passed.", report.passed)?;
        } else {
            writeln!(out, "{} of {} cases failed.", report.failed, report.cases.len())?;
        }
    }
    if report.failed > 0 {
        return Err(CliError::VerificationFailed {
            failed: report.failed,
            total: report.cases.len(),
        });
    }
    Ok(())
}

#[must_use]
pub fn format_case(case: &CaseResult) -> String {
    format!(
        "[{}] {:<15} pattern={:<15} size={:>4} seed={:>3} elapsed={:>6} µs",
        if case.passed() { "PASS" } else { "FAIL" },
        case.algorithm.name(),
        case.pattern.id(),
        case.size,
        case.seed,
        case.elapsed_us
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matrix_covers_every_combination() {
        let report = verify(&VerifyArgs::default());
        assert_eq!(report.cases.len(), 3 * 5 * 5);
        assert_eq!(report.failed, 0, "{:#?}", report.cases);
    }

    #[test]
    fn custom_sizes_and_algorithms_narrow_the_matrix() {
        let args = VerifyArgs {
            sizes: vec![3, 7],
            seed: Some(5),
            algorithms: vec![Algorithm::Merge],
        };
        let report = verify(&args);
        assert_eq!(report.cases.len(), 5 * 2);
        assert!(report.cases.iter().all(|c| c.seed == 5));
    }

    #[test]
    fn case_line_matches_reference_layout() {
        let case = CaseResult {
            algorithm: Algorithm::Bubble,
            pattern: Pattern::Random,
            size: 10,
            seed: 1,
            elapsed_us: 12,
            problems: Vec::new(),
        };
        assert_eq!(
            format_case(&case),
            "[PASS] Bubble Sort     pattern=random          size=  10 seed=  1 elapsed=    12 µs"
        );
    }

    #[test]
    fn run_verify_succeeds_on_small_matrix() {
        let args = VerifyArgs {
            sizes: vec![4],
            ..VerifyArgs::default()
        };
        let mut out = Vec::new();
        assert!(verify_to(args, false, &mut out).is_ok());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("[PASS]")).count(), 3 * 5);
        assert!(text.ends_with("All 15 cases passed.\n"));
    }

    #[test]
    fn closed_output_is_an_io_error() {
        let args = VerifyArgs {
            sizes: vec![2],
            ..VerifyArgs::default()
        };
        let mut out: &mut [u8] = &mut [];
        assert!(matches!(verify_to(args, false, &mut out), Err(CliError::Io(_))));
    }
}
