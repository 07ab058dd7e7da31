//! `sortviz inspect`: generate one trace and report its shape and metrics.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;
use sortviz_core::{
    Algorithm, Step, StepSorter, Trace, TraceMetrics, WRITES_LABEL, generate_trace,
};

use crate::error::Result;
use crate::input::{InputArgs, InputOrigin};

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Algorithm to trace: bubble, selection, merge.
    #[arg(long, short)]
    pub algorithm: Algorithm,

    #[command(flatten)]
    pub input: InputArgs,

    /// Print every step.
    #[arg(long)]
    pub steps: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub algorithm: Algorithm,
    pub name: &'static str,
    pub origin: InputOrigin,
    pub input: Vec<i32>,
    pub steps: usize,
    pub compares: u64,
    pub writes: u64,
    pub writes_note: &'static str,
    pub final_state: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<Step>>,
}

impl InspectReport {
    #[must_use]
    pub fn new(trace: &Trace, input: Vec<i32>, origin: InputOrigin, with_steps: bool) -> Self {
        let metrics = TraceMetrics::of(trace);
        let final_state = trace
            .final_state()
            .map_or_else(|| input.clone(), <[i32]>::to_vec);
        Self {
            algorithm: trace.algorithm(),
            name: trace.algorithm().name(),
            origin,
            input,
            steps: trace.len(),
            compares: metrics.compares,
            writes: metrics.writes,
            writes_note: WRITES_LABEL,
            final_state,
            trace: with_steps.then(|| trace.steps().to_vec()),
        }
    }
}

/// One line per step: index, data, compare pair, range.
#[must_use]
pub fn format_step(index: usize, step: &Step) -> String {
    let mut line = format!("{index:>5} {:?}", step.data());
    if step.is_compare() {
        line.push_str(&format!(
            " cmp=({}, {})",
            step.compare_a_raw(),
            step.compare_b_raw()
        ));
    }
    if let Some(range) = step.range() {
        line.push_str(&format!(" range=[{}, {}]", range.left(), range.right()));
    }
    line
}

pub fn run_inspect(args: InspectArgs, json: bool) -> Result<()> {
    inspect_to(args, json, &mut io::stdout().lock())
}

pub fn inspect_to<W: Write>(args: InspectArgs, json: bool, out: &mut W) -> Result<()> {
    let resolved = args.input.resolve()?;
    let trace = generate_trace(args.algorithm, &resolved.values);
    let report = InspectReport::new(&trace, resolved.values, resolved.origin, args.steps);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "{} on {} values ({})", report.name, report.input.len(), report.origin)?;
    writeln!(out, "  input:    {:?}", report.input)?;
    writeln!(out, "  sorted:   {:?}", report.final_state)?;
    writeln!(out, "  steps:    {}", report.steps)?;
    writeln!(out, "  compares: {}", report.compares)?;
    writeln!(out, "  writes:   {} ({WRITES_LABEL})", report.writes)?;
    if args.steps {
        for (i, step) in trace.iter().enumerate() {
            writeln!(out, "{}", format_step(i, step))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortviz_core::StepRange;

    #[test]
    fn report_counts_bubble_trace() {
        let input = vec![2, 1, 3];
        let trace = generate_trace(Algorithm::Bubble, &input);
        let report = InspectReport::new(&trace, input, InputOrigin::Manual, false);
        assert_eq!(report.steps, 4);
        assert_eq!(report.compares, 3);
        assert_eq!(report.writes, 2);
        assert_eq!(report.final_state, vec![1, 2, 3]);
        assert!(report.trace.is_none());
    }

    #[test]
    fn trivial_input_reports_itself_as_sorted() {
        let trace = generate_trace(Algorithm::Merge, &[7]);
        let report = InspectReport::new(&trace, vec![7], InputOrigin::Manual, true);
        assert_eq!(report.steps, 0);
        assert_eq!(report.final_state, vec![7]);
        assert_eq!(report.trace, Some(Vec::new()));
    }

    #[test]
    fn step_lines_show_annotations() {
        let step = Step::new(&[4, 1, 3], Some(0), Some(2), StepRange::new(0, 2));
        assert_eq!(format_step(3, &step), "    3 [4, 1, 3] cmp=(0, 2) range=[0, 2]");
        let one_sided = Step::new(&[1, 4], None, Some(1), None);
        assert_eq!(format_step(0, &one_sided), "    0 [1, 4] cmp=(-1, 1)");
        assert_eq!(format_step(1, &Step::plain(&[1])), "    1 [1]");
    }

    #[test]
    fn text_report_lists_steps() {
        let args = InspectArgs {
            algorithm: Algorithm::Bubble,
            input: crate::input::InputArgs {
                values: Some("2 1".into()),
                ..Default::default()
            },
            steps: true,
        };
        let mut out = Vec::new();
        inspect_to(args, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Bubble Sort on 2 values (manual)"));
        assert!(text.contains("    0 [2, 1] cmp=(0, 1)"));
        assert!(text.contains("    1 [1, 2]"));
    }

    #[test]
    fn json_report_serializes() {
        let input = vec![3, 1, 2];
        let trace = generate_trace(Algorithm::Selection, &input);
        let report = InspectReport::new(
            &trace,
            input,
            InputOrigin::Generated {
                pattern: sortviz_core::Pattern::Random,
                seed: 1,
            },
            false,
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["algorithm"], "selection");
        assert_eq!(value["origin"]["kind"], "generated");
        assert!(value.get("trace").is_none());
    }
}
