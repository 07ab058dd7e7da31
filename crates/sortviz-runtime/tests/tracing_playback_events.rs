#![forbid(unsafe_code)]

//! Structured logging contract: targets, messages, and span names emitted
//! during a race.
//!
//! Run:
//!   cargo test -p sortviz-runtime --test tracing_playback_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sortviz_core::{Algorithm, generate_trace};
use sortviz_runtime::{PlaybackConfig, RunState};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use web_time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    target: String,
}

#[derive(Default, Clone)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(HashMap::new());
        event.record(&mut visitor);
        let message = visitor.0.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            message,
            fields: visitor.0,
        });
    }
}

fn capture_race() -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, || {
        let input = [9, 4, 7, 1, 8, 2];
        let t0 = Instant::now();
        let mut run = RunState::race(
            generate_trace(Algorithm::Selection, &input),
            generate_trace(Algorithm::Merge, &input),
            &PlaybackConfig::default(),
            t0,
        );
        let mut ms = 0;
        while !run.is_complete() {
            ms += 20;
            run.tick(t0 + Duration::from_millis(ms));
        }
    });
    capture
}

#[test]
fn run_start_and_completion_are_logged() {
    let capture = capture_race();
    let events = capture.events.lock().unwrap();
    let started: Vec<_> = events
        .iter()
        .filter(|e| e.target == "sortviz.playback" && e.message == "run started")
        .collect();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].fields.get("mode").map(String::as_str), Some("race"));
    assert_eq!(
        started[0].fields.get("left").map(String::as_str),
        Some("selection")
    );

    let completed = events
        .iter()
        .filter(|e| e.target == "sortviz.playback" && e.message == "run complete")
        .count();
    assert_eq!(completed, 1);
}

#[test]
fn verdict_is_logged_once_on_race_target() {
    let capture = capture_race();
    let events = capture.events.lock().unwrap();
    let verdicts: Vec<_> = events
        .iter()
        .filter(|e| e.target == "sortviz.race")
        .collect();
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].message, "race decided");
    assert!(verdicts[0].fields.contains_key("winner"));
    assert!(verdicts[0].fields.contains_key("reason"));
}

#[test]
fn ticks_and_trace_generation_open_spans() {
    let capture = capture_race();
    let spans = capture.spans.lock().unwrap();
    assert!(
        spans
            .iter()
            .any(|s| s.name == "playback.tick" && s.target == "sortviz.playback")
    );
    let generated = spans
        .iter()
        .filter(|s| s.name == "trace.generate" && s.target == "sortviz.trace")
        .count();
    assert_eq!(generated, 2);
}
