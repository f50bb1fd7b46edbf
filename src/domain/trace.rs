//! Call trace of a pipeline run
//!
//! Records which agents and tools ran, in what order, with what inputs and
//! outputs. The presentation layer shows it as the raw run details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of step a trace event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// Direct agent call (e.g. the selection judge)
    Agent,
    /// Tool dispatch through a registry
    Tool,
    /// Selection decision
    Selection,
    /// Control transfer from the sales manager to the email manager
    Handoff,
}

/// One recorded step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub seq: usize,
    pub kind: TraceKind,
    pub name: String,
    pub input: Value,
    pub output: Value,
    pub ok: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// A step that has run but not yet been numbered
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub kind: TraceKind,
    pub name: String,
    pub input: Value,
    pub output: Value,
    pub ok: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl TraceStep {
    /// Start timing a step now
    pub fn begin(kind: TraceKind, name: impl Into<String>, input: Value) -> Self {
        Self {
            kind,
            name: name.into(),
            input,
            output: Value::Null,
            ok: false,
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    /// Finish the step with its output
    pub fn finish(mut self, ok: bool, output: Value) -> Self {
        let elapsed = Utc::now() - self.started_at;
        self.duration_ms = elapsed.num_milliseconds().max(0) as u64;
        self.ok = ok;
        self.output = output;
        self
    }
}

/// Ordered list of trace events for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallTrace {
    events: Vec<TraceEvent>,
}

impl CallTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished step, assigning the next sequence number
    pub fn record(&mut self, step: TraceStep) {
        let seq = self.events.len();
        self.events.push(TraceEvent {
            seq,
            kind: step.kind,
            name: step.name,
            input: step.input,
            output: step.output,
            ok: step.ok,
            started_at: step.started_at,
            duration_ms: step.duration_ms,
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Names of the events of one kind, in order
    pub fn names_of(&self, kind: TraceKind) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Number of events with the given name
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name == name).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(kind: TraceKind, name: &str, ok: bool) -> TraceStep {
        TraceStep::begin(kind, name, json!(null)).finish(ok, json!(null))
    }

    #[test]
    fn test_record_assigns_sequence() {
        let mut trace = CallTrace::new();
        let subject = TraceStep::begin(TraceKind::Tool, "subject_writer", json!({}));
        trace.record(subject.finish(true, json!("Hi")));
        trace.record(step(TraceKind::Tool, "html_converter", false));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.events()[0].seq, 0);
        assert_eq!(trace.events()[1].seq, 1);
        assert!(trace.events()[0].ok);
        assert!(!trace.events()[1].ok);
    }

    #[test]
    fn test_names_of_filters_by_kind() {
        let mut trace = CallTrace::new();
        trace.record(step(TraceKind::Tool, "sales_agent1", true));
        trace.record(step(TraceKind::Handoff, "Email Manager", true));
        trace.record(step(TraceKind::Tool, "send_html_email", true));

        assert_eq!(trace.names_of(TraceKind::Tool), vec!["sales_agent1", "send_html_email"]);
        assert_eq!(trace.count("Email Manager"), 1);
        assert_eq!(trace.count("missing"), 0);
    }

    #[test]
    fn test_trace_serializes_as_array() {
        let mut trace = CallTrace::new();
        assert!(trace.is_empty());
        let selection = TraceStep::begin(TraceKind::Selection, "preference", json!(["a"]));
        trace.record(selection.finish(true, json!(0)));

        let value = serde_json::to_value(&trace).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["kind"], "selection");
        assert_eq!(value[0]["name"], "preference");
    }
}
