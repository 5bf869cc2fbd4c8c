use std::io::BufRead;
use serde::{Serialize, Deserialize};
use crate::core::error::{Result, ReporterError};
use crate::reporters::Reporter;

/// Terminal status of a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecStatus {
    Passed,
    Pending,
    Failed,
    /// Any status the reporter does not render (excluded, disabled, ...).
    #[serde(other)]
    Other,
}

impl SpecStatus {
    /// Returns `true` if the spec has failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, SpecStatus::Failed)
    }
}

/// Payload of the run-started event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunInfo {
    pub total_specs_defined: Option<u64>,
}

/// Payload of the suite-started event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuiteInfo {
    pub description: String,
    pub full_name: String,
}

/// One failed assertion inside a spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailedExpectation {
    pub message: String,
    pub stack: Option<String>,
}

/// Payload of the spec-done event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecResult {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub full_name: String,
    pub status: SpecStatus,
    #[serde(default)]
    pub failed_expectations: Vec<FailedExpectation>,
}

impl SpecResult {
    pub fn new(description: impl Into<String>, full_name: impl Into<String>, status: SpecStatus) -> Self {
        Self {
            description: description.into(),
            full_name: full_name.into(),
            status,
            failed_expectations: Vec::new(),
        }
    }

    pub fn with_expectation(mut self, message: impl Into<String>, stack: Option<&str>) -> Self {
        self.failed_expectations.push(FailedExpectation {
            message: message.into(),
            stack: stack.map(str::to_string),
        });
        self
    }
}

/// A lifecycle event as emitted by the test engine, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReporterEvent {
    RunStarted(RunInfo),
    SuiteStarted(SuiteInfo),
    SuiteDone,
    SpecDone(SpecResult),
    RunDone,
}

impl ReporterEvent {
    /// Deliver this event to a reporter.
    pub fn dispatch(&self, reporter: &mut dyn Reporter) {
        match self {
            ReporterEvent::RunStarted(info) => reporter.run_started(info),
            ReporterEvent::SuiteStarted(info) => reporter.suite_started(info),
            ReporterEvent::SuiteDone => reporter.suite_done(),
            ReporterEvent::SpecDone(result) => reporter.spec_done(result),
            ReporterEvent::RunDone => reporter.run_done(),
        }
    }
}

/// Decode a JSON-lines event stream. Blank lines are skipped.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<ReporterEvent>> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = serde_json::from_str(line)
            .map_err(|source| ReporterError::EventError { line: index + 1, source })?;
        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_status_is_failure() {
        assert!(SpecStatus::Failed.is_failure());
        assert!(!SpecStatus::Passed.is_failure());
        assert!(!SpecStatus::Pending.is_failure());
        assert!(!SpecStatus::Other.is_failure());
    }

    #[test]
    fn test_unknown_status_decodes_as_other() {
        let result: SpecResult = serde_json::from_str(r#"{"status": "excluded"}"#).unwrap();
        assert_eq!(result.status, SpecStatus::Other);
        assert!(result.description.is_empty());
        assert!(result.failed_expectations.is_empty());
    }

    #[test]
    fn test_spec_done_uses_engine_field_names() {
        let event: ReporterEvent = serde_json::from_str(
            r#"{"event": "spec_done", "description": "adds", "fullName": "math adds",
                "status": "failed", "failedExpectations": [{"message": "boom", "stack": "at x"}]}"#,
        )
        .unwrap();

        let expected = SpecResult::new("adds", "math adds", SpecStatus::Failed)
            .with_expectation("boom", Some("at x"));
        assert_eq!(event, ReporterEvent::SpecDone(expected));
    }

    #[test]
    fn test_run_started_without_info() {
        let event: ReporterEvent = serde_json::from_str(r#"{"event": "run_started"}"#).unwrap();
        assert_eq!(event, ReporterEvent::RunStarted(RunInfo::default()));

        let event: ReporterEvent =
            serde_json::from_str(r#"{"event": "run_started", "totalSpecsDefined": 3}"#).unwrap();
        assert_eq!(event, ReporterEvent::RunStarted(RunInfo { total_specs_defined: Some(3) }));
    }

    #[test]
    fn test_read_events_skips_blank_lines() {
        let input = "{\"event\": \"suite_started\", \"description\": \"a\"}\n\n{\"event\": \"suite_done\"}\n";
        let events = read_events(input.as_bytes()).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1], ReporterEvent::SuiteDone);
    }

    #[test]
    fn test_read_events_reports_line_number() {
        let input = "{\"event\": \"run_started\"}\n\nnot json\n";
        match read_events(input.as_bytes()) {
            Err(ReporterError::EventError { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected event error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_events_rejects_unknown_event() {
        let input = "{\"event\": \"spec_started\"}\n";
        assert!(read_events(input.as_bytes()).is_err());
    }
}
