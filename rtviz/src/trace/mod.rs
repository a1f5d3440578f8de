//! Trace input: the decoded form of a scheduling trace and its loading.
//!
//! A trace lists the jobs of one run.  JSON is the native format; YAML with
//! the same structure is accepted for hand-written traces:
//! ```json
//! {
//!   "job": [
//!     { "release": 0, "deadline": 4, "task": 0,
//!       "executions": [ { "processor": 0, "start": 0, "time": 3, "color": "red" } ] }
//!   ]
//! }
//! ```
//!
//! Decoding only checks structure (required fields, types).  Value checks
//! happen when the records become a [`Schedule`] in
//! [`TraceFile::into_schedule`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::schedule::{Execution, Job, Schedule, ScheduleError};

// ── Records ───────────────────────────────────────────────────────────────────

/// Top-level wrapper that maps directly onto the trace file layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceFile {
    #[serde(alias = "jobs")]
    pub job: Vec<JobRecord>,
}

/// One job as it appears in the trace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobRecord {
    pub release: f64,
    pub deadline: f64,
    pub task: u32,
    pub executions: Vec<ExecutionRecord>,
}

/// One execution interval as it appears in the trace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionRecord {
    pub processor: u32,
    pub start: f64,
    /// Length of the interval.
    pub time: f64,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<ExecutionRecord> for Execution {
    fn from(r: ExecutionRecord) -> Self {
        Execution {
            processor: r.processor,
            start: r.start,
            duration: r.time,
            color: r.color,
        }
    }
}

impl From<JobRecord> for Job {
    fn from(r: JobRecord) -> Self {
        Job::new(
            r.task,
            r.release,
            r.deadline,
            r.executions.into_iter().map(Execution::from).collect(),
        )
    }
}

impl TraceFile {
    /// Build a [`Schedule`] from the records, in trace order.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidJob`] for the first record that
    /// [`Schedule::add_job`] rejects, carrying its zero-based index.
    pub fn into_schedule(self) -> Result<Schedule, ScheduleError> {
        let mut schedule = Schedule::new();
        for (index, record) in self.job.into_iter().enumerate() {
            schedule
                .add_job(Job::from(record))
                .map_err(|e| ScheduleError::InvalidJob {
                    index,
                    source: Box::new(e),
                })?;
        }
        Ok(schedule)
    }
}

// ── Formats ───────────────────────────────────────────────────────────────────

/// Encoding of a trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Json,
    Yaml,
}

impl TraceFormat {
    /// `.yaml` / `.yml` (any case) → YAML; everything else → JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => TraceFormat::Yaml,
            _ => TraceFormat::Json,
        }
    }
}

/// Decode `text` as a trace.
pub fn parse_trace(text: &str, format: TraceFormat) -> Result<TraceFile> {
    let trace: TraceFile = match format {
        TraceFormat::Json => serde_json::from_str(text).context("Failed to parse JSON trace")?,
        TraceFormat::Yaml => serde_yaml::from_str(text).context("Failed to parse YAML trace")?,
    };
    debug!(jobs = trace.job.len(), ?format, "trace decoded");
    Ok(trace)
}

/// Read, decode and build the schedule of the trace at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read, is not a well-formed trace,
/// or one of its jobs is rejected by the schedule.
pub fn load_schedule(path: &Path) -> Result<Schedule> {
    info!("Loading trace from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open trace file: {}", path.display()))?;

    let trace = parse_trace(&content, TraceFormat::from_path(path))
        .with_context(|| format!("Malformed trace file: {}", path.display()))?;

    let schedule = trace
        .into_schedule()
        .with_context(|| format!("Invalid job in trace file: {}", path.display()))?;

    info!(
        jobs = schedule.job_count(),
        tasks = schedule.task_count(),
        processors = schedule.processor_count(),
        "Trace loaded"
    );
    Ok(schedule)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    /// Helper: write `content` to a temp file with the given suffix.
    fn trace_tempfile(content: &str, suffix: &str) -> NamedTempFile {
        let mut f = Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const MIGRATION_JSON: &str = r#"
{
  "job": [
    { "release": 0, "deadline": 10, "task": 1,
      "executions": [
        { "processor": 0, "start": 1, "time": 2, "color": "red" },
        { "processor": 1, "start": 4, "time": 3 }
      ] },
    { "release": 2, "deadline": 6, "task": 0,
      "executions": [ { "processor": 0, "start": 3, "time": 1 } ] }
  ]
}
"#;

    // ── parse_trace ───────────────────────────────────────────────────────────

    #[test]
    fn parse_json_trace() {
        let trace = parse_trace(MIGRATION_JSON, TraceFormat::Json).unwrap();
        assert_eq!(trace.job.len(), 2);
        let first = &trace.job[0];
        assert_eq!(first.task, 1);
        assert_eq!(first.executions.len(), 2);
        assert_eq!(first.executions[0].color.as_deref(), Some("red"));
        assert_eq!(first.executions[1].color, None);
    }

    #[test]
    fn parse_yaml_trace_with_jobs_alias() {
        let yaml = r#"
jobs:
  - release: 0
    deadline: 4
    task: 0
    executions:
      - { processor: 0, start: 0, time: 3 }
"#;
        let trace = parse_trace(yaml, TraceFormat::Yaml).unwrap();
        assert_eq!(trace.job.len(), 1);
        assert_eq!(trace.job[0].executions[0].time, 3.0);
    }

    #[test]
    fn missing_field_is_malformed() {
        let json = r#"{ "job": [ { "release": 0, "task": 0, "executions": [] } ] }"#;
        let err = parse_trace(json, TraceFormat::Json).unwrap_err();
        assert!(format!("{err:#}").contains("deadline"));
    }

    #[test]
    fn unknown_job_field_is_malformed() {
        let json = r#"{ "job": [ { "release": 0, "deadline": 1, "task": 0,
                        "executions": [], "priority": 3 } ] }"#;
        assert!(parse_trace(json, TraceFormat::Json).is_err());
    }

    #[test]
    fn negative_id_is_malformed() {
        let json = r#"{ "job": [ { "release": 0, "deadline": 1, "task": -1,
                        "executions": [] } ] }"#;
        assert!(parse_trace(json, TraceFormat::Json).is_err());
    }

    // ── into_schedule ─────────────────────────────────────────────────────────

    #[test]
    fn records_become_a_schedule_in_trace_order() {
        let schedule = parse_trace(MIGRATION_JSON, TraceFormat::Json)
            .unwrap()
            .into_schedule()
            .unwrap();
        assert_eq!(schedule.job_count(), 2);
        assert_eq!(schedule.processor_count(), 2);
        assert_eq!(schedule.jobs()[0].task, 1);
        assert_eq!(schedule.jobs()[0].executions[1].duration, 3.0);
        assert!(schedule.jobs()[0].migrates());
    }

    #[test]
    fn job_without_executions_reports_its_index() {
        let json = r#"{ "job": [
            { "release": 0, "deadline": 1, "task": 0,
              "executions": [ { "processor": 0, "start": 0, "time": 1 } ] },
            { "release": 0, "deadline": 1, "task": 3, "executions": [] }
        ] }"#;
        let err = parse_trace(json, TraceFormat::Json)
            .unwrap()
            .into_schedule()
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidJob {
                index: 1,
                source: Box::new(ScheduleError::NoExecutions { task: 3 }),
            }
        );
    }

    #[test]
    fn empty_trace_builds_an_empty_schedule() {
        let schedule = parse_trace(r#"{ "job": [] }"#, TraceFormat::Json)
            .unwrap()
            .into_schedule()
            .unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.start().unwrap_err(), ScheduleError::EmptySchedule);
    }

    // ── TraceFormat ───────────────────────────────────────────────────────────

    #[test]
    fn format_follows_extension() {
        assert_eq!(TraceFormat::from_path(Path::new("a.yaml")), TraceFormat::Yaml);
        assert_eq!(TraceFormat::from_path(Path::new("a.YML")), TraceFormat::Yaml);
        assert_eq!(TraceFormat::from_path(Path::new("a.json")), TraceFormat::Json);
        assert_eq!(TraceFormat::from_path(Path::new("trace")), TraceFormat::Json);
    }

    // ── load_schedule ─────────────────────────────────────────────────────────

    #[test]
    fn load_json_file() {
        let f = trace_tempfile(MIGRATION_JSON, ".json");
        let schedule = load_schedule(f.path()).unwrap();
        assert_eq!(schedule.job_count(), 2);
        assert_eq!(schedule.finish().unwrap(), 10.0);
    }

    #[test]
    fn load_yaml_file() {
        let yaml = "job:\n  - {release: 1, deadline: 5, task: 2, executions: [{processor: 3, start: 1, time: 2}]}\n";
        let f = trace_tempfile(yaml, ".yaml");
        let schedule = load_schedule(f.path()).unwrap();
        assert_eq!(schedule.processor(3).unwrap().id(), 3);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_schedule(Path::new("/nonexistent/trace.json")).is_err());
    }

    #[test]
    fn load_error_names_the_file() {
        let f = trace_tempfile("{ not json", ".json");
        let err = load_schedule(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains(&f.path().display().to_string()));
    }
}
