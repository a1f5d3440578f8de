/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timing sanity check for a single job.
//!
//! # Status: warning only
//!
//! The renderer does not validate scheduling correctness.  A trace in which
//! an execution starts before its job's release, or ends after its deadline,
//! is still drawn exactly as given.  This module only **detects** such
//! executions so that [`Schedule::add_job`](super::Schedule::add_job) can log
//! them; the job is never rejected because of them.
//!
//! ```text
//!   release                         deadline
//!      ↑                                ↓
//!   ───┼──[ exec ]─────[  exec  ]───────┼───   in window
//!  [ exec ]                          [ exec ]  outside window
//! ```

use super::entity::{Execution, Job};

// ── Public API ────────────────────────────────────────────────────────────────

/// How an execution leaves its job's `[release, deadline]` window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowViolation {
    /// The execution starts `by` time units before the release.
    StartsBeforeRelease { by: f64 },
    /// The execution ends `by` time units after the deadline.
    EndsAfterDeadline { by: f64 },
}

/// Check one execution against the window of `job`.
///
/// Returns `None` if the execution lies within `[release, deadline]`
/// (boundaries inclusive).  An execution violating both ends reports the
/// release side.
pub fn check_window(job: &Job, execution: &Execution) -> Option<WindowViolation> {
    if execution.start < job.release {
        return Some(WindowViolation::StartsBeforeRelease {
            by: job.release - execution.start,
        });
    }
    if execution.end() > job.deadline {
        return Some(WindowViolation::EndsAfterDeadline {
            by: execution.end() - job.deadline,
        });
    }
    None
}

/// Every execution of `job` that leaves its window, with the reason.
pub fn window_violations(job: &Job) -> Vec<(&Execution, WindowViolation)> {
    job.executions
        .iter()
        .filter_map(|e| check_window(job, e).map(|v| (e, v)))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with(executions: Vec<Execution>) -> Job {
        Job::new(0, 2.0, 10.0, executions)
    }

    #[test]
    fn execution_inside_window_is_fine() {
        let job = job_with(vec![Execution::new(0, 3.0, 4.0)]);
        assert!(window_violations(&job).is_empty());
    }

    #[test]
    fn boundaries_are_inclusive() {
        // starts exactly at release, ends exactly at deadline
        let job = job_with(vec![Execution::new(0, 2.0, 8.0)]);
        assert!(window_violations(&job).is_empty());
    }

    #[test]
    fn early_start_is_reported() {
        let job = job_with(vec![Execution::new(0, 0.5, 1.0)]);
        let v = window_violations(&job);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].1, WindowViolation::StartsBeforeRelease { by: 1.5 });
    }

    #[test]
    fn late_end_is_reported() {
        let job = job_with(vec![
            Execution::new(0, 3.0, 1.0),
            Execution::new(1, 9.0, 3.0),
        ]);
        let v = window_violations(&job);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].0.processor, 1);
        assert_eq!(v[0].1, WindowViolation::EndsAfterDeadline { by: 2.0 });
    }

    #[test]
    fn execution_spanning_whole_window_reports_release_side() {
        let job = job_with(vec![Execution::new(0, 0.0, 20.0)]);
        assert!(matches!(
            check_window(&job, &job.executions[0]),
            Some(WindowViolation::StartsBeforeRelease { .. })
        ));
    }
}
