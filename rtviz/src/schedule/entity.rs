/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Entities of a rendered schedule: tasks, processors, jobs and executions.
//!
//! ```text
//! Task ──produces──► Job ──runs as──► Execution(s) ──on──► Processor
//! ```
//!
//! # Ownership model
//! All entities are plain values owned by the [`Schedule`](super::Schedule).
//! None of them point back at the schedule: geometry that depends on global
//! quantities (duration, counts) is computed by the layout engine, which
//! borrows the schedule read-only.

use std::collections::BTreeSet;
use std::fmt;

/// Time value as found in a trace (release, deadline, start, length).
pub type Time = f64;

// ── Task ──────────────────────────────────────────────────────────────────────

/// A recurring unit of work; every job names the task that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Task {
    id: u32,
}

impl Task {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "τ{}", self.id)
    }
}

// ── Processor ─────────────────────────────────────────────────────────────────

/// An execution resource.  Ids are assigned by the trace and need not be
/// contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Processor {
    id: u32,
}

impl Processor {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.id)
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// A contiguous interval during which a job ran on one processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub processor: u32,
    pub start: Time,
    pub duration: Time,
    /// Fill colour of the rectangle, passed through verbatim to the output.
    pub color: Option<String>,
}

impl Execution {
    pub fn new(processor: u32, start: Time, duration: Time) -> Self {
        Self {
            processor,
            start,
            duration,
            color: None,
        }
    }

    /// Builder-style setter for the fill colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// `start + duration`.
    pub fn end(&self) -> Time {
        self.start + self.duration
    }
}

// ── Job ───────────────────────────────────────────────────────────────────────

/// One activation of a task.
///
/// `release <= start <= end <= deadline` is expected for every execution but
/// not enforced here; the renderer draws whatever the trace says.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub task: u32,
    pub release: Time,
    pub deadline: Time,
    pub executions: Vec<Execution>,
}

impl Job {
    pub fn new(task: u32, release: Time, deadline: Time, executions: Vec<Execution>) -> Self {
        Self {
            task,
            release,
            deadline,
            executions,
        }
    }

    /// Execution with the smallest start time.  On ties the one listed first
    /// wins.  `None` only for a job without executions, which
    /// [`Schedule::add_job`](super::Schedule::add_job) never accepts.
    pub fn first_execution(&self) -> Option<&Execution> {
        self.executions.iter().fold(None, |best, e| match best {
            Some(b) if e.start >= b.start => Some(b),
            _ => Some(e),
        })
    }

    /// Execution with the largest start time.  On ties the one listed first
    /// wins.
    pub fn last_execution(&self) -> Option<&Execution> {
        self.executions.iter().fold(None, |best, e| match best {
            Some(b) if e.start <= b.start => Some(b),
            _ => Some(e),
        })
    }

    /// Earliest execution start.
    pub fn start(&self) -> Option<Time> {
        self.first_execution().map(|e| e.start)
    }

    /// Latest execution end.
    pub fn finish(&self) -> Option<Time> {
        self.executions.iter().map(Execution::end).reduce(Time::max)
    }

    /// Distinct processors this job ran on, ascending.
    pub fn processors(&self) -> BTreeSet<u32> {
        self.executions.iter().map(|e| e.processor).collect()
    }

    /// `true` if the job ran on more than one processor.
    pub fn migrates(&self) -> bool {
        self.processors().len() > 1
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
