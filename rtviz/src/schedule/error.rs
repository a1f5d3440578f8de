/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for the schedule entity model and the layout engine.
//!
//! Three failure layers are folded into one enum:
//!
//! * Malformed job input, rejected by [`Schedule::add_job`] before anything
//!   is registered (`NoExecutions`, `NonFinite`, `NegativeDuration`).
//! * Degenerate schedule: time bounds requested on a schedule without jobs
//!   (`EmptySchedule`), or a schedule too long to lay out a time grid for
//!   (`TooManyTicks`).
//! * Unresolvable entity references: a layout query names a task or
//!   processor id that was never registered (`UnknownTask`,
//!   `UnknownProcessor`).
//!
//! [`ScheduleError::InvalidJob`] wraps a malformed-job variant with the index
//! of the offending record when a whole trace is turned into a schedule.
//!
//! [`Schedule::add_job`]: super::Schedule::add_job

use thiserror::Error;

/// Error returned by the entity model, the layout engine and the drawer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// `start()` / `finish()` / `duration()` called on a schedule with no
    /// jobs.  There is no minimum release to measure time from.
    #[error("schedule is empty: time bounds are undefined without jobs")]
    EmptySchedule,

    /// A job of task `task` carries an empty execution list.
    #[error("job of task {task} has no executions")]
    NoExecutions { task: u32 },

    /// A time value of a job of task `task` is NaN or infinite.
    #[error("job of task {task}: field '{field}' is not a finite number")]
    NonFinite { task: u32, field: &'static str },

    /// An execution of a job of task `task` has a negative length.
    #[error("job of task {task} has an execution with negative duration {duration}")]
    NegativeDuration { task: u32, duration: f64 },

    /// The schedule spans more time units than a timeline can carry ticks
    /// for.  `ticks` saturates at `u64::MAX`.
    #[error("schedule needs {ticks} ticks per timeline, more than the limit of {limit}")]
    TooManyTicks { ticks: u64, limit: u64 },

    /// A task id was looked up that the schedule never registered.
    #[error("unknown task {0}")]
    UnknownTask(u32),

    /// A processor id was looked up that the schedule never registered.
    #[error("unknown processor {0}")]
    UnknownProcessor(u32),

    /// Record `index` of a trace (zero-based, trace order) was rejected.
    #[error("job #{index}: {source}")]
    InvalidJob {
        index: usize,
        #[source]
        source: Box<ScheduleError>,
    },
}
