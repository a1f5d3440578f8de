//! Layout engine: maps schedule entities onto drawing coordinates.
//!
//! Every function here is pure.  [`Layout`] borrows the [`Schedule`] it lays
//! out and the [`DiagramConfig`] that scales it.  The schedule's time bounds
//! are resolved once in [`Layout::new`]; the shared borrow keeps the schedule
//! unchanged for as long as the layout lives.
//!
//! # Coordinate system
//!
//! ```text
//!  y
//!  ▲   ┌ processor slot 0 ────────────────────────────┐
//!  │   │ task slot 0   ──┼────┼────┼────┼────┼──────► │  processor_y + n·TASK_HEIGHT
//!  │   │ task slot n-1 ──┼────┼────┼────┼────┼──────► │  processor_y + 1·TASK_HEIGHT
//!  │   └──────────────────────────────────────────────┘
//!  │     PROC_VSPACE
//!  │   ┌ processor slot 1 ────────────────────────────┐
//!  │   │ ...                                          │
//!  └──────────────────────────────────────────────────────► x = (t - start)·TIME_UNIT
//! ```
//!
//! Rows are placed by *slot* (the rank of an id among the registered ids)
//! rather than by the raw id.  For ids numbered `0..n` the two coincide;
//! for sparse ids the slot keeps every row inside its processor block.
//!
//! | Quantity | Source |
//! |-----------|----------|
//! | Scale constants | [`DiagramConfig`], passed by reference |
//! | Time origin | [`Schedule::start`]; `Err(EmptySchedule)` without jobs |
//! | Tick count | `floor(duration) + 1`, at most [`math::MAX_TICKS`] |
//! | Release anchor | row of [`Job::first_execution`] (minimal start) |
//! | Deadline anchor | row of [`Job::last_execution`] (maximal start) |

pub mod math;

use tracing::debug;

use crate::config::DiagramConfig;
use crate::schedule::{Execution, Job, Processor, Schedule, ScheduleError, Task, Time};
use math::{major_tick_indices, minor_tick_indices, MAX_TICKS};

// ── Geometry types ────────────────────────────────────────────────────────────

/// A point in drawing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its lower-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Upper-right corner.
    pub fn corner(&self) -> Point {
        Point::new(self.origin.x + self.width, self.origin.y + self.height)
    }
}

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// A labelled major tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MajorTick {
    /// Drawing x of the tick.
    pub x: f64,
    /// Absolute time printed under the tick, only on the reference row.
    pub label: Option<TimeLabel>,
}

/// A time value printed under a major tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeLabel {
    pub at: Point,
    pub value: Time,
}

/// Geometry of one timeline: the axis of one task on one processor.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGeometry {
    pub task: u32,
    pub processor: u32,
    /// Row the axis is drawn on.
    pub y: f64,
    /// Where the task name is printed, left of the axis.
    pub label_anchor: Point,
    /// Horizontal axis line, drawn with an arrow head at `to`.
    pub line: Segment,
    /// Drawing x of each minor tick.
    pub minor_ticks: Vec<f64>,
    pub major_ticks: Vec<MajorTick>,
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Start and length of the drawn time window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeBounds {
    start: Time,
    duration: Time,
}

/// Read-only view of a schedule in drawing space.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    schedule: &'a Schedule,
    config: &'a DiagramConfig,
    /// `None` for a schedule without jobs.
    bounds: Option<TimeBounds>,
}

impl<'a> Layout<'a> {
    pub fn new(schedule: &'a Schedule, config: &'a DiagramConfig) -> Self {
        let bounds = match (schedule.start(), schedule.duration()) {
            (Ok(start), Ok(duration)) => Some(TimeBounds { start, duration }),
            _ => None,
        };
        Self {
            schedule,
            config,
            bounds,
        }
    }

    pub fn schedule(&self) -> &'a Schedule {
        self.schedule
    }

    pub fn config(&self) -> &'a DiagramConfig {
        self.config
    }

    fn bounds(&self) -> Result<TimeBounds, ScheduleError> {
        self.bounds.ok_or(ScheduleError::EmptySchedule)
    }

    /// Time origin of the drawing, [`Schedule::start`].
    pub fn start(&self) -> Result<Time, ScheduleError> {
        Ok(self.bounds()?.start)
    }

    /// Length of the drawn time window, [`Schedule::duration`].
    pub fn duration(&self) -> Result<Time, ScheduleError> {
        Ok(self.bounds()?.duration)
    }

    // ── Horizontal ────────────────────────────────────────────────────────────

    /// `(time - start) * time_unit`.
    pub fn x(&self, time: Time) -> Result<f64, ScheduleError> {
        Ok((time - self.start()?) * self.config.time_unit)
    }

    /// Length of a timeline axis: `(duration + 1) * time_unit`.
    pub fn timeline_width(&self) -> Result<f64, ScheduleError> {
        Ok((self.duration()? + 1.0) * self.config.time_unit)
    }

    /// Minor ticks on every timeline.
    ///
    /// # Errors
    /// [`ScheduleError::EmptySchedule`] without jobs, or
    /// [`ScheduleError::TooManyTicks`] when the count exceeds [`MAX_TICKS`].
    pub fn tick_count(&self) -> Result<u64, ScheduleError> {
        let ticks = math::tick_count(self.duration()?);
        if ticks > MAX_TICKS {
            return Err(ScheduleError::TooManyTicks {
                ticks,
                limit: MAX_TICKS,
            });
        }
        Ok(ticks)
    }

    // ── Vertical ──────────────────────────────────────────────────────────────

    /// Height of one processor block: one row per task plus the gap.
    pub fn processor_height(&self) -> f64 {
        self.config.task_height * self.schedule.task_count() as f64 + self.config.proc_vspace
    }

    /// Base of the block of processor `id`; higher ids sit lower.
    pub fn processor_y(&self, id: u32) -> Result<f64, ScheduleError> {
        let slot = self.schedule.processor_slot(id)?;
        let n = self.schedule.processor_count();
        Ok((n - slot) as f64 * self.processor_height())
    }

    /// Row of task `task` inside the block of processor `processor`; higher
    /// task ids sit nearer the block's base.
    pub fn task_y(&self, task: u32, processor: u32) -> Result<f64, ScheduleError> {
        let slot = self.schedule.task_slot(task)?;
        let n = self.schedule.task_count();
        Ok(self.processor_y(processor)? + (n - slot) as f64 * self.config.task_height)
    }

    // ── Jobs ──────────────────────────────────────────────────────────────────

    /// Rectangle of one execution of `job`, sitting on the row of the job's
    /// task on the execution's processor.
    pub fn execution_rect(&self, job: &Job, execution: &Execution) -> Result<Rect, ScheduleError> {
        Ok(Rect {
            origin: Point::new(
                self.x(execution.start)?,
                self.task_y(job.task, execution.processor)?,
            ),
            width: execution.duration * self.config.time_unit,
            height: self.config.job_height,
        })
    }

    /// Release arrow of `job`: upward, from the row of its first execution.
    pub fn release_arrow(&self, job: &Job) -> Result<Segment, ScheduleError> {
        let first = job
            .first_execution()
            .ok_or(ScheduleError::NoExecutions { task: job.task })?;
        self.vertical_arrow(job.release, job.task, first.processor)
    }

    /// Deadline arrow of `job`: anchored on the row of its last execution.
    ///
    /// The segment runs upward like the release arrow; the arrow head is put
    /// on the anchored end by the renderer.
    pub fn deadline_arrow(&self, job: &Job) -> Result<Segment, ScheduleError> {
        let last = job
            .last_execution()
            .ok_or(ScheduleError::NoExecutions { task: job.task })?;
        self.vertical_arrow(job.deadline, job.task, last.processor)
    }

    fn vertical_arrow(&self, time: Time, task: u32, processor: u32) -> Result<Segment, ScheduleError> {
        let x = self.x(time)?;
        let y = self.task_y(task, processor)?;
        Ok(Segment {
            from: Point::new(x, y),
            to: Point::new(x, y + self.config.arrow_height),
        })
    }

    // ── Timelines ─────────────────────────────────────────────────────────────

    /// Task whose rows carry the time labels: the highest registered id.
    pub fn reference_task(&self) -> Option<u32> {
        self.schedule.tasks().last().map(|t| t.id())
    }

    /// Axis of `task` on `processor`.
    pub fn axis(&self, task: u32, processor: u32) -> Result<AxisGeometry, ScheduleError> {
        let cfg = self.config;
        let y = self.task_y(task, processor)?;
        self.tick_count()?;
        let TimeBounds { start, duration } = self.bounds()?;
        let labelled = self.reference_task() == Some(task);

        let minor_ticks = minor_tick_indices(duration)
            .map(|k| k as f64 * cfg.time_unit)
            .collect();

        let major_ticks = major_tick_indices(duration, cfg.major_tick_every)
            .map(|k| {
                let x = k as f64 * cfg.time_unit;
                MajorTick {
                    x,
                    label: labelled.then(|| TimeLabel {
                        at: Point::new(x, y - cfg.label_offset),
                        value: start + k as f64,
                    }),
                }
            })
            .collect();

        let axis = AxisGeometry {
            task,
            processor,
            y,
            label_anchor: Point::new(-cfg.time_unit / 2.0, y + cfg.task_height / 2.0),
            line: Segment {
                from: Point::new(-cfg.time_unit, y),
                to: Point::new(self.timeline_width()?, y),
            },
            minor_ticks,
            major_ticks,
        };
        debug!(
            task = %Task::new(task),
            processor = %Processor::new(processor),
            y,
            labelled,
            "axis laid out"
        );
        Ok(axis)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
