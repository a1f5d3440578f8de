//! Schedule entity model.
//!
//! [`Schedule`] owns every [`Job`] of a trace together with the [`Task`]s and
//! [`Processor`]s those jobs reference, and derives the global quantities the
//! layout engine needs (time bounds, counts, row slots).
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Task / processor registry | `BTreeMap<u32, _>` keyed by id; dedup is a map lookup, iteration is ascending id |
//! | Drawing order | Ascending id, independent of the order the trace mentions things |
//! | Derived quantities | Recomputed on every call, nothing cached |
//! | Empty schedule | `start()` / `finish()` / `duration()` return `Err(EmptySchedule)` |
//! | Back-references | None; the layout engine borrows the schedule |
//! | Out-of-window executions | Accepted and drawn; a `warn!` is emitted (see [`sanity`]) |
//!
//! # Example
//! ```rust
//! use rtviz::schedule::{Execution, Job, Schedule};
//!
//! let mut schedule = Schedule::new();
//! schedule
//!     .add_job(Job::new(0, 0.0, 4.0, vec![Execution::new(0, 0.0, 3.0)]))
//!     .unwrap();
//!
//! assert_eq!(schedule.duration().unwrap(), 4.0);
//! assert_eq!(schedule.task_count(), 1);
//! ```

pub mod entity;
pub mod error;
pub mod sanity;

pub use entity::{Execution, Job, Processor, Task, Time};
pub use error::ScheduleError;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use sanity::{window_violations, WindowViolation};

// ── Schedule ──────────────────────────────────────────────────────────────────

/// A parsed trace: jobs in trace order plus the id-keyed task and processor
/// registries.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    jobs: Vec<Job>,
    tasks: BTreeMap<u32, Task>,
    processors: BTreeMap<u32, Processor>,
}

impl Schedule {
    /// Creates a new, empty `Schedule`.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────────

    /// Append `job` and register its task and every processor its executions
    /// run on.  Already-registered ids are left untouched.
    ///
    /// The job is validated first; on error nothing is registered and the
    /// schedule is unchanged.
    ///
    /// # Errors
    /// * [`ScheduleError::NoExecutions`] – the job has an empty execution list.
    /// * [`ScheduleError::NonFinite`] – a time value is NaN or infinite.
    /// * [`ScheduleError::NegativeDuration`] – an execution has length < 0.
    pub fn add_job(&mut self, job: Job) -> Result<(), ScheduleError> {
        Self::validate_job(&job)?;

        let task = Task::new(job.task);
        if !self.tasks.contains_key(&job.task) {
            debug!(%task, "registering task");
            self.tasks.insert(job.task, task);
        }
        for pid in job.processors() {
            if !self.processors.contains_key(&pid) {
                let processor = Processor::new(pid);
                debug!(%processor, "registering processor");
                self.processors.insert(pid, processor);
            }
        }

        for (execution, violation) in window_violations(&job) {
            match violation {
                WindowViolation::StartsBeforeRelease { by } => warn!(
                    %task,
                    processor = %Processor::new(execution.processor),
                    start = execution.start,
                    release = job.release,
                    by,
                    "execution starts before its job's release"
                ),
                WindowViolation::EndsAfterDeadline { by } => warn!(
                    %task,
                    processor = %Processor::new(execution.processor),
                    end = execution.end(),
                    deadline = job.deadline,
                    by,
                    "execution ends after its job's deadline"
                ),
            }
        }

        debug!(
            %task,
            release = job.release,
            deadline = job.deadline,
            executions = job.executions.len(),
            migrates = job.migrates(),
            "job added"
        );
        self.jobs.push(job);
        Ok(())
    }

    fn validate_job(job: &Job) -> Result<(), ScheduleError> {
        let non_finite = |field| ScheduleError::NonFinite {
            task: job.task,
            field,
        };

        if job.executions.is_empty() {
            return Err(ScheduleError::NoExecutions { task: job.task });
        }
        if !job.release.is_finite() {
            return Err(non_finite("release"));
        }
        if !job.deadline.is_finite() {
            return Err(non_finite("deadline"));
        }
        for e in &job.executions {
            if !e.start.is_finite() {
                return Err(non_finite("start"));
            }
            if !e.duration.is_finite() {
                return Err(non_finite("time"));
            }
            if e.duration < 0.0 {
                return Err(ScheduleError::NegativeDuration {
                    task: job.task,
                    duration: e.duration,
                });
            }
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Jobs in insertion (trace) order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Registered tasks, ascending id.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.values()
    }

    /// Registered processors, ascending id.
    pub fn processors(&self) -> impl Iterator<Item = &Processor> + '_ {
        self.processors.values()
    }

    pub fn task(&self, id: u32) -> Result<&Task, ScheduleError> {
        self.tasks.get(&id).ok_or(ScheduleError::UnknownTask(id))
    }

    pub fn processor(&self, id: u32) -> Result<&Processor, ScheduleError> {
        self.processors
            .get(&id)
            .ok_or(ScheduleError::UnknownProcessor(id))
    }

    /// Zero-based rank of task `id` among the registered task ids.
    ///
    /// Equal to the id itself when ids are contiguous from zero.
    pub fn task_slot(&self, id: u32) -> Result<usize, ScheduleError> {
        if !self.tasks.contains_key(&id) {
            return Err(ScheduleError::UnknownTask(id));
        }
        Ok(self.tasks.range(..id).count())
    }

    /// Zero-based rank of processor `id` among the registered processor ids.
    pub fn processor_slot(&self, id: u32) -> Result<usize, ScheduleError> {
        if !self.processors.contains_key(&id) {
            return Err(ScheduleError::UnknownProcessor(id));
        }
        Ok(self.processors.range(..id).count())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Total number of executions over all jobs.
    pub fn execution_count(&self) -> usize {
        self.jobs.iter().map(|j| j.executions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    // ── Derived time bounds ───────────────────────────────────────────────────

    /// Minimum release over all jobs.
    pub fn start(&self) -> Result<Time, ScheduleError> {
        self.jobs
            .iter()
            .map(|j| j.release)
            .reduce(Time::min)
            .ok_or(ScheduleError::EmptySchedule)
    }

    /// Maximum deadline over all jobs.
    pub fn finish(&self) -> Result<Time, ScheduleError> {
        self.jobs
            .iter()
            .map(|j| j.deadline)
            .reduce(Time::max)
            .ok_or(ScheduleError::EmptySchedule)
    }

    /// `finish() - start()`.
    pub fn duration(&self) -> Result<Time, ScheduleError> {
        Ok(self.finish()? - self.start()?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
