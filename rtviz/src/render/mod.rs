//! Diagram emission.
//!
//! [`ScheduleDrawer`] walks a [`Schedule`] and produces a [`Diagram`]: the
//! ordered list of drawing [`Primitive`]s that reproduce the chart.  The
//! concrete markup is a separate concern; [`tikz`] writes the primitives as a
//! TikZ picture and is what `Diagram`'s `Display` uses.
//!
//! # Emission order
//!
//! ```text
//! for processor in ascending id:
//!     for task in ascending id:          ← every task, even if it never ran there
//!         comment, task label, axis, minor ticks, major ticks (+ time labels)
//! for job in trace order:
//!     one rectangle per execution, release arrow, deadline arrow
//! ```
//!
//! Drawing is a pure function of the schedule: rendering the same schedule
//! twice yields identical primitives and identical text.

pub mod tikz;

use std::fmt;

use tracing::{debug, info};

use crate::config::DiagramConfig;
use crate::layout::{Layout, Point, Rect, Segment};
use crate::schedule::{Job, Schedule, ScheduleError, Task, Time};

// ── Primitives ────────────────────────────────────────────────────────────────

/// Which end of a job an arrow marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    /// Head at the far end, pointing up away from the row.
    Release,
    /// Head at the row end, pointing down onto the row.
    Deadline,
}

/// Text of a label primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelText {
    /// Name of a task, printed left of its timeline.
    Task(u32),
    /// Absolute time under a major tick.
    Time(Time),
}

/// Fill of a coloured execution rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Free-form annotation, invisible in the rendered picture.
    Comment(String),
    Label { at: Point, text: LabelText },
    /// Horizontal timeline axis with an arrow head at `to`.
    Axis(Segment),
    /// Identical minor tick marks at each `x`, centred on row `y`.
    TickSet {
        xs: Vec<f64>,
        y: f64,
        half_height: f64,
    },
    /// One major tick mark.
    Tick { x: f64, y: f64, half_height: f64 },
    /// Execution rectangle; `fill` is `None` for default styling.
    Rectangle { rect: Rect, fill: Option<Fill> },
    Arrow { kind: ArrowKind, segment: Segment },
}

// ── Diagram ───────────────────────────────────────────────────────────────────

/// The full, ordered primitive sequence of one schedule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    primitives: Vec<Primitive>,
}

impl Diagram {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Number of execution rectangles.
    pub fn rectangle_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Rectangle { .. }))
            .count()
    }

    /// Number of release and deadline arrows (axes are not counted).
    pub fn arrow_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Arrow { .. }))
            .count()
    }

    /// Number of arrows of one kind.
    pub fn arrow_count_of(&self, kind: ArrowKind) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Arrow { kind: k, .. } if *k == kind))
            .count()
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        tikz::write_diagram(f, self)
    }
}

// ── ScheduleDrawer ────────────────────────────────────────────────────────────

/// Serialises a schedule into a [`Diagram`].
#[derive(Debug, Clone, Copy)]
pub struct ScheduleDrawer<'a> {
    layout: Layout<'a>,
}

impl<'a> ScheduleDrawer<'a> {
    pub fn new(schedule: &'a Schedule, config: &'a DiagramConfig) -> Self {
        Self {
            layout: Layout::new(schedule, config),
        }
    }

    pub fn layout(&self) -> &Layout<'a> {
        &self.layout
    }

    /// Draw the whole schedule.
    ///
    /// # Errors
    /// [`ScheduleError::EmptySchedule`] if the schedule has no jobs,
    /// [`ScheduleError::TooManyTicks`] if it spans too long a time window, or
    /// an unknown-entity error if a job references an unregistered id.
    pub fn draw(&self) -> Result<Diagram, ScheduleError> {
        let schedule = self.layout.schedule();
        // Fail before emitting anything.
        self.layout.tick_count()?;

        let mut primitives = Vec::new();
        for processor in schedule.processors() {
            primitives.extend(self.timelines(processor.id())?);
        }
        for job in schedule.jobs() {
            primitives.extend(self.job(job)?);
        }

        let diagram = Diagram { primitives };
        info!(
            processors = schedule.processor_count(),
            tasks = schedule.task_count(),
            jobs = schedule.job_count(),
            primitives = diagram.len(),
            "schedule drawn"
        );
        Ok(diagram)
    }

    /// One timeline per registered task on `processor`.
    pub fn timelines(&self, processor: u32) -> Result<Vec<Primitive>, ScheduleError> {
        let mut out = Vec::new();
        for task in self.layout.schedule().tasks() {
            out.extend(self.timeline(task.id(), processor)?);
        }
        Ok(out)
    }

    /// Axis, ticks and labels of `task` on `processor`.
    pub fn timeline(&self, task: u32, processor: u32) -> Result<Vec<Primitive>, ScheduleError> {
        let cfg = self.layout.config();
        let axis = self.layout.axis(task, processor)?;

        let mut out = vec![
            Primitive::Comment(format!("task {task} on processor {processor}")),
            Primitive::Label {
                at: axis.label_anchor,
                text: LabelText::Task(task),
            },
            Primitive::Axis(axis.line),
            Primitive::TickSet {
                xs: axis.minor_ticks,
                y: axis.y,
                half_height: cfg.minor_tick_size,
            },
        ];
        for tick in axis.major_ticks {
            out.push(Primitive::Tick {
                x: tick.x,
                y: axis.y,
                half_height: cfg.major_tick_size,
            });
            if let Some(label) = tick.label {
                out.push(Primitive::Label {
                    at: label.at,
                    text: LabelText::Time(label.value),
                });
            }
        }
        Ok(out)
    }

    /// Rectangles of every execution of `job`, then its release and deadline
    /// arrows.
    pub fn job(&self, job: &Job) -> Result<Vec<Primitive>, ScheduleError> {
        let cfg = self.layout.config();

        // Resolve arrows first so a bad job emits nothing.
        let release = self.layout.release_arrow(job)?;
        let deadline = self.layout.deadline_arrow(job)?;

        let mut out = Vec::with_capacity(job.executions.len() + 2);
        for execution in &job.executions {
            let rect = self.layout.execution_rect(job, execution)?;
            let fill = execution.color.as_ref().map(|color| Fill {
                color: color.clone(),
                opacity: cfg.fill_opacity,
            });
            out.push(Primitive::Rectangle { rect, fill });
        }
        out.push(Primitive::Arrow {
            kind: ArrowKind::Release,
            segment: release,
        });
        out.push(Primitive::Arrow {
            kind: ArrowKind::Deadline,
            segment: deadline,
        });

        debug!(
            task = %Task::new(job.task),
            release = job.release,
            deadline = job.deadline,
            rectangles = job.executions.len(),
            "job drawn"
        );
        Ok(out)
    }
}

/// Draw `schedule` with `config` and return the TikZ text.
pub fn render_tikz(schedule: &Schedule, config: &DiagramConfig) -> Result<String, ScheduleError> {
    Ok(ScheduleDrawer::new(schedule, config).draw()?.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Execution;

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn schedule_of(jobs: Vec<Job>) -> Schedule {
        let mut s = Schedule::new();
        for job in jobs {
            s.add_job(job).unwrap();
        }
        s
    }

    fn scenario_a() -> Schedule {
        schedule_of(vec![Job::new(
            0,
            0.0,
            4.0,
            vec![Execution::new(0, 0.0, 3.0)],
        )])
    }

    fn busy_schedule() -> Schedule {
        schedule_of(vec![
            Job::new(0, 0.0, 5.0, vec![Execution::new(0, 0.0, 2.0)]),
            Job::new(
                1,
                0.0,
                10.0,
                vec![
                    Execution::new(0, 2.0, 1.0).with_color("blue"),
                    Execution::new(1, 4.0, 2.0),
                    Execution::new(0, 7.0, 1.0),
                ],
            ),
            Job::new(2, 3.0, 12.0, vec![Execution::new(1, 6.0, 3.0).with_color("red")]),
        ])
    }

    fn arrows(d: &Diagram) -> Vec<(ArrowKind, Segment)> {
        d.primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Arrow { kind, segment } => Some((*kind, *segment)),
                _ => None,
            })
            .collect()
    }

    fn rects(d: &Diagram) -> Vec<(Rect, Option<Fill>)> {
        d.primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Rectangle { rect, fill } => Some((*rect, fill.clone())),
                _ => None,
            })
            .collect()
    }

    // ── Scenario A: single job ────────────────────────────────────────────────

    #[test]
    fn scenario_a_primitives() {
        let s = scenario_a();
        let cfg = DiagramConfig::default();
        let d = ScheduleDrawer::new(&s, &cfg).draw().unwrap();

        let axes: Vec<&Primitive> = d
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::Axis(_)))
            .collect();
        assert_eq!(axes.len(), 1, "one timeline for task 0 on processor 0");

        let ticks = d.primitives().iter().find_map(|p| match p {
            Primitive::TickSet { xs, .. } => Some(xs.clone()),
            _ => None,
        });
        assert_eq!(ticks, Some(vec![0.0, 1.0, 2.0, 3.0, 4.0]));

        let r = rects(&d);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].0.origin.x, 0.0);
        assert_eq!(r[0].0.width, 3.0);
        assert!(r[0].1.is_none());

        let a = arrows(&d);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].0, ArrowKind::Release);
        assert_eq!(a[0].1.from.x, 0.0);
        assert_eq!(a[1].0, ArrowKind::Deadline);
        assert_eq!(a[1].1.from.x, 4.0);
    }

    #[test]
    fn scenario_a_tikz_text() {
        let s = scenario_a();
        let text = render_tikz(&s, &DiagramConfig::default()).unwrap();
        let expected = r"\begin{tikzpicture}
  % task 0 on processor 0
  \node at (-0.5,3) {$\tau_{0}$};
  \draw[->] (-1,2.5) -- (5,2.5);
  \foreach \x in {0,1,2,3,4}{
    \draw (\x,2.55) -- (\x,2.45);
  }
  \draw (0,2.6) -- (0,2.4);
  \node at (0,2.2) {0};
  \draw (0,2.5) rectangle (3,3);
  \draw[->] (0,2.5) -- (0,3.25);
  \draw[<-] (4,2.5) -- (4,3.25);
\end{tikzpicture}";
        assert_eq!(text, expected);
    }

    // ── Scenario B: migration ─────────────────────────────────────────────────

    #[test]
    fn migrating_job_anchors_arrows_on_endpoint_rows() {
        let s = schedule_of(vec![Job::new(
            0,
            0.0,
            8.0,
            vec![Execution::new(1, 5.0, 2.0), Execution::new(0, 1.0, 2.0)],
        )]);
        let cfg = DiagramConfig::default();
        let drawer = ScheduleDrawer::new(&s, &cfg);
        let d = drawer.draw().unwrap();

        assert_eq!(d.rectangle_count(), 2);
        let a = arrows(&d);
        let p0_row = drawer.layout().task_y(0, 0).unwrap();
        let p1_row = drawer.layout().task_y(0, 1).unwrap();
        assert_ne!(p0_row, p1_row);
        // earliest start (1.0) ran on P0, latest start (5.0) on P1
        assert_eq!(a[0].1.from.y, p0_row);
        assert_eq!(a[1].1.from.y, p1_row);
    }

    // ── Scenario C: empty schedule ────────────────────────────────────────────

    #[test]
    fn empty_schedule_cannot_be_drawn() {
        let s = Schedule::new();
        let err = render_tikz(&s, &DiagramConfig::default()).unwrap_err();
        assert_eq!(err, ScheduleError::EmptySchedule);
    }

    #[test]
    fn far_deadline_is_an_error_not_a_panic() {
        let s = schedule_of(vec![Job::new(
            0,
            0.0,
            1e20,
            vec![Execution::new(0, 0.0, 1.0)],
        )]);
        let err = render_tikz(&s, &DiagramConfig::default()).unwrap_err();
        assert!(matches!(err, ScheduleError::TooManyTicks { .. }));
    }

    // ── Scenario D: colours ───────────────────────────────────────────────────

    #[test]
    fn coloured_executions_carry_fill() {
        let s = busy_schedule();
        let cfg = DiagramConfig::default();
        let d = ScheduleDrawer::new(&s, &cfg).draw().unwrap();
        let fills: Vec<Option<String>> = rects(&d)
            .into_iter()
            .map(|(_, f)| f.map(|f| f.color))
            .collect();
        assert_eq!(
            fills,
            vec![
                None,
                Some("blue".to_string()),
                None,
                None,
                Some("red".to_string())
            ]
        );

        let text = d.to_string();
        assert!(text.contains(r"\draw[fill=blue, fill opacity=0.5] (2,"));
        assert!(text.contains(r"\draw[fill=red, fill opacity=0.5] (6,"));
        assert!(text.contains(r"\draw (0,"));
    }

    // ── Shape properties ──────────────────────────────────────────────────────

    #[test]
    fn counts_match_schedule() {
        let s = busy_schedule();
        let cfg = DiagramConfig::default();
        let d = ScheduleDrawer::new(&s, &cfg).draw().unwrap();

        assert_eq!(d.rectangle_count(), s.execution_count());
        assert_eq!(d.arrow_count(), 2 * s.job_count());
        assert_eq!(d.arrow_count_of(ArrowKind::Release), s.job_count());
        assert_eq!(d.arrow_count_of(ArrowKind::Deadline), s.job_count());

        let axes = d
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::Axis(_)))
            .count();
        // a full grid: every task on every processor
        assert_eq!(axes, s.task_count() * s.processor_count());
    }

    #[test]
    fn rendering_is_idempotent() {
        let s = busy_schedule();
        let cfg = DiagramConfig::default();
        let first = render_tikz(&s, &cfg).unwrap();
        let second = render_tikz(&s, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn timelines_come_before_jobs_in_id_order() {
        // Trace mentions P1 and task 2 first; drawing order is still by id.
        let s = schedule_of(vec![
            Job::new(2, 0.0, 3.0, vec![Execution::new(1, 0.0, 1.0)]),
            Job::new(0, 0.0, 3.0, vec![Execution::new(0, 1.0, 1.0)]),
        ]);
        let cfg = DiagramConfig::default();
        let d = ScheduleDrawer::new(&s, &cfg).draw().unwrap();

        let comments: Vec<&str> = d
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Comment(c) => Some(c.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            comments,
            vec![
                "task 0 on processor 0",
                "task 2 on processor 0",
                "task 0 on processor 1",
                "task 2 on processor 1",
            ]
        );

        let first_rect = d
            .primitives()
            .iter()
            .position(|p| matches!(p, Primitive::Rectangle { .. }))
            .unwrap();
        let last_axis = d
            .primitives()
            .iter()
            .rposition(|p| matches!(p, Primitive::Axis(_)))
            .unwrap();
        assert!(last_axis < first_rect);
    }

    #[test]
    fn time_labels_only_on_reference_rows() {
        let s = busy_schedule();
        let cfg = DiagramConfig::default();
        let drawer = ScheduleDrawer::new(&s, &cfg);

        let labels = |task, proc| {
            drawer
                .timeline(task, proc)
                .unwrap()
                .into_iter()
                .filter(|p| {
                    matches!(
                        p,
                        Primitive::Label {
                            text: LabelText::Time(_),
                            ..
                        }
                    )
                })
                .count()
        };
        // duration 12 → major ticks at 0, 5, 10
        assert_eq!(labels(2, 0), 3);
        assert_eq!(labels(2, 1), 3);
        assert_eq!(labels(0, 0), 0);
        assert_eq!(labels(1, 1), 0);
    }

    #[test]
    fn unregistered_job_is_an_unknown_entity() {
        let s = scenario_a();
        let cfg = DiagramConfig::default();
        let drawer = ScheduleDrawer::new(&s, &cfg);
        let stray = Job::new(0, 0.0, 1.0, vec![Execution::new(7, 0.0, 1.0)]);
        assert_eq!(
            drawer.job(&stray).unwrap_err(),
            ScheduleError::UnknownProcessor(7)
        );
    }
}
