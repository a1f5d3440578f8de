/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rtviz – real-time scheduling trace visualiser
//!
//! Turns a trace of jobs executing on processors into a TikZ picture of the
//! classic real-time Gantt chart: one timeline per task per processor, job
//! executions as rectangles, releases and deadlines as vertical arrows.
//!
//! ```text
//! lib.rs
//! ├── trace/          – JSON / YAML trace records and file loading
//! ├── schedule/       – entity model (tasks, processors, jobs, executions)
//! ├── config/         – drawing-space constants, optional YAML file
//! ├── layout/         – pure coordinate functions
//! └── render/         – primitive emission + TikZ surface syntax
//! ```
//!
//! # Example
//! ```rust
//! use rtviz::config::DiagramConfig;
//! use rtviz::render::render_tikz;
//! use rtviz::trace::{parse_trace, TraceFormat};
//!
//! let json = r#"{ "job": [ { "release": 0, "deadline": 4, "task": 0,
//!     "executions": [ { "processor": 0, "start": 0, "time": 3 } ] } ] }"#;
//!
//! let schedule = parse_trace(json, TraceFormat::Json)?.into_schedule()?;
//! let tikz = render_tikz(&schedule, &DiagramConfig::default())?;
//! assert!(tikz.starts_with(r"\begin{tikzpicture}"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod layout;
pub mod render;
pub mod schedule;
pub mod trace;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info};

use config::DiagramConfig;

/// Load the trace at `path` and render it as TikZ text.
pub fn render_file(path: &Path, config: &DiagramConfig) -> Result<String> {
    let schedule = trace::load_schedule(path)?;
    render::render_tikz(&schedule, config)
        .with_context(|| format!("Cannot draw schedule of: {}", path.display()))
}

/// Render every trace in `paths` to `out`, in order, one picture per line
/// block.
///
/// A trace that fails to load or draw is logged and skipped; the remaining
/// traces are still rendered.  `out` is flushed before returning.
///
/// Returns the number of traces that failed.
///
/// # Errors
/// Only a failure to write or flush `out` is returned.
pub fn render_files<P, W>(paths: &[P], config: &DiagramConfig, out: &mut W) -> Result<usize>
where
    P: AsRef<Path>,
    W: Write,
{
    let mut failed = 0usize;
    for path in paths {
        let path = path.as_ref();
        match render_file(path, config) {
            Ok(text) => {
                writeln!(out, "{text}").context("Cannot write output")?;
                info!("Rendered {}", path.display());
            }
            Err(e) => {
                failed += 1;
                error!("Skipping {}: {:#}", path.display(), e);
            }
        }
    }
    out.flush().context("Cannot flush output")?;
    Ok(failed)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
