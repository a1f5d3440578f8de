//! Drawing-space configuration.
//!
//! [`DiagramConfig`] gathers every scale constant the layout engine uses.  It
//! is an immutable value passed by reference, so several renders with
//! different scales can run side by side.
//!
//! A config file is optional.  The expected YAML structure is:
//! ```yaml
//! arrow_height: 0.75
//! job_height: 0.5
//! proc_vspace: 0.5
//! task_height: 1
//! time_unit: 1
//! major_tick_every: 5
//! ```
//! Every key may be omitted; missing keys keep their default.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

// ── Private YAML deserialization types ────────────────────────────────────────

/// Per-key view of the YAML file.
///
/// Kept private – callers work with [`DiagramConfig`] instead.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiagramConfigFile {
    arrow_height: Option<f64>,
    job_height: Option<f64>,
    proc_vspace: Option<f64>,
    task_height: Option<f64>,
    time_unit: Option<f64>,
    major_tick_every: Option<u32>,
    minor_tick_size: Option<f64>,
    major_tick_size: Option<f64>,
    label_offset: Option<f64>,
    fill_opacity: Option<f64>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Scale constants of the diagram, in abstract drawing units.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig {
    /// Length of the release and deadline arrows.
    pub arrow_height: f64,
    /// Height of an execution rectangle.
    pub job_height: f64,
    /// Vertical gap between two consecutive processor blocks.
    pub proc_vspace: f64,
    /// Height of one task row.
    pub task_height: f64,
    /// Drawing length of one time unit.
    pub time_unit: f64,
    /// Time units between two labelled major ticks.
    pub major_tick_every: u32,
    /// Half-height of a minor tick mark.
    pub minor_tick_size: f64,
    /// Half-height of a major tick mark.
    pub major_tick_size: f64,
    /// Distance of time labels below the reference row.
    pub label_offset: f64,
    /// Opacity of coloured execution rectangles.
    pub fill_opacity: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            arrow_height: 0.75,
            job_height: 0.5,
            proc_vspace: 0.5,
            task_height: 1.0,
            time_unit: 1.0,
            major_tick_every: 5,
            minor_tick_size: 0.05,
            major_tick_size: 0.1,
            label_offset: 0.3,
            fill_opacity: 0.5,
        }
    }
}

impl DiagramConfig {
    /// Parses `path` and returns the resulting configuration.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid or names an unknown key, or a value fails
    /// [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading diagram configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

        debug!(?config, "diagram configuration loaded");
        Ok(config)
    }

    /// Parses a YAML document.  An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: DiagramConfigFile = if content.trim().is_empty() {
            DiagramConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let d = Self::default();
        let config = Self {
            arrow_height: file.arrow_height.unwrap_or(d.arrow_height),
            job_height: file.job_height.unwrap_or(d.job_height),
            proc_vspace: file.proc_vspace.unwrap_or(d.proc_vspace),
            task_height: file.task_height.unwrap_or(d.task_height),
            time_unit: file.time_unit.unwrap_or(d.time_unit),
            major_tick_every: file.major_tick_every.unwrap_or(d.major_tick_every),
            minor_tick_size: file.minor_tick_size.unwrap_or(d.minor_tick_size),
            major_tick_size: file.major_tick_size.unwrap_or(d.major_tick_size),
            label_offset: file.label_offset.unwrap_or(d.label_offset),
            fill_opacity: file.fill_opacity.unwrap_or(d.fill_opacity),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value can produce a drawable diagram.
    ///
    /// `time_unit`, `task_height` and `job_height` must be finite and
    /// strictly positive, `major_tick_every` at least 1, everything else
    /// finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("time_unit", self.time_unit),
            ("task_height", self.task_height),
            ("job_height", self.job_height),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                bail!("'{name}' must be a positive number, got {v}");
            }
        }

        let non_negative = [
            ("arrow_height", self.arrow_height),
            ("proc_vspace", self.proc_vspace),
            ("minor_tick_size", self.minor_tick_size),
            ("major_tick_size", self.major_tick_size),
            ("label_offset", self.label_offset),
            ("fill_opacity", self.fill_opacity),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                bail!("'{name}' must be a non-negative number, got {v}");
            }
        }

        if self.major_tick_every == 0 {
            bail!("'major_tick_every' must be at least 1");
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
