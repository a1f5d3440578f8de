/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use rtviz::config::DiagramConfig;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Real-time scheduling visualiser.
///
/// Example:
///   rtviz -o schedule.tex trace1.json trace2.yaml
#[derive(Debug, Parser)]
#[command(
    name = "rtviz",
    about = "Real-time scheduling visualiser – renders traces as TikZ pictures",
    long_about = None,
)]
struct Cli {
    /// Trace files to render (JSON, or YAML with a .yaml/.yml extension).
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Output file [default: stdout].
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Path to a YAML diagram configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialise structured logging on stderr; stdout carries the diagrams.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        files = cli.files.len(),
        output = ?cli.output,
        config = ?cli.config,
        "Configuration"
    );

    // ── Load diagram configuration ────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => match DiagramConfig::load_from_file(path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load diagram configuration: {:#}", e);
                process::exit(2);
            }
        },
        None => DiagramConfig::default(),
    };

    // ── Open output ───────────────────────────────────────────────────────────
    let mut out = match open_output(cli.output.as_ref()) {
        Ok(w) => w,
        Err(e) => {
            error!("{:#}", e);
            process::exit(2);
        }
    };

    // ── Render each input independently ───────────────────────────────────────
    let failed = match rtviz::render_files(cli.files.as_slice(), &config, &mut out) {
        Ok(n) => n,
        Err(e) => {
            error!("{:#}", e);
            process::exit(2);
        }
    };

    if failed > 0 {
        warn!("{} of {} input(s) failed", failed, cli.files.len());
        process::exit(1);
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(p) => Box::new(
            File::create(p)
                .with_context(|| format!("Cannot create output file: {}", p.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    Ok(BufWriter::new(sink))
}
