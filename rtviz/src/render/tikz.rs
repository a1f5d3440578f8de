/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! TikZ surface syntax for [`Diagram`] primitives.
//!
//! One primitive per line, indented two spaces, inside a single
//! `tikzpicture` environment.  The output is meant to be `\input` into a
//! LaTeX document that loads the `tikz` package.

use std::fmt::{self, Write};

use super::{ArrowKind, Diagram, LabelText, Primitive};
use crate::layout::Point;

const BEGIN: &str = r"\begin{tikzpicture}";
const END: &str = r"\end{tikzpicture}";

/// Write `diagram` as a complete `tikzpicture` environment.  No newline is
/// written after the closing marker.
pub fn write_diagram<W: Write>(out: &mut W, diagram: &Diagram) -> fmt::Result {
    writeln!(out, "{BEGIN}")?;
    for primitive in diagram.primitives() {
        write_primitive(out, primitive)?;
    }
    write!(out, "{END}")
}

/// Write one primitive, including its trailing newline.
pub fn write_primitive<W: Write>(out: &mut W, primitive: &Primitive) -> fmt::Result {
    match primitive {
        Primitive::Comment(text) => writeln!(out, "  % {text}"),

        Primitive::Label { at, text } => {
            writeln!(out, r"  \node at {} {{{}}};", point(*at), label(text))
        }

        Primitive::Axis(line) => {
            writeln!(out, r"  \draw[->] {} -- {};", point(line.from), point(line.to))
        }

        Primitive::TickSet { xs, y, half_height } => {
            let list = xs.iter().map(|x| num(*x)).collect::<Vec<_>>().join(",");
            writeln!(out, r"  \foreach \x in {{{list}}}{{")?;
            writeln!(
                out,
                r"    \draw (\x,{}) -- (\x,{});",
                num(y + half_height),
                num(y - half_height)
            )?;
            writeln!(out, "  }}")
        }

        Primitive::Tick { x, y, half_height } => writeln!(
            out,
            r"  \draw {} -- {};",
            point(Point::new(*x, y + half_height)),
            point(Point::new(*x, y - half_height))
        ),

        Primitive::Rectangle { rect, fill } => {
            out.write_str(r"  \draw")?;
            if let Some(fill) = fill {
                write!(
                    out,
                    "[fill={}, fill opacity={}]",
                    fill.color,
                    num(fill.opacity)
                )?;
            }
            writeln!(
                out,
                " {} rectangle {};",
                point(rect.origin),
                point(rect.corner())
            )
        }

        Primitive::Arrow { kind, segment } => {
            let tip = match kind {
                ArrowKind::Release => "->",
                ArrowKind::Deadline => "<-",
            };
            writeln!(
                out,
                r"  \draw[{tip}] {} -- {};",
                point(segment.from),
                point(segment.to)
            )
        }
    }
}

fn label(text: &LabelText) -> String {
    match text {
        LabelText::Task(id) => format!(r"$\tau_{{{id}}}$"),
        LabelText::Time(t) => num(*t),
    }
}

fn point(p: Point) -> String {
    format!("({},{})", num(p.x), num(p.y))
}

/// Shortest round-tripping decimal; integral values print without a
/// fractional part and negative zero prints as `0`.
fn num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    v.to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
