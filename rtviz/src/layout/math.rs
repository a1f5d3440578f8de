/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure arithmetic helpers for the time grid.
//!
//! These are free functions rather than methods so they can be used and tested
//! independently of [`Layout`](super::Layout).

/// Largest number of minor ticks one timeline may carry.
///
/// A trace whose duration exceeds this many time units cannot be drawn as a
/// sensible picture; the layout engine rejects it with
/// [`ScheduleError::TooManyTicks`](crate::schedule::ScheduleError::TooManyTicks).
pub const MAX_TICKS: u64 = 100_000;

/// Index of the last tick on an axis covering `duration` time units.
///
/// Ticks run from `0` to `floor(duration)` inclusive.  A negative or
/// non-finite duration yields `None` (no ticks at all).  Durations beyond
/// `u64::MAX` saturate.
pub fn last_tick(duration: f64) -> Option<u64> {
    if !duration.is_finite() || duration < 0.0 {
        return None;
    }
    Some(duration.floor() as u64)
}

/// Number of ticks `0..=floor(duration)`, saturating at `u64::MAX`.
pub fn tick_count(duration: f64) -> u64 {
    last_tick(duration).map_or(0, |last| last.saturating_add(1))
}

/// Tick indices `0..=floor(duration)`, produced lazily.
pub fn minor_tick_indices(duration: f64) -> impl Iterator<Item = u64> {
    last_tick(duration).into_iter().flat_map(|last| 0..=last)
}

/// Every `every`-th tick index starting at zero, up to `floor(duration)`.
///
/// `every == 0` is treated as `1`.
pub fn major_tick_indices(duration: f64, every: u32) -> impl Iterator<Item = u64> {
    let step = every.max(1) as usize;
    minor_tick_indices(duration).step_by(step)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
