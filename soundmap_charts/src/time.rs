// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and formatting.
//!
//! Time is a number of **seconds**. Audio clips in a sample library range from a fraction
//! of a second to hours, so steps go from 100ms up to 12h. Labels look like `0.5`, `12`,
//! `1:05` and `2:03:00`.

use crate::scale::tick_count_between;

const DAY: f64 = 86_400.0;

/// Candidate steps in seconds.
const CLOCK_STEPS: &[f64] = &[
    0.1,
    0.2,
    0.5,
    1.0,
    2.0,
    5.0,
    10.0,
    15.0,
    30.0,
    60.0,
    2.0 * 60.0,
    5.0 * 60.0,
    10.0 * 60.0,
    15.0 * 60.0,
    30.0 * 60.0,
    60.0 * 60.0,
    2.0 * 60.0 * 60.0,
    3.0 * 60.0 * 60.0,
    6.0 * 60.0 * 60.0,
    12.0 * 60.0 * 60.0,
];

/// Tick values for a span of seconds, on the finest clock step yielding at most about `count` ticks.
///
/// Only ticks inside the span are returned, in ascending order.
pub fn nice_time_ticks_seconds(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(start.is_finite() && end.is_finite()) {
        return Vec::new();
    }
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    if lo == hi {
        return vec![lo];
    }
    let Some(step) = clock_step((hi - lo) / count as f64) else {
        return vec![lo, hi];
    };

    let first = (lo / step).ceil() * step;
    let last = (hi / step).floor() * step;
    // Sub-second steps divide instead of multiply so `3 * 0.1` comes out as `0.3`.
    let per_second = if step < 1.0 { (1.0 / step).round() } else { 1.0 };
    (0..=tick_count_between(first, last, step))
        .map(|i| ((first + step * i as f64) * per_second).round() / per_second)
        .filter(|v| (lo - 1e-9..=hi + 1e-9).contains(v))
        .collect()
}

/// Smallest candidate step at least `raw`, falling back to whole days.
fn clock_step(raw: f64) -> Option<f64> {
    if !(raw.is_finite() && raw > 0.0) {
        return None;
    }
    let step = CLOCK_STEPS
        .iter()
        .copied()
        .find(|s| *s >= raw)
        .unwrap_or_else(|| (raw / DAY).ceil().max(1.0) * DAY);
    Some(step)
}

/// Clock-style label for `v` seconds; `step` picks the coarsest unit shown.
pub fn format_time_seconds(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let step = step.abs();
    if step > 0.0 && step < 1.0 && v.abs() < 60.0 {
        // Sub-second steps on short clips: plain decimal seconds.
        return crate::format::format_tick_with_step(v, step);
    }

    let sign = if v.is_sign_negative() && v != 0.0 { "-" } else { "" };
    let secs = {
        let secs_f = v.abs().round().clamp(0.0, i64::MAX as f64);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
        {
            secs_f as i64
        }
    };

    let h = secs / 3600;
    let m = (secs / 60) % 60;
    let s = secs % 60;

    if step >= 3600.0 || h > 0 {
        format!("{sign}{h}:{m:02}:{s:02}")
    } else if step >= 60.0 || m > 0 {
        format!("{sign}{m}:{s:02}")
    } else {
        format!("{sign}{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_spans_get_minute_steps() {
        let ticks = nice_time_ticks_seconds(0.0, 300.0, 5);
        assert!(ticks.len() >= 2);
        let step = (ticks[1] - ticks[0]).abs();
        assert!(step >= 60.0);
    }

    #[test]
    fn short_clips_get_sub_second_ticks_inside_domain() {
        let ticks = nice_time_ticks_seconds(0.0, 1.3, 7);
        let expected = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0, 1.2];
        assert_eq!(ticks.len(), expected.len());
        for (t, e) in ticks.iter().zip(expected) {
            assert!((t - e).abs() < 1e-12, "tick {t} != {e}");
        }
    }

    #[test]
    fn formats_seconds_minutes_hours() {
        assert_eq!(format_time_seconds(5.0, 1.0), "5");
        assert_eq!(format_time_seconds(65.0, 1.0), "1:05");
        assert_eq!(format_time_seconds(3723.0, 60.0), "1:02:03");
        assert_eq!(format_time_seconds(0.5, 0.1), "0.5");
    }
}
