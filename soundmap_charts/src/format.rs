// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric tick label formatting.

/// Formats `v` with just enough decimals to tell ticks `step` apart.
///
/// A zero or non-finite step falls back to the shortest round-trip representation.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return format!("{v}");
    }
    let decimals = {
        let d = (-step.log10() - 1e-9).ceil().clamp(0.0, 10.0);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to 0..=10")]
        {
            d as usize
        }
    };
    let out = format!("{v:.decimals$}");
    // Avoid printing `-0` / `-0.00` for values that round to zero.
    if out.starts_with('-') && out[1..].chars().all(|c| c == '0' || c == '.') {
        return out[1..].to_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_step() {
        assert_eq!(format_tick_with_step(2.0, 1.0), "2");
        assert_eq!(format_tick_with_step(2.5, 0.5), "2.5");
        assert_eq!(format_tick_with_step(0.25, 0.05), "0.25");
        assert_eq!(format_tick_with_step(1200.0, 200.0), "1200");
    }

    #[test]
    fn negative_zero_is_unsigned() {
        assert_eq!(format_tick_with_step(-0.0001, 0.1), "0.0");
    }
}
