// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous scales.
//!
//! A scale is split into a *spec* (domain plus options, no range yet) and an instance
//! produced once the pixel range is known. Views rebuild instances on every resize; the
//! spec stays fixed for the lifetime of a dataset.

use crate::time;

/// Upper bound on generated ticks for a single axis.
const MAX_TICKS: f64 = 10_000.0;

/// Interpolates `t` along `(a, b)`.
fn lerp((a, b): (f64, f64), t: f64) -> f64 {
    a + t * (b - a)
}

/// Position of `v` along `(a, b)` as a fraction, or `None` if the interval is empty.
fn fraction((a, b): (f64, f64), v: f64) -> Option<f64> {
    let width = b - a;
    (width != 0.0).then(|| (v - a) / width)
}

/// Orders `(a, b)` ascending, or `None` if either end is not finite.
fn ordered((a, b): (f64, f64)) -> Option<(f64, f64)> {
    (a.is_finite() && b.is_finite()).then(|| if a <= b { (a, b) } else { (b, a) })
}

/// Either kind of scale before a range is attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleSpec {
    /// Numbers in data units.
    Linear(ScaleLinearSpec),
    /// Seconds, ticked on clock boundaries.
    Time(ScaleTimeSpec),
}

impl From<ScaleLinearSpec> for ScaleSpec {
    fn from(spec: ScaleLinearSpec) -> Self {
        Self::Linear(spec)
    }
}

impl From<ScaleTimeSpec> for ScaleSpec {
    fn from(spec: ScaleTimeSpec) -> Self {
        Self::Time(spec)
    }
}

impl ScaleSpec {
    /// Attaches `range`; a linear spec with `nice` set widens its domain to `tick_count` ticks.
    pub fn instantiate(&self, range: (f64, f64), tick_count: usize) -> ScaleContinuous {
        match self {
            Self::Linear(spec) => {
                ScaleContinuous::Linear(spec.instantiate_resolved(range, tick_count))
            }
            Self::Time(spec) => ScaleContinuous::Time(spec.instantiate(range)),
        }
    }
}

/// A scale with both domain and range known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleContinuous {
    /// See [`ScaleLinear`].
    Linear(ScaleLinear),
    /// See [`ScaleTime`].
    Time(ScaleTime),
}

impl ScaleContinuous {
    fn as_linear(&self) -> &ScaleLinear {
        match self {
            Self::Linear(scale) => scale,
            Self::Time(scale) => &scale.inner,
        }
    }

    /// Domain value to range value.
    pub fn map(&self, x: f64) -> f64 {
        self.as_linear().map(x)
    }

    /// Range value to domain value.
    pub fn invert(&self, y: f64) -> f64 {
        self.as_linear().invert(y)
    }

    /// Tick values in domain units, using the rules of the underlying scale kind.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(scale) => scale.ticks(count),
            Self::Time(scale) => scale.ticks(count),
        }
    }
}

/// Affine map between two intervals. Either interval may be reversed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Maps `domain` onto `range`, endpoint to endpoint.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain value to range value. An empty domain sends everything to `range.0`.
    pub fn map(&self, x: f64) -> f64 {
        fraction(self.domain, x).map_or(self.range.0, |t| lerp(self.range, t))
    }

    /// Range value to domain value. An empty range sends everything to `domain.0`.
    pub fn invert(&self, y: f64) -> f64 {
        fraction(self.range, y).map_or(self.domain.0, |t| lerp(self.domain, t))
    }

    /// The domain, in the order it was given.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The range, in the order it was given.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Round tick values covering the domain; the outer ticks may lie just outside it.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        round_ticks(self.domain, count)
    }
}

/// A linear scale waiting for its range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Data-unit interval.
    pub domain: (f64, f64),
    /// Snap the domain outward to the outermost round ticks.
    pub nice: bool,
}

impl ScaleLinearSpec {
    /// A spec over `domain` with `nice` off.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Sets [`nice`](Self::nice).
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// The domain the instance will use, keeping the authored direction.
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let ticks = round_ticks(self.domain, tick_count);
        let [first, .., last] = ticks.as_slice() else {
            return self.domain;
        };
        if self.domain.0 <= self.domain.1 {
            (*first, *last)
        } else {
            (*last, *first)
        }
    }

    /// Attaches `range` to the authored domain, ignoring `nice`.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.domain, range)
    }

    /// Attaches `range` to [`resolved_domain`](Self::resolved_domain).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

/// Multiples of a 1/2/5 step that bracket `domain` with roughly `count` intervals.
fn round_ticks(domain: (f64, f64), count: usize) -> Vec<f64> {
    let Some((lo, hi)) = ordered(domain).filter(|_| count > 0) else {
        return Vec::new();
    };
    if lo == hi {
        return vec![lo];
    }
    let Some(step) = decimal_step((hi - lo) / count as f64) else {
        return vec![lo, hi];
    };
    let first = (lo / step).floor() * step;
    let last = (hi / step).ceil() * step;
    (0..=tick_count_between(first, last, step))
        .map(|i| first + step * i as f64)
        .collect()
}

/// Whole steps from `start` to `stop`, or zero when that is not a sane count.
pub(crate) fn tick_count_between(start: f64, stop: f64, step: f64) -> u64 {
    let steps = ((stop - start) / step).round();
    if !(steps.is_finite() && steps >= 0.0) {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite, non-negative and at most MAX_TICKS"
    )]
    {
        steps.min(MAX_TICKS) as u64
    }
}

/// Rounds a raw step up or down to 1, 2, 5 or 10 times a power of ten.
fn decimal_step(raw: f64) -> Option<f64> {
    if !(raw.is_finite() && raw > 0.0) {
        return None;
    }
    let magnitude = 10_f64.powf(raw.log10().floor());
    let mantissa = raw / magnitude;
    let multiple = match mantissa {
        m if m >= 7.5 => 10.0,
        m if m >= 3.5 => 5.0,
        m if m >= 1.5 => 2.0,
        _ => 1.0,
    };
    Some(multiple * magnitude)
}

/// A linear scale over seconds whose ticks land on clock boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Maps `domain` seconds onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Seconds to range value.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Range value to seconds.
    pub fn invert(&self, y: f64) -> f64 {
        self.inner.invert(y)
    }

    /// Ticks inside the domain, see [`nice_time_ticks_seconds`](crate::nice_time_ticks_seconds).
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, end) = self.inner.domain();
        time::nice_time_ticks_seconds(start, end, count)
    }

    /// The domain in seconds.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }
}

/// A time scale waiting for its range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTimeSpec {
    /// Seconds.
    pub domain: (f64, f64),
}

impl ScaleTimeSpec {
    /// A spec over `domain` seconds.
    pub fn new(domain: (f64, f64)) -> Self {
        Self { domain }
    }

    /// Attaches `range`.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleTime {
        ScaleTime::new(self.domain, range)
    }
}

/// Smallest interval holding every finite value.
///
/// Non-finite values are ignored. A single distinct value is widened by `0.5` on both
/// sides so the result is never degenerate. Returns `None` if no finite values are present.
pub fn infer_domain(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    Some(if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) })
}
