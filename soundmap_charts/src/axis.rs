// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis guide generation.
//!
//! An [`AxisSpec`] turns a scale and a plot rectangle into static guide primitives: the
//! domain line, tick marks, optional gridlines and tick labels.

use std::sync::Arc;

use kurbo::{Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use soundmap_core::{Primitive, TextAnchor, TextBaseline, TextPrimitive};

use crate::format::format_tick_with_step;
use crate::scale::ScaleSpec;

/// Where the axis sits relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis below the plot.
    Bottom,
    /// A vertical axis left of the plot.
    Left,
}

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Paint for the domain line and ticks.
    pub rule: Brush,
    /// Width of the domain line and ticks.
    pub rule_width: f64,
    /// Paint for tick labels.
    pub label_fill: Brush,
    /// Tick label font size.
    pub label_font_size: f64,
    /// Paint for gridlines, if they are enabled.
    pub grid: Brush,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            rule: Brush::Solid(css::GRAY),
            rule_width: 1.0,
            label_fill: Brush::Solid(css::GRAY),
            label_font_size: 10.0,
            grid: Brush::Solid(css::GRAY.with_alpha(0.1)),
        }
    }
}

/// An axis specification.
#[derive(Clone)]
pub struct AxisSpec {
    /// The axis scale specification.
    pub scale: ScaleSpec,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks.
    pub tick_count: usize,
    /// Tick line length, pointing away from the plot.
    pub tick_size: f64,
    /// Gap between the tick end and its label.
    pub tick_padding: f64,
    /// Whether to draw the domain line.
    pub show_domain: bool,
    /// Whether to draw gridlines across the plot at each tick.
    pub grid: bool,
    /// Styling.
    pub style: AxisStyle,
    /// Optional label formatter, called with `(value, tick_step)`.
    pub tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // The formatter closure is opaque; only report whether one is installed.
        let custom_labels = self.tick_formatter.is_some();
        f.debug_struct("AxisSpec")
            .field("orient", &self.orient)
            .field("scale", &self.scale)
            .field("ticks", &(self.tick_count, self.tick_size, self.tick_padding))
            .field("show_domain", &self.show_domain)
            .field("grid", &self.grid)
            .field("custom_labels", &custom_labels)
            .finish_non_exhaustive()
    }
}

impl AxisSpec {
    /// Creates an axis with 10 ticks, 5px ticks, 3px tick padding, a domain line and no grid.
    pub fn new(scale: impl Into<ScaleSpec>, orient: AxisOrient) -> Self {
        Self {
            scale: scale.into(),
            orient,
            tick_count: 10,
            tick_size: 5.0,
            tick_padding: 3.0,
            show_domain: true,
            grid: false,
            style: AxisStyle::default(),
            tick_formatter: None,
        }
    }

    /// Convenience constructor for a bottom axis.
    pub fn bottom(scale: impl Into<ScaleSpec>) -> Self {
        Self::new(scale, AxisOrient::Bottom)
    }

    /// Convenience constructor for a left axis.
    pub fn left(scale: impl Into<ScaleSpec>) -> Self {
        Self::new(scale, AxisOrient::Left)
    }

    /// Asks for roughly `tick_count` ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Tick mark length in pixels.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Enable or disable the domain line.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Enable or disable gridlines.
    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Replaces the rule and label styling.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Formats labels with `f(value, step)` instead of the scale default.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Thickness needed along the axis normal: tick, padding and one label line.
    pub fn measure(&self) -> f64 {
        match self.orient {
            AxisOrient::Bottom => {
                self.tick_size.abs() + self.tick_padding.max(0.0) + self.style.label_font_size
            }
            AxisOrient::Left => {
                let (ticks, step) = self.tick_values();
                let widest = ticks
                    .iter()
                    .map(|v| {
                        let label = self.format_tick(*v, step);
                        estimate_text_width(&label, self.style.label_font_size)
                    })
                    .fold(0.0_f64, f64::max);
                self.tick_size.abs() + self.tick_padding.max(0.0) + widest
            }
        }
    }

    fn tick_values(&self) -> (Vec<f64>, f64) {
        let ticks = self
            .scale
            .instantiate((0.0, 1.0), self.tick_count)
            .ticks(self.tick_count);
        let step = tick_step(&ticks);
        (ticks, step)
    }

    fn format_tick(&self, v: f64, step: f64) -> String {
        match &self.tick_formatter {
            Some(f) => f(v, step),
            None => match self.scale {
                ScaleSpec::Time(_) => crate::time::format_time_seconds(v, step),
                ScaleSpec::Linear(_) => format_tick_with_step(v, step),
            },
        }
    }

    /// Generates guide primitives for `plot`. Gridlines come first so rules paint over them.
    pub fn primitives(&self, plot: Rect) -> Vec<Primitive> {
        let range = match self.orient {
            AxisOrient::Bottom => (plot.x0, plot.x1),
            AxisOrient::Left => (plot.y1, plot.y0),
        };
        let scale = self.scale.instantiate(range, self.tick_count);
        let (ticks, step) = self.tick_values();
        let (lo, hi) = (range.0.min(range.1), range.0.max(range.1));
        let visible: Vec<(f64, f64)> = ticks
            .into_iter()
            .map(|v| (v, scale.map(v)))
            .filter(|(_, p)| *p >= lo - 1e-9 && *p <= hi + 1e-9)
            .collect();

        let mut out = Vec::new();
        let rule = &self.style.rule;
        let width = self.style.rule_width;
        let tick = self.tick_size.abs();
        let label_gap = tick + self.tick_padding.max(0.0);

        if self.grid {
            let grid = &self.style.grid;
            for &(_, p) in &visible {
                out.push(match self.orient {
                    AxisOrient::Bottom => {
                        Primitive::line((p, plot.y0), (p, plot.y1), grid.clone(), width)
                    }
                    AxisOrient::Left => {
                        Primitive::line((plot.x0, p), (plot.x1, p), grid.clone(), width)
                    }
                });
            }
        }

        if self.show_domain {
            out.push(match self.orient {
                AxisOrient::Bottom => {
                    Primitive::line((plot.x0, plot.y1), (plot.x1, plot.y1), rule.clone(), width)
                }
                AxisOrient::Left => {
                    Primitive::line((plot.x0, plot.y0), (plot.x0, plot.y1), rule.clone(), width)
                }
            });
        }

        let n = visible.len();
        for (i, &(v, p)) in visible.iter().enumerate() {
            let label = self.format_tick(v, step);
            match self.orient {
                AxisOrient::Bottom => {
                    if tick > 0.0 {
                        let end = plot.y1 + tick;
                        out.push(Primitive::line((p, plot.y1), (p, end), rule.clone(), width));
                    }
                    // Edge labels hug the plot instead of hanging off it.
                    let anchor = if i == 0 && n > 1 {
                        TextAnchor::Start
                    } else if i + 1 == n && n > 1 {
                        TextAnchor::End
                    } else {
                        TextAnchor::Middle
                    };
                    out.push(Primitive::Text(
                        TextPrimitive::new(Point::new(p, plot.y1 + label_gap), label)
                            .with_font_size(self.style.label_font_size)
                            .with_fill(self.style.label_fill.clone())
                            .with_anchor(anchor)
                            .with_baseline(TextBaseline::Hanging),
                    ));
                }
                AxisOrient::Left => {
                    if tick > 0.0 {
                        let start = plot.x0 - tick;
                        out.push(Primitive::line((start, p), (plot.x0, p), rule.clone(), width));
                    }
                    out.push(Primitive::Text(
                        TextPrimitive::new(Point::new(plot.x0 - label_gap, p), label)
                            .with_font_size(self.style.label_font_size)
                            .with_fill(self.style.label_fill.clone())
                            .with_anchor(TextAnchor::End)
                            .with_baseline(TextBaseline::Middle),
                    ));
                }
            }
        }
        out
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    // ~0.6em per glyph; good enough to reserve margin space without real shaping.
    0.6 * font_size * text.chars().count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScaleLinearSpec, ScaleTimeSpec};

    fn labels(prims: &[Primitive]) -> Vec<&str> {
        prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bottom_time_axis_labels_inside_plot() {
        let plot = Rect::new(0.0, 0.0, 300.0, 80.0);
        let axis = AxisSpec::bottom(ScaleTimeSpec::new((0.0, 125.0))).with_tick_count(3);
        let prims = axis.primitives(plot);
        assert_eq!(labels(&prims), vec!["0:00", "1:00", "2:00"]);
        for p in &prims {
            if let Primitive::Text(t) = p {
                assert!(t.pos.x >= plot.x0 && t.pos.x <= plot.x1);
                assert!(t.pos.y > plot.y1);
            }
        }
    }

    #[test]
    fn edge_labels_are_anchored_inward() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let prims = AxisSpec::bottom(ScaleLinearSpec::new((0.0, 10.0)))
            .with_tick_count(2)
            .primitives(plot);
        let anchors: Vec<TextAnchor> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Text(t) => Some(t.anchor),
                _ => None,
            })
            .collect();
        assert_eq!(anchors.first(), Some(&TextAnchor::Start));
        assert_eq!(anchors.last(), Some(&TextAnchor::End));
    }

    #[test]
    fn grid_is_optional() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let spec = AxisSpec::left(ScaleLinearSpec::new((-1.0, 1.0))).with_tick_count(4);
        let without = spec.clone().primitives(plot).len();
        let with = spec.with_grid(true).primitives(plot).len();
        assert!(with > without);
    }

    #[test]
    fn custom_formatter_is_used() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let prims = AxisSpec::bottom(ScaleLinearSpec::new((0.0, 1.0)))
            .with_tick_count(1)
            .with_tick_formatter(|v, _| format!("<{v}>"))
            .primitives(plot);
        assert!(labels(&prims).iter().all(|l| l.starts_with('<')));
    }
}
