// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outer/inner rectangle layout for a single plot.
//!
//! The view (outer rectangle) is the host element's size. The plot (inner rectangle) is
//! what remains after subtracting fixed margins; guides live in the margins.

use kurbo::{Rect, Size};

/// Fixed space reserved around the plot, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Space above the plot.
    pub top: f64,
    /// Space right of the plot.
    pub right: f64,
    /// Space below the plot.
    pub bottom: f64,
    /// Space left of the plot.
    pub left: f64,
}

impl Margins {
    /// No margins: the plot fills the view.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Same margin on every side.
    pub fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }

    /// Sets the bottom margin.
    pub fn with_bottom(mut self, bottom: f64) -> Self {
        self.bottom = bottom;
        self
    }

    /// Sets the left margin.
    pub fn with_left(mut self, left: f64) -> Self {
        self.left = left;
        self
    }
}

/// Output of [`PlotLayout::arrange`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotLayout {
    /// Outer bounds, at the origin.
    pub view: Rect,
    /// The plot rectangle inside the margins.
    pub plot: Rect,
    /// Reserved strip below the plot, if the bottom margin is non-zero.
    pub axis_bottom: Option<Rect>,
    /// Reserved strip left of the plot, if the left margin is non-zero.
    pub axis_left: Option<Rect>,
}

impl PlotLayout {
    /// Splits a view of `size` into plot and margin rectangles.
    ///
    /// Negative sizes and margins are treated as zero. Margins larger than the view leave
    /// an empty plot rather than an inverted one.
    pub fn arrange(size: Size, margins: Margins) -> Self {
        let w = size.width.max(0.0);
        let h = size.height.max(0.0);
        let left = margins.left.max(0.0);
        let right = margins.right.max(0.0);
        let top = margins.top.max(0.0);
        let bottom = margins.bottom.max(0.0);

        let plot_w = (w - left - right).max(0.0);
        let plot_h = (h - top - bottom).max(0.0);
        let plot = Rect::new(left, top, left + plot_w, top + plot_h);

        let axis_bottom =
            (bottom > 0.0).then(|| Rect::new(plot.x0, plot.y1, plot.x1, plot.y1 + bottom));
        let axis_left = (left > 0.0).then(|| Rect::new(plot.x0 - left, plot.y0, plot.x0, plot.y1));

        Self {
            view: Rect::new(0.0, 0.0, w, h),
            plot,
            axis_bottom,
            axis_left,
        }
    }

    /// Whether there is nothing to draw into.
    pub fn is_empty(&self) -> bool {
        self.plot.width() <= 0.0 || self.plot.height() <= 0.0
    }

    /// Horizontal pixel range of the plot, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        (self.plot.x0, self.plot.x1)
    }

    /// Vertical pixel range of the plot, bottom to top (so larger values go up).
    pub fn y_range(&self) -> (f64, f64) {
        (self.plot.y1, self.plot.y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_margin_reserves_axis_strip() {
        let layout = PlotLayout::arrange(Size::new(400.0, 100.0), Margins::ZERO.with_bottom(20.0));
        assert!((layout.plot.height() - 80.0).abs() < 1e-9);
        let axis = layout.axis_bottom.expect("missing bottom axis rect");
        assert!((axis.y0 - 80.0).abs() < 1e-9);
        assert!((axis.y1 - 100.0).abs() < 1e-9);
        assert!(layout.axis_left.is_none());
    }

    #[test]
    fn oversized_margins_leave_empty_plot() {
        let layout = PlotLayout::arrange(Size::new(10.0, 10.0), Margins::uniform(8.0));
        assert!(layout.is_empty());
        assert!(layout.plot.width() >= 0.0);
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(PlotLayout::arrange(Size::ZERO, Margins::ZERO).is_empty());
    }
}
