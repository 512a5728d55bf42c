// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the shared engine and what a particular view draws.

use kurbo::{Point, Rect};
use soundmap_charts::{Margins, PlotLayout, ScaleLinear};
use soundmap_core::{DataError, Surface};

use crate::hover::TooltipLines;
use crate::overlay::CursorStyle;
use crate::transform::CoordinateTransform;

/// Inputs for a content repaint.
#[derive(Clone, Copy, Debug)]
pub struct ContentContext<'a> {
    /// Base scales plus pan/zoom.
    pub transform: &'a CoordinateTransform,
    /// The plot rectangle.
    pub plot: Rect,
    /// Key of the selected item.
    pub selected: Option<usize>,
}

/// Everything view-specific: scales, painting, and how items are picked and played.
///
/// The engine owns layout, pan/zoom, hit-testing, selection, hover and the overlay; a
/// strategy only answers questions about its own item type.
pub trait DrawStrategy {
    /// One dataset element.
    type Item;

    /// Checks a dataset before it replaces the current one.
    fn validate(&self, items: &[Self::Item]) -> Result<(), DataError>;

    /// Space reserved around the plot for guides.
    fn margins(&self) -> Margins {
        Margins::ZERO
    }

    /// Whether zoom and pan gestures apply to this view.
    fn zoomable(&self) -> bool {
        true
    }

    /// Base scales `(x, y)` from the dataset extents to the plot's pixel ranges.
    fn base_scales(&self, items: &[Self::Item], layout: &PlotLayout)
    -> (ScaleLinear, ScaleLinear);

    /// Paints static guides for a non-empty dataset.
    fn paint_guides(
        &self,
        items: &[Self::Item],
        layout: &PlotLayout,
        transform: &CoordinateTransform,
        surface: &mut dyn Surface,
    );

    /// Paints the full content layer.
    fn paint_content(
        &self,
        items: &[Self::Item],
        ctx: &ContentContext<'_>,
        surface: &mut dyn Surface,
    );

    /// Hit-test radius in base pixels; `None` disables hit-testing.
    fn pick_radius(&self) -> Option<f64> {
        None
    }

    /// Data-space position used for hit-testing.
    fn pick_position(&self, _item: &Self::Item) -> Option<Point> {
        None
    }

    /// Stable key of the item at `slot` within its dataset. Defaults to the slot.
    fn item_key(&self, slot: usize, _item: &Self::Item) -> usize {
        slot
    }

    /// File to play when the item is selected or hovered.
    fn playback_file<'a>(&self, _item: &'a Self::Item) -> Option<&'a str> {
        None
    }

    /// Tooltip text for a hovered item; `None` disables the tooltip.
    fn tooltip_lines(&self, _item: &Self::Item) -> Option<TooltipLines> {
        None
    }

    /// Whether the playback overlay draws a time cursor for this view.
    fn draws_cursor(&self) -> bool {
        false
    }

    /// Cursor styling, if [`draws_cursor`](Self::draws_cursor) is on.
    fn cursor_style(&self) -> CursorStyle {
        CursorStyle::default()
    }

    /// Text shown when no dataset is assigned.
    fn placeholder(&self) -> &str;
}
