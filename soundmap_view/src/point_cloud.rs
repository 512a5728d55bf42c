// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedding map: one disc per file, colored by category.

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use smallvec::smallvec;
use soundmap_charts::{PlotLayout, ScaleLinear, ScaleLinearSpec, infer_domain};
use soundmap_core::{
    DataError, MapPoint, Primitive, Surface, TextAnchor, TextBaseline, TextPrimitive,
    validate_points,
};

use crate::hover::TooltipLines;
use crate::strategy::{ContentContext, DrawStrategy};
use crate::transform::CoordinateTransform;

/// Tick count used when "nicing" the embedding extents.
const NICE_TICKS: usize = 10;

/// Marker styling for the map.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloudStyle {
    /// Marker radius at `k = 1`.
    pub radius: f64,
    /// Selected marker radius at `k = 1`.
    pub selected_radius: f64,
    /// Extra factor applied to every drawn radius.
    pub disc_scale: f64,
    /// Fill of the selected marker.
    pub selected_color: Color,
    /// Caption paint.
    pub caption_fill: Brush,
}

impl Default for PointCloudStyle {
    fn default() -> Self {
        Self {
            radius: 1.0,
            selected_radius: 1.25,
            disc_scale: 1.2,
            selected_color: Color::from_rgb8(0xff, 0x35, 0x85),
            caption_fill: Brush::Solid(css::GRAY),
        }
    }
}

impl PointCloudStyle {
    /// Hit-test radius: twice the selected marker radius.
    pub fn pick_radius(&self) -> f64 {
        2.0 * self.selected_radius
    }
}

/// Draw strategy for [`MapPoint`]s.
#[derive(Clone, Debug, Default)]
pub struct PointCloudStrategy {
    style: PointCloudStyle,
}

impl PointCloudStrategy {
    /// Creates the strategy with default styling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the styling.
    pub fn with_style(mut self, style: PointCloudStyle) -> Self {
        self.style = style;
        self
    }

    /// The styling.
    pub fn style(&self) -> &PointCloudStyle {
        &self.style
    }

    fn disc(&self, center: Point, radius: f64, fill: Color) -> Primitive {
        Primitive::Disc {
            center,
            radius: radius * self.style.disc_scale,
            fill: Brush::Solid(fill),
        }
    }
}

impl DrawStrategy for PointCloudStrategy {
    type Item = MapPoint;

    fn validate(&self, items: &[MapPoint]) -> Result<(), DataError> {
        validate_points(items)
    }

    fn base_scales(&self, items: &[MapPoint], layout: &PlotLayout) -> (ScaleLinear, ScaleLinear) {
        let x = infer_domain(items.iter().map(|p| p.position.x)).unwrap_or((0.0, 1.0));
        let y = infer_domain(items.iter().map(|p| p.position.y)).unwrap_or((0.0, 1.0));
        (
            ScaleLinearSpec::new(x)
                .with_nice(true)
                .instantiate_resolved(layout.x_range(), NICE_TICKS),
            ScaleLinearSpec::new(y)
                .with_nice(true)
                .instantiate_resolved(layout.y_range(), NICE_TICKS),
        )
    }

    fn paint_guides(
        &self,
        items: &[MapPoint],
        layout: &PlotLayout,
        _transform: &CoordinateTransform,
        surface: &mut dyn Surface,
    ) {
        let caption = match items.len() {
            1 => "1 file".to_owned(),
            n => format!("{n} files"),
        };
        surface.draw(Primitive::Text(
            TextPrimitive::new((layout.plot.x1 - 4.0, layout.plot.y0 + 4.0), caption)
                .with_fill(self.style.caption_fill.clone())
                .with_anchor(TextAnchor::End)
                .with_baseline(TextBaseline::Hanging),
        ));
    }

    fn paint_content(
        &self,
        items: &[MapPoint],
        ctx: &ContentContext<'_>,
        surface: &mut dyn Surface,
    ) {
        let k = ctx.transform.view().k;
        let largest = self.style.selected_radius.max(self.style.radius);
        let reach = largest * self.style.disc_scale * k;
        let visible = ctx.plot.inflate(reach, reach);
        let mut selected = None;
        for p in items {
            if ctx.selected == Some(p.index) {
                selected = Some(p);
                continue;
            }
            let center = ctx.transform.apply(p.position);
            if !contains(visible, center) {
                continue;
            }
            surface.draw(self.disc(center, self.style.radius * k, p.color));
        }
        // Drawn last so it stays on top of its neighbors.
        if let Some(p) = selected {
            let center = ctx.transform.apply(p.position);
            if contains(visible, center) {
                let radius = self.style.selected_radius * k;
                surface.draw(self.disc(center, radius, self.style.selected_color));
            }
        }
    }

    fn pick_radius(&self) -> Option<f64> {
        Some(self.style.pick_radius())
    }

    fn pick_position(&self, item: &MapPoint) -> Option<Point> {
        Some(item.position)
    }

    fn item_key(&self, _slot: usize, item: &MapPoint) -> usize {
        item.index
    }

    fn playback_file<'a>(&self, item: &'a MapPoint) -> Option<&'a str> {
        Some(&item.source_id)
    }

    fn tooltip_lines(&self, item: &MapPoint) -> Option<TooltipLines> {
        let classes: Vec<&str> = item.classes.iter().map(String::as_str).collect();
        Some(smallvec![
            format!("File: {}", item.source_id),
            format!("Class: {}", classes.join(",")),
            format!("Category: {}", item.category.as_deref().unwrap_or("")),
        ])
    }

    fn placeholder(&self) -> &str {
        "No map data"
    }
}

fn contains(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
