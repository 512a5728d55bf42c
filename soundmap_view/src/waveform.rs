// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Amplitude envelope of one file, with a time axis and a live playback cursor.

use kurbo::BezPath;
use peniko::color::palette::css;
use peniko::{Brush, Color};
use soundmap_charts::{
    AxisSpec, AxisStyle, Margins, PlotLayout, ScaleLinear, ScaleLinearSpec, ScaleTimeSpec,
};
use soundmap_core::{DataError, Primitive, Surface, WaveformSample, validate_samples};

use crate::overlay::CursorStyle;
use crate::strategy::{ContentContext, DrawStrategy};
use crate::transform::CoordinateTransform;

/// Amplitudes are normalized at the source; the vertical domain never follows the data.
const AMPLITUDE_DOMAIN: (f64, f64) = (-1.0, 1.0);

/// Envelope, axis and cursor styling.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformStyle {
    /// Envelope stroke paint.
    pub color: Color,
    /// Envelope stroke width.
    pub width: f64,
    /// Playback cursor.
    pub cursor: CursorStyle,
    /// Height reserved below the plot for the time axis.
    pub axis_height: f64,
    /// Target horizontal spacing between time ticks.
    pub pixels_per_tick: f64,
    /// Whether to draw an amplitude axis on the left.
    pub amplitude_axis: bool,
    /// Axis styling.
    pub axis: AxisStyle,
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self {
            color: Color::from_rgb8(0xff, 0x35, 0x85),
            width: 1.0,
            cursor: CursorStyle {
                brush: Brush::Solid(css::DODGER_BLUE),
                width: 1.0,
            },
            axis_height: 24.0,
            pixels_per_tick: 100.0,
            amplitude_axis: false,
            axis: AxisStyle::default(),
        }
    }
}

/// Draw strategy for [`WaveformSample`]s.
#[derive(Clone, Debug, Default)]
pub struct WaveformStrategy {
    style: WaveformStyle,
}

impl WaveformStrategy {
    /// Creates the strategy with default styling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the styling.
    pub fn with_style(mut self, style: WaveformStyle) -> Self {
        self.style = style;
        self
    }

    /// The styling.
    pub fn style(&self) -> &WaveformStyle {
        &self.style
    }

    fn time_axis(&self, items: &[WaveformSample], plot_width: f64) -> AxisSpec {
        let ticks = (plot_width / self.style.pixels_per_tick.max(1.0)).round().max(1.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "at least 1 and bounded by the plot width"
        )]
        let ticks = ticks.min(1000.0) as usize;
        AxisSpec::bottom(ScaleTimeSpec::new((0.0, last_time(items))))
            .with_tick_count(ticks)
            .with_domain(false)
            .with_grid(true)
            .with_style(self.style.axis.clone())
    }

    fn amplitude_axis(&self) -> AxisSpec {
        AxisSpec::left(ScaleLinearSpec::new(AMPLITUDE_DOMAIN))
            .with_tick_count(4)
            .with_domain(false)
            .with_grid(true)
            .with_style(self.style.axis.clone())
            .with_tick_formatter(|v, _| format!("{v:.2}"))
    }
}

fn last_time(items: &[WaveformSample]) -> f64 {
    items.last().map_or(0.0, |s| s.time.max(0.0))
}

impl DrawStrategy for WaveformStrategy {
    type Item = WaveformSample;

    fn validate(&self, items: &[WaveformSample]) -> Result<(), DataError> {
        validate_samples(items)
    }

    fn margins(&self) -> Margins {
        let left = if self.style.amplitude_axis {
            self.amplitude_axis().measure()
        } else {
            0.0
        };
        Margins::ZERO
            .with_bottom(self.style.axis_height)
            .with_left(left)
    }

    fn zoomable(&self) -> bool {
        false
    }

    fn base_scales(
        &self,
        items: &[WaveformSample],
        layout: &PlotLayout,
    ) -> (ScaleLinear, ScaleLinear) {
        (
            ScaleLinear::new((0.0, last_time(items)), layout.x_range()),
            ScaleLinear::new(AMPLITUDE_DOMAIN, layout.y_range()),
        )
    }

    fn paint_guides(
        &self,
        items: &[WaveformSample],
        layout: &PlotLayout,
        _transform: &CoordinateTransform,
        surface: &mut dyn Surface,
    ) {
        for p in self.time_axis(items, layout.plot.width()).primitives(layout.plot) {
            surface.draw(p);
        }
        if self.style.amplitude_axis {
            for p in self.amplitude_axis().primitives(layout.plot) {
                surface.draw(p);
            }
        }
    }

    fn paint_content(
        &self,
        items: &[WaveformSample],
        ctx: &ContentContext<'_>,
        surface: &mut dyn Surface,
    ) {
        let Some(first) = items.first() else {
            return;
        };
        let t = ctx.transform;
        let mut path = BezPath::new();
        path.move_to((t.apply_x(0.0), t.apply_y(first.min)));
        for s in items {
            let x = t.apply_x(s.time);
            path.line_to((x, t.apply_y(s.min)));
            path.line_to((x, t.apply_y(s.max)));
        }
        surface.draw(Primitive::Stroke {
            path,
            brush: Brush::Solid(self.style.color),
            width: self.style.width,
        });
    }

    fn draws_cursor(&self) -> bool {
        true
    }

    fn cursor_style(&self) -> CursorStyle {
        self.style.cursor.clone()
    }

    fn placeholder(&self) -> &str {
        "No waveform data"
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{PathEl, Point, Size};
    use soundmap_core::DisplayList;

    use super::*;

    fn layout() -> PlotLayout {
        PlotLayout::arrange(Size::new(200.0, 124.0), WaveformStrategy::new().margins())
    }

    fn samples() -> Vec<WaveformSample> {
        vec![
            WaveformSample::new(0.0, -0.5, 0.5),
            WaveformSample::new(1.0, -0.2, 0.9),
        ]
    }

    #[test]
    fn y_domain_is_fixed_regardless_of_data() {
        let s = WaveformStrategy::new();
        let (x, y) = s.base_scales(&samples(), &layout());
        assert_eq!(y.domain(), (-1.0, 1.0));
        assert_eq!(x.domain(), (0.0, 1.0));
        assert!((y.map(1.0) - 0.0).abs() < 1e-9);
        assert!((y.map(-1.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn envelope_connects_min_max_per_sample() {
        let s = WaveformStrategy::new();
        let items = samples();
        let (x, y) = s.base_scales(&items, &layout());
        let t = CoordinateTransform::new(x, y);
        let mut list = DisplayList::new();
        let ctx = ContentContext {
            transform: &t,
            plot: layout().plot,
            selected: None,
        };
        s.paint_content(&items, &ctx, &mut list);
        let [Primitive::Stroke { path, .. }] = list.items() else {
            panic!("expected a single stroke");
        };
        let pts: Vec<Point> = path
            .elements()
            .iter()
            .map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => *p,
                other => panic!("unexpected element {other:?}"),
            })
            .collect();
        let expected = [
            Point::new(0.0, 75.0),
            Point::new(0.0, 75.0),
            Point::new(0.0, 25.0),
            Point::new(200.0, 60.0),
            Point::new(200.0, 5.0),
        ];
        assert_eq!(pts.len(), expected.len());
        for (p, e) in pts.iter().zip(expected) {
            assert!((p.x - e.x).abs() < 1e-9 && (p.y - e.y).abs() < 1e-9, "{p:?} != {e:?}");
        }
    }

    #[test]
    fn time_axis_has_about_one_tick_per_hundred_pixels() {
        let s = WaveformStrategy::new();
        let items = vec![
            WaveformSample::new(0.0, 0.0, 0.0),
            WaveformSample::new(300.0, 0.0, 0.0),
        ];
        let layout = PlotLayout::arrange(Size::new(300.0, 124.0), s.margins());
        let (x, y) = s.base_scales(&items, &layout);
        let mut list = DisplayList::new();
        s.paint_guides(&items, &layout, &CoordinateTransform::new(x, y), &mut list);
        let labels: Vec<&str> = list.texts().map(|t| t.text.as_str()).collect();
        assert_eq!(labels, vec!["0:00", "2:00", "4:00"]);
    }

    #[test]
    fn amplitude_axis_reserves_left_margin() {
        let s = WaveformStrategy::new().with_style(WaveformStyle {
            amplitude_axis: true,
            ..WaveformStyle::default()
        });
        assert!(s.margins().left > 0.0);
        let layout = PlotLayout::arrange(Size::new(300.0, 124.0), s.margins());
        let (x, y) = s.base_scales(&samples(), &layout);
        let mut list = DisplayList::new();
        s.paint_guides(&samples(), &layout, &CoordinateTransform::new(x, y), &mut list);
        assert!(list.texts().any(|t| t.text == "-1.00"));
    }
}
