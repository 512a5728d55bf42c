// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing primitives and surfaces.
//!
//! The engine never talks to a real canvas. It emits [`Primitive`]s into a [`Surface`],
//! which the host backs with whatever it renders to (a canvas, an SVG document, a GPU
//! scene). [`DisplayList`] is the in-memory surface used by tests and by the SVG dump.

use kurbo::{BezPath, Point, Rect, Shape, Size};
use peniko::Brush;
use peniko::color::palette::css;

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The anchor point is at the start of the text.
    #[default]
    Start,
    /// The anchor point is at the horizontal middle of the text.
    Middle,
    /// The anchor point is at the end of the text.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor point sits on the alphabetic baseline.
    #[default]
    Alphabetic,
    /// The anchor point is at the vertical middle of the line.
    Middle,
    /// The anchor point is at the top of the line.
    Hanging,
}

/// A single unshaped line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPrimitive {
    /// Anchor position.
    pub pos: Point,
    /// The text to draw.
    pub text: String,
    /// Font size in surface units.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
}

impl TextPrimitive {
    /// Creates a black, 10px, start-anchored text line.
    pub fn new(pos: impl Into<Point>, text: impl Into<String>) -> Self {
        Self {
            pos: pos.into(),
            text: text.into(),
            font_size: 10.0,
            fill: Brush::Solid(css::BLACK),
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the vertical baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// One drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// A filled circle.
    Disc {
        /// Center in surface coordinates.
        center: Point,
        /// Radius in surface units.
        radius: f64,
        /// Fill paint.
        fill: Brush,
    },
    /// A stroked open path.
    Stroke {
        /// The path geometry.
        path: BezPath,
        /// Stroke paint.
        brush: Brush,
        /// Stroke width in surface units.
        width: f64,
    },
    /// A line of text.
    Text(TextPrimitive),
}

impl Primitive {
    /// Convenience for a straight stroked segment.
    pub fn line(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        brush: impl Into<Brush>,
        width: f64,
    ) -> Self {
        let mut path = BezPath::new();
        path.move_to(p0);
        path.line_to(p1);
        Self::Stroke {
            path,
            brush: brush.into(),
            width,
        }
    }

    /// Returns the geometric bounds, if the primitive has well-defined ones.
    ///
    /// Text has no bounds here; it is unshaped.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Disc { center, radius, .. } => Some(Rect::from_center_size(
                *center,
                Size::new(2.0 * radius, 2.0 * radius),
            )),
            Self::Stroke { path, width, .. } => {
                let half = 0.5 * width;
                Some(path.bounding_box().inflate(half, half))
            }
            Self::Text(_) => None,
        }
    }
}

/// A drawing target owned by one layer of a view.
pub trait Surface {
    /// Current backing size.
    fn size(&self) -> Size;

    /// Resizes the backing store. Implementations may drop their contents.
    fn resize(&mut self, size: Size);

    /// Removes everything drawn so far.
    fn clear(&mut self);

    /// Draws one primitive on top of the existing contents.
    fn draw(&mut self, primitive: Primitive);

    /// Releases any backing resources. The surface may be resized and reused afterwards.
    fn release(&mut self) {
        self.clear();
    }
}

/// An in-memory surface that records what was drawn.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    size: Size,
    items: Vec<Primitive>,
    clears: usize,
    released: bool,
}

impl DisplayList {
    /// Creates an empty, zero-sized display list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives drawn since the last clear, in paint order.
    pub fn items(&self) -> &[Primitive] {
        &self.items
    }

    /// How many times this surface has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Whether [`Surface::release`] was called and nothing has been drawn since.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Iterates the text lines currently on the surface.
    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> + '_ {
        self.items.iter().filter_map(|p| match p {
            Primitive::Text(t) => Some(t),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.items.clear();
        self.clears += 1;
    }

    fn draw(&mut self, primitive: Primitive) {
        self.released = false;
        self.items.push(primitive);
    }

    fn release(&mut self) {
        self.clear();
        self.size = Size::ZERO;
        self.released = true;
    }
}
