// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Base scales composed with pan/zoom.
//!
//! Three coordinate spaces are involved:
//! - **data**: dataset units (embedding coordinates, seconds/amplitude);
//! - **base**: pixels as laid out at `k = 1`, produced by the per-axis base scales;
//! - **screen**: base pixels after zoom and pan, `k * base + t`.

use kurbo::{Point, Vec2};
use soundmap_charts::ScaleLinear;

/// Pan/zoom state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Zoom factor.
    pub k: f64,
    /// Horizontal translation in pixels.
    pub tx: f64,
    /// Vertical translation in pixels.
    pub ty: f64,
}

impl ViewTransform {
    /// No zoom, no pan.
    pub const IDENTITY: Self = Self {
        k: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Creates a transform.
    pub fn new(k: f64, tx: f64, ty: f64) -> Self {
        Self { k, tx, ty }
    }

    /// Base pixels to screen pixels.
    pub fn apply(&self, base: Point) -> Point {
        Point::new(self.k * base.x + self.tx, self.k * base.y + self.ty)
    }

    /// Screen pixels to base pixels.
    pub fn invert(&self, screen: Point) -> Point {
        Point::new((screen.x - self.tx) / self.k, (screen.y - self.ty) / self.k)
    }

    fn is_valid(&self) -> bool {
        self.k.is_finite() && self.k > 0.0 && self.tx.is_finite() && self.ty.is_finite()
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-axis base scales plus the current pan/zoom.
///
/// This is the only place pan/zoom state changes. Requests outside the scale extent are
/// clamped; non-finite requests are ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    x: ScaleLinear,
    y: ScaleLinear,
    view: ViewTransform,
    scale_extent: (f64, f64),
}

impl CoordinateTransform {
    /// Creates a transform at identity zoom with a `[1, 1000]` scale extent.
    pub fn new(x: ScaleLinear, y: ScaleLinear) -> Self {
        Self {
            x,
            y,
            view: ViewTransform::IDENTITY,
            scale_extent: (1.0, 1000.0),
        }
    }

    /// Sets the allowed zoom range and re-clamps the current zoom.
    pub fn with_scale_extent(mut self, extent: (f64, f64)) -> Self {
        self.scale_extent = extent;
        self.view.k = self.clamp_k(self.view.k);
        self
    }

    /// Replaces the base scales (after a resize), keeping pan/zoom.
    pub fn set_base(&mut self, x: ScaleLinear, y: ScaleLinear) {
        self.x = x;
        self.y = y;
    }

    /// Horizontal base scale.
    pub fn base_x(&self) -> &ScaleLinear {
        &self.x
    }

    /// Vertical base scale.
    pub fn base_y(&self) -> &ScaleLinear {
        &self.y
    }

    /// Current pan/zoom.
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Data coordinates to base pixels.
    pub fn to_base(&self, data: Point) -> Point {
        Point::new(self.x.map(data.x), self.y.map(data.y))
    }

    /// Data coordinates to screen pixels: `k * base(v) + t` per axis.
    pub fn apply(&self, data: Point) -> Point {
        self.view.apply(self.to_base(data))
    }

    /// Data x to screen x.
    pub fn apply_x(&self, x: f64) -> f64 {
        self.view.k * self.x.map(x) + self.view.tx
    }

    /// Data y to screen y.
    pub fn apply_y(&self, y: f64) -> f64 {
        self.view.k * self.y.map(y) + self.view.ty
    }

    /// Screen pixels to base pixels.
    pub fn screen_to_base(&self, screen: Point) -> Point {
        self.view.invert(screen)
    }

    /// Screen pixels to data coordinates: `base⁻¹((s - t) / k)` per axis.
    pub fn invert(&self, screen: Point) -> Point {
        let base = self.screen_to_base(screen);
        Point::new(self.x.invert(base.x), self.y.invert(base.y))
    }

    /// Multiplies the zoom by `factor`, keeping the point under `anchor` fixed.
    ///
    /// Returns whether the transform changed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0 && anchor.is_finite()) {
            return false;
        }
        let k = self.clamp_k(self.view.k * factor);
        let base = self.view.invert(anchor);
        self.replace(ViewTransform::new(k, anchor.x - k * base.x, anchor.y - k * base.y))
    }

    /// Translates by `delta` screen pixels. Returns whether the transform changed.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let v = self.view;
        self.replace(ViewTransform::new(v.k, v.tx + delta.x, v.ty + delta.y))
    }

    /// Sets pan/zoom directly, clamping the zoom. Returns whether the transform changed.
    pub fn set_view(&mut self, view: ViewTransform) -> bool {
        if !view.is_valid() {
            return false;
        }
        let k = self.clamp_k(view.k);
        self.replace(ViewTransform::new(k, view.tx, view.ty))
    }

    /// Back to identity. Returns whether the transform changed.
    pub fn reset(&mut self) -> bool {
        let k = self.clamp_k(1.0);
        self.replace(ViewTransform::new(k, 0.0, 0.0))
    }

    fn replace(&mut self, view: ViewTransform) -> bool {
        let changed = view != self.view;
        self.view = view;
        changed
    }

    fn clamp_k(&self, k: f64) -> f64 {
        let (lo, hi) = self.scale_extent;
        k.clamp(lo, hi.max(lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(
            ScaleLinear::new((-10.0, 10.0), (0.0, 400.0)),
            ScaleLinear::new((-5.0, 5.0), (300.0, 0.0)),
        )
    }

    #[test]
    fn identity_matches_base_scale() {
        let t = transform();
        for p in [Point::new(-10.0, -5.0), Point::new(3.0, 1.5), Point::new(10.0, 5.0)] {
            let s = t.apply(p);
            assert_eq!(s.x, t.base_x().map(p.x));
            assert_eq!(s.y, t.base_y().map(p.y));
        }
    }

    #[test]
    fn apply_then_invert_round_trips() {
        let mut t = transform();
        let views = [
            ViewTransform::new(1.0, 0.0, 0.0),
            ViewTransform::new(2.5, -130.0, 47.0),
            ViewTransform::new(999.0, 1.0e5, -3.0e4),
        ];
        for v in views {
            assert!(t.set_view(v) || t.view() == v);
            for p in [Point::new(-7.3, 2.2), Point::new(0.0, 0.0), Point::new(9.9, -4.9)] {
                let back = t.invert(t.apply(p));
                assert!((back.x - p.x).abs() < 1e-9, "x: {back:?} vs {p:?}");
                assert!((back.y - p.y).abs() < 1e-9, "y: {back:?} vs {p:?}");
            }
        }
    }

    #[test]
    fn zoom_clamps_to_extent() {
        let mut t = transform().with_scale_extent((1.0, 8.0));
        assert!(t.zoom_at(Point::new(0.0, 0.0), 100.0));
        assert_eq!(t.view().k, 8.0);
        assert!(t.zoom_at(Point::new(0.0, 0.0), 1e-6));
        assert_eq!(t.view().k, 1.0);
        assert!(!t.zoom_at(Point::new(0.0, 0.0), 0.5));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut t = transform();
        let anchor = Point::new(123.0, 77.0);
        let under = t.invert(anchor);
        t.zoom_at(anchor, 3.0);
        let after = t.apply(under);
        assert!((after.x - anchor.x).abs() < 1e-9);
        assert!((after.y - anchor.y).abs() < 1e-9);
    }

    #[test]
    fn pan_translates_screen_and_round_trips() {
        let mut t = transform();
        t.zoom_at(Point::new(200.0, 150.0), 2.0);
        let data = Point::new(3.0, -1.5);
        let before = t.apply(data);
        let view = t.view();

        assert!(t.pan_by(Vec2::new(-13.0, 21.0)));
        assert_eq!(t.view(), ViewTransform::new(view.k, view.tx - 13.0, view.ty + 21.0));
        let after = t.apply(data);
        assert!((after.x - (before.x - 13.0)).abs() < 1e-9);
        assert!((after.y - (before.y + 21.0)).abs() < 1e-9);
        let back = t.invert(after);
        assert!((back.x - data.x).abs() < 1e-9);
        assert!((back.y - data.y).abs() < 1e-9);

        assert!(!t.pan_by(Vec2::ZERO));
    }

    #[test]
    fn invalid_requests_are_ignored() {
        let mut t = transform();
        assert!(!t.zoom_at(Point::new(0.0, 0.0), f64::NAN));
        assert!(!t.pan_by(Vec2::new(f64::INFINITY, 0.0)));
        assert!(!t.set_view(ViewTransform::new(0.0, 0.0, 0.0)));
        assert_eq!(t.view(), ViewTransform::IDENTITY);
    }

    #[test]
    fn set_view_clamps_zoom() {
        let mut t = transform();
        t.set_view(ViewTransform::new(0.25, 10.0, 10.0));
        assert_eq!(t.view(), ViewTransform::new(1.0, 10.0, 10.0));
    }
}
