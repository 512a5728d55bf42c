// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-point lookup in base pixel space.
//!
//! Points are indexed in base space (before pan/zoom), so the index survives every zoom
//! and pan and only needs rebuilding when the dataset or the base scales change.

use kurbo::Point;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

#[derive(Clone, Copy, Debug, PartialEq)]
struct IndexedPoint {
    pos: [f64; 2],
    slot: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        dx * dx + dy * dy
    }
}

/// An R-tree over base-space positions, keyed by slot (position in the dataset).
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl core::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl SpatialIndex {
    /// An index with no points.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bulk-loads `(slot, base position)` pairs. Non-finite positions are skipped.
    pub fn build(points: impl IntoIterator<Item = (usize, Point)>) -> Self {
        let points: Vec<IndexedPoint> = points
            .into_iter()
            .filter(|(_, p)| p.is_finite())
            .map(|(slot, p)| IndexedPoint {
                pos: [p.x, p.y],
                slot,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The slot of the point closest to `(x, y)`, if it lies within `r`.
    ///
    /// Among equally close points any one may be returned.
    pub fn nearest_within_radius(&self, x: f64, y: f64, r: f64) -> Option<usize> {
        if !(x.is_finite() && y.is_finite()) || r.is_nan() || r < 0.0 {
            return None;
        }
        let query = [x, y];
        let nearest = self.tree.nearest_neighbor(&query)?;
        (nearest.distance_2(&query) <= r * r).then_some(nearest.slot)
    }
}
