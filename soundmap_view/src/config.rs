// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::{Path, PathBuf};

use kurbo::Vec2;

/// Interaction settings shared by both views.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Allowed zoom factors `(min, max)`; `min` is never below 1.
    pub scale_extent: (f64, f64),
    /// Tooltip offset from the pointer.
    pub tooltip_offset: Vec2,
    /// Tooltip opacity while visible.
    pub tooltip_opacity: f64,
    /// Whether hovering a point plays it.
    pub autoplay_on_hover: bool,
    /// Database file; relative file paths resolve against its directory.
    pub database_path: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale_extent: (1.0, 1000.0),
            tooltip_offset: Vec2::new(5.0, 5.0),
            tooltip_opacity: 0.8,
            autoplay_on_hover: true,
            database_path: PathBuf::new(),
        }
    }
}

impl ViewConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zoom extent. Bounds are ordered and the lower bound is raised to 1.
    pub fn with_scale_extent(mut self, min: f64, max: f64) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let lo = lo.max(1.0);
        self.scale_extent = (lo, hi.max(lo));
        self
    }

    /// Sets the tooltip offset.
    pub fn with_tooltip_offset(mut self, offset: Vec2) -> Self {
        self.tooltip_offset = offset;
        self
    }

    /// Sets the visible tooltip opacity.
    pub fn with_tooltip_opacity(mut self, opacity: f64) -> Self {
        self.tooltip_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables playback on hover.
    pub fn with_autoplay_on_hover(mut self, autoplay: bool) -> Self {
        self.autoplay_on_hover = autoplay;
        self
    }

    /// Sets the database path.
    pub fn with_database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = path.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_extent_is_ordered_and_at_least_one() {
        let c = ViewConfig::new().with_scale_extent(50.0, 0.5);
        assert_eq!(c.scale_extent, (1.0, 50.0));
    }
}
