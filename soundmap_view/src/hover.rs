// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover info panel and hover autoplay bookkeeping.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Text lines shown in the tooltip.
pub type TooltipLines = SmallVec<[String; 3]>;

/// The hover info panel as the host should present it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    /// Opacity; `0` when hidden.
    pub opacity: f64,
    /// Top-left corner, already offset from the pointer.
    pub position: Point,
    /// Lines of text, top to bottom.
    pub lines: TooltipLines,
}

impl Tooltip {
    /// Whether the panel is showing.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// What a hover update asks the caller to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverOutcome {
    /// The tooltip changed and should be re-presented.
    pub tooltip_changed: bool,
    /// Play this item (by key); it differs from the last one played on hover.
    pub autoplay: Option<usize>,
}

/// Tracks the hovered item, the tooltip, and the last item auto-played on hover.
#[derive(Clone, Debug)]
pub struct HoverTooltip {
    tooltip: Tooltip,
    offset: Vec2,
    opacity: f64,
    last_autoplayed: Option<usize>,
}

impl HoverTooltip {
    /// Creates a hidden tooltip with the given pointer offset and visible opacity.
    pub fn new(offset: Vec2, opacity: f64) -> Self {
        Self {
            tooltip: Tooltip::default(),
            offset,
            opacity,
            last_autoplayed: None,
        }
    }

    /// Handles a pointer move whose hit-test found `hit` (item key and tooltip lines).
    pub fn hover(
        &mut self,
        pointer: Point,
        hit: Option<(usize, TooltipLines)>,
        autoplay: bool,
    ) -> HoverOutcome {
        let Some((key, lines)) = hit else {
            return HoverOutcome {
                tooltip_changed: self.hide(),
                autoplay: None,
            };
        };
        let shown = Tooltip {
            opacity: self.opacity,
            position: pointer + self.offset,
            lines,
        };
        let tooltip_changed = shown != self.tooltip;
        self.tooltip = shown;

        let autoplay = if autoplay && self.last_autoplayed != Some(key) {
            self.last_autoplayed = Some(key);
            Some(key)
        } else {
            None
        };
        HoverOutcome {
            tooltip_changed,
            autoplay,
        }
    }

    /// Hides the tooltip. Returns whether it was visible.
    pub fn hide(&mut self) -> bool {
        let was_visible = self.tooltip.is_visible();
        self.tooltip.opacity = 0.0;
        was_visible
    }

    /// Hides the tooltip and forgets the last auto-played item (on dataset replacement).
    pub fn reset(&mut self) -> bool {
        self.last_autoplayed = None;
        self.hide()
    }

    /// The current tooltip.
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Key of the last item played on hover.
    pub fn last_autoplayed(&self) -> Option<usize> {
        self.last_autoplayed
    }
}
