// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static guides below, fully repainted content above.

use kurbo::Size;
use soundmap_core::Surface;

/// Two stacked surfaces with different repaint policies.
///
/// The guide surface holds static content (axes, captions, notices) and is painted at
/// layout time only. The content surface is cleared and repainted in full on every
/// content-affecting change; there is no diffing.
#[derive(Debug)]
pub struct DualLayerRenderer<S> {
    guides: S,
    content: S,
    guide_paints: usize,
    content_paints: usize,
}

impl<S: Surface> DualLayerRenderer<S> {
    /// Wraps two host surfaces.
    pub fn new(guides: S, content: S) -> Self {
        Self {
            guides,
            content,
            guide_paints: 0,
            content_paints: 0,
        }
    }

    /// Resizes both surfaces.
    pub fn resize(&mut self, size: Size) {
        self.guides.resize(size);
        self.content.resize(size);
    }

    /// Clears the guide surface and lets `paint` redraw it.
    pub fn paint_guides(&mut self, paint: impl FnOnce(&mut S)) {
        self.guides.clear();
        paint(&mut self.guides);
        self.guide_paints += 1;
    }

    /// Clears the content surface and lets `paint` redraw it.
    pub fn paint_content(&mut self, paint: impl FnOnce(&mut S)) {
        self.content.clear();
        paint(&mut self.content);
        self.content_paints += 1;
    }

    /// Releases both surfaces.
    pub fn release(&mut self) {
        self.guides.release();
        self.content.release();
    }

    /// The guide surface.
    pub fn guides(&self) -> &S {
        &self.guides
    }

    /// The content surface.
    pub fn content(&self) -> &S {
        &self.content
    }

    /// Completed guide repaints.
    pub fn guide_paints(&self) -> usize {
        self.guide_paints
    }

    /// Completed content repaints.
    pub fn content_paints(&self) -> usize {
        self.content_paints
    }
}
