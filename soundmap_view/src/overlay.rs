// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live playback cursor on its own surface.
//!
//! Position events arrive at a steady cadence while a file plays. Each one clears and
//! redraws only the overlay surface; the content surface is never touched.
//!
//! Binding state machine:
//! - `Unbound -> Bound(a)` on first bind;
//! - `Bound(a) -> Bound(b)` on rebind: unsubscribe `a`, clear, subscribe `b`;
//! - `Bound -> Unbound` on teardown: unsubscribe, release the surface.

use core::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use kurbo::Rect;
use peniko::Brush;
use peniko::color::palette::css;
use smallvec::SmallVec;
use soundmap_charts::ScaleLinear;
use soundmap_core::{
    Observers, PlaybackCursor, PlaybackEvents, Primitive, Subscription, Surface,
};

use crate::events::ViewEvent;
use crate::transform::ViewTransform;

/// Binding state of an overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayState {
    /// Not listening to anything.
    Unbound,
    /// Listening for events about this source.
    Bound(String),
}

/// What the overlay needs to place a cursor: the time scale, pan/zoom and the plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayGeometry {
    /// Base scale from seconds to base pixels.
    pub time: ScaleLinear,
    /// Current pan/zoom.
    pub view: ViewTransform,
    /// The plot rectangle; the cursor spans its height and is hidden outside its width.
    pub plot: Rect,
}

impl OverlayGeometry {
    /// Screen x for `t` seconds.
    pub fn cursor_x(&self, t: f64) -> f64 {
        self.view.k * self.time.map(t) + self.view.tx
    }
}

/// Cursor line styling.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorStyle {
    /// Line paint.
    pub brush: Brush,
    /// Line width.
    pub width: f64,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            brush: Brush::Solid(css::BLACK),
            width: 1.0,
        }
    }
}

#[derive(Debug)]
struct Shared<S> {
    surface: S,
    /// `None` while unbound.
    cursor: Option<PlaybackCursor>,
    geometry: Option<OverlayGeometry>,
    style: CursorStyle,
    draws: usize,
}

impl<S: Surface> Shared<S> {
    /// Clears and redraws the cursor for the current position. Returns whether a line was drawn.
    fn repaint(&mut self) -> bool {
        self.surface.clear();
        let (Some(t), Some(geom)) = (self.position(), self.geometry) else {
            return false;
        };
        let x = geom.cursor_x(t);
        if !x.is_finite() || x < geom.plot.x0 || x > geom.plot.x1 {
            return false;
        }
        self.surface.draw(Primitive::line(
            (x, geom.plot.y0),
            (x, geom.plot.y1),
            self.style.brush.clone(),
            self.style.width,
        ));
        self.draws += 1;
        true
    }

    fn is_bound_to(&self, source_id: &str) -> bool {
        self.cursor.as_ref().is_some_and(|c| c.source_id == source_id)
    }

    fn position(&self) -> Option<f64> {
        self.cursor.as_ref().and_then(|c| c.position)
    }

    fn set_position(&mut self, position: Option<f64>) {
        if let Some(cursor) = &mut self.cursor {
            cursor.position = position;
        }
    }
}

/// A raster overlay driven by external playback events.
pub struct LiveOverlaySync<S> {
    shared: Rc<RefCell<Shared<S>>>,
    hub: Rc<PlaybackEvents>,
    events: Rc<Observers<ViewEvent>>,
    subscriptions: SmallVec<[Subscription; 2]>,
}

impl<S> core::fmt::Debug for LiveOverlaySync<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LiveOverlaySync")
            .field("cursor", &self.shared.borrow().cursor)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl<S: Surface + 'static> LiveOverlaySync<S> {
    /// Creates an unbound overlay drawing into `surface`.
    pub fn new(
        surface: S,
        hub: Rc<PlaybackEvents>,
        events: Rc<Observers<ViewEvent>>,
        style: CursorStyle,
    ) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                surface,
                cursor: None,
                geometry: None,
                style,
                draws: 0,
            })),
            hub,
            events,
            subscriptions: SmallVec::new(),
        }
    }

    /// Current binding state.
    pub fn state(&self) -> OverlayState {
        match &self.shared.borrow().cursor {
            Some(c) => OverlayState::Bound(c.source_id.clone()),
            None => OverlayState::Unbound,
        }
    }

    /// Binds to `source_id`, releasing any previous binding first.
    ///
    /// Binding to the source already bound is a no-op.
    pub fn bind(&mut self, source_id: impl Into<String>) {
        let source_id = source_id.into();
        if self.shared.borrow().is_bound_to(&source_id) {
            return;
        }
        self.release_subscriptions();
        {
            let mut shared = self.shared.borrow_mut();
            shared.surface.clear();
            shared.cursor = Some(PlaybackCursor {
                source_id: source_id.clone(),
                position: None,
            });
        }
        log::debug!("overlay bound to {source_id}");

        let weak = Rc::downgrade(&self.shared);
        let events = Rc::clone(&self.events);
        self.subscriptions.push(self.hub.on_position(move |e| {
            let painted = with_matching(&weak, &e.source_id, |shared| {
                log::trace!("cursor at {:.3}s for {}", e.position, e.source_id);
                shared.set_position(Some(e.position));
                shared.repaint();
            });
            if painted {
                events.notify(&ViewEvent::OverlayRepainted);
            }
        }));

        let weak = Rc::downgrade(&self.shared);
        let events = Rc::clone(&self.events);
        self.subscriptions.push(self.hub.on_finished(move |e| {
            let cleared = with_matching(&weak, &e.source_id, |shared| {
                shared.set_position(None);
                shared.surface.clear();
            });
            if cleared {
                events.notify(&ViewEvent::OverlayRepainted);
            }
        }));
        self.events.notify(&ViewEvent::OverlayRepainted);
    }

    /// Unsubscribes, clears and releases the surface, and returns to `Unbound`.
    pub fn teardown(&mut self) {
        self.release_subscriptions();
        let mut shared = self.shared.borrow_mut();
        if let Some(cursor) = shared.cursor.take() {
            log::debug!("overlay unbound from {}", cursor.source_id);
        }
        shared.geometry = None;
        shared.surface.release();
    }

    /// Updates placement after a layout or pan/zoom change and re-places the cursor.
    pub fn set_geometry(&mut self, geometry: Option<OverlayGeometry>) {
        let repainted = {
            let mut shared = self.shared.borrow_mut();
            if shared.geometry == geometry {
                false
            } else {
                shared.geometry = geometry;
                if shared.position().is_some() {
                    shared.repaint();
                    true
                } else {
                    false
                }
            }
        };
        if repainted {
            self.events.notify(&ViewEvent::OverlayRepainted);
        }
    }

    /// Resizes the overlay surface.
    pub fn resize(&mut self, size: kurbo::Size) {
        self.shared.borrow_mut().surface.resize(size);
    }

    /// Last position received for the bound source, if still playing.
    pub fn position(&self) -> Option<f64> {
        self.shared.borrow().position()
    }

    /// The bound source and its last known position, or `None` while unbound.
    pub fn cursor(&self) -> Option<PlaybackCursor> {
        self.shared.borrow().cursor.clone()
    }

    /// Number of cursor lines drawn so far.
    pub fn draw_count(&self) -> usize {
        self.shared.borrow().draws
    }

    /// Number of live hub subscriptions held by this overlay.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }

    /// The overlay surface.
    pub fn surface(&self) -> Ref<'_, S> {
        Ref::map(self.shared.borrow(), |s| &s.surface)
    }

    fn release_subscriptions(&mut self) {
        // Dropping each guard unsubscribes it.
        self.subscriptions.clear();
    }
}

/// Runs `f` if the overlay still exists and is bound to `source_id`.
fn with_matching<S: Surface>(
    weak: &Weak<RefCell<Shared<S>>>,
    source_id: &str,
    f: impl FnOnce(&mut Shared<S>),
) -> bool {
    let Some(shared) = weak.upgrade() else {
        return false;
    };
    let Ok(mut shared) = shared.try_borrow_mut() else {
        log::warn!("overlay busy, dropping playback event for {source_id}");
        return false;
    };
    if !shared.is_bound_to(source_id) {
        return false;
    }
    f(&mut shared);
    true
}
