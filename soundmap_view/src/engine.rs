// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared view engine.
//!
//! A [`ViewEngine`] owns one view's layout, pan/zoom, spatial index, selection, hover
//! tooltip and playback overlay. What it draws, and how items are picked and played,
//! comes from its [`DrawStrategy`].
//!
//! Change notifications go out through [`ViewEngine::events`] while the engine is still
//! mutably borrowed, so handlers should record what changed rather than call back in.

use core::cell::Ref;
use core::fmt;
use std::path::Path;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use peniko::Brush;
use peniko::color::palette::css;
use soundmap_charts::PlotLayout;
use soundmap_core::{
    DataError, Observers, PlaybackEvents, PlaybackService, Primitive, SelectionState, Surface,
    TextAnchor, TextBaseline, TextPrimitive, resolve_file_path,
};

use crate::config::ViewConfig;
use crate::events::ViewEvent;
use crate::hover::{HoverTooltip, Tooltip};
use crate::layers::DualLayerRenderer;
use crate::overlay::{LiveOverlaySync, OverlayGeometry, OverlayState};
use crate::point_cloud::PointCloudStrategy;
use crate::resize::{ResizeDecision, ResizeReactor};
use crate::selection::{SelectionChange, SelectionController};
use crate::spatial::SpatialIndex;
use crate::strategy::{ContentContext, DrawStrategy};
use crate::transform::{CoordinateTransform, ViewTransform};
use crate::waveform::WaveformStrategy;

/// The point-cloud map view.
pub type PointCloudView<S> = ViewEngine<PointCloudStrategy, S>;

/// The waveform envelope view.
pub type WaveformView<S> = ViewEngine<WaveformStrategy, S>;

const NOTICE_FONT_SIZE: f64 = 14.0;

/// A message drawn over the plot on the guide layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Neutral status, e.g. nothing selected yet.
    Info(String),
    /// A failed fetch. The last good frame stays underneath.
    Error(String),
}

impl Notice {
    /// The message text.
    pub fn message(&self) -> &str {
        match self {
            Self::Info(m) | Self::Error(m) => m,
        }
    }

    fn fill(&self) -> Brush {
        match self {
            Self::Info(_) => Brush::Solid(css::GRAY),
            Self::Error(_) => Brush::Solid(css::CRIMSON),
        }
    }
}

/// Host surfaces for one view, bottom to top.
#[derive(Debug)]
pub struct ViewSurfaces<S> {
    /// Static guides: axes, captions, notices.
    pub guides: S,
    /// Data marks, repainted in full.
    pub content: S,
    /// Playback cursor.
    pub overlay: S,
}

/// One interactive view over a dataset of `D::Item`.
pub struct ViewEngine<D: DrawStrategy, S: Surface + 'static> {
    strategy: D,
    config: ViewConfig,
    items: Vec<D::Item>,
    layers: DualLayerRenderer<S>,
    overlay: LiveOverlaySync<S>,
    resize: ResizeReactor,
    layout: Option<PlotLayout>,
    transform: Option<CoordinateTransform>,
    index: SpatialIndex,
    selection: SelectionController,
    hover: HoverTooltip,
    notice: Option<Notice>,
    playback: Rc<dyn PlaybackService>,
    events: Rc<Observers<ViewEvent>>,
}

impl<D: DrawStrategy, S: Surface + 'static> fmt::Debug for ViewEngine<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEngine")
            .field("items", &self.items.len())
            .field("layout", &self.layout)
            .field("transform", &self.transform)
            .field("index", &self.index)
            .field("selection", &self.selection)
            .field("notice", &self.notice)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl<D: DrawStrategy, S: Surface + 'static> ViewEngine<D, S> {
    /// Creates an unmounted view with no dataset.
    pub fn new(
        strategy: D,
        config: ViewConfig,
        surfaces: ViewSurfaces<S>,
        hub: Rc<PlaybackEvents>,
        playback: Rc<dyn PlaybackService>,
    ) -> Self {
        let events = Rc::new(Observers::new());
        let overlay = LiveOverlaySync::new(
            surfaces.overlay,
            hub,
            Rc::clone(&events),
            strategy.cursor_style(),
        );
        let hover = HoverTooltip::new(config.tooltip_offset, config.tooltip_opacity);
        Self {
            strategy,
            config,
            items: Vec::new(),
            layers: DualLayerRenderer::new(surfaces.guides, surfaces.content),
            overlay,
            resize: ResizeReactor::new(),
            layout: None,
            transform: None,
            index: SpatialIndex::empty(),
            selection: SelectionController::new(),
            hover,
            notice: None,
            playback,
            events,
        }
    }

    /// Performs the initial layout at `size` and arms the resize reactor.
    pub fn mount(&mut self, size: Size) {
        self.resize.mount(size);
        self.apply_layout(size);
    }

    /// Reports a container size change. Returns `true` if a relayout happened.
    ///
    /// Echoes of the size already applied are ignored.
    pub fn notify_resize(&mut self, size: Size) -> bool {
        match self.resize.observe(size) {
            ResizeDecision::Ignore => false,
            ResizeDecision::Apply(size) => {
                self.apply_layout(size);
                true
            }
        }
    }

    /// Validates and assigns a new dataset, resetting selection, hover and zoom.
    ///
    /// On error the current dataset and all derived state are left as they were.
    pub fn set_items(&mut self, items: Vec<D::Item>) -> Result<(), DataError> {
        self.strategy.validate(&items)?;
        self.replace_items(items);
        Ok(())
    }

    /// Drops the dataset; the placeholder (or notice) is shown instead.
    pub fn clear_items(&mut self) {
        self.replace_items(Vec::new());
    }

    /// Binds the playback overlay to `source_id` without touching the dataset.
    pub fn bind_source(&mut self, source_id: impl Into<String>) {
        self.overlay.bind(source_id);
    }

    /// Rebinds the view to a new source and dataset in one step.
    ///
    /// The dataset is validated first; on error nothing changes. Otherwise the prior
    /// overlay subscriptions, selection and spatial index are dropped before the new
    /// ones are built.
    pub fn bind(
        &mut self,
        source_id: impl Into<String>,
        items: Vec<D::Item>,
    ) -> Result<(), DataError> {
        self.strategy.validate(&items)?;
        self.overlay.bind(source_id);
        self.replace_items(items);
        Ok(())
    }

    /// Unmounts the view: unsubscribes the overlay and releases every surface.
    ///
    /// The dataset is kept; a later [`mount`](Self::mount) lays it out again.
    pub fn teardown(&mut self) {
        self.overlay.teardown();
        self.layers.release();
        self.resize.reset();
        self.layout = None;
        self.transform = None;
        self.index = SpatialIndex::empty();
        if self.selection.reset() {
            self.events.notify(&ViewEvent::SelectionChanged(None));
        }
        if self.hover.reset() {
            self.events.notify(&ViewEvent::TooltipChanged);
        }
        log::debug!("view torn down");
    }

    /// Sets the database that relative file paths resolve against.
    pub fn set_database_path(&mut self, path: impl AsRef<Path>) {
        self.config.database_path = path.as_ref().to_path_buf();
    }

    /// Shows or clears a notice on the guide layer.
    pub fn set_notice(&mut self, notice: Option<Notice>) {
        if self.notice == notice {
            return;
        }
        self.notice = notice;
        self.repaint_guides();
    }

    /// Updates hover state for a pointer at `pointer` (screen space).
    ///
    /// Returns `true` if the tooltip changed. Hovering a point other than the last one
    /// auto-played requests its playback when autoplay is enabled.
    pub fn pointer_moved(&mut self, pointer: Point) -> bool {
        let target = self.hit_slot(pointer).and_then(|slot| {
            let item = self.items.get(slot)?;
            let lines = self.strategy.tooltip_lines(item)?;
            Some((slot, self.strategy.item_key(slot, item), lines))
        });
        let slot = target.as_ref().map(|(slot, _, _)| *slot);
        let outcome = self.hover.hover(
            pointer,
            target.map(|(_, key, lines)| (key, lines)),
            self.config.autoplay_on_hover,
        );
        if outcome.autoplay.is_some()
            && let Some(slot) = slot
        {
            self.request_playback(slot);
        }
        if outcome.tooltip_changed {
            self.events.notify(&ViewEvent::TooltipChanged);
        }
        outcome.tooltip_changed
    }

    /// Hides the tooltip. Returns `true` if it was showing.
    pub fn pointer_left(&mut self) -> bool {
        let changed = self.hover.hide();
        if changed {
            self.events.notify(&ViewEvent::TooltipChanged);
        }
        changed
    }

    /// Handles a click at `pointer` (screen space).
    ///
    /// A hit on a new item selects it, repaints the content once and requests its
    /// playback. A miss clears the selection.
    pub fn click(&mut self, pointer: Point) -> SelectionChange {
        if self.strategy.pick_radius().is_none() {
            return SelectionChange::Unchanged;
        }
        let slot = self.hit_slot(pointer);
        let key = slot.and_then(|s| self.items.get(s).map(|item| self.strategy.item_key(s, item)));
        let change = self.selection.click(key);
        match change {
            SelectionChange::Unchanged => {}
            SelectionChange::Selected(key) => {
                log::debug!("selected item {key}");
                self.repaint_content();
                self.events.notify(&ViewEvent::SelectionChanged(Some(key)));
                if let Some(slot) = slot {
                    self.request_playback(slot);
                }
            }
            SelectionChange::Cleared => {
                self.repaint_content();
                self.events.notify(&ViewEvent::SelectionChanged(None));
            }
        }
        change
    }

    /// Zooms by `factor` keeping `anchor` fixed. Returns `true` if the view changed.
    pub fn zoom(&mut self, anchor: Point, factor: f64) -> bool {
        self.update_view(|t| t.zoom_at(anchor, factor))
    }

    /// Pans by `delta` screen pixels. Returns `true` if the view changed.
    pub fn pan(&mut self, delta: Vec2) -> bool {
        self.update_view(|t| t.pan_by(delta))
    }

    /// Replaces the pan/zoom transform. Returns `true` if the view changed.
    pub fn set_view_transform(&mut self, view: ViewTransform) -> bool {
        self.update_view(|t| t.set_view(view))
    }

    /// The item under `pointer`, if any.
    pub fn hit_test(&self, pointer: Point) -> Option<&D::Item> {
        self.hit_slot(pointer).and_then(|slot| self.items.get(slot))
    }

    /// The current dataset.
    pub fn items(&self) -> &[D::Item] {
        &self.items
    }

    /// The drawing strategy.
    pub fn strategy(&self) -> &D {
        &self.strategy
    }

    /// The interaction settings.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The selection.
    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    /// The tooltip as it should be presented.
    pub fn tooltip(&self) -> &Tooltip {
        self.hover.tooltip()
    }

    /// The active notice.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The current pan/zoom, identity before the first layout.
    pub fn view_transform(&self) -> ViewTransform {
        self.transform
            .as_ref()
            .map_or(ViewTransform::IDENTITY, CoordinateTransform::view)
    }

    /// Base scales plus pan/zoom, once laid out.
    pub fn transform(&self) -> Option<&CoordinateTransform> {
        self.transform.as_ref()
    }

    /// The applied layout.
    pub fn layout(&self) -> Option<PlotLayout> {
        self.layout
    }

    /// The guide surface.
    pub fn guides(&self) -> &S {
        self.layers.guides()
    }

    /// The content surface.
    pub fn content(&self) -> &S {
        self.layers.content()
    }

    /// The overlay surface.
    pub fn overlay_surface(&self) -> Ref<'_, S> {
        self.overlay.surface()
    }

    /// The overlay's binding state.
    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// The playback overlay.
    pub fn overlay(&self) -> &LiveOverlaySync<S> {
        &self.overlay
    }

    /// Completed guide repaints.
    pub fn guide_paints(&self) -> usize {
        self.layers.guide_paints()
    }

    /// Completed content repaints.
    pub fn content_paints(&self) -> usize {
        self.layers.content_paints()
    }

    /// Change notifications for the host.
    pub fn events(&self) -> &Rc<Observers<ViewEvent>> {
        &self.events
    }

    fn replace_items(&mut self, items: Vec<D::Item>) {
        log::debug!("dataset replaced: {} items", items.len());
        self.items = items;
        self.index = SpatialIndex::empty();
        let had_selection = self.selection.reset();
        let had_tooltip = self.hover.reset();
        if let Some(t) = &mut self.transform {
            t.reset();
        }
        self.rebuild_scales();
        self.repaint_guides();
        self.repaint_content();
        self.sync_overlay();
        if had_selection {
            self.events.notify(&ViewEvent::SelectionChanged(None));
        }
        if had_tooltip {
            self.events.notify(&ViewEvent::TooltipChanged);
        }
    }

    fn apply_layout(&mut self, size: Size) {
        self.layers.resize(size);
        self.overlay.resize(size);
        let layout = PlotLayout::arrange(size, self.strategy.margins());
        log::debug!("layout {}x{} -> plot {:?}", size.width, size.height, layout.plot);
        self.layout = Some(layout);
        self.rebuild_scales();
        self.repaint_guides();
        self.repaint_content();
        self.sync_overlay();
    }

    /// Recomputes base scales for the current layout, keeping pan/zoom.
    fn rebuild_scales(&mut self) {
        let Some(layout) = self.layout else {
            self.transform = None;
            return;
        };
        let (x, y) = self.strategy.base_scales(&self.items, &layout);
        match &mut self.transform {
            Some(t) => t.set_base(x, y),
            None => {
                self.transform =
                    Some(CoordinateTransform::new(x, y).with_scale_extent(self.config.scale_extent));
            }
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index = match (self.strategy.pick_radius(), &self.transform) {
            (Some(_), Some(t)) => SpatialIndex::build(
                self.items.iter().enumerate().filter_map(|(slot, item)| {
                    self.strategy.pick_position(item).map(|p| (slot, t.to_base(p)))
                }),
            ),
            _ => SpatialIndex::empty(),
        };
    }

    fn hit_slot(&self, pointer: Point) -> Option<usize> {
        let radius = self.strategy.pick_radius()?;
        let transform = self.transform.as_ref()?;
        let base = transform.screen_to_base(pointer);
        self.index.nearest_within_radius(base.x, base.y, radius)
    }

    fn update_view(&mut self, f: impl FnOnce(&mut CoordinateTransform) -> bool) -> bool {
        if !self.strategy.zoomable() {
            return false;
        }
        let Some(transform) = &mut self.transform else {
            return false;
        };
        if !f(transform) {
            return false;
        }
        self.repaint_content();
        self.sync_overlay();
        true
    }

    fn request_playback(&self, slot: usize) {
        let Some(file) = self
            .items
            .get(slot)
            .and_then(|item| self.strategy.playback_file(item))
        else {
            return;
        };
        let path = resolve_file_path(&self.config.database_path, file);
        if let Err(e) = self.playback.play(&path) {
            log::warn!("Audio playback failed: {e}");
        }
    }

    /// The plot when it has area to paint in, with the transform to paint through.
    fn paintable(&self) -> Option<(PlotLayout, CoordinateTransform)> {
        let layout = self.layout?;
        if layout.is_empty() {
            log::trace!("plot has no area, skipping repaint");
            return None;
        }
        Some((layout, *self.transform.as_ref()?))
    }

    fn repaint_guides(&mut self) {
        let Some((layout, transform)) = self.paintable() else {
            return;
        };
        let strategy = &self.strategy;
        let items = &self.items;
        let message = match &self.notice {
            Some(notice) => Some((notice.message(), notice.fill())),
            None if items.is_empty() => Some((strategy.placeholder(), Brush::Solid(css::GRAY))),
            None => None,
        };
        self.layers.paint_guides(|surface| {
            if !items.is_empty() {
                strategy.paint_guides(items, &layout, &transform, surface);
            }
            if let Some((text, fill)) = message {
                surface.draw(Primitive::Text(
                    TextPrimitive::new(layout.plot.center(), text)
                        .with_font_size(NOTICE_FONT_SIZE)
                        .with_fill(fill)
                        .with_anchor(TextAnchor::Middle)
                        .with_baseline(TextBaseline::Middle),
                ));
            }
        });
        self.events.notify(&ViewEvent::GuidesRepainted);
    }

    fn repaint_content(&mut self) {
        let Some((layout, transform)) = self.paintable() else {
            return;
        };
        let ctx = ContentContext {
            transform: &transform,
            plot: layout.plot,
            selected: self.selection.selected(),
        };
        let strategy = &self.strategy;
        let items = &self.items;
        self.layers
            .paint_content(|surface| strategy.paint_content(items, &ctx, surface));
        self.events.notify(&ViewEvent::ContentRepainted);
    }

    fn sync_overlay(&mut self) {
        let geometry = match (self.strategy.draws_cursor(), self.layout, &self.transform) {
            (true, Some(layout), Some(t)) if !layout.is_empty() && !self.items.is_empty() => {
                Some(OverlayGeometry {
                    time: *t.base_x(),
                    view: t.view(),
                    plot: layout.plot,
                })
            }
            _ => None,
        };
        self.overlay.set_geometry(geometry);
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use std::path::PathBuf;

    use soundmap_core::{DisplayList, MapPoint, PlaybackError};

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingPlayback {
        played: RefCell<Vec<PathBuf>>,
    }

    impl PlaybackService for RecordingPlayback {
        fn play(&self, path: &Path) -> Result<(), PlaybackError> {
            self.played.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn surfaces() -> ViewSurfaces<DisplayList> {
        ViewSurfaces {
            guides: DisplayList::new(),
            content: DisplayList::new(),
            overlay: DisplayList::new(),
        }
    }

    fn map_view(playback: Rc<RecordingPlayback>) -> PointCloudView<DisplayList> {
        ViewEngine::new(
            PointCloudStrategy::new(),
            ViewConfig::new().with_database_path("/data/sounds.db"),
            surfaces(),
            PlaybackEvents::new(),
            playback,
        )
    }

    fn points() -> Vec<MapPoint> {
        vec![
            MapPoint::new(0, (0.0, 0.0), "a.wav"),
            MapPoint::new(1, (10.0, 10.0), "b.wav"),
        ]
    }

    #[test]
    fn empty_view_shows_placeholder() {
        let mut view = map_view(Rc::default());
        view.mount(Size::new(100.0, 100.0));
        let texts: Vec<_> = view.guides().texts().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["No map data"]);
        assert!(view.content().items().is_empty());
    }

    #[test]
    fn zero_size_skips_painting() {
        let mut view = map_view(Rc::default());
        view.set_items(points()).unwrap();
        view.mount(Size::ZERO);
        assert_eq!(view.guide_paints(), 0);
        assert_eq!(view.content_paints(), 0);
    }

    #[test]
    fn hover_shows_tooltip_and_autoplays_once() {
        let playback = Rc::new(RecordingPlayback::default());
        let mut view = map_view(Rc::clone(&playback));
        view.mount(Size::new(100.0, 100.0));
        view.set_items(points()).unwrap();

        let at = view.transform().unwrap().apply(Point::new(10.0, 10.0));
        assert!(view.pointer_moved(at));
        assert!(view.tooltip().is_visible());
        assert_eq!(view.tooltip().lines[0], "File: b.wav");
        view.pointer_moved(at + Vec2::new(0.5, 0.0));
        assert_eq!(*playback.played.borrow(), [PathBuf::from("/data/b.wav")]);
        assert_eq!(view.selection().selected_index, None);

        assert!(view.pointer_left());
        assert!(!view.tooltip().is_visible());
    }

    #[test]
    fn invalid_dataset_leaves_view_untouched() {
        let mut view = map_view(Rc::default());
        view.mount(Size::new(100.0, 100.0));
        view.set_items(points()).unwrap();
        let paints = view.content_paints();
        let bad = vec![MapPoint::new(0, (f64::NAN, 0.0), "x.wav")];
        assert!(view.set_items(bad).is_err());
        assert_eq!(view.items().len(), 2);
        assert_eq!(view.content_paints(), paints);
    }

    #[test]
    fn zoom_repaints_content_only_and_clamps() {
        let mut view = map_view(Rc::default());
        view.mount(Size::new(100.0, 100.0));
        view.set_items(points()).unwrap();
        let guides = view.guide_paints();
        let content = view.content_paints();
        assert!(view.zoom(Point::new(40.0, 60.0), 2.0));
        assert_eq!(view.view_transform().k, 2.0);
        assert_eq!(view.guide_paints(), guides);
        assert_eq!(view.content_paints(), content + 1);
        view.zoom(Point::new(40.0, 60.0), 1e-6);
        assert_eq!(view.view_transform().k, 1.0);
    }

    #[test]
    fn error_notice_keeps_last_frame() {
        let mut view = map_view(Rc::default());
        view.mount(Size::new(100.0, 100.0));
        view.set_items(points()).unwrap();
        view.set_notice(Some(Notice::Error("Failed to calculate t-SNE map: boom".into())));
        assert_eq!(view.items().len(), 2);
        assert!(
            view.guides()
                .texts()
                .any(|t| t.text == "Failed to calculate t-SNE map: boom")
        );
        assert_eq!(view.content().items().len(), 2);
    }

    #[test]
    fn teardown_releases_surfaces_and_unbinds() {
        let mut view = map_view(Rc::default());
        view.mount(Size::new(100.0, 100.0));
        view.bind("a.wav", points()).unwrap();
        assert_eq!(view.overlay().subscription_count(), 2);
        view.teardown();
        assert_eq!(view.overlay_state(), OverlayState::Unbound);
        assert_eq!(view.overlay().subscription_count(), 0);
        assert!(view.guides().is_released());
        assert!(view.content().is_released());
        assert!(view.overlay_surface().is_released());
    }
}
