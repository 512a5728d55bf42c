// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior across the engine, overlay and panels.

use core::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use peniko::{Brush, Color};
use soundmap_core::{
    CategoryPalette, DisplayList, EmbeddingEntry, EmbeddingParams, EmbeddingProvider, MapPoint,
    PlaybackError, PlaybackEvents, PlaybackService, Primitive, ProviderError, Reply,
    WaveformProvider, WaveformSample,
};

use crate::{
    CoordinateTransform, FetchStatus, MapPanel, OverlayState, PointCloudStrategy, PointCloudView,
    SelectionChange, SpatialIndex, ViewConfig, ViewEngine, ViewEvent, ViewSurfaces,
    WaveformPanel, WaveformStrategy, WaveformView,
};

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

/// Rejects every file, as a backend without the right decoder would.
#[derive(Debug, Default)]
struct BrokenPlayback {
    attempts: Cell<usize>,
}

impl PlaybackService for BrokenPlayback {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        self.attempts.set(self.attempts.get() + 1);
        Err(PlaybackError::Unplayable {
            path: path.display().to_string(),
            reason: "unsupported codec".into(),
        })
    }
}

/// Holds replies until the test decides to deliver them.
#[derive(Default)]
struct DeferredEmbedding {
    pending: RefCell<Vec<Reply<Vec<EmbeddingEntry>>>>,
}

impl EmbeddingProvider for DeferredEmbedding {
    fn compute_embedding(
        &self,
        _database: &Path,
        _params: EmbeddingParams,
        reply: Reply<Vec<EmbeddingEntry>>,
    ) {
        self.pending.borrow_mut().push(reply);
    }
}

impl DeferredEmbedding {
    fn take(&self, i: usize) -> Reply<Vec<EmbeddingEntry>> {
        self.pending.borrow_mut().remove(i)
    }
}

/// Replies immediately and records what was asked for.
#[derive(Default)]
struct ImmediateEnvelope {
    requests: RefCell<Vec<(PathBuf, usize)>>,
    fail: Cell<bool>,
}

impl WaveformProvider for ImmediateEnvelope {
    fn compute_envelope(
        &self,
        _database: &Path,
        file: &Path,
        bucket_count: usize,
        reply: Reply<Vec<WaveformSample>>,
    ) {
        self.requests
            .borrow_mut()
            .push((file.to_path_buf(), bucket_count));
        if self.fail.get() {
            reply(Err(ProviderError::Rejected("decoder error".into())));
        } else {
            reply(Ok(vec![
                WaveformSample::new(0.0, -0.5, 0.5),
                WaveformSample::new(1.0, -0.2, 0.9),
            ]));
        }
    }
}

fn surfaces() -> ViewSurfaces<DisplayList> {
    ViewSurfaces {
        guides: DisplayList::new(),
        content: DisplayList::new(),
        overlay: DisplayList::new(),
    }
}

fn map_view(
    hub: &Rc<PlaybackEvents>,
    playback: &Rc<RecordingPlayback>,
) -> PointCloudView<DisplayList> {
    let playback: Rc<dyn PlaybackService> = playback.clone();
    ViewEngine::new(
        PointCloudStrategy::new(),
        ViewConfig::new().with_database_path("/data/sounds.db"),
        surfaces(),
        Rc::clone(hub),
        playback,
    )
}

fn waveform_view(hub: &Rc<PlaybackEvents>) -> WaveformView<DisplayList> {
    ViewEngine::new(
        WaveformStrategy::new(),
        ViewConfig::new(),
        surfaces(),
        Rc::clone(hub),
        Rc::new(RecordingPlayback::default()),
    )
}

fn two_points() -> Vec<MapPoint> {
    vec![
        MapPoint::new(0, (0.0, 0.0), "a.wav"),
        MapPoint::new(1, (10.0, 10.0), "b.wav"),
    ]
}

fn is_fill(p: &Primitive, color: Color) -> bool {
    matches!(p, Primitive::Disc { fill: Brush::Solid(c), .. } if *c == color)
}

#[test]
fn nearest_within_radius_matches_brute_force() {
    let mut state = 0x2545_f491_u64;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1_u64 << 53) as f64 * 100.0
    };
    let points: Vec<Point> = (0..300).map(|_| Point::new(next(), next())).collect();
    let index = SpatialIndex::build(points.iter().copied().enumerate());

    for _ in 0..200 {
        let q = Point::new(next(), next());
        let r = 4.0;
        let best = points
            .iter()
            .map(|p| p.distance(q))
            .fold(f64::INFINITY, f64::min);
        match index.nearest_within_radius(q.x, q.y, r) {
            Some(slot) => {
                assert!(best <= r);
                assert!((points[slot].distance(q) - best).abs() < 1e-9);
            }
            None => assert!(best > r),
        }
    }
}

#[test]
fn identity_transform_equals_base_scales() {
    let hub = PlaybackEvents::new();
    let mut view = map_view(&hub, &Rc::default());
    view.mount(Size::new(300.0, 200.0));
    view.set_items(two_points()).unwrap();
    let t: &CoordinateTransform = view.transform().unwrap();
    for p in [Point::new(0.0, 0.0), Point::new(3.5, 7.25), Point::new(10.0, 10.0)] {
        assert_eq!(t.apply(p), t.to_base(p));
        let back = t.invert(t.apply(p));
        assert!((back - p).hypot() < 1e-9);
    }
}

#[test]
fn click_selects_repaints_once_and_plays() {
    let hub = PlaybackEvents::new();
    let playback = Rc::new(RecordingPlayback::default());
    let mut view = map_view(&hub, &playback);
    view.mount(Size::new(100.0, 100.0));
    view.set_items(two_points()).unwrap();

    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&changes);
    let _id = view.events().subscribe(move |e: &ViewEvent| {
        if let ViewEvent::SelectionChanged(s) = e {
            seen.borrow_mut().push(*s);
        }
    });

    let paints = view.content_paints();
    let at = view.transform().unwrap().apply(Point::new(10.0, 10.0));
    assert_eq!(view.click(at), SelectionChange::Selected(1));
    assert_eq!(view.content_paints(), paints + 1);
    assert_eq!(view.selection().selected_index, Some(1));
    assert_eq!(*playback.played.borrow(), [PathBuf::from("/data/b.wav")]);

    let selected = view.strategy().style().selected_color;
    let last = view.content().items().last().unwrap();
    assert!(is_fill(last, selected));

    // Same point again: nothing changes, nothing plays.
    assert_eq!(view.click(at), SelectionChange::Unchanged);
    assert_eq!(view.content_paints(), paints + 1);
    assert_eq!(playback.played.borrow().len(), 1);

    assert_eq!(view.click(Point::new(50.0, 50.0)), SelectionChange::Cleared);
    assert_eq!(*changes.borrow(), [Some(1), None]);
}

#[test]
fn failed_playback_keeps_selection_and_tooltip() {
    let hub = PlaybackEvents::new();
    let playback = Rc::new(BrokenPlayback::default());
    let service: Rc<dyn PlaybackService> = playback.clone();
    let mut view = ViewEngine::new(
        PointCloudStrategy::new(),
        ViewConfig::new().with_database_path("/data/sounds.db"),
        surfaces(),
        Rc::clone(&hub),
        service,
    );
    view.mount(Size::new(100.0, 100.0));
    view.set_items(two_points()).unwrap();

    let over_a = view.transform().unwrap().apply(Point::new(0.0, 0.0));
    assert!(view.pointer_moved(over_a));
    assert!(view.tooltip().is_visible());
    assert_eq!(view.tooltip().lines[0], "File: a.wav");
    assert_eq!(playback.attempts.get(), 1);

    let over_b = view.transform().unwrap().apply(Point::new(10.0, 10.0));
    assert_eq!(view.click(over_b), SelectionChange::Selected(1));
    assert_eq!(view.selection().selected_index, Some(1));
    assert_eq!(playback.attempts.get(), 2);
    assert!(view.notice().is_none());
}

#[test]
fn picking_follows_zoom_and_pan() {
    let hub = PlaybackEvents::new();
    let playback = Rc::new(RecordingPlayback::default());
    let mut view = map_view(&hub, &playback);
    view.mount(Size::new(100.0, 100.0));
    view.set_items(two_points()).unwrap();

    assert!(view.zoom(Point::new(30.0, 70.0), 4.0));
    assert!(view.pan(Vec2::new(-13.0, 21.0)));
    let k = view.view_transform().k;
    assert_eq!(k, 4.0);

    let at = view.transform().unwrap().apply(Point::new(10.0, 10.0));
    let reach = view.strategy().style().pick_radius() * k;
    assert_eq!(
        view.hit_test(at + Vec2::new(reach - 1.0, 0.0)).map(|p| p.index),
        Some(1)
    );
    assert!(view.hit_test(at + Vec2::new(reach + 1.0, 0.0)).is_none());

    assert_eq!(view.click(at), SelectionChange::Selected(1));
    assert_eq!(*playback.played.borrow(), [PathBuf::from("/data/b.wav")]);
    assert_eq!(
        view.click(at + Vec2::new(0.0, reach + 1.0)),
        SelectionChange::Cleared
    );
}

#[test]
fn one_relayout_per_genuine_resize() {
    let hub = PlaybackEvents::new();
    let mut view = map_view(&hub, &Rc::default());
    view.set_items(two_points()).unwrap();
    view.mount(Size::new(100.0, 100.0));
    assert_eq!(view.content_paints(), 1);

    assert!(!view.notify_resize(Size::new(100.0, 100.0)));
    assert_eq!(view.content_paints(), 1);

    assert!(view.notify_resize(Size::new(160.0, 100.0)));
    assert_eq!(view.content_paints(), 2);
    assert_eq!(view.guide_paints(), 2);
    assert!(!view.notify_resize(Size::new(160.0, 100.0)));
    assert_eq!(view.content_paints(), 2);
}

#[test]
fn resize_keeps_zoom() {
    let hub = PlaybackEvents::new();
    let mut view = map_view(&hub, &Rc::default());
    view.mount(Size::new(100.0, 100.0));
    view.set_items(two_points()).unwrap();
    view.zoom(Point::new(50.0, 50.0), 4.0);
    view.notify_resize(Size::new(200.0, 200.0));
    assert_eq!(view.view_transform().k, 4.0);
}

#[test]
fn rebind_resets_selection_and_drops_old_subscription() {
    let hub = PlaybackEvents::new();
    let mut view = waveform_view(&hub);
    view.mount(Size::new(200.0, 124.0));
    let samples = vec![
        WaveformSample::new(0.0, -0.5, 0.5),
        WaveformSample::new(1.0, -0.2, 0.9),
    ];
    view.bind("/data/a.wav", samples.clone()).unwrap();
    view.bind("/data/b.wav", samples).unwrap();

    assert_eq!(view.overlay_state(), OverlayState::Bound("/data/b.wav".into()));
    assert_eq!(hub.listener_count(), 2);
    hub.emit_position("/data/a.wav", 0.5);
    assert_eq!(view.overlay().draw_count(), 0);
    hub.emit_position("/data/b.wav", 0.5);
    assert_eq!(view.overlay().draw_count(), 1);
}

#[test]
fn map_rebind_clears_selection() {
    let hub = PlaybackEvents::new();
    let mut view = map_view(&hub, &Rc::default());
    view.mount(Size::new(100.0, 100.0));
    view.bind("db-1", two_points()).unwrap();
    let at = view.transform().unwrap().apply(Point::new(0.0, 0.0));
    view.click(at);
    assert_eq!(view.selection().selected_index, Some(0));

    view.bind("db-2", two_points()).unwrap();
    assert_eq!(view.selection().selected_index, None);
    assert_eq!(hub.listener_count(), 2);
}

#[test]
fn waveform_cursor_follows_playback_then_clears() {
    let hub = PlaybackEvents::new();
    let mut view = waveform_view(&hub);
    view.mount(Size::new(200.0, 124.0));
    view.bind(
        "/data/a.wav",
        vec![
            WaveformSample::new(0.0, -0.5, 0.5),
            WaveformSample::new(1.0, -0.2, 0.9),
        ],
    )
    .unwrap();
    let content_paints = view.content_paints();

    hub.emit_position("/data/a.wav", 0.5);
    {
        let overlay = view.overlay_surface();
        let [line] = overlay.items() else {
            panic!("expected one cursor line, got {:?}", overlay.items());
        };
        let bounds = line.bounds().unwrap();
        assert!((bounds.center().x - 100.0).abs() < 1e-9);
        assert!(bounds.y0 <= 0.0 && bounds.y1 >= 100.0);
    }
    assert_eq!(view.content_paints(), content_paints);

    hub.emit_finished("/data/a.wav");
    assert!(view.overlay_surface().items().is_empty());
    assert_eq!(view.overlay().position(), None);
}

#[test]
fn waveform_ignores_zoom_and_picking() {
    let hub = PlaybackEvents::new();
    let mut view = waveform_view(&hub);
    view.mount(Size::new(200.0, 124.0));
    view.set_items(vec![WaveformSample::new(0.0, -0.5, 0.5)])
        .unwrap();
    assert!(!view.zoom(Point::new(10.0, 10.0), 2.0));
    assert_eq!(view.click(Point::new(0.0, 75.0)), SelectionChange::Unchanged);
    assert!(!view.pointer_moved(Point::new(0.0, 75.0)));
}

#[test]
fn stale_embedding_reply_is_discarded() {
    let hub = PlaybackEvents::new();
    let panel = MapPanel::new(map_view(&hub, &Rc::default()), CategoryPalette::default());
    panel.borrow_mut().view_mut().mount(Size::new(100.0, 100.0));
    let provider = DeferredEmbedding::default();

    MapPanel::set_database(&panel, Some(PathBuf::from("/data/sounds.db")), &provider);
    MapPanel::refresh(&panel, &provider);
    assert_eq!(panel.borrow().status(), &FetchStatus::Loading);

    let older = provider.take(0);
    let newer = provider.take(0);
    newer(Ok(vec![EmbeddingEntry::new("new.wav", 1.0, 1.0)]));
    older(Ok(vec![
        EmbeddingEntry::new("old-1.wav", 0.0, 0.0),
        EmbeddingEntry::new("old-2.wav", 2.0, 2.0),
    ]));

    let panel = panel.borrow();
    assert_eq!(panel.status(), &FetchStatus::Ready);
    assert_eq!(panel.view().items().len(), 1);
    assert_eq!(panel.view().items()[0].source_id, "new.wav");
}

#[test]
fn embedding_failure_keeps_last_map() {
    let hub = PlaybackEvents::new();
    let panel = MapPanel::new(map_view(&hub, &Rc::default()), CategoryPalette::default());
    panel.borrow_mut().view_mut().mount(Size::new(100.0, 100.0));
    let provider = DeferredEmbedding::default();

    MapPanel::set_database(&panel, Some(PathBuf::from("/data/sounds.db")), &provider);
    provider.take(0)(Ok(vec![
        EmbeddingEntry::new("a.wav", 0.0, 0.0).with_categories(["drums"]),
        EmbeddingEntry::new("b.wav", 5.0, 5.0).with_categories(["bass"]),
    ]));
    MapPanel::set_params(
        &panel,
        EmbeddingParams::new(30, 0.5, 500).unwrap(),
        &provider,
    );
    provider.take(0)(Err(ProviderError::Rejected("out of memory".into())));

    let panel = panel.borrow();
    let expected = "Failed to calculate t-SNE map: out of memory";
    assert_eq!(panel.status(), &FetchStatus::Failed(expected.into()));
    assert_eq!(panel.view().items().len(), 2);
    assert!(panel.view().guides().texts().any(|t| t.text == expected));
}

#[test]
fn no_database_clears_map() {
    let hub = PlaybackEvents::new();
    let panel = MapPanel::new(map_view(&hub, &Rc::default()), CategoryPalette::default());
    panel.borrow_mut().view_mut().mount(Size::new(100.0, 100.0));
    let provider = DeferredEmbedding::default();
    MapPanel::set_database(&panel, None, &provider);
    assert!(provider.pending.borrow().is_empty());
    let panel = panel.borrow();
    assert!(panel.view().items().is_empty());
    assert!(
        panel
            .view()
            .guides()
            .texts()
            .any(|t| t.text == "No database selected")
    );
}

#[test]
fn waveform_panel_requests_by_plot_width() {
    let hub = PlaybackEvents::new();
    let panel = WaveformPanel::new(waveform_view(&hub));
    panel.borrow_mut().view_mut().mount(Size::new(200.0, 124.0));
    let provider = ImmediateEnvelope::default();

    WaveformPanel::set_database(&panel, Some(PathBuf::from("/data/sounds.db")), &provider);
    assert!(provider.requests.borrow().is_empty());
    assert!(
        panel
            .borrow()
            .view()
            .guides()
            .texts()
            .any(|t| t.text == "No file selected")
    );

    WaveformPanel::select_file(&panel, Some("loops\\a.wav".into()), &provider);
    assert_eq!(
        *provider.requests.borrow(),
        [(PathBuf::from("/data/loops/a.wav"), 250)]
    );
    let panel = panel.borrow();
    assert_eq!(panel.status(), &FetchStatus::Ready);
    assert_eq!(panel.view().items().len(), 2);
    assert_eq!(
        panel.view().overlay_state(),
        OverlayState::Bound("/data/loops/a.wav".into())
    );
}

#[test]
fn waveform_failure_is_reported() {
    let hub = PlaybackEvents::new();
    let panel = WaveformPanel::new(waveform_view(&hub));
    panel.borrow_mut().view_mut().mount(Size::new(200.0, 124.0));
    let provider = ImmediateEnvelope::default();
    provider.fail.set(true);

    WaveformPanel::set_database(&panel, Some(PathBuf::from("/data/sounds.db")), &provider);
    WaveformPanel::select_file(&panel, Some("a.wav".into()), &provider);
    let expected = "Failed to fetch waveform: decoder error";
    assert_eq!(
        panel.borrow().status(),
        &FetchStatus::Failed(expected.into())
    );
}
