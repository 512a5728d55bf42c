// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives both soundmap views through a short scripted session and writes an HTML report.

mod html;
mod svg;
mod synth;

use core::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use kurbo::Size;
use soundmap_core::{CategoryPalette, DisplayList, PlaybackEvents, PlaybackService};
use soundmap_view::{
    MapPanel, PointCloudStrategy, ViewConfig, ViewEngine, ViewEvent, ViewSurfaces, WaveformPanel,
    WaveformStrategy,
};

use crate::synth::{LoggingPlayback, SynthEmbedding, SynthEnvelope};

const MAP_SIZE: Size = Size::new(640.0, 420.0);
const WAVEFORM_SIZE: Size = Size::new(640.0, 160.0);
const REPORT: &str = "soundmap_demo.html";

fn surfaces() -> ViewSurfaces<DisplayList> {
    ViewSurfaces {
        guides: DisplayList::new(),
        content: DisplayList::new(),
        overlay: DisplayList::new(),
    }
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let database = PathBuf::from("/srv/sounds/library.db");
    let categories = vec!["kick", "snare", "hat", "bass", "pad"];
    let embedding = SynthEmbedding {
        categories: categories.clone(),
        per_category: 24,
    };
    let envelope = SynthEnvelope { duration: 4.0 };

    let hub = PlaybackEvents::new();
    let player = Rc::new(LoggingPlayback::default());
    let playback: Rc<dyn PlaybackService> = player.clone();
    let config = ViewConfig::new().with_database_path(&database);

    let map = MapPanel::new(
        ViewEngine::new(
            PointCloudStrategy::new(),
            config.clone(),
            surfaces(),
            Rc::clone(&hub),
            Rc::clone(&playback),
        ),
        CategoryPalette::new(categories.iter().copied()),
    );
    let waveform = WaveformPanel::new(ViewEngine::new(
        WaveformStrategy::new(),
        config,
        surfaces(),
        Rc::clone(&hub),
        playback,
    ));

    let repaints = Rc::new(Cell::new(0_usize));
    let selections = Rc::new(RefCell::new(Vec::new()));
    {
        let repaints = Rc::clone(&repaints);
        let selections = Rc::clone(&selections);
        map.borrow().view().events().subscribe(move |e| match e {
            ViewEvent::ContentRepainted => repaints.set(repaints.get() + 1),
            ViewEvent::SelectionChanged(s) => selections.borrow_mut().push(*s),
            _ => {}
        });
    }

    map.borrow_mut().view_mut().mount(MAP_SIZE);
    waveform.borrow_mut().view_mut().mount(WAVEFORM_SIZE);
    MapPanel::set_database(&map, Some(database.clone()), &embedding);
    WaveformPanel::set_database(&waveform, Some(database), &envelope);

    // Zoom in around the middle, then hover and click the first point still on screen.
    let target = {
        let mut panel = map.borrow_mut();
        let view = panel.view_mut();
        view.zoom(MAP_SIZE.to_rect().center(), 1.5);
        let transform = view.transform().copied();
        let plot = view.layout().map(|l| l.plot);
        match (transform, plot) {
            (Some(t), Some(plot)) => view
                .items()
                .iter()
                .map(|p| t.apply(p.position))
                .find(|s| plot.contains(*s)),
            _ => None,
        }
    };
    let Some(target) = target else {
        log::warn!("no point on screen after zooming");
        return Ok(());
    };
    {
        let mut panel = map.borrow_mut();
        panel.view_mut().pointer_moved(target);
        panel.view_mut().click(target);
    }

    let selected = map.borrow().selected_file().map(str::to_owned);
    log::info!("selected {selected:?}");
    WaveformPanel::select_file(&waveform, selected, &envelope);

    // The player reports progress for whatever it was last asked to play.
    if let Some(path) = player.last_played() {
        hub.emit_position(&path.to_string_lossy(), 1.25);
    }

    log::info!(
        "map content repainted {} times; selection history {:?}",
        repaints.get(),
        selections.borrow()
    );

    let sections = {
        let map = map.borrow();
        let waveform = waveform.borrow();
        vec![
            html::HtmlSection {
                title: "t-SNE map",
                description: format!(
                    "{} files, zoom {:.2}, selected {:?}.",
                    map.view().items().len(),
                    map.view().view_transform().k,
                    map.selected_file()
                ),
                svg: {
                    let view = map.view();
                    let mut scene = svg::SvgScene::new(MAP_SIZE);
                    scene.push_layer(view.guides());
                    scene.push_layer(view.content());
                    scene.push_layer(&view.overlay_surface());
                    scene.set_tooltip(view.tooltip());
                    scene.to_svg_string()
                },
            },
            html::HtmlSection {
                title: "Waveform",
                description: format!(
                    "{} buckets of {}, cursor at {:?} s.",
                    waveform.view().items().len(),
                    waveform.file().unwrap_or("nothing"),
                    waveform.view().overlay().position()
                ),
                svg: {
                    let view = waveform.view();
                    let mut scene = svg::SvgScene::new(WAVEFORM_SIZE);
                    scene.push_layer(view.guides());
                    scene.push_layer(view.content());
                    scene.push_layer(&view.overlay_surface());
                    scene.to_svg_string()
                },
            },
        ]
    };

    let html = html::render_report("soundmap demo", &sections);
    std::fs::write(REPORT, html)?;
    log::info!("wrote {REPORT}");
    Ok(())
}
