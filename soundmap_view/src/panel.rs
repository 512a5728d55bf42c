// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views wired to their data providers.
//!
//! A panel owns a view plus the request state for its dataset. Requests are
//! asynchronous: the provider may reply on a later turn, or never. A generation
//! counter discards replies that arrive after a newer request was issued.
//!
//! Panels are shared as `Rc<RefCell<_>>` so a reply can find its way back. No borrow is
//! held across a provider call, so a provider may reply synchronously.

use core::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use soundmap_core::{
    CategoryPalette, EmbeddingEntry, EmbeddingParams, EmbeddingProvider, ProviderError, Surface,
    WaveformProvider, WaveformSample, bucket_count_for_width, points_from_entries,
    resolve_file_path,
};

use crate::engine::{Notice, PointCloudView, WaveformView};

const MAP_FAILED: &str = "Failed to calculate t-SNE map: ";
const WAVEFORM_FAILED: &str = "Failed to fetch waveform: ";
const NO_DATABASE: &str = "No database selected";
const NO_FILE: &str = "No file selected";

/// Where a panel's latest request stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing requested.
    #[default]
    Idle,
    /// Waiting for the provider.
    Loading,
    /// The latest reply was applied.
    Ready,
    /// The latest reply was an error.
    Failed(String),
}

/// Identifies one request; compare with [`FetchTracker::is_current`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Request generations and status.
#[derive(Clone, Debug, Default)]
pub struct FetchTracker {
    generation: u64,
    status: FetchStatus,
}

impl FetchTracker {
    /// Creates an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding any in flight.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        FetchTicket(self.generation)
    }

    /// Whether `ticket` belongs to the latest request.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation && self.status == FetchStatus::Loading
    }

    /// Marks the latest request as applied.
    pub fn succeed(&mut self) {
        self.status = FetchStatus::Ready;
    }

    /// Marks the latest request as failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = FetchStatus::Failed(message.into());
    }

    /// Abandons any request in flight.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.status = FetchStatus::Idle;
    }

    /// Current status.
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }
}

/// The t-SNE map view and its embedding requests.
#[derive(Debug)]
pub struct MapPanel<S: Surface + 'static> {
    view: PointCloudView<S>,
    database: Option<PathBuf>,
    params: EmbeddingParams,
    palette: CategoryPalette,
    fetch: FetchTracker,
}

impl<S: Surface + 'static> MapPanel<S> {
    /// Wraps a map view; categories are colored from `palette`.
    pub fn new(view: PointCloudView<S>, palette: CategoryPalette) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            view,
            database: None,
            params: EmbeddingParams::default(),
            palette,
            fetch: FetchTracker::new(),
        }))
    }

    /// Opens (or closes) a database and recomputes the map.
    pub fn set_database(
        this: &Rc<RefCell<Self>>,
        database: Option<PathBuf>,
        provider: &dyn EmbeddingProvider,
    ) {
        {
            let mut panel = this.borrow_mut();
            if let Some(db) = &database {
                panel.view.set_database_path(db);
            }
            panel.database = database;
        }
        Self::refresh(this, provider);
    }

    /// Changes the embedding parameters and recomputes the map.
    pub fn set_params(
        this: &Rc<RefCell<Self>>,
        params: EmbeddingParams,
        provider: &dyn EmbeddingProvider,
    ) {
        this.borrow_mut().params = params;
        Self::refresh(this, provider);
    }

    /// Requests a fresh embedding for the open database.
    ///
    /// Without a database the map is cleared and a notice shown. A failed request keeps
    /// the last map and shows the error over it.
    pub fn refresh(this: &Rc<RefCell<Self>>, provider: &dyn EmbeddingProvider) {
        let (database, params, ticket) = {
            let mut panel = this.borrow_mut();
            let Some(database) = panel.database.clone() else {
                panel.fetch.cancel();
                panel.view.clear_items();
                panel.view.set_notice(Some(Notice::Info(NO_DATABASE.into())));
                return;
            };
            let ticket = panel.fetch.begin();
            (database, panel.params, ticket)
        };
        log::info!(
            "computing map for {} (perplexity {}, theta {}, epochs {})",
            database.display(),
            params.perplexity(),
            params.theta(),
            params.epochs()
        );
        let weak = Rc::downgrade(this);
        provider.compute_embedding(
            &database,
            params,
            Box::new(move |result| {
                with_panel(&weak, |panel| panel.apply_embedding(ticket, result));
            }),
        );
    }

    /// The map view.
    pub fn view(&self) -> &PointCloudView<S> {
        &self.view
    }

    /// The map view, for input and resize forwarding.
    pub fn view_mut(&mut self) -> &mut PointCloudView<S> {
        &mut self.view
    }

    /// The open database.
    pub fn database(&self) -> Option<&Path> {
        self.database.as_deref()
    }

    /// Current embedding parameters.
    pub fn params(&self) -> EmbeddingParams {
        self.params
    }

    /// Status of the latest request.
    pub fn status(&self) -> &FetchStatus {
        self.fetch.status()
    }

    /// File of the selected point, as stored in the database.
    pub fn selected_file(&self) -> Option<&str> {
        let index = self.view.selection().selected_index?;
        self.view
            .items()
            .iter()
            .find(|p| p.index == index)
            .map(|p| p.source_id.as_str())
    }

    fn apply_embedding(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<EmbeddingEntry>, ProviderError>,
    ) {
        if !self.fetch.is_current(ticket) {
            log::debug!("discarding stale embedding reply");
            return;
        }
        let applied = result
            .map_err(|e| e.to_string())
            .map(|entries| points_from_entries(entries, &self.palette))
            .and_then(|points| self.view.set_items(points).map_err(|e| e.to_string()));
        match applied {
            Ok(()) => {
                log::info!("map ready: {} points", self.view.items().len());
                self.fetch.succeed();
                self.view.set_notice(None);
            }
            Err(e) => {
                let message = format!("{MAP_FAILED}{e}");
                log::error!("{message}");
                self.fetch.fail(message.clone());
                self.view.set_notice(Some(Notice::Error(message)));
            }
        }
    }
}

/// The waveform view and its envelope requests.
#[derive(Debug)]
pub struct WaveformPanel<S: Surface + 'static> {
    view: WaveformView<S>,
    database: Option<PathBuf>,
    file: Option<String>,
    fetch: FetchTracker,
}

impl<S: Surface + 'static> WaveformPanel<S> {
    /// Wraps a waveform view.
    pub fn new(view: WaveformView<S>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            view,
            database: None,
            file: None,
            fetch: FetchTracker::new(),
        }))
    }

    /// Opens (or closes) a database and reloads the selected file.
    pub fn set_database(
        this: &Rc<RefCell<Self>>,
        database: Option<PathBuf>,
        provider: &dyn WaveformProvider,
    ) {
        {
            let mut panel = this.borrow_mut();
            if let Some(db) = &database {
                panel.view.set_database_path(db);
            }
            panel.database = database;
        }
        Self::reload(this, provider);
    }

    /// Shows the envelope of `file` (as stored in the database), or nothing.
    pub fn select_file(
        this: &Rc<RefCell<Self>>,
        file: Option<String>,
        provider: &dyn WaveformProvider,
    ) {
        this.borrow_mut().file = file;
        Self::reload(this, provider);
    }

    /// Requests the envelope for the selected file at the current plot width.
    ///
    /// The overlay is rebound to the file before the request goes out, so its
    /// playback cursor follows the new file right away.
    pub fn reload(this: &Rc<RefCell<Self>>, provider: &dyn WaveformProvider) {
        let (database, path, buckets, ticket) = {
            let mut panel = this.borrow_mut();
            let (database, file) = match (panel.database.clone(), panel.file.clone()) {
                (Some(database), Some(file)) => (database, file),
                (database, _) => {
                    let message = if database.is_none() { NO_DATABASE } else { NO_FILE };
                    panel.fetch.cancel();
                    panel.view.clear_items();
                    panel.view.set_notice(Some(Notice::Info(message.into())));
                    return;
                }
            };
            let path = resolve_file_path(&database, &file);
            panel.view.bind_source(path.to_string_lossy().into_owned());
            let width = panel.view.layout().map_or(0.0, |l| l.plot.width());
            let buckets = bucket_count_for_width(width);
            let ticket = panel.fetch.begin();
            (database, path, buckets, ticket)
        };
        log::info!("fetching {buckets} buckets for {}", path.display());
        let weak = Rc::downgrade(this);
        provider.compute_envelope(
            &database,
            &path,
            buckets,
            Box::new(move |result| {
                with_panel(&weak, |panel| panel.apply_envelope(ticket, result));
            }),
        );
    }

    /// The waveform view.
    pub fn view(&self) -> &WaveformView<S> {
        &self.view
    }

    /// The waveform view, for resize forwarding.
    pub fn view_mut(&mut self) -> &mut WaveformView<S> {
        &mut self.view
    }

    /// The selected file, as stored in the database.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Status of the latest request.
    pub fn status(&self) -> &FetchStatus {
        self.fetch.status()
    }

    fn apply_envelope(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<WaveformSample>, ProviderError>,
    ) {
        if !self.fetch.is_current(ticket) {
            log::debug!("discarding stale envelope reply");
            return;
        }
        let applied = result
            .map_err(|e| e.to_string())
            .and_then(|samples| self.view.set_items(samples).map_err(|e| e.to_string()));
        match applied {
            Ok(()) => {
                self.fetch.succeed();
                self.view.set_notice(None);
            }
            Err(e) => {
                let message = format!("{WAVEFORM_FAILED}{e}");
                log::error!("{message}");
                self.fetch.fail(message.clone());
                self.view.set_notice(Some(Notice::Error(message)));
            }
        }
    }
}

/// Runs `f` on a panel that is still alive and not already borrowed.
fn with_panel<P>(weak: &Weak<RefCell<P>>, f: impl FnOnce(&mut P)) {
    let Some(panel) = weak.upgrade() else {
        log::debug!("panel dropped before its reply arrived");
        return;
    };
    let Ok(mut panel) = panel.try_borrow_mut() else {
        log::warn!("panel busy, dropping provider reply");
        return;
    };
    f(&mut panel);
}
