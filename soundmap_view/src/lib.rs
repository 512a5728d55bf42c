// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive views for a sound collection.
//!
//! Two views share one engine:
//! - a **point cloud**: every file of a database placed by its 2D embedding, colored by
//!   category, with pan/zoom, hover tooltips, click selection and playback;
//! - a **waveform**: the min/max envelope of one file over time, with a live cursor
//!   that follows playback.
//!
//! Each view paints into three host-provided [`Surface`](soundmap_core::Surface)s:
//! static guides at layout time, content in full on every change, and a playback
//! cursor driven by [`PlaybackEvents`](soundmap_core::PlaybackEvents). The host forwards
//! pointer input and container size changes; [`ViewEvent`]s tell it what changed.
//!
//! The panels in this crate connect a view to its data provider and handle failed and
//! out-of-order replies.
//!
//! ## Minimal example
//!
//! ```
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use soundmap_core::{DisplayList, MapPoint, PlaybackError, PlaybackEvents, PlaybackService};
//! use soundmap_view::{PointCloudStrategy, SelectionChange, ViewConfig, ViewEngine, ViewSurfaces};
//!
//! struct Silent;
//!
//! impl PlaybackService for Silent {
//!     fn play(&self, _path: &std::path::Path) -> Result<(), PlaybackError> {
//!         Ok(())
//!     }
//! }
//!
//! let surfaces = ViewSurfaces {
//!     guides: DisplayList::new(),
//!     content: DisplayList::new(),
//!     overlay: DisplayList::new(),
//! };
//! let mut view = ViewEngine::new(
//!     PointCloudStrategy::new(),
//!     ViewConfig::new(),
//!     surfaces,
//!     PlaybackEvents::new(),
//!     Rc::new(Silent),
//! );
//! view.mount(Size::new(300.0, 200.0));
//! view.set_items(vec![
//!     MapPoint::new(0, (0.0, 0.0), "kick.wav"),
//!     MapPoint::new(1, (4.0, 2.0), "snare.wav"),
//! ])
//! .unwrap();
//!
//! let at = view.transform().unwrap().apply(Point::new(4.0, 2.0));
//! assert_eq!(view.click(at), SelectionChange::Selected(1));
//! ```

mod config;
mod engine;
mod events;
mod hover;
mod layers;
mod overlay;
mod panel;
mod point_cloud;
mod resize;
mod selection;
mod spatial;
mod strategy;
mod transform;
mod waveform;

#[cfg(test)]
mod scenario_tests;

pub use config::ViewConfig;
pub use engine::{Notice, PointCloudView, ViewEngine, ViewSurfaces, WaveformView};
pub use events::ViewEvent;
pub use hover::{HoverOutcome, HoverTooltip, Tooltip, TooltipLines};
pub use layers::DualLayerRenderer;
pub use overlay::{CursorStyle, LiveOverlaySync, OverlayGeometry, OverlayState};
pub use panel::{FetchStatus, FetchTicket, FetchTracker, MapPanel, WaveformPanel};
pub use point_cloud::{PointCloudStrategy, PointCloudStyle};
pub use resize::{ResizeDecision, ResizeReactor};
pub use selection::{SelectionChange, SelectionController};
pub use spatial::SpatialIndex;
pub use strategy::{ContentContext, DrawStrategy};
pub use transform::{CoordinateTransform, ViewTransform};
pub use waveform::{WaveformStrategy, WaveformStyle};
