// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the soundmap views.
//!
//! This crate holds everything the view engine shares with its host:
//! - **Data model**: map points, waveform envelope samples, playback cursors.
//! - **Primitives**: the small set of shapes the engine draws, and the [`Surface`] trait a
//!   host implements to receive them.
//! - **Capabilities**: traits for the collaborators the engine delegates to (embedding and
//!   envelope providers, audio playback), plus the playback event hub.
//!
//! Everything here is single-threaded. Shared handles use `Rc`, not `Arc`.

mod error;
mod model;
mod observer;
mod palette;
mod playback;
mod provider;
mod scene;

pub use error::{DataError, ParamError, PlaybackError, ProviderError};
pub use model::{
    EmbeddingEntry, MapPoint, PlaybackCursor, SelectionState, WaveformSample, points_from_entries,
    validate_points, validate_samples,
};
pub use observer::{ObserverId, Observers};
pub use palette::{CATEGORY10, CategoryPalette};
pub use playback::{
    FinishedEvent, PlaybackEvents, PlaybackService, PositionEvent, Subscription,
    resolve_file_path,
};
pub use provider::{
    EmbeddingParams, EmbeddingProvider, Reply, WaveformProvider, bucket_count_for_width,
};
pub use scene::{DisplayList, Primitive, Surface, TextAnchor, TextBaseline, TextPrimitive};
