// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// A delegated provider could not produce the requested data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the request; the message is shown to the user as-is.
    #[error("{0}")]
    Rejected(String),
    /// No database is open, so there is nothing to compute from.
    #[error("No database selected")]
    NoDatabase,
}

/// The playback service refused a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The file could not be opened or decoded by the playback backend.
    #[error("cannot play {path}: {reason}")]
    Unplayable {
        /// The path that was requested.
        path: String,
        /// Backend-provided reason.
        reason: String,
    },
    /// The backend is not available at all.
    #[error("playback backend unavailable")]
    Unavailable,
}

/// Embedding parameters outside their accepted range or step.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    /// Perplexity must be a multiple of 5 within `5..=50`.
    #[error("perplexity {0} is not a multiple of 5 in 5..=50")]
    Perplexity(u32),
    /// Theta must be finite and within `0.01..=1`.
    #[error("theta {0} is outside 0.01..=1")]
    Theta(f64),
    /// Epochs must be a multiple of 100 within `0..=10000`.
    #[error("epochs {0} is not a multiple of 100 in 0..=10000")]
    Epochs(u32),
}

/// A dataset assignment that violates the data model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Waveform sample times must never decrease.
    #[error("sample {index} goes back in time ({time} < {previous})")]
    UnorderedSamples {
        /// Offending sample index.
        index: usize,
        /// Its time.
        time: f64,
        /// The time of the sample before it.
        previous: f64,
    },
    /// A coordinate, time, or amplitude was NaN or infinite.
    #[error("item {index} has a non-finite value")]
    NonFinite {
        /// Offending item index (position in the sequence).
        index: usize,
    },
    /// Envelope amplitudes are pre-normalized to `[-1, 1]` with `min <= max`.
    #[error("sample {index} has an amplitude outside [-1, 1] or min > max")]
    AmplitudeOutOfRange {
        /// Offending sample index.
        index: usize,
    },
    /// Point indices identify points within a snapshot and must be unique.
    #[error("point index {0} appears more than once")]
    DuplicateIndex(usize),
}
