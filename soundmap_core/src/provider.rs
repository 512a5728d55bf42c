// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data provider capabilities.
//!
//! Providers are asynchronous from the caller's point of view: a request carries a
//! [`Reply`] callback that the provider invokes exactly once, now or later, on the UI
//! thread. Callers must not hold borrows of their own state across the request.

use std::path::Path;

use crate::error::{ParamError, ProviderError};
use crate::model::{EmbeddingEntry, WaveformSample};

/// Completion callback for a provider request.
pub type Reply<T> = Box<dyn FnOnce(Result<T, ProviderError>)>;

/// Validated parameters for computing an embedding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmbeddingParams {
    perplexity: u32,
    theta: f64,
    epochs: u32,
}

impl EmbeddingParams {
    /// Creates parameters, checking each against its accepted range and step.
    pub fn new(perplexity: u32, theta: f64, epochs: u32) -> Result<Self, ParamError> {
        if !(5..=50).contains(&perplexity) || perplexity % 5 != 0 {
            return Err(ParamError::Perplexity(perplexity));
        }
        if !(theta.is_finite() && (0.01..=1.0).contains(&theta)) {
            return Err(ParamError::Theta(theta));
        }
        if epochs > 10_000 || epochs % 100 != 0 {
            return Err(ParamError::Epochs(epochs));
        }
        Ok(Self {
            perplexity,
            theta,
            epochs,
        })
    }

    /// Perplexity.
    pub fn perplexity(&self) -> u32 {
        self.perplexity
    }

    /// Barnes-Hut theta.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Optimization epochs.
    pub fn epochs(&self) -> u32 {
        self.epochs
    }
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        Self {
            perplexity: 10,
            theta: 0.5,
            epochs: 1000,
        }
    }
}

/// Computes a 2D embedding of every file in a database.
pub trait EmbeddingProvider {
    /// Starts computing; `reply` receives the rows, or why they could not be produced.
    fn compute_embedding(
        &self,
        database: &Path,
        params: EmbeddingParams,
        reply: Reply<Vec<EmbeddingEntry>>,
    );
}

/// Computes a min/max amplitude envelope for one file.
pub trait WaveformProvider {
    /// Starts computing `bucket_count` buckets for `file`; `reply` receives them in time order.
    fn compute_envelope(
        &self,
        database: &Path,
        file: &Path,
        bucket_count: usize,
        reply: Reply<Vec<WaveformSample>>,
    );
}

/// Number of envelope buckets to request for a plot `width` pixels wide.
///
/// Slightly more than one bucket per pixel keeps the envelope dense when drawn.
pub fn bucket_count_for_width(width: f64) -> usize {
    let n = (width.max(0.0) * 1.25).round();
    if !n.is_finite() {
        return 1;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "non-negative, finite and capped before the cast"
    )]
    let n = n.min(1_000_000.0) as usize;
    n.max(1)
}
