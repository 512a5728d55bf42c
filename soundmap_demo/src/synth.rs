// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic stand-ins for the analysis backend and the audio player.

use core::cell::RefCell;
use std::path::{Path, PathBuf};

use soundmap_core::{
    EmbeddingEntry, EmbeddingParams, EmbeddingProvider, PlaybackError, PlaybackService, Reply,
    WaveformProvider, WaveformSample,
};

/// Small LCG; good enough to scatter demo points.
#[derive(Debug)]
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }

    fn next_signed(&mut self) -> f64 {
        2.0 * self.next_unit() - 1.0
    }
}

/// Clusters of files, one per category; spread grows with perplexity.
#[derive(Debug)]
pub(crate) struct SynthEmbedding {
    pub(crate) categories: Vec<&'static str>,
    pub(crate) per_category: usize,
}

impl EmbeddingProvider for SynthEmbedding {
    fn compute_embedding(
        &self,
        database: &Path,
        params: EmbeddingParams,
        reply: Reply<Vec<EmbeddingEntry>>,
    ) {
        log::debug!("synthesizing embedding for {}", database.display());
        let mut rng = Lcg(u64::from(params.perplexity()) * 7919 + u64::from(params.epochs()));
        let spread = 2.0 + f64::from(params.perplexity()) / 10.0;
        let n = self.categories.len().max(1) as f64;
        let mut entries = Vec::new();
        for (c, category) in self.categories.iter().enumerate() {
            let angle = core::f64::consts::TAU * c as f64 / n;
            let (cx, cy) = (30.0 * angle.cos(), 30.0 * angle.sin());
            for i in 0..self.per_category {
                let entry = EmbeddingEntry::new(
                    format!("{category}\\{category}_{i:02}.wav"),
                    cx + spread * rng.next_signed(),
                    cy + spread * rng.next_signed(),
                )
                .with_categories([*category])
                .with_classes([format!("{category}-{}", i % 3)]);
                entries.push(entry);
            }
        }
        reply(Ok(entries));
    }
}

/// A decaying tone, `duration` seconds long.
#[derive(Debug)]
pub(crate) struct SynthEnvelope {
    pub(crate) duration: f64,
}

impl WaveformProvider for SynthEnvelope {
    fn compute_envelope(
        &self,
        _database: &Path,
        file: &Path,
        bucket_count: usize,
        reply: Reply<Vec<WaveformSample>>,
    ) {
        log::debug!("synthesizing {bucket_count} buckets for {}", file.display());
        let mut rng = Lcg(bucket_count as u64);
        let last = bucket_count.saturating_sub(1).max(1) as f64;
        let samples = (0..bucket_count)
            .map(|i| {
                let t = self.duration * i as f64 / last;
                let decay = (-3.0 * t / self.duration).exp();
                let wobble = 0.5 + 0.5 * (t * 9.0).sin().abs();
                let peak = (decay * wobble).clamp(0.0, 1.0);
                let jitter = 0.8 + 0.2 * rng.next_unit();
                WaveformSample::new(t, -peak * jitter, peak)
            })
            .collect();
        reply(Ok(samples));
    }
}

/// Logs playback requests instead of producing sound.
#[derive(Debug, Default)]
pub(crate) struct LoggingPlayback {
    played: RefCell<Vec<PathBuf>>,
}

impl LoggingPlayback {
    pub(crate) fn last_played(&self) -> Option<PathBuf> {
        self.played.borrow().last().cloned()
    }
}

impl PlaybackService for LoggingPlayback {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        log::info!("playing {}", path.display());
        self.played.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
