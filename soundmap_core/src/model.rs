// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset and view-state types.
//!
//! Datasets are immutable snapshots: replacing data means handing the engine a new
//! `Vec`, never editing points in place.

use std::collections::BTreeSet;

use hashbrown::HashSet;
use kurbo::Point;
use peniko::Color;

use crate::error::DataError;
use crate::palette::CategoryPalette;

/// One row of an embedding as produced by an [`crate::EmbeddingProvider`].
///
/// This is a point before it has been colored.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingEntry {
    /// File path of the audio file, as stored in the database.
    pub filename: String,
    /// Embedding x coordinate.
    pub x: f64,
    /// Embedding y coordinate.
    pub y: f64,
    /// Category names; the first one is the point's main category.
    pub categories: Vec<String>,
    /// Class names.
    pub classes: Vec<String>,
}

impl EmbeddingEntry {
    /// Creates an entry with no categories or classes.
    pub fn new(filename: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            filename: filename.into(),
            x,
            y,
            categories: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Sets the category list.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the class list.
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }
}

/// A point of the embedding map.
#[derive(Clone, Debug, PartialEq)]
pub struct MapPoint {
    /// Identifier, unique within one dataset snapshot.
    pub index: usize,
    /// Position in data space.
    pub position: Point,
    /// Main category, if any.
    pub category: Option<String>,
    /// Classes the file was tagged with.
    pub classes: BTreeSet<String>,
    /// Fill color, derived from the category.
    pub color: Color,
    /// The file this point stands for.
    pub source_id: String,
}

impl MapPoint {
    /// Creates an uncategorized point.
    pub fn new(index: usize, position: impl Into<Point>, source_id: impl Into<String>) -> Self {
        Self {
            index,
            position: position.into(),
            category: None,
            classes: BTreeSet::new(),
            color: CategoryPalette::FALLBACK,
            source_id: source_id.into(),
        }
    }

    /// Sets the main category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the classes.
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// File name without its directories, for display.
    pub fn file_name(&self) -> &str {
        self.source_id
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.source_id)
    }
}

/// Turns provider rows into colored map points, indexed by position.
pub fn points_from_entries(
    entries: Vec<EmbeddingEntry>,
    palette: &CategoryPalette,
) -> Vec<MapPoint> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let category = entry.categories.into_iter().next();
            let color = palette.color_for(category.as_deref());
            MapPoint {
                index,
                position: Point::new(entry.x, entry.y),
                category,
                classes: entry.classes.into_iter().collect(),
                color,
                source_id: entry.filename,
            }
        })
        .collect()
}

/// Checks that every point is finite and that indices are unique.
pub fn validate_points(points: &[MapPoint]) -> Result<(), DataError> {
    let mut seen = HashSet::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if !p.position.is_finite() {
            return Err(DataError::NonFinite { index: i });
        }
        if !seen.insert(p.index) {
            return Err(DataError::DuplicateIndex(p.index));
        }
    }
    Ok(())
}

/// One bucket of a waveform envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveformSample {
    /// Bucket time in seconds.
    pub time: f64,
    /// Lowest amplitude in the bucket, in `[-1, 1]`.
    pub min: f64,
    /// Highest amplitude in the bucket, in `[-1, 1]`.
    pub max: f64,
}

impl WaveformSample {
    /// Creates a sample.
    pub fn new(time: f64, min: f64, max: f64) -> Self {
        Self { time, min, max }
    }
}

/// Checks the envelope invariants: finite values, amplitudes in range, time never decreasing.
pub fn validate_samples(samples: &[WaveformSample]) -> Result<(), DataError> {
    let mut previous = f64::NEG_INFINITY;
    for (index, s) in samples.iter().enumerate() {
        if !(s.time.is_finite() && s.min.is_finite() && s.max.is_finite()) {
            return Err(DataError::NonFinite { index });
        }
        if s.min < -1.0 || s.max > 1.0 || s.min > s.max {
            return Err(DataError::AmplitudeOutOfRange { index });
        }
        if s.time < previous {
            return Err(DataError::UnorderedSamples {
                index,
                time: s.time,
                previous,
            });
        }
        previous = s.time;
    }
    Ok(())
}

/// Where playback of a source currently is.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackCursor {
    /// The source being played.
    pub source_id: String,
    /// Position in seconds, or `None` once playback stopped.
    pub position: Option<f64>,
}

/// The single-selection state of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Index of the selected point, if any.
    pub selected_index: Option<usize>,
}
