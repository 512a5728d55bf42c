// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Notifications a view publishes after mutating its own state.
///
/// Hosts subscribe to present repainted surfaces or refresh tooltip chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// The guide surface was repainted.
    GuidesRepainted,
    /// The content surface was repainted.
    ContentRepainted,
    /// The playback overlay was cleared or redrawn.
    OverlayRepainted,
    /// The selection changed to the given item key.
    SelectionChanged(Option<usize>),
    /// The tooltip was shown, moved, or hidden.
    TooltipChanged,
}
