// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use soundmap_core::SelectionState;

/// Outcome of a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing changed; no repaint needed.
    Unchanged,
    /// A different item was selected.
    Selected(usize),
    /// The selection was cleared.
    Cleared,
}

/// Single-selection model. The only writer of [`SelectionState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Starts with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a click whose hit-test found `hit`.
    pub fn click(&mut self, hit: Option<usize>) -> SelectionChange {
        match (hit, self.state.selected_index) {
            (Some(i), Some(current)) if i == current => SelectionChange::Unchanged,
            (Some(i), _) => {
                self.state.selected_index = Some(i);
                SelectionChange::Selected(i)
            }
            (None, Some(_)) => {
                self.state.selected_index = None;
                SelectionChange::Cleared
            }
            (None, None) => SelectionChange::Unchanged,
        }
    }

    /// Clears the selection. Returns whether something was selected.
    pub fn reset(&mut self) -> bool {
        self.state.selected_index.take().is_some()
    }

    /// The current state.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// The selected index, if any.
    pub fn selected(&self) -> Option<usize> {
        self.state.selected_index
    }
}
