// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

/// What to do with a host size notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeDecision {
    /// Nothing changed since the last applied layout.
    Ignore,
    /// Lay out again at this size.
    Apply(Size),
}

/// Filters host resize notifications down to genuine size changes.
///
/// Hosts typically report the initial size right after mount, even though the view has
/// already laid out at that size. An explicit `has_laid_out_once` flag, not notification
/// order, decides whether a notification is redundant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResizeReactor {
    has_laid_out_once: bool,
    applied: Size,
}

impl ResizeReactor {
    /// Creates a reactor that has not laid out yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the layout applied at mount time.
    pub fn mount(&mut self, size: Size) {
        self.has_laid_out_once = true;
        self.applied = size;
    }

    /// Decides whether a reported size needs a new layout.
    pub fn observe(&mut self, size: Size) -> ResizeDecision {
        if !size.is_finite() {
            return ResizeDecision::Ignore;
        }
        if self.has_laid_out_once && size == self.applied {
            return ResizeDecision::Ignore;
        }
        self.mount(size);
        ResizeDecision::Apply(size)
    }

    /// Whether any layout was applied yet.
    pub fn has_laid_out_once(&self) -> bool {
        self.has_laid_out_once
    }

    /// The size of the last applied layout.
    pub fn applied(&self) -> Option<Size> {
        self.has_laid_out_once.then_some(self.applied)
    }

    /// Forgets the applied layout (on teardown).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_of_mounted_size_is_ignored() {
        let mut r = ResizeReactor::new();
        r.mount(Size::new(300.0, 200.0));
        assert_eq!(r.observe(Size::new(300.0, 200.0)), ResizeDecision::Ignore);
        assert_eq!(
            r.observe(Size::new(320.0, 200.0)),
            ResizeDecision::Apply(Size::new(320.0, 200.0))
        );
        assert_eq!(r.observe(Size::new(320.0, 200.0)), ResizeDecision::Ignore);
    }

    #[test]
    fn first_notification_without_mount_applies() {
        let mut r = ResizeReactor::new();
        assert!(!r.has_laid_out_once());
        assert_eq!(r.observe(Size::ZERO), ResizeDecision::Apply(Size::ZERO));
        assert_eq!(r.applied(), Some(Size::ZERO));
    }

    #[test]
    fn reset_forgets_layout() {
        let mut r = ResizeReactor::new();
        r.mount(Size::new(1.0, 1.0));
        r.reset();
        assert_eq!(r.applied(), None);
    }
}
