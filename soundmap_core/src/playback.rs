// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback capability and its event stream.
//!
//! A [`PlaybackService`] starts playback and returns immediately. The host forwards the
//! backend's progress into a shared [`PlaybackEvents`] hub, which views listen to through
//! scoped [`Subscription`]s.

use core::fmt;
use std::path::{Component, Path, PathBuf};
use std::rc::{Rc, Weak};

use crate::error::PlaybackError;
use crate::observer::{ObserverId, Observers};

/// Starts audio playback.
pub trait PlaybackService {
    /// Requests playback of the file at `path`.
    ///
    /// Returns once the request is accepted or rejected; it never waits for playback.
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Playback of `source_id` reached `position` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionEvent {
    /// The source being played.
    pub source_id: String,
    /// Current position in seconds.
    pub position: f64,
}

/// Playback of `source_id` stopped or ran to the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedEvent {
    /// The source that stopped.
    pub source_id: String,
}

/// Fan-out hub for playback events.
#[derive(Debug, Default)]
pub struct PlaybackEvents {
    position: Observers<PositionEvent>,
    finished: Observers<FinishedEvent>,
}

impl PlaybackEvents {
    /// Creates a hub. Subscriptions hold a weak reference, so the hub lives in an `Rc`.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Listens for position updates until the returned guard is dropped.
    pub fn on_position(self: &Rc<Self>, f: impl FnMut(&PositionEvent) + 'static) -> Subscription {
        let id = self.position.subscribe(f);
        Subscription::new(self, EventKind::Position, id)
    }

    /// Listens for finished notifications until the returned guard is dropped.
    pub fn on_finished(self: &Rc<Self>, f: impl FnMut(&FinishedEvent) + 'static) -> Subscription {
        let id = self.finished.subscribe(f);
        Subscription::new(self, EventKind::Finished, id)
    }

    /// Publishes a position update.
    pub fn emit_position(&self, source_id: &str, position: f64) {
        self.position.notify(&PositionEvent {
            source_id: source_id.to_owned(),
            position,
        });
    }

    /// Publishes the end of playback.
    pub fn emit_finished(&self, source_id: &str) {
        self.finished.notify(&FinishedEvent {
            source_id: source_id.to_owned(),
        });
    }

    /// Total number of live listeners of either kind.
    pub fn listener_count(&self) -> usize {
        self.position.len() + self.finished.len()
    }

    fn remove(&self, kind: EventKind, id: ObserverId) -> bool {
        match kind {
            EventKind::Position => self.position.unsubscribe(id),
            EventKind::Finished => self.finished.unsubscribe(id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EventKind {
    Position,
    Finished,
}

/// Keeps one listener registered on a [`PlaybackEvents`] hub.
///
/// Dropping the guard (or calling [`Subscription::cancel`]) removes the listener. If the
/// hub is gone already, there is nothing to remove.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    hub: Weak<PlaybackEvents>,
    kind: EventKind,
    id: Option<ObserverId>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("hub_alive", &(self.hub.strong_count() > 0))
            .finish()
    }
}

impl Subscription {
    fn new(hub: &Rc<PlaybackEvents>, kind: EventKind, id: ObserverId) -> Self {
        Self {
            hub: Rc::downgrade(hub),
            kind,
            id: Some(id),
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.hub.strong_count() > 0
    }

    /// Removes the listener now.
    pub fn cancel(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.kind, id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Resolves a file path stored in a database into an absolute playable path.
///
/// Backslashes become `/`, `.` segments are dropped, and `..` segments are folded. A
/// relative path is taken relative to the directory containing `database`.
pub fn resolve_file_path(database: &Path, file: &str) -> PathBuf {
    let file = PathBuf::from(file.replace('\\', "/"));
    let joined = if is_absolute(&file) {
        file
    } else {
        let db = PathBuf::from(database.to_string_lossy().replace('\\', "/"));
        match db.parent() {
            Some(dir) => dir.join(file),
            None => file,
        }
    };
    normalize(&joined)
}

fn is_absolute(path: &Path) -> bool {
    if path.has_root() {
        return true;
    }
    // Drive-letter paths like `C:/x` are not absolute on every host, but they are for the
    // machine that wrote the database.
    let bytes = path.as_os_str().as_encoded_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
