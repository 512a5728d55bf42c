// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small explicit callback registry.
//!
//! State owners call [`Observers::notify`] after a mutation; interested parties register
//! closures with [`Observers::subscribe`]. There is no implicit dependency tracking.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

/// Handle for one registered callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

/// A list of callbacks for events of type `E`.
pub struct Observers<E> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(ObserverId, Handler<E>)>>,
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("next_id", &self.next_id.get())
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
        }
    }
}

impl<E: 'static> Observers<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`; it runs on every subsequent [`notify`](Self::notify).
    pub fn subscribe(&self, handler: impl FnMut(&E) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != before
    }

    /// Whether `id` is still registered.
    pub fn contains(&self, id: ObserverId) -> bool {
        self.handlers.borrow().iter().any(|(h, _)| *h == id)
    }

    /// Calls every registered handler with `event`, in registration order.
    ///
    /// Handlers may subscribe or unsubscribe (themselves or others) while running. A
    /// handler removed during dispatch is not called afterwards; one added during dispatch
    /// first runs on the next event. A handler that re-enters `notify` is not called
    /// recursively.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<(ObserverId, Handler<E>)> = self
            .handlers
            .borrow()
            .iter()
            .map(|(id, h)| (*id, Rc::clone(h)))
            .collect();
        for (id, handler) in snapshot {
            if !self.contains(id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut f) => f(event),
                Err(_) => log::trace!("skipping re-entrant observer {id:?}"),
            }
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every handler.
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}
