#![forbid(unsafe_code)]

//! Synchronous event emitter with RAII subscriptions.
//!
//! # Design
//!
//! [`Emitter<T>`] keeps its handlers as weak references in shared
//! (`Rc<RefCell<..>>`) storage. [`Emitter::emit`] calls every live handler in
//! registration order; the strong reference lives in the [`Subscription`]
//! guard handed back to the subscriber.
//!
//! # Failure Modes
//!
//! - **Re-entrant emit**: live handlers are collected before any of them
//!   runs, so a handler may subscribe, emit, or read shared state. Handlers
//!   added during an emit are first called on the next one.
//! - **Subscriber leak**: guards kept forever keep their handlers alive.
//!   Dropped guards are pruned lazily on the next emit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

type HandlerRc<T> = Rc<dyn Fn(&T)>;
type HandlerWeak<T> = Weak<dyn Fn(&T)>;

/// A shared list of event handlers.
///
/// Cloning an `Emitter` creates a new handle to the **same** handler list.
///
/// # Invariants
///
/// 1. Handlers run in registration order.
/// 2. A handler whose [`Subscription`] was dropped is never called again.
/// 3. `emit` is synchronous: every handler has returned when it returns.
pub struct Emitter<T> {
    handlers: Rc<RefCell<Vec<HandlerWeak<T>>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            handlers: Rc::clone(&self.handlers),
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("handler_count", &self.handlers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Emitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Dropping the returned guard unregisters it.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let strong: HandlerRc<T> = Rc::new(handler);
        self.handlers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Call every live handler with `event`.
    pub fn emit(&self, event: &T) {
        let live: Vec<HandlerRc<T>> = {
            let mut handlers = self.handlers.borrow_mut();
            handlers.retain(|weak| weak.strong_count() > 0);
            handlers.iter().filter_map(Weak::upgrade).collect()
        };
        if live.is_empty() {
            return;
        }
        trace!(message = "mover.emit", handlers = live.len() as u64);
        for handler in &live {
            handler(event);
        }
    }

    /// Registered handlers, including dropped ones not yet pruned.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Handlers whose guard is still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// RAII guard for a registered handler.
///
/// Dropping the `Subscription` drops the only strong reference to the
/// handler, so the emitter's weak reference stops upgrading.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// A guard that keeps nothing alive, for hosts with nothing to unsubscribe.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            _guard: Box::new(()),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
