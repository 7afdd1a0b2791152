#![forbid(unsafe_code)]

//! Reference breakpoint host: current breakpoint plus change notification.
//!
//! [`MediaQuery`] is what a host without its own breakpoint machinery plugs
//! into the engine. It implements both [`BreakpointRegistry`] and
//! [`BreakpointNotifier`] over a fixed [`BreakpointSet`]. The host drives it
//! with [`set_current`](MediaQuery::set_current) or
//! [`resize`](MediaQuery::resize).
//!
//! # Usage
//!
//! ```ignore
//! use mover_core::{BreakpointNotifier, BreakpointSet, MediaQuery};
//!
//! let media = MediaQuery::from_width(BreakpointSet::foundation(), 320)?;
//! let _sub = media.on_breakpoint_change(Box::new(|change| {
//!     println!("{} -> {}", change.old, change.new);
//! }));
//! media.resize(1100); // prints "small -> large"
//! media.resize(1110); // still large: no notification
//! ```
//!
//! # Invariants
//!
//! 1. The current breakpoint is always a member of the set.
//! 2. Handlers fire only when the breakpoint actually changes, and the state
//!    is already updated when they run.
//! 3. `version()` increments by exactly 1 per change.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::breakpoint::{BreakpointChange, BreakpointNotifier, BreakpointRegistry, BreakpointSet};
use crate::emitter::{Emitter, Subscription};

/// Errors from [`MediaQuery`] construction and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaQueryError {
    /// The breakpoint set has no entries.
    EmptySet,
    /// The name is not part of the breakpoint set.
    UnknownBreakpoint(String),
}

impl std::fmt::Display for MediaQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySet => write!(f, "breakpoint set is empty"),
            Self::UnknownBreakpoint(name) => write!(f, "unknown breakpoint `{name}`"),
        }
    }
}

impl std::error::Error for MediaQueryError {}

struct MediaState {
    breakpoints: BreakpointSet,
    current: String,
    version: u64,
}

/// Shared breakpoint state with change notification.
///
/// Cloning creates another handle to the same state and handlers.
#[derive(Clone)]
pub struct MediaQuery {
    state: Rc<RefCell<MediaState>>,
    changes: Emitter<BreakpointChange>,
}

impl std::fmt::Debug for MediaQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MediaQuery")
            .field("current", &state.current)
            .field("version", &state.version)
            .field("breakpoints", &state.breakpoints.len())
            .finish()
    }
}

impl MediaQuery {
    /// Start at a named breakpoint.
    pub fn new(breakpoints: BreakpointSet, current: &str) -> Result<Self, MediaQueryError> {
        if breakpoints.is_empty() {
            return Err(MediaQueryError::EmptySet);
        }
        if !breakpoints.contains(current) {
            return Err(MediaQueryError::UnknownBreakpoint(current.to_owned()));
        }
        Ok(Self::with_state(breakpoints, current.to_owned()))
    }

    /// Start at whatever breakpoint `width` falls into.
    pub fn from_width(breakpoints: BreakpointSet, width: u32) -> Result<Self, MediaQueryError> {
        let current = breakpoints
            .classify_width(width)
            .map(|bp| bp.name.clone())
            .ok_or(MediaQueryError::EmptySet)?;
        Ok(Self::with_state(breakpoints, current))
    }

    fn with_state(breakpoints: BreakpointSet, current: String) -> Self {
        Self {
            state: Rc::new(RefCell::new(MediaState {
                breakpoints,
                current,
                version: 0,
            })),
            changes: Emitter::new(),
        }
    }

    /// Switch to a named breakpoint.
    ///
    /// Returns `Ok(true)` when the breakpoint changed (and handlers ran).
    pub fn set_current(&self, name: &str) -> Result<bool, MediaQueryError> {
        if !self.state.borrow().breakpoints.contains(name) {
            return Err(MediaQueryError::UnknownBreakpoint(name.to_owned()));
        }
        Ok(self.transition(name.to_owned()))
    }

    /// Reclassify after a viewport resize.
    ///
    /// Returns `true` when the width crossed into another breakpoint.
    pub fn resize(&self, width: u32) -> bool {
        let next = self
            .state
            .borrow()
            .breakpoints
            .classify_width(width)
            .map(|bp| bp.name.clone());
        match next {
            Some(name) => self.transition(name),
            None => false,
        }
    }

    fn transition(&self, new: String) -> bool {
        let change = {
            let mut state = self.state.borrow_mut();
            if state.current == new {
                return false;
            }
            let old = std::mem::replace(&mut state.current, new.clone());
            state.version += 1;
            BreakpointChange { new, old }
        };
        debug!(message = "mover.media.changed", from = %change.old, to = %change.new);
        self.changes.emit(&change);
        true
    }

    /// Number of breakpoint changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// A copy of the breakpoint table.
    #[must_use]
    pub fn breakpoints(&self) -> BreakpointSet {
        self.state.borrow().breakpoints.clone()
    }
}

impl BreakpointRegistry for MediaQuery {
    fn known_sizes(&self) -> Vec<String> {
        self.state
            .borrow()
            .breakpoints
            .names()
            .map(str::to_owned)
            .collect()
    }

    fn at_least(&self, size: &str) -> bool {
        let state = self.state.borrow();
        state.breakpoints.at_least(&state.current, size)
    }

    fn current_size(&self) -> String {
        self.state.borrow().current.clone()
    }

    fn is_known(&self, size: &str) -> bool {
        self.state.borrow().breakpoints.contains(size)
    }
}

impl BreakpointNotifier for MediaQuery {
    fn on_breakpoint_change(&self, handler: Box<dyn Fn(&BreakpointChange)>) -> Subscription {
        self.changes.subscribe(handler)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
