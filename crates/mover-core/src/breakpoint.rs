#![forbid(unsafe_code)]

//! Named breakpoint tables and the host registry contracts.
//!
//! A [`BreakpointSet`] is the host's ordered list of named viewport
//! thresholds. The ordering is what gives `at_least` its meaning: a
//! breakpoint is "at least" another when it sits at the same or a later
//! position in the set.
//!
//! # Usage
//!
//! ```ignore
//! use mover_core::{Breakpoint, BreakpointSet};
//!
//! let set = BreakpointSet::foundation();
//! assert_eq!(set.classify_width(700).map(|bp| bp.name.as_str()), Some("medium"));
//! assert!(set.at_least("large", "medium"));
//! assert!(!set.at_least("small", "medium"));
//! ```
//!
//! # Invariants
//!
//! 1. Entries are kept in ascending `min_width` order; equal widths keep
//!    insertion order.
//! 2. Names are unique. Inserting an existing name replaces its width and
//!    re-sorts the entry.
//! 3. `classify_width()` returns the last entry whose `min_width` is not
//!    above the width; widths below the first threshold map to the first
//!    entry.
//! 4. `at_least()` is false whenever either name is unknown.
//!
//! # Failure Modes
//!
//! - Empty set: `classify_width()` returns `None` and every `at_least()`
//!   query is false.

use serde::{Deserialize, Serialize};

use crate::emitter::Subscription;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named viewport threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Name used by target rules (`"small"`, `"medium"`, ...).
    pub name: String,
    /// Smallest viewport width (in pixels) at which this breakpoint is active.
    pub min_width: u32,
}

impl Breakpoint {
    #[must_use]
    pub fn new(name: impl Into<String>, min_width: u32) -> Self {
        Self {
            name: name.into(),
            min_width,
        }
    }
}

/// An ordered, name-unique set of breakpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointSet {
    entries: Vec<Breakpoint>,
}

/// A breakpoint transition delivered to change handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakpointChange {
    /// The breakpoint that just became active.
    pub new: String,
    /// The breakpoint that was active before.
    pub old: String,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl BreakpointSet {
    /// Build a set from breakpoints in any order.
    #[must_use]
    pub fn new(breakpoints: impl IntoIterator<Item = Breakpoint>) -> Self {
        let mut set = Self::default();
        for bp in breakpoints {
            set.insert(bp);
        }
        set
    }

    /// The stock Foundation-style table:
    /// small=0, medium=640, large=1024, xlarge=1200, xxlarge=1440.
    #[must_use]
    pub fn foundation() -> Self {
        Self::new([
            Breakpoint::new("small", 0),
            Breakpoint::new("medium", 640),
            Breakpoint::new("large", 1024),
            Breakpoint::new("xlarge", 1200),
            Breakpoint::new("xxlarge", 1440),
        ])
    }

    /// Insert or replace a breakpoint, keeping the set ordered by width.
    pub fn insert(&mut self, breakpoint: Breakpoint) {
        self.entries.retain(|existing| existing.name != breakpoint.name);
        let at = self
            .entries
            .partition_point(|existing| existing.min_width <= breakpoint.min_width);
        self.entries.insert(at, breakpoint);
    }
}

impl From<Vec<Breakpoint>> for BreakpointSet {
    fn from(entries: Vec<Breakpoint>) -> Self {
        Self::new(entries)
    }
}

impl From<BreakpointSet> for Vec<Breakpoint> {
    fn from(set: BreakpointSet) -> Self {
        set.entries
    }
}

impl FromIterator<Breakpoint> for BreakpointSet {
    fn from_iter<I: IntoIterator<Item = Breakpoint>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl BreakpointSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Breakpoints in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, Breakpoint> {
        self.entries.iter()
    }

    /// Breakpoint names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|bp| bp.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rank(name).is_some()
    }

    /// Position of `name` in the ordering (0 = smallest).
    #[must_use]
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|bp| bp.name == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Breakpoint> {
        self.entries.iter().find(|bp| bp.name == name)
    }

    /// Classify a viewport width into the active breakpoint.
    #[must_use]
    pub fn classify_width(&self, width: u32) -> Option<&Breakpoint> {
        let idx = self.entries.partition_point(|bp| bp.min_width <= width);
        match idx {
            0 => self.entries.first(),
            n => self.entries.get(n - 1),
        }
    }

    /// Whether `current` is `size` or a larger breakpoint.
    #[must_use]
    pub fn at_least(&self, current: &str, size: &str) -> bool {
        match (self.rank(current), self.rank(size)) {
            (Some(current), Some(size)) => current >= size,
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a BreakpointSet {
    type Item = &'a Breakpoint;
    type IntoIter = std::slice::Iter<'a, Breakpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Host contracts
// ---------------------------------------------------------------------------

/// The host's view of its breakpoints.
pub trait BreakpointRegistry {
    /// Every valid breakpoint name, smallest first.
    fn known_sizes(&self) -> Vec<String>;

    /// Whether the currently active breakpoint is `size` or a larger one.
    fn at_least(&self, size: &str) -> bool;

    /// Name of the currently active breakpoint.
    fn current_size(&self) -> String;

    fn is_known(&self, size: &str) -> bool {
        self.known_sizes().iter().any(|known| known == size)
    }
}

/// Source of breakpoint transitions.
///
/// Handlers run synchronously, in registration order, once per transition.
/// Dropping the returned [`Subscription`] unregisters the handler.
pub trait BreakpointNotifier {
    fn on_breakpoint_change(&self, handler: Box<dyn Fn(&BreakpointChange)>) -> Subscription;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sml() -> BreakpointSet {
        BreakpointSet::new([
            Breakpoint::new("large", 1024),
            Breakpoint::new("small", 0),
            Breakpoint::new("medium", 640),
        ])
    }

    #[test]
    fn entries_sorted_by_width() {
        let set = sml();
        assert_eq!(set.names().collect::<Vec<_>>(), ["small", "medium", "large"]);
    }

    #[test]
    fn insert_replaces_existing_name() {
        let mut set = sml();
        set.insert(Breakpoint::new("small", 2000));
        assert_eq!(set.len(), 3);
        assert_eq!(set.names().collect::<Vec<_>>(), ["medium", "large", "small"]);
    }

    #[test]
    fn classify_width_boundaries() {
        let set = sml();
        let name = |w| set.classify_width(w).map(|bp| bp.name.clone());
        assert_eq!(name(0).as_deref(), Some("small"));
        assert_eq!(name(639).as_deref(), Some("small"));
        assert_eq!(name(640).as_deref(), Some("medium"));
        assert_eq!(name(1023).as_deref(), Some("medium"));
        assert_eq!(name(1024).as_deref(), Some("large"));
        assert_eq!(name(u32::MAX).as_deref(), Some("large"));
    }

    #[test]
    fn classify_below_first_threshold_maps_to_first() {
        let set = BreakpointSet::new([Breakpoint::new("tablet", 600), Breakpoint::new("desk", 900)]);
        assert_eq!(set.classify_width(10).map(|bp| bp.name.as_str()), Some("tablet"));
    }

    #[test]
    fn empty_set_classifies_nothing() {
        let set = BreakpointSet::default();
        assert!(set.classify_width(500).is_none());
        assert!(!set.at_least("small", "small"));
    }

    #[test]
    fn at_least_follows_ordering() {
        let set = sml();
        assert!(set.at_least("medium", "medium"));
        assert!(set.at_least("large", "medium"));
        assert!(!set.at_least("small", "medium"));
        assert!(!set.at_least("small", "tablet"));
        assert!(!set.at_least("tablet", "small"));
    }

    #[test]
    fn foundation_table() {
        let set = BreakpointSet::foundation();
        assert_eq!(
            set.names().collect::<Vec<_>>(),
            ["small", "medium", "large", "xlarge", "xxlarge"]
        );
        assert_eq!(set.get("large").map(|bp| bp.min_width), Some(1024));
    }

    #[test]
    fn deserialize_restores_ordering() {
        let set: BreakpointSet = serde_json::from_str(
            r#"[{"name":"large","min_width":1024},{"name":"small","min_width":0}]"#,
        )
        .unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), ["small", "large"]);
    }
}
