#![forbid(unsafe_code)]

//! Target rules and the ordered target table.
//!
//! A [`BreakpointRule`] is built once, at parse time, and carries a tagged
//! [`Scope`] rather than a loose string. [`TargetTable`] keeps targets in
//! configuration order, which is also the order in which they relocate.
//!
//! # Invariants
//!
//! 1. Ids in a [`TargetTable`] are unique.
//! 2. Iteration order is first-insertion order. Re-inserting an id replaces
//!    its rule without moving it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Range modifier for a rule.
///
/// `Up` and `Down` carry matching semantics. Hosts may extend the accepted
/// vocabulary; such names parse as `Custom` and only ever match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    /// The reference size and every larger breakpoint.
    Up,
    /// Every breakpoint strictly smaller than the reference size.
    Down,
    Custom(String),
}

impl Scope {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Scope {
    fn from(token: &str) -> Self {
        match token {
            "up" => Self::Up,
            "down" => Self::Down,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl From<String> for Scope {
    fn from(token: String) -> Self {
        match token.as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            _ => Self::Custom(token),
        }
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Custom(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rules and targets
// ---------------------------------------------------------------------------

/// When a target should move: a breakpoint size plus an optional scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakpointRule {
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

impl BreakpointRule {
    /// Matches `size` only.
    #[must_use]
    pub fn exact(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            scope: None,
        }
    }

    #[must_use]
    pub fn up(size: impl Into<String>) -> Self {
        Self::scoped(size, Scope::Up)
    }

    #[must_use]
    pub fn down(size: impl Into<String>) -> Self {
        Self::scoped(size, Scope::Down)
    }

    #[must_use]
    pub fn scoped(size: impl Into<String>, scope: Scope) -> Self {
        Self {
            size: size.into(),
            scope: Some(scope),
        }
    }
}

impl std::fmt::Display for BreakpointRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{} {}", self.size, scope),
            None => f.write_str(&self.size),
        }
    }
}

/// A document element, by id, and the rule that moves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub rule: BreakpointRule,
}

// ---------------------------------------------------------------------------
// TargetTable
// ---------------------------------------------------------------------------

/// Ordered id → rule mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTable {
    entries: Vec<Target>,
    index: FxHashMap<String, usize>,
}

impl TargetTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule. Returns the rule it replaced, if the id was present.
    pub fn insert(&mut self, id: impl Into<String>, rule: BreakpointRule) -> Option<BreakpointRule> {
        let id = id.into();
        if let Some(&slot) = self.index.get(&id) {
            return Some(std::mem::replace(&mut self.entries[slot].rule, rule));
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(Target { id, rule });
        None
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BreakpointRule> {
        self.index.get(id).map(|&slot| &self.entries[slot].rule)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|target| target.id.as_str())
    }
}

impl FromIterator<Target> for TargetTable {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut table = Self::new();
        for target in iter {
            table.insert(target.id, target.rule);
        }
        table
    }
}

impl<'a> IntoIterator for &'a TargetTable {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
