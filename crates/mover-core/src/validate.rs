#![forbid(unsafe_code)]

//! Target validation against the document and the breakpoint registry.
//!
//! [`validate_targets`] is a pure filter: it keeps a target iff
//!
//! 1. its id resolves to exactly one document element,
//! 2. its size is a known breakpoint,
//! 3. its scope is absent or belongs to the [`ScopeVocabulary`].
//!
//! Excluded targets are inert for the life of the engine. Nothing is
//! reported beyond a trace event; conditional markup legitimately leaves
//! targets missing at some viewport sizes.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::breakpoint::BreakpointRegistry;
use crate::rule::{BreakpointRule, Target, TargetTable};

// ---------------------------------------------------------------------------
// ScopeVocabulary
// ---------------------------------------------------------------------------

/// Scope names a rule may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeVocabulary {
    names: Vec<String>,
}

impl ScopeVocabulary {
    /// `["down", "up"]`.
    pub const DEFAULT: [&'static str; 2] = ["down", "up"];

    #[must_use]
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut vocabulary = Self { names: Vec::new() };
        for name in names {
            vocabulary.insert(name);
        }
        vocabulary
    }

    /// Add a name. Duplicates are ignored.
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.names.push(name);
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ScopeVocabulary {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

// ---------------------------------------------------------------------------
// ValidatedTargets
// ---------------------------------------------------------------------------

/// Targets that passed validation, in configuration order.
///
/// Only [`validate_targets`] builds a non-empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedTargets {
    table: TargetTable,
}

impl ValidatedTargets {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BreakpointRule> {
        self.table.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.table.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.table.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.table.ids()
    }

    #[must_use]
    pub fn as_table(&self) -> &TargetTable {
        &self.table
    }
}

impl<'a> IntoIterator for &'a ValidatedTargets {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Why a target was excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// No element has this id.
    Missing,
    /// More than one element has this id.
    Ambiguous { matches: usize },
    UnknownSize,
    UnknownScope,
}

/// Check a single target. `matches` is the number of document elements
/// carrying the target's id.
pub fn check_target(
    rule: &BreakpointRule,
    matches: usize,
    known_sizes: &[String],
    vocabulary: &ScopeVocabulary,
) -> Result<(), Exclusion> {
    match matches {
        0 => return Err(Exclusion::Missing),
        1 => {}
        matches => return Err(Exclusion::Ambiguous { matches }),
    }
    if !known_sizes.iter().any(|size| *size == rule.size) {
        return Err(Exclusion::UnknownSize);
    }
    match &rule.scope {
        Some(scope) if !vocabulary.contains(scope.as_str()) => Err(Exclusion::UnknownScope),
        _ => Ok(()),
    }
}

/// Filter parsed targets down to the ones the engine will act on.
///
/// `lookup` returns how many document elements carry an id.
pub fn validate_targets<R>(
    parsed: &TargetTable,
    lookup: impl Fn(&str) -> usize,
    registry: &R,
    vocabulary: &ScopeVocabulary,
) -> ValidatedTargets
where
    R: BreakpointRegistry + ?Sized,
{
    let known_sizes = registry.known_sizes();
    let table = parsed
        .iter()
        .filter(|target| {
            match check_target(&target.rule, lookup(&target.id), &known_sizes, vocabulary) {
                Ok(()) => true,
                Err(reason) => {
                    trace!(message = "mover.validate.excluded", id = %target.id, ?reason);
                    false
                }
            }
        })
        .cloned()
        .collect();
    ValidatedTargets { table }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
