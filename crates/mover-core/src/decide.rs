#![forbid(unsafe_code)]

//! Move decisions: which validated targets relocate at a breakpoint.
//!
//! # Matching
//!
//! For a target not already inside the container:
//!
//! 1. `rule.size == current` selects ([`MatchReason::Exact`]).
//! 2. `scope == Down` selects iff `!at_least(rule.size)`.
//! 3. `scope == Up` selects iff `at_least(rule.size)`.
//! 4. Anything else does not select.
//!
//! Exact equality and scope are independent paths; either one is enough.
//! `Custom` scopes never select through the scope path.
//!
//! # Invariants
//!
//! 1. A target for which `contains(id)` is true is never selected.
//! 2. Output order is configuration order.
//! 3. Every call recomputes from scratch; there is no carried state.

use crate::rule::{BreakpointRule, Scope};
use crate::validate::ValidatedTargets;

/// Which path selected a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchReason {
    Exact,
    ScopeDown,
    ScopeUp,
}

impl MatchReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::ScopeDown => "scope-down",
            Self::ScopeUp => "scope-up",
        }
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A target selected for relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub id: String,
    pub reason: MatchReason,
}

/// Match one rule against the current breakpoint.
///
/// `at_least(size)` answers whether the host's active breakpoint is `size`
/// or larger.
pub fn match_rule(
    rule: &BreakpointRule,
    current: &str,
    at_least: impl Fn(&str) -> bool,
) -> Option<MatchReason> {
    if rule.size == current {
        return Some(MatchReason::Exact);
    }
    match rule.scope {
        Some(Scope::Down) if !at_least(&rule.size) => Some(MatchReason::ScopeDown),
        Some(Scope::Up) if at_least(&rule.size) => Some(MatchReason::ScopeUp),
        _ => None,
    }
}

/// Select the targets that must move into the container at `current`.
///
/// `contains(id)` reports whether the target is already inside the
/// container.
pub fn decide(
    targets: &ValidatedTargets,
    current: &str,
    at_least: impl Fn(&str) -> bool,
    contains: impl Fn(&str) -> bool,
) -> Vec<Decision> {
    targets
        .iter()
        .filter(|target| !contains(&target.id))
        .filter_map(|target| {
            match_rule(&target.rule, current, &at_least).map(|reason| Decision {
                id: target.id.clone(),
                reason,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
