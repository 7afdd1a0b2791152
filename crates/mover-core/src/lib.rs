#![forbid(unsafe_code)]

//! Core: breakpoint tables, target rules, and relocation decisions.
//!
//! # Role in Mover
//! `mover-core` is the pure half of the engine. It knows nothing about a
//! concrete document tree; everything it needs from the host arrives through
//! closures or the [`BreakpointRegistry`] trait.
//!
//! # Primary responsibilities
//! - **Rule parsing**: `"panel: small up; aside: medium down"` into an ordered
//!   [`TargetTable`] plus non-fatal [`ParseDiagnostic`]s.
//! - **Validation**: filtering rules against document lookups, the known
//!   breakpoint set, and the scope vocabulary.
//! - **Decision**: selecting the targets that must move for one breakpoint.
//! - **Breakpoint plumbing**: [`BreakpointSet`] ordering, the
//!   [`BreakpointRegistry`] / [`BreakpointNotifier`] contracts and the
//!   [`MediaQuery`] reference host.
//!
//! # How it fits in the system
//! The `mover` crate owns the document side (relocation, move events,
//! configuration layering) and drives the functions in this crate once at
//! construction and again on every [`BreakpointChange`].

pub mod breakpoint;
pub mod decide;
pub mod emitter;
pub mod media;
pub mod parse;
pub mod rule;
pub mod validate;

pub use breakpoint::{
    Breakpoint, BreakpointChange, BreakpointNotifier, BreakpointRegistry, BreakpointSet,
};
pub use decide::{Decision, MatchReason, decide, match_rule};
pub use emitter::{Emitter, Subscription};
pub use media::{MediaQuery, MediaQueryError};
pub use parse::{DiagnosticKind, ParseDiagnostic, ParsedTargets, parse_targets};
pub use rule::{BreakpointRule, Scope, Target, TargetTable};
pub use validate::{Exclusion, ScopeVocabulary, ValidatedTargets, check_target, validate_targets};
