#![forbid(unsafe_code)]

//! Breakpoint-driven element relocation.
//!
//! A [`Mover`] is attached to one container element. It reads a rule string
//! such as `"nav: medium down; aside: large up"`, keeps the targets that are
//! valid for the host document, and whenever the host's breakpoint changes
//! moves the matching targets into the container, announcing each move with
//! a `before-move` / `after-move` [`MoveEvent`] pair.
//!
//! ```rust,ignore
//! let mover = Mover::builder(document, container, media.clone())
//!     .mover_targets("nav: medium down")
//!     .on_move(|event| tracing::info!(id = %event.target_id, phase = %event.phase))
//!     .build();
//! media.resize(480); // runs one pass
//! ```
//!
//! The pure pieces (parsing, validation, decisions, breakpoint state) live
//! in [`mover_core`] and are re-exported here.

pub mod config;
pub mod document;
pub mod event;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod mover;

pub use config::{
    ATTR_BREAKPOINT_SCOPES, ATTR_MOVER_TARGETS, ConfigError, ConfigLayer, MoverConfig,
    parse_scope_list,
};
pub use document::Document;
pub use event::{MoveEvent, MovePhase};
pub use mover::{Mover, MoverBuilder, MoverState, PassReport, RelocateError};

pub use mover_core::{
    Breakpoint, BreakpointChange, BreakpointNotifier, BreakpointRegistry, BreakpointRule,
    BreakpointSet, Decision, MatchReason, MediaQuery, MediaQueryError, ParseDiagnostic,
    ParsedTargets, Scope, Subscription, ValidatedTargets, parse_targets,
};
