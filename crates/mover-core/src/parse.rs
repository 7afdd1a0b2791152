#![forbid(unsafe_code)]

//! Rule parser for the `mover_targets` option.
//!
//! # Grammar
//!
//! ```text
//! config := clause (';' clause)*
//! clause := id ':' size [scope [ignored...]]
//! ```
//!
//! Whitespace around `:` and between tokens is insignificant. Empty clauses
//! (`;;`, trailing `;`) are skipped. There is no escaping, so an id cannot
//! contain `:` or `;`. When a clause has more than one `:`, the value is the
//! text between the first and the second one.
//!
//! # Failure Modes
//!
//! Malformed clauses never abort the parse. A clause with no `:`, an empty
//! id, or an empty value is skipped and reported as a [`ParseDiagnostic`]
//! (plus a `tracing` warning). Tokens after the scope are ignored and
//! reported, but the rule is kept.

use tracing::{debug, warn};

use crate::rule::{BreakpointRule, Scope, TargetTable};

/// What was wrong with a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No `:` between id and value. Clause skipped.
    MissingSeparator,
    /// Nothing before the `:`. Clause skipped.
    EmptyId,
    /// Nothing after the `:`. Clause skipped.
    EmptyValue,
    /// Tokens after the scope. Rule kept, tokens dropped.
    ExtraTokens { ignored: String },
}

/// A non-fatal problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Position of the clause among the `;`-separated pieces.
    pub clause_index: usize,
    /// The trimmed clause text.
    pub clause: String,
    pub kind: DiagnosticKind,
}

impl ParseDiagnostic {
    /// Whether the clause was dropped entirely.
    #[must_use]
    pub fn skipped_clause(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::ExtraTokens { .. })
    }
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let idx = self.clause_index;
        match &self.kind {
            DiagnosticKind::MissingSeparator => {
                write!(f, "clause {idx} `{}` has no ':' separator", self.clause)
            }
            DiagnosticKind::EmptyId => write!(f, "clause {idx} `{}` has an empty id", self.clause),
            DiagnosticKind::EmptyValue => {
                write!(f, "clause {idx} `{}` has no breakpoint size", self.clause)
            }
            DiagnosticKind::ExtraTokens { ignored } => {
                write!(f, "clause {idx} `{}`: ignored trailing `{ignored}`", self.clause)
            }
        }
    }
}

/// Output of [`parse_targets`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTargets {
    pub targets: TargetTable,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParsedTargets {
    /// True when every non-empty clause parsed without remarks.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a `mover_targets` string.
#[must_use]
pub fn parse_targets(config: &str) -> ParsedTargets {
    let mut parsed = ParsedTargets::default();

    for (clause_index, raw) in config.split(';').enumerate() {
        let clause = raw.trim();
        if clause.is_empty() {
            continue;
        }

        let mut report = |kind: DiagnosticKind| {
            let diagnostic = ParseDiagnostic {
                clause_index,
                clause: clause.to_owned(),
                kind,
            };
            warn!(message = "mover.parse", %diagnostic);
            parsed.diagnostics.push(diagnostic);
        };

        match parse_clause(clause) {
            Ok(parsed_clause) => {
                if let Some(ignored) = parsed_clause.ignored {
                    report(DiagnosticKind::ExtraTokens { ignored });
                }
                let id = parsed_clause.id;
                if let Some(previous) = parsed.targets.insert(id, parsed_clause.rule) {
                    debug!(message = "mover.parse.replaced", id, %previous);
                }
            }
            Err(kind) => report(kind),
        }
    }

    parsed
}

struct Clause<'a> {
    id: &'a str,
    rule: BreakpointRule,
    ignored: Option<String>,
}

fn parse_clause(clause: &str) -> Result<Clause<'_>, DiagnosticKind> {
    let mut parts = clause.split(':');
    let id = parts.next().unwrap_or_default().trim();
    let value = parts.next().ok_or(DiagnosticKind::MissingSeparator)?;
    if id.is_empty() {
        return Err(DiagnosticKind::EmptyId);
    }

    let mut tokens = value.split_whitespace();
    let size = tokens.next().ok_or(DiagnosticKind::EmptyValue)?;
    let scope = tokens.next().map(Scope::from);
    let rest: Vec<&str> = tokens.collect();

    Ok(Clause {
        id,
        rule: BreakpointRule {
            size: size.to_owned(),
            scope,
        },
        ignored: (!rest.is_empty()).then(|| rest.join(" ")),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
