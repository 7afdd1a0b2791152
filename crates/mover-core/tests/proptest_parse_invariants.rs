//! Property-based invariant tests for the rule parser and decision engine.
//!
//! 1. Parsing never panics on arbitrary input
//! 2. Every non-empty clause is accounted for (entry or skip diagnostic)
//! 3. Well-formed configurations round-trip size and scope
//! 4. Decisions never include contained targets
//! 5. Decisions are deterministic and follow configuration order

use mover_core::{
    Breakpoint, BreakpointRule, BreakpointSet, MediaQuery, Scope, ScopeVocabulary, decide,
    parse_targets, validate_targets,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

const SIZES: [&str; 4] = ["small", "medium", "large", "xlarge"];

fn size_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SIZES.to_vec())
}

fn scope_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(None), Just(Some("up")), Just(Some("down"))]
}

/// Unique ids keep the expected entry count equal to the clause count.
fn clauses_strategy() -> impl Strategy<Value = Vec<(String, &'static str, Option<&'static str>)>> {
    prop::collection::btree_set("[a-z][a-z0-9_-]{0,8}", 0..12).prop_flat_map(|ids| {
        let n = ids.len();
        (
            Just(ids.into_iter().collect::<Vec<_>>()),
            prop::collection::vec(size_strategy(), n),
            prop::collection::vec(scope_strategy(), n),
        )
            .prop_map(|(ids, sizes, scopes)| {
                ids.into_iter()
                    .zip(sizes)
                    .zip(scopes)
                    .map(|((id, size), scope)| (id, size, scope))
                    .collect()
            })
    })
}

fn render(clauses: &[(String, &'static str, Option<&'static str>)]) -> String {
    clauses
        .iter()
        .map(|(id, size, scope)| match scope {
            Some(scope) => format!(" {id} :  {size} {scope} "),
            None => format!("{id}:{size}"),
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn set() -> BreakpointSet {
    BreakpointSet::new([
        Breakpoint::new("small", 0),
        Breakpoint::new("medium", 640),
        Breakpoint::new("large", 1024),
        Breakpoint::new("xlarge", 1200),
    ])
}

// ═══════════════════════════════════════════════════════════════════════
// 1–2. Robustness
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parse_never_panics(input in ".{0,200}") {
        let _ = parse_targets(&input);
    }

    #[test]
    fn every_clause_accounted_for(input in "[a-z :;]{0,80}") {
        let parsed = parse_targets(&input);
        let non_empty = input.split(';').filter(|c| !c.trim().is_empty()).count();
        let skipped = parsed.diagnostics.iter().filter(|d| d.skipped_clause()).count();
        // Duplicate ids collapse into one entry, so entries can only undercount.
        prop_assert!(parsed.targets.len() + skipped <= non_empty);
        prop_assert!(skipped <= non_empty);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Round trip
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn well_formed_round_trip(clauses in clauses_strategy(), trailing in any::<bool>()) {
        let mut config = render(&clauses);
        if trailing {
            config.push(';');
        }
        let parsed = parse_targets(&config);

        prop_assert!(parsed.is_clean());
        prop_assert_eq!(parsed.targets.len(), clauses.len());
        for (id, size, scope) in &clauses {
            let expected = BreakpointRule {
                size: (*size).to_owned(),
                scope: scope.map(Scope::from),
            };
            prop_assert_eq!(parsed.targets.get(id), Some(&expected));
        }
        let order: Vec<&str> = parsed.targets.ids().collect();
        let expected_order: Vec<&str> = clauses.iter().map(|(id, _, _)| id.as_str()).collect();
        prop_assert_eq!(order, expected_order);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4–5. Decisions
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn contained_targets_never_selected(
        clauses in clauses_strategy(),
        current in size_strategy(),
        contained_mask in any::<u16>(),
    ) {
        let media = MediaQuery::new(set(), current).unwrap();
        let parsed = parse_targets(&render(&clauses));
        let valid = validate_targets(&parsed.targets, |_| 1, &media, &ScopeVocabulary::default());
        let contained: Vec<&str> = clauses
            .iter()
            .enumerate()
            .filter(|(i, _)| contained_mask & (1 << i) != 0)
            .map(|(_, (id, _, _))| id.as_str())
            .collect();

        let bps = set();
        let decisions = decide(
            &valid,
            current,
            |size| bps.at_least(current, size),
            |id| contained.iter().any(|c| *c == id),
        );
        for decision in &decisions {
            prop_assert!(!contained.iter().any(|c| *c == decision.id));
        }
    }

    #[test]
    fn decisions_deterministic_and_ordered(
        clauses in clauses_strategy(),
        current in size_strategy(),
    ) {
        let media = MediaQuery::new(set(), current).unwrap();
        let parsed = parse_targets(&render(&clauses));
        let valid = validate_targets(&parsed.targets, |_| 1, &media, &ScopeVocabulary::default());
        let bps = set();
        let run = || decide(&valid, current, |size| bps.at_least(current, size), |_| false);

        let first = run();
        prop_assert_eq!(&first, &run());

        let positions: Vec<usize> = first
            .iter()
            .filter_map(|d| clauses.iter().position(|(id, _, _)| *id == d.id))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
