#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mover_core::{
    BreakpointRegistry, BreakpointSet, MediaQuery, ScopeVocabulary, decide, parse_targets,
    validate_targets,
};

const SIZES: [&str; 6] = ["small", "medium", "large", "xlarge", "xxlarge", "tablet"];
const SCOPES: [&str; 4] = ["", "up", "down", "only"];

#[derive(Debug, Arbitrary)]
struct Clause {
    id: u8,
    size: u8,
    scope: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    clauses: Vec<Clause>,
    widths: Vec<u16>,
    contained: u32,
}

fuzz_target!(|input: Input| {
    let config: Vec<String> = input
        .clauses
        .iter()
        .take(24)
        .map(|c| {
            format!(
                "t{}: {} {}",
                c.id % 16,
                SIZES[usize::from(c.size) % SIZES.len()],
                SCOPES[usize::from(c.scope) % SCOPES.len()]
            )
        })
        .collect();
    let parsed = parse_targets(&config.join(";"));

    let Ok(media) = MediaQuery::from_width(BreakpointSet::foundation(), 0) else {
        return;
    };
    let valid = validate_targets(&parsed.targets, |_| 1, &media, &ScopeVocabulary::default());
    assert!(valid.iter().all(|t| t.rule.size != "tablet"));

    let contained = |id: &str| {
        id.trim_start_matches('t')
            .parse::<u32>()
            .is_ok_and(|n| input.contained & (1 << n) != 0)
    };

    for width in input.widths.iter().take(32) {
        media.resize(u32::from(*width));
        let current = media.current_size();
        let first = decide(&valid, &current, |size| media.at_least(size), &contained);
        let second = decide(&valid, &current, |size| media.at_least(size), &contained);
        assert_eq!(first, second);
        assert!(first.iter().all(|d| !contained(&d.id)));
        assert!(first.iter().all(|d| valid.contains(&d.id)));
    }
});
