#![no_main]

use libfuzzer_sys::fuzz_target;
use mover_core::parse_targets;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let parsed = parse_targets(input);

    let non_empty = input.split(';').filter(|c| !c.trim().is_empty()).count();
    let skipped = parsed.diagnostics.iter().filter(|d| d.skipped_clause()).count();
    assert!(parsed.targets.len() + skipped <= non_empty);

    for target in &parsed.targets {
        assert!(!target.id.is_empty(), "empty id accepted");
        assert!(!target.id.contains(':') && !target.id.contains(';'));
        assert!(!target.rule.size.is_empty(), "empty size accepted");
        assert!(!target.rule.size.chars().any(char::is_whitespace));
    }
});
