//! Replays the checked-in scenarios and pins their traces.

use std::path::PathBuf;

use mover_harness::{Replay, Scenario, TraceLine, replay};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn run(name: &str) -> Replay {
    let scenario = Scenario::from_file(scenario_path(name)).unwrap();
    replay(&scenario).unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn pass(step: usize, breakpoint: &str, selected: &[&str], moved: &[&str], failed: &[&str]) -> TraceLine {
    TraceLine::Pass {
        step,
        breakpoint: breakpoint.to_owned(),
        selected: strings(selected),
        moved: strings(moved),
        failed: strings(failed),
    }
}

fn step(step: usize, op: &str, changed: bool) -> TraceLine {
    TraceLine::Step {
        step,
        op: op.to_owned(),
        changed,
    }
}

fn before(step: usize, target: &str) -> TraceLine {
    TraceLine::BeforeMove {
        step,
        target: target.to_owned(),
    }
}

fn after(step: usize, target: &str) -> TraceLine {
    TraceLine::AfterMove {
        step,
        target: target.to_owned(),
    }
}

#[test]
fn nav_drawer_trace() {
    let replay = run("nav_drawer.json");
    assert_eq!(
        replay.lines,
        vec![
            TraceLine::Start {
                scenario: "nav-drawer".into(),
                breakpoint: "large".into(),
                targets: strings(&["nav"]),
                diagnostics: vec![],
            },
            pass(0, "large", &[], &[], &[]),
            step(1, "resize 500", true),
            before(1, "nav"),
            after(1, "nav"),
            pass(1, "small", &["nav"], &["nav"], &[]),
            step(2, "set small", false),
            step(3, "resize 1300", true),
            pass(3, "xlarge", &[], &[], &[]),
            step(4, "evaluate", true),
            pass(4, "xlarge", &[], &[], &[]),
            TraceLine::End {
                passes: 4,
                moves: 1,
                layout: "body[#header #drawer[#nav]]".into(),
            },
        ]
    );
}

#[test]
fn sidebar_collects_in_configuration_order() {
    let replay = run("sidebar_collect.json");

    let TraceLine::Start {
        breakpoint,
        targets,
        diagnostics,
        ..
    } = &replay.lines[0]
    else {
        panic!("first line is not a start line: {:?}", replay.lines[0]);
    };
    assert_eq!(breakpoint, "medium");
    assert_eq!(*targets, strings(&["panel", "aside"]));
    assert_eq!(*diagnostics, strings(&["clause 4 `typo large` has no ':' separator"]));

    assert_eq!(
        replay.lines[2..8],
        [
            step(1, "resize 400", true),
            before(1, "panel"),
            after(1, "panel"),
            before(1, "aside"),
            after(1, "aside"),
            pass(1, "small", &["panel", "aside"], &["panel", "aside"], &[]),
        ]
    );
    assert_eq!(replay.layout, "body[#main[#links] #sidebar[#panel #aside]]");
    assert!(matches!(
        replay.lines.last(),
        Some(TraceLine::End { passes: 5, moves: 2, .. })
    ));
}

#[test]
fn removed_elements_fail_only_their_own_move() {
    let replay = run("removed_container.json");
    let passes: Vec<&TraceLine> = replay.passes().collect();
    assert_eq!(
        passes,
        [
            &pass(0, "large", &[], &[], &[]),
            &pass(2, "small", &["a", "b"], &["b"], &["a"]),
            &pass(4, "medium", &[], &[], &[]),
            &pass(5, "small", &["a", "b"], &[], &["a", "b"]),
        ]
    );
    assert_eq!(replay.layout, "body[#home]");
}

#[test]
fn inert_scenario_never_passes() {
    let replay = run("inert.json");
    assert_eq!(replay.passes().count(), 0);
    assert_eq!(
        replay.lines.last(),
        Some(&TraceLine::End {
            passes: 0,
            moves: 0,
            layout: "body[#a #dest]".into(),
        })
    );
}

#[test]
fn every_scenario_replays_deterministically() {
    for name in [
        "nav_drawer.json",
        "sidebar_collect.json",
        "removed_container.json",
        "inert.json",
    ] {
        let first = run(name).to_jsonl().unwrap();
        let second = run(name).to_jsonl().unwrap();
        assert_eq!(first, second, "{name}");
        for line in first.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("event").is_some(), "{name}: {line}");
        }
    }
}
