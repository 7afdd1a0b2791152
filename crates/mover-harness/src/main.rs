#![forbid(unsafe_code)]

//! Scenario replay tool.
//!
//! Replays a JSON scenario and prints the trace as JSON lines on stdout.
//!
//! # Running
//!
//! ```sh
//! cargo run -p mover-harness --bin mover-replay -- scenarios/nav_drawer.json
//! RUST_LOG=mover=debug cargo run -p mover-harness --bin mover-replay -- --log scenarios/nav_drawer.json
//! ```
//!
//! `--log` installs the JSON tracing subscriber on stderr.

use std::io::Write;
use std::process::ExitCode;

use mover_harness::{Scenario, replay};

const USAGE: &str = "usage: mover-replay [--log] <scenario.json>...";

fn main() -> ExitCode {
    let mut log = false;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--log" => log = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ => paths.push(arg),
        }
    }
    if paths.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }
    if log && let Err(err) = mover::logging::init("mover=info") {
        eprintln!("mover-replay: logging disabled: {err}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for path in &paths {
        let result = Scenario::from_file(path)
            .and_then(|scenario| replay(&scenario))
            .map_err(|err| err.to_string())
            .and_then(|trace| trace.to_jsonl().map_err(|err| err.to_string()));
        match result {
            Ok(jsonl) => {
                if let Err(err) = out.write_all(jsonl.as_bytes()) {
                    eprintln!("mover-replay: {err}");
                    return ExitCode::FAILURE;
                }
            }
            Err(err) => {
                eprintln!("mover-replay: {path}: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
