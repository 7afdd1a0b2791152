#![forbid(unsafe_code)]

//! Test support for Mover: an in-memory [`Document`](mover::Document), a
//! move-event recorder and JSON scenario replay.

pub mod document;
pub mod recorder;
pub mod scenario;

pub use document::{MemoryDocument, MemoryDocumentError, NodeId};
pub use recorder::{MoveRecorder, RecordedMove};
pub use scenario::{
    ElementDef, Replay, Scenario, ScenarioError, Step, TraceLine, Viewport, replay,
};
