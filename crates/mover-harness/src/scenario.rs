#![forbid(unsafe_code)]

//! Deterministic scenario replay.
//!
//! A scenario is a JSON fixture describing a breakpoint table, a document
//! tree, the container, the engine configuration and a list of steps.
//! [`replay`] builds everything, runs the steps and returns a trace of
//! JSON-serializable lines. The same scenario always produces the same
//! trace, so traces can be checked in as golden files.
//!
//! ```json
//! {
//!   "name": "nav-collapses",
//!   "viewport": "large",
//!   "document": [
//!     { "id": "header", "children": [{ "id": "nav" }] },
//!     { "id": "drawer", "tag": "aside" }
//!   ],
//!   "container": "drawer",
//!   "config": { "moverTargets": "nav: medium down" },
//!   "steps": [{ "op": "resize", "width": 500 }]
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use mover::{
    BreakpointRegistry, BreakpointSet, ConfigLayer, Document, MediaQuery, MediaQueryError, Mover,
    RelocateError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::document::{MemoryDocument, MemoryDocumentError, NodeId};

// ---------------------------------------------------------------------------
// Fixture format
// ---------------------------------------------------------------------------

/// A replayable scenario.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    /// Defaults to the Foundation table.
    #[serde(default = "BreakpointSet::foundation")]
    pub breakpoints: BreakpointSet,
    /// Starting breakpoint, by name or by width.
    pub viewport: Viewport,
    /// Children of the document root.
    #[serde(default)]
    pub document: Vec<ElementDef>,
    /// Id of the container element.
    pub container: String,
    /// Explicit engine configuration.
    #[serde(default)]
    pub config: ConfigLayer,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Starting viewport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Viewport {
    Width(u32),
    Breakpoint(String),
}

/// One element of the initial document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElementDef {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ElementDef>,
}

fn default_tag() -> String {
    "div".to_owned()
}

/// A scripted host action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Switch to a named breakpoint.
    Set { breakpoint: String },
    /// Resize the viewport.
    Resize { width: u32 },
    /// Remove an element by id.
    Remove { id: String },
    /// Run a pass without a breakpoint change.
    Evaluate,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set { breakpoint } => write!(f, "set {breakpoint}"),
            Self::Resize { width } => write!(f, "resize {width}"),
            Self::Remove { id } => write!(f, "remove #{id}"),
            Self::Evaluate => f.write_str("evaluate"),
        }
    }
}

impl Scenario {
    pub fn from_json_str(s: &str) -> Result<Self, ScenarioError> {
        serde_json::from_str(s).map_err(ScenarioError::Json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ScenarioError::Io)?;
        Self::from_json_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// One line of replay output.
///
/// `step` is 0 for everything that happens during construction and the
/// 1-based step index afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TraceLine {
    Start {
        scenario: String,
        breakpoint: String,
        targets: Vec<String>,
        diagnostics: Vec<String>,
    },
    Step {
        step: usize,
        op: String,
        changed: bool,
    },
    BeforeMove {
        step: usize,
        target: String,
    },
    AfterMove {
        step: usize,
        target: String,
    },
    Pass {
        step: usize,
        breakpoint: String,
        selected: Vec<String>,
        moved: Vec<String>,
        failed: Vec<String>,
    },
    End {
        passes: u64,
        moves: u64,
        layout: String,
    },
}

/// Replay result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub lines: Vec<TraceLine>,
    /// Final document outline.
    pub layout: String,
}

impl Replay {
    /// One JSON object per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&serde_json::to_string(line)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Pass lines only.
    pub fn passes(&self) -> impl Iterator<Item = &TraceLine> {
        self.lines
            .iter()
            .filter(|line| matches!(line, TraceLine::Pass { .. }))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that stop a replay.
#[derive(Debug)]
pub enum ScenarioError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Media(MediaQueryError),
    Document(MemoryDocumentError),
    /// No unique element carries the container id.
    UnknownContainer(String),
    /// A `remove` step named an id that is not in the document.
    UnknownNode(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "scenario parse error: {e}"),
            Self::Media(e) => write!(f, "viewport error: {e}"),
            Self::Document(e) => write!(f, "document error: {e}"),
            Self::UnknownContainer(id) => write!(f, "container `{id}` not found"),
            Self::UnknownNode(id) => write!(f, "element `{id}` not found"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Media(e) => Some(e),
            Self::Document(e) => Some(e),
            Self::UnknownContainer(_) | Self::UnknownNode(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Build the document from definitions under `parent`.
fn build_document(
    doc: &mut MemoryDocument,
    parent: NodeId,
    defs: &[ElementDef],
) -> Result<(), MemoryDocumentError> {
    for def in defs {
        let node = doc.element(parent, &def.tag, def.id.as_deref())?;
        for (name, value) in &def.attributes {
            doc.set_attribute(node, name, value)?;
        }
        build_document(doc, node, &def.children)?;
    }
    Ok(())
}

fn failure_ids(failed: &[RelocateError]) -> Vec<String> {
    failed.iter().map(|err| err.id().to_owned()).collect()
}

/// Run a scenario to completion.
pub fn replay(scenario: &Scenario) -> Result<Replay, ScenarioError> {
    let span = info_span!("mover.replay", scenario = %scenario.name);
    let _guard = span.enter();

    let media = match &scenario.viewport {
        Viewport::Breakpoint(name) => MediaQuery::new(scenario.breakpoints.clone(), name),
        Viewport::Width(width) => MediaQuery::from_width(scenario.breakpoints.clone(), *width),
    }
    .map_err(ScenarioError::Media)?;

    let mut doc = MemoryDocument::new();
    let root = doc.root();
    build_document(&mut doc, root, &scenario.document).map_err(ScenarioError::Document)?;
    let container = doc
        .find_by_id(&scenario.container)
        .ok_or_else(|| ScenarioError::UnknownContainer(scenario.container.clone()))?;
    let doc = Rc::new(RefCell::new(doc));

    let lines: Rc<RefCell<Vec<TraceLine>>> = Rc::new(RefCell::new(Vec::new()));
    let step = Rc::new(Cell::new(0_usize));

    let move_lines = Rc::clone(&lines);
    let move_step = Rc::clone(&step);
    let pass_lines = Rc::clone(&lines);
    let pass_step = Rc::clone(&step);

    // Construction runs the initial pass, so the start line is spliced in
    // ahead of whatever it produced.
    let mover = Mover::builder(Rc::clone(&doc), container, media.clone())
        .config(scenario.config.clone())
        .on_move(move |event| {
            let step = move_step.get();
            let target = event.target_id.clone();
            move_lines.borrow_mut().push(if event.is_before() {
                TraceLine::BeforeMove { step, target }
            } else {
                TraceLine::AfterMove { step, target }
            });
        })
        .on_pass(move |report| {
            pass_lines.borrow_mut().push(TraceLine::Pass {
                step: pass_step.get(),
                breakpoint: report.breakpoint.clone(),
                selected: report.selected.iter().map(|d| d.id.clone()).collect(),
                moved: report.moved.clone(),
                failed: failure_ids(&report.failed),
            });
        })
        .build();

    lines.borrow_mut().insert(
        0,
        TraceLine::Start {
            scenario: scenario.name.clone(),
            breakpoint: media.current_size(),
            targets: mover
                .targets()
                .map(|targets| targets.ids().map(str::to_owned).collect())
                .unwrap_or_default(),
            diagnostics: mover.diagnostics().iter().map(ToString::to_string).collect(),
        },
    );

    for (index, action) in scenario.steps.iter().enumerate() {
        step.set(index + 1);
        debug!(message = "mover.replay.step", step = index + 1, op = %action);
        let position = lines.borrow().len();
        let changed = match action {
            Step::Set { breakpoint } => media
                .set_current(breakpoint)
                .map_err(ScenarioError::Media)?,
            Step::Resize { width } => media.resize(*width),
            Step::Remove { id } => doc
                .borrow_mut()
                .remove_by_id(id)
                .map_err(ScenarioError::Document)?
                .ok_or_else(|| ScenarioError::UnknownNode(id.clone()))
                .map(|_| true)?,
            Step::Evaluate => {
                mover.evaluate();
                true
            }
        };
        lines.borrow_mut().insert(
            position,
            TraceLine::Step {
                step: index + 1,
                op: action.to_string(),
                changed,
            },
        );
    }

    let layout = doc.borrow().outline();
    lines.borrow_mut().push(TraceLine::End {
        passes: mover.passes(),
        moves: mover.moves_performed(),
        layout: layout.clone(),
    });
    drop(mover);

    Ok(Replay {
        lines: lines.take(),
        layout,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
