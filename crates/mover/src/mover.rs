#![forbid(unsafe_code)]

//! The relocation engine.
//!
//! # Design
//!
//! [`Mover`] is an explicit handle; there is no global plugin registry.
//! [`MoverBuilder::build`] resolves the configuration, parses and validates
//! the target rules once, subscribes to breakpoint changes, and runs one
//! evaluation against the host's current breakpoint. Each later
//! [`BreakpointChange`] runs exactly one more evaluation.
//!
//! An evaluation (a *pass*) asks [`decide`] for the move-set and relocates
//! each selected target in configuration order:
//!
//! 1. emit `before-move`,
//! 2. detach the target and append it to the container,
//! 3. emit `after-move`.
//!
//! # Invariants
//!
//! 1. A target already inside the container never produces move events,
//!    including when a nested pass moved it earlier in the same pass.
//! 2. Within a pass, targets move in configuration order and each target's
//!    before/after pair is never interleaved with another target's.
//! 3. Without `mover_targets` the engine is inert: nothing is subscribed and
//!    nothing moves.
//! 4. Dropping the handle unsubscribes; no pass runs afterwards.
//!
//! # Failure Modes
//!
//! - **Bad scope vocabulary**: an empty list or a name with whitespace is
//!   logged at `warn`. Scoped rules that no longer validate are dropped and
//!   the rest keep working.
//! - **Target vanished**: the element was removed after validation. The
//!   target is reported as [`RelocateError::Missing`] and the pass goes on.
//! - **Document refused the move**: the host error is propagated as
//!   [`RelocateError::Document`] for that target only. Its `before-move`
//!   has already fired; no `after-move` follows.
//! - **Re-entrancy**: no document borrow is held while handlers run, so a
//!   move handler may read the document or drive the registry.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use mover_core::{
    BreakpointChange, BreakpointNotifier, BreakpointRegistry, Decision, Emitter, ParseDiagnostic,
    Subscription, ValidatedTargets, decide, parse_targets, validate_targets,
};
use tracing::{debug, error, info_span, warn};
use web_time::Instant;

use crate::config::{ConfigLayer, MoverConfig};
use crate::document::Document;
use crate::event::{MoveEvent, MovePhase};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverState {
    /// Construction has not finished its initial pass.
    Uninitialized,
    /// Listening for breakpoint changes.
    Ready,
    /// No `mover_targets` configured; nothing will ever move.
    Inert,
}

/// A single failed relocation.
#[derive(Debug)]
pub enum RelocateError {
    /// The target id no longer resolves.
    Missing { id: String },
    /// The document refused the detach/append.
    Document {
        id: String,
        source: Box<dyn std::error::Error>,
    },
}

impl RelocateError {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Missing { id } | Self::Document { id, .. } => id,
        }
    }
}

impl std::fmt::Display for RelocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { id } => write!(f, "target `{id}` is no longer in the document"),
            Self::Document { id, source } => write!(f, "moving target `{id}` failed: {source}"),
        }
    }
}

impl std::error::Error for RelocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing { .. } => None,
            Self::Document { source, .. } => Some(source.as_ref()),
        }
    }
}

/// What one pass did.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Breakpoint the pass evaluated.
    pub breakpoint: String,
    /// Targets the decision engine selected, in configuration order.
    pub selected: Vec<Decision>,
    /// Targets that were relocated.
    pub moved: Vec<String>,
    /// Targets whose relocation failed.
    pub failed: Vec<RelocateError>,
    pub duration_us: u64,
}

impl PassReport {
    fn new(breakpoint: &str) -> Self {
        Self {
            breakpoint: breakpoint.to_owned(),
            ..Self::default()
        }
    }

    /// Nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Nothing was selected.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.selected.is_empty()
    }
}

enum Targets {
    /// No rules configured: the container is its own only target.
    ContainerOnly,
    Validated(ValidatedTargets),
}

struct MoverCore<D: Document, R> {
    document: Rc<RefCell<D>>,
    container: D::Node,
    registry: R,
    config: MoverConfig,
    targets: Targets,
    diagnostics: Vec<ParseDiagnostic>,
    moves: Emitter<MoveEvent<D::Node>>,
    passes: Emitter<PassReport>,
    state: Cell<MoverState>,
    pass_count: Cell<u64>,
    move_count: Cell<u64>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Mover`].
///
/// Handlers registered here are live during the initial pass.
pub struct MoverBuilder<D: Document, R> {
    document: Rc<RefCell<D>>,
    container: D::Node,
    registry: R,
    explicit: ConfigLayer,
    move_handlers: Vec<Box<dyn Fn(&MoveEvent<D::Node>)>>,
    pass_handlers: Vec<Box<dyn Fn(&PassReport)>>,
}

impl<D, R> MoverBuilder<D, R>
where
    D: Document + 'static,
    R: BreakpointRegistry + BreakpointNotifier + 'static,
{
    /// Explicit configuration. Fields set here beat container attributes;
    /// later calls beat earlier ones.
    #[must_use]
    pub fn config(mut self, layer: impl Into<ConfigLayer>) -> Self {
        self.explicit = layer.into().or(self.explicit);
        self
    }

    #[must_use]
    pub fn mover_targets(mut self, targets: impl Into<String>) -> Self {
        self.explicit.mover_targets = Some(targets.into());
        self
    }

    #[must_use]
    pub fn breakpoint_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.explicit.breakpoint_scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Observe `before-move` / `after-move`, starting with the initial pass.
    #[must_use]
    pub fn on_move(mut self, handler: impl Fn(&MoveEvent<D::Node>) + 'static) -> Self {
        self.move_handlers.push(Box::new(handler));
        self
    }

    /// Observe every pass report, starting with the initial pass.
    #[must_use]
    pub fn on_pass(mut self, handler: impl Fn(&PassReport) + 'static) -> Self {
        self.pass_handlers.push(Box::new(handler));
        self
    }

    /// Resolve configuration, validate targets, subscribe, and run the
    /// initial pass.
    ///
    /// A bad scope vocabulary is logged and only costs the scoped rules.
    pub fn build(self) -> Mover<D, R> {
        let declared = {
            let document = self.document.borrow();
            ConfigLayer::from_attributes(|name| document.attribute(&self.container, name))
        };
        let config = MoverConfig::resolve(&self.explicit, &declared);
        let problems = config.validate();
        if !problems.is_empty() {
            warn!(
                message = "mover.config.invalid",
                problems = %problems.join("; ")
            );
        }

        let moves = Emitter::new();
        let passes = Emitter::new();
        let mut listeners: Vec<Subscription> = self
            .move_handlers
            .into_iter()
            .map(|handler| moves.subscribe(handler))
            .collect();
        listeners.extend(
            self.pass_handlers
                .into_iter()
                .map(|handler| passes.subscribe(handler)),
        );

        let (targets, diagnostics) = match config.mover_targets.as_deref() {
            None => (Targets::ContainerOnly, Vec::new()),
            Some(rules) => {
                let parsed = parse_targets(rules);
                let document = self.document.borrow();
                let valid = validate_targets(
                    &parsed.targets,
                    |id| document.count_by_id(id),
                    &self.registry,
                    &config.scope_vocabulary(),
                );
                debug!(
                    message = "mover.targets",
                    parsed = parsed.targets.len() as u64,
                    valid = valid.len() as u64,
                    diagnostics = parsed.diagnostics.len() as u64
                );
                (Targets::Validated(valid), parsed.diagnostics)
            }
        };

        let core = Rc::new(MoverCore {
            document: self.document,
            container: self.container,
            registry: self.registry,
            config,
            targets,
            diagnostics,
            moves,
            passes,
            state: Cell::new(MoverState::Uninitialized),
            pass_count: Cell::new(0),
            move_count: Cell::new(0),
        });

        let breakpoint_subscription = if matches!(core.targets, Targets::ContainerOnly) {
            core.state.set(MoverState::Inert);
            debug!(message = "mover.inert");
            None
        } else {
            let weak: Weak<MoverCore<D, R>> = Rc::downgrade(&core);
            let subscription =
                core.registry
                    .on_breakpoint_change(Box::new(move |change: &BreakpointChange| {
                        if let Some(core) = weak.upgrade() {
                            core.evaluate_at(&change.new);
                        }
                    }));
            let initial = core.registry.current_size();
            core.evaluate_at(&initial);
            core.state.set(MoverState::Ready);
            Some(subscription)
        };

        Mover {
            core,
            _listeners: listeners,
            _breakpoint_subscription: breakpoint_subscription,
        }
    }
}

// ---------------------------------------------------------------------------
// Mover
// ---------------------------------------------------------------------------

/// Handle to a running relocation engine.
///
/// Single-threaded: the handle is `!Send` and every pass runs synchronously
/// inside the notification that triggered it.
pub struct Mover<D: Document, R> {
    core: Rc<MoverCore<D, R>>,
    _listeners: Vec<Subscription>,
    _breakpoint_subscription: Option<Subscription>,
}

impl<D, R> std::fmt::Debug for Mover<D, R>
where
    D: Document,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mover")
            .field("container", &self.core.container)
            .field("state", &self.core.state.get())
            .field("passes", &self.core.pass_count.get())
            .field("moves", &self.core.move_count.get())
            .finish()
    }
}

impl<D, R> Mover<D, R>
where
    D: Document + 'static,
    R: BreakpointRegistry + BreakpointNotifier + 'static,
{
    /// Start building an engine that relocates into `container`.
    pub fn builder(document: Rc<RefCell<D>>, container: D::Node, registry: R) -> MoverBuilder<D, R> {
        MoverBuilder {
            document,
            container,
            registry,
            explicit: ConfigLayer::default(),
            move_handlers: Vec::new(),
            pass_handlers: Vec::new(),
        }
    }

    /// Build with an explicit configuration and no startup handlers.
    pub fn new(
        document: Rc<RefCell<D>>,
        container: D::Node,
        registry: R,
        config: impl Into<ConfigLayer>,
    ) -> Self {
        Self::builder(document, container, registry)
            .config(config)
            .build()
    }

    /// Run a pass against the registry's current breakpoint.
    pub fn evaluate(&self) -> PassReport {
        let current = self.core.registry.current_size();
        self.core.evaluate_at(&current)
    }

    /// Observe move events from now on.
    pub fn on_move(&self, handler: impl Fn(&MoveEvent<D::Node>) + 'static) -> Subscription {
        self.core.moves.subscribe(handler)
    }

    /// Observe pass reports from now on.
    pub fn on_pass(&self, handler: impl Fn(&PassReport) + 'static) -> Subscription {
        self.core.passes.subscribe(handler)
    }
}

impl<D: Document, R> Mover<D, R> {
    #[must_use]
    pub fn state(&self) -> MoverState {
        self.core.state.get()
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.state() == MoverState::Inert
    }

    /// Validated targets, or `None` when inert.
    #[must_use]
    pub fn targets(&self) -> Option<&ValidatedTargets> {
        match &self.core.targets {
            Targets::Validated(targets) => Some(targets),
            Targets::ContainerOnly => None,
        }
    }

    /// Parser remarks on the configured rules.
    #[must_use]
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.core.diagnostics
    }

    #[must_use]
    pub fn container(&self) -> &D::Node {
        &self.core.container
    }

    #[must_use]
    pub fn config(&self) -> &MoverConfig {
        &self.core.config
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.core.registry
    }

    #[must_use]
    pub fn document(&self) -> &Rc<RefCell<D>> {
        &self.core.document
    }

    /// Passes run so far, including the initial one.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.core.pass_count.get()
    }

    /// Successful relocations so far.
    #[must_use]
    pub fn moves_performed(&self) -> u64 {
        self.core.move_count.get()
    }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

impl<D, R> MoverCore<D, R>
where
    D: Document,
    R: BreakpointRegistry,
{
    fn evaluate_at(&self, breakpoint: &str) -> PassReport {
        let mut report = PassReport::new(breakpoint);
        let Targets::Validated(targets) = &self.targets else {
            return report;
        };

        let start = Instant::now();
        let span = info_span!(
            "mover.evaluate",
            breakpoint,
            targets = targets.len() as u64,
            selected = tracing::field::Empty,
            moved = tracing::field::Empty,
            failed = tracing::field::Empty,
            duration_us = tracing::field::Empty
        );
        let _guard = span.enter();

        report.selected = {
            let document = self.document.borrow();
            decide(
                targets,
                breakpoint,
                |size| self.registry.at_least(size),
                |id| self.is_contained(&document, id),
            )
        };

        for decision in &report.selected {
            // A nested pass run from a move handler may have moved it already.
            if self.is_contained(&self.document.borrow(), &decision.id) {
                debug!(message = "mover.relocate.skipped", id = %decision.id);
                continue;
            }
            match self.relocate(&decision.id) {
                Ok(()) => {
                    debug!(message = "mover.relocated", id = %decision.id, reason = %decision.reason);
                    report.moved.push(decision.id.clone());
                }
                Err(err) => {
                    error!(message = "mover.relocate.failed", id = %decision.id, error = %err);
                    report.failed.push(err);
                }
            }
        }

        report.duration_us = start.elapsed().as_micros() as u64;
        span.record("selected", report.selected.len() as u64);
        span.record("moved", report.moved.len() as u64);
        span.record("failed", report.failed.len() as u64);
        span.record("duration_us", report.duration_us);
        self.pass_count.set(self.pass_count.get() + 1);

        self.passes.emit(&report);
        report
    }

    fn is_contained(&self, document: &D, id: &str) -> bool {
        document
            .find_by_id(id)
            .is_some_and(|node| document.contains(&self.container, &node))
    }

    fn relocate(&self, id: &str) -> Result<(), RelocateError> {
        let target = self
            .document
            .borrow()
            .find_by_id(id)
            .ok_or_else(|| RelocateError::Missing { id: id.to_owned() })?;

        let mut event = MoveEvent {
            phase: MovePhase::Before,
            target_id: id.to_owned(),
            target,
            container: self.container.clone(),
        };
        self.moves.emit(&event);

        self.document
            .borrow_mut()
            .detach_and_append(&event.target, &self.container)
            .map_err(|source| RelocateError::Document {
                id: id.to_owned(),
                source: Box::new(source),
            })?;
        self.move_count.set(self.move_count.get() + 1);

        event.phase = MovePhase::After;
        self.moves.emit(&event);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ATTR_BREAKPOINT_SCOPES, ATTR_MOVER_TARGETS};
    use mover_core::{Breakpoint, BreakpointSet, MediaQuery};

    /// Minimal index-based tree. Node 0 is the document root.
    #[derive(Default)]
    struct TreeDoc {
        ids: Vec<Option<&'static str>>,
        parents: Vec<Option<usize>>,
        children: Vec<Vec<usize>>,
        attrs: Vec<(usize, &'static str, String)>,
    }

    #[derive(Debug)]
    struct Detached(usize);

    impl std::fmt::Display for Detached {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "node {} is detached", self.0)
        }
    }

    impl std::error::Error for Detached {}

    impl TreeDoc {
        fn new() -> Self {
            let mut doc = Self::default();
            doc.add(None, None);
            doc
        }

        fn add(&mut self, id: Option<&'static str>, parent: Option<usize>) -> usize {
            let node = self.ids.len();
            self.ids.push(id);
            self.parents.push(parent);
            self.children.push(Vec::new());
            if let Some(parent) = parent {
                self.children[parent].push(node);
            }
            node
        }

        fn detach(&mut self, node: usize) {
            if let Some(parent) = self.parents[node].take() {
                self.children[parent].retain(|&child| child != node);
            }
        }

        fn attached(&self, mut node: usize) -> bool {
            loop {
                if node == 0 {
                    return true;
                }
                match self.parents[node] {
                    Some(parent) => node = parent,
                    None => return false,
                }
            }
        }

        fn matches<'a>(&'a self, id: &'a str) -> impl Iterator<Item = usize> + 'a {
            (0..self.ids.len()).filter(move |&n| self.ids[n] == Some(id) && self.attached(n))
        }
    }

    impl Document for TreeDoc {
        type Node = usize;
        type Error = Detached;

        fn find_by_id(&self, id: &str) -> Option<usize> {
            let mut hits = self.matches(id);
            let first = hits.next()?;
            hits.next().is_none().then_some(first)
        }

        fn count_by_id(&self, id: &str) -> usize {
            self.matches(id).count()
        }

        fn contains(&self, ancestor: &usize, node: &usize) -> bool {
            let mut current = self.parents[*node];
            while let Some(parent) = current {
                if parent == *ancestor {
                    return true;
                }
                current = self.parents[parent];
            }
            false
        }

        fn detach_and_append(&mut self, node: &usize, container: &usize) -> Result<(), Detached> {
            if !self.attached(*container) {
                return Err(Detached(*container));
            }
            self.detach(*node);
            self.parents[*node] = Some(*container);
            self.children[*container].push(*node);
            Ok(())
        }

        fn attribute(&self, node: &usize, name: &str) -> Option<String> {
            self.attrs
                .iter()
                .find(|(n, key, _)| n == node && *key == name)
                .map(|(_, _, value)| value.clone())
        }
    }

    struct Fixture {
        doc: Rc<RefCell<TreeDoc>>,
        media: MediaQuery,
        home: usize,
        dest: usize,
        a: usize,
        b: usize,
    }

    fn fixture(current: &str) -> Fixture {
        let mut doc = TreeDoc::new();
        let home = doc.add(Some("home"), Some(0));
        let a = doc.add(Some("a"), Some(home));
        let b = doc.add(Some("b"), Some(home));
        let dest = doc.add(Some("dest"), Some(0));
        let set = BreakpointSet::new([
            Breakpoint::new("small", 0),
            Breakpoint::new("medium", 640),
            Breakpoint::new("large", 1024),
        ]);
        Fixture {
            doc: Rc::new(RefCell::new(doc)),
            media: MediaQuery::new(set, current).unwrap(),
            home,
            dest,
            a,
            b,
        }
    }

    fn event_log() -> (Rc<RefCell<Vec<String>>>, impl Fn(&MoveEvent<usize>) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let handler = move |event: &MoveEvent<usize>| {
            sink.borrow_mut()
                .push(format!("{}:{}", event.phase, event.target_id));
        };
        (log, handler)
    }

    #[test]
    fn inert_without_targets() {
        let fx = fixture("small");
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .build();

        assert_eq!(mover.state(), MoverState::Inert);
        assert!(mover.targets().is_none());
        fx.media.set_current("large").unwrap();
        assert_eq!(mover.passes(), 0);
        assert!(mover.evaluate().is_noop());
    }

    #[test]
    fn initial_pass_moves_matching_targets() {
        let fx = fixture("large");
        let (log, handler) = event_log();
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .mover_targets("a: large; b: small")
            .on_move(handler)
            .build();

        assert_eq!(mover.state(), MoverState::Ready);
        assert_eq!(mover.passes(), 1);
        assert_eq!(*log.borrow(), ["before-move:a", "after-move:a"]);
        let doc = fx.doc.borrow();
        assert_eq!(doc.children[fx.dest], [fx.a]);
        assert_eq!(doc.children[fx.home], [fx.b]);
    }

    #[test]
    fn each_transition_runs_one_pass_until_dropped() {
        let fx = fixture("large");
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .mover_targets("a: small; b: medium")
            .build();
        assert_eq!(mover.moves_performed(), 0);

        fx.media.set_current("medium").unwrap();
        assert_eq!(mover.passes(), 2);
        assert_eq!(fx.doc.borrow().children[fx.dest], [fx.b]);

        drop(mover);
        fx.media.set_current("small").unwrap();
        assert_eq!(fx.doc.borrow().children[fx.home], [fx.a]);
    }

    #[test]
    fn vanished_target_does_not_stop_the_pass() {
        let fx = fixture("small");
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .mover_targets("a: medium; b: medium")
            .build();
        assert_eq!(mover.targets().map(ValidatedTargets::len), Some(2));

        fx.doc.borrow_mut().detach(fx.a);
        fx.media.set_current("medium").unwrap();
        assert_eq!(mover.moves_performed(), 1);
        assert_eq!(fx.doc.borrow().children[fx.dest], [fx.b]);

        // `b` is already home; only the vanished `a` is selected again.
        let report = mover.evaluate();
        assert_eq!(report.selected.len(), 1);
        assert!(report.moved.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id(), "a");
        assert!(!report.is_clean());
    }

    #[test]
    fn failed_pass_reports_missing_and_document_errors() {
        let fx = fixture("small");
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reports);
        let _mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .mover_targets("a: medium; b: medium")
            .on_pass(move |report| {
                let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
                sink.borrow_mut().push((report.moved.clone(), failed));
            })
            .build();

        fx.doc.borrow_mut().detach(fx.a);
        fx.doc.borrow_mut().detach(fx.dest);
        fx.media.set_current("medium").unwrap();

        let reports = reports.borrow();
        assert_eq!(reports.len(), 2);
        let (moved, failed) = &reports[1];
        assert!(moved.is_empty());
        assert_eq!(
            *failed,
            [
                "target `a` is no longer in the document".to_owned(),
                format!("moving target `b` failed: node {} is detached", fx.dest),
            ]
        );
    }

    #[test]
    fn container_attributes_configure_the_engine() {
        let fx = fixture("small");
        {
            let mut doc = fx.doc.borrow_mut();
            doc.attrs.push((fx.dest, ATTR_MOVER_TARGETS, "a: small only; b: small".into()));
            doc.attrs.push((fx.dest, ATTR_BREAKPOINT_SCOPES, "down up only".into()));
        }
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .build();

        assert_eq!(mover.config().breakpoint_scopes, ["down", "up", "only"]);
        assert_eq!(fx.doc.borrow().children[fx.dest], [fx.a, fx.b]);
    }

    #[test]
    fn explicit_config_overrides_attributes() {
        let fx = fixture("small");
        fx.doc
            .borrow_mut()
            .attrs
            .push((fx.dest, ATTR_MOVER_TARGETS, "a: small".into()));
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .config(ConfigLayer::new().with_mover_targets("b: small"))
            .build();

        assert_eq!(mover.targets().unwrap().ids().collect::<Vec<_>>(), ["b"]);
        assert_eq!(fx.doc.borrow().children[fx.dest], [fx.b]);
    }

    #[test]
    fn empty_scope_vocabulary_only_drops_scoped_rules() {
        let fx = fixture("small");
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .mover_targets("a: small; b: small up")
            .breakpoint_scopes(Vec::<String>::new())
            .build();

        assert_eq!(mover.state(), MoverState::Ready);
        assert_eq!(mover.targets().unwrap().ids().collect::<Vec<_>>(), ["a"]);
        assert_eq!(fx.doc.borrow().children[fx.dest], [fx.a]);
    }

    #[test]
    fn blank_scope_attribute_keeps_unscoped_rules() {
        let fx = fixture("small");
        {
            let mut doc = fx.doc.borrow_mut();
            doc.attrs.push((fx.dest, ATTR_MOVER_TARGETS, "a: small; b: small down".into()));
            doc.attrs.push((fx.dest, ATTR_BREAKPOINT_SCOPES, String::new()));
        }
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone()).build();

        assert!(!mover.config().validate().is_empty());
        assert_eq!(mover.moves_performed(), 1);
        assert_eq!(fx.doc.borrow().children[fx.dest], [fx.a]);
        assert_eq!(fx.doc.borrow().children[fx.home], [fx.b]);
    }

    #[test]
    fn parse_diagnostics_are_kept() {
        let fx = fixture("small");
        let mover = Mover::builder(Rc::clone(&fx.doc), fx.dest, fx.media.clone())
            .mover_targets("a small; b: small")
            .build();
        assert_eq!(mover.diagnostics().len(), 1);
        assert_eq!(mover.targets().map(ValidatedTargets::len), Some(1));
    }
}
