#![forbid(unsafe_code)]

//! Records move notifications for later assertions.

use std::cell::RefCell;
use std::rc::Rc;

use mover::{MoveEvent, MovePhase};
use serde::Serialize;

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedMove {
    /// `before-move` or `after-move`.
    pub event: &'static str,
    pub target: String,
}

impl RecordedMove {
    /// `"before-move:nav"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.event, self.target)
    }
}

/// Shared log of move notifications.
///
/// Clones share the same log, so a recorder can hand a handler to the engine
/// and keep a handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct MoveRecorder {
    log: Rc<RefCell<Vec<RecordedMove>>>,
}

impl MoveRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler suitable for `on_move`.
    pub fn handler<N: 'static>(&self) -> impl Fn(&MoveEvent<N>) + 'static {
        let log = Rc::clone(&self.log);
        move |event: &MoveEvent<N>| {
            log.borrow_mut().push(RecordedMove {
                event: event.phase.name(),
                target: event.target_id.clone(),
            });
        }
    }

    #[must_use]
    pub fn events(&self) -> Vec<RecordedMove> {
        self.log.borrow().clone()
    }

    /// Labels in the order they were recorded.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.log.borrow().iter().map(RecordedMove::label).collect()
    }

    /// Targets that completed a move, in order.
    #[must_use]
    pub fn moved(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter(|record| record.event == MovePhase::After.name())
            .map(|record| record.target.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<RecordedMove> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Whether every `after-move` directly follows the `before-move` of the
    /// same target.
    ///
    /// A `before-move` with no `after-move` (a failed relocation) is allowed.
    #[must_use]
    pub fn is_well_paired(&self) -> bool {
        let log = self.log.borrow();
        log.iter().enumerate().all(|(i, record)| {
            record.event != MovePhase::After.name()
                || i.checked_sub(1).is_some_and(|prev| {
                    log[prev].event == MovePhase::Before.name() && log[prev].target == record.target
                })
        })
    }
}
