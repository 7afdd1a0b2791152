#![forbid(unsafe_code)]

//! Notifications emitted around each relocation.

/// Which side of the move an event is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovePhase {
    Before,
    After,
}

impl MovePhase {
    /// Event name as hosts usually spell it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Before => "before-move",
            Self::After => "after-move",
        }
    }
}

impl std::fmt::Display for MovePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A `before-move` or `after-move` notification.
///
/// Both events of one relocation carry the same target and container.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEvent<N> {
    pub phase: MovePhase,
    pub target_id: String,
    pub target: N,
    pub container: N,
}

impl<N> MoveEvent<N> {
    #[must_use]
    pub fn is_before(&self) -> bool {
        self.phase == MovePhase::Before
    }

    #[must_use]
    pub fn is_after(&self) -> bool {
        self.phase == MovePhase::After
    }
}
