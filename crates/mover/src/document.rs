#![forbid(unsafe_code)]

//! The document tree, as the engine sees it.
//!
//! The engine never creates or destroys elements. It looks targets up by
//! id, asks whether they already sit inside the container, and moves them.
//! Hosts implement [`Document`] over whatever tree they own.

/// Host document contract.
///
/// # Preconditions
///
/// The engine assumes it is the only code relocating its own targets.
/// Concurrent re-parenting of a target by other logic is unsupported; the
/// engine surfaces whatever error `detach_and_append` reports and moves on.
pub trait Document {
    /// Handle to an element.
    type Node: Clone + PartialEq + std::fmt::Debug + 'static;
    /// Failure reported by [`detach_and_append`](Self::detach_and_append).
    type Error: std::error::Error + 'static;

    /// The element carrying `id`, if exactly one is attached to the document.
    fn find_by_id(&self, id: &str) -> Option<Self::Node>;

    /// How many attached elements carry `id`.
    fn count_by_id(&self, id: &str) -> usize {
        usize::from(self.find_by_id(id).is_some())
    }

    /// Whether `node` is a descendant of `ancestor`.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Remove `node` from its parent and append it as the last child of
    /// `container`.
    fn detach_and_append(
        &mut self,
        node: &Self::Node,
        container: &Self::Node,
    ) -> Result<(), Self::Error>;

    /// An attribute declared on `node`.
    fn attribute(&self, _node: &Self::Node, _name: &str) -> Option<String> {
        None
    }
}
