#![forbid(unsafe_code)]

//! Arena-backed document tree for tests and scenario replay.
//!
//! Nodes are never freed. [`MemoryDocument::remove`] detaches a node and
//! marks it removed, so stale handles stay valid but can no longer be
//! found by id or used as a move destination.

use std::collections::BTreeMap;

use mover::Document;

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    removed: bool,
}

/// Failures reported by [`MemoryDocument`] mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryDocumentError {
    /// The handle does not belong to this document.
    UnknownNode(NodeId),
    /// The node was removed from the document.
    Removed(NodeId),
    /// Appending would make a node its own ancestor.
    Cycle { node: NodeId, container: NodeId },
    /// The root cannot be removed.
    Root,
}

impl std::fmt::Display for MemoryDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "node {} does not exist", node.0),
            Self::Removed(node) => write!(f, "node {} was removed from the document", node.0),
            Self::Cycle { node, container } => write!(
                f,
                "cannot append node {} into its own descendant {}",
                node.0, container.0
            ),
            Self::Root => f.write_str("the document root cannot be removed"),
        }
    }
}

impl std::error::Error for MemoryDocumentError {}

/// In-memory element tree rooted at a `body` node.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self { nodes: Vec::new() };
        doc.create_element("body", None);
        doc
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str, id: Option<&str>) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_owned(),
            id: id.map(str::to_owned),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            removed: false,
        });
        node
    }

    /// Create an element and append it to `parent`.
    pub fn element(
        &mut self,
        parent: NodeId,
        tag: &str,
        id: Option<&str>,
    ) -> Result<NodeId, MemoryDocumentError> {
        let node = self.create_element(tag, id);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), MemoryDocumentError> {
        self.live(parent)?;
        self.live(child)?;
        if parent == child || self.is_descendant(child, parent) {
            return Err(MemoryDocumentError::Cycle {
                node: child,
                container: parent,
            });
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), MemoryDocumentError> {
        self.live(node)?;
        self.nodes[node.0]
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    /// Detach `node` and mark it (and its subtree) removed.
    pub fn remove(&mut self, node: NodeId) -> Result<(), MemoryDocumentError> {
        if node == self.root() {
            return Err(MemoryDocumentError::Root);
        }
        self.live(node)?;
        self.detach(node);
        let mut stack = vec![node];
        while let Some(next) = stack.pop() {
            let data = &mut self.nodes[next.0];
            data.removed = true;
            stack.extend(data.children.iter().copied());
        }
        Ok(())
    }

    /// Remove the attached element carrying `id`, if there is exactly one.
    pub fn remove_by_id(&mut self, id: &str) -> Result<Option<NodeId>, MemoryDocumentError> {
        match self.find_by_id(id) {
            Some(node) => self.remove(node).map(|()| Some(node)),
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|data| data.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |data| data.children.as_slice())
    }

    #[must_use]
    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).and_then(|data| data.id.as_deref())
    }

    /// Ids of `node`'s children, in order. Children without an id are
    /// listed by tag.
    #[must_use]
    pub fn child_ids(&self, node: NodeId) -> Vec<String> {
        self.children(node)
            .iter()
            .map(|&child| self.label(child))
            .collect()
    }

    /// Whether `node` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.root() || self.is_descendant(self.root(), node)
    }

    /// Compact outline of the attached tree, e.g. `body[#home[#a] #dest]`.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(self.root(), &mut out);
        out
    }

    fn write_outline(&self, node: NodeId, out: &mut String) {
        out.push_str(&self.label(node));
        let children = self.children(node);
        if children.is_empty() {
            return;
        }
        out.push('[');
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.write_outline(child, out);
        }
        out.push(']');
    }

    fn label(&self, node: NodeId) -> String {
        let data = &self.nodes[node.0];
        match &data.id {
            Some(id) => format!("#{id}"),
            None => data.tag.clone(),
        }
    }

    fn live(&self, node: NodeId) -> Result<(), MemoryDocumentError> {
        match self.nodes.get(node.0) {
            None => Err(MemoryDocumentError::UnknownNode(node)),
            Some(data) if data.removed => Err(MemoryDocumentError::Removed(node)),
            Some(_) => Ok(()),
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    fn is_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    fn attached_with_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(move |&node| self.nodes[node.0].id.as_deref() == Some(id))
            .filter(move |&node| self.is_attached(node))
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;
    type Error = MemoryDocumentError;

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let mut hits = self.attached_with_id(id);
        let first = hits.next()?;
        hits.next().is_none().then_some(first)
    }

    fn count_by_id(&self, id: &str) -> usize {
        self.attached_with_id(id).count()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.is_descendant(*ancestor, *node)
    }

    fn detach_and_append(
        &mut self,
        node: &NodeId,
        container: &NodeId,
    ) -> Result<(), MemoryDocumentError> {
        self.append(*container, *node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(node.0)
            .and_then(|data| data.attributes.get(name).cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
