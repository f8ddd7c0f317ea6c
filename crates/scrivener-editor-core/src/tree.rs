//! Editable content tree.
//!
//! The editable surface is modelled as an ordered tree of element containers,
//! text leaves and atomic line-break markers. Nodes live in a generational
//! arena so that a `NodeId` taken before a bulk content replacement is
//! detected as stale instead of silently pointing at a recycled slot.

use smol_str::SmolStr;

use crate::error::EditorError;

/// Handle to a node in a [`ContentTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Effective visibility of an element and its subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// `display: none`, `visibility: hidden` or the `hidden` attribute.
    Hidden,
}

/// Node payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A container element. Contributes only its children's text.
    Element {
        tag: SmolStr,
        attrs: Vec<(SmolStr, String)>,
        visibility: Visibility,
    },
    /// A text leaf. Contributes its length in chars.
    Text(String),
    /// Atomic line-break marker. Contributes exactly one synthetic char.
    LineBreak,
}

impl NodeKind {
    /// A visible element with no attributes.
    pub fn element(tag: impl Into<SmolStr>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            visibility: Visibility::Visible,
        }
    }

    /// A hidden element with no attributes.
    pub fn hidden_element(tag: impl Into<SmolStr>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            visibility: Visibility::Hidden,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// A node in the tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.kind, NodeKind::LineBreak)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Whether this node hides itself and its subtree.
    pub fn is_hidden(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Element {
                visibility: Visibility::Hidden,
                ..
            }
        )
    }

    /// Text content of a text leaf.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Length this node contributes on its own (children excluded).
    pub fn own_len(&self) -> usize {
        match &self.kind {
            NodeKind::Text(s) => s.chars().count(),
            NodeKind::LineBreak => 1,
            NodeKind::Element { .. } => 0,
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Ordered tree of text leaves and inline markers under a root container.
#[derive(Clone, Debug)]
pub struct ContentTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// Create a tree with an empty `div` root.
    pub fn new() -> Self {
        Self::with_root(NodeKind::element("div"))
    }

    /// Create a tree with the given root container.
    pub fn with_root(kind: NodeKind) -> Self {
        let root_node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Returns None for stale ids.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Look up a node, failing with `StaleNode` if it is gone.
    pub fn node(&self, id: NodeId) -> Result<&Node, EditorError> {
        self.get(id).ok_or(EditorError::StaleNode(id))
    }

    /// Whether `id` still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], EditorError> {
        Ok(self.node(id)?.children())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, EditorError> {
        Ok(self.node(id)?.parent())
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Result<Option<usize>, EditorError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        Ok(self
            .node(parent)?
            .children
            .iter()
            .position(|child| *child == id))
    }

    fn alloc(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let node = Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Append a new child to `parent`.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, EditorError> {
        let len = self.children(parent)?.len();
        self.insert_child(parent, len, kind)
    }

    /// Insert a new child at `index` among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        kind: NodeKind,
    ) -> Result<NodeId, EditorError> {
        let parent_node = self.node(parent)?;
        if !parent_node.is_element() {
            return Err(EditorError::InvalidTarget("only elements can have children"));
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(EditorError::ChildIndexOutOfRange { index, len });
        }
        let id = self.alloc(kind, parent);
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.insert(index, id);
        }
        Ok(id)
    }

    /// Detach `id` from its parent and free its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), EditorError> {
        if id == self.root {
            return Err(EditorError::InvalidTarget("cannot remove the root"));
        }
        if let Some(parent) = self.node(id)?.parent {
            if let Some(parent_node) = self.get_mut(parent) {
                parent_node.children.retain(|child| *child != id);
            }
        }
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index as usize) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    /// Remove every child of the root. All previously issued ids except the
    /// root become stale.
    pub fn clear(&mut self) {
        let children = self
            .get(self.root)
            .map(|root| root.children.clone())
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
        let root = self.root;
        if let Some(root_node) = self.get_mut(root) {
            root_node.children.clear();
        }
    }

    /// Mutable access to a text leaf's contents.
    pub fn text_mut(&mut self, id: NodeId) -> Result<&mut String, EditorError> {
        match self.get_mut(id) {
            Some(Node {
                kind: NodeKind::Text(s),
                ..
            }) => Ok(s),
            Some(_) => Err(EditorError::InvalidTarget("not a text node")),
            None => Err(EditorError::StaleNode(id)),
        }
    }

    /// Change an element's visibility.
    pub fn set_visibility(&mut self, id: NodeId, value: Visibility) -> Result<(), EditorError> {
        match self.get_mut(id) {
            Some(Node {
                kind: NodeKind::Element { visibility, .. },
                ..
            }) => {
                *visibility = value;
                Ok(())
            }
            Some(_) => Err(EditorError::InvalidTarget("not an element")),
            None => Err(EditorError::StaleNode(id)),
        }
    }

    /// Number of chars `id` and its subtree contribute to the plain-text
    /// projection. Hidden subtrees contribute nothing.
    pub fn visible_len(&self, id: NodeId) -> Result<usize, EditorError> {
        let node = self.node(id)?;
        if node.is_hidden() {
            return Ok(0);
        }
        Ok(self
            .walk_visible(id)
            .filter_map(|n| self.get(n))
            .map(Node::own_len)
            .sum())
    }

    /// Total length of the plain-text projection.
    pub fn len(&self) -> usize {
        self.visible_len(self.root).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text projection: visible text with line breaks as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for id in self.walk_visible(self.root) {
            match self.get(id).map(|n| &n.kind) {
                Some(NodeKind::Text(s)) => out.push_str(s),
                Some(NodeKind::LineBreak) => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Pre-order walk of `start` and its subtree.
    pub fn walk(&self, start: NodeId) -> Walker<'_> {
        Walker::new(self, start, false)
    }

    /// Pre-order walk that skips hidden elements together with their subtrees.
    pub fn walk_visible(&self, start: NodeId) -> Walker<'_> {
        Walker::new(self, start, true)
    }
}

/// Document-order iterator over node ids.
pub struct Walker<'a> {
    tree: &'a ContentTree,
    stack: Vec<NodeId>,
    skip_hidden: bool,
}

impl<'a> Walker<'a> {
    fn new(tree: &'a ContentTree, start: NodeId, skip_hidden: bool) -> Self {
        Self {
            tree,
            stack: vec![start],
            skip_hidden,
        }
    }
}

impl Iterator for Walker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if self.skip_hidden && node.is_hidden() {
                continue;
            }
            self.stack.extend(node.children.iter().rev().copied());
            return Some(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ContentTree, NodeId, NodeId, NodeId) {
        let mut tree = ContentTree::new();
        let root = tree.root();
        let hello = tree.append_child(root, NodeKind::text("hello")).unwrap();
        let span = tree.append_child(root, NodeKind::element("span")).unwrap();
        let world = tree.append_child(span, NodeKind::text(" world")).unwrap();
        (tree, hello, span, world)
    }

    #[test]
    fn test_walk_is_document_order() {
        let (tree, hello, span, world) = sample();
        let order: Vec<_> = tree.walk(tree.root()).collect();
        assert_eq!(order, vec![tree.root(), hello, span, world]);
    }

    #[test]
    fn test_hidden_subtree_skipped() {
        let (mut tree, _, span, _) = sample();
        tree.set_visibility(span, Visibility::Hidden).unwrap();
        assert_eq!(tree.plain_text(), "hello");
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.visible_len(span).unwrap(), 0);
    }

    #[test]
    fn test_line_break_counts_one() {
        let (mut tree, _, _, _) = sample();
        let root = tree.root();
        tree.insert_child(root, 1, NodeKind::LineBreak).unwrap();
        assert_eq!(tree.plain_text(), "hello\n world");
        assert_eq!(tree.len(), 12);
    }

    #[test]
    fn test_removed_ids_are_stale() {
        let (mut tree, hello, span, world) = sample();
        tree.remove(span).unwrap();
        assert!(!tree.contains(span));
        assert!(!tree.contains(world));
        assert!(tree.contains(hello));

        // Slot reuse must not revive the old id.
        let fresh = tree.append_child(tree.root(), NodeKind::text("x")).unwrap();
        assert!(tree.contains(fresh));
        assert!(!tree.contains(span) && !tree.contains(world));
        assert_eq!(tree.node(world).unwrap_err(), EditorError::StaleNode(world));
    }

    #[test]
    fn test_clear_invalidates_everything_but_root() {
        let (mut tree, hello, _, world) = sample();
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.contains(hello));
        assert!(!tree.contains(world));
        assert!(tree.contains(tree.root()));
    }

    #[test]
    fn test_cannot_nest_under_text() {
        let (mut tree, hello, _, _) = sample();
        assert!(matches!(
            tree.append_child(hello, NodeKind::LineBreak),
            Err(EditorError::InvalidTarget(_))
        ));
    }
}
