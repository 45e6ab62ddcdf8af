//! The change tree produced by a comparison.
//!
//! A [`Node`] records the outcome of comparing the working and base values at
//! one [`Path`]. Children are owned by their parent and kept in insertion
//! order, with an index from path segment to position for lookups. There are
//! no parent back-references: the tree is built top-down during one
//! comparison and is read-only once the comparison returns.
//!
//! # Invariants
//!
//! - Every child's path is its parent's path plus exactly one element.
//! - No two children share a path segment.
//! - `has_changes()` is true iff the node's own state is not `Untouched` or
//!   any descendant has changes.

use std::collections::HashMap;
use std::fmt;

use graphdiff_types::{Path, PathElement, Value};
use tracing::warn;

use crate::error::{DiffError, DiffResult};

/// Classification of a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum State {
    /// Both sides are equal (or both absent).
    #[default]
    Untouched,
    /// Present in working, absent in base.
    Added,
    /// Absent in working, present in base.
    Removed,
    /// Present on both sides with differing content.
    Changed,
}

impl State {
    /// Returns `true` for every state except `Untouched`.
    pub fn is_change(self) -> bool {
        self != Self::Untouched
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Untouched => "UNTOUCHED",
            Self::Added => "ADDED",
            Self::Removed => "REMOVED",
            Self::Changed => "CHANGED",
        };
        f.write_str(name)
    }
}

/// What a [`NodeVisitor`] wants the walk to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// End the walk.
    Stop,
}

/// Callback for a depth-first, pre-order walk of a node tree.
pub trait NodeVisitor {
    fn node(&mut self, node: &Node) -> Visit;
}

impl<F> NodeVisitor for F
where
    F: FnMut(&Node) -> Visit,
{
    fn node(&mut self, node: &Node) -> Visit {
        self(node)
    }
}

/// The comparison result at one location of the compared graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    path: Path,
    state: State,
    working: Option<Value>,
    base: Option<Value>,
    children: Vec<Node>,
    index: HashMap<PathElement, usize>,
}

impl Node {
    /// Create an untouched node at `path`.
    pub fn new(path: Path) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    /// Create a node at `path` with the given state.
    pub fn with_state(path: Path, state: State) -> Self {
        Self {
            path,
            state,
            ..Self::default()
        }
    }

    /// Attach snapshots of the compared values.
    pub fn with_values(mut self, working: Option<Value>, base: Option<Value>) -> Self {
        self.working = working;
        self.base = base;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Snapshot of the working value, when the producing differ kept one.
    pub fn working(&self) -> Option<&Value> {
        self.working.as_ref()
    }

    /// Snapshot of the base value, when the producing differ kept one.
    pub fn base(&self) -> Option<&Value> {
        self.base.as_ref()
    }

    pub fn has_changes(&self) -> bool {
        self.state.is_change() || self.children.iter().any(Node::has_changes)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Direct children, in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The direct child under `element`, if any.
    pub fn child_at(&self, element: &PathElement) -> Option<&Node> {
        self.index.get(element).map(|&i| &self.children[i])
    }

    /// The descendant at `path`.
    ///
    /// `path` is absolute, so it must start with this node's own path; use
    /// [`child_relative`](Self::child_relative) to address from this node
    /// instead. Returns `None` when no node exists there, which is the normal
    /// outcome for locations that were never compared.
    pub fn child(&self, path: &Path) -> Option<&Node> {
        if !path.starts_with(&self.path) {
            return None;
        }
        descend(self, &path.elements()[self.path.len()..])
    }

    /// The descendant reached by following `relative` from this node.
    ///
    /// The root path addresses this node itself.
    pub fn child_relative(&self, relative: &Path) -> Option<&Node> {
        descend(self, relative.elements())
    }

    /// Attach `child` under its own last path segment.
    ///
    /// Fails if the child's path is not this path plus one element, or if a
    /// child already occupies that segment.
    pub fn add_child(&mut self, child: Node) -> DiffResult<()> {
        if !child.path.is_child_of(&self.path) {
            return Err(DiffError::NotADirectChild {
                parent: self.path.clone(),
                child: child.path,
            });
        }
        let Some(element) = child.path.last().cloned() else {
            return Err(DiffError::NotADirectChild {
                parent: self.path.clone(),
                child: child.path,
            });
        };
        if self.index.contains_key(&element) {
            return Err(DiffError::DuplicateChild(child.path));
        }
        self.index.insert(element, self.children.len());
        self.children.push(child);
        Ok(())
    }

    /// Attach a differ-produced child under `element`.
    ///
    /// The child is placed at this path plus `element` whatever path it
    /// reports, so a comparator that returns a node at the wrong location
    /// cannot drop its result. A second child under the same segment
    /// replaces the first.
    pub(crate) fn attach(&mut self, element: PathElement, mut child: Node) {
        let expected = self.path.append(element.clone());
        if child.path != expected {
            warn!(
                expected = %expected,
                reported = %child.path,
                "comparator returned a node at another path; relocating it"
            );
            child.relocate(expected);
        }
        match self.index.get(&element).copied() {
            Some(i) => {
                warn!(path = %child.path, "replacing an existing child");
                self.children[i] = child;
            }
            None => {
                self.index.insert(element, self.children.len());
                self.children.push(child);
            }
        }
    }

    /// Move this subtree to `path`, rewriting every descendant path.
    fn relocate(&mut self, path: Path) {
        for child in &mut self.children {
            if let Some(element) = child.path.last().cloned() {
                child.relocate(path.append(element));
            }
        }
        self.path = path;
    }

    /// Mark this node `Changed` if any child has changes.
    pub(crate) fn resolve_from_children(&mut self) {
        if self.children.iter().any(Node::has_changes) {
            self.state = State::Changed;
        }
    }

    /// Depth-first, pre-order walk starting at this node.
    ///
    /// Returns `false` if the visitor stopped the walk.
    pub fn visit<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> bool {
        match visitor.node(self) {
            Visit::Stop => false,
            Visit::SkipChildren => true,
            Visit::Continue => self.children.iter().all(|child| child.visit(visitor)),
        }
    }

    /// The most specific changes: changed nodes none of whose children
    /// have changes, in walk order.
    pub fn changes(&self) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_changes(&mut found);
        found
    }

    fn collect_changes<'a>(&'a self, found: &mut Vec<&'a Node>) {
        if !self.has_changes() {
            return;
        }
        if self.children.iter().any(Node::has_changes) {
            for child in &self.children {
                child.collect_changes(found);
            }
        } else {
            found.push(self);
        }
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    /// Always `false`: a subtree contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

fn descend<'a>(node: &'a Node, elements: &[PathElement]) -> Option<&'a Node> {
    elements
        .iter()
        .try_fold(node, |node, element| node.child_at(element))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(path: Path, state: State) -> Node {
        Node::with_state(path, state)
    }

    #[test]
    fn new_node_is_untouched_leaf() {
        let node = Node::new(Path::root());
        assert_eq!(node.state(), State::Untouched);
        assert!(!node.has_changes());
        assert!(!node.has_children());
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn state_setter() {
        let mut node = Node::new(Path::root());
        node.set_state(State::Changed);
        assert_eq!(node.state(), State::Changed);
        assert!(node.has_changes());
    }

    #[test]
    fn changes_propagate_from_descendants() {
        let root = Path::root();
        let a = root.property("a");
        let mut child = Node::new(a.clone());
        child.add_child(leaf(a.property("b"), State::Added)).unwrap();

        let mut node = Node::new(root);
        node.add_child(child).unwrap();

        assert_eq!(node.state(), State::Untouched);
        assert!(node.has_children());
        assert!(node.has_changes());
    }

    #[test]
    fn child_lookup_by_absolute_path() {
        let root = Path::root();
        let items = root.property("items");
        let foo = items.collection_item("foo");

        let mut items_node = Node::new(items.clone());
        items_node.add_child(leaf(foo.clone(), State::Added)).unwrap();
        let mut node = Node::new(root.clone());
        node.add_child(items_node).unwrap();

        assert_eq!(node.child(&foo).map(Node::state), Some(State::Added));
        assert_eq!(node.child(&root).map(Node::path), Some(&root));
        assert!(node.child(&items.collection_item("bar")).is_none());

        let items_node = node.child(&items).unwrap();
        assert_eq!(items_node.child(&foo).map(Node::state), Some(State::Added));
        assert!(items_node.child(&root.property("other")).is_none());
    }

    #[test]
    fn child_lookup_relative_to_a_subtree() {
        let root = Path::root();
        let items = root.property("items");
        let foo = items.collection_item("foo");

        let mut items_node = Node::new(items.clone());
        items_node.add_child(leaf(foo.clone(), State::Added)).unwrap();
        let mut node = Node::new(root.clone());
        node.add_child(items_node).unwrap();

        let items_node = node.child_relative(&root.property("items")).unwrap();
        let relative = root.collection_item("foo");
        assert_eq!(items_node.child_relative(&relative).map(Node::path), Some(&foo));
        assert_eq!(items_node.child_relative(&root).map(Node::path), Some(&items));
        assert!(items_node.child_relative(&foo).is_none());
    }

    #[test]
    fn duplicate_child_is_rejected() {
        let root = Path::root();
        let mut node = Node::new(root.clone());
        node.add_child(leaf(root.collection_item("foo"), State::Added)).unwrap();
        let err = node
            .add_child(leaf(root.collection_item("foo"), State::Removed))
            .unwrap_err();
        assert!(matches!(err, DiffError::DuplicateChild(_)));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn non_direct_child_is_rejected() {
        let root = Path::root();
        let mut node = Node::new(root.clone());

        let grandchild = leaf(root.property("a").property("b"), State::Added);
        assert!(matches!(
            node.add_child(grandchild),
            Err(DiffError::NotADirectChild { .. })
        ));
        assert!(matches!(
            node.add_child(leaf(root.clone(), State::Added)),
            Err(DiffError::NotADirectChild { .. })
        ));
    }

    #[test]
    fn children_keep_insertion_order() {
        let root = Path::root();
        let mut node = Node::new(root.clone());
        for name in ["z", "a", "m"] {
            node.add_child(Node::new(root.property(name))).unwrap();
        }
        let names: Vec<String> = node.children().iter().map(|c| c.path().to_string()).collect();
        assert_eq!(names, vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn visit_walks_pre_order_and_honours_skip_and_stop() {
        let root = Path::root();
        let a = root.property("a");
        let mut a_node = Node::new(a.clone());
        a_node.add_child(Node::new(a.property("x"))).unwrap();
        let mut node = Node::new(root.clone());
        node.add_child(a_node).unwrap();
        node.add_child(Node::new(root.property("b"))).unwrap();

        let mut seen = Vec::new();
        assert!(node.visit(&mut |n: &Node| {
            seen.push(n.path().to_string());
            Visit::Continue
        }));
        assert_eq!(seen, vec!["/", "/a", "/a/x", "/b"]);

        let mut seen = Vec::new();
        node.visit(&mut |n: &Node| {
            seen.push(n.path().to_string());
            if n.path() == &a {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });
        assert_eq!(seen, vec!["/", "/a", "/b"]);

        let mut seen = Vec::new();
        let finished = node.visit(&mut |n: &Node| {
            seen.push(n.path().to_string());
            if n.path() == &a {
                Visit::Stop
            } else {
                Visit::Continue
            }
        });
        assert!(!finished);
        assert_eq!(seen, vec!["/", "/a"]);
    }

    #[test]
    fn changes_returns_most_specific_nodes() {
        let root = Path::root();
        let a = root.property("a");
        let mut a_node = Node::with_state(a.clone(), State::Changed);
        a_node.add_child(leaf(a.property("x"), State::Changed)).unwrap();
        a_node.add_child(leaf(a.property("y"), State::Untouched)).unwrap();

        let mut node = Node::with_state(root.clone(), State::Changed);
        node.add_child(a_node).unwrap();
        node.add_child(leaf(root.property("b"), State::Removed)).unwrap();

        let paths: Vec<String> = node.changes().iter().map(|n| n.path().to_string()).collect();
        assert_eq!(paths, vec!["/a/x", "/b"]);
    }

    #[test]
    fn attach_relocates_a_misplaced_child() {
        let root = Path::root();
        let item = root.collection_item("foo");

        let mut stray = Node::with_state(root.clone(), State::Changed);
        stray.add_child(leaf(root.property("value"), State::Changed)).unwrap();

        let mut node = Node::new(root.clone());
        node.attach(PathElement::CollectionItem(Value::from("foo")), stray);
        node.resolve_from_children();

        assert_eq!(node.state(), State::Changed);
        let child = node.child(&item).unwrap();
        assert_eq!(child.path(), &item);
        assert_eq!(
            node.child(&item.property("value")).map(Node::state),
            Some(State::Changed)
        );
    }

    #[test]
    fn attach_replaces_a_child_under_the_same_segment() {
        let root = Path::root();
        let element = PathElement::Property("a".to_string());
        let mut node = Node::new(root.clone());
        node.attach(element.clone(), leaf(root.property("a"), State::Added));
        node.attach(element, leaf(root.property("a"), State::Removed));

        assert_eq!(node.children().len(), 1);
        assert_eq!(node.child(&root.property("a")).map(Node::state), Some(State::Removed));
    }

    #[test]
    fn state_display() {
        assert_eq!(State::Added.to_string(), "ADDED");
        assert_eq!(State::Untouched.to_string(), "UNTOUCHED");
        assert!(State::Removed.is_change());
        assert!(!State::Untouched.is_change());
    }
}
