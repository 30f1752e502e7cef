//! Search tree with arena allocation.
//!
//! Nodes live in an [`ego_tree::Tree`] and are addressed by [`NodeId`]. The arena root is
//! fixed, so the search keeps its own notion of the current root: moving it down a
//! committed move or back up a rolled-back move is a handle swap, and [`SearchTree::compact`]
//! rebuilds the arena when the nodes outside the current subtree should be freed.

use crate::mcts_node::MctsNode;
use ego_tree::{NodeId, NodeRef, Tree};
use std::hash::Hash;

/// Search tree rooted at the position the search currently plays from.
#[derive(Debug)]
pub struct SearchTree<M, P> {
    tree: Tree<MctsNode<M, P>>,
    root_id: NodeId,
}

impl<M: Clone + PartialEq, P: Clone + Eq + Hash> Default for SearchTree<M, P> {
    fn default() -> Self {
        SearchTree::new()
    }
}

impl<M: Clone + PartialEq, P: Clone + Eq + Hash> SearchTree<M, P> {
    /// Creates a tree holding a single, unvisited root.
    pub fn new() -> Self {
        let tree = Tree::new(MctsNode::root());
        let root_id = tree.root().id();
        Self { tree, root_id }
    }

    /// The node the search currently starts from.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root_id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&MctsNode<M, P>> {
        self.tree.get(id).map(|node| node.value())
    }

    /// Iterates over the children of a node in the order they were created.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeRef<'_, MctsNode<M, P>>> {
        self.tree.get(id).into_iter().flat_map(|node| node.children())
    }

    /// Returns the child reached from `id` by `b_move`, if it has been created.
    pub fn child(&self, id: NodeId, b_move: &M) -> Option<NodeId> {
        self.children(id)
            .find(|child| child.value().prev_move() == Some(b_move))
            .map(|child| child.id())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.parent().map(|parent| parent.id())
    }

    /// A leaf is a node without children, whatever its terminal flag says.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.tree.get(id).is_none_or(|node| !node.has_children())
    }

    /// Appends a child under `parent` and returns its id, or `None` if `parent` is unknown.
    pub fn add_child(&mut self, parent: NodeId, node: MctsNode<M, P>) -> Option<NodeId> {
        let mut parent = self.tree.get_mut(parent)?;
        Some(parent.append(node).id())
    }

    pub fn set_terminal(&mut self, id: NodeId, terminal: bool) {
        if let Some(mut node) = self.tree.get_mut(id) {
            node.value().set_terminal(terminal);
        }
    }

    pub fn record_result(&mut self, id: NodeId, winner: P) {
        if let Some(mut node) = self.tree.get_mut(id) {
            node.value().result(winner);
        }
    }

    /// Moves the current root to `id`. The old root stays in the arena, so a rollback
    /// can move back to it until the tree is compacted.
    pub fn set_root(&mut self, id: NodeId) {
        self.root_id = id;
    }

    /// Detaches `id` from its parent, making the ancestors unreachable from it.
    pub fn make_root(&mut self, id: NodeId) {
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Rebuilds the arena so that it only holds the current root and its descendants.
    /// Node ids handed out before the call are invalidated; the new root has no parent.
    pub fn compact(&mut self) {
        self.make_root(self.root_id);
        let Some(old_root) = self.tree.get(self.root_id) else {
            return;
        };

        let capacity = old_root.descendants().count();
        let mut compacted = Tree::with_capacity(old_root.value().clone(), capacity);
        let mut pending = vec![(self.root_id, compacted.root().id())];
        while let Some((old_id, new_id)) = pending.pop() {
            let Some(old_node) = self.tree.get(old_id) else {
                continue;
            };
            let Some(mut new_parent) = compacted.get_mut(new_id) else {
                continue;
            };
            for child in old_node.children() {
                let new_child = new_parent.append(child.value().clone()).id();
                pending.push((child.id(), new_child));
            }
        }

        self.root_id = compacted.root().id();
        self.tree = compacted;
    }

    /// Returns statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let mut reachable_nodes = 0;
        let mut max_depth = 0;
        let mut pending = vec![(self.root_id, 0u32)];
        while let Some((id, depth)) = pending.pop() {
            reachable_nodes += 1;
            max_depth = max_depth.max(depth);
            pending.extend(self.children(id).map(|child| (child.id(), depth + 1)));
        }

        TreeStats {
            arena_nodes: self.tree.nodes().count(),
            reachable_nodes,
            root_simulations: self.node(self.root_id).map_or(0, |root| root.simulations()),
            max_depth,
        }
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes held in memory, including the ones left behind by re-rooting.
    pub arena_nodes: usize,
    /// Nodes reachable from the current root, the root included.
    pub reachable_nodes: usize,
    pub root_simulations: u64,
    pub max_depth: u32,
}
