use ego_tree::NodeId;
use std::fmt::{self, Debug, Display};

/// The walk of one search iteration, from the current root down to the node a playout
/// starts from.
///
/// Every step pairs the move played on the board with the node it reached, so the moves
/// can be undone in reverse order while the simulation result is recorded on the way up.
#[derive(Debug, Clone)]
pub struct Path<M> {
    root: NodeId,
    steps: Vec<(M, NodeId)>,
}

impl<M> Path<M> {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            steps: Vec::new(),
        }
    }

    /// Appends a step. The node must be the child of [`Path::end_node`] reached by `b_move`.
    pub fn expand(&mut self, b_move: M, node: NodeId) {
        self.steps.push((b_move, node));
    }

    /// Removes the deepest step.
    pub fn pop(&mut self) -> Option<(M, NodeId)> {
        self.steps.pop()
    }

    pub fn root_node(&self) -> NodeId {
        self.root
    }

    /// The deepest node of the walk, the root for an empty path.
    pub fn end_node(&self) -> NodeId {
        self.steps.last().map_or(self.root, |(_, node)| *node)
    }

    pub fn steps(&self) -> &[(M, NodeId)] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl<M: Debug> Display for Path<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root")?;
        for (b_move, _) in &self.steps {
            write!(f, " -> {:?}", b_move)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Path;
    use crate::mcts_node::MctsNode;
    use crate::tree::SearchTree;

    #[test]
    fn path_tracks_deepest_node() {
        // arrange
        let mut tree: SearchTree<u8, u8> = SearchTree::new();
        let root = tree.root();
        let child = tree.add_child(root, MctsNode::new(2, false)).unwrap();
        let grandchild = tree.add_child(child, MctsNode::new(5, false)).unwrap();
        let mut path = Path::new(root);
        assert!(path.is_empty());
        assert_eq!(path.end_node(), root);

        // act
        path.expand(2, child);
        path.expand(5, grandchild);

        // assert
        assert_eq!(path.len(), 2);
        assert_eq!(path.end_node(), grandchild);
        assert_eq!(path.root_node(), root);
        assert_eq!(path.to_string(), "root -> 2 -> 5");
        assert_eq!(path.pop(), Some((5, grandchild)));
        assert_eq!(path.end_node(), child);
    }
}
