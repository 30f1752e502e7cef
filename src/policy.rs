use crate::board::Board;
use crate::mcts::{NodeOf, TreeOf};
use ego_tree::NodeId;

/// Picks the child to walk into during selection and ranks the children of a node
/// once the search is over.
pub trait SelectionPolicy<B: Board> {
    /// Returns the move leading to the most promising child of `node` for `player`, or
    /// `None` when every child is terminal and has been visited, so nothing is left to
    /// explore below `node`.
    fn select_move(&self, tree: &TreeOf<B>, node: NodeId, player: &B::Player) -> Option<B::Move>;

    /// The score a child gets when the best move is decided.
    fn value(&self, node: &NodeOf<B>, player: &B::Player) -> f64;

    /// Returns the move leading to the child with the highest [`SelectionPolicy::value`].
    /// Ties go to the child created first.
    fn best_move(&self, tree: &TreeOf<B>, node: NodeId, player: &B::Player) -> Option<B::Move> {
        let mut best: Option<(&B::Move, f64)> = None;
        for child in tree.children(node) {
            let data = child.value();
            let Some(b_move) = data.prev_move() else {
                continue;
            };
            let value = self.value(data, player);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((b_move, value));
            }
        }
        best.map(|(b_move, _)| b_move.clone())
    }
}

/// Upper Confidence bound applied to Trees.
#[derive(Debug, Clone, Copy)]
pub struct Uct {
    pub exploration: f64,
}

impl Default for Uct {
    fn default() -> Self {
        Uct::new(std::f64::consts::SQRT_2)
    }
}

impl Uct {
    pub const fn new(exploration: f64) -> Self {
        Self { exploration }
    }

    /// Calculates the UCB1 value of a visited child.
    pub fn ucb_value(&self, parent_simulations: u64, child_score: f64, child_simulations: u64) -> f64 {
        let child_simulations = child_simulations as f64;
        child_score / child_simulations
            + self.exploration * f64::sqrt(f64::ln(parent_simulations as f64) / child_simulations)
    }
}

/// Total reward `player` collected over the simulations that went through `node`.
/// With the default [`Board::reward`] this is the node's win count for `player`.
fn score<B: Board>(node: &NodeOf<B>, player: &B::Player) -> f64 {
    node.outcomes()
        .map(|(winner, count)| B::reward(winner, player) * count as f64)
        .sum()
}

impl<B: Board> SelectionPolicy<B> for Uct {
    fn select_move(&self, tree: &TreeOf<B>, node: NodeId, player: &B::Player) -> Option<B::Move> {
        let parent_simulations = tree.node(node)?.simulations();
        let mut open = false;
        let mut best: Option<(&B::Move, f64)> = None;
        for child in tree.children(node) {
            let data = child.value();
            let Some(b_move) = data.prev_move() else {
                continue;
            };
            // unvisited children come first
            if data.simulations() == 0 {
                return Some(b_move.clone());
            }

            // finished positions keep competing, so a reply that loses on the spot is seen
            open |= !data.is_terminal();
            let ucb = self.ucb_value(parent_simulations, score::<B>(data, player), data.simulations());
            if best.is_none_or(|(_, max_ucb)| ucb > max_ucb) {
                best = Some((b_move, ucb));
            }
        }

        if !open {
            return None;
        }
        best.map(|(b_move, _)| b_move.clone())
    }

    fn value(&self, node: &NodeOf<B>, player: &B::Player) -> f64 {
        score::<B>(node, player)
    }
}
