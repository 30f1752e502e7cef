use std::collections::HashMap;
use std::hash::Hash;

/// Statistics stored in a single vertex of the search tree.
///
/// The node does not hold the game state: the position it stands for is reached by
/// replaying the moves on the way down from the root. Structural data (parent, children)
/// lives in the arena owned by [`crate::tree::SearchTree`].
#[derive(Debug, Clone)]
pub struct MctsNode<M, P> {
    /// The move that led to this node from its parent. `None` for a node created as a root.
    prev_move: Option<M>,
    /// Set on finished positions, and on nodes with nothing left to explore below them.
    terminal: bool,
    /// Number of simulations backpropagated through this node.
    simulations: u64,
    /// Simulations won, per winner.
    wins: HashMap<P, u64>,
}

impl<M, P: Eq + Hash> MctsNode<M, P> {
    /// Creates a root node that was not reached by any move.
    pub fn root() -> Self {
        Self {
            prev_move: None,
            terminal: false,
            simulations: 0,
            wins: HashMap::new(),
        }
    }

    /// Creates a node reached by `prev_move`. `terminal` is set when the move ends the game.
    pub fn new(prev_move: M, terminal: bool) -> Self {
        Self {
            prev_move: Some(prev_move),
            terminal,
            simulations: 0,
            wins: HashMap::new(),
        }
    }

    pub fn prev_move(&self) -> Option<&M> {
        self.prev_move.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn set_terminal(&mut self, terminal: bool) {
        self.terminal = terminal;
    }

    pub fn simulations(&self) -> u64 {
        self.simulations
    }

    pub fn wins(&self, player: &P) -> u64 {
        self.wins.get(player).copied().unwrap_or(0)
    }

    /// Iterates over every winner seen so far with the number of simulations they won.
    pub fn outcomes(&self) -> impl Iterator<Item = (&P, u64)> {
        self.wins.iter().map(|(winner, count)| (winner, *count))
    }

    /// Records the outcome of one simulation that went through this node.
    pub fn result(&mut self, winner: P) {
        self.simulations += 1;
        *self.wins.entry(winner).or_insert(0) += 1;
    }

    /// The score used to rank siblings: the raw number of simulations won by `player`.
    pub fn value(&self, player: &P) -> f64 {
        self.wins(player) as f64
    }

    /// Calculates the win rate of `player`, or `0.0` if no simulation went through yet.
    pub fn ratio(&self, player: &P) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            (self.wins(player) as f64) / (self.simulations as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MctsNode;

    #[test]
    fn fresh_node_has_zero_ratio() {
        let node: MctsNode<u8, u8> = MctsNode::root();
        assert_eq!(node.simulations(), 0);
        assert_eq!(node.wins(&1), 0);
        assert_eq!(node.ratio(&1), 0.0);
        assert!(!node.is_terminal());
        assert!(node.prev_move().is_none());
    }

    #[test]
    fn result_counts_simulations_and_wins() {
        // arrange
        let mut node: MctsNode<u8, u8> = MctsNode::new(3, false);

        // act
        node.result(1);
        node.result(1);
        node.result(2);
        node.result(1);

        // assert
        assert_eq!(node.simulations(), 4);
        assert_eq!(node.wins(&1), 3);
        assert_eq!(node.wins(&2), 1);
        assert_eq!(node.value(&1), 3.0);
        assert!((node.ratio(&1) - 0.75).abs() < 1e-12);
        assert!((node.ratio(&2) - 0.25).abs() < 1e-12);
        for player in 0..4u8 {
            let ratio = node.ratio(&player);
            assert!((0.0..=1.0).contains(&ratio));
        }
    }

    #[test]
    fn draw_sentinel_is_an_ordinary_winner() {
        const DRAW: u8 = 0;
        let mut node: MctsNode<u8, u8> = MctsNode::new(0, false);
        node.result(DRAW);
        node.result(1);

        assert_eq!(node.simulations(), 2);
        assert_eq!(node.wins(&DRAW), 1);
        assert_eq!(node.ratio(&DRAW), 0.5);
        assert_eq!(node.ratio(&1), 0.5);
        assert_eq!(node.ratio(&2), 0.0);
    }

    #[test]
    fn finished_position_is_terminal() {
        let mut node: MctsNode<u8, u8> = MctsNode::new(5, true);
        assert!(node.is_terminal());

        node.set_terminal(true);
        assert!(node.is_terminal());
    }

    #[test]
    fn outcomes_list_every_winner() {
        let mut node: MctsNode<u8, u8> = MctsNode::new(1, false);
        node.result(0);
        node.result(2);
        node.result(2);

        let mut outcomes: Vec<(u8, u64)> = node.outcomes().map(|(w, n)| (*w, n)).collect();
        outcomes.sort();

        assert_eq!(outcomes, vec![(0, 1), (2, 2)]);
    }
}
