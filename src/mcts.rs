use crate::board::Board;
use crate::config::SearchConfig;
use crate::mcts_node::MctsNode;
use crate::path::Path;
use crate::policy::{SelectionPolicy, Uct};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::tree::{SearchTree, TreeStats};
use ego_tree::NodeId;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// The node type of the tree searched for a given board.
pub type NodeOf<B> = MctsNode<<B as Board>::Move, <B as Board>::Player>;
/// The tree type searched for a given board.
pub type TreeOf<B> = SearchTree<<B as Board>::Move, <B as Board>::Player>;

/// Errors raised when the search or its caller breaks the make/unmake contract.
///
/// Whenever one of them is returned from an iteration, the moves already played on the
/// board during that iteration have been undone.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("The current root has no parent to roll back to")]
    NoParent,

    #[error("Transition {0} does not lead to the current root")]
    TransitionMismatch(String),

    #[error("Expansion reached a position without possible transitions")]
    NoPossibleTransitions,

    #[error("Simulation reached an unfinished position without possible transitions")]
    NoSimulationMove,

    #[error("Board state was not restored after the search")]
    UnbalancedTransitions,

    #[error("Node {0:?} is not part of the search tree")]
    MissingNode(NodeId),
}

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It owns the board and mutates it in place: every iteration plays moves down the tree
/// and undoes them before returning, so between calls the board always stands at the
/// position of the current root.
pub struct MonteCarloTreeSearch<B: Board, K: RandomGenerator = StandardRandomGenerator, S = Uct>
{
    board: B,
    tree: TreeOf<B>,
    random: K,
    policy: S,
    config: SearchConfig,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<B: Board, K: RandomGenerator, S> {
    board: B,
    random_generator: K,
    selection_policy: S,
    config: SearchConfig,
}

impl<B: Board> MonteCarloTreeSearchBuilder<B, StandardRandomGenerator, Uct> {
    /// Creates a new builder with the given initial board state.
    pub fn new(board: B) -> Self {
        Self {
            board,
            random_generator: StandardRandomGenerator,
            selection_policy: Uct::default(),
            config: SearchConfig::default(),
        }
    }
}

impl<B, K, S> MonteCarloTreeSearchBuilder<B, K, S>
where
    B: Board,
    K: RandomGenerator,
    S: SelectionPolicy<B>,
{
    /// Sets the random number generator used for expansion and playouts.
    pub fn with_random_generator<R: RandomGenerator>(
        self,
        rg: R,
    ) -> MonteCarloTreeSearchBuilder<B, R, S> {
        MonteCarloTreeSearchBuilder {
            board: self.board,
            random_generator: rg,
            selection_policy: self.selection_policy,
            config: self.config,
        }
    }

    /// Replaces the UCT selection policy.
    pub fn with_selection_policy<T: SelectionPolicy<B>>(
        self,
        policy: T,
    ) -> MonteCarloTreeSearchBuilder<B, K, T> {
        MonteCarloTreeSearchBuilder {
            board: self.board,
            random_generator: self.random_generator,
            selection_policy: policy,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of iterations per call to `get_best_transition`.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.config = self.config.with_iterations(n);
        self
    }

    /// Sets a wall-clock budget per call to `get_best_transition`.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.config = self.config.with_time_budget(budget);
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<B, K, S> {
        MonteCarloTreeSearch::new(
            self.board,
            self.random_generator,
            self.selection_policy,
            self.config,
        )
    }
}

impl<B: Board> MonteCarloTreeSearch<B> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(board: B) -> MonteCarloTreeSearchBuilder<B, StandardRandomGenerator, Uct> {
        MonteCarloTreeSearchBuilder::new(board)
    }

    pub fn from_board(board: B) -> Self {
        MonteCarloTreeSearchBuilder::new(board).build()
    }
}

impl<B, K, S> MonteCarloTreeSearch<B, K, S>
where
    B: Board,
    K: RandomGenerator,
    S: SelectionPolicy<B>,
{
    /// Creates a new `MonteCarloTreeSearch` instance.
    ///
    /// It is recommended to use the builder pattern via `MonteCarloTreeSearch::builder()` instead.
    pub fn new(board: B, random: K, policy: S, config: SearchConfig) -> Self {
        Self {
            board,
            tree: SearchTree::new(),
            random,
            policy,
            config,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn into_board(self) -> B {
        self.board
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn tree(&self) -> &TreeOf<B> {
        &self.tree
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the node the search currently starts from.
    pub fn get_root(&self) -> Option<&NodeOf<B>> {
        self.tree.node(self.tree.root())
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Searches from the current position and returns the best move for the player to move.
    ///
    /// Returns `Ok(None)` when the board offers no move. The board is left at the position
    /// it was in before the call; commit the returned move with [`Self::do_transition`].
    pub fn get_best_transition(&mut self) -> Result<Option<B::Move>, SearchError> {
        if self.board.get_available_moves().is_empty() {
            return Ok(None);
        }

        let player = self.board.get_current_player();
        let started = Instant::now();
        let mut iterations = 0;
        while !self.config.is_exhausted(iterations, started.elapsed()) {
            if self.do_iteration()?.is_none() {
                break;
            }
            iterations += 1;
        }

        if self.board.get_current_player() != player {
            return Err(SearchError::UnbalancedTransitions);
        }

        let best = self.best_transition();
        debug!(
            iterations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            best = ?best,
            "search finished"
        );
        Ok(best)
    }

    /// Picks the best move among the children of the current root without searching.
    /// Ties go to the child created first.
    pub fn best_transition(&self) -> Option<B::Move> {
        let player = self.board.get_current_player();
        self.policy.best_move(&self.tree, self.tree.root(), &player)
    }

    /// Performs one full iteration of the algorithm (Selection, Expansion, Simulation,
    /// Backpropagation) and returns the winner of its playout.
    ///
    /// Returns `Ok(None)` when nothing under the current root is left to explore.
    pub fn do_iteration(&mut self) -> Result<Option<B::Player>, SearchError> {
        let Some(mut path) = self.select()? else {
            return Ok(None);
        };

        if let Err(err) = self.expand(&mut path) {
            self.rewind(&path);
            return Err(err);
        }

        let winner = match self.simulate() {
            Ok(winner) => winner,
            Err(err) => {
                self.rewind(&path);
                return Err(err);
            }
        };

        trace!(path = %path, winner = ?winner, "iteration complete");
        self.backpropagate(&path, &winner);
        Ok(Some(winner))
    }

    /// Runs up to `n` iterations and returns how many completed.
    pub fn iterate_n_times(&mut self, n: u32) -> Result<u32, SearchError> {
        let mut iteration = 0;
        while iteration < n {
            if self.do_iteration()?.is_none() {
                break;
            }
            iteration += 1;
        }
        Ok(iteration)
    }

    /// Plays `b_move` on the board for good and moves the root to the matching child,
    /// keeping the statistics gathered below it.
    ///
    /// A legal move the search never expanded is accepted: the root's children are created
    /// first. An illegal move is rejected and the board is left untouched.
    pub fn do_transition(&mut self, b_move: &B::Move) -> Result<(), SearchError> {
        let root = self.tree.root();
        let child = match self.tree.child(root, b_move) {
            Some(child) => child,
            None => {
                let moves = self.board.get_available_moves();
                if !moves.contains(b_move) {
                    return Err(SearchError::IllegalTransition(format!("{:?}", b_move)));
                }
                self.materialize_children(root, &moves)?;
                self.tree
                    .child(root, b_move)
                    .ok_or(SearchError::MissingNode(root))?
            }
        };

        self.board.perform_move(b_move);
        self.tree.set_root(child);
        debug!(
            transition = ?b_move,
            simulations = self.get_root().map_or(0, |root| root.simulations()),
            "root advanced"
        );
        Ok(())
    }

    /// Takes back `b_move` on the board and moves the root back to its parent.
    ///
    /// Fails without touching the board when the root has no parent (a fresh root, or
    /// after [`Self::simplify_tree`]) or when `b_move` is not the move that led to it.
    pub fn undo_transition(&mut self, b_move: &B::Move) -> Result<(), SearchError> {
        let root = self.tree.root();
        let parent = self.tree.parent(root).ok_or(SearchError::NoParent)?;
        let leads_to_root = self
            .tree
            .node(root)
            .and_then(|node| node.prev_move())
            .is_some_and(|prev_move| prev_move == b_move);
        if !leads_to_root {
            return Err(SearchError::TransitionMismatch(format!("{:?}", b_move)));
        }

        self.board.undo_move(b_move);
        self.tree.set_root(parent);
        debug!(transition = ?b_move, "root rolled back");
        Ok(())
    }

    /// Frees every node that is not below the current root. Rolling back past the
    /// current root is impossible afterwards.
    pub fn simplify_tree(&mut self) {
        let before = self.tree.stats().arena_nodes;
        self.tree.compact();
        debug!(before, after = self.tree.stats().arena_nodes, "tree simplified");
    }

    /// Throws the tree away and starts again from the current position.
    pub fn reset(&mut self) {
        self.tree = SearchTree::new();
    }

    /// Walks down from the root until a leaf is reached, playing every move on the board.
    /// A node whose children are all terminal becomes terminal itself and the walk steps
    /// back to its parent. Below such a node the walk follows the best known move.
    /// Returns `None` once the root itself has nothing left to explore.
    fn select(&mut self) -> Result<Option<Path<B::Move>>, SearchError> {
        let root = self.tree.root();
        let exhausted = self
            .tree
            .node(root)
            .ok_or(SearchError::MissingNode(root))?
            .is_terminal();
        if exhausted && !self.tree.is_leaf(root) {
            return Ok(None);
        }

        let mut path = Path::new(root);
        let mut node = root;
        while !self.tree.is_leaf(node) {
            let player = self.board.get_current_player();
            let exhausted = self.tree.node(node).is_some_and(|data| data.is_terminal());
            let choice = if exhausted {
                self.policy.best_move(&self.tree, node, &player)
            } else {
                self.policy.select_move(&self.tree, node, &player)
            };

            match choice {
                None => {
                    self.tree.set_terminal(node, true);
                    match path.pop() {
                        None => return Ok(None),
                        Some((b_move, _)) => self.board.undo_move(&b_move),
                    }
                }
                Some(b_move) => {
                    self.board.perform_move(&b_move);
                    let child = match self.tree.child(node, &b_move) {
                        Some(child) => child,
                        None => {
                            let fresh = self.node_for(b_move.clone());
                            match self.tree.add_child(node, fresh) {
                                Some(child) => child,
                                None => {
                                    self.board.undo_move(&b_move);
                                    self.rewind(&path);
                                    return Err(SearchError::MissingNode(node));
                                }
                            }
                        }
                    };
                    path.expand(b_move, child);
                }
            }
            node = path.end_node();
        }
        Ok(Some(path))
    }

    /// Creates every missing child of the leaf, then plays the move chosen by the board
    /// and extends the path with it. A terminal leaf is left as it is.
    fn expand(&mut self, path: &mut Path<B::Move>) -> Result<(), SearchError> {
        let leaf = path.end_node();
        let is_terminal = self
            .tree
            .node(leaf)
            .ok_or(SearchError::MissingNode(leaf))?
            .is_terminal();
        if is_terminal {
            return Ok(());
        }

        let moves = self.board.get_available_moves();
        if moves.is_empty() {
            return Err(SearchError::NoPossibleTransitions);
        }
        let hero = self
            .board
            .expansion_move(&moves, &mut self.random)
            .ok_or(SearchError::NoPossibleTransitions)?;
        self.materialize_children(leaf, &moves)?;

        self.board.perform_move(&hero);
        match self.tree.child(leaf, &hero) {
            Some(child) => {
                path.expand(hero, child);
                Ok(())
            }
            None => {
                self.board.undo_move(&hero);
                Err(SearchError::MissingNode(leaf))
            }
        }
    }

    /// Plays random moves until the game ends, reads the winner and undoes the playout.
    fn simulate(&mut self) -> Result<B::Player, SearchError> {
        let mut played = Vec::new();
        let mut stuck = false;
        while !self.board.is_over() {
            let moves = self.board.get_available_moves();
            match self.board.simulation_move(&moves, &mut self.random) {
                Some(b_move) => {
                    self.board.perform_move(&b_move);
                    played.push(b_move);
                }
                None => {
                    stuck = true;
                    break;
                }
            }
        }

        let winner = (!stuck).then(|| self.board.get_winner());
        for b_move in played.iter().rev() {
            self.board.undo_move(b_move);
        }
        winner.ok_or(SearchError::NoSimulationMove)
    }

    /// Undoes the path on the board, recording the winner on every node including the root.
    fn backpropagate(&mut self, path: &Path<B::Move>, winner: &B::Player) {
        for (b_move, node) in path.steps().iter().rev() {
            self.board.undo_move(b_move);
            self.tree.record_result(*node, winner.clone());
        }
        self.tree.record_result(path.root_node(), winner.clone());
    }

    fn rewind(&mut self, path: &Path<B::Move>) {
        for (b_move, _) in path.steps().iter().rev() {
            self.board.undo_move(b_move);
        }
    }

    /// Adds a child for every move in `moves` that `node` does not have yet.
    fn materialize_children(&mut self, node: NodeId, moves: &[B::Move]) -> Result<(), SearchError> {
        for b_move in moves {
            if self.tree.child(node, b_move).is_some() {
                continue;
            }
            self.board.perform_move(b_move);
            let fresh = self.node_for(b_move.clone());
            self.board.undo_move(b_move);
            self.tree
                .add_child(node, fresh)
                .ok_or(SearchError::MissingNode(node))?;
        }
        Ok(())
    }

    /// A node for the position the board is currently in, reached by `b_move`.
    fn node_for(&self, b_move: B::Move) -> NodeOf<B> {
        MctsNode::new(b_move, self.board.is_over())
    }
}
