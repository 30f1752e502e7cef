use crate::board::Board;
use crate::mcts::{MonteCarloTreeSearch, SearchError};
use crate::policy::SelectionPolicy;
use crate::random::RandomGenerator;
use tracing::{info, warn};

/// Receives the events of a game played by [`GameRunner`].
pub trait Listener<B: Board> {
    /// Called after `b_move` has been committed; `board` already reflects it.
    fn on_move(&mut self, board: &B, b_move: &B::Move, turn: u32);

    fn on_game_over(&mut self, _board: &B) {}

    /// Called when the game is not over but the board offers no move.
    fn on_no_possible_move(&mut self, _board: &B) {}
}

/// Plays a whole game by letting the search choose every move.
pub struct GameRunner;

impl GameRunner {
    /// Asks for the best move and commits it until the game is over. Returns the number
    /// of turns played. Moves are never taken back, so the tree is simplified after every
    /// committed move.
    pub fn run<B, K, S, L>(
        mcts: &mut MonteCarloTreeSearch<B, K, S>,
        listener: &mut L,
    ) -> Result<u32, SearchError>
    where
        B: Board,
        K: RandomGenerator,
        S: SelectionPolicy<B>,
        L: Listener<B>,
    {
        let mut turn = 0;
        while !mcts.board().is_over() {
            let Some(b_move) = mcts.get_best_transition()? else {
                warn!(turn, "no possible move before the end of the game");
                listener.on_no_possible_move(mcts.board());
                return Ok(turn);
            };
            mcts.do_transition(&b_move)?;
            mcts.simplify_tree();
            turn += 1;
            listener.on_move(mcts.board(), &b_move, turn);
        }

        info!(turn, winner = ?mcts.board().get_winner(), "game over");
        listener.on_game_over(mcts.board());
        Ok(turn)
    }
}
