use crate::random::RandomGenerator;
use std::fmt::Debug;
use std::hash::Hash;

/// The central trait of the library, defining the interface for a game state.
///
/// The search never clones the board: it walks the tree by calling [`Board::perform_move`]
/// and rewinds by calling [`Board::undo_move`] with the same move, so every implementation
/// must support strictly nested make/unmake pairs of arbitrary depth.
pub trait Board {
    /// The type representing a move in the game. Moves are compared by value to find
    /// the matching child node, so equal moves must lead to the same position.
    type Move: Clone + Eq + Hash + Debug;

    /// The type identifying a player. A draw is expressed by whatever value the game
    /// chooses to return from [`Board::get_winner`]; only [`Board::reward`] gives it meaning.
    type Player: Clone + Eq + Hash + Debug;

    /// What a game won by `winner` is worth to `player`, between `0.0` and `1.0`.
    ///
    /// Defaults to `1.0` for the winner and `0.0` for everybody else. Games with draws
    /// should give the draw value partial credit, otherwise the search cannot tell a
    /// drawn line from a lost one.
    fn reward(winner: &Self::Player, player: &Self::Player) -> f64 {
        if winner == player { 1.0 } else { 0.0 }
    }

    /// Returns the player whose turn it is to make a move.
    fn get_current_player(&self) -> Self::Player;

    /// Returns every legal move from the current position, without duplicates.
    /// Must be empty if and only if [`Board::is_over`] returns true.
    fn get_available_moves(&self) -> Vec<Self::Move>;

    /// Applies a move to the board.
    fn perform_move(&mut self, b_move: &Self::Move);

    /// Rewinds a move. Only ever called with the last move passed to
    /// [`Board::perform_move`] that has not been undone yet.
    fn undo_move(&mut self, b_move: &Self::Move);

    /// Returns true when the game is finished.
    fn is_over(&self) -> bool;

    /// Returns the winner of a finished game. Only called when [`Board::is_over`] is true.
    fn get_winner(&self) -> Self::Player;

    /// Chooses the move kept live after a frontier node has been expanded.
    fn expansion_move<R: RandomGenerator>(
        &self,
        candidates: &[Self::Move],
        random: &mut R,
    ) -> Option<Self::Move> {
        random.choose(candidates).cloned()
    }

    /// Chooses the next move of a playout.
    fn simulation_move<R: RandomGenerator>(
        &self,
        candidates: &[Self::Move],
        random: &mut R,
    ) -> Option<Self::Move> {
        random.choose(candidates).cloned()
    }
}
