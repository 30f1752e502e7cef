extern crate mcts_unmake;

use mcts_unmake::board::Board;
use mcts_unmake::boards::tic_tac_toe::{TTTPlayer, TicTacToeBoard};
use mcts_unmake::mcts::{MonteCarloTreeSearch, SearchError};
use mcts_unmake::random::StandardRandomGenerator;
use mcts_unmake::runner::{GameRunner, Listener};
use tracing_subscriber::EnvFilter;

/// Prints every move and the final board.
struct ConsoleListener;

impl Listener<TicTacToeBoard> for ConsoleListener {
    fn on_move(&mut self, board: &TicTacToeBoard, b_move: &u8, turn: u32) {
        let player = board.cell(*b_move as usize);
        println!("Turn {}: {:?} plays {}", turn, player, b_move);
        println!("{}", board);
    }

    fn on_game_over(&mut self, board: &TicTacToeBoard) {
        match board.get_winner() {
            TTTPlayer::Nobody => println!("Draw"),
            winner => println!("{:?} wins", winner),
        }
    }
}

fn main() -> Result<(), SearchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create a new MCTS search instance
    let mut mcts = MonteCarloTreeSearch::builder(TicTacToeBoard::default())
        .with_random_generator(StandardRandomGenerator)
        .with_iterations(5000)
        .build();

    // Print the chances of the opening moves
    mcts.get_best_transition()?;
    let tree = mcts.tree();
    for child in tree.children(tree.root()) {
        let node = child.value();
        println!(
            "Move: {:?} = {:.2?}% over {} simulations",
            node.prev_move(),
            node.ratio(&TTTPlayer::X) * 100.0,
            node.simulations()
        );
    }

    // Play the whole game, reusing the tree between turns
    let turns = GameRunner::run(&mut mcts, &mut ConsoleListener)?;
    println!("Game finished after {} turns, tree: {:?}", turns, mcts.stats());
    Ok(())
}
