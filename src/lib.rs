//! Monte Carlo tree search over games that are played and taken back in place.
//!
//! The search never clones the game state. It walks its tree by playing moves on the
//! board and undoing them, keeps the tree between turns, and moves its root along as
//! moves are committed or taken back. Children are chosen with UCT.
//!
//! # Example
//!
//! ```rust
//! use mcts_unmake::board::Board;
//! use mcts_unmake::boards::tic_tac_toe::TicTacToeBoard;
//! use mcts_unmake::mcts::MonteCarloTreeSearch;
//! use mcts_unmake::random::CustomNumberGenerator;
//!
//! let mut mcts = MonteCarloTreeSearch::builder(TicTacToeBoard::default())
//!     .with_random_generator(CustomNumberGenerator::default())
//!     .with_iterations(1000)
//!     .build();
//!
//! while !mcts.board().is_over() {
//!     let best_move = mcts.get_best_transition()?.expect("game is not over");
//!     mcts.do_transition(&best_move)?;
//! }
//!
//! println!("{}", mcts.board());
//! # Ok::<(), mcts_unmake::mcts::SearchError>(())
//! ```

/// Contains the `Board` trait, the interface a game implements to be searched.
pub mod board;
/// Contains pre-made implementations of the `Board` trait for common games.
pub mod boards;
/// Contains the limits that stop a search.
pub mod config;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which holds the statistics of a tree node.
pub mod mcts_node;
/// Contains the `Path` walked by a single search iteration.
pub mod path;
/// Contains the selection policies, UCT being the default one.
pub mod policy;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Contains a loop playing a whole game with the search.
pub mod runner;
/// Contains the arena-backed search tree.
pub mod tree;
