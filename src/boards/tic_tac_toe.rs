use crate::board::Board;
use std::fmt::{self, Display};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The players of Tic-Tac-Toe. `Nobody` is reported as the winner of a drawn game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum TTTPlayer {
    X,
    O,
    Nobody,
}

impl TTTPlayer {
    fn opponent(self) -> Self {
        match self {
            TTTPlayer::X => TTTPlayer::O,
            TTTPlayer::O => TTTPlayer::X,
            TTTPlayer::Nobody => TTTPlayer::Nobody,
        }
    }
}

/// An implementation of the `Board` trait for the game of Tic-Tac-Toe.
///
/// The board is represented by a 9-element array, where each element corresponds to a cell.
/// A move is represented by a `u8` from 0 to 8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToeBoard {
    current_player: TTTPlayer,
    field: [Option<TTTPlayer>; 9],
    moves_played: u8,
}

impl Default for TicTacToeBoard {
    /// Creates an empty board with player 'X' starting.
    fn default() -> Self {
        Self {
            current_player: TTTPlayer::X,
            field: [None; 9],
            moves_played: 0,
        }
    }
}

impl TicTacToeBoard {
    /// Plays the given cells in order, starting from an empty board.
    pub fn from_moves(moves: &[u8]) -> Self {
        let mut board = TicTacToeBoard::default();
        for b_move in moves {
            board.perform_move(b_move);
        }
        board
    }

    pub fn cell(&self, index: usize) -> Option<TTTPlayer> {
        self.field.get(index).copied().flatten()
    }

    fn line_winner(&self) -> Option<TTTPlayer> {
        LINES.iter().find_map(|&[a, b, c]| match self.field[a] {
            Some(player) if self.field[b] == Some(player) && self.field[c] == Some(player) => {
                Some(player)
            }
            _ => None,
        })
    }
}

impl Board for TicTacToeBoard {
    type Move = u8;
    type Player = TTTPlayer;

    fn get_current_player(&self) -> TTTPlayer {
        self.current_player
    }

    fn get_available_moves(&self) -> Vec<u8> {
        if self.is_over() {
            return Vec::new();
        }

        self.field
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_none())
            .map(|(i, _)| i as u8)
            .collect()
    }

    fn perform_move(&mut self, b_move: &u8) {
        let cell = &mut self.field[*b_move as usize];
        debug_assert!(cell.is_none(), "cell {} is already taken", b_move);
        *cell = Some(self.current_player);
        self.current_player = self.current_player.opponent();
        self.moves_played += 1;
    }

    fn undo_move(&mut self, b_move: &u8) {
        let cell = &mut self.field[*b_move as usize];
        debug_assert!(cell.is_some(), "cell {} is already free", b_move);
        *cell = None;
        self.current_player = self.current_player.opponent();
        self.moves_played -= 1;
    }

    fn is_over(&self) -> bool {
        self.moves_played == 9 || self.line_winner().is_some()
    }

    fn get_winner(&self) -> TTTPlayer {
        self.line_winner().unwrap_or(TTTPlayer::Nobody)
    }

    /// A draw is worth half a win to both players.
    fn reward(winner: &TTTPlayer, player: &TTTPlayer) -> f64 {
        match winner {
            TTTPlayer::Nobody => 0.5,
            winner if winner == player => 1.0,
            _ => 0.0,
        }
    }
}

impl Display for TicTacToeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.field.chunks(3) {
            for cell in row {
                let mark = match cell {
                    Some(TTTPlayer::X) => 'X',
                    Some(TTTPlayer::O) => 'O',
                    _ => '.',
                };
                write!(f, "{}", mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::boards::tic_tac_toe::{TTTPlayer, TicTacToeBoard};
    use crate::mcts::MonteCarloTreeSearch;
    use crate::random::{CustomNumberGenerator, RandomGenerator, SeededRandomGenerator};
    use crate::runner::{GameRunner, Listener};

    #[test]
    fn detects_winner_and_draw() {
        let won = TicTacToeBoard::from_moves(&[0, 3, 1, 4, 2]);
        assert!(won.is_over());
        assert_eq!(won.get_winner(), TTTPlayer::X);
        assert!(won.get_available_moves().is_empty());

        let drawn = TicTacToeBoard::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(drawn.is_over());
        assert_eq!(drawn.get_winner(), TTTPlayer::Nobody);

        let open = TicTacToeBoard::from_moves(&[4]);
        assert!(!open.is_over());
        assert_eq!(open.get_current_player(), TTTPlayer::O);
        assert_eq!(open.get_available_moves().len(), 8);
    }

    #[test]
    fn undo_restores_board() {
        let mut board = TicTacToeBoard::from_moves(&[4, 0]);
        let before = board.clone();

        board.perform_move(&8);
        board.perform_move(&2);
        board.undo_move(&2);
        board.undo_move(&8);

        assert_eq!(board, before);
    }

    #[test]
    fn test1_search_leaves_board_untouched() {
        // arrange
        let board = TicTacToeBoard::default();
        let mut mcts = MonteCarloTreeSearch::builder(board.clone())
            .with_random_generator(CustomNumberGenerator::default())
            .with_iterations(2000)
            .build();

        // act
        let best = mcts.get_best_transition().unwrap();

        // assert
        assert!(best.is_some());
        assert_eq!(mcts.board(), &board);
        let root = mcts.get_root().unwrap();
        assert_eq!(root.simulations(), 2000);
        let total = root.wins(&TTTPlayer::X) + root.wins(&TTTPlayer::O) + root.wins(&TTTPlayer::Nobody);
        assert_eq!(total, 2000);
        assert_eq!(mcts.tree().children(mcts.tree().root()).count(), 9);
    }

    #[test]
    fn test2_takes_winning_cell() {
        // arrange
        let board = TicTacToeBoard::from_moves(&[0, 3, 1, 4]);
        let mut mcts = MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::default())
            .with_iterations(1000)
            .build();

        // act
        let best = mcts.get_best_transition().unwrap();

        // assert
        assert_eq!(best, Some(2));
    }

    #[test]
    fn test3_beats_random_opponent() {
        // arrange
        let games = 20;
        let mut x_wins = 0;
        let mut o_wins = 0;

        // act
        for game in 0..games {
            let mut opponent = SeededRandomGenerator::new(game);
            let mut mcts = MonteCarloTreeSearch::builder(TicTacToeBoard::default())
                .with_random_generator(SeededRandomGenerator::new(1000 + game))
                .with_iterations(1000)
                .build();

            while !mcts.board().is_over() {
                let b_move = if mcts.board().get_current_player() == TTTPlayer::X {
                    mcts.get_best_transition().unwrap().unwrap()
                } else {
                    let moves = mcts.board().get_available_moves();
                    *opponent.choose(&moves).unwrap()
                };
                mcts.do_transition(&b_move).unwrap();
            }

            match mcts.board().get_winner() {
                TTTPlayer::X => x_wins += 1,
                TTTPlayer::O => o_wins += 1,
                TTTPlayer::Nobody => {}
            }
        }

        // assert
        assert!(x_wins > o_wins, "X won {} games, O won {}", x_wins, o_wins);
    }

    #[derive(Default)]
    struct MoveLog {
        moves: Vec<(u32, TTTPlayer, u8)>,
        finished: bool,
    }

    impl Listener<TicTacToeBoard> for MoveLog {
        fn on_move(&mut self, board: &TicTacToeBoard, b_move: &u8, turn: u32) {
            let player = board.cell(*b_move as usize).unwrap();
            self.moves.push((turn, player, *b_move));
        }

        fn on_game_over(&mut self, _board: &TicTacToeBoard) {
            self.finished = true;
        }
    }

    #[test]
    fn test4_self_play_through_runner_is_a_draw() {
        // arrange
        let mut mcts = MonteCarloTreeSearch::builder(TicTacToeBoard::default())
            .with_random_generator(CustomNumberGenerator::default())
            .with_iterations(3000)
            .build();
        let mut log = MoveLog::default();

        // act
        let turns = GameRunner::run(&mut mcts, &mut log).unwrap();

        // assert
        assert!(log.finished);
        assert_eq!(mcts.board().get_winner(), TTTPlayer::Nobody);
        assert_eq!(turns, 9);
        assert_eq!(log.moves.len(), 9);
        for (index, (turn, player, _)) in log.moves.iter().enumerate() {
            assert_eq!(*turn as usize, index + 1);
            let expected = if index % 2 == 0 { TTTPlayer::X } else { TTTPlayer::O };
            assert_eq!(*player, expected);
        }
        let stats = mcts.stats();
        assert_eq!(stats.arena_nodes, stats.reachable_nodes);
    }

    #[test]
    fn test5_self_play_is_a_draw_for_every_seed() {
        for seed in 0..4 {
            // arrange
            let mut mcts = MonteCarloTreeSearch::builder(TicTacToeBoard::default())
                .with_random_generator(SeededRandomGenerator::new(seed))
                .with_iterations(3000)
                .build();
            let mut moves = Vec::new();

            // act
            while let Some(b_move) = mcts.get_best_transition().unwrap() {
                mcts.do_transition(&b_move).unwrap();
                moves.push(b_move);
            }

            // assert
            assert_eq!(
                mcts.board().get_winner(),
                TTTPlayer::Nobody,
                "seed {} played {:?}",
                seed,
                moves
            );
        }
    }

    #[test]
    fn test6_blocks_opponent_threat() {
        // arrange
        let board = TicTacToeBoard::from_moves(&[0, 4, 1]);
        let mut mcts = MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::default())
            .with_iterations(1000)
            .build();

        // act
        let best = mcts.get_best_transition().unwrap();

        // assert
        assert_eq!(best, Some(2));
    }
}
