use crate::core::{BoardState, Color, Move, PieceKind, ScoredPlay};
use crate::engine::fen::square_name;
use crate::logic::{has_legal_move, is_in_check, RulesEngine, SimulationGame};
use crate::player::MoveSelector;

use log::{info, warn};
use std::fmt;

pub const DEFAULT_MAX_PLIES: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate { side: Color },
    /// The selector for `side` came back without a move.
    NoMove { side: Color, error: Option<String> },
    IllegalMove { side: Color, mv: Move },
    MoveLimit,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "Checkmate! {} wins", winner),
            GameOutcome::Stalemate { side } => write!(f, "Stalemate ({} has no move)", side),
            GameOutcome::NoMove { side, error: Some(e) } => {
                write!(f, "{} returned no move: {}", side, e)
            }
            GameOutcome::NoMove { side, error: None } => write!(f, "{} returned no move", side),
            GameOutcome::IllegalMove { side, mv } => write!(f, "{} played an illegal move: {}", side, mv),
            GameOutcome::MoveLimit => f.write_str("Move limit reached"),
        }
    }
}

/// 対局ループ (両者とも MoveSelector)
pub struct Game {
    rules: SimulationGame,
    /// Moves played so far in UCI notation.
    pub history: Vec<String>,
    pub max_plies: usize,
}

impl Game {
    pub fn new(board: BoardState) -> Self {
        Game {
            rules: SimulationGame::new(board),
            history: Vec::new(),
            max_plies: DEFAULT_MAX_PLIES,
        }
    }

    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn board(&self) -> &BoardState {
        self.rules.state()
    }

    pub async fn play<F>(
        &mut self,
        white: &dyn MoveSelector,
        black: &dyn MoveSelector,
        mut on_move: F,
    ) -> GameOutcome
    where
        F: FnMut(&Move, &ScoredPlay),
    {
        loop {
            let board = self.rules.state().clone();
            let side = board.to_move;

            if !has_legal_move(&board, side) {
                return if is_in_check(&board, side) {
                    GameOutcome::Checkmate {
                        winner: side.opponent(),
                    }
                } else {
                    GameOutcome::Stalemate { side }
                };
            }
            if self.history.len() >= self.max_plies {
                return GameOutcome::MoveLimit;
            }

            let selector = match side {
                Color::White => white,
                Color::Black => black,
            };

            let result = selector.play(board.clone()).await;
            let Some(mv) = result.play.clone() else {
                warn!("{} returned no move ({})", selector.name(), result);
                return GameOutcome::NoMove {
                    side,
                    error: result.error,
                };
            };

            let Some(piece) = board.piece_by_name(&mv.piece_name) else {
                return GameOutcome::IllegalMove { side, mv };
            };
            let from = piece.position;
            let was_pawn = piece.kind == PieceKind::Pawn;

            if !self.rules.apply_move(&mv.piece_name, mv.target) {
                warn!("{} attempted illegal move {}", selector.name(), mv);
                return GameOutcome::IllegalMove { side, mv };
            }

            let promoted = was_pawn
                && self
                    .rules
                    .piece_at(mv.target)
                    .is_some_and(|p| p.kind == PieceKind::Queen);
            let mut token = format!("{}{}", square_name(from), square_name(mv.target));
            if promoted {
                token.push('q');
            }
            info!(
                "{:>3}. {} {} ({}) score {}",
                self.history.len() + 1,
                side,
                token,
                mv.piece_name,
                result.score
            );
            self.history.push(token);
            on_move(&mv, &result);
        }
    }
}
