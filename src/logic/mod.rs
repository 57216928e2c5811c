//! Rules-engine collaborator.
//!
//! The move selectors only talk to the rules through [`RulesEngine`]. The
//! free functions below are the pure board queries behind [`SimulationGame`],
//! the in-process implementation used for search scratch state and tests.
//! Castling, en passant and the fifty-move rule are not modelled.

use crate::core::{BoardState, Color, Move, MoveStep, Piece, PieceKind, Position};

/// Interface the AI consumes from the rules engine.
pub trait RulesEngine {
    /// Reinitialise the working state (pieces and side to move).
    fn reset_to(&mut self, board: &BoardState);

    /// Legal destinations for a piece of the side to move, already filtered
    /// for king safety.
    fn allowed_moves(&self, piece_name: &str) -> Vec<Position>;

    /// Attempts the move; on success mutates the working state and passes the turn.
    fn apply_move(&mut self, piece_name: &str, target: Position) -> bool;

    fn is_king_in_check(&self, color: Color) -> bool;

    /// True when the king is gone or checkmated.
    fn is_king_captured(&self, color: Color) -> bool;

    fn piece_at(&self, pos: Position) -> Option<&Piece>;

    fn state(&self) -> &BoardState;
}

/// 作業用の盤面
#[derive(Debug, Clone, Default)]
pub struct SimulationGame {
    board: BoardState,
}

impl SimulationGame {
    pub fn new(board: BoardState) -> Self {
        SimulationGame { board }
    }
}

impl RulesEngine for SimulationGame {
    fn reset_to(&mut self, board: &BoardState) {
        self.board.clone_from(board);
    }

    fn allowed_moves(&self, piece_name: &str) -> Vec<Position> {
        match self.board.piece_by_name(piece_name) {
            Some(piece) if piece.color == self.board.to_move => legal_targets(&self.board, piece),
            _ => Vec::new(),
        }
    }

    fn apply_move(&mut self, piece_name: &str, target: Position) -> bool {
        if !self.allowed_moves(piece_name).contains(&target) {
            return false;
        }
        self.board = move_piece(&self.board, piece_name, target);
        true
    }

    fn is_king_in_check(&self, color: Color) -> bool {
        is_in_check(&self.board, color)
    }

    fn is_king_captured(&self, color: Color) -> bool {
        is_king_lost(&self.board, color)
    }

    fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.board.piece_at(pos)
    }

    fn state(&self) -> &BoardState {
        &self.board
    }
}

/// 疑似合法手 (自玉の安全は考慮しない)
pub fn pseudo_targets(board: &BoardState, piece: &Piece) -> Vec<Position> {
    if piece.kind == PieceKind::Pawn {
        return pawn_targets(board, piece);
    }

    let mut targets = Vec::new();
    for step in piece.movement_rules() {
        match step {
            MoveStep::Step(df, dr) => {
                if let Some(to) = piece.position.offset(df, dr) {
                    match board.piece_at(to) {
                        Some(target) if target.color == piece.color => {}
                        _ => targets.push(to),
                    }
                }
            }
            MoveStep::Slide(df, dr) => {
                let mut curr = piece.position;
                while let Some(to) = curr.offset(df, dr) {
                    if let Some(target) = board.piece_at(to) {
                        if target.color != piece.color {
                            targets.push(to);
                        }
                        break;
                    }
                    targets.push(to);
                    curr = to;
                }
            }
        }
    }
    targets
}

fn pawn_targets(board: &BoardState, piece: &Piece) -> Vec<Position> {
    let mut targets = Vec::new();
    let (forward, start_rank) = match piece.color {
        Color::White => (1, 2),
        Color::Black => (-1, 7),
    };

    if let Some(one) = piece.position.offset(0, forward) {
        if board.piece_at(one).is_none() {
            targets.push(one);
            if piece.position.rank() == start_rank {
                if let Some(two) = piece.position.offset(0, forward * 2) {
                    if board.piece_at(two).is_none() {
                        targets.push(two);
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        if let Some(to) = piece.position.offset(df, forward) {
            if let Some(target) = board.piece_at(to) {
                if target.color != piece.color {
                    targets.push(to);
                }
            }
        }
    }
    targets
}

/// `attacker` が `target` の駒を取れるか (手番は問わない)
pub fn attacks(board: &BoardState, attacker: &Piece, target: Position) -> bool {
    pseudo_targets(board, attacker).contains(&target)
}

/// 王手判定。王がいない場合は false。
pub fn is_in_check(board: &BoardState, color: Color) -> bool {
    let Some(king) = board.find_king(color) else {
        return false;
    };
    board
        .pieces_of(color.opponent())
        .any(|p| attacks(board, p, king.position))
}

/// 移動適用 (合法性チェックなし)
///
/// Captures remove the victim, pawns reaching the last rank become queens
/// (keeping their name), and the turn passes to the other side.
pub fn move_piece(board: &BoardState, piece_name: &str, target: Position) -> BoardState {
    let mut next = board.clone();
    let Some(idx) = next.pieces.iter().position(|p| p.name == piece_name) else {
        return next;
    };
    let mover = next.pieces[idx].color;

    if let Some(victim) = next
        .pieces
        .iter()
        .position(|p| p.position == target && p.color != mover)
    {
        next.pieces.remove(victim);
    }

    if let Some(piece) = next.pieces.iter_mut().find(|p| p.name == piece_name) {
        piece.position = target;
        let last_rank = match piece.color {
            Color::White => 8,
            Color::Black => 1,
        };
        if piece.kind == PieceKind::Pawn && target.rank() == last_rank {
            piece.kind = PieceKind::Queen;
        }
    }

    next.to_move = mover.opponent();
    next
}

/// 自殺手を除いた移動先
pub fn legal_targets(board: &BoardState, piece: &Piece) -> Vec<Position> {
    pseudo_targets(board, piece)
        .into_iter()
        .filter(|&to| {
            let next = move_piece(board, &piece.name, to);
            !is_in_check(&next, piece.color)
        })
        .collect()
}

/// 合法手生成
pub fn legal_moves(board: &BoardState, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|piece| {
            legal_targets(board, piece)
                .into_iter()
                .map(move |to| Move::new(piece.name.clone(), to))
        })
        .collect()
}

pub fn has_legal_move(board: &BoardState, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|piece| !legal_targets(board, piece).is_empty())
}

/// 詰み判定
pub fn is_checkmate(board: &BoardState, color: Color) -> bool {
    is_in_check(board, color) && !has_legal_move(board, color)
}

/// King missing, or checkmated with `color` to move.
pub fn is_king_lost(board: &BoardState, color: Color) -> bool {
    if board.find_king(color).is_none() {
        return true;
    }
    board.to_move == color && is_checkmate(board, color)
}
