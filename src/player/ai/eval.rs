//! # Evaluation Module
//!
//! Static evaluation of a `BoardState` from the AI's point of view
//! (positive = good for the AI).
//!
//! ## Scoring Strategy
//! 1. **Terminal**: a lost king short-circuits to `±∞` before anything else.
//! 2. **Material**: signed sum of piece values, scaled up slightly on and
//!    around the centre.
//! 3. **Check**: bonus for checking the opponent, same-size penalty for being
//!    in check. Much larger once the opponent is down to a handful of pieces
//!    (checkmate hunting).
//! 4. **Opening**: discourages early queen sorties and rewards minor piece
//!    development while both sides still have most of their pieces.
//! 5. **Hanging pieces**: AI pieces attacked by a cheaper opponent piece.

use super::config::EvaluationConfig;
use crate::core::{BoardState, Color, Piece, PieceKind, Position};
use crate::logic::{attacks, is_in_check, is_king_lost};

/// Queen home square per color.
fn queen_home(color: Color) -> u8 {
    match color {
        Color::White => 14,
        Color::Black => 84,
    }
}

/// Knight and bishop home squares per color.
fn minor_homes(color: Color, kind: PieceKind) -> &'static [u8] {
    match (color, kind) {
        (Color::White, PieceKind::Knight) => &[12, 17],
        (Color::White, PieceKind::Bishop) => &[13, 16],
        (Color::Black, PieceKind::Knight) => &[82, 87],
        (Color::Black, PieceKind::Bishop) => &[83, 86],
        _ => &[],
    }
}

/// Checkmate hunting kicks in once the opponent is down to few pieces.
pub fn is_checkmate_mode(board: &BoardState, ai: Color, config: &EvaluationConfig) -> bool {
    board.non_king_count(ai.opponent()) <= config.checkmate_threshold
}

/// Evaluates `board` for `ai`.
///
/// Returns `f64::INFINITY` if the opponent's king is gone or mated and
/// `f64::NEG_INFINITY` if the AI's own king is.
pub fn evaluate(board: &BoardState, ai: Color, checkmate_mode: bool, config: &EvaluationConfig) -> f64 {
    let opponent = ai.opponent();

    if is_king_lost(board, opponent) {
        return f64::INFINITY;
    }
    if is_king_lost(board, ai) {
        return f64::NEG_INFINITY;
    }

    let mut total = material(board, ai, config);

    let check_bonus = if checkmate_mode {
        config.checkmate_check_bonus
    } else {
        config.check_bonus
    };
    if is_in_check(board, opponent) {
        total += check_bonus;
    }
    if is_in_check(board, ai) {
        total -= check_bonus;
    }

    if is_opening(board, config) {
        total += opening_adjustment(board, ai, config);
    }

    total - hanging_penalty(board, ai, config)
}

fn material(board: &BoardState, ai: Color, config: &EvaluationConfig) -> f64 {
    board.pieces.iter().fold(0.0, |sum, piece| {
        let mut weight = config.material.value(piece.kind);
        if piece.color != ai {
            weight = -weight;
        }
        if piece.position.is_center() {
            weight *= config.center_multiplier;
        } else if piece.position.is_wider_center() {
            weight *= config.wider_center_multiplier;
        }
        sum + weight
    })
}

fn is_opening(board: &BoardState, config: &EvaluationConfig) -> bool {
    board.non_king_count(Color::White) >= config.opening_min_pieces
        && board.non_king_count(Color::Black) >= config.opening_min_pieces
}

fn opening_adjustment(board: &BoardState, ai: Color, config: &EvaluationConfig) -> f64 {
    let mut adjustment = 0.0;

    for piece in &board.pieces {
        let home = piece.position.code();
        match piece.kind {
            PieceKind::Queen if home != queen_home(piece.color) => {
                if piece.color == ai {
                    adjustment -= config.queen_sortie_penalty;
                } else {
                    adjustment += config.opponent_queen_sortie_bonus;
                }
            }
            PieceKind::Knight | PieceKind::Bishop if piece.color == ai => {
                if !minor_homes(piece.color, piece.kind).contains(&home) {
                    adjustment += config.development_bonus;
                }
            }
            _ => {}
        }
    }

    adjustment
}

/// AI pieces that a cheaper opponent piece can take right now.
pub fn hanging_pieces<'a>(board: &'a BoardState, ai: Color, config: &EvaluationConfig) -> Vec<&'a Piece> {
    board
        .pieces_of(ai)
        .filter(|piece| !piece.is_king())
        .filter(|piece| {
            let value = config.material.value(piece.kind);
            board.pieces_of(ai.opponent()).any(|attacker| {
                config.material.value(attacker.kind) < value
                    && attacks(board, attacker, piece.position)
            })
        })
        .collect()
}

fn hanging_penalty(board: &BoardState, ai: Color, config: &EvaluationConfig) -> f64 {
    hanging_pieces(board, ai, config)
        .into_iter()
        .map(|piece| {
            let mut penalty = 2.0 * config.material.value(piece.kind);
            if piece.kind == PieceKind::Queen {
                penalty += config.hanging_queen_penalty;
            }
            penalty
        })
        .sum()
}

/// Move-ordering weight of a destination square: captured value for
/// captures, nothing otherwise.
pub fn capture_value(board: &BoardState, mover: Color, target: Position, config: &EvaluationConfig) -> Option<f64> {
    board
        .piece_at(target)
        .filter(|victim| victim.color != mover)
        .map(|victim| config.material.value(victim.kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{standard_board, Piece};

    fn pos(code: u8) -> Position {
        Position::from_code(code).unwrap()
    }

    fn board_with(pieces: &[(&str, Color, PieceKind, u8)], to_move: Color) -> BoardState {
        let mut board = BoardState::empty(to_move);
        for &(name, color, kind, code) in pieces {
            board.place(Piece::new(name, color, kind, pos(code))).unwrap();
        }
        board
    }

    /// Black side with `n` non-king pieces (pawns on rank 7, then rank 6).
    fn black_with_pieces(n: usize) -> BoardState {
        let mut board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 11),
                ("whiteRook1", Color::White, PieceKind::Rook, 23),
                ("blackKing", Color::Black, PieceKind::King, 88),
            ],
            Color::Black,
        );
        for i in 0..n {
            let code = if i < 8 { 71 + i as u8 } else { 61 + (i - 8) as u8 };
            board
                .place(Piece::new(
                    format!("blackPawn{}", i + 1),
                    Color::Black,
                    PieceKind::Pawn,
                    pos(code),
                ))
                .unwrap();
        }
        board
    }

    #[test]
    fn test_standard_board_is_balanced() {
        let config = EvaluationConfig::default();
        let board = standard_board();
        let score = evaluate(&board, Color::White, false, &config);
        assert!(score.abs() < 1e-9, "score {}", score);
    }

    #[test]
    fn test_terminal_scores_precede_heuristics() {
        let config = EvaluationConfig::default();
        // Black has no king; White is also hopelessly down material
        let board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 11),
                ("blackQueen", Color::Black, PieceKind::Queen, 12),
                ("blackRook1", Color::Black, PieceKind::Rook, 21),
            ],
            Color::White,
        );
        assert_eq!(evaluate(&board, Color::White, false, &config), f64::INFINITY);
        assert_eq!(evaluate(&board, Color::Black, true, &config), f64::NEG_INFINITY);
    }

    #[test]
    fn test_center_multipliers() {
        let config = EvaluationConfig::default();
        let kings = [
            ("whiteKing", Color::White, PieceKind::King, 11),
            ("blackKing", Color::Black, PieceKind::King, 18),
        ];
        let mut on_center = kings.to_vec();
        on_center.push(("whiteKnight1", Color::White, PieceKind::Knight, 44));
        let mut near_center = kings.to_vec();
        near_center.push(("whiteKnight1", Color::White, PieceKind::Knight, 34));

        let a = evaluate(&board_with(&on_center, Color::Black), Color::White, false, &config);
        let b = evaluate(&board_with(&near_center, Color::Black), Color::White, false, &config);
        assert!((a - 3.0 * 1.05).abs() < 1e-9, "a = {}", a);
        assert!((b - 3.0 * 1.02).abs() < 1e-9, "b = {}", b);
    }

    #[test]
    fn test_mode_switch_boundary() {
        let config = EvaluationConfig::default();

        let five = black_with_pieces(5);
        let six = black_with_pieces(6);
        assert!(is_checkmate_mode(&five, Color::White, &config));
        assert!(!is_checkmate_mode(&six, Color::White, &config));

        // Same boards with the white rook giving check along the 8th rank
        let mut five_check = five.clone();
        five_check.pieces[1].position = pos(81);
        let mut six_check = six.clone();
        six_check.pieces[1].position = pos(81);

        let gain5 = evaluate(&five_check, Color::White, true, &config)
            - evaluate(&five, Color::White, true, &config);
        let gain6 = evaluate(&six_check, Color::White, false, &config)
            - evaluate(&six, Color::White, false, &config);
        assert!((gain5 - 500.0).abs() < 1e-9, "gain5 = {}", gain5);
        assert!((gain6 - 50.0).abs() < 1e-9, "gain6 = {}", gain6);
    }

    #[test]
    fn test_hanging_queen_penalty() {
        let config = EvaluationConfig::default();
        let base = [
            ("whiteKing", Color::White, PieceKind::King, 11),
            ("whiteQueen", Color::White, PieceKind::Queen, 63),
            ("blackKing", Color::Black, PieceKind::King, 88),
        ];
        // Black pawn on d7 attacks c6; on h6 it attacks nothing
        let mut attacked = base.to_vec();
        attacked.push(("blackPawn4", Color::Black, PieceKind::Pawn, 74));
        let mut safe = base.to_vec();
        safe.push(("blackPawn4", Color::Black, PieceKind::Pawn, 68));

        let attacked = board_with(&attacked, Color::White);
        let safe = board_with(&safe, Color::White);
        assert_eq!(hanging_pieces(&attacked, Color::White, &config).len(), 1);
        assert!(hanging_pieces(&safe, Color::White, &config).is_empty());

        let diff = evaluate(&safe, Color::White, false, &config)
            - evaluate(&attacked, Color::White, false, &config);
        assert!(diff >= 2.0 * 9.0, "diff = {}", diff);
        assert!((diff - 38.0).abs() < 1e-9, "diff = {}", diff);
    }

    #[test]
    fn test_equal_value_attacker_is_not_hanging() {
        let config = EvaluationConfig::default();
        let board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 11),
                ("whiteKnight1", Color::White, PieceKind::Knight, 44),
                ("blackBishop1", Color::Black, PieceKind::Bishop, 66),
                ("blackKing", Color::Black, PieceKind::King, 88),
            ],
            Color::White,
        );
        assert!(hanging_pieces(&board, Color::White, &config).is_empty());
    }

    #[test]
    fn test_opening_queen_sortie() {
        let config = EvaluationConfig::default();
        let board = standard_board();
        let base = evaluate(&board, Color::White, false, &config);

        let mut sortie = board.clone();
        let queen = sortie
            .pieces
            .iter_mut()
            .find(|p| p.name == "whiteQueen")
            .unwrap();
        queen.position = pos(48);
        let moved = evaluate(&sortie, Color::White, false, &config);
        assert!((base - moved - 30.0).abs() < 1e-9, "{} vs {}", base, moved);

        // The same sortie seen from Black's side is a bonus
        let from_black = evaluate(&sortie, Color::Black, false, &config);
        assert!((from_black - 30.0).abs() < 1e-9, "{}", from_black);
    }

    #[test]
    fn test_opening_development_bonus() {
        let config = EvaluationConfig::default();
        let mut board = standard_board();
        let knight = board
            .pieces
            .iter_mut()
            .find(|p| p.name == "whiteKnight2")
            .unwrap();
        knight.position = pos(36);
        let score = evaluate(&board, Color::White, false, &config);
        assert!((score - 5.0).abs() < 1e-9, "score {}", score);
    }
}
