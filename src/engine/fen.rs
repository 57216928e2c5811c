//! Board ⇄ engine translation.
//!
//! Squares map as `file = code % 10 - 1`, `rank = code / 10 - 1` (both 0..8).
//! Positions are sent as FEN without castling or en passant state; callers
//! that need those should position by move history instead.

use crate::core::{BoardState, Color, Move, Position};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("engine reported no move ({0})")]
    NoMove(String),

    #[error("malformed move token: {0}")]
    Malformed(String),

    #[error("no piece on source square {0}")]
    EmptySource(Position),

    #[error("piece on {square} does not belong to {mover}")]
    WrongSide { square: Position, mover: Color },
}

/// 0-based (file, rank)
pub fn to_coords(pos: Position) -> (u8, u8) {
    (pos.file() - 1, pos.rank() - 1)
}

pub fn from_coords(file: u8, rank: u8) -> Option<Position> {
    Position::new(file.checked_add(1)?, rank.checked_add(1)?)
}

/// 44 -> "d4"
pub fn square_name(pos: Position) -> String {
    pos.to_string()
}

/// "e4" -> 45
pub fn parse_square(name: &str) -> Option<Position> {
    let mut chars = name.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if chars.next().is_some() || !('a'..='h').contains(&file) {
        return None;
    }
    let rank = rank.to_digit(10)? as u8;
    from_coords(file as u8 - b'a', rank.checked_sub(1)?)
}

/// Piece placement field (ranks 8 to 1).
pub fn placement_field(board: &BoardState) -> String {
    let mut grid = [[None::<char>; 8]; 8];
    for piece in &board.pieces {
        let (file, rank) = to_coords(piece.position);
        grid[rank as usize][file as usize] = Some(piece.fen_char());
    }

    let rows: Vec<String> = grid
        .iter()
        .rev()
        .map(|row| {
            let mut out = String::new();
            let mut empty = 0;
            for square in row {
                match square {
                    Some(c) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(*c);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            out
        })
        .collect();

    rows.join("/")
}

/// Full FEN with the side to move taken from the board.
pub fn board_to_fen(board: &BoardState) -> String {
    format!("{} {} - - 0 1", placement_field(board), board.to_move.fen_char())
}

/// Decodes a `bestmove` token against the board the search was asked about.
///
/// Only the first four characters count; a promotion suffix is ignored
/// since the rules engine promotes on its own. The source piece must belong
/// to `mover`.
pub fn decode_best_move(board: &BoardState, mover: Color, token: Option<&str>) -> Result<Move, TranslateError> {
    let token = match token {
        None => return Err(TranslateError::NoMove("missing".to_string())),
        Some(t @ ("(none)" | "0000")) => return Err(TranslateError::NoMove(t.to_string())),
        Some(t) => t,
    };

    let (from, to) = match (token.get(0..2), token.get(2..4)) {
        (Some(from), Some(to)) => (parse_square(from), parse_square(to)),
        _ => (None, None),
    };
    let (Some(from), Some(to)) = (from, to) else {
        return Err(TranslateError::Malformed(token.to_string()));
    };

    let piece = board.piece_at(from).ok_or(TranslateError::EmptySource(from))?;
    if piece.color != mover {
        return Err(TranslateError::WrongSide { square: from, mover });
    }
    Ok(Move::new(piece.name.as_str(), to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{standard_board, Color};

    fn pos(code: u8) -> Position {
        Position::from_code(code).unwrap()
    }

    #[test]
    fn test_coords_round_trip_corners() {
        assert_eq!(to_coords(pos(11)), (0, 0));
        assert_eq!(to_coords(pos(88)), (7, 7));
        assert_eq!(to_coords(pos(45)), (4, 3));
        assert_eq!(from_coords(4, 3), Some(pos(45)));
        assert_eq!(from_coords(8, 0), None);
    }

    #[test]
    fn test_square_names() {
        assert_eq!(square_name(pos(44)), "d4");
        assert_eq!(square_name(pos(81)), "a8");
        assert_eq!(parse_square("e4"), Some(pos(45)));
        assert_eq!(parse_square("h8"), Some(pos(88)));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("a0"), None);
        assert_eq!(parse_square("e"), None);
    }

    #[test]
    fn test_standard_fen() {
        let board = standard_board();
        assert_eq!(placement_field(&board), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
        assert_eq!(
            board_to_fen(&board),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );

        let mut black = board.clone();
        black.to_move = Color::Black;
        assert!(board_to_fen(&black).ends_with(" b - - 0 1"));
    }

    #[test]
    fn test_decode_e2e4() {
        let board = standard_board();
        let mv = decode_best_move(&board, Color::White, Some("e2e4")).unwrap();
        assert_eq!(mv, Move::new("whitePawn5", pos(45)));
    }

    #[test]
    fn test_decode_ignores_promotion_suffix() {
        let board = standard_board();
        let mv = decode_best_move(&board, Color::White, Some("g1f3q")).unwrap();
        assert_eq!(mv, Move::new("whiteKnight2", pos(36)));
    }

    #[test]
    fn test_decode_failures() {
        let board = standard_board();
        assert!(matches!(decode_best_move(&board, Color::White, Some("(none)")), Err(TranslateError::NoMove(_))));
        assert!(matches!(decode_best_move(&board, Color::White, Some("0000")), Err(TranslateError::NoMove(_))));
        assert!(matches!(decode_best_move(&board, Color::White, None), Err(TranslateError::NoMove(_))));
        assert!(matches!(decode_best_move(&board, Color::White, Some("zz99")), Err(TranslateError::Malformed(_))));
        assert!(matches!(decode_best_move(&board, Color::White, Some("e2")), Err(TranslateError::Malformed(_))));
        assert_eq!(
            decode_best_move(&board, Color::White, Some("e4e5")),
            Err(TranslateError::EmptySource(pos(45)))
        );
    }

    #[test]
    fn test_decode_rejects_opponent_piece() {
        let board = standard_board();
        assert_eq!(
            decode_best_move(&board, Color::Black, Some("e2e4")),
            Err(TranslateError::WrongSide {
                square: pos(25),
                mover: Color::Black
            })
        );
        let mv = decode_best_move(&board, Color::Black, Some("e7e5")).unwrap();
        assert_eq!(mv, Move::new("blackPawn5", pos(55)));
    }
}
