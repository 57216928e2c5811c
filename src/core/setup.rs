use super::board::{BoardError, BoardState};
use super::piece::{Piece, PieceKind};
use super::types::{Color, Position};
use std::collections::HashMap;

/// 初期配置 (8段目から1段目へ、大文字が白)
pub fn get_standard_setup() -> Vec<&'static str> {
    vec![
        "r n b q k b n r",
        "p p p p p p p p",
        ". . . . . . . .",
        ". . . . . . . .",
        ". . . . . . . .",
        ". . . . . . . .",
        "P P P P P P P P",
        "R N B Q K B N R",
    ]
}

/// 文字列配列から盤面を初期化する
///
/// Rows run from rank 8 down to rank 1, eight whitespace separated tokens
/// each; `.` is an empty square. Pieces are named `<color><Kind><n>`, except
/// that the first king and queen of each color get no number ("whiteKing").
pub fn setup_from_strings(setup: &[&str], to_move: Color) -> Result<BoardState, BoardError> {
    if setup.len() != 8 {
        return Err(BoardError::InvalidSetup {
            row: setup.len(),
            reason: format!("expected 8 rows, got {}", setup.len()),
        });
    }

    let mut board = BoardState::empty(to_move);
    let mut counters: HashMap<(Color, PieceKind), usize> = HashMap::new();

    for (row, line) in setup.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 8 {
            return Err(BoardError::InvalidSetup {
                row,
                reason: format!("expected 8 squares, got {}", tokens.len()),
            });
        }
        let rank = 8 - row as u8;

        for (col, token) in tokens.iter().enumerate() {
            if *token == "." {
                continue;
            }
            let c = token.chars().next().unwrap_or('.');
            let kind = PieceKind::from_letter(c).ok_or_else(|| BoardError::InvalidSetup {
                row,
                reason: format!("unknown piece '{}'", token),
            })?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let Some(position) = Position::new(col as u8 + 1, rank) else {
                continue;
            };

            let count = counters.entry((color, kind)).or_insert(0);
            *count += 1;
            let name = piece_name(color, kind, *count);
            board.place(Piece::new(name, color, kind, position))?;
        }
    }

    Ok(board)
}

pub fn standard_board() -> BoardState {
    // 固定の配置なので失敗しない
    setup_from_strings(&get_standard_setup(), Color::White).unwrap_or_default()
}

fn piece_name(color: Color, kind: PieceKind, index: usize) -> String {
    match kind {
        PieceKind::King | PieceKind::Queen if index == 1 => {
            format!("{}{}", color.as_str(), kind.title())
        }
        _ => format!("{}{}{}", color.as_str(), kind.title(), index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_board_layout() {
        let board = standard_board();
        assert_eq!(board.pieces.len(), 32);
        assert_eq!(board.to_move, Color::White);
        assert!(board.validate().is_ok());

        let king = board.piece_by_name("whiteKing").unwrap();
        assert_eq!(king.position.code(), 15);
        let queen = board.piece_by_name("blackQueen").unwrap();
        assert_eq!(queen.position.code(), 84);
        let e_pawn = board.piece_at(Position::from_code(25).unwrap()).unwrap();
        assert_eq!(e_pawn.kind, PieceKind::Pawn);
        assert_eq!(e_pawn.color, Color::White);
        assert_eq!(e_pawn.name, "whitePawn5");
    }

    #[test]
    fn test_setup_rejects_bad_rows() {
        let short = vec![". . . ."; 8];
        assert!(matches!(
            setup_from_strings(&short, Color::White),
            Err(BoardError::InvalidSetup { row: 0, .. })
        ));

        let mut unknown = vec![". . . . . . . ."; 8];
        unknown[3] = ". . . x . . . .";
        assert!(setup_from_strings(&unknown, Color::White).is_err());
    }
}
