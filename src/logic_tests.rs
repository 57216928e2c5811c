#[cfg(test)]
mod tests {
    use crate::core::{standard_board, BoardState, Color, Piece, PieceKind, Position};
    use crate::logic::{
        is_checkmate, is_in_check, is_king_lost, legal_moves, RulesEngine, SimulationGame,
    };

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

    #[test]
    fn test_opening_move_count() {
        // 20 moves from the standard arrangement: 16 pawn moves + 4 knight moves
        let board = standard_board();
        assert_eq!(legal_moves(&board, Color::White).len(), 20);
        assert_eq!(legal_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn test_pawn_double_step_and_capture() {
        let board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 11),
                ("blackKing", Color::Black, PieceKind::King, 81),
                ("whitePawn5", Color::White, PieceKind::Pawn, 25),
                ("blackKnight1", Color::Black, PieceKind::Knight, 36),
            ],
            Color::White,
        );
        let game = SimulationGame::new(board);
        let mut moves = game.allowed_moves("whitePawn5");
        moves.sort();
        assert_eq!(moves, vec![pos(35), pos(36), pos(45)]);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        // White rook on e2 is pinned against the king on e1 by the black rook on e8
        let board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 15),
                ("whiteRook1", Color::White, PieceKind::Rook, 25),
                ("blackRook1", Color::Black, PieceKind::Rook, 85),
                ("blackKing", Color::Black, PieceKind::King, 81),
            ],
            Color::White,
        );
        let game = SimulationGame::new(board);
        let moves = game.allowed_moves("whiteRook1");
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|p| p.file() == 5));
    }

    #[test]
    fn test_apply_move_enforces_turn_and_legality() {
        let mut game = SimulationGame::new(standard_board());
        assert!(!game.apply_move("blackPawn5", pos(55)));
        assert!(!game.apply_move("whitePawn5", pos(55)));
        assert!(game.apply_move("whitePawn5", pos(45)));
        assert_eq!(game.state().to_move, Color::Black);
        assert_eq!(game.piece_at(pos(45)).unwrap().name, "whitePawn5");
        assert!(game.piece_at(pos(25)).is_none());
    }

    #[test]
    fn test_capture_and_promotion() {
        let board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 11),
                ("blackKing", Color::Black, PieceKind::King, 58),
                ("whitePawn1", Color::White, PieceKind::Pawn, 72),
                ("blackRook1", Color::Black, PieceKind::Rook, 83),
            ],
            Color::White,
        );
        let mut game = SimulationGame::new(board);
        assert!(game.apply_move("whitePawn1", pos(83)));
        let promoted = game.state().piece_by_name("whitePawn1").unwrap();
        assert_eq!(promoted.kind, PieceKind::Queen);
        assert!(game.state().piece_by_name("blackRook1").is_none());
        assert_eq!(game.state().pieces.len(), 3);
    }

    #[test]
    fn test_back_rank_mate_detection() {
        // Black king h8 boxed in by its own pawns, white rook delivers mate on a8
        let board = board_with(
            &[
                ("whiteKing", Color::White, PieceKind::King, 11),
                ("whiteRook1", Color::White, PieceKind::Rook, 81),
                ("blackKing", Color::Black, PieceKind::King, 88),
                ("blackPawn7", Color::Black, PieceKind::Pawn, 77),
                ("blackPawn8", Color::Black, PieceKind::Pawn, 78),
            ],
            Color::Black,
        );
        assert!(is_in_check(&board, Color::Black));
        assert!(is_checkmate(&board, Color::Black));
        assert!(is_king_lost(&board, Color::Black));
        assert!(!is_king_lost(&board, Color::White));

        let game = SimulationGame::new(board);
        assert!(game.is_king_captured(Color::Black));
        assert!(game.is_king_in_check(Color::Black));
    }

    #[test]
    fn test_missing_king_counts_as_captured() {
        let board = board_with(
            &[("whiteKing", Color::White, PieceKind::King, 15)],
            Color::White,
        );
        assert!(is_king_lost(&board, Color::Black));
        assert!(!is_in_check(&board, Color::Black));
    }
}
