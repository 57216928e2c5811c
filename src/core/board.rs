use super::piece::{Piece, PieceKind};
use super::types::{Color, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Square {position} is occupied by {occupant}")]
    Occupied { position: Position, occupant: String },

    #[error("Duplicate piece name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid setup row {row}: {reason}")]
    InvalidSetup { row: usize, reason: String },
}

/// 盤面 (駒の一覧と手番)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardState {
    pub pieces: Vec<Piece>,
    pub to_move: Color,
}

impl BoardState {
    pub fn new(pieces: Vec<Piece>, to_move: Color) -> Self {
        BoardState { pieces, to_move }
    }

    pub fn empty(to_move: Color) -> Self {
        BoardState {
            pieces: Vec::new(),
            to_move,
        }
    }

    /// Adds a piece, refusing occupied squares and reused names.
    pub fn place(&mut self, piece: Piece) -> Result<(), BoardError> {
        if let Some(occupant) = self.piece_at(piece.position) {
            return Err(BoardError::Occupied {
                position: piece.position,
                occupant: occupant.name.clone(),
            });
        }
        if self.piece_by_name(&piece.name).is_some() {
            return Err(BoardError::DuplicateName { name: piece.name });
        }
        self.pieces.push(piece);
        Ok(())
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.position == pos)
    }

    pub fn piece_by_name(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name == name)
    }

    pub fn find_king(&self, color: Color) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.color == color && p.kind == PieceKind::King)
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.color == color)
    }

    /// 王を除いた駒数
    pub fn non_king_count(&self, color: Color) -> usize {
        self.pieces_of(color).filter(|p| !p.is_king()).count()
    }

    /// Checks the "one piece per square, one name per piece" invariants.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut squares = HashSet::new();
        let mut names = HashSet::new();
        for piece in &self.pieces {
            if !squares.insert(piece.position) {
                let occupant = self
                    .pieces
                    .iter()
                    .find(|p| p.position == piece.position)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                return Err(BoardError::Occupied {
                    position: piece.position,
                    occupant,
                });
            }
            if !names.insert(piece.name.as_str()) {
                return Err(BoardError::DuplicateName {
                    name: piece.name.clone(),
                });
            }
        }
        Ok(())
    }
}
