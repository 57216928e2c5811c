pub mod board;
pub mod r#move;
pub mod piece;
pub mod setup;
pub mod types;

pub use board::{BoardError, BoardState};
pub use piece::{MoveStep, Piece, PieceKind};
pub use r#move::{Move, ScoredPlay};
pub use setup::{setup_from_strings, standard_board};
pub use types::{Color, Position};
