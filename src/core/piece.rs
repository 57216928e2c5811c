use super::types::{Color, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 駒の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// 小文字の記号 (FEN / UCI 用)
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Name fragment used when generating piece names ("whiteKnight2").
    pub fn title(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }
}

/// 移動の特性
#[derive(Debug, Clone, Copy)]
pub enum MoveStep {
    Step(i8, i8),  // 指定した相対座標へ1マス移動
    Slide(i8, i8), // 指定した方向へ障害物があるまで移動
}

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// 駒の定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub name: String,
    pub color: Color,
    pub kind: PieceKind,
    pub position: Position,
}

impl Piece {
    pub fn new(name: impl Into<String>, color: Color, kind: PieceKind, position: Position) -> Self {
        Piece {
            name: name.into(),
            color,
            kind,
            position,
        }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// その駒が本来持っている「動きの定義」を返す
    ///
    /// Pawns move and capture differently, so the rules engine handles them
    /// separately and this returns nothing for them.
    pub fn movement_rules(&self) -> Vec<MoveStep> {
        match self.kind {
            PieceKind::King => ORTHOGONAL
                .iter()
                .chain(DIAGONAL.iter())
                .map(|&(df, dr)| MoveStep::Step(df, dr))
                .collect(),
            PieceKind::Queen => ORTHOGONAL
                .iter()
                .chain(DIAGONAL.iter())
                .map(|&(df, dr)| MoveStep::Slide(df, dr))
                .collect(),
            PieceKind::Rook => ORTHOGONAL
                .iter()
                .map(|&(df, dr)| MoveStep::Slide(df, dr))
                .collect(),
            PieceKind::Bishop => DIAGONAL
                .iter()
                .map(|&(df, dr)| MoveStep::Slide(df, dr))
                .collect(),
            PieceKind::Knight => KNIGHT_JUMPS
                .iter()
                .map(|&(df, dr)| MoveStep::Step(df, dr))
                .collect(),
            PieceKind::Pawn => vec![],
        }
    }

    /// FEN letter, uppercase for white.
    pub fn fen_char(&self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.position)
    }
}
