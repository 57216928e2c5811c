use serde::{Deserialize, Serialize};
use std::fmt;

/// 手番の色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    /// FEN の手番フィールド
    pub fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 盤面座標 (rank * 10 + file, file / rank は 1..=8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

const CENTER: [u8; 4] = [44, 45, 54, 55];
const WIDER_CENTER: [u8; 8] = [34, 35, 43, 46, 53, 56, 64, 65];

impl Position {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Position(rank * 10 + file))
        } else {
            None
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::new(code % 10, code / 10)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn file(self) -> u8 {
        self.0 % 10
    }

    pub fn rank(self) -> u8 {
        self.0 / 10
    }

    pub fn offset(self, dfile: i8, drank: i8) -> Option<Position> {
        let file = self.file() as i8 + dfile;
        let rank = self.rank() as i8 + drank;
        if file < 1 || rank < 1 {
            return None;
        }
        Position::new(file as u8, rank as u8)
    }

    /// d4 e4 d5 e5
    pub fn is_center(self) -> bool {
        CENTER.contains(&self.0)
    }

    /// Squares orthogonally adjacent to the central block.
    pub fn is_wider_center(self) -> bool {
        WIDER_CENTER.contains(&self.0)
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Position::from_code(code).ok_or_else(|| format!("invalid position code {}", code))
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> u8 {
        pos.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let file = (b'a' + self.file() - 1) as char;
        write!(f, "{}{}", file, self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 1).is_none());
        assert!(Position::new(9, 1).is_none());
        assert!(Position::new(1, 9).is_none());
        assert_eq!(Position::new(5, 2).map(Position::code), Some(25));
        assert!(Position::from_code(19).is_none());
        assert!(Position::from_code(90).is_none());
        assert!(Position::from_code(88).is_some());
    }

    #[test]
    fn test_position_offset_and_display() {
        let e2 = Position::from_code(25).unwrap();
        assert_eq!(e2.to_string(), "e2");
        assert_eq!(e2.offset(0, 2).unwrap().to_string(), "e4");
        assert!(e2.offset(0, -2).is_none());
        assert!(Position::from_code(18).unwrap().offset(1, 0).is_none());
    }

    #[test]
    fn test_center_rings_are_disjoint() {
        let all: Vec<Position> = (11..=88).filter_map(Position::from_code).collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all.iter().filter(|p| p.is_center()).count(), 4);
        assert_eq!(all.iter().filter(|p| p.is_wider_center()).count(), 8);
        assert!(!all.iter().any(|p| p.is_center() && p.is_wider_center()));
    }

    #[test]
    fn test_position_serializes_as_code() {
        let pos = Position::from_code(44).unwrap();
        assert_eq!(serde_json::to_string(&pos).unwrap(), "44");
        let back: Position = serde_json::from_str("44").unwrap();
        assert_eq!(back, pos);
        assert!(serde_json::from_str::<Position>("99").is_err());
    }
}
