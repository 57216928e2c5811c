use super::types::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 指し手 (駒の名前と移動先)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub piece_name: String,
    pub target: Position,
}

impl Move {
    pub fn new(piece_name: impl Into<String>, target: Position) -> Self {
        Move {
            piece_name: piece_name.into(),
            target,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.piece_name, self.target)
    }
}

/// Result of one `play` request.
///
/// `score` is from the AI's point of view. `f64::INFINITY` / `f64::NEG_INFINITY`
/// mark a decided game (opposing / own king lost) rather than a heuristic value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlay {
    #[serde(rename = "move")]
    pub play: Option<Move>,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uci_move: Option<String>,
}

impl ScoredPlay {
    pub fn new(play: Move, score: f64) -> Self {
        ScoredPlay {
            play: Some(play),
            score,
            error: None,
            uci_move: None,
        }
    }

    /// No move, no error. The caller decides what "no move" means.
    pub fn empty(score: f64) -> Self {
        ScoredPlay {
            play: None,
            score,
            error: None,
            uci_move: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ScoredPlay {
            play: None,
            score: 0.0,
            error: Some(error.into()),
            uci_move: None,
        }
    }

    pub fn with_uci_move(mut self, token: impl Into<String>) -> Self {
        self.uci_move = Some(token.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.play.is_none()
    }
}

impl fmt::Display for ScoredPlay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.play, &self.error) {
            (Some(mv), _) => write!(f, "{} (score {})", mv, self.score),
            (None, Some(err)) => write!(f, "no move: {}", err),
            (None, None) => write!(f, "no move (score {})", self.score),
        }
    }
}
