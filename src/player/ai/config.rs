use crate::core::PieceKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "ai_config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    pub version: String,
    pub evaluation: EvaluationConfig,
    pub search: SearchConfig,
    pub engine: EngineConfig,
}

/// Material value per piece kind.
///
/// The king's finite value only matters for hanging-piece and ordering
/// comparisons; losing the king is scored with the infinity sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    pub pawn: f64,
    pub knight: f64,
    pub bishop: f64,
    pub rook: f64,
    pub queen: f64,
    pub king: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        EvaluationWeights {
            pawn: 1.0,
            knight: 3.0,
            bishop: 3.0,
            rook: 5.0,
            queen: 9.0,
            king: 2.0,
        }
    }
}

impl EvaluationWeights {
    pub fn value(&self, kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => self.pawn,
            PieceKind::Knight => self.knight,
            PieceKind::Bishop => self.bishop,
            PieceKind::Rook => self.rook,
            PieceKind::Queen => self.queen,
            PieceKind::King => self.king,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub material: EvaluationWeights,
    pub center_multiplier: f64,
    pub wider_center_multiplier: f64,
    pub check_bonus: f64,
    pub checkmate_check_bonus: f64,
    /// Opponent non-king pieces at or below this switch to checkmate hunting.
    pub checkmate_threshold: usize,
    /// Both sides need at least this many non-king pieces for opening terms.
    pub opening_min_pieces: usize,
    pub queen_sortie_penalty: f64,
    pub development_bonus: f64,
    pub opponent_queen_sortie_bonus: f64,
    pub hanging_queen_penalty: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            material: EvaluationWeights::default(),
            center_multiplier: 1.05,
            wider_center_multiplier: 1.02,
            check_bonus: 50.0,
            checkmate_check_bonus: 500.0,
            checkmate_threshold: 5,
            opening_min_pieces: 12,
            queen_sortie_penalty: 30.0,
            development_bonus: 5.0,
            opponent_queen_sortie_bonus: 30.0,
            hanging_queen_penalty: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endgame_pieces: usize,
    pub endgame_depth: u32,
    pub middlegame_pieces: usize,
    pub middlegame_depth: u32,
    pub opening_depth: u32,
    /// Evaluation beyond which a line is used without deeper search.
    pub good_enough: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            endgame_pieces: 16,
            endgame_depth: 4,
            middlegame_pieces: 24,
            middlegame_depth: 3,
            opening_depth: 3,
            good_enough: 50.0,
        }
    }
}

impl SearchConfig {
    /// 駒数に応じた探索深さ
    pub fn depth_for(&self, piece_count: usize) -> u32 {
        if piece_count <= self.endgame_pieces {
            self.endgame_depth
        } else if piece_count <= self.middlegame_pieces {
            self.middlegame_depth
        } else {
            self.opening_depth
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub program: String,
    pub args: Vec<String>,
    pub max_init_attempts: u32,
    pub retry_backoff_ms: u64,
    pub ready_poll_ms: u64,
    pub handshake_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            program: "stockfish".to_string(),
            args: Vec::new(),
            max_init_attempts: 3,
            retry_backoff_ms: 1000,
            ready_poll_ms: 500,
            handshake_timeout_ms: 10_000,
        }
    }
}

impl EngineConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn ready_poll(&self) -> Duration {
        Duration::from_millis(self.ready_poll_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

impl AIConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config: AIConfig = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = EvaluationWeights::default();
        assert_eq!(w.value(PieceKind::Pawn), 1.0);
        assert_eq!(w.value(PieceKind::Knight), 3.0);
        assert_eq!(w.value(PieceKind::Bishop), 3.0);
        assert_eq!(w.value(PieceKind::Rook), 5.0);
        assert_eq!(w.value(PieceKind::Queen), 9.0);
        assert_eq!(w.value(PieceKind::King), 2.0);
    }

    #[test]
    fn test_adaptive_depth_table() {
        let search = SearchConfig::default();
        assert_eq!(search.depth_for(2), 4);
        assert_eq!(search.depth_for(16), 4);
        assert_eq!(search.depth_for(17), 3);
        assert_eq!(search.depth_for(24), 3);
        assert_eq!(search.depth_for(32), 3);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{ "search": { "endgame_depth": 2 }, "engine": { "program": "/opt/sf" } }"#;
        let config: AIConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.search.endgame_depth, 2);
        assert_eq!(config.search.middlegame_depth, 3);
        assert_eq!(config.engine.program, "/opt/sf");
        assert_eq!(config.engine.max_init_attempts, 3);
        assert_eq!(config.evaluation.check_bonus, 50.0);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("ai_config_{}.json", std::process::id()));
        let mut config = AIConfig::default();
        config.engine.retry_backoff_ms = 5;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AIConfig::load_from(&path).unwrap();
        assert_eq!(loaded.engine.retry_backoff(), Duration::from_millis(5));
        std::fs::remove_file(&path).ok();

        assert!(AIConfig::load_from(path.with_extension("missing")).is_err());
    }
}
