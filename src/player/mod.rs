pub mod ai;
pub mod controller;
pub mod engine;

pub use ai::{AIConfig, LocalSearchAI};
pub use controller::{MoveSelector, PendingPlay};
pub use engine::DelegatedEngineAI;

use crate::core::Color;
use crate::engine::Difficulty;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which strategy plays a side: `local` or `engine:<tier>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Engine(Difficulty),
}

impl Backend {
    /// Needs a tokio runtime for the engine backend.
    pub fn build(self, color: Color, config: &Arc<AIConfig>) -> Box<dyn MoveSelector> {
        match self {
            Backend::Local => Box::new(LocalSearchAI::new(color, config.clone())),
            Backend::Engine(difficulty) => Box::new(DelegatedEngineAI::new(color, difficulty, config)),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Backend::Local);
        }
        match s.split_once(':') {
            Some((kind, tier)) if kind.eq_ignore_ascii_case("engine") => {
                tier.parse().map(Backend::Engine)
            }
            None if s.eq_ignore_ascii_case("engine") => Ok(Backend::Engine(Difficulty::default())),
            _ => Err(format!("unknown backend '{}' (expected local or engine:<tier>)", s)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Backend::Local => f.write_str("local"),
            Backend::Engine(d) => write!(f, "engine:{}", d),
        }
    }
}
