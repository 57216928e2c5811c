//! External UCI engine bridge: wire protocol, board translation, strength
//! profiles, transport and the session state machine.

pub mod difficulty;
pub mod fen;
pub mod link;
pub mod protocol;
pub mod session;

pub use difficulty::{Difficulty, StrengthProfile};
pub use link::{EngineConnector, EngineLink, EnginePeer, ProcessConnector};
pub use protocol::{EngineCommand, EngineReply, EngineScore};
pub use session::{EngineSession, SessionState};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("failed to connect to engine: {0}")]
    Connect(String),

    #[error("engine disconnected")]
    Disconnected,

    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("engine unavailable")]
    Unavailable,

    #[error("engine session closed")]
    Closed,
}
