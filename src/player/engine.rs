use super::ai::config::{AIConfig, EngineConfig};
use super::controller::{MoveSelector, PendingPlay};
use crate::core::{BoardState, Color, ScoredPlay};
use crate::engine::difficulty::{Difficulty, StrengthProfile, MAX_SKILL};
use crate::engine::fen::board_to_fen;
use crate::engine::link::{EngineConnector, ProcessConnector};
use crate::engine::protocol::EngineCommand;
use crate::engine::session::{EngineSession, SessionState};
use crate::engine::EngineError;

use log::{debug, warn};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Strategy that asks an external UCI engine for the move.
///
/// Construction starts the engine handshake in the background; `play`
/// requests made before it completes wait for it.
pub struct DelegatedEngineAI {
    color: Color,
    name: String,
    difficulty: Difficulty,
    profile: Mutex<StrengthProfile>,
    config: EngineConfig,
    session: EngineSession,
}

impl DelegatedEngineAI {
    /// Engine process from `config.engine`. Must be called inside a tokio runtime.
    pub fn new(color: Color, difficulty: Difficulty, config: &AIConfig) -> Self {
        let connector = ProcessConnector::new(config.engine.program.clone(), config.engine.args.clone());
        Self::with_connector(color, difficulty, config.engine.clone(), Arc::new(connector))
    }

    pub fn with_connector(
        color: Color,
        difficulty: Difficulty,
        config: EngineConfig,
        connector: Arc<dyn EngineConnector>,
    ) -> Self {
        let profile = difficulty.profile();
        let session = EngineSession::spawn(connector, profile, config.clone());
        DelegatedEngineAI {
            color,
            name: format!("DelegatedEngineAI ({}, {})", difficulty, color),
            difficulty,
            profile: Mutex::new(profile),
            config,
            session,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> StrengthProfile {
        match self.profile.lock() {
            Ok(profile) => *profile,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Clamps to 0..=20 and reconfigures the engine; search depth is kept.
    pub fn set_skill_level(&self, level: u8) {
        let mut guard = match self.profile.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let profile = guard.with_skill(level.min(MAX_SKILL));
        *guard = profile;
        self.session.handle().set_profile(profile);
    }

    /// Positions the engine from the game's UCI move list when one is given
    /// (keeps castling and en passant state), otherwise from the board's FEN.
    /// The engine always searches for this AI's color.
    pub fn play_with_history(&self, mut board: BoardState, history: &[String]) -> PendingPlay {
        if board.to_move != self.color {
            debug!(
                "{}: board says {} to move, searching for {}",
                self.name, board.to_move, self.color
            );
            board.to_move = self.color;
        }

        let position = if history.is_empty() {
            EngineCommand::PositionFen(board_to_fen(&board))
        } else {
            EngineCommand::PositionStartpos {
                moves: history.to_vec(),
            }
        };

        let (reply, pending) = PendingPlay::channel();
        let handle = self.session.handle();
        let mut state = handle.subscribe();
        let poll = self.config.ready_poll();
        let name = self.name.clone();

        tokio::spawn(async move {
            loop {
                let current = *state.borrow_and_update();
                match current {
                    s if s.is_live() => {
                        let result = handle.search(position, board).await;
                        let _ = reply.send(result);
                        return;
                    }
                    SessionState::Failed => {
                        warn!("{}: engine unavailable", name);
                        let _ = reply.send(ScoredPlay::failed(EngineError::Unavailable.to_string()));
                        return;
                    }
                    SessionState::Closed => {
                        let _ = reply.send(ScoredPlay::failed(EngineError::Closed.to_string()));
                        return;
                    }
                    _ => {
                        if state.has_changed().is_err() {
                            let _ = reply.send(ScoredPlay::failed(EngineError::Closed.to_string()));
                            return;
                        }
                        debug!("{}: engine not ready ({:?}), waiting", name, current);
                        tokio::time::sleep(poll).await;
                    }
                }
            }
        });

        pending
    }

    /// Sends `quit` and releases the engine. Later plays fail fast.
    pub fn destroy(&self) {
        self.session.shutdown();
    }
}

impl MoveSelector for DelegatedEngineAI {
    fn play(&self, board: BoardState) -> PendingPlay {
        self.play_with_history(board, &[])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Color {
        self.color
    }

    fn release(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.destroy();
        let mut state = self.session.handle().subscribe();
        let limit = self.config.handshake_timeout();
        Box::pin(async move {
            let closed = async {
                loop {
                    let current = *state.borrow_and_update();
                    if current.is_terminal() || state.changed().await.is_err() {
                        return;
                    }
                }
            };
            if tokio::time::timeout(limit, closed).await.is_err() {
                warn!("{}: engine did not close within {:?}", self.name, limit);
            }
        })
    }
}
