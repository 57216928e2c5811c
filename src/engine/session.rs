//! Engine session actor.
//!
//! One task owns the [`EngineLink`] and walks the handshake
//! (`uci` → `uciok` → options → `isready` → `readyok`), retrying with a fixed
//! backoff. Once ready it serves requests from a queue one at a time, so at
//! most one search is ever in flight. State changes are published on a
//! `watch` channel. Shutdown has its own channel so that it also interrupts
//! a running search.

use super::difficulty::StrengthProfile;
use super::fen;
use super::link::{EngineConnector, EngineLink};
use super::protocol::{EngineCommand, EngineReply, EngineScore};
use super::EngineError;
use crate::core::{BoardState, ScoredPlay};
use crate::player::ai::config::EngineConfig;
use crate::player::controller::{PendingPlay, PlayReply};

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    AwaitingHandshakeAck,
    ConfiguringStrength,
    AwaitingReady,
    Ready,
    Searching,
    Failed,
    Closed,
}

impl SessionState {
    /// Accepts search requests (queued while a search runs).
    pub fn is_live(self) -> bool {
        matches!(self, SessionState::Ready | SessionState::Searching)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Closed)
    }
}

enum Request {
    Search {
        position: EngineCommand,
        board: BoardState,
        reply: PlayReply,
    },
    SetProfile(StrengthProfile),
}

/// Cloneable handle for submitting work to the session task.
#[derive(Clone)]
pub struct SessionHandle {
    requests: mpsc::UnboundedSender<Request>,
    close: mpsc::UnboundedSender<()>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Queues a search. The board is the one the reply is decoded against.
    pub fn search(&self, position: EngineCommand, board: BoardState) -> PendingPlay {
        let (reply, pending) = PendingPlay::channel();
        // 送れなければ reply が落ちて PendingPlay 側でエラーになる
        let _ = self.requests.send(Request::Search {
            position,
            board,
            reply,
        });
        pending
    }

    pub fn set_profile(&self, profile: StrengthProfile) {
        let _ = self.requests.send(Request::SetProfile(profile));
    }

    /// Sends `quit` right away, stopping a search in flight.
    pub fn shutdown(&self) {
        let _ = self.close.send(());
    }
}

/// Owner of the session task. Dropping it shuts the engine down.
pub struct EngineSession {
    handle: SessionHandle,
}

impl EngineSession {
    /// Starts the session task. Must be called from within a tokio runtime.
    pub fn spawn(
        connector: Arc<dyn EngineConnector>,
        profile: StrengthProfile,
        config: EngineConfig,
    ) -> Self {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Uninitialized);

        let actor = SessionActor {
            connector,
            profile,
            config,
            requests: req_rx,
            state: state_tx,
        };
        tokio::spawn(actor.run(close_rx));

        EngineSession {
            handle: SessionHandle {
                requests: req_tx,
                close: close_tx,
                state: state_rx,
            },
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn shutdown(&self) {
        self.handle.shutdown();
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

struct SessionActor {
    connector: Arc<dyn EngineConnector>,
    profile: StrengthProfile,
    config: EngineConfig,
    requests: mpsc::UnboundedReceiver<Request>,
    state: watch::Sender<SessionState>,
}

impl SessionActor {
    fn set_state(&self, state: SessionState) {
        debug!("engine session: {:?}", state);
        self.state.send_replace(state);
    }

    async fn run(mut self, mut close: mpsc::UnboundedReceiver<()>) {
        let link = tokio::select! {
            biased;
            _ = close.recv() => {
                self.set_state(SessionState::Closed);
                info!("engine session closed during initialization");
                return;
            }
            link = self.initialize() => link,
        };

        match link {
            Some(link) => self.serve(link, &mut close).await,
            None => {
                self.set_state(SessionState::Failed);
                self.drain_unavailable(&mut close).await;
            }
        }
    }

    fn close(&self, link: &EngineLink) {
        let _ = link.send(&EngineCommand::Quit);
        self.set_state(SessionState::Closed);
        info!("engine session closed");
    }

    async fn initialize(&mut self) -> Option<EngineLink> {
        let attempts = self.config.max_init_attempts.max(1);
        for attempt in 1..=attempts {
            match self.handshake().await {
                Ok(link) => {
                    info!(
                        "engine '{}' ready (skill {}, depth {})",
                        self.connector.describe(),
                        self.profile.skill,
                        self.profile.depth
                    );
                    return Some(link);
                }
                Err(e) => {
                    warn!(
                        "engine initialization attempt {}/{} failed: {}",
                        attempt, attempts, e
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_backoff()).await;
                    }
                }
            }
        }
        error!(
            "engine '{}' unavailable after {} attempts",
            self.connector.describe(),
            attempts
        );
        None
    }

    async fn handshake(&mut self) -> Result<EngineLink, EngineError> {
        self.set_state(SessionState::Loading);
        let mut link = self
            .connector
            .connect()
            .map_err(|e| EngineError::Connect(format!("{:#}", e)))?;

        self.set_state(SessionState::AwaitingHandshakeAck);
        link.send(&EngineCommand::Uci)?;
        self.await_reply(&mut link, EngineReply::UciOk, "uciok").await?;

        self.set_state(SessionState::ConfiguringStrength);
        for command in self.profile.option_commands() {
            link.send(&command)?;
        }
        link.send(&EngineCommand::IsReady)?;

        self.set_state(SessionState::AwaitingReady);
        self.await_reply(&mut link, EngineReply::ReadyOk, "readyok").await?;

        self.set_state(SessionState::Ready);
        Ok(link)
    }

    async fn await_reply(
        &self,
        link: &mut EngineLink,
        wanted: EngineReply,
        label: &'static str,
    ) -> Result<(), EngineError> {
        let wait = async {
            while let Some(line) = link.recv().await {
                if EngineReply::parse(&line) == wanted {
                    return Ok(());
                }
            }
            Err(EngineError::Disconnected)
        };
        tokio::time::timeout(self.config.handshake_timeout(), wait)
            .await
            .map_err(|_| EngineError::Timeout(label))?
    }

    async fn serve(&mut self, mut link: EngineLink, close: &mut mpsc::UnboundedReceiver<()>) {
        loop {
            tokio::select! {
                biased;
                _ = close.recv() => {
                    self.close(&link);
                    return;
                }
                request = self.requests.recv() => match request {
                    Some(Request::Search { position, board, reply }) => {
                        match self.search(&mut link, close, position, &board, reply).await {
                            Ok(()) => {}
                            Err(EngineError::Closed) => {
                                self.close(&link);
                                return;
                            }
                            Err(e) => {
                                error!("engine search failed: {}", e);
                                break;
                            }
                        }
                    }
                    Some(Request::SetProfile(profile)) => {
                        self.profile = profile;
                        info!("engine skill set to {}", profile.skill);
                        let sent = profile
                            .option_commands()
                            .iter()
                            .try_for_each(|command| link.send(command));
                        if sent.is_err() {
                            break;
                        }
                    }
                    None => {
                        self.close(&link);
                        return;
                    }
                },
                line = link.recv() => {
                    if line.is_none() {
                        error!("engine connection lost");
                        break;
                    }
                }
            }
        }

        self.set_state(SessionState::Failed);
        self.drain_unavailable(close).await;
    }

    /// One search. The reply slot is always resolved. `Err(Closed)` means a
    /// shutdown arrived mid-search (the engine has been told to `stop`); any
    /// other `Err` means the link is gone.
    async fn search(
        &mut self,
        link: &mut EngineLink,
        close: &mut mpsc::UnboundedReceiver<()>,
        position: EngineCommand,
        board: &BoardState,
        reply: PlayReply,
    ) -> Result<(), EngineError> {
        self.set_state(SessionState::Searching);

        let sent = link
            .send(&position)
            .and_then(|_| link.send(&EngineCommand::GoDepth(self.profile.depth)));
        if let Err(e) = sent {
            let _ = reply.send(ScoredPlay::failed(e.to_string()));
            return Err(e);
        }

        let mut last_score: Option<EngineScore> = None;
        let best = loop {
            let line = tokio::select! {
                biased;
                _ = close.recv() => {
                    let _ = link.send(&EngineCommand::Stop);
                    let _ = reply.send(ScoredPlay::failed(EngineError::Closed.to_string()));
                    return Err(EngineError::Closed);
                }
                line = link.recv() => line,
            };
            let Some(line) = line else {
                let _ = reply.send(ScoredPlay::failed(EngineError::Disconnected.to_string()));
                return Err(EngineError::Disconnected);
            };
            match EngineReply::parse(&line) {
                EngineReply::BestMove { mv, ponder } => {
                    if let Some(ponder) = ponder {
                        debug!("engine expects {}", ponder);
                    }
                    break mv;
                }
                EngineReply::Info { score: Some(score) } => last_score = Some(score),
                _ => {}
            }
        };

        let score = last_score.map(EngineScore::as_pawns).unwrap_or(0.0);
        let result = match fen::decode_best_move(board, board.to_move, best.as_deref()) {
            Ok(mv) => {
                let token = best.unwrap_or_default();
                info!("engine move {} -> {}", token, mv);
                ScoredPlay::new(mv, score).with_uci_move(token)
            }
            Err(e) => {
                warn!("engine reply not usable: {}", e);
                ScoredPlay::empty(0.0)
            }
        };

        self.set_state(SessionState::Ready);
        let _ = reply.send(result);
        Ok(())
    }

    /// After a permanent failure: answer every queued search with an error.
    async fn drain_unavailable(&mut self, close: &mut mpsc::UnboundedReceiver<()>) {
        loop {
            tokio::select! {
                biased;
                _ = close.recv() => break,
                request = self.requests.recv() => match request {
                    Some(Request::Search { reply, .. }) => {
                        let _ = reply.send(ScoredPlay::failed(EngineError::Unavailable.to_string()));
                    }
                    Some(Request::SetProfile(profile)) => self.profile = profile,
                    None => break,
                },
            }
        }
    }
}
