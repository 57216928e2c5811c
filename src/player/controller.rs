use crate::core::{BoardState, Color, ScoredPlay};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// 指し手選択の共通trait
///
/// Both strategies hand back a [`PendingPlay`] that resolves exactly once.
/// Failures are folded into the `ScoredPlay` instead of surfacing as errors.
pub trait MoveSelector: Send + Sync {
    fn play(&self, board: BoardState) -> PendingPlay;
    fn name(&self) -> &str;
    fn color(&self) -> Color;

    /// Frees anything held outside the process; resolves once it is gone.
    fn release(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }
}

/// Producer half of a [`PendingPlay`].
pub type PlayReply = oneshot::Sender<ScoredPlay>;

/// One-shot result of a `play` request.
#[must_use = "a PendingPlay does nothing unless awaited or given a callback"]
pub struct PendingPlay {
    rx: oneshot::Receiver<ScoredPlay>,
}

impl PendingPlay {
    pub fn channel() -> (PlayReply, PendingPlay) {
        let (tx, rx) = oneshot::channel();
        (tx, PendingPlay { rx })
    }

    /// Already-resolved result.
    pub fn ready(result: ScoredPlay) -> PendingPlay {
        let (tx, pending) = Self::channel();
        let _ = tx.send(result);
        pending
    }

    /// Callback form: `callback` runs once with the result on the runtime.
    pub fn then_call<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(ScoredPlay) + Send + 'static,
    {
        tokio::spawn(async move {
            let result = self.await;
            callback(result);
        })
    }
}

impl Future for PendingPlay {
    type Output = ScoredPlay;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ScoredPlay> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll(cx).map(|res| {
            res.unwrap_or_else(|_| ScoredPlay::failed("move selector dropped the request"))
        })
    }
}
