use super::protocol::EngineCommand;
use super::EngineError;

use anyhow::Context;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// Line-oriented connection to one engine instance.
pub struct EngineLink {
    commands: mpsc::UnboundedSender<String>,
    replies: mpsc::UnboundedReceiver<String>,
}

/// The engine's side of an in-process link.
pub struct EnginePeer {
    pub commands: mpsc::UnboundedReceiver<String>,
    pub replies: mpsc::UnboundedSender<String>,
}

impl EngineLink {
    /// Connected pair; whatever drives `EnginePeer` plays the engine.
    pub fn in_process() -> (EngineLink, EnginePeer) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        (
            EngineLink {
                commands: cmd_tx,
                replies: reply_rx,
            },
            EnginePeer {
                commands: cmd_rx,
                replies: reply_tx,
            },
        )
    }

    pub fn send(&self, command: &EngineCommand) -> Result<(), EngineError> {
        let line = command.to_string();
        debug!(">> {}", line);
        self.commands
            .send(line)
            .map_err(|_| EngineError::Disconnected)
    }

    /// Next line from the engine; `None` once it is gone.
    pub async fn recv(&mut self) -> Option<String> {
        let line = self.replies.recv().await?;
        debug!("<< {}", line);
        Some(line)
    }
}

/// Produces engine instances for a session.
pub trait EngineConnector: Send + Sync {
    /// Must be called from within a tokio runtime.
    fn connect(&self) -> anyhow::Result<EngineLink>;

    fn describe(&self) -> String;
}

/// Spawns a UCI engine binary and talks to it over stdio.
#[derive(Debug, Clone)]
pub struct ProcessConnector {
    program: String,
    args: Vec<String>,
}

impl ProcessConnector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ProcessConnector {
            program: program.into(),
            args,
        }
    }
}

impl EngineConnector for ProcessConnector {
    fn connect(&self) -> anyhow::Result<EngineLink> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start engine '{}'", self.program))?;

        let mut stdin = child.stdin.take().context("engine stdin unavailable")?;
        let stdout = child.stdout.take().context("engine stdout unavailable")?;

        let (link, peer) = EngineLink::in_process();
        let EnginePeer {
            mut commands,
            replies,
        } = peer;

        // 書き込み側: リンクが閉じたらプロセスの終了を少し待つ
        tokio::spawn(async move {
            while let Some(line) = commands.recv().await {
                let data = line + "\n";
                if stdin.write_all(data.as_bytes()).await.is_err() || stdin.flush().await.is_err() {
                    break;
                }
            }
            drop(stdin);
            let _ = tokio::time::timeout(Duration::from_secs(1), child.wait()).await;
        });

        // 読み込み側
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if replies.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(link)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}
