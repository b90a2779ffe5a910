//! Game-over notification and the JSON-lines score log.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::GameState;

/// Final result of a game, emitted once when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOverNotice {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
}

impl GameOverNotice {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score(),
            level: state.level(),
            lines_cleared: state.lines_cleared(),
        }
    }

    pub fn message(&self) -> String {
        format!("Game over! Final score: {}", self.score)
    }
}

#[derive(Debug, Serialize)]
struct ScoreRecord {
    event: &'static str,
    unix_ms: u64,
    #[serde(flatten)]
    notice: GameOverNotice,
}

/// Appends one JSON object per finished game to a file.
///
/// Writes happen on a background task; the game loop only sends.
pub struct ScoreLog {
    tx: mpsc::UnboundedSender<GameOverNotice>,
    task: JoinHandle<()>,
}

impl ScoreLog {
    pub fn spawn(handle: &Handle, path: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = handle.spawn(async move {
            if let Err(e) = write_records(&path, rx).await {
                eprintln!("[Driver] score log disabled: {:#}", e);
            }
        });
        Self { tx, task }
    }

    pub fn record(&self, notice: GameOverNotice) {
        let _ = self.tx.send(notice);
    }

    /// Flush pending records and wait for the writer to finish.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn write_records(path: &Path, mut rx: mpsc::UnboundedReceiver<GameOverNotice>) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("open {}", path.display()))?;

    let mut buf: Vec<u8> = Vec::with_capacity(256);
    while let Some(notice) = rx.recv().await {
        let record = ScoreRecord {
            event: "game_over",
            unix_ms: unix_ms(),
            notice,
        };

        buf.clear();
        serde_json::to_writer(&mut buf, &record)?;
        buf.push(b'\n');
        file.write_all(&buf)
            .await
            .with_context(|| format!("write {}", path.display()))?;
    }

    file.flush().await?;
    Ok(())
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
