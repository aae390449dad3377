//! Leaderboard storage.
//!
//! The game never waits on storage: [`ScoreService`] runs a [`ScoreStore`] on
//! a worker thread, takes requests over one channel and hands replies back
//! over another, which the game drains once per frame.  Store failures are
//! logged on the worker and dropped.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_PLAYER_NAME, NAME_MAX_LEN};

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    /// Normalises the name: trimmed, at most 20 characters, and
    /// `"Anonymous"` when nothing is left.
    pub fn new(name: &str, score: u32) -> Self {
        let name: String = name.trim().chars().take(NAME_MAX_LEN).collect();
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name
        };
        Self { name, score }
    }
}

/// On-disk layout of the leaderboard file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreList {
    #[serde(rename = "scoreList")]
    pub score_list: Vec<ScoreEntry>,
}

impl ScoreList {
    /// Insert keeping the list ordered by descending score; ties keep their
    /// arrival order.
    pub fn insert(&mut self, entry: ScoreEntry) {
        let at = self
            .score_list
            .partition_point(|existing| existing.score >= entry.score);
        self.score_list.insert(at, entry);
    }

    pub fn top(&self) -> u32 {
        self.score_list.first().map_or(0, |entry| entry.score)
    }

    pub fn page(&self, offset: usize, limit: usize) -> Vec<ScoreEntry> {
        self.score_list
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "score file i/o failed: {e}"),
            Self::Json(e) => write!(f, "score file is not valid json: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ── Stores ───────────────────────────────────────────────────────────────────

/// The three leaderboard operations the game needs.
pub trait ScoreStore: Send {
    /// Best score on record, or 0 for an empty board.
    fn high_score(&mut self) -> Result<u32, StoreError>;

    /// Up to `limit` entries starting at `offset`, best first.
    fn high_score_list(&mut self, offset: usize, limit: usize)
        -> Result<Vec<ScoreEntry>, StoreError>;

    fn add_result(&mut self, name: &str, score: u32) -> Result<(), StoreError>;
}

/// Leaderboard that lives and dies with the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    list: ScoreList,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = ScoreEntry>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.list.insert(entry);
        }
        store
    }
}

impl ScoreStore for MemoryStore {
    fn high_score(&mut self) -> Result<u32, StoreError> {
        Ok(self.list.top())
    }

    fn high_score_list(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.list.page(offset, limit))
    }

    fn add_result(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        self.list.insert(ScoreEntry::new(name, score));
        Ok(())
    }
}

/// Leaderboard kept in a JSON file, re-read on every request so several
/// sessions can share it.  A missing file is an empty board.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ScoreList, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ScoreList::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, list: &ScoreList) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(list)?)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn high_score(&mut self) -> Result<u32, StoreError> {
        Ok(self.load()?.top())
    }

    fn high_score_list(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.load()?.page(offset, limit))
    }

    fn add_result(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        let mut list = self.load()?;
        list.insert(ScoreEntry::new(name, score));
        self.save(&list)
    }
}

// ── Background service ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum ScoreRequest {
    HighScore,
    Page { offset: usize, limit: usize },
    Submit { name: String, score: u32 },
}

/// A completed request, delivered on the next [`ScoreService::poll`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoreReply {
    HighScore(u32),
    /// Rows for the page that started at `offset`.
    Page {
        offset: usize,
        entries: Vec<ScoreEntry>,
    },
    Submitted,
}

pub struct ScoreService {
    requests: Option<Sender<ScoreRequest>>,
    replies: Receiver<ScoreReply>,
    worker: Option<JoinHandle<()>>,
}

impl ScoreService {
    pub fn spawn<S: ScoreStore + 'static>(store: S) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let worker = thread::spawn(move || serve(store, request_rx, reply_tx));
        Self {
            requests: Some(request_tx),
            replies: reply_rx,
            worker: Some(worker),
        }
    }

    fn send(&self, request: ScoreRequest) {
        let delivered = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if !delivered {
            warn!("score worker is gone; request dropped");
        }
    }

    pub fn fetch_high_score(&self) {
        self.send(ScoreRequest::HighScore);
    }

    pub fn fetch_page(&self, offset: usize, limit: usize) {
        self.send(ScoreRequest::Page { offset, limit });
    }

    pub fn submit(&self, name: &str, score: u32) {
        debug!(name, score, "submitting result");
        self.send(ScoreRequest::Submit {
            name: name.to_string(),
            score,
        });
    }

    /// Every reply that has arrived since the last call, oldest first.
    pub fn poll(&self) -> Vec<ScoreReply> {
        self.replies.try_iter().collect()
    }

    /// Block for the next reply.  Meant for tests and shutdown paths.
    pub fn wait(&self, timeout: Duration) -> Option<ScoreReply> {
        self.replies.recv_timeout(timeout).ok()
    }
}

impl Drop for ScoreService {
    fn drop(&mut self) {
        // Closing the request channel lets the worker finish the queue and exit.
        drop(self.requests.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("score worker panicked");
            }
        }
    }
}

fn serve<S: ScoreStore>(mut store: S, requests: Receiver<ScoreRequest>, replies: Sender<ScoreReply>) {
    for request in requests {
        let reply = match &request {
            ScoreRequest::HighScore => store.high_score().map(ScoreReply::HighScore),
            ScoreRequest::Page { offset, limit } => store
                .high_score_list(*offset, *limit)
                .map(|entries| ScoreReply::Page {
                    offset: *offset,
                    entries,
                }),
            ScoreRequest::Submit { name, score } => {
                store.add_result(name, *score).map(|()| ScoreReply::Submitted)
            }
        };
        match reply {
            Ok(reply) => {
                // The game may already be shutting down.
                let _ = replies.send(reply);
            }
            Err(e) => warn!(?request, error = %e, "score store request failed"),
        }
    }
}
