//! High score persistence
//!
//! The simulation core only talks to [`HighScoreStore`]; what backs it is
//! the frontend's choice. [`FileStore`] keeps a tiny JSON record on disk
//! and treats every I/O or parse failure as "no record yet" so a corrupt
//! or missing file can never take the game down. [`MemoryStore`] backs
//! tests and headless runs.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistence seam between the simulation and the platform.
pub trait HighScoreStore {
    /// Best recorded score, or 0 when no record exists
    fn load(&mut self) -> u64;
    /// Record a new best score. Must not fail loudly; persistence is
    /// best-effort and the in-memory score stays authoritative.
    fn save(&mut self, score: u64);
}

#[derive(Debug, Serialize, Deserialize)]
struct ScoreRecord {
    high_score: u64,
}

/// JSON file-backed store, one record per file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> u64 {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return 0;
        };
        match serde_json::from_str::<ScoreRecord>(&raw) {
            Ok(record) => record.high_score,
            Err(err) => {
                log::warn!("unreadable high score file {:?}: {err}", self.path);
                0
            }
        }
    }

    fn save(&mut self, score: u64) {
        let record = ScoreRecord { high_score: score };
        let json = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not serialize high score: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            log::warn!("could not write high score to {:?}: {err}", self.path);
        }
    }
}

/// In-memory store for tests and headless demo runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    score: Option<u64>,
}

impl MemoryStore {
    /// Last score passed to `save`, if any
    pub fn saved(&self) -> Option<u64> {
        self.score
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> u64 {
        self.score.unwrap_or(0)
    }

    fn save(&mut self, score: u64) {
        self.score = Some(score);
    }
}
