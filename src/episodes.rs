//! Episode bookkeeping
//!
//! Running return/length statistics plus a best-episodes board that keeps the
//! top 10 returns, persisted as JSON between driver runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::env::StepResult;
use crate::error::StoreError;

/// Maximum number of episodes kept on the board
pub const MAX_BEST_EPISODES: usize = 10;

/// Summary of one finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based episode index within the run
    pub episode: u64,
    /// Seed that reproduces the episode
    pub seed: u64,
    /// Sum of per-tick rewards
    pub total_reward: f64,
    /// Ticks played
    pub length: u64,
    pub score: i64,
    pub escaped_enemies: u32,
    pub friendly_kills: u32,
    pub terminated: bool,
    pub truncated: bool,
}

/// Accumulates one episode's return tick by tick
#[derive(Debug, Clone, Default)]
pub struct EpisodeTracker {
    episode: u64,
    seed: u64,
    total_reward: f64,
    length: u64,
}

impl EpisodeTracker {
    pub fn new(episode: u64, seed: u64) -> Self {
        Self {
            episode,
            seed,
            ..Default::default()
        }
    }

    /// Fold in one step; returns the finished record once the episode ends
    pub fn record(&mut self, result: &StepResult) -> Option<EpisodeRecord> {
        self.total_reward += f64::from(result.reward);
        self.length += 1;

        result.finished().then(|| EpisodeRecord {
            episode: self.episode,
            seed: self.seed,
            total_reward: self.total_reward,
            length: self.length,
            score: result.info.score,
            escaped_enemies: result.info.escaped_enemies,
            friendly_kills: result.info.friendly_kills,
            terminated: result.done,
            truncated: result.truncated,
        })
    }
}

/// Running statistics over finished episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub episodes: u64,
    pub total_reward: f64,
    pub total_length: u64,
    pub best_reward: Option<f64>,
    pub truncations: u64,
}

impl EpisodeStats {
    pub fn push(&mut self, record: &EpisodeRecord) {
        self.episodes += 1;
        self.total_reward += record.total_reward;
        self.total_length += record.length;
        if record.truncated {
            self.truncations += 1;
        }
        self.best_reward = Some(match self.best_reward {
            Some(best) => best.max(record.total_reward),
            None => record.total_reward,
        });
    }

    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }

    pub fn mean_length(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_length as f64 / self.episodes as f64
        }
    }
}

/// Best-episodes board, sorted by return (descending)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestEpisodes {
    pub entries: Vec<EpisodeRecord>,
}

impl BestEpisodes {
    /// Create empty board
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a return qualifies for the board
    pub fn qualifies(&self, total_reward: f64) -> bool {
        if self.entries.len() < MAX_BEST_EPISODES {
            return true;
        }
        // Must beat the lowest entry
        self.entries
            .last()
            .map(|e| total_reward > e.total_reward)
            .unwrap_or(true)
    }

    /// Add a finished episode (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add(&mut self, record: EpisodeRecord) -> Option<usize> {
        if !self.qualifies(record.total_reward) {
            return None;
        }

        // Ties keep the earlier record ahead
        let pos = self
            .entries
            .iter()
            .position(|e| record.total_reward > e.total_reward);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_BEST_EPISODES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best return on the board (if any)
    pub fn top_reward(&self) -> Option<f64> {
        self.entries.first().map(|e| e.total_reward)
    }

    /// Load the board from disk; a missing file is an empty board
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            log::info!("No best-episodes board at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let board: Self = serde_json::from_str(&json).map_err(|e| StoreError::json(path, e))?;
        log::info!("Loaded {} best episodes", board.entries.len());
        Ok(board)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::json(path, e))?;
        fs::write(path, json).map_err(|e| StoreError::io(path, e))?;
        log::info!("Best episodes saved ({} entries)", self.entries.len());
        Ok(())
    }
}
