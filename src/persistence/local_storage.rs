//! Browser LocalStorage leaderboard

use super::ScoreStore;
use crate::error::{Error, Result};
use crate::highscores::{HighScoreEntry, HighScores};

const STORAGE_KEY: &str = "space_runner_highscores";

fn storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| Error::StorageUnavailable("LocalStorage".to_string()))
}

/// Leaderboard cached in memory and written through to LocalStorage
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore {
    scores: HighScores,
}

impl LocalStorageStore {
    /// Load the stored leaderboard; unreadable data starts fresh
    pub fn load() -> Self {
        let scores = storage()
            .ok()
            .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
            .and_then(|json| match HighScores::from_json(&json) {
                Ok(scores) => Some(scores),
                Err(e) => {
                    log::warn!("Discarding stored high scores: {}", e);
                    None
                }
            });
        match scores {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                Self { scores }
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::default()
            }
        }
    }

    fn save(&self) -> Result<()> {
        let json = self.scores.to_json()?;
        storage()?
            .set_item(STORAGE_KEY, &json)
            .map_err(|_| Error::StorageUnavailable("LocalStorage write".to_string()))?;
        log::info!("High scores saved ({} entries)", self.scores.entries.len());
        Ok(())
    }
}

impl ScoreStore for LocalStorageStore {
    fn high_score(&self) -> Result<Option<HighScoreEntry>> {
        Ok(self.scores.top().cloned())
    }

    fn record(&mut self, entry: HighScoreEntry) -> Result<Option<usize>> {
        let rank = self.scores.add_score(entry);
        if rank.is_some() {
            self.save()?;
        }
        Ok(rank)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreEntry>> {
        Ok(self.scores.leaderboard(limit).to_vec())
    }
}
