//! High score persistence
//!
//! Stores:
//! - `MemoryStore`: process-local, used by tests and as a last resort
//! - `JsonFileStore`: leaderboard file (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//! - `FallbackStore`: primary store with a local fallback on error
//!
//! The game never blocks on persistence: `load_high_score` and
//! `record_result` log failures and carry on.

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::error::Result;
use crate::highscores::{HighScoreEntry, HighScores, MAX_HIGH_SCORES};
use crate::sim::state::GameOverReport;

/// A place high scores are kept
pub trait ScoreStore {
    /// Best recorded run, if any
    fn high_score(&self) -> Result<Option<HighScoreEntry>>;

    /// Record a finished run; returns its leaderboard rank if it placed
    fn record(&mut self, entry: HighScoreEntry) -> Result<Option<usize>>;

    /// Top `limit` runs, highest first
    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreEntry>>;

    /// Would `score` beat the current best
    fn is_new_high_score(&self, score: u64) -> Result<bool> {
        let top = HighScores {
            entries: self.leaderboard(1)?,
        };
        Ok(top.is_new_high_score(score))
    }

    /// Rank `score` would take if recorded now (1-indexed)
    fn potential_rank(&self, score: u64) -> Result<Option<usize>> {
        let board = HighScores {
            entries: self.leaderboard(MAX_HIGH_SCORES)?,
        };
        Ok(board.potential_rank(score))
    }

    /// Record `entry` only if it beats the current best
    fn set_high_score(&mut self, entry: HighScoreEntry) -> Result<bool> {
        if !self.is_new_high_score(entry.score)? {
            return Ok(false);
        }
        self.record(entry)?;
        Ok(true)
    }
}

/// In-memory leaderboard
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: HighScores) -> Self {
        Self { scores }
    }
}

impl ScoreStore for MemoryStore {
    fn high_score(&self) -> Result<Option<HighScoreEntry>> {
        Ok(self.scores.top().cloned())
    }

    fn record(&mut self, entry: HighScoreEntry) -> Result<Option<usize>> {
        Ok(self.scores.add_score(entry))
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreEntry>> {
        Ok(self.scores.leaderboard(limit).to_vec())
    }
}

/// Leaderboard kept in a JSON file, rewritten on every placing run
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    scores: HighScores,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open `path`; a missing file is an empty leaderboard
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        let path = path.into();
        let scores = match std::fs::read_to_string(&path) {
            Ok(json) => HighScores::from_json(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HighScores::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Loaded {} high scores from {}", scores.entries.len(), path.display());
        Ok(Self { path, scores })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.scores.to_json()?)?;
        log::info!("High scores saved ({} entries)", self.scores.entries.len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn high_score(&self) -> Result<Option<HighScoreEntry>> {
        Ok(self.scores.top().cloned())
    }

    fn record(&mut self, entry: HighScoreEntry) -> Result<Option<usize>> {
        let rank = self.scores.add_score(entry);
        if rank.is_some() {
            self.flush()?;
        }
        Ok(rank)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreEntry>> {
        Ok(self.scores.leaderboard(limit).to_vec())
    }
}

/// Tries `primary` first and falls back to `local` when it errors
#[derive(Debug, Clone)]
pub struct FallbackStore<P, L> {
    primary: P,
    local: L,
}

impl<P: ScoreStore, L: ScoreStore> FallbackStore<P, L> {
    pub fn new(primary: P, local: L) -> Self {
        Self { primary, local }
    }

    pub fn local(&self) -> &L {
        &self.local
    }
}

impl<P: ScoreStore, L: ScoreStore> ScoreStore for FallbackStore<P, L> {
    fn high_score(&self) -> Result<Option<HighScoreEntry>> {
        self.primary.high_score().or_else(|e| {
            log::warn!("High score lookup failed, using local store: {}", e);
            self.local.high_score()
        })
    }

    fn record(&mut self, entry: HighScoreEntry) -> Result<Option<usize>> {
        match self.primary.record(entry.clone()) {
            Ok(rank) => Ok(rank),
            Err(e) => {
                log::warn!("Saving score failed, keeping it locally: {}", e);
                self.local.record(entry)
            }
        }
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreEntry>> {
        self.primary.leaderboard(limit).or_else(|e| {
            log::warn!("Leaderboard lookup failed, using local store: {}", e);
            self.local.leaderboard(limit)
        })
    }
}

/// Best known score, 0 when the store is empty or unreachable
pub fn load_high_score(store: &impl ScoreStore) -> u64 {
    match store.high_score() {
        Ok(best) => best.map(|e| e.score).unwrap_or(0),
        Err(e) => {
            log::warn!("Could not load high score: {}", e);
            0
        }
    }
}

/// Save a finished run; failures are logged, never propagated
pub fn record_result(
    store: &mut impl ScoreStore,
    name: &str,
    report: &GameOverReport,
    timestamp: f64,
) -> Option<usize> {
    let entry = HighScoreEntry::new(name, report.final_score, report.level.get(), timestamp);
    match store.record(entry) {
        Ok(Some(rank)) => {
            log::info!("Score {} placed #{} of {}", report.final_score, rank, MAX_HIGH_SCORES);
            Some(rank)
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("Could not record score {}: {}", report.final_score, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sim::state::Level;

    /// Store whose backend is always down
    struct Offline;

    impl ScoreStore for Offline {
        fn high_score(&self) -> Result<Option<HighScoreEntry>> {
            Err(Error::StorageUnavailable("offline".into()))
        }
        fn record(&mut self, _entry: HighScoreEntry) -> Result<Option<usize>> {
            Err(Error::StorageUnavailable("offline".into()))
        }
        fn leaderboard(&self, _limit: usize) -> Result<Vec<HighScoreEntry>> {
            Err(Error::StorageUnavailable("offline".into()))
        }
    }

    fn report(score: u64) -> GameOverReport {
        GameOverReport {
            final_score: score,
            is_new_record: false,
            level: Level::new(2).unwrap(),
        }
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(load_high_score(&store), 0);
        assert_eq!(record_result(&mut store, "Ace", &report(120), 1.0), Some(1));
        assert_eq!(record_result(&mut store, "", &report(80), 2.0), Some(2));
        let best = store.high_score().unwrap().unwrap();
        assert_eq!((best.name.as_str(), best.score, best.level), ("Ace", 120, 2));
        assert_eq!(store.leaderboard(10).unwrap().len(), 2);
        assert_eq!(store.leaderboard(10).unwrap()[1].name, "Player");
    }

    #[test]
    fn test_set_high_score_only_when_better() {
        let mut store = MemoryStore::new();
        assert!(store.set_high_score(HighScoreEntry::new("a", 10, 1, 0.0)).unwrap());
        assert!(!store.set_high_score(HighScoreEntry::new("b", 10, 1, 0.0)).unwrap());
        assert!(store.set_high_score(HighScoreEntry::new("c", 11, 1, 0.0)).unwrap());
        assert_eq!(load_high_score(&store), 11);
    }

    #[test]
    fn test_rank_lookup_before_recording() {
        let mut store = MemoryStore::new();
        assert!(store.is_new_high_score(1).unwrap());
        assert!(!store.is_new_high_score(0).unwrap());
        assert_eq!(store.potential_rank(0).unwrap(), None);

        for (i, score) in (1..=10u64).rev().map(|s| s * 100).enumerate() {
            assert_eq!(store.potential_rank(score).unwrap(), Some(i + 1));
            store.record(HighScoreEntry::new("Ace", score, 1, 0.0)).unwrap();
        }
        assert!(!store.is_new_high_score(1000).unwrap());
        assert!(store.is_new_high_score(1001).unwrap());
        assert_eq!(store.potential_rank(550).unwrap(), Some(6));
        // Full board: must beat the last entry
        assert_eq!(store.potential_rank(100).unwrap(), None);
        assert_eq!(store.potential_rank(101).unwrap(), Some(10));

        // Lookups go through the fallback too
        let fallback = FallbackStore::new(Offline, store);
        assert_eq!(fallback.potential_rank(2000).unwrap(), Some(1));
        assert!(Offline.potential_rank(5).is_err());
    }

    #[test]
    fn test_failures_are_not_fatal() {
        let mut store = Offline;
        assert_eq!(load_high_score(&store), 0);
        assert_eq!(record_result(&mut store, "Ace", &report(50), 0.0), None);
    }

    #[test]
    fn test_fallback_uses_local_on_error() {
        let mut store = FallbackStore::new(Offline, MemoryStore::new());
        assert_eq!(record_result(&mut store, "Ace", &report(70), 0.0), Some(1));
        assert_eq!(load_high_score(&store), 70);
        assert_eq!(store.leaderboard(5).unwrap().len(), 1);
        assert_eq!(store.local().leaderboard(5).unwrap().len(), 1);
    }

    #[test]
    fn test_fallback_prefers_primary() {
        let mut store = FallbackStore::new(MemoryStore::new(), MemoryStore::new());
        record_result(&mut store, "Ace", &report(70), 0.0);
        assert!(store.local().high_score().unwrap().is_none());
        assert_eq!(load_high_score(&store), 70);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store() {
        let path = std::env::temp_dir().join(format!("space_runner_scores_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_high_score(&store), 0);
        record_result(&mut store, "Ace", &report(300), 1.0);
        record_result(&mut store, "Kai", &report(150), 2.0);
        // Zero never places, so nothing is written for it
        assert_eq!(record_result(&mut store, "Zed", &report(0), 3.0), None);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.path(), path.as_path());
        let names: Vec<String> = reopened.leaderboard(10).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["Ace", "Kai"]);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(Error::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}
