//! High score leaderboard
//!
//! Top 10 runs, highest first. Storage lives in `persistence`.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded when the player left theirs blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Who set it
    pub name: String,
    /// Final score
    pub score: u64,
    /// Level played
    pub level: u8,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Build an entry, substituting the default name for a blank one
    pub fn new(name: &str, score: u64, level: u8, timestamp: f64) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            score,
            level,
            timestamp,
        }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry if it qualifies
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties rank below the earlier run
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Would this score beat the current record
    pub fn is_new_high_score(&self, score: u64) -> bool {
        score > self.top_score().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The record holder
    pub fn top(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.top().map(|e| e.score)
    }

    /// First `limit` entries
    pub fn leaderboard(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.normalize();
        Ok(scores)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Re-sort and trim data written by someone else
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        match days {
            1 => "Yesterday".to_string(),
            2..=6 => format!("{} days ago", days),
            7..=13 => "1 week ago".to_string(),
            _ => format!("{} weeks ago", days / 7),
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry::new(name, score, 1, 0.0)
    }

    #[test]
    fn test_add_score_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(entry("a", 100)), Some(1));
        assert_eq!(scores.add_score(entry("b", 300)), Some(1));
        assert_eq!(scores.add_score(entry("c", 200)), Some(2));
        // Tie goes below the existing run
        assert_eq!(scores.add_score(entry("d", 200)), Some(3));
        let order: Vec<&str> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, ["b", "c", "d", "a"]);
        assert_eq!(scores.top().map(|e| e.name.as_str()), Some("b"));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(entry("a", 0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_full_board() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(entry("p", i * 10));
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.potential_rank(15), Some(10));
        assert_eq!(scores.potential_rank(1000), Some(1));
        assert_eq!(scores.add_score(entry("late", 15)), Some(10));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }

    #[test]
    fn test_new_high_score() {
        let mut scores = HighScores::new();
        assert!(scores.is_new_high_score(1));
        scores.add_score(entry("a", 50));
        assert!(!scores.is_new_high_score(50));
        assert!(scores.is_new_high_score(51));
    }

    #[test]
    fn test_blank_name_defaults() {
        assert_eq!(entry("   ", 5).name, DEFAULT_PLAYER_NAME);
        assert_eq!(entry(" Ace ", 5).name, "Ace");
    }

    #[test]
    fn test_json_normalizes() {
        let json = r#"{"entries":[
            {"name":"low","score":5,"level":1,"timestamp":0.0},
            {"name":"high","score":90,"level":3,"timestamp":0.0}
        ]}"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(scores.top_score(), Some(90));
        assert_eq!(scores.leaderboard(1).len(), 1);
        assert_eq!(scores.leaderboard(50).len(), 2);
        assert!(HighScores::from_json("[").is_err());
    }

    #[test]
    fn test_format_date() {
        let now = 10.0 * 86_400_000.0;
        assert_eq!(format_date(now - 5_000.0, now), "Just now");
        assert_eq!(format_date(now - 60_000.0, now), "1 min ago");
        assert_eq!(format_date(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(format_date(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(format_date(now - 3.0 * 86_400_000.0, now), "3 days ago");
        assert_eq!(format_date(now - 9.0 * 86_400_000.0, now), "1 week ago");
        assert_eq!(format_date(now - 15.0 * 86_400_000.0, now), "2 weeks ago");
    }
}
