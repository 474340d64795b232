//! Session score table
//!
//! Keeps the best 10 round scores of a session. The headless runner hands it
//! to the driver as its score sink and prints it when the session ends.

use serde::{Deserialize, Serialize};

use crate::platform::ScoreSink;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Round the score was made in (1-based, per session)
    pub round: u32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Rounds submitted so far, qualifying or not
    #[serde(default)]
    pub rounds_played: u32,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-zero and either the table has room or it beats the last entry
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0
            && (self.entries.len() < MAX_HIGH_SCORES
                || self.entries.last().is_some_and(|e| score > e.score))
    }

    /// Insert a score; returns its 1-based rank, or None if it didn't make the table.
    ///
    /// Ties rank behind the earlier round.
    pub fn add_score(&mut self, score: u64, round: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let index = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(index, HighScoreEntry { score, round });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ScoreSink for HighScores {
    fn submit_score(&mut self, score: u64) {
        self.rounds_played += 1;
        if let Some(rank) = self.add_score(score, self.rounds_played) {
            log::info!("New high score #{}: {}", rank, score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
    }

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 1), Some(1));
        assert_eq!(scores.add_score(300, 2), Some(1));
        assert_eq!(scores.add_score(200, 3), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.add_score(i * 10, i as u32);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));
        assert_eq!(scores.add_score(55, 16), None);
    }

    #[test]
    fn test_ties_rank_behind_earlier_round() {
        let mut scores = HighScores::new();
        scores.add_score(80, 1);
        assert_eq!(scores.add_score(80, 2), Some(2));
        let rounds: Vec<u32> = scores.entries.iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![1, 2]);
    }

    #[test]
    fn test_sink_counts_rounds() {
        let mut scores = HighScores::new();
        scores.submit_score(0);
        scores.submit_score(120);
        assert_eq!(scores.rounds_played, 2);
        assert_eq!(
            scores.entries,
            vec![HighScoreEntry { score: 120, round: 2 }]
        );
    }
}
