//! In-memory leaderboard

use super::port::{LeaderboardQuery, PortError, ScoreSubmissionPort};
use super::submission::{
    now_millis, HealthStatus, LeaderboardEntry, LevelStats, PlayerStats, ScoreSubmission, SubmissionReceipt,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Leaderboard kept in memory with the same ranking rules as the backend
#[derive(Debug, Clone, Default)]
pub struct LocalLeaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: Option<usize>,
}

fn by_rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score.cmp(&a.score).then_with(|| b.timestamp.cmp(&a.timestamp))
}

impl LocalLeaderboard {
    /// Unbounded leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaderboard keeping only the best `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity: Some(capacity) }
    }

    /// Record a run without producing a receipt
    ///
    /// Returns false when a bounded board had no room for `entry`.
    pub fn record(&mut self, entry: LeaderboardEntry) -> bool {
        let Some(capacity) = self.capacity else {
            self.entries.push(entry);
            return true;
        };

        let twins = |entries: &[LeaderboardEntry]| entries.iter().filter(|other| **other == entry).count();
        let before = twins(&self.entries);
        self.entries.push(entry.clone());
        self.entries.sort_by(by_rank);
        self.entries.truncate(capacity);
        twins(&self.entries) > before
    }

    /// Rank `score` would have on its level and mode
    pub fn rank_of(&self, entry: &LeaderboardEntry) -> u32 {
        let higher = self
            .entries
            .iter()
            .filter(|other| {
                other.level == entry.level && other.game_mode == entry.game_mode && other.score > entry.score
            })
            .count();
        u32::try_from(higher).map_or(u32::MAX, |higher| higher.saturating_add(1))
    }

    /// All stored rows, unordered
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScoreSubmissionPort for LocalLeaderboard {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<SubmissionReceipt, PortError> {
        submission.validate()?;

        let entry = LeaderboardEntry::from(submission);
        if !self.record(entry.clone()) {
            let capacity = self.capacity.unwrap_or_default();
            log::debug!("Score {} for '{}' missed the top {}", entry.score, entry.player_name, capacity);
            return Err(PortError::Discarded { score: entry.score, capacity });
        }
        let rank = self.rank_of(&entry);
        log::debug!("Recorded {} for '{}' on level {} (rank {})", entry.score, entry.player_name, entry.level, rank);

        Ok(SubmissionReceipt { entry, rank: Some(rank), offline: false })
    }

    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<LeaderboardEntry>, PortError> {
        let mut rows: Vec<_> = self.entries.iter().filter(|entry| query.matches(entry)).cloned().collect();
        rows.sort_by(by_rank);
        rows.truncate(query.limit);
        Ok(rows)
    }

    fn player_stats(&self, player_name: &str) -> Result<PlayerStats, PortError> {
        let mut per_level: BTreeMap<u32, (u64, u32, u64)> = BTreeMap::new();
        for entry in self.entries.iter().filter(|entry| entry.player_name == player_name) {
            let (best, games, total) = per_level.entry(entry.level).or_default();
            *best = (*best).max(entry.score);
            *games += 1;
            *total += entry.score;
        }

        let level_stats = per_level
            .into_iter()
            .map(|(level, (best_score, total_games, total))| LevelStats {
                level,
                best_score,
                total_games,
                average_score: total as f64 / f64::from(total_games),
            })
            .collect();

        Ok(PlayerStats { player_name: player_name.to_string(), level_stats })
    }

    fn health(&self) -> Result<HealthStatus, PortError> {
        Ok(HealthStatus { status: "OK".to_string(), timestamp: now_millis() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::submission::GameMode;
    use approx::assert_relative_eq;

    fn run(name: &str, score: u64, level: u32, timestamp: u64) -> ScoreSubmission {
        ScoreSubmission::new(name, score, level, GameMode::Normal).at(timestamp)
    }

    #[test]
    fn test_rank_counts_strictly_higher_on_same_level_and_mode() {
        let mut board = LocalLeaderboard::new();
        board.submit(&run("A", 500, 1, 1)).unwrap();
        board.submit(&run("B", 300, 1, 2)).unwrap();
        board.submit(&run("C", 900, 2, 3)).unwrap();
        board.submit(&ScoreSubmission::new("D", 999, 1, GameMode::Hard).at(4)).unwrap();

        assert_eq!(board.submit(&run("E", 300, 1, 5)).unwrap().rank, Some(2));
        assert_eq!(board.submit(&run("F", 600, 1, 6)).unwrap().rank, Some(1));
    }

    #[test]
    fn test_top_sorts_by_score_then_recency() {
        let mut board = LocalLeaderboard::new();
        board.submit(&run("Old", 100, 1, 1)).unwrap();
        board.submit(&run("New", 100, 1, 9)).unwrap();
        board.submit(&run("Best", 250, 2, 5)).unwrap();

        let names: Vec<_> = board.top(&LeaderboardQuery::top(10)).unwrap().into_iter().map(|e| e.player_name).collect();
        assert_eq!(names, ["Best", "New", "Old"]);

        let level_one = board.top(&LeaderboardQuery::top(1).level(1)).unwrap();
        assert_eq!(level_one.len(), 1);
        assert_eq!(level_one[0].player_name, "New");
    }

    #[test]
    fn test_player_stats_grouped_by_level() {
        let mut board = LocalLeaderboard::new();
        board.submit(&run("Nova", 100, 2, 1)).unwrap();
        board.submit(&run("Nova", 300, 2, 2)).unwrap();
        board.submit(&run("Nova", 50, 1, 3)).unwrap();
        board.submit(&run("Other", 999, 1, 4)).unwrap();

        let stats = board.player_stats("Nova").unwrap();
        let levels: Vec<_> = stats.level_stats.iter().map(|s| s.level).collect();
        assert_eq!(levels, [1, 2]);
        assert_eq!(stats.level_stats[1].best_score, 300);
        assert_eq!(stats.level_stats[1].total_games, 2);
        assert_relative_eq!(stats.level_stats[1].average_score, 200.0);
    }

    #[test]
    fn test_invalid_submission_leaves_board_untouched() {
        let mut board = LocalLeaderboard::new();
        let result = board.submit(&run("Cheater", 2_000_000, 1, 1));

        assert!(matches!(result, Err(PortError::Rejected(_))));
        assert!(board.is_empty());
    }

    #[test]
    fn test_capacity_keeps_best_entries() {
        let mut board = LocalLeaderboard::with_capacity(2);
        let kept: Vec<_> = [10, 40, 20, 30]
            .into_iter()
            .enumerate()
            .map(|(i, score)| board.submit(&run("P", score, 1, i as u64)).is_ok())
            .collect();
        assert_eq!(kept, [true, true, true, true]);
        assert!(matches!(board.submit(&run("P", 5, 1, 9)), Err(PortError::Discarded { score: 5, capacity: 2 })));

        let mut scores: Vec<_> = board.entries().iter().map(|e| e.score).collect();
        scores.sort_unstable();
        assert_eq!(scores, [30, 40]);
    }

    #[test]
    fn test_score_below_capacity_cutoff_is_not_ranked() {
        let mut board = LocalLeaderboard::with_capacity(2);
        board.submit(&run("A", 500, 1, 1)).unwrap();
        board.submit(&run("B", 400, 1, 2)).unwrap();

        let result = board.submit(&run("C", 10, 1, 3));

        assert!(matches!(result, Err(PortError::Discarded { score: 10, capacity: 2 })));
        assert_eq!(board.len(), 2);
        assert!(board.entries().iter().all(|e| e.player_name != "C"));

        let receipt = board.submit(&run("D", 450, 1, 4)).unwrap();
        assert_eq!(receipt.rank, Some(2));
        assert!(board.entries().iter().any(|e| e.player_name == "D"));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut board = LocalLeaderboard::with_capacity(0);
        assert!(!board.record(LeaderboardEntry::from(&run("A", 500, 1, 1))));
        assert!(board.is_empty());
    }
}
