//! Boundary between the game and whatever stores scores

use super::submission::{
    GameMode, HealthStatus, LeaderboardEntry, PlayerStats, ScoreSubmission, SubmissionError, SubmissionReceipt,
};
use thiserror::Error;

/// Leaderboard backend errors
#[derive(Debug, Error)]
pub enum PortError {
    /// Submission failed validation; retrying will not help
    #[error("Submission rejected: {0}")]
    Rejected(#[from] SubmissionError),

    /// Score fell below a bounded board's cutoff and was not stored
    #[error("Score {score} did not make the top {capacity}")]
    Discarded {
        /// Submitted score
        score: u64,
        /// Entries the board keeps
        capacity: usize,
    },

    /// Backend could not be reached
    #[error("Leaderboard unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with an error
    #[error("Leaderboard error {status}: {message}")]
    Backend {
        /// HTTP-style status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Local persistence failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local persistence produced or found invalid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PortError {
    /// Whether the same submission may succeed later
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Rejected(_) | Self::Discarded { .. } => false,
            Self::Backend { status, .. } => *status >= 500,
            Self::Unreachable(_) | Self::Io(_) | Self::Serialization(_) => true,
        }
    }
}

/// Filter for top-score listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardQuery {
    /// Maximum rows
    pub limit: usize,
    /// Only this level
    pub level: Option<u32>,
    /// Only this mode
    pub game_mode: Option<GameMode>,
}

impl LeaderboardQuery {
    /// Top `limit` rows across every level and mode
    pub fn top(limit: usize) -> Self {
        Self { limit, level: None, game_mode: None }
    }

    /// Restrict to one level
    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Restrict to one mode
    pub fn game_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = Some(mode);
        self
    }

    /// Whether `entry` passes the filter
    pub fn matches(&self, entry: &LeaderboardEntry) -> bool {
        self.level.map_or(true, |level| entry.level == level)
            && self.game_mode.map_or(true, |mode| entry.game_mode == mode)
    }
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self::top(10)
    }
}

/// Where finished runs are sent
///
/// Mirrors the leaderboard HTTP API: submit, top scores, per-player stats and
/// a health probe.
pub trait ScoreSubmissionPort {
    /// Store a finished run and report its rank
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<SubmissionReceipt, PortError>;

    /// Top scores, by score then most recent first
    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<LeaderboardEntry>, PortError>;

    /// Per-level aggregates for one player
    fn player_stats(&self, player_name: &str) -> Result<PlayerStats, PortError>;

    /// Backend liveness
    fn health(&self) -> Result<HealthStatus, PortError>;
}

impl<P: ScoreSubmissionPort + ?Sized> ScoreSubmissionPort for &mut P {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<SubmissionReceipt, PortError> {
        (**self).submit(submission)
    }

    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<LeaderboardEntry>, PortError> {
        (**self).top(query)
    }

    fn player_stats(&self, player_name: &str) -> Result<PlayerStats, PortError> {
        (**self).player_stats(player_name)
    }

    fn health(&self) -> Result<HealthStatus, PortError> {
        (**self).health()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(PortError::Unreachable("refused".into()).is_recoverable());
        assert!(PortError::Backend { status: 503, message: "down".into() }.is_recoverable());
        assert!(!PortError::Backend { status: 400, message: "bad".into() }.is_recoverable());
        assert!(!PortError::from(SubmissionError::EmptyName).is_recoverable());
        assert!(!PortError::Discarded { score: 10, capacity: 2 }.is_recoverable());
    }

    #[test]
    fn test_query_filter() {
        let entry = LeaderboardEntry {
            player_name: "Nova".into(),
            score: 10,
            level: 2,
            game_mode: GameMode::Hard,
            timestamp: 0,
        };
        assert!(LeaderboardQuery::top(5).matches(&entry));
        assert!(LeaderboardQuery::top(5).level(2).game_mode(GameMode::Hard).matches(&entry));
        assert!(!LeaderboardQuery::top(5).level(1).matches(&entry));
        assert!(!LeaderboardQuery::top(5).game_mode(GameMode::Normal).matches(&entry));
    }
}
