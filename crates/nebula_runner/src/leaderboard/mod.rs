//! Leaderboard client side
//!
//! The game hands its final score to a [`ScoreSubmissionPort`]. This module
//! holds the port trait, validation and wire types, an in-memory
//! [`LocalLeaderboard`] with the backend's ranking rules, and the
//! [`ResilientSubmitter`] that keeps scores through outages.

pub mod local;
pub mod offline;
pub mod port;
pub mod submission;

pub use local::LocalLeaderboard;
pub use offline::{OfflineQueue, ResilientSubmitter, SyncReport};
pub use port::{LeaderboardQuery, PortError, ScoreSubmissionPort};
pub use submission::{
    ApiResponse, GameMode, HealthStatus, LeaderboardEntry, LevelStats, PlayerStats, ScoreSubmission,
    SubmissionError, SubmissionReceipt, SubmissionRequest,
};
