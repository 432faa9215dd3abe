//! Score submissions and leaderboard wire types
//!
//! Wire types serialize in the camelCase shape the leaderboard HTTP API uses.
//! [`ScoreSubmission`] is the validated form; anything arriving as a
//! [`SubmissionRequest`] has to pass through `TryFrom` first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Longest accepted player name
pub const MAX_PLAYER_NAME: usize = 20;

/// Highest accepted score
pub const MAX_SCORE: u64 = 1_000_000;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Submission validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// A required field is absent
    #[error("Player name, score, and level are required (missing {0})")]
    MissingField(&'static str),

    /// Name is empty after trimming
    #[error("Valid player name is required")]
    EmptyName,

    /// Name exceeds [`MAX_PLAYER_NAME`]
    #[error("Player name must be 20 characters or less (got {0})")]
    NameTooLong(usize),

    /// Score is NaN, negative or fractional
    #[error("Valid score (non-negative integer) is required, got {0}")]
    InvalidScore(f64),

    /// Score above [`MAX_SCORE`]
    #[error("Score seems unrealistic: {0}")]
    ScoreTooHigh(u64),

    /// Level is missing, fractional or below 1
    #[error("Valid level (positive integer) is required, got {0}")]
    InvalidLevel(f64),

    /// Unknown game mode
    #[error("Unknown game mode '{0}'")]
    InvalidGameMode(String),
}

/// Difficulty mode a score was achieved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Default mode
    #[default]
    Normal,
    /// Harder mode
    Hard,
    /// Hardest mode
    Expert,
}

impl GameMode {
    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }
}

impl FromStr for GameMode {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "expert" => Ok(Self::Expert),
            other => Err(SubmissionError::InvalidGameMode(other.to_string())),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished run on its way to a leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    /// Player display name
    pub player_name: String,
    /// Final score
    pub score: u64,
    /// 1-based level number
    pub level: u32,
    /// Difficulty mode
    #[serde(default)]
    pub game_mode: GameMode,
    /// Free-form client metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// When the run ended, ms since the Unix epoch
    pub timestamp: u64,
}

impl ScoreSubmission {
    /// Submission stamped with the current time
    pub fn new(player_name: impl Into<String>, score: u64, level: u32, game_mode: GameMode) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            level,
            game_mode,
            metadata: None,
            timestamp: now_millis(),
        }
    }

    /// Attach client metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Override the timestamp
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Reject values no leaderboard should store
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.player_name.trim().is_empty() {
            return Err(SubmissionError::EmptyName);
        }
        let name_len = self.player_name.chars().count();
        if name_len > MAX_PLAYER_NAME {
            return Err(SubmissionError::NameTooLong(name_len));
        }
        if self.level < 1 {
            return Err(SubmissionError::InvalidLevel(f64::from(self.level)));
        }
        if self.score > MAX_SCORE {
            return Err(SubmissionError::ScoreTooHigh(self.score));
        }
        Ok(())
    }

    /// Request body for `POST /api/leaderboard`
    pub fn to_request(&self) -> SubmissionRequest {
        SubmissionRequest {
            player_name: Some(self.player_name.trim().to_string()),
            score: Some(self.score as f64),
            level: Some(f64::from(self.level)),
            game_mode: Some(self.game_mode.as_str().to_string()),
            metadata: self.metadata.clone(),
        }
    }
}

/// Untrusted submission body as it arrives over the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// Player display name
    pub player_name: Option<String>,
    /// Score, possibly not an integer
    pub score: Option<f64>,
    /// Level, possibly not an integer
    pub level: Option<f64>,
    /// Game mode, defaults to normal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<String>,
    /// Free-form client metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

fn whole_number(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

impl TryFrom<SubmissionRequest> for ScoreSubmission {
    type Error = SubmissionError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(request: SubmissionRequest) -> Result<Self, Self::Error> {
        let player_name = request.player_name.ok_or(SubmissionError::MissingField("playerName"))?;
        let score = request.score.ok_or(SubmissionError::MissingField("score"))?;
        let level = request.level.ok_or(SubmissionError::MissingField("level"))?;

        if !whole_number(score) || score < 0.0 {
            return Err(SubmissionError::InvalidScore(score));
        }
        if score > MAX_SCORE as f64 {
            return Err(SubmissionError::ScoreTooHigh(score as u64));
        }
        if !whole_number(level) || level < 1.0 || level > f64::from(u32::MAX) {
            return Err(SubmissionError::InvalidLevel(level));
        }
        let game_mode = match request.game_mode.as_deref() {
            None | Some("") => GameMode::Normal,
            Some(mode) => mode.parse()?,
        };

        let submission = Self {
            player_name,
            score: score as u64,
            level: level as u32,
            game_mode,
            metadata: request.metadata,
            timestamp: now_millis(),
        };
        submission.validate()?;
        Ok(submission)
    }
}

/// Stored leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Player display name
    pub player_name: String,
    /// Score
    pub score: u64,
    /// Level
    pub level: u32,
    /// Difficulty mode
    pub game_mode: GameMode,
    /// ms since the Unix epoch
    pub timestamp: u64,
}

impl From<&ScoreSubmission> for LeaderboardEntry {
    fn from(submission: &ScoreSubmission) -> Self {
        Self {
            player_name: submission.player_name.trim().to_string(),
            score: submission.score,
            level: submission.level,
            game_mode: submission.game_mode,
            timestamp: submission.timestamp,
        }
    }
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// The stored row
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    /// 1-based rank among same level and mode; unknown while offline
    pub rank: Option<u32>,
    /// True when the score was only kept locally
    #[serde(default)]
    pub offline: bool,
}

/// Per-level aggregate for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    /// Level
    pub level: u32,
    /// Highest score
    pub best_score: u64,
    /// Runs submitted
    pub total_games: u32,
    /// Mean score
    pub average_score: f64,
}

/// All per-level aggregates for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Player display name
    pub player_name: String,
    /// One row per level, ascending
    pub level_stats: Vec<LevelStats>,
}

/// `GET /api/health` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service status text
    pub status: String,
    /// ms since the Unix epoch
    pub timestamp: u64,
}

/// Response envelope shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub success: bool,
    /// Human-readable status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of rows in a list payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data), count: None }
    }

    /// Failed response with a message
    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), data: None, count: None }
    }

    /// Attach a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Successful list response; `count` is the list length
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self { success: true, message: None, data: Some(data), count: Some(count) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(score: serde_json::Value) -> SubmissionRequest {
        serde_json::from_value(json!({ "playerName": "Nova", "score": score, "level": 1 })).unwrap()
    }

    #[test]
    fn test_validate_boundaries() {
        assert!(ScoreSubmission::new("Nova", MAX_SCORE, 1, GameMode::Normal).validate().is_ok());
        assert_eq!(
            ScoreSubmission::new("Nova", 2_000_000, 1, GameMode::Normal).validate(),
            Err(SubmissionError::ScoreTooHigh(2_000_000))
        );
        assert_eq!(ScoreSubmission::new("   ", 10, 1, GameMode::Normal).validate(), Err(SubmissionError::EmptyName));
        assert_eq!(
            ScoreSubmission::new("a".repeat(21), 10, 1, GameMode::Normal).validate(),
            Err(SubmissionError::NameTooLong(21))
        );
        assert!(matches!(
            ScoreSubmission::new("Nova", 10, 0, GameMode::Normal).validate(),
            Err(SubmissionError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_request_conversion_rejects_bad_scores() {
        assert!(ScoreSubmission::try_from(request(json!(120))).is_ok());
        assert!(matches!(ScoreSubmission::try_from(request(json!(-1))), Err(SubmissionError::InvalidScore(_))));
        assert!(matches!(ScoreSubmission::try_from(request(json!(10.5))), Err(SubmissionError::InvalidScore(_))));
        assert!(matches!(
            ScoreSubmission::try_from(request(json!(2_000_000))),
            Err(SubmissionError::ScoreTooHigh(2_000_000))
        ));

        let nan = SubmissionRequest { score: Some(f64::NAN), ..request(json!(1)) };
        assert!(matches!(ScoreSubmission::try_from(nan), Err(SubmissionError::InvalidScore(_))));
    }

    #[test]
    fn test_request_conversion_fields() {
        let missing: SubmissionRequest = serde_json::from_value(json!({ "score": 5, "level": 1 })).unwrap();
        assert_eq!(ScoreSubmission::try_from(missing), Err(SubmissionError::MissingField("playerName")));

        let mut hard = request(json!(5));
        hard.game_mode = Some("hard".to_string());
        assert_eq!(ScoreSubmission::try_from(hard).unwrap().game_mode, GameMode::Hard);

        let mut bogus = request(json!(5));
        bogus.game_mode = Some("casual".to_string());
        assert!(matches!(ScoreSubmission::try_from(bogus), Err(SubmissionError::InvalidGameMode(_))));
    }

    #[test]
    fn test_wire_shapes_are_camel_case() {
        let submission = ScoreSubmission::new("Nova", 42, 2, GameMode::Expert).at(7);
        let receipt = SubmissionReceipt { entry: LeaderboardEntry::from(&submission), rank: Some(1), offline: false };
        let value = serde_json::to_value(ApiResponse::ok(receipt)).unwrap();

        assert_eq!(value["data"]["playerName"], "Nova");
        assert_eq!(value["data"]["gameMode"], "expert");
        assert_eq!(value["data"]["rank"], 1);
        assert!(value.get("count").is_none());

        let body = serde_json::to_value(submission.to_request()).unwrap();
        assert_eq!(body, json!({ "playerName": "Nova", "score": 42.0, "level": 2.0, "gameMode": "expert" }));
    }
}
