//! Game configuration

use runner_engine::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Engine-level settings
    pub engine: EngineSettings,

    /// Simulation tuning
    pub simulation: SimulationConfig,

    /// Level and environment selection
    pub environment: EnvironmentConfig,

    /// Leaderboard client settings
    pub leaderboard: LeaderboardConfig,
}

/// Engine-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Root directory for assets such as skybox images
    pub asset_root: PathBuf,

    /// Load skybox images in the background
    pub load_skyboxes: bool,
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Largest frame delta the simulation accepts (seconds)
    pub max_delta: f32,

    /// X offsets of the three lanes
    pub lane_offsets: [f32; 3],

    /// Lane the player starts in
    pub start_lane: u8,

    /// Depth new entities spawn at
    pub spawn_depth: f32,

    /// Height of spawned entities
    pub spawn_height: f32,

    /// Entities with z beyond this have passed the player
    pub despawn_depth: f32,

    /// Approach speed gained per point of score
    pub speed_per_point: f32,

    /// Fraction of the remaining lane distance covered each tick
    pub lane_smoothing: f32,

    /// Fraction of the remaining bob distance covered each tick
    pub bob_smoothing: f32,

    /// Resting player height
    pub bob_base_height: f32,

    /// Amplitude of the player bob
    pub bob_amplitude: f32,
}

/// Level and environment selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Level played when none is given on the command line
    pub start_level: u32,

    /// Optional RON file with custom level profiles
    pub catalog: Option<PathBuf>,
}

/// Leaderboard client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Entries kept by the local leaderboard
    pub local_capacity: usize,

    /// Where unsent submissions are persisted
    pub offline_queue_path: Option<PathBuf>,

    /// Game mode reported with submissions
    pub game_mode: String,

    /// Number of entries printed after a run
    pub top_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            asset_root: PathBuf::from("assets"),
            load_skyboxes: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            lane_offsets: [-4.0, 0.0, 4.0],
            start_lane: 1,
            spawn_depth: -40.0,
            spawn_height: 1.0,
            despawn_depth: 10.0,
            speed_per_point: 0.0005,
            lane_smoothing: 0.19,
            bob_smoothing: 0.13,
            bob_base_height: 1.0,
            bob_amplitude: 0.3,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self { start_level: 1, catalog: None }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            local_capacity: 50,
            offline_queue_path: None,
            game_mode: "normal".to_string(),
            top_limit: 10,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load configuration from `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Using default configuration ({:?}: {})", path, e);
                Self::default()
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(sim.max_delta > 0.0) {
            return Err(ConfigError::Invalid(format!("max_delta must be positive, got {}", sim.max_delta)));
        }
        if !(sim.lane_smoothing > 0.0 && sim.lane_smoothing < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "lane_smoothing must be in (0, 1), got {}",
                sim.lane_smoothing
            )));
        }
        if !(sim.bob_smoothing > 0.0 && sim.bob_smoothing < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "bob_smoothing must be in (0, 1), got {}",
                sim.bob_smoothing
            )));
        }
        if sim.start_lane > 2 {
            return Err(ConfigError::Invalid(format!("start_lane must be 0..=2, got {}", sim.start_lane)));
        }
        if sim.speed_per_point < 0.0 {
            return Err(ConfigError::Invalid("speed_per_point must not be negative".to_string()));
        }
        if sim.despawn_depth <= sim.spawn_depth {
            return Err(ConfigError::Invalid(format!(
                "despawn_depth ({}) must lie in front of spawn_depth ({})",
                sim.despawn_depth, sim.spawn_depth
            )));
        }
        if self.environment.start_level == 0 {
            return Err(ConfigError::Invalid("start_level is 1-based".to_string()));
        }
        if self.leaderboard.local_capacity == 0 {
            return Err(ConfigError::Invalid("local_capacity must be at least 1".to_string()));
        }
        if !matches!(self.leaderboard.game_mode.as_str(), "normal" | "hard" | "expert") {
            return Err(ConfigError::Invalid(format!("unknown game mode '{}'", self.leaderboard.game_mode)));
        }
        Ok(())
    }
}
