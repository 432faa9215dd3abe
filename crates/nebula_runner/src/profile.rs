//! Level profiles
//!
//! A profile is the immutable per-level configuration chosen when a session
//! starts: spawn intervals, base approach speed and the visual recipes.

use runner_engine::environment::EnvironmentSpec;
use runner_engine::foundation::math::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Per-level visual and difficulty parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentProfile {
    /// 1-based level number reported with leaderboard submissions
    pub level: u32,
    /// Display name
    pub name: String,
    /// Seconds between asteroid spawns
    pub spawn_rate_asteroid: f32,
    /// Seconds between coin spawns
    pub spawn_rate_coin: f32,
    /// Approach speed at score zero, in units per reference frame
    pub approach_speed_base: f32,
    /// Recipe for the ambient particle fields
    pub ambient_particle_recipe: String,
    /// Recipe for lights, fog and the skybox
    pub lighting_recipe: String,
    /// Solid background shown until the skybox is ready, `0xRRGGBB`
    pub background_color: u32,
}

impl EnvironmentProfile {
    fn builtin(level: u32, name: &str, recipe: &str, asteroid: f32, coin: f32, speed: f32, background: u32) -> Self {
        Self {
            level,
            name: name.to_string(),
            spawn_rate_asteroid: asteroid,
            spawn_rate_coin: coin,
            approach_speed_base: speed,
            ambient_particle_recipe: recipe.to_string(),
            lighting_recipe: recipe.to_string(),
            background_color: background,
        }
    }

    /// Level 1
    pub fn asteroid_belt() -> Self {
        Self::builtin(1, "Asteroid Belt", "asteroid-belt", 0.95, 1.18, 0.25, 0x101020)
    }

    /// Level 2
    pub fn nebula_core() -> Self {
        Self::builtin(2, "Nebula Core", "nebula-core", 0.80, 1.20, 0.30, 0x601040)
    }

    /// Level 3
    pub fn stellar_storm() -> Self {
        Self::builtin(3, "Stellar Storm", "stellar-storm", 0.65, 1.00, 0.35, 0xff4000)
    }

    /// Check that intervals and speed are usable
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| Err(CatalogError::InvalidProfile { name: self.name.clone(), reason: reason.to_string() });
        if self.level == 0 {
            return invalid("level is 1-based");
        }
        if !(self.spawn_rate_asteroid > 0.0 && self.spawn_rate_coin > 0.0) {
            return invalid("spawn intervals must be positive");
        }
        if !(self.approach_speed_base >= 0.0) {
            return invalid("approach speed must not be negative");
        }
        Ok(())
    }
}

impl Default for EnvironmentProfile {
    fn default() -> Self {
        Self::asteroid_belt()
    }
}

impl EnvironmentSpec for EnvironmentProfile {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn lighting_recipe(&self) -> &str {
        &self.lighting_recipe
    }

    fn particle_recipe(&self) -> &str {
        &self.ambient_particle_recipe
    }

    fn background_color(&self) -> Color {
        Color::from_hex(self.background_color)
    }
}

/// Profile catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid RON
    #[error("Parse error: {0}")]
    Parse(String),

    /// A profile has unusable values
    #[error("Invalid profile '{name}': {reason}")]
    InvalidProfile {
        /// Profile name
        name: String,
        /// What is wrong
        reason: String,
    },

    /// No profile for the requested level
    #[error("No profile for level {0}")]
    UnknownLevel(u32),
}

/// Ordered set of level profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCatalog {
    profiles: Vec<EnvironmentProfile>,
}

impl ProfileCatalog {
    /// The three built-in levels
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                EnvironmentProfile::asteroid_belt(),
                EnvironmentProfile::nebula_core(),
                EnvironmentProfile::stellar_storm(),
            ],
        }
    }

    /// Load a catalog from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let catalog: Self = ron::from_str(&contents).map_err(|e| CatalogError::Parse(e.to_string()))?;
        for profile in &catalog.profiles {
            profile.validate()?;
        }
        log::info!("Loaded {} level profiles from {:?}", catalog.profiles.len(), path.as_ref());
        Ok(catalog)
    }

    /// Profile for a 1-based level number
    pub fn level(&self, level: u32) -> Result<&EnvironmentProfile, CatalogError> {
        self.profiles
            .iter()
            .find(|profile| profile.level == level)
            .ok_or(CatalogError::UnknownLevel(level))
    }

    /// All profiles in catalog order
    pub fn profiles(&self) -> &[EnvironmentProfile] {
        &self.profiles
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
