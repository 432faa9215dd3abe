//! # Runner Engine
//!
//! Frame-driven building blocks for lane runner games.
//!
//! ## Features
//!
//! - **Environments**: Recipe-built lighting, fog and ambient particle fields with leak-free switching
//! - **Async Skyboxes**: Worker-thread image loading with stale-result rejection
//! - **Collision**: Symmetric fudge-radius proximity tests
//! - **Effects**: Explosion bursts, screen flashes and camera shake with explicit lifetimes
//! - **Configuration**: TOML and RON config files through serde
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runner_engine::prelude::*;
//!
//! struct Level;
//!
//! impl EnvironmentSpec for Level {
//!     fn display_name(&self) -> &str { "Asteroid Belt" }
//!     fn lighting_recipe(&self) -> &str { "asteroid-belt" }
//!     fn particle_recipe(&self) -> &str { "asteroid-belt" }
//!     fn background_color(&self) -> Color { Color::from_hex(0x101020) }
//! }
//!
//! let mut timer = Timer::default();
//! let mut environment = EnvironmentManager::new();
//! environment.switch_environment(&Level);
//!
//! loop {
//!     let delta = timer.update();
//!     environment.update(delta);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;
pub mod effects;
pub mod environment;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        effects::{CameraShake, Effect, EffectStack, ExplosionBurst, ScreenFlash},
        environment::{
            Background, EnvironmentError, EnvironmentManager, EnvironmentSpec, Fog, ImageFileSource,
            SkyboxLoader, VisualRecipe,
        },
        foundation::{
            collections::{Handle, HandleMap},
            math::{frame_scale, lerp, Color, Vec3, REFERENCE_FPS},
            time::{clamp_delta, Timer},
        },
        physics::{colliding, within_radius, Collidable, ProximitySphere},
    };
}
