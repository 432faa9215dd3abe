//! # Nebula Runner
//!
//! Three-lane space runner built on `runner_engine`. The ship dodges asteroids,
//! picks up coins and scores one point per simulated tick until the first
//! asteroid hit ends the run. Final scores go to a leaderboard port that keeps
//! them offline when the backend is unreachable.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backdrop;
pub mod components;
pub mod config;
pub mod context;
pub mod game_loop;
pub mod leaderboard;
pub mod pool;
pub mod profile;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::GameConfig;
pub use context::PlayerContext;
pub use game_loop::{GameLoop, SubmissionStatus};
pub use profile::{EnvironmentProfile, ProfileCatalog};
pub use session::{GameSession, SessionEvent, SessionState};
