//! Scenario tests for the session and the game loop

mod game_loop_scenarios;
mod session_scenarios;

use crate::config::SimulationConfig;
use crate::profile::EnvironmentProfile;
use crate::session::GameSession;

/// Level 1 session with a fixed seed and the player ready
pub(crate) fn ready_session(seed: u64) -> GameSession {
    let mut session = GameSession::with_seed(EnvironmentProfile::asteroid_belt(), SimulationConfig::default(), seed);
    session.mark_player_ready();
    session
}
