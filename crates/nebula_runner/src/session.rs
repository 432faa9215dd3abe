//! Simulation core
//!
//! A [`GameSession`] owns one player, the live entity pool and the level
//! profile. [`GameSession::step`] runs the gameplay part of a frame:
//!
//! 1. ease the player toward its lane and bob height
//! 2. tick the spawn timers and spawn at most one entity of each kind
//! 3. move every entity toward the player at the current approach speed
//! 4. drop entities that passed the player
//! 5. test collisions in spawn order
//! 6. score the tick
//!
//! The session ends for good on the first asteroid hit. A new session must be
//! built to play again.

use crate::components::{EntityKind, LaneCommand, Player};
use crate::config::SimulationConfig;
use crate::pool::EntityPool;
use crate::profile::EnvironmentProfile;
use rand::{rngs::StdRng, Rng, SeedableRng};
use runner_engine::foundation::math::{frame_scale, Vec3};
use runner_engine::foundation::time::clamp_delta;
use runner_engine::physics::colliding;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Simulation is ticking
    Running,
    /// An asteroid was hit; nothing moves any more
    GameOver,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new entity entered the pool
    Spawned {
        /// Entity id
        id: u64,
        /// Entity kind
        kind: EntityKind,
    },
    /// A coin was picked up
    CoinCollected {
        /// Coin id
        id: u64,
    },
    /// The player hit an asteroid and the session ended
    GameOver {
        /// Asteroid id
        asteroid: u64,
        /// Where the impact happened
        position: Vec3,
        /// Final score
        score: u64,
        /// Coins collected during the session
        coins: u32,
    },
}

/// One play-through of a level
#[derive(Debug)]
pub struct GameSession {
    profile: EnvironmentProfile,
    tuning: SimulationConfig,
    player: Player,
    pool: EntityPool,
    state: SessionState,
    asteroid_timer: f32,
    coin_timer: f32,
    elapsed: f32,
    ticks: u64,
    player_ready: bool,
    rng: StdRng,
}

impl GameSession {
    /// Start a session with an entropy-seeded rng
    pub fn new(profile: EnvironmentProfile, tuning: SimulationConfig) -> Self {
        Self::with_rng(profile, tuning, StdRng::from_entropy())
    }

    /// Start a session with a deterministic rng
    pub fn with_seed(profile: EnvironmentProfile, tuning: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(profile, tuning, StdRng::seed_from_u64(seed))
    }

    fn with_rng(profile: EnvironmentProfile, tuning: SimulationConfig, rng: StdRng) -> Self {
        let lane = tuning.start_lane.min(2);
        let player = Player::new(lane, tuning.lane_offsets[usize::from(lane)], tuning.bob_base_height);
        log::info!("Session started on level {} ({})", profile.level, profile.name);

        Self {
            profile,
            tuning,
            player,
            pool: EntityPool::new(),
            state: SessionState::Running,
            asteroid_timer: 0.0,
            coin_timer: 0.0,
            elapsed: 0.0,
            ticks: 0,
            player_ready: false,
            rng,
        }
    }

    /// Player mesh is loaded; movement and collision start running
    pub fn mark_player_ready(&mut self) {
        if !self.player_ready {
            log::debug!("Player ready");
            self.player_ready = true;
        }
    }

    /// Forward a lane input to the player (ignored after game over)
    pub fn apply(&mut self, command: LaneCommand) {
        if self.state == SessionState::Running && self.player.shift(command) {
            log::trace!("Player moved to lane {}", self.player.lane());
        }
    }

    /// Current approach speed in units per reference frame
    pub fn approach_speed(&self) -> f32 {
        self.profile.approach_speed_base + self.player.score as f32 * self.tuning.speed_per_point
    }

    /// Advance the simulation by `raw_delta` seconds
    ///
    /// Returns what happened this tick. After game over this does nothing.
    pub fn step(&mut self, raw_delta: f32) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state == SessionState::GameOver {
            return events;
        }

        let delta = clamp_delta(raw_delta, self.tuning.max_delta);
        self.elapsed += delta;
        self.ticks += 1;

        if self.player_ready {
            let target_x = self.tuning.lane_offsets[usize::from(self.player.lane())];
            let target_y = self.tuning.bob_base_height + self.tuning.bob_amplitude * self.elapsed.sin();
            self.player.approach(target_x, self.tuning.lane_smoothing, target_y, self.tuning.bob_smoothing);
        }

        self.asteroid_timer += delta;
        if self.asteroid_timer >= self.profile.spawn_rate_asteroid {
            self.asteroid_timer = 0.0;
            events.push(self.spawn(EntityKind::Asteroid));
        }
        self.coin_timer += delta;
        if self.coin_timer >= self.profile.spawn_rate_coin {
            self.coin_timer = 0.0;
            events.push(self.spawn(EntityKind::Coin));
        }

        self.pool.advance(self.approach_speed(), frame_scale(delta));

        let culled = self.pool.cull_passed(self.tuning.despawn_depth);
        if culled > 0 {
            log::trace!("{} entities passed the player", culled);
        }

        if self.player_ready && self.resolve_collisions(&mut events) {
            return events;
        }

        self.player.score += 1;
        events
    }

    fn spawn(&mut self, kind: EntityKind) -> SessionEvent {
        let lane = self.rng.gen_range(0..self.tuning.lane_offsets.len());
        let position = Vec3::new(self.tuning.lane_offsets[lane], self.tuning.spawn_height, self.tuning.spawn_depth);
        let velocity = Vec3::new(0.0, 0.0, self.approach_speed());
        let id = self.pool.spawn(kind, position, velocity);
        SessionEvent::Spawned { id, kind }
    }

    /// Returns true when the tick ended the session
    fn resolve_collisions(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        let mut coins = Vec::new();
        let mut fatal = None;
        for entity in self.pool.iter() {
            if !colliding(&self.player, entity) {
                continue;
            }
            match entity.kind {
                EntityKind::Coin => coins.push(entity.id),
                EntityKind::Asteroid => {
                    fatal = Some((entity.id, entity.position));
                    break;
                }
            }
        }

        for id in coins {
            if self.pool.remove(id).is_some() {
                self.player.coins_collected += 1;
                events.push(SessionEvent::CoinCollected { id });
            }
        }

        let Some((asteroid, position)) = fatal else {
            return false;
        };
        self.pool.remove(asteroid);
        self.state = SessionState::GameOver;
        log::info!(
            "Game over on level {}: score {}, coins {}",
            self.profile.level,
            self.player.score,
            self.player.coins_collected
        );
        events.push(SessionEvent::GameOver {
            asteroid,
            position,
            score: self.player.score,
            coins: self.player.coins_collected,
        });
        true
    }

    /// Lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while ticking
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Current score
    pub fn score(&self) -> u64 {
        self.player.score
    }

    /// Coins collected so far
    pub fn coins(&self) -> u32 {
        self.player.coins_collected
    }

    /// Live entities
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    /// Live entities, mutably
    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    /// Level profile
    pub fn profile(&self) -> &EnvironmentProfile {
        &self.profile
    }

    /// Simulation tuning
    pub fn tuning(&self) -> &SimulationConfig {
        &self.tuning
    }

    /// Clamped seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether movement and collision are active
    pub fn is_player_ready(&self) -> bool {
        self.player_ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::with_seed(EnvironmentProfile::asteroid_belt(), SimulationConfig::default(), 42)
    }

    #[test]
    fn test_new_session_starts_in_middle_lane() {
        let session = session();
        assert!(session.is_running());
        assert_eq!(session.player().lane(), 1);
        assert_eq!(session.score(), 0);
        assert!(session.pool().is_empty());
    }

    #[test]
    fn test_unready_player_does_not_move_or_collide() {
        let mut session = session();
        session.apply(LaneCommand::Right);
        let at_player = session.player().position;
        session.pool_mut().spawn(EntityKind::Asteroid, at_player, Vec3::zeros());

        session.step(0.016);
        assert!(session.is_running());
        assert_eq!(session.player().position.x, 0.0);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_spawned_entities_sit_on_a_lane() {
        let mut session = session();
        for _ in 0..20 {
            session.step(0.1);
        }
        assert!(session.pool().spawned() > 0);
        for entity in session.pool().iter() {
            assert!([-4.0, 0.0, 4.0].contains(&entity.position.x));
            assert_eq!(entity.position.y, 1.0);
        }
    }

    #[test]
    fn test_approach_speed_grows_with_score() {
        let mut session = session();
        let start = session.approach_speed();
        for _ in 0..100 {
            session.step(0.001);
        }
        assert!((session.approach_speed() - (start + 100.0 * 0.0005)).abs() < 1e-5);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut session = session();
        session.pool_mut().spawn(EntityKind::Coin, Vec3::new(4.0, 1.0, -40.0), Vec3::zeros());
        session.step(5.0);

        let coin = session.pool().iter().next().unwrap();
        // 0.1s clamp at 60 fps reference and base speed 0.25
        assert!((coin.position.z - (-40.0 + 0.25 * 6.0)).abs() < 1e-4);
        assert!((session.elapsed() - 0.1).abs() < 1e-6);
    }
}
