//! Game-specific components

use runner_engine::foundation::math::{lerp, Vec3};
use runner_engine::physics::Collidable;

/// Number of lanes
pub const LANE_COUNT: u8 = 3;

/// Collision radius of asteroids
pub const ASTEROID_RADIUS: f32 = 1.35;

/// Collision radius of coins
pub const COIN_RADIUS: f32 = 1.1;

/// Discrete lane input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneCommand {
    /// One lane to the left, saturating at lane 0
    Left,
    /// One lane to the right, saturating at the last lane
    Right,
    /// Jump to a lane; out-of-range values are clamped
    Set(u8),
}

/// Player ship
#[derive(Debug, Clone)]
pub struct Player {
    lane: u8,
    /// Smoothed world position
    pub position: Vec3,
    /// Elapsed-tick score
    pub score: u64,
    /// Coins picked up this session
    pub coins_collected: u32,
}

impl Player {
    /// Player resting in `lane` at `height`
    pub fn new(lane: u8, lane_x: f32, height: f32) -> Self {
        Self {
            lane: lane.min(LANE_COUNT - 1),
            position: Vec3::new(lane_x, height, 0.0),
            score: 0,
            coins_collected: 0,
        }
    }

    /// Current lane, always in `0..LANE_COUNT`
    pub fn lane(&self) -> u8 {
        self.lane
    }

    /// Apply a lane command; returns true if the lane changed
    pub fn shift(&mut self, command: LaneCommand) -> bool {
        let target = match command {
            LaneCommand::Left => self.lane.saturating_sub(1),
            LaneCommand::Right => (self.lane + 1).min(LANE_COUNT - 1),
            LaneCommand::Set(lane) => lane.min(LANE_COUNT - 1),
        };
        let changed = target != self.lane;
        self.lane = target;
        changed
    }

    /// Move the smoothed position a fraction of the way toward its targets
    pub fn approach(&mut self, target_x: f32, lane_smoothing: f32, target_y: f32, bob_smoothing: f32) {
        self.position.x = lerp(self.position.x, target_x, lane_smoothing);
        self.position.y = lerp(self.position.y, target_y, bob_smoothing);
    }
}

impl Collidable for Player {
    fn center(&self) -> Vec3 {
        self.position
    }

    fn collision_radius(&self) -> f32 {
        0.0
    }
}

/// What a spawned entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Hazard; touching one ends the session
    Asteroid,
    /// Pickup; touching one adds a coin
    Coin,
}

impl EntityKind {
    /// Fudge radius used for collision tests
    pub fn collision_radius(self) -> f32 {
        match self {
            Self::Asteroid => ASTEROID_RADIUS,
            Self::Coin => COIN_RADIUS,
        }
    }
}

/// An asteroid or coin travelling toward the player
#[derive(Debug, Clone)]
pub struct SpaceEntity {
    /// Spawn sequence number
    pub id: u64,
    /// Variant tag
    pub kind: EntityKind,
    /// World position
    pub position: Vec3,
    /// Velocity in units per reference frame
    pub velocity: Vec3,
}

impl SpaceEntity {
    /// Advance by `velocity * frame_scale`
    pub fn advance(&mut self, frame_scale: f32) {
        self.position += self.velocity * frame_scale;
    }
}

impl Collidable for SpaceEntity {
    fn center(&self) -> Vec3 {
        self.position
    }

    fn collision_radius(&self) -> f32 {
        self.kind.collision_radius()
    }
}
