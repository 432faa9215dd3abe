//! Short-lived cosmetic effects
//!
//! Effects are plain data with a decay rule. The owner ticks the [`EffectStack`]
//! once per frame and expired effects are reaped in the same call, so nothing
//! keeps running on a detached timer after its owner is gone.

use crate::foundation::math::{frame_scale, Color, Vec3};
use rand::Rng;

/// Number of particles in an explosion burst
pub const EXPLOSION_PARTICLES: usize = 120;

/// Explosion life gained per reference frame (burst lasts 40 frames)
const EXPLOSION_LIFE_PER_FRAME: f32 = 0.025;

/// Starting point size of explosion particles
const EXPLOSION_BASE_SIZE: f32 = 6.0;

/// Flash opacity lost per reference frame
const FLASH_DECAY_PER_FRAME: f32 = 0.04;

/// Shake magnitude multiplier per reference frame
const SHAKE_DAMPING_PER_FRAME: f32 = 0.85;

/// Shake below this is considered settled
const SHAKE_EPSILON: f32 = 0.01;

/// One point of an explosion burst
#[derive(Debug, Clone, Copy)]
pub struct BurstParticle {
    /// World position
    pub position: Vec3,
    /// Particle tint
    pub color: Color,
}

/// Fiery particle burst at an impact point
#[derive(Debug, Clone)]
pub struct ExplosionBurst {
    particles: Vec<BurstParticle>,
    life: f32,
}

impl ExplosionBurst {
    /// Scatter a burst around `origin`
    pub fn new<R: Rng + ?Sized>(origin: Vec3, rng: &mut R) -> Self {
        let particles = (0..EXPLOSION_PARTICLES)
            .map(|_| {
                let theta = rng.gen::<f32>() * std::f32::consts::TAU;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
                let radius = 0.2 + rng.gen::<f32>() * 7.5;
                let offset = Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                );
                BurstParticle {
                    position: origin + offset,
                    color: Color::from_hsl(
                        0.04 + rng.gen::<f32>() * 0.09,
                        1.0,
                        0.5 + rng.gen::<f32>() * 0.2,
                    ),
                }
            })
            .collect();

        Self { particles, life: 0.0 }
    }

    /// Particles of the burst
    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }

    /// Progress through the burst, 0.0 (fresh) to 1.0 (gone)
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Current point size
    pub fn size(&self) -> f32 {
        EXPLOSION_BASE_SIZE * (1.0 - self.life).max(0.0)
    }

    /// Current opacity
    pub fn opacity(&self) -> f32 {
        (1.0 - self.life).max(0.0)
    }

    fn update(&mut self, delta: f32) {
        self.life += EXPLOSION_LIFE_PER_FRAME * frame_scale(delta);
    }

    fn is_expired(&self) -> bool {
        self.life >= 1.0
    }
}

/// Full-screen white flash fading out
#[derive(Debug, Clone, Copy)]
pub struct ScreenFlash {
    /// Current opacity
    pub alpha: f32,
}

impl ScreenFlash {
    /// Flash at full opacity
    pub fn new() -> Self {
        Self { alpha: 1.0 }
    }

    fn update(&mut self, delta: f32) {
        self.alpha = (self.alpha - FLASH_DECAY_PER_FRAME * frame_scale(delta)).max(0.0);
    }

    fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }
}

impl Default for ScreenFlash {
    fn default() -> Self {
        Self::new()
    }
}

/// Exponentially damped camera shake
#[derive(Debug, Clone, Copy)]
pub struct CameraShake {
    /// Current shake amplitude in world units
    pub magnitude: f32,
}

impl CameraShake {
    /// Shake with the given starting amplitude
    pub fn new(magnitude: f32) -> Self {
        Self { magnitude }
    }

    fn update(&mut self, delta: f32) {
        self.magnitude *= SHAKE_DAMPING_PER_FRAME.powf(frame_scale(delta));
    }

    fn is_expired(&self) -> bool {
        self.magnitude < SHAKE_EPSILON
    }
}

/// Any effect the stack can own
#[derive(Debug, Clone)]
pub enum Effect {
    /// Particle burst
    Explosion(ExplosionBurst),
    /// Screen flash
    Flash(ScreenFlash),
    /// Camera shake
    Shake(CameraShake),
}

impl Effect {
    /// Advance the effect by `delta` seconds
    pub fn update(&mut self, delta: f32) {
        match self {
            Self::Explosion(burst) => burst.update(delta),
            Self::Flash(flash) => flash.update(delta),
            Self::Shake(shake) => shake.update(delta),
        }
    }

    /// Whether the effect has finished and can be dropped
    pub fn is_expired(&self) -> bool {
        match self {
            Self::Explosion(burst) => burst.is_expired(),
            Self::Flash(flash) => flash.is_expired(),
            Self::Shake(shake) => shake.is_expired(),
        }
    }
}

/// Owner of all in-flight effects
#[derive(Debug, Default)]
pub struct EffectStack {
    effects: Vec<Effect>,
}

impl EffectStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new effect
    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Tick every effect and drop the ones that expired; returns how many were reaped
    pub fn update(&mut self, delta: f32) -> usize {
        let before = self.effects.len();
        self.effects.retain_mut(|effect| {
            effect.update(delta);
            !effect.is_expired()
        });
        before - self.effects.len()
    }

    /// Live effects
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Current combined camera shake amplitude
    pub fn shake_magnitude(&self) -> f32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Shake(shake) => Some(shake.magnitude),
                _ => None,
            })
            .sum()
    }

    /// Current flash opacity (strongest flash wins)
    pub fn flash_alpha(&self) -> f32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Flash(flash) => Some(flash.alpha),
                _ => None,
            })
            .fold(0.0, f32::max)
    }

    /// Number of live effects
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True when nothing is playing
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
