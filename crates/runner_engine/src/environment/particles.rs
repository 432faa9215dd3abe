//! Ambient particle fields
//!
//! Cosmetic point clouds (dust, gas, storm sparks) that drift toward the camera
//! and recycle themselves once they pass the far boundary. They never interact
//! with gameplay entities.

use crate::foundation::math::{Color, Vec3};
use rand::Rng;
use std::ops::Range;

/// Particles with `z` beyond this are recycled to the spawn volume
pub const WRAP_Z: f32 = 50.0;

/// Box particles are (re)spawned in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnVolume {
    /// Full width along x, centered on 0
    pub width: f32,
    /// Full height along y, centered on 0
    pub height: f32,
    /// Depth along -z, starting at 0
    pub depth: f32,
}

impl SpawnVolume {
    /// Random point inside the volume
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.width,
            (rng.gen::<f32>() - 0.5) * self.height,
            -rng.gen::<f32>() * self.depth,
        )
    }

    /// Whether `point` lies in the volume
    pub fn contains(&self, point: &Vec3) -> bool {
        point.x.abs() <= self.width / 2.0
            && point.y.abs() <= self.height / 2.0
            && point.z <= 0.0
            && point.z >= -self.depth
    }
}

/// How points are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMaterial {
    /// Base point size
    pub size: f32,
    /// Opacity
    pub opacity: f32,
    /// Additive blending
    pub additive: bool,
}

/// Everything needed to build a particle field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecipe {
    /// Debug name
    pub label: &'static str,
    /// Number of particles
    pub count: usize,
    /// Colors particles are drawn from (uniformly)
    pub palette: Vec<Color>,
    /// Spawn box
    pub volume: SpawnVolume,
    /// Half-range of the random lateral (x/y) drift, units per second
    pub lateral_drift: f32,
    /// Range of the forward (+z) drift, units per second; `0.0..0.0` is a static field
    pub forward_drift: Range<f32>,
    /// Range of per-particle sizes
    pub size_range: Range<f32>,
    /// Draw settings
    pub material: PointMaterial,
}

/// One ambient particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientParticle {
    /// World position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Tint
    pub color: Color,
    /// Point size
    pub size: f32,
}

/// A live particle system
#[derive(Debug, Clone)]
pub struct ParticleField {
    label: &'static str,
    volume: SpawnVolume,
    material: PointMaterial,
    particles: Vec<AmbientParticle>,
}

fn sample_range<R: Rng + ?Sized>(range: &Range<f32>, rng: &mut R) -> f32 {
    if range.end > range.start {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}

impl ParticleField {
    /// Build a field from a recipe
    pub fn from_recipe<R: Rng + ?Sized>(recipe: &FieldRecipe, rng: &mut R) -> Self {
        let particles = (0..recipe.count)
            .map(|_| {
                let color = if recipe.palette.is_empty() {
                    Color::new(1.0, 1.0, 1.0)
                } else {
                    recipe.palette[rng.gen_range(0..recipe.palette.len())]
                };
                AmbientParticle {
                    position: recipe.volume.sample(rng),
                    velocity: Vec3::new(
                        (rng.gen::<f32>() - 0.5) * 2.0 * recipe.lateral_drift,
                        (rng.gen::<f32>() - 0.5) * 2.0 * recipe.lateral_drift,
                        sample_range(&recipe.forward_drift, rng),
                    ),
                    color,
                    size: sample_range(&recipe.size_range, rng),
                }
            })
            .collect();

        Self {
            label: recipe.label,
            volume: recipe.volume,
            material: recipe.material,
            particles,
        }
    }

    /// Move every particle by its own velocity and recycle the ones past [`WRAP_Z`]
    ///
    /// Returns the number of particles that wrapped this step.
    pub fn update<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> usize {
        let mut wrapped = 0;
        for particle in &mut self.particles {
            particle.position += particle.velocity * delta;
            if particle.position.z > WRAP_Z {
                particle.position = self.volume.sample(rng);
                wrapped += 1;
            }
        }
        wrapped
    }

    /// Debug name
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Draw settings
    pub fn material(&self) -> PointMaterial {
        self.material
    }

    /// Spawn box
    pub fn volume(&self) -> SpawnVolume {
        self.volume
    }

    /// Particles
    pub fn particles(&self) -> &[AmbientParticle] {
        &self.particles
    }

    /// Mutable particles
    pub fn particles_mut(&mut self) -> &mut [AmbientParticle] {
        &mut self.particles
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if the field has no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn dust() -> FieldRecipe {
        FieldRecipe {
            label: "dust",
            count: 64,
            palette: vec![Color::from_hex(0x606080)],
            volume: SpawnVolume { width: 200.0, height: 100.0, depth: 300.0 },
            lateral_drift: 0.01,
            forward_drift: 0.1..0.2,
            size_range: 0.5..0.5,
            material: PointMaterial { size: 0.5, opacity: 0.6, additive: false },
        }
    }

    #[test]
    fn test_field_spawns_inside_volume() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = ParticleField::from_recipe(&dust(), &mut rng);

        assert_eq!(field.len(), 64);
        assert!(field.particles().iter().all(|p| field.volume().contains(&p.position)));
        assert!(field.particles().iter().all(|p| p.velocity.z >= 0.1 && p.velocity.z < 0.2));
    }

    #[test]
    fn test_particles_move_by_own_velocity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ParticleField::from_recipe(&dust(), &mut rng);
        let before: Vec<_> = field.particles().to_vec();

        let wrapped = field.update(2.0, &mut rng);

        assert_eq!(wrapped, 0);
        for (old, new) in before.iter().zip(field.particles()) {
            let expected = old.position + old.velocity * 2.0;
            assert!((new.position - expected).norm() < 1e-4);
        }
    }

    #[test]
    fn test_particles_past_boundary_wrap_to_spawn_volume() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = ParticleField::from_recipe(&dust(), &mut rng);
        field.particles_mut()[0].position = Vec3::new(0.0, 0.0, WRAP_Z - 0.01);
        field.particles_mut()[0].velocity = Vec3::new(0.0, 0.0, 1.0);

        let wrapped = field.update(1.0, &mut rng);

        assert_eq!(wrapped, 1);
        let recycled = field.particles()[0].position;
        assert!(field.volume().contains(&recycled));
        assert_eq!(field.len(), 64);
    }
}
