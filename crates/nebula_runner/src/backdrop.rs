//! Background decoration
//!
//! Layered starfield and small glowing cubes streaming past the camera. Purely
//! cosmetic: nothing here is read by the simulation.

use rand::Rng;
use runner_engine::foundation::math::{frame_scale, Color, Vec3};

const STAR_LAYERS: usize = 4;
const CUBE_SPAWN_INTERVAL: f32 = 0.032;
const CUBE_SPEED_PER_FRAME: f32 = 1.05;
const CUBE_SPIN_PER_SECOND: f32 = 0.8;
/// Edge length of a floating cube
pub const CUBE_SIZE: f32 = 0.13;

/// One layer of stars moving as a unit
#[derive(Debug, Clone)]
pub struct StarLayer {
    /// Star positions relative to the layer
    pub stars: Vec<Vec3>,
    /// Layer depth offset
    pub offset_z: f32,
    /// Point size
    pub size: f32,
    /// Opacity
    pub opacity: f32,
    speed_per_frame: f32,
    reset_z: f32,
}

impl StarLayer {
    fn new<R: Rng + ?Sized>(index: usize, rng: &mut R) -> Self {
        let i = index as f32;
        let count = 500 + index * 300;
        let width = 600.0 + i * 200.0;
        let height = 300.0 + i * 100.0;
        let stars = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * width,
                    (rng.gen::<f32>() - 0.5) * height,
                    -100.0 - i * 300.0 - rng.gen::<f32>() * 500.0,
                )
            })
            .collect();

        Self {
            stars,
            offset_z: 0.0,
            size: 0.08 + i * 0.05,
            opacity: 0.15 - i * 0.03,
            speed_per_frame: 0.05 + i * 0.05,
            reset_z: -400.0 - i * 300.0,
        }
    }

    fn update(&mut self, delta: f32) {
        self.offset_z += self.speed_per_frame * frame_scale(delta);
        if self.offset_z > 0.0 {
            self.offset_z = self.reset_z;
        }
    }
}

/// Small emissive cube drifting toward the camera
#[derive(Debug, Clone, Copy)]
pub struct FloatingCube {
    /// World position
    pub position: Vec3,
    /// Euler rotation (x, y) in radians
    pub rotation: (f32, f32),
    /// Emissive tint
    pub color: Color,
}

/// Starfield plus floating cubes
#[derive(Debug, Clone)]
pub struct Backdrop {
    layers: Vec<StarLayer>,
    cubes: Vec<FloatingCube>,
    cube_timer: f32,
}

impl Backdrop {
    /// Build the starfield
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            layers: (0..STAR_LAYERS).map(|i| StarLayer::new(i, rng)).collect(),
            cubes: Vec::new(),
            cube_timer: 0.0,
        }
    }

    /// Drift layers and cubes, spawn new cubes and drop the ones behind the camera
    pub fn update<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.update(delta);
        }

        let step = CUBE_SPEED_PER_FRAME * frame_scale(delta);
        let spin = CUBE_SPIN_PER_SECOND * delta;
        self.cubes.retain_mut(|cube| {
            cube.position.z += step;
            cube.rotation.0 += spin;
            cube.rotation.1 += spin;
            cube.position.z <= 0.0
        });

        self.cube_timer += delta;
        if self.cube_timer > CUBE_SPAWN_INTERVAL {
            self.cube_timer = 0.0;
            self.cubes.push(FloatingCube {
                position: Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 13.0,
                    (rng.gen::<f32>() - 0.5) * 10.0 + 2.0,
                    -14.0 - rng.gen::<f32>() * 320.0,
                ),
                rotation: (0.0, 0.0),
                color: Color::from_hsl(rng.gen(), 0.7, 0.7),
            });
        }
    }

    /// Star layers, nearest first
    pub fn layers(&self) -> &[StarLayer] {
        &self.layers
    }

    /// Live cubes
    pub fn cubes(&self) -> &[FloatingCube] {
        &self.cubes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_layers_wrap_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut backdrop = Backdrop::new(&mut rng);
        assert_eq!(backdrop.layers().len(), 4);
        assert_eq!(backdrop.layers()[3].stars.len(), 1400);

        backdrop.update(1.0 / 60.0, &mut rng);
        assert!(backdrop.layers()[0].offset_z < -399.0);
        assert!(backdrop.layers()[3].offset_z < -1299.0);
    }

    #[test]
    fn test_cubes_spawn_and_reap() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut backdrop = Backdrop::new(&mut rng);
        for _ in 0..10 {
            backdrop.update(0.05, &mut rng);
        }
        assert_eq!(backdrop.cubes().len(), 10);
        assert!(backdrop.cubes().iter().all(|cube| cube.position.z <= 0.0));

        // Cubes cover at most 334 units; 0.1s steps move them 6.3 units each
        for _ in 0..60 {
            backdrop.update(0.1, &mut rng);
        }
        assert!(backdrop.cubes().len() <= 60);
        assert!(backdrop.cubes().iter().all(|cube| cube.position.z <= 0.0));
    }
}
