//! Named visual recipes
//!
//! A recipe expands into a [`SceneBlueprint`]: the lights, fog and particle
//! fields an environment is built from. Point light placement in the storm
//! recipe is randomized, so expansion takes an rng.

use super::lighting::{LightComponent, LightFactory};
use super::particles::{FieldRecipe, PointMaterial, SpawnVolume};
use super::Fog;
use crate::foundation::math::{Color, Vec3};
use rand::Rng;
use std::fmt;
use std::path::PathBuf;

/// Built-in visual recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualRecipe {
    /// Blue-grey dust, linear fog
    AsteroidBelt,
    /// Static multi-colored gas, exponential fog
    NebulaCore,
    /// Fast orange sparks and flickering point lights
    StellarStorm,
}

impl VisualRecipe {
    /// All recipes
    pub const ALL: [Self; 3] = [Self::AsteroidBelt, Self::NebulaCore, Self::StellarStorm];

    /// Look up a recipe by its name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|recipe| recipe.name() == name)
    }

    /// Look up a recipe by name, falling back to the asteroid belt for unknown names
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            log::warn!("Unknown environment recipe '{}', falling back to '{}'", name, Self::AsteroidBelt);
            Self::AsteroidBelt
        })
    }

    /// Recipe name as used in profiles
    pub fn name(self) -> &'static str {
        match self {
            Self::AsteroidBelt => "asteroid-belt",
            Self::NebulaCore => "nebula-core",
            Self::StellarStorm => "stellar-storm",
        }
    }

    /// Relative path of the HDR skybox for this recipe
    pub fn skybox_path(self) -> PathBuf {
        PathBuf::from("hdri").join(format!("{}.hdr", self.name()))
    }

    /// Lights of this recipe; storm point lights are placed randomly
    pub fn lights<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<LightComponent> {
        match self {
            Self::AsteroidBelt => vec![
                LightFactory::ambient(Color::from_hex(0x404080), 0.15),
                LightFactory::directional(Vec3::new(5.0, 10.0, 5.0), Color::from_hex(0x8080ff), 0.5),
            ],
            Self::NebulaCore => vec![
                LightFactory::ambient(Color::from_hex(0xff6040), 0.25),
                LightFactory::directional(Vec3::new(-3.0, 8.0, 4.0), Color::from_hex(0xff8060), 0.7),
            ],
            Self::StellarStorm => {
                let mut lights = vec![
                    LightFactory::ambient(Color::from_hex(0xffa040), 0.6),
                    LightFactory::directional(Vec3::new(0.0, 5.0, -10.0), Color::from_hex(0xffff80), 1.5),
                ];
                lights.extend((0..3).map(|_| {
                    let position = Vec3::new(
                        (rng.gen::<f32>() - 0.5) * 100.0,
                        (rng.gen::<f32>() - 0.5) * 50.0,
                        -20.0 - rng.gen::<f32>() * 30.0,
                    );
                    LightFactory::point(position, Color::from_hex(0xff8000), 2.0, 50.0)
                }));
                lights
            }
        }
    }

    /// Fog of this recipe
    pub fn fog(self) -> Fog {
        match self {
            Self::AsteroidBelt => Fog::Linear { color: Color::from_hex(0x101020), near: 100.0, far: 400.0 },
            Self::NebulaCore => Fog::Exponential { color: Color::from_hex(0x601040), density: 0.008 },
            Self::StellarStorm => Fog::Linear { color: Color::from_hex(0xff4000), near: 80.0, far: 300.0 },
        }
    }

    /// Ambient particle fields of this recipe
    ///
    /// Drift speeds are in units per second.
    pub fn fields(self) -> Vec<FieldRecipe> {
        match self {
            Self::AsteroidBelt => vec![FieldRecipe {
                label: "asteroid-dust",
                count: 200,
                palette: vec![Color::from_hex(0x606080)],
                volume: SpawnVolume { width: 200.0, height: 100.0, depth: 300.0 },
                lateral_drift: 0.01,
                forward_drift: 0.1..0.2,
                size_range: 0.5..0.5,
                material: PointMaterial { size: 0.5, opacity: 0.6, additive: false },
            }],
            Self::NebulaCore => vec![FieldRecipe {
                label: "nebula-gas",
                count: 500,
                palette: vec![
                    Color::from_hex(0xff6040),
                    Color::from_hex(0x8040ff),
                    Color::from_hex(0x40ff80),
                ],
                volume: SpawnVolume { width: 300.0, height: 150.0, depth: 400.0 },
                lateral_drift: 0.0,
                forward_drift: 0.0..0.0,
                size_range: 2.0..5.0,
                material: PointMaterial { size: 2.5, opacity: 0.7, additive: true },
            }],
            Self::StellarStorm => vec![FieldRecipe {
                label: "storm-sparks",
                count: 800,
                palette: vec![Color::from_hex(0xffaa00)],
                volume: SpawnVolume { width: 400.0, height: 200.0, depth: 500.0 },
                lateral_drift: 0.025,
                forward_drift: 0.2..0.35,
                size_range: 1.5..1.5,
                material: PointMaterial { size: 1.5, opacity: 0.8, additive: true },
            }],
        }
    }

    /// Expand into lights, fog and particle fields
    pub fn blueprint<R: Rng + ?Sized>(self, rng: &mut R) -> SceneBlueprint {
        SceneBlueprint { lights: self.lights(rng), fog: self.fog(), fields: self.fields() }
    }

    /// Lights and fog from `lighting`, particle fields from `particles`
    pub fn combined<R: Rng + ?Sized>(lighting: Self, particles: Self, rng: &mut R) -> SceneBlueprint {
        SceneBlueprint { lights: lighting.lights(rng), fog: lighting.fog(), fields: particles.fields() }
    }
}

impl fmt::Display for VisualRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything an environment is assembled from
#[derive(Debug, Clone)]
pub struct SceneBlueprint {
    /// Lights to register
    pub lights: Vec<LightComponent>,
    /// Scene fog
    pub fog: Fog,
    /// Ambient particle fields
    pub fields: Vec<FieldRecipe>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::lighting::LightType;
    use crate::environment::particles::ParticleField;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_recipe_names_round_trip() {
        for recipe in VisualRecipe::ALL {
            assert_eq!(VisualRecipe::parse(recipe.name()), Some(recipe));
        }
        assert_eq!(VisualRecipe::parse("black-hole"), None);
    }

    #[test]
    fn test_unknown_recipe_falls_back_to_asteroid_belt() {
        assert_eq!(VisualRecipe::from_name("black-hole"), VisualRecipe::AsteroidBelt);
    }

    #[test]
    fn test_skybox_path() {
        assert_eq!(
            VisualRecipe::NebulaCore.skybox_path(),
            PathBuf::from("hdri").join("nebula-core.hdr")
        );
    }

    #[test]
    fn test_combined_mixes_lighting_and_particles() {
        let mut rng = StdRng::seed_from_u64(2);
        let mixed = VisualRecipe::combined(VisualRecipe::NebulaCore, VisualRecipe::StellarStorm, &mut rng);
        assert_eq!(mixed.lights.len(), 2);
        assert!(matches!(mixed.fog, Fog::Exponential { .. }));
        assert_eq!(mixed.fields[0].count, 800);
    }

    #[test]
    fn test_fields_drift_slowly_per_second() {
        let mut rng = StdRng::seed_from_u64(8);
        for (recipe, lateral, forward) in
            [(VisualRecipe::AsteroidBelt, 0.01, 0.2), (VisualRecipe::StellarStorm, 0.025, 0.35)]
        {
            let field = ParticleField::from_recipe(&recipe.fields()[0], &mut rng);
            for particle in field.particles() {
                assert!(particle.velocity.x.abs() <= lateral && particle.velocity.y.abs() <= lateral);
                assert!(particle.velocity.z > 0.0 && particle.velocity.z <= forward);
            }
        }

        let gas = ParticleField::from_recipe(&VisualRecipe::NebulaCore.fields()[0], &mut rng);
        assert!(gas.particles().iter().all(|p| p.velocity == Vec3::zeros()));
    }

    #[test]
    fn test_blueprint_contents() {
        let mut rng = StdRng::seed_from_u64(11);

        let belt = VisualRecipe::AsteroidBelt.blueprint(&mut rng);
        assert_eq!(belt.lights.len(), 2);
        assert_eq!(belt.fields[0].count, 200);
        assert!(matches!(belt.fog, Fog::Linear { near, far, .. } if near == 100.0 && far == 400.0));

        let nebula = VisualRecipe::NebulaCore.blueprint(&mut rng);
        assert_eq!(nebula.fields[0].count, 500);
        assert_eq!(nebula.fields[0].palette.len(), 3);
        assert!(matches!(nebula.fog, Fog::Exponential { .. }));

        let storm = VisualRecipe::StellarStorm.blueprint(&mut rng);
        assert_eq!(storm.fields[0].count, 800);
        let points: Vec<_> = storm.lights.iter().filter(|l| l.light_type == LightType::Point).collect();
        assert_eq!(points.len(), 3);
        for light in points {
            assert!(light.position.z <= -20.0 && light.position.z >= -50.0);
            assert_eq!(light.range, 50.0);
        }
    }
}
