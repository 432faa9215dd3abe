//! Environment subsystem
//!
//! An environment is the per-level dressing of the scene: lights, fog, ambient
//! particle fields and a background. [`EnvironmentManager`] builds one from an
//! [`EnvironmentSpec`], owns every resource it creates in a [`SceneResources`]
//! registry, and tears all of it down before building the next one.
//!
//! The background starts as a solid color and is upgraded to a skybox once the
//! asynchronous load completes. Loads that fail leave the solid color in place.

pub mod lighting;
pub mod particles;
pub mod recipe;
pub mod resources;
pub mod skybox;

pub use lighting::{LightComponent, LightFactory, LightType};
pub use particles::{AmbientParticle, FieldRecipe, ParticleField, PointMaterial, SpawnVolume};
pub use recipe::{SceneBlueprint, VisualRecipe};
pub use resources::{ResourceKind, SceneResource, SceneResources};
pub use skybox::{ImageFileSource, SkyboxLoad, SkyboxLoader, SkyboxSource, SkyboxTexture};

use crate::foundation::collections::Handle;
use crate::foundation::math::Color;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use thiserror::Error;

/// Environment errors
///
/// These never reach the game loop; the manager logs them and keeps its fallback.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// Requested file does not exist
    #[error("Resource not found: {0:?}")]
    NotFound(PathBuf),

    /// Image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Loader worker could not be started
    #[error("Loader worker error: {0}")]
    Worker(String),
}

/// What the manager needs to know about a level
pub trait EnvironmentSpec {
    /// Human-readable environment name
    fn display_name(&self) -> &str;

    /// Recipe providing lights, fog and the skybox
    fn lighting_recipe(&self) -> &str;

    /// Recipe providing the ambient particle fields
    fn particle_recipe(&self) -> &str;

    /// Solid background color shown until the skybox is ready
    fn background_color(&self) -> Color;
}

/// Scene fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fog {
    /// Fog ramping linearly between two distances
    Linear {
        /// Fog color
        color: Color,
        /// Distance where fog starts
        near: f32,
        /// Distance of full fog
        far: f32,
    },
    /// Fog growing exponentially with distance
    Exponential {
        /// Fog color
        color: Color,
        /// Density factor
        density: f32,
    },
}

impl Fog {
    /// Fog color
    pub fn color(&self) -> Color {
        match self {
            Self::Linear { color, .. } | Self::Exponential { color, .. } => *color,
        }
    }
}

/// What is drawn behind the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Solid fallback color
    SolidColor(Color),
    /// Skybox texture held in the resource registry
    Skybox(Handle),
}

/// A fully built environment
#[derive(Debug)]
pub struct ActiveEnvironment {
    name: String,
    recipe: VisualRecipe,
    particle_recipe: VisualRecipe,
    generation: u64,
    fog: Fog,
    background: Background,
    fallback_color: Color,
    lights: Vec<Handle>,
    fields: Vec<Handle>,
    skybox: Option<Handle>,
}

impl ActiveEnvironment {
    /// Display name of the level
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recipe the lighting, fog and skybox came from
    pub fn recipe(&self) -> VisualRecipe {
        self.recipe
    }

    /// Recipe the particle fields came from
    pub fn particle_recipe(&self) -> VisualRecipe {
        self.particle_recipe
    }

    /// Build generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scene fog
    pub fn fog(&self) -> Fog {
        self.fog
    }

    /// Current background
    pub fn background(&self) -> Background {
        self.background
    }

    /// Solid color used while no skybox is available
    pub fn fallback_color(&self) -> Color {
        self.fallback_color
    }

    /// Handles of the lights
    pub fn lights(&self) -> &[Handle] {
        &self.lights
    }

    /// Handles of the particle fields
    pub fn fields(&self) -> &[Handle] {
        &self.fields
    }

    fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.lights.iter().chain(self.fields.iter()).chain(self.skybox.iter()).copied()
    }
}

/// Lifecycle state of the manager
#[derive(Debug)]
pub enum EnvironmentState {
    /// Nothing built
    Uninitialized,
    /// An environment is live
    Active(ActiveEnvironment),
}

/// Builds, updates and disposes level environments
#[derive(Debug)]
pub struct EnvironmentManager {
    state: EnvironmentState,
    resources: SceneResources,
    loader: Option<SkyboxLoader>,
    generation: u64,
    rng: StdRng,
}

impl EnvironmentManager {
    /// Manager without a skybox loader; backgrounds stay solid
    pub fn new() -> Self {
        Self {
            state: EnvironmentState::Uninitialized,
            resources: SceneResources::new(),
            loader: None,
            generation: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a deterministic rng for particle placement
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Load skyboxes through `loader`
    pub fn with_loader(mut self, loader: SkyboxLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Tear down the current environment (if any) and build one for `spec`
    pub fn switch_environment<S: EnvironmentSpec + ?Sized>(&mut self, spec: &S) {
        self.teardown();

        self.generation += 1;
        let generation = self.generation;
        let recipe = VisualRecipe::from_name(spec.lighting_recipe());
        let particle_recipe = VisualRecipe::from_name(spec.particle_recipe());
        let blueprint = VisualRecipe::combined(recipe, particle_recipe, &mut self.rng);

        let lights = blueprint
            .lights
            .into_iter()
            .map(|light| self.resources.insert(SceneResource::Light(light)))
            .collect::<Vec<_>>();

        let fields = blueprint
            .fields
            .iter()
            .map(|field| {
                let field = ParticleField::from_recipe(field, &mut self.rng);
                self.resources.insert(SceneResource::Particles(field))
            })
            .collect::<Vec<_>>();

        let fallback_color = spec.background_color();
        log::info!(
            "Environment '{}' active (recipe {}, generation {}, {} lights, {} particle fields)",
            spec.display_name(),
            recipe,
            generation,
            lights.len(),
            fields.len()
        );

        self.state = EnvironmentState::Active(ActiveEnvironment {
            name: spec.display_name().to_string(),
            recipe,
            particle_recipe,
            generation,
            fog: blueprint.fog,
            background: Background::SolidColor(fallback_color),
            fallback_color,
            lights,
            fields,
            skybox: None,
        });

        if let Some(loader) = self.loader.as_mut() {
            loader.request(generation, recipe.skybox_path());
        }
    }

    /// Advance every ambient particle; no-op while uninitialized
    pub fn update_particles(&mut self, delta: f32) {
        let EnvironmentState::Active(active) = &self.state else {
            return;
        };

        for handle in &active.fields {
            if let Some(SceneResource::Particles(field)) = self.resources.get_mut(*handle) {
                let wrapped = field.update(delta, &mut self.rng);
                if wrapped > 0 {
                    log::trace!("{} particles wrapped in '{}'", wrapped, field.label());
                }
            }
        }
    }

    /// Apply finished skybox loads; returns how many were applied
    ///
    /// Results from an older generation are dropped without touching state.
    pub fn poll_loads(&mut self) -> usize {
        let Some(loader) = self.loader.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        for result in loader.drain() {
            let current = match &self.state {
                EnvironmentState::Active(active) => Some(active.generation),
                EnvironmentState::Uninitialized => None,
            };
            if current != Some(result.generation()) {
                log::debug!("Discarding stale skybox load from generation {}", result.generation());
                continue;
            }

            match result {
                SkyboxLoad::Loaded { texture, .. } => {
                    let handle = self.resources.insert(SceneResource::Skybox(texture));
                    if let EnvironmentState::Active(active) = &mut self.state {
                        if let Some(old) = active.skybox.replace(handle) {
                            self.resources.remove(old);
                        }
                        active.background = Background::Skybox(handle);
                        log::info!("Skybox ready for '{}'", active.name);
                    }
                    applied += 1;
                }
                SkyboxLoad::Failed { error, .. } => {
                    log::warn!("Skybox load failed, keeping solid background: {}", error);
                }
            }
        }
        applied
    }

    /// Per-frame update: particles, then pending loads
    pub fn update(&mut self, delta: f32) {
        self.update_particles(delta);
        self.poll_loads();
    }

    /// Release everything and return to the uninitialized state
    pub fn dispose(&mut self) {
        if self.teardown() {
            log::info!("Environment disposed");
        }
    }

    fn teardown(&mut self) -> bool {
        let state = std::mem::replace(&mut self.state, EnvironmentState::Uninitialized);
        let EnvironmentState::Active(active) = state else {
            return false;
        };

        let mut released = 0;
        for handle in active.handles() {
            if self.resources.remove(handle).is_some() {
                released += 1;
            }
        }
        log::debug!("Released {} resources of '{}'", released, active.name);
        true
    }

    /// Lifecycle state
    pub fn state(&self) -> &EnvironmentState {
        &self.state
    }

    /// The live environment, if any
    pub fn active(&self) -> Option<&ActiveEnvironment> {
        match &self.state {
            EnvironmentState::Active(active) => Some(active),
            EnvironmentState::Uninitialized => None,
        }
    }

    /// True when an environment is built
    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// Current background, `None` while uninitialized
    pub fn background(&self) -> Option<Background> {
        self.active().map(ActiveEnvironment::background)
    }

    /// Resource registry
    pub fn resources(&self) -> &SceneResources {
        &self.resources
    }

    /// Number of live resources
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Latest build generation (0 before the first build)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Skybox loads not yet collected
    pub fn pending_loads(&self) -> usize {
        self.loader.as_ref().map_or(0, SkyboxLoader::in_flight)
    }

    /// Live particle fields of the active environment
    pub fn particle_fields(&self) -> impl Iterator<Item = &ParticleField> {
        self.active()
            .into_iter()
            .flat_map(|active| active.fields.iter())
            .filter_map(|handle| match self.resources.get(*handle) {
                Some(SceneResource::Particles(field)) => Some(field),
                _ => None,
            })
    }
}

impl Default for EnvironmentManager {
    fn default() -> Self {
        Self::new()
    }
}
