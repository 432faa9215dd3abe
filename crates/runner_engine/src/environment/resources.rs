//! Registry of scene resources owned by the active environment

use super::lighting::LightComponent;
use super::particles::ParticleField;
use super::skybox::SkyboxTexture;
use crate::foundation::collections::{Handle, HandleMap};

/// A resource the environment has handed to the scene
#[derive(Debug)]
pub enum SceneResource {
    /// Light source
    Light(LightComponent),
    /// Ambient particle system
    Particles(ParticleField),
    /// Loaded skybox texture
    Skybox(SkyboxTexture),
}

/// Resource category, used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Light source
    Light,
    /// Ambient particle system
    Particles,
    /// Skybox texture
    Skybox,
}

impl SceneResource {
    /// Category of this resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Light(_) => ResourceKind::Light,
            Self::Particles(_) => ResourceKind::Particles,
            Self::Skybox(_) => ResourceKind::Skybox,
        }
    }
}

/// Handle-based store of live scene resources
///
/// Every resource an environment creates is inserted here and every teardown
/// removes it again, so `len()` is the live resource count.
#[derive(Debug, Default)]
pub struct SceneResources {
    resources: HandleMap<SceneResource>,
}

impl SceneResources {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource
    pub fn insert(&mut self, resource: SceneResource) -> Handle {
        self.resources.insert(resource)
    }

    /// Release a resource
    pub fn remove(&mut self, handle: Handle) -> Option<SceneResource> {
        self.resources.remove(handle)
    }

    /// Look up a resource
    pub fn get(&self, handle: Handle) -> Option<&SceneResource> {
        self.resources.get(handle)
    }

    /// Look up a resource mutably
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut SceneResource> {
        self.resources.get_mut(handle)
    }

    /// Number of live resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Number of live resources of one kind
    pub fn count_of(&self, kind: ResourceKind) -> usize {
        self.resources.values().filter(|resource| resource.kind() == kind).count()
    }

    /// Iterate all live resources
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &SceneResource)> {
        self.resources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::lighting::LightFactory;
    use crate::foundation::math::Color;

    #[test]
    fn test_insert_remove_counts() {
        let mut registry = SceneResources::new();
        let ambient = registry.insert(SceneResource::Light(LightFactory::ambient(Color::BLACK, 1.0)));
        registry.insert(SceneResource::Skybox(SkyboxTexture::solid(2, 2, Color::BLACK)));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.count_of(ResourceKind::Light), 1);

        assert!(registry.remove(ambient).is_some());
        assert!(registry.remove(ambient).is_none());
        assert_eq!(registry.count_of(ResourceKind::Light), 0);
        assert_eq!(registry.len(), 1);
    }
}
