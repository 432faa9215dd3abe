//! Light descriptions used by environment recipes
//!
//! Pure data: the environment manager registers these in the scene resource
//! registry and the renderer reads them back. No logic lives on the light.

use crate::foundation::math::{Color, Vec3};

/// Scene light
#[derive(Debug, Clone, PartialEq)]
pub struct LightComponent {
    /// The type of light (ambient, directional or point)
    pub light_type: LightType,
    /// Light color
    pub color: Color,
    /// Light intensity multiplier
    pub intensity: f32,
    /// Position for directional (source point) and point lights in world space
    pub position: Vec3,
    /// Maximum range for point lights, 0.0 means unlimited
    pub range: f32,
}

/// Types of lights an environment can contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Uniform fill light
    Ambient,
    /// Parallel rays shining from `position` toward the origin
    Directional,
    /// Light radiating from a position, attenuated by range
    Point,
}

/// Factory functions for creating light components
pub struct LightFactory;

impl LightFactory {
    /// Uniform ambient light
    pub fn ambient(color: Color, intensity: f32) -> LightComponent {
        LightComponent {
            light_type: LightType::Ambient,
            color,
            intensity,
            position: Vec3::zeros(),
            range: 0.0,
        }
    }

    /// Directional light placed at `position`, aimed at the origin
    pub fn directional(position: Vec3, color: Color, intensity: f32) -> LightComponent {
        LightComponent {
            light_type: LightType::Directional,
            color,
            intensity,
            position,
            range: 0.0,
        }
    }

    /// Point light with a finite range
    pub fn point(position: Vec3, color: Color, intensity: f32, range: f32) -> LightComponent {
        LightComponent {
            light_type: LightType::Point,
            color,
            intensity,
            position,
            range,
        }
    }
}

impl LightComponent {
    /// Normalized direction the light travels in (directional lights only)
    pub fn direction(&self) -> Option<Vec3> {
        match self.light_type {
            LightType::Directional => (-self.position).try_normalize(f32::EPSILON),
            _ => None,
        }
    }
}
