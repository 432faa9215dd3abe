//! Distance-threshold collision between positioned entities

use crate::foundation::math::Vec3;

/// Capability of anything that takes part in proximity collision tests
pub trait Collidable {
    /// Center position in world space
    fn center(&self) -> Vec3;

    /// Effective collision threshold ("fudge radius") for this entity
    fn collision_radius(&self) -> f32;
}

/// True when two centers are strictly closer than `radius`
#[inline]
pub fn within_radius(a: &Vec3, b: &Vec3, radius: f32) -> bool {
    (a - b).norm_squared() < radius * radius
}

/// Proximity test between two collidables
///
/// The threshold for a pair is the larger of the two radii, which keeps the
/// predicate symmetric: `colliding(a, b) == colliding(b, a)`.
pub fn colliding<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    let radius = a.collision_radius().max(b.collision_radius());
    within_radius(&a.center(), &b.center(), radius)
}

/// Free-standing sphere, mostly for probes and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximitySphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// Threshold radius
    pub radius: f32,
}

impl ProximitySphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Collidable for ProximitySphere {
    fn center(&self) -> Vec3 {
        self.center
    }

    fn collision_radius(&self) -> f32 {
        self.radius
    }
}
