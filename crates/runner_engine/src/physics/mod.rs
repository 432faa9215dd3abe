//! Physics module
//!
//! The runner only needs proximity tests: a pair of entities "collide" when their
//! centers are closer than a kind-specific fudge radius.

pub mod collision;

pub use collision::{Collidable, ProximitySphere, colliding, within_radius};
