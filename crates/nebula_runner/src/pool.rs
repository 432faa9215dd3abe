//! Live asteroids and coins

use crate::components::{EntityKind, SpaceEntity};
use runner_engine::foundation::math::Vec3;

/// Ordered collection of live entities
///
/// Entities are kept in spawn order; every removal preserves that order.
#[derive(Debug, Default)]
pub struct EntityPool {
    entities: Vec<SpaceEntity>,
    next_id: u64,
}

impl EntityPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity at `position` moving with `velocity`; returns its id
    pub fn spawn(&mut self, kind: EntityKind, position: Vec3, velocity: Vec3) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(SpaceEntity { id, kind, position, velocity });
        log::trace!("Spawned {:?} #{} at {:?}", kind, id, position);
        id
    }

    /// Set every entity's approach speed and move it by `velocity * frame_scale`
    pub fn advance(&mut self, approach_speed: f32, frame_scale: f32) {
        for entity in &mut self.entities {
            entity.velocity.z = approach_speed;
            entity.advance(frame_scale);
        }
    }

    /// Remove entities that have passed `despawn_z`; returns how many were removed
    pub fn cull_passed(&mut self, despawn_z: f32) -> usize {
        let before = self.entities.len();
        self.entities.retain(|entity| entity.position.z <= despawn_z);
        before - self.entities.len()
    }

    /// Remove the entity with `id`
    pub fn remove(&mut self, id: u64) -> Option<SpaceEntity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Live entities in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &SpaceEntity> {
        self.entities.iter()
    }

    /// Live entities of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|entity| entity.kind == kind).count()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing is live
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ids handed out so far
    pub fn spawned(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(z: f32) -> Vec3 {
        Vec3::new(0.0, 1.0, z)
    }

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut pool = EntityPool::new();
        let a = pool.spawn(EntityKind::Asteroid, at(-40.0), Vec3::zeros());
        let b = pool.spawn(EntityKind::Coin, at(-40.0), Vec3::zeros());
        assert!(b > a);
        assert_eq!(pool.count(EntityKind::Coin), 1);
    }

    #[test]
    fn test_advance_scales_by_frame() {
        let mut pool = EntityPool::new();
        pool.spawn(EntityKind::Asteroid, at(-40.0), Vec3::zeros());
        pool.advance(0.25, 60.0 * 0.5);
        let z = pool.iter().next().unwrap().position.z;
        assert!((z - (-40.0 + 0.25 * 30.0)).abs() < 1e-5);
    }

    #[test]
    fn test_cull_removes_adjacent_entries_without_skipping() {
        let mut pool = EntityPool::new();
        pool.spawn(EntityKind::Asteroid, at(11.0), Vec3::zeros());
        pool.spawn(EntityKind::Coin, at(12.0), Vec3::zeros());
        let kept = pool.spawn(EntityKind::Asteroid, at(-5.0), Vec3::zeros());
        pool.spawn(EntityKind::Coin, at(10.5), Vec3::zeros());

        assert_eq!(pool.cull_passed(10.0), 3);
        let ids: Vec<_> = pool.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![kept]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut pool = EntityPool::new();
        let ids: Vec<_> = (0..4).map(|i| pool.spawn(EntityKind::Coin, at(-(i as f32)), Vec3::zeros())).collect();
        assert!(pool.remove(ids[1]).is_some());
        assert!(pool.remove(ids[1]).is_none());

        let left: Vec<_> = pool.iter().map(|e| e.id).collect();
        assert_eq!(left, vec![ids[0], ids[2], ids[3]]);
    }
}
