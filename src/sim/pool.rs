//! Fixed-capacity object pools
//!
//! Bullets and explosions churn every tick, so they are pre-allocated once
//! and recycled through a free list. Acquire and release are O(1) and the
//! backing store never grows or shrinks after construction.

/// Behavior a pooled type must provide.
///
/// `reset` returns every per-spawn field to its default, including the
/// alive flag. A released slot must be indistinguishable from a fresh one.
pub trait Poolable: Default {
    fn reset(&mut self);
    fn is_alive(&self) -> bool;
    fn set_alive(&mut self, alive: bool);
}

impl Poolable for crate::sim::entity::Bullet {
    fn reset(&mut self) {
        *self = Self::default();
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }
}

impl Poolable for crate::sim::entity::Explosion {
    fn reset(&mut self) {
        *self = Self::default();
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }
}

/// A fixed-capacity pool of reusable instances.
///
/// Exhaustion is a soft failure: `acquire` returns `None` and the caller
/// treats it as "nothing spawned this tick".
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    free: Vec<usize>,
}

impl<T: Poolable> Pool<T> {
    /// Allocate the full backing store up front. `capacity` must be
    /// non-zero; `Config::validate` enforces that before we get here.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| T::default()).collect();
        // Low slots come back first, keeping entity ids dense
        let free = (0..capacity).rev().collect();
        Self { slots, free }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently acquired instances. Never exceeds capacity.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Take a reset slot from the pool, or `None` when exhausted.
    pub fn acquire(&mut self) -> Option<usize> {
        let slot = self.free.pop()?;
        self.slots[slot].reset();
        self.slots[slot].set_alive(true);
        Some(slot)
    }

    /// Return a slot to the pool, clearing all per-spawn state.
    ///
    /// Releasing an already-free slot is a no-op; the alive flag guards
    /// against double-release corrupting the free list.
    pub fn release(&mut self, slot: usize) {
        if !self.slots[slot].is_alive() {
            return;
        }
        self.slots[slot].reset();
        self.free.push(slot);
    }

    /// Release every live slot (return-to-menu reset)
    pub fn release_all(&mut self) {
        for slot in 0..self.slots.len() {
            self.release(slot);
        }
    }

    pub fn get(&self, slot: usize) -> &T {
        &self.slots[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut T {
        &mut self.slots[slot]
    }

    /// Live slots in slot (id) order
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_alive())
    }

    pub fn iter_live_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, t)| t.is_alive())
    }

    /// Slot indices of live instances, in id order. Handy when the caller
    /// needs to mutate the pool while walking it.
    pub fn live_slots(&self) -> Vec<usize> {
        self.iter_live().map(|(slot, _)| slot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Bullet, BulletOwner};
    use glam::Vec2;

    #[test]
    fn test_acquire_up_to_capacity() {
        let mut pool: Pool<Bullet> = Pool::new(3);
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert_eq!(pool.live_count(), 3);
        // Exhausted: soft failure
        assert!(pool.acquire().is_none());
        assert_eq!(pool.live_count(), 3);
    }

    #[test]
    fn test_release_resets_fields() {
        let mut pool: Pool<Bullet> = Pool::new(2);
        let slot = pool.acquire().unwrap();
        {
            let b = pool.get_mut(slot);
            b.owner = BulletOwner::Enemy;
            b.pos = Vec2::new(40.0, 50.0);
            b.vel = Vec2::new(0.0, 180.0);
            b.damage = 3;
            b.lane = 1;
        }
        pool.release(slot);

        // Released instance equals post-reset defaults
        let b = pool.get(slot);
        assert!(!b.alive);
        assert_eq!(b.pos, Vec2::ZERO);
        assert_eq!(b.vel, Vec2::ZERO);
        assert_eq!(b.damage, 0);
        assert_eq!(b.lane, 0);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool: Pool<Bullet> = Pool::new(2);
        let slot = pool.acquire().unwrap();
        pool.release(slot);
        pool.release(slot);
        assert_eq!(pool.live_count(), 0);
        // Both slots still usable, no free-list duplicates
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn test_slot_reuse_after_release() {
        let mut pool: Pool<Bullet> = Pool::new(1);
        let first = pool.acquire().unwrap();
        pool.release(first);
        let second = pool.acquire().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iter_live_in_slot_order() {
        let mut pool: Pool<Bullet> = Pool::new(4);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();
        pool.release(b);
        let live: Vec<usize> = pool.live_slots();
        assert_eq!(live, vec![a.min(c), a.max(c)]);
    }
}
