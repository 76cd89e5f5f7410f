//! Uniform-grid broad phase
//!
//! Partitions the play-field into fixed-size square cells. Each entity is
//! inserted into every cell its AABB overlaps, so a query only has to union
//! the cells the query rectangle touches. The result is a candidate set:
//! conservative at cell granularity, with no false negatives versus a
//! brute-force all-pairs AABB scan. Exact overlap stays the caller's job.

use std::collections::HashMap;

use crate::sim::entity::{Aabb, ColliderRef};

#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<ColliderRef>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Invalidate all entries. Must run once per tick before any insert;
    /// the refs stored here do not survive entity movement. Keeps the
    /// per-cell allocations around for the next tick.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Inclusive cell-coordinate range covered by an AABB
    fn cell_range(&self, aabb: &Aabb) -> (i32, i32, i32, i32) {
        let x0 = (aabb.min.x / self.cell_size).floor() as i32;
        let y0 = (aabb.min.y / self.cell_size).floor() as i32;
        let x1 = (aabb.max.x / self.cell_size).floor() as i32;
        let y1 = (aabb.max.y / self.cell_size).floor() as i32;
        (x0, y0, x1, y1)
    }

    /// Place an entity reference into every cell its AABB overlaps.
    /// Entities straddling a cell boundary land in multiple cells.
    pub fn insert(&mut self, collider: ColliderRef) {
        let (x0, y0, x1, y1) = self.cell_range(&collider.aabb);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(collider);
            }
        }
    }

    /// Broad-phase candidates for a query rectangle, deduplicated and
    /// sorted by entity id so resolver iteration order is deterministic.
    pub fn query(&self, aabb: &Aabb) -> Vec<ColliderRef> {
        let (x0, y0, x1, y1) = self.cell_range(aabb);
        let mut out: Vec<ColliderRef> = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_by_key(|c| c.id);
        out.dedup_by_key(|c| c.id);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityId, EntityKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn collider(id: u32, cx: f32, cy: f32, hw: f32, hh: f32) -> ColliderRef {
        ColliderRef {
            id: EntityId(id),
            kind: EntityKind::Enemy,
            aabb: Aabb::from_center(Vec2::new(cx, cy), (hw, hh)),
        }
    }

    #[test]
    fn test_straddling_entity_reported_once() {
        let mut grid = SpatialGrid::new(100.0);
        // Sits on the corner of four cells
        grid.insert(collider(1, 100.0, 100.0, 20.0, 20.0));

        let hits = grid.query(&Aabb::from_center(Vec2::new(100.0, 100.0), (150.0, 150.0)));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, EntityId(1));
    }

    #[test]
    fn test_query_misses_distant_entity() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(collider(1, 50.0, 50.0, 10.0, 10.0));
        let hits = grid.query(&Aabb::from_center(Vec2::new(700.0, 500.0), (10.0, 10.0)));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_query_sorted_by_id() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(collider(9, 50.0, 50.0, 10.0, 10.0));
        grid.insert(collider(3, 60.0, 50.0, 10.0, 10.0));
        grid.insert(collider(7, 40.0, 50.0, 10.0, 10.0));
        let ids: Vec<u32> = grid
            .query(&Aabb::from_center(Vec2::new(50.0, 50.0), (30.0, 30.0)))
            .iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }

    #[test]
    fn test_clear_invalidates_entries() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(collider(1, 50.0, 50.0, 10.0, 10.0));
        grid.clear();
        let hits = grid.query(&Aabb::from_center(Vec2::new(50.0, 50.0), (10.0, 10.0)));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_negative_coordinates() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(collider(1, -50.0, -50.0, 10.0, 10.0));
        let hits = grid.query(&Aabb::from_center(Vec2::new(-50.0, -50.0), (5.0, 5.0)));
        assert_eq!(hits.len(), 1);
    }

    fn arb_box() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (
            0.0f32..800.0,
            0.0f32..600.0,
            1.0f32..60.0,
            1.0f32..60.0,
        )
    }

    proptest! {
        /// Broad phase never drops a pair a brute-force AABB scan would
        /// flag: the candidate set is a superset of the exact-overlap set.
        #[test]
        fn prop_no_false_negatives(
            boxes in proptest::collection::vec(arb_box(), 1..40),
            query in arb_box(),
        ) {
            let mut grid = SpatialGrid::new(100.0);
            let colliders: Vec<ColliderRef> = boxes
                .iter()
                .enumerate()
                .map(|(i, &(x, y, hw, hh))| collider(i as u32, x, y, hw, hh))
                .collect();
            for c in &colliders {
                grid.insert(*c);
            }

            let (qx, qy, qhw, qhh) = query;
            let query_aabb = Aabb::from_center(Vec2::new(qx, qy), (qhw, qhh));
            let candidates: Vec<EntityId> =
                grid.query(&query_aabb).iter().map(|c| c.id).collect();

            for c in &colliders {
                if c.aabb.overlaps(&query_aabb) {
                    prop_assert!(
                        candidates.contains(&c.id),
                        "entity {:?} overlaps query but was not a candidate",
                        c.id
                    );
                }
            }
        }
    }
}
