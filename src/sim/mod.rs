//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collide;
pub mod entity;
pub mod formation;
pub mod grid;
pub mod pool;
pub mod state;
pub mod tick;

pub use entity::{Aabb, ColliderRef, EntityId, EntityKind};
pub use formation::EnemyFormation;
pub use grid::SpatialGrid;
pub use pool::Pool;
pub use state::{GameEvent, Mode, World};
pub use tick::{TickInput, tick};
