//! Entity model shared by every simulation component
//!
//! A tagged-variant representation instead of a sprite hierarchy: each kind
//! is its own struct, and the pieces the collision substrate needs from any
//! of them (id, kind, AABB) travel as a plain [`ColliderRef`].

use glam::Vec2;
use serde::Serialize;

use crate::config::Config;
use crate::consts::*;

/// Entity identifier. Unique among live entities; pooled kinds reuse the
/// id of the slot they occupy after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u32);

pub const PLAYER_ID: EntityId = EntityId(0);
pub const ENEMY_ID_BASE: u32 = 1_000;
pub const BULLET_ID_BASE: u32 = 10_000;
pub const EXPLOSION_ID_BASE: u32 = 20_000;
pub const BONUS_ID_BASE: u32 = 30_000;

/// Id of the bullet occupying a pool slot
pub fn bullet_id(slot: usize) -> EntityId {
    EntityId(BULLET_ID_BASE + slot as u32)
}

/// Id of the explosion occupying a pool slot
pub fn explosion_id(slot: usize) -> EntityId {
    EntityId(EXPLOSION_ID_BASE + slot as u32)
}

/// Pool slot of a bullet id, if it is one
pub fn bullet_slot(id: EntityId) -> Option<usize> {
    id.0.checked_sub(BULLET_ID_BASE)
        .filter(|s| *s < EXPLOSION_ID_BASE - BULLET_ID_BASE)
        .map(|s| s as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
    Bonus,
    Explosion,
}

/// Axis-aligned bounding box in field coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half: (f32, f32)) -> Self {
        let h = Vec2::new(half.0, half.1);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Exact overlap test. Touching edges count as overlap, matching the
    /// conservative cell test so broad phase never under-reports.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Non-owning entity reference the spatial index holds.
///
/// Valid for exactly one tick; the index is rebuilt before any query.
#[derive(Debug, Clone, Copy)]
pub struct ColliderRef {
    pub id: EntityId,
    pub kind: EntityKind,
    pub aabb: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Power-up types carried by falling bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BonusKind {
    ExtraLife,
    Freeze,
    TripleShot,
    Shield,
    RapidFire,
}

impl BonusKind {
    pub const ALL: [BonusKind; 5] = [
        BonusKind::ExtraLife,
        BonusKind::Freeze,
        BonusKind::TripleShot,
        BonusKind::Shield,
        BonusKind::RapidFire,
    ];
}

/// Timed modifiers a player can hold (one at a time, no stacking)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUp {
    Shield,
    RapidFire,
    TripleShot,
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u8,
    pub score: u64,
    /// Active timed modifier and its remaining ticks
    pub active_power: Option<(PowerUp, u32)>,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
}

impl Player {
    pub fn new(config: &Config) -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, PLAYER_Y),
            lives: config.starting_lives,
            score: 0,
            active_power: None,
            fire_cooldown: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, PLAYER_HALF)
    }

    pub fn collider(&self) -> ColliderRef {
        ColliderRef {
            id: PLAYER_ID,
            kind: EntityKind::Player,
            aabb: self.aabb(),
        }
    }

    pub fn has_power(&self, power: PowerUp) -> bool {
        matches!(self.active_power, Some((p, ticks)) if p == power && ticks > 0)
    }

    /// Grant a timed modifier. Same-type grants overwrite the timer rather
    /// than stacking; a different type replaces the old one entirely.
    pub fn grant_power(&mut self, power: PowerUp, ticks: u32) {
        self.active_power = Some((power, ticks));
    }

    /// Count down the power-up timer by one tick
    pub fn tick_timers(&mut self) {
        if let Some((_, ticks)) = &mut self.active_power {
            *ticks -= 1;
            if *ticks == 0 {
                self.active_power = None;
            }
        }
    }
}

/// A pooled projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub alive: bool,
    pub owner: BulletOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: u32,
    /// Triple-shot lane: -1, 0, +1 (0 for normal shots)
    pub lane: i8,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            alive: false,
            owner: BulletOwner::Player,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            damage: 0,
            lane: 0,
        }
    }
}

impl Bullet {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, BULLET_HALF)
    }

    pub fn off_field(&self) -> bool {
        self.pos.y < -BULLET_HALF.1
            || self.pos.y > FIELD_HEIGHT + BULLET_HALF.1
            || self.pos.x < -BULLET_HALF.0
            || self.pos.x > FIELD_WIDTH + BULLET_HALF.0
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone)]
pub struct Bonus {
    pub id: EntityId,
    pub kind: BonusKind,
    pub pos: Vec2,
    pub fall_speed: f32,
    pub alive: bool,
}

impl Bonus {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, BONUS_HALF)
    }

    pub fn collider(&self) -> ColliderRef {
        ColliderRef {
            id: self.id,
            kind: EntityKind::Bonus,
            aabb: self.aabb(),
        }
    }
}

/// A pooled, purely visual explosion marker
#[derive(Debug, Clone)]
pub struct Explosion {
    pub alive: bool,
    pub pos: Vec2,
    pub ticks_left: u32,
}

impl Default for Explosion {
    fn default() -> Self {
        Self {
            alive: false,
            pos: Vec2::ZERO,
            ticks_left: 0,
        }
    }
}
