//! Enemy formation controller
//!
//! Owns the rectangular enemy grid and its classic sweep/drop movement:
//! the whole formation slides horizontally, and the tick after any live
//! enemy would cross a field edge it reverses and steps down instead.
//!
//! Shooting eligibility is a per-column cache of the lowest survivor (the
//! "front line"). The cache is recomputed only for the column an enemy died
//! in, never by rescanning the grid every tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::Config;
use crate::consts::*;
use crate::sim::entity::{
    Aabb, Bullet, BulletOwner, ColliderRef, ENEMY_ID_BASE, EntityId, EntityKind,
};
use crate::sim::pool::Pool;

/// One invader in the grid
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub row: usize,
    pub col: usize,
    pub pos: Vec2,
    pub health: u32,
    pub points: u64,
    /// Set at spawn; independent of current health or score values
    pub elite: bool,
}

impl Enemy {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, ENEMY_HALF)
    }

    pub fn collider(&self) -> ColliderRef {
        ColliderRef {
            id: self.id,
            kind: EntityKind::Enemy,
            aabb: self.aabb(),
        }
    }

    pub fn is_elite(&self) -> bool {
        self.elite
    }
}

/// A destroyed enemy, reported back to the resolver
#[derive(Debug, Clone, Copy)]
pub struct Killed {
    pub pos: Vec2,
    pub points: u64,
}

/// The enemy grid and its collective movement state
#[derive(Debug, Clone)]
pub struct EnemyFormation {
    rows: usize,
    cols: usize,
    /// Row-major grid of slots; `None` once the enemy is destroyed
    slots: Vec<Option<Enemy>>,
    live_count: usize,
    /// Horizontal sweep direction, +1 right / -1 left
    direction: f32,
    /// Sweep speed for this wave, fixed at construction
    speed: f32,
    drop_step: f32,
    /// Set when the sweep would cross a field edge; consumed next tick
    drop_pending: bool,
    /// Remaining ticks of the Freeze power-up effect
    freeze_ticks: u32,
    /// Per column: row index of the lowest survivor, if any
    front_line: Vec<Option<usize>>,
}

impl EnemyFormation {
    /// Build the wave's formation. Speed scales deterministically with the
    /// wave number; the top row spawns 2-health elites from
    /// `elite_wave_start` on.
    pub fn new(config: &Config, wave: u32) -> Self {
        let rows = config.formation_rows;
        let cols = config.formation_cols;
        let mut slots = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let elite = row == 0 && wave >= config.elite_wave_start;
                let x = FIELD_MARGIN + ENEMY_HALF.0 + col as f32 * config.formation_spacing_x;
                let y = config.formation_start_y + row as f32 * config.formation_spacing_y;
                slots.push(Some(Enemy {
                    id: EntityId(ENEMY_ID_BASE + (row * cols + col) as u32),
                    row,
                    col,
                    pos: Vec2::new(x, y),
                    health: if elite { 2 } else { 1 },
                    points: if elite {
                        config.elite_score
                    } else {
                        config.enemy_score
                    },
                    elite,
                }));
            }
        }

        // Full formation: the front line is simply the bottom row
        let front_line = vec![Some(rows - 1); cols];

        log::info!(
            "wave {wave} formation: {rows}x{cols}, speed {:.1}",
            config.enemy_speed_for_wave(wave)
        );

        Self {
            rows,
            cols,
            slots,
            live_count: rows * cols,
            direction: 1.0,
            speed: config.enemy_speed_for_wave(wave),
            drop_step: config.enemy_drop_step,
            drop_pending: false,
            freeze_ticks: 0,
            front_line,
        }
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn enemy(&self, row: usize, col: usize) -> Option<&Enemy> {
        self.slots.get(self.idx(row, col))?.as_ref()
    }

    /// Decode an entity id back to its grid slot
    pub fn enemy_by_id(&self, id: EntityId) -> Option<&Enemy> {
        let slot = id.0.checked_sub(ENEMY_ID_BASE)? as usize;
        self.slots.get(slot)?.as_ref()
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn frozen(&self) -> bool {
        self.freeze_ticks > 0
    }

    /// Suspend movement and shooting. Overwrites any running freeze timer.
    pub fn freeze(&mut self, ticks: u32) {
        self.freeze_ticks = ticks;
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn drop_pending(&self) -> bool {
        self.drop_pending
    }

    /// Advance the formation one tick.
    ///
    /// Movement algorithm:
    /// 1. A pending drop consumes the whole tick: every live enemy steps
    ///    down once, no horizontal motion.
    /// 2. Otherwise the sweep advances every live enemy horizontally --
    ///    unless that move would push any live AABB across a field edge,
    ///    in which case nothing moves this tick, the direction flips, and
    ///    the drop is queued for the next tick.
    pub fn advance(&mut self, dt: f32) {
        if self.freeze_ticks > 0 {
            self.freeze_ticks -= 1;
            return;
        }

        if self.drop_pending {
            for enemy in self.slots.iter_mut().filter_map(|s| s.as_mut()) {
                enemy.pos.y += self.drop_step;
            }
            self.drop_pending = false;
            return;
        }

        let step = self.speed * self.direction * dt;
        let would_cross = self.live_enemies().any(|e| {
            let nx = e.pos.x + step;
            nx - ENEMY_HALF.0 < FIELD_MARGIN || nx + ENEMY_HALF.0 > FIELD_WIDTH - FIELD_MARGIN
        });

        if would_cross {
            self.direction = -self.direction;
            self.drop_pending = true;
            return;
        }

        for enemy in self.slots.iter_mut().filter_map(|s| s.as_mut()) {
            enemy.pos.x += step;
        }
    }

    /// True only for the lowest surviving enemy of its column
    pub fn can_shoot(&self, row: usize, col: usize) -> bool {
        self.front_line.get(col).copied().flatten() == Some(row)
    }

    /// Front-line enemies in column order
    pub fn front_line(&self) -> impl Iterator<Item = &Enemy> {
        self.front_line
            .iter()
            .enumerate()
            .filter_map(|(col, row)| self.enemy((*row)?, col))
    }

    /// Once per tick: with the configured chance, pick one front-line
    /// enemy uniformly and fire a bullet from its bottom edge. Returns
    /// whether a bullet actually spawned (pool exhaustion fails softly).
    pub fn maybe_fire(
        &self,
        rng: &mut Pcg32,
        config: &Config,
        bullets: &mut Pool<Bullet>,
    ) -> bool {
        if self.frozen() || self.is_empty() {
            return false;
        }
        if rng.random::<f32>() >= config.enemy_shoot_chance {
            return false;
        }

        let shooters: Vec<&Enemy> = self.front_line().collect();
        if shooters.is_empty() {
            return false;
        }
        let shooter = shooters[rng.random_range(0..shooters.len())];

        let Some(slot) = bullets.acquire() else {
            log::warn!("bullet pool exhausted, enemy shot skipped");
            return false;
        };
        let bullet = bullets.get_mut(slot);
        bullet.owner = BulletOwner::Enemy;
        bullet.pos = Vec2::new(shooter.pos.x, shooter.pos.y + ENEMY_HALF.1);
        bullet.vel = Vec2::new(0.0, config.enemy_bullet_speed);
        bullet.damage = 1;
        true
    }

    /// Apply damage to the enemy at (row, col). On death the slot empties,
    /// the column's front line is recomputed, and the kill is reported.
    pub fn damage(&mut self, row: usize, col: usize, amount: u32) -> Option<Killed> {
        let idx = self.idx(row, col);
        let enemy = self.slots.get_mut(idx)?.as_mut()?;
        enemy.health = enemy.health.saturating_sub(amount);
        if enemy.health > 0 {
            return None;
        }

        let killed = Killed {
            pos: enemy.pos,
            points: enemy.points,
        };
        self.slots[idx] = None;
        self.live_count -= 1;
        self.recompute_column(col);
        Some(killed)
    }

    /// O(rows) rescan of a single column, run only when an enemy in that
    /// column dies
    fn recompute_column(&mut self, col: usize) {
        self.front_line[col] = (0..self.rows)
            .rev()
            .find(|&row| self.enemy(row, col).is_some());
    }

    /// Loss condition: any live enemy's box has reached the defense line.
    /// Pure query; the state machine decides what to do about it.
    pub fn reached_defense_line(&self, line_y: f32) -> bool {
        self.live_enemies().any(|e| e.pos.y + ENEMY_HALF.1 >= line_y)
    }
}
