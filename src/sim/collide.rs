//! Pairwise collision resolution
//!
//! Consumes the freshly rebuilt spatial index once per tick and applies
//! collision outcomes in a fixed priority order:
//! 1. player bullets vs enemies
//! 2. enemy bullets vs the player
//! 3. the player vs falling bonuses
//!
//! Broad-phase candidates come back from the grid sorted by entity id, so
//! the "first candidate wins" tie-break is deterministic and auditable.
//! Every mutation lands in the same tick; nothing is deferred.

use crate::sim::entity::{BonusKind, BulletOwner, EntityKind, PowerUp};
use crate::sim::state::{GameEvent, World};
use rand::Rng;

/// Resolve all collision outcomes for this tick. Assumes
/// `World::rebuild_grid` ran after the movement phase.
pub fn resolve(world: &mut World) {
    resolve_player_bullets(world);
    resolve_enemy_bullets(world);
    resolve_bonus_pickups(world);
}

/// Player Bullet x Enemy. Each bullet damages at most one enemy: the first
/// live candidate in index iteration order with exact AABB overlap.
fn resolve_player_bullets(world: &mut World) {
    let drop_chance = world.config.bonus_drop_chance;

    for slot in world.bullets.live_slots() {
        let bullet = world.bullets.get(slot);
        if bullet.owner != BulletOwner::Player || !bullet.alive {
            continue;
        }
        let aabb = bullet.aabb();
        let damage = bullet.damage;

        // Dead slots may linger in the grid when two bullets land in the
        // same tick; confirm against the formation.
        let target = world
            .grid
            .query(&aabb)
            .iter()
            .filter(|c| c.kind == EntityKind::Enemy && c.aabb.overlaps(&aabb))
            .find_map(|c| world.formation.enemy_by_id(c.id).map(|e| (e.row, e.col)));
        let Some((row, col)) = target else {
            continue;
        };

        world.bullets.release(slot);
        if let Some(killed) = world.formation.damage(row, col, damage) {
            world.player.score += killed.points;
            world.push_event(GameEvent::EnemyDestroyed {
                points: killed.points,
            });
            world.spawn_explosion(killed.pos);

            if world.rng.random::<f32>() < drop_chance {
                let kind = BonusKind::ALL[world.rng.random_range(0..BonusKind::ALL.len())];
                world.spawn_bonus(kind, killed.pos);
            }
        }
    }
}

/// Enemy Bullet x Player. An active shield absorbs the hit outright.
fn resolve_enemy_bullets(world: &mut World) {
    for slot in world.bullets.live_slots() {
        let bullet = world.bullets.get(slot);
        if bullet.owner != BulletOwner::Enemy || !bullet.alive {
            continue;
        }
        let aabb = bullet.aabb();

        let hit = world
            .grid
            .query(&aabb)
            .iter()
            .any(|c| c.kind == EntityKind::Player && c.aabb.overlaps(&aabb));
        if !hit {
            continue;
        }

        world.bullets.release(slot);
        if world.player.has_power(PowerUp::Shield) {
            world.push_event(GameEvent::ShieldAbsorbed);
        } else {
            world.player.lives = world.player.lives.saturating_sub(1);
            let pos = world.player.pos;
            world.spawn_explosion(pos);
            world.push_event(GameEvent::PlayerHit {
                lives_left: world.player.lives,
            });
        }
    }
}

/// Player x Bonus. The bonus is consumed and its effect applied.
fn resolve_bonus_pickups(world: &mut World) {
    let player_aabb = world.player.aabb();
    let collected: Vec<_> = world
        .grid
        .query(&player_aabb)
        .iter()
        .filter(|c| c.kind == EntityKind::Bonus && c.aabb.overlaps(&player_aabb))
        .map(|c| c.id)
        .collect();

    for id in collected {
        let Some(bonus) = world.bonuses.iter_mut().find(|b| b.id == id && b.alive) else {
            continue;
        };
        bonus.alive = false;
        let kind = bonus.kind;
        apply_bonus(world, kind);
        world.player.score += world.config.bonus_score;
        world.push_event(GameEvent::BonusCollected { kind });
    }
}

fn apply_bonus(world: &mut World, kind: BonusKind) {
    match kind {
        BonusKind::ExtraLife => {
            let cap = world.config.lives_cap;
            world.player.lives = (world.player.lives + 1).min(cap);
        }
        BonusKind::Freeze => {
            let ticks = world.config.freeze_duration_ticks;
            world.formation.freeze(ticks);
        }
        BonusKind::TripleShot => {
            let ticks = world.config.triple_shot_duration_ticks;
            world.player.grant_power(PowerUp::TripleShot, ticks);
        }
        BonusKind::Shield => {
            let ticks = world.config.shield_duration_ticks;
            world.player.grant_power(PowerUp::Shield, ticks);
        }
        BonusKind::RapidFire => {
            let ticks = world.config.rapid_fire_duration_ticks;
            world.player.grant_power(PowerUp::RapidFire, ticks);
        }
    }
}
