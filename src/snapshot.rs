//! Read-only render snapshot
//!
//! The renderer never touches [`World`] directly; after each tick the
//! frontend captures a [`RenderSnapshot`] and draws from that. Everything
//! here is plain data, serializable for replay capture or a remote viewer.

use serde::Serialize;

use glam::Vec2;

use crate::sim::entity::{BonusKind, EntityId, EntityKind, PowerUp, bullet_id, explosion_id};
use crate::sim::state::{Mode, World};

/// How the renderer should style an entity this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisualTag {
    Plain,
    /// Player with an active shield
    Shielded,
    /// Two-health enemy, drawn while still undamaged
    Elite,
    /// Enemy suspended by a freeze bonus
    Frozen,
    /// Falling pickup, styled per kind
    Bonus(BonusKind),
    Exploding,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub tag: VisualTag,
}

/// Everything the HUD overlay needs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HudView {
    pub score: u64,
    pub lives: u8,
    pub wave: u32,
    pub mode: Mode,
    /// Active power-up and its remaining ticks
    pub power: Option<(PowerUp, u32)>,
    pub high_score: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub entities: Vec<EntityView>,
    pub hud: HudView,
}

impl RenderSnapshot {
    pub fn capture(world: &World) -> Self {
        let mut entities = Vec::new();

        let player_tag = if world.player.has_power(PowerUp::Shield) {
            VisualTag::Shielded
        } else {
            VisualTag::Plain
        };
        entities.push(EntityView {
            id: crate::sim::entity::PLAYER_ID,
            kind: EntityKind::Player,
            pos: world.player.pos,
            tag: player_tag,
        });

        let frozen = world.formation.frozen();
        for enemy in world.formation.live_enemies() {
            let tag = if frozen {
                VisualTag::Frozen
            } else if enemy.is_elite() {
                VisualTag::Elite
            } else {
                VisualTag::Plain
            };
            entities.push(EntityView {
                id: enemy.id,
                kind: EntityKind::Enemy,
                pos: enemy.pos,
                tag,
            });
        }

        for (slot, bullet) in world.bullets.iter_live() {
            entities.push(EntityView {
                id: bullet_id(slot),
                kind: EntityKind::Bullet,
                pos: bullet.pos,
                tag: VisualTag::Plain,
            });
        }

        for bonus in world.bonuses.iter().filter(|b| b.alive) {
            entities.push(EntityView {
                id: bonus.id,
                kind: EntityKind::Bonus,
                pos: bonus.pos,
                tag: VisualTag::Bonus(bonus.kind),
            });
        }

        for (slot, explosion) in world.explosions.iter_live() {
            entities.push(EntityView {
                id: explosion_id(slot),
                kind: EntityKind::Explosion,
                pos: explosion.pos,
                tag: VisualTag::Exploding,
            });
        }

        let hud = HudView {
            score: world.player.score,
            lives: world.player.lives,
            wave: world.wave,
            mode: world.mode,
            power: world.player.active_power,
            high_score: world.high_score,
        };

        RenderSnapshot { entities, hud }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn playing_world() -> World {
        let mut world = World::new(Config::default(), 7).unwrap();
        world.start_game();
        world
    }

    #[test]
    fn test_snapshot_counts_live_entities() {
        let world = playing_world();
        let snap = RenderSnapshot::capture(&world);
        // Player plus the full formation
        let expected = 1 + world.formation.live_count();
        assert_eq!(snap.entities.len(), expected);
        assert_eq!(snap.hud.wave, 1);
        assert_eq!(snap.hud.mode, Mode::Playing);
    }

    #[test]
    fn test_shielded_player_tagged() {
        let mut world = playing_world();
        world.player.grant_power(PowerUp::Shield, 60);
        let snap = RenderSnapshot::capture(&world);
        assert_eq!(snap.entities[0].kind, EntityKind::Player);
        assert_eq!(snap.entities[0].tag, VisualTag::Shielded);
        assert_eq!(snap.hud.power, Some((PowerUp::Shield, 60)));
    }

    #[test]
    fn test_frozen_formation_tags_every_enemy() {
        let mut world = playing_world();
        world.formation.freeze(120);
        let snap = RenderSnapshot::capture(&world);
        assert!(
            snap.entities
                .iter()
                .filter(|e| e.kind == EntityKind::Enemy)
                .all(|e| e.tag == VisualTag::Frozen)
        );
    }

    #[test]
    fn test_bonus_carries_its_kind() {
        let mut world = playing_world();
        world.spawn_bonus(BonusKind::RapidFire, Vec2::new(200.0, 200.0));
        let snap = RenderSnapshot::capture(&world);
        let bonus = snap
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Bonus)
            .unwrap();
        assert_eq!(bonus.tag, VisualTag::Bonus(BonusKind::RapidFire));
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = playing_world();
        let snap = RenderSnapshot::capture(&world);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"hud\""));
    }
}
