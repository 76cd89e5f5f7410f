//! Game state and core simulation aggregate
//!
//! [`World`] owns every entity collection, the pools, the broad-phase grid,
//! and the seeded RNG. Single-writer, one tick at a time; render/audio/HUD
//! collaborators only ever see a post-tick snapshot or drained events.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{Config, ConfigError};
use crate::sim::entity::{
    BONUS_ID_BASE, Bonus, BonusKind, Bullet, EntityId, Explosion, Player,
};
use crate::sim::formation::EnemyFormation;
use crate::sim::grid::SpatialGrid;
use crate::sim::pool::Pool;
use glam::Vec2;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// Title screen; no simulation runs
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-wave; no tick-driven mutation at all
    Paused,
    /// Formation cleared, waiting for acknowledgement
    WaveClear,
    /// Run ended
    GameOver,
}

/// Discrete notifications for the audio collaborator, drained once per tick.
/// Fire-and-forget; nothing in the core depends on who listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerFired,
    EnemyDestroyed { points: u64 },
    PlayerHit { lives_left: u8 },
    ShieldAbsorbed,
    BonusSpawned { kind: BonusKind },
    BonusCollected { kind: BonusKind },
    WaveCleared { wave: u32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}

/// Complete simulation state
#[derive(Debug)]
pub struct World {
    pub mode: Mode,
    /// Current wave, 1-based; only resets on a new game
    pub wave: u32,
    /// Run seed; the RNG is re-seeded from this on every new game
    pub seed: u64,
    pub tick_count: u64,
    pub rng: Pcg32,
    pub player: Player,
    pub formation: EnemyFormation,
    pub bullets: Pool<Bullet>,
    pub explosions: Pool<Explosion>,
    pub bonuses: Vec<Bonus>,
    /// Best persisted score, loaded by the frontend at startup
    pub high_score: u64,
    pub(crate) grid: SpatialGrid,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) config: Config,
    next_bonus_serial: u32,
}

impl World {
    /// Validate the config and build a world sitting at the menu.
    /// This is the only fallible constructor in the crate.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: Mode::Menu,
            wave: 1,
            seed,
            tick_count: 0,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&config),
            formation: EnemyFormation::new(&config, 1),
            bullets: Pool::new(config.bullet_pool_capacity),
            explosions: Pool::new(config.explosion_pool_capacity),
            bonuses: Vec::new(),
            high_score: 0,
            grid: SpatialGrid::new(config.grid_cell_size),
            events: Vec::new(),
            config,
            next_bonus_serial: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return every run-scoped piece of state to its initial value:
    /// pools emptied, formation rebuilt at wave 1, RNG re-seeded.
    fn reset_run(&mut self) {
        self.wave = 1;
        self.tick_count = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.player = Player::new(&self.config);
        self.formation = EnemyFormation::new(&self.config, 1);
        self.bullets.release_all();
        self.explosions.release_all();
        self.bonuses.clear();
        self.next_bonus_serial = 0;
        self.events.clear();
    }

    /// Full reset into a fresh wave-1 game. Synchronous: pooled entities go
    /// back to their pools and the RNG is re-seeded before the next tick.
    pub fn start_game(&mut self) {
        self.reset_run();
        self.mode = Mode::Playing;
        log::info!("new game, seed {}", self.seed);
    }

    /// Abandon the current run. Synchronous like `start_game`: everything
    /// run-scoped is discarded immediately, so a Menu-mode snapshot never
    /// shows leftovers of the abandoned wave.
    pub fn quit_to_menu(&mut self) {
        self.reset_run();
        self.mode = Mode::Menu;
        log::info!("quit to menu");
    }

    /// Build the next wave's formation and clear leftover projectiles.
    /// Called on the Playing entry after a WaveClear acknowledgement.
    pub fn begin_wave(&mut self) {
        self.formation = EnemyFormation::new(&self.config, self.wave);
        self.bullets.release_all();
        self.explosions.release_all();
        self.bonuses.clear();
        self.mode = Mode::Playing;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand this tick's events to the audio/HUD collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a falling bonus at a destroyed enemy's position.
    /// Bonus kind is drawn from the sim RNG by the caller.
    pub fn spawn_bonus(&mut self, kind: BonusKind, pos: Vec2) {
        let id = EntityId(BONUS_ID_BASE + self.next_bonus_serial);
        self.next_bonus_serial = self.next_bonus_serial.wrapping_add(1);
        self.bonuses.push(Bonus {
            id,
            kind,
            pos,
            fall_speed: self.config.bonus_fall_speed,
            alive: true,
        });
        self.push_event(GameEvent::BonusSpawned { kind });
    }

    /// Spawn a pooled explosion marker; exhaustion skips the effect.
    pub fn spawn_explosion(&mut self, pos: Vec2) {
        let Some(slot) = self.explosions.acquire() else {
            log::warn!("explosion pool exhausted, effect skipped");
            return;
        };
        let explosion = self.explosions.get_mut(slot);
        explosion.pos = pos;
        explosion.ticks_left = self.config.explosion_duration_ticks;
    }

    /// Rebuild the broad-phase index from current entity positions.
    /// Runs once per tick, after movement and before resolution; refs in
    /// the grid are only valid until entities move again.
    pub fn rebuild_grid(&mut self) {
        self.grid.clear();
        self.grid.insert(self.player.collider());
        for enemy in self.formation.live_enemies() {
            self.grid.insert(enemy.collider());
        }
        for (slot, bullet) in self.bullets.iter_live() {
            self.grid.insert(crate::sim::entity::ColliderRef {
                id: crate::sim::entity::bullet_id(slot),
                kind: crate::sim::entity::EntityKind::Bullet,
                aabb: bullet.aabb(),
            });
        }
        for bonus in self.bonuses.iter().filter(|b| b.alive) {
            self.grid.insert(bonus.collider());
        }
    }
}
