//! Neon Invaders - a grid-formation arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: deterministic simulation (entities, pooling, broad-phase grid,
//!   formation movement, collision resolution, the tick loop)
//! - `config`: named gameplay tuning values, validated at construction
//! - `highscore`: persisted high-score collaborator
//! - `snapshot`: read-only per-tick view for render/HUD collaborators
//!
//! Rendering, audio, and input devices live outside this crate. A frontend
//! feeds [`sim::tick::TickInput`] in, takes a [`snapshot::RenderSnapshot`]
//! and drained [`sim::state::GameEvent`]s out, once per fixed timestep.

pub mod config;
pub mod highscore;
pub mod sim;
pub mod snapshot;

pub use config::{Config, ConfigError};
pub use highscore::{FileStore, HighScoreStore, MemoryStore};
pub use sim::state::{GameEvent, Mode, World};
pub use sim::tick::{TickInput, tick};
pub use snapshot::{HudView, RenderSnapshot};

/// Fixed play-field geometry and timing.
///
/// Gameplay balance knobs live in [`config::Config`]; these are the few
/// values the simulation geometry itself is defined against.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const TICK_HZ: u32 = 60;
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;

    /// Play-field dimensions. Y grows downward, (0,0) is the top-left corner.
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Side margin the enemy formation sweeps between
    pub const FIELD_MARGIN: f32 = 10.0;

    /// Vertical center of the player ship
    pub const PLAYER_Y: f32 = 560.0;

    /// Entity half-extents; AABBs are derived from center + these
    pub const PLAYER_HALF: (f32, f32) = (22.0, 14.0);
    pub const ENEMY_HALF: (f32, f32) = (18.0, 12.0);
    pub const BULLET_HALF: (f32, f32) = (3.0, 5.0);
    pub const BONUS_HALF: (f32, f32) = (12.0, 12.0);
    pub const EXPLOSION_HALF: (f32, f32) = (16.0, 16.0);
}
