//! Fixed timestep simulation tick
//!
//! One call advances everything exactly once: player input, formation
//! movement and fire, projectile/bonus motion, broad-phase rebuild,
//! collision resolution, then the win/loss evaluation that may move the
//! state machine. Timers count ticks, never wall clock.

use glam::Vec2;

use crate::consts::*;
use crate::highscore::HighScoreStore;
use crate::sim::collide;
use crate::sim::entity::{BulletOwner, PowerUp};
use crate::sim::state::{GameEvent, Mode, World};

/// Input signals for a single tick.
///
/// Movement and fire are level-triggered (held); start/pause/quit/confirm
/// must arrive as single-tick pulses. [`TickInput::edges`] derives those
/// pulses from two consecutive held states so a held pause key does not
/// toggle every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub start: bool,
    pub pause: bool,
    pub quit: bool,
    pub confirm: bool,
}

impl TickInput {
    /// Turn raw held state into per-tick input: level-triggered signals
    /// pass through, edge-triggered ones pulse on the press transition.
    pub fn edges(prev_held: &TickInput, held: &TickInput) -> TickInput {
        TickInput {
            left: held.left,
            right: held.right,
            fire: held.fire,
            start: held.start && !prev_held.start,
            pause: held.pause && !prev_held.pause,
            quit: held.quit && !prev_held.quit,
            confirm: held.confirm && !prev_held.confirm,
        }
    }
}

/// Advance the game by one fixed timestep.
///
/// `scores` is the persistence collaborator; it is only called on the
/// Playing -> GameOver transition, and only when the run beat the record.
pub fn tick(world: &mut World, input: &TickInput, scores: &mut dyn HighScoreStore) {
    match world.mode {
        Mode::Menu => {
            if input.start {
                world.start_game();
            }
        }
        Mode::Paused => {
            if input.pause {
                world.mode = Mode::Playing;
            } else if input.quit {
                world.quit_to_menu();
            }
        }
        Mode::WaveClear => {
            if input.quit {
                world.quit_to_menu();
            } else if input.confirm || input.start {
                world.begin_wave();
            }
        }
        Mode::GameOver => {
            if input.start {
                world.start_game();
            } else if input.confirm {
                world.quit_to_menu();
            }
        }
        Mode::Playing => playing_tick(world, input, scores),
    }
}

fn playing_tick(world: &mut World, input: &TickInput, scores: &mut dyn HighScoreStore) {
    if input.pause {
        world.mode = Mode::Paused;
        return;
    }
    if input.quit {
        world.quit_to_menu();
        return;
    }

    world.tick_count += 1;

    // --- Player movement and fire (level-triggered) ---
    let dir = (input.right as i8 - input.left as i8) as f32;
    let half = PLAYER_HALF.0;
    world.player.pos.x = (world.player.pos.x + dir * world.config.player_speed * SIM_DT)
        .clamp(half, FIELD_WIDTH - half);

    if world.player.fire_cooldown > 0 {
        world.player.fire_cooldown -= 1;
    }
    if input.fire {
        try_fire(world);
    }

    // --- Formation movement and enemy fire ---
    // Capture frozen-ness before advance decrements the timer so fire and
    // movement are suspended for the same set of ticks.
    let frozen = world.formation.frozen();
    world.formation.advance(SIM_DT);
    if !frozen {
        world
            .formation
            .maybe_fire(&mut world.rng, &world.config, &mut world.bullets);
    }

    // --- Projectiles, bonuses, explosion timers ---
    advance_bullets(world);
    advance_bonuses(world);
    advance_explosions(world);

    // --- Broad phase + resolution ---
    world.rebuild_grid();
    collide::resolve(world);
    world.bonuses.retain(|b| b.alive);

    // Power-up countdown, fixed tick duration
    world.player.tick_timers();

    // --- Win/loss evaluation ---
    if world.formation.is_empty() {
        world.player.score += world.config.wave_clear_bonus;
        let wave = world.wave;
        world.push_event(GameEvent::WaveCleared { wave });
        world.wave += 1;
        world.mode = Mode::WaveClear;
        log::info!("wave {wave} cleared, score {}", world.player.score);
    } else if world.player.lives == 0
        || world.formation.reached_defense_line(world.config.defense_line_y)
    {
        world.mode = Mode::GameOver;
        let score = world.player.score;
        world.push_event(GameEvent::GameOver { score });
        if score > world.high_score {
            world.high_score = score;
            scores.save(score);
            world.push_event(GameEvent::NewHighScore { score });
        }
        log::info!("game over, score {score}");
    }
}

/// Fire one bullet, or three angled lanes under TripleShot. Pool
/// exhaustion skips the rest of the volley; the cooldown only starts if
/// something actually spawned.
fn try_fire(world: &mut World) {
    if world.player.fire_cooldown > 0 {
        return;
    }

    let speed = world.config.player_bullet_speed;
    let spread = world.config.triple_shot_spread;
    let lane_offset = world.config.triple_shot_lane_offset;
    let damage = world.config.bullet_damage;
    let triple = world.player.has_power(PowerUp::TripleShot);
    let lanes: &[i8] = if triple { &[-1, 0, 1] } else { &[0] };

    let muzzle = Vec2::new(world.player.pos.x, world.player.pos.y - PLAYER_HALF.1);
    let mut spawned = false;
    for &lane in lanes {
        let Some(slot) = world.bullets.acquire() else {
            log::warn!("bullet pool exhausted, player shot skipped");
            break;
        };
        let bullet = world.bullets.get_mut(slot);
        bullet.owner = BulletOwner::Player;
        bullet.pos = muzzle + Vec2::new(lane as f32 * lane_offset, 0.0);
        bullet.vel = Vec2::new(lane as f32 * spread * speed, -speed);
        bullet.damage = damage;
        bullet.lane = lane;
        spawned = true;
    }

    if spawned {
        let cooldown = if world.player.has_power(PowerUp::RapidFire) {
            world.config.fire_cooldown_ticks / world.config.rapid_fire_divisor
        } else {
            world.config.fire_cooldown_ticks
        };
        world.player.fire_cooldown = cooldown.max(1);
        world.push_event(GameEvent::PlayerFired);
    }
}

fn advance_bullets(world: &mut World) {
    let mut off_field = Vec::new();
    for (slot, bullet) in world.bullets.iter_live_mut() {
        bullet.pos += bullet.vel * SIM_DT;
        if bullet.off_field() {
            off_field.push(slot);
        }
    }
    for slot in off_field {
        world.bullets.release(slot);
    }
}

fn advance_bonuses(world: &mut World) {
    for bonus in world.bonuses.iter_mut().filter(|b| b.alive) {
        bonus.pos.y += bonus.fall_speed * SIM_DT;
        if bonus.pos.y - BONUS_HALF.1 > FIELD_HEIGHT {
            bonus.alive = false;
        }
    }
}

fn advance_explosions(world: &mut World) {
    let mut expired = Vec::new();
    for (slot, explosion) in world.explosions.iter_live_mut() {
        explosion.ticks_left = explosion.ticks_left.saturating_sub(1);
        if explosion.ticks_left == 0 {
            expired.push(slot);
        }
    }
    for slot in expired {
        world.explosions.release(slot);
    }
}
