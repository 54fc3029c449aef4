//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::difficulty::update_difficulty;
use super::enemy::{spawn_enemy, update_enemies};
use super::player::update_player;
use super::state::{GameState, Scene};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held: ArrowLeft / a
    pub left: bool,
    /// Held: ArrowRight / d
    pub right: bool,
    /// Pressed this tick: space / ArrowUp / w
    pub jump: bool,
    /// Pressed this tick: x
    pub attack: bool,
    /// Mouse click position (swing + explosion)
    pub fire: Option<Vec2>,
    /// Latest mouse position, if it moved
    pub mouse: Option<Vec2>,
    /// Game-over restart (button, r, Enter)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Scene::GameOver { .. } = state.scene {
        if input.restart {
            log::info!("Restarting");
            state.start_main_scene();
        }
        return;
    }

    state.time += dt;
    state.time_ticks += 1;
    if let Some(mouse) = input.mouse {
        state.mouse = mouse;
    }

    // Shake eases back to zero
    state.screen_shake -= state.screen_shake * (5.0 * dt).min(1.0);
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    update_player(state, input, dt);
    update_enemies(state, dt);

    state.confetti.retain_mut(|c| c.update(dt));
    state.texts.retain_mut(|t| t.update(dt));
    state.explosions.retain_mut(|e| {
        e.ttl -= dt;
        e.ttl > 0.0
    });
    state.kabooms.retain_mut(|k| {
        k.age += dt;
        k.age < KABOOM_SECS
    });

    for _ in 0..state.session.difficulty_clock.advance(dt) {
        update_difficulty(state);
    }
    for _ in 0..state.session.spawn_clock.advance(dt) {
        spawn_enemy(state);
    }

    if let Some(remaining) = state.session.game_over_in {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            let final_score = state.session.final_score.unwrap_or(state.session.score);
            state.enter_game_over(final_score);
        } else {
            state.session.game_over_in = Some(remaining);
        }
    }
}

/// Scripted input for headless runs: chase the nearest enemy, swing when close,
/// click on it every quarter second and restart after a game over
pub fn bot_input(state: &GameState) -> TickInput {
    if let Scene::GameOver { .. } = state.scene {
        return TickInput {
            restart: true,
            ..Default::default()
        };
    }

    let me = state.player.aabb().center();
    let nearest = state
        .enemies
        .iter()
        .filter(|e| !e.is_dying())
        .min_by(|a, b| {
            a.pos
                .distance_squared(me)
                .partial_cmp(&b.pos.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(enemy) = nearest else {
        return TickInput {
            mouse: Some(state.screen_center()),
            ..Default::default()
        };
    };

    let delta = enemy.pos - me;
    TickInput {
        left: delta.x < -80.0,
        right: delta.x > 80.0,
        jump: delta.y < -40.0,
        attack: delta.length() < 90.0,
        fire: (state.time_ticks % 30 == 0).then_some(enemy.pos),
        mouse: Some(enemy.pos),
        restart: false,
    }
}
