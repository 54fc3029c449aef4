//! Turns a `GameState` into one triangle list, back to front

use glam::Vec2;

use super::shapes::{circle, ellipse, rect, rect_outline, ring, rotated_rect};
use super::vertex::{colors, rgba, Vertex};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{ConfettiShape, Enemy, GameState, Player, Scene, Sword};

const GROUND_OUTLINE: f32 = 4.0;
const BODY_OUTLINE: f32 = 3.0;
const RANGE_OPACITY: f32 = 0.1;
const ARROW_OPACITY: f32 = 0.5;
const ARROW_OUTLINE: f32 = 1.5;
const HEALTH_BG_OPACITY: f32 = 0.9;
const EXPLOSION_OPACITY: f32 = 0.3;
const GAME_OVER_DIM: f32 = 0.7;
const HILT_SIZE: Vec2 = Vec2::new(18.0, 4.0);

/// Build the frame's vertices in screen pixels
pub fn build_vertices(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let mut out = Vec::with_capacity(4096);

    // The game-over scene only shows the dimmed backdrop under the DOM overlay
    if let Scene::GameOver { .. } = state.scene {
        out.extend(rect(
            Vec2::ZERO,
            Vec2::new(state.width, state.height),
            rgba([0, 0, 0], GAME_OVER_DIM),
        ));
        return out;
    }

    // World geometry
    for wall in &state.walls {
        let size = wall.aabb.size();
        out.extend(rect(wall.aabb.min, size, rgba(WALL_COLOR, wall.opacity)));
        if wall.opacity >= 1.0 {
            out.extend(rect_outline(
                wall.aabb.min,
                size,
                GROUND_OUTLINE,
                rgba(colors::OUTLINE, 1.0),
            ));
        }
    }

    // Bodies and effects
    for enemy in &state.enemies {
        draw_enemy(&mut out, enemy, segments);
    }
    if state.player.alive {
        draw_player(&mut out, &state.player, segments);
    }
    for explosion in &state.explosions {
        out.extend(circle(
            explosion.pos,
            explosion.radius,
            rgba(colors::EXPLOSION, EXPLOSION_OPACITY),
            segments * 2,
        ));
    }
    for kaboom in &state.kabooms {
        let t = kaboom.progress();
        let alpha = 1.0 - t;
        let radius = (20.0 + 60.0 * t) * kaboom.scale;
        out.extend(circle(
            kaboom.pos,
            radius * 0.6,
            rgba(colors::KABOOM_CORE, alpha),
            segments,
        ));
        out.extend(ring(
            kaboom.pos,
            radius * 0.8,
            radius,
            rgba(colors::KABOOM_RING, alpha),
            segments,
        ));
    }

    if state.player.alive {
        if settings.show_range_indicator {
            out.extend(circle(
                state.player.pos,
                MAX_ATTACK_DISTANCE,
                rgba(colors::RANGE, RANGE_OPACITY),
                segments * 3,
            ));
        }
        draw_arrow(&mut out, &state.player, segments);
    }

    // Health bars: backgrounds first, then fills and the sword on top
    let player_bar = state.player.alive.then(|| {
        bar(
            state.player.health_bar_pos(),
            PLAYER_HEALTH_BAR_WIDTH,
            PLAYER_HEALTH_BAR_HEIGHT,
            state.player.health_fraction(),
        )
    });
    let enemy_bars: Vec<_> = state
        .enemies
        .iter()
        .filter(|e| !e.is_dying())
        .map(|e| {
            bar(
                e.health_bar_pos(),
                ENEMY_HEALTH_BAR_WIDTH,
                ENEMY_HEALTH_BAR_HEIGHT,
                e.health_fraction(),
            )
        })
        .collect();
    let bars = || player_bar.iter().chain(enemy_bars.iter());

    for b in bars() {
        out.extend(rect(b.pos, b.size, rgba(colors::HEALTH_BG, HEALTH_BG_OPACITY)));
    }
    for b in bars() {
        let fill = Vec2::new(b.size.x * b.fraction, b.size.y);
        if fill.x > 0.0 {
            out.extend(rect(b.pos, fill, rgba(colors::HEALTH, 1.0)));
        }
    }
    if state.player.alive {
        draw_sword(&mut out, &state.player.sword);
    }

    // Confetti, capped by the quality preset
    for c in state.confetti.iter().take(settings.max_particles()) {
        let color = rgba(c.color, c.opacity);
        match c.shape {
            ConfettiShape::Circle { radius } => out.extend(circle(c.pos, radius, color, 8)),
            ConfettiShape::Rect { width, height } => {
                out.extend(rotated_rect(c.pos, Vec2::new(width, height), c.angle, color))
            }
        }
    }

    out
}

/// Frame offset for the current shake intensity
pub fn shake_offset(state: &GameState, settings: &Settings) -> Vec2 {
    if !settings.effective_screen_shake() || state.screen_shake < 0.01 {
        return Vec2::ZERO;
    }
    let t = state.time;
    Vec2::new((t * 97.0).sin(), (t * 131.0).cos()) * state.screen_shake
}

struct Bar {
    pos: Vec2,
    size: Vec2,
    fraction: f32,
}

fn bar(pos: Vec2, width: f32, height: f32, fraction: f32) -> Bar {
    Bar {
        pos,
        size: Vec2::new(width, height),
        fraction: fraction.clamp(0.0, 1.0),
    }
}

fn draw_player(out: &mut Vec<Vertex>, player: &Player, segments: u32) {
    let size = Player::size();
    let flash = player.is_flashing();
    let body = if flash { colors::HIT_FLASH } else { colors::PLAYER_BODY };
    let skin = if flash { colors::HIT_FLASH } else { colors::PLAYER_SKIN };

    // Torso in the lower half, head on top
    let torso_pos = player.pos + Vec2::new(size.x * 0.2, size.y * 0.45);
    let torso_size = Vec2::new(size.x * 0.6, size.y * 0.55);
    out.extend(rect(torso_pos, torso_size, rgba(body, 1.0)));
    out.extend(rect_outline(
        torso_pos,
        torso_size,
        BODY_OUTLINE,
        rgba(colors::OUTLINE, 1.0),
    ));

    let head = player.pos + Vec2::new(size.x * 0.5, size.y * 0.25);
    let head_r = size.y * 0.22;
    out.extend(circle(head, head_r + BODY_OUTLINE, rgba(colors::OUTLINE, 1.0), segments));
    out.extend(circle(head, head_r, rgba(skin, 1.0), segments));

    let facing = if player.flip_x { -1.0 } else { 1.0 };
    let eye = head + Vec2::new(facing * head_r * 0.4, -head_r * 0.1);
    out.extend(circle(eye, 2.5, rgba(colors::PUPIL, 1.0), 8));
}

fn draw_enemy(out: &mut Vec<Vertex>, enemy: &Enemy, segments: u32) {
    let fade = enemy.fade();
    if fade <= 0.0 {
        return;
    }
    let radii = Enemy::size() * 0.5 * fade;
    let fill = if enemy.is_flashing() {
        colors::HIT_FLASH
    } else {
        colors::BEAN
    };

    out.extend(ellipse(
        enemy.pos,
        radii + Vec2::splat(BODY_OUTLINE * fade),
        rgba(colors::OUTLINE, fade),
        segments,
    ));
    out.extend(ellipse(enemy.pos, radii, rgba(fill, fade), segments));

    let facing = if enemy.flip_x { -1.0 } else { 1.0 };
    for dx in [0.1, 0.45] {
        let eye = enemy.pos + Vec2::new(facing * radii.x * dx, -radii.y * 0.3);
        out.extend(circle(eye, 6.0 * fade, rgba(colors::EYE_WHITE, fade), 10));
        out.extend(circle(
            eye + Vec2::new(facing * 2.0 * fade, 0.0),
            2.5 * fade,
            rgba(colors::PUPIL, fade),
            8,
        ));
    }
}

fn draw_arrow(out: &mut Vec<Vertex>, player: &Player, segments: u32) {
    let fill = rgba(colors::ARROW_FILL, ARROW_OPACITY);
    let outline = rgba(colors::ARROW_OUTLINE, ARROW_OPACITY);
    let mut dot = |pos: Vec2, radius: f32| {
        out.extend(circle(pos, radius, fill, segments / 2));
        out.extend(ring(pos, radius, radius + ARROW_OUTLINE, outline, segments / 2));
    };
    for seg in &player.arrow.segments {
        dot(seg.pos, seg.radius);
    }
    dot(player.arrow.head, crate::sim::player::ARROW_HEAD_RADIUS);
}

fn draw_sword(out: &mut Vec<Vertex>, sword: &Sword) {
    let dir = crate::angle_to_dir(sword.angle);
    out.extend(rotated_rect(
        sword.pos,
        Vec2::new(SWORD_WIDTH + 2.0, SWORD_LENGTH + 2.0),
        sword.angle,
        rgba(colors::OUTLINE, 1.0),
    ));
    out.extend(rotated_rect(
        sword.pos,
        Vec2::new(SWORD_WIDTH, SWORD_LENGTH),
        sword.angle,
        rgba(colors::BLADE, 1.0),
    ));
    let guard = sword.pos - dir * (SWORD_LENGTH * 0.3);
    out.extend(rotated_rect(guard, HILT_SIZE, sword.angle, rgba(colors::HILT, 1.0)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn_confetti;

    fn state() -> GameState {
        GameState::new(7, 800.0, 600.0)
    }

    #[test]
    fn test_fresh_state_draws_something_finite() {
        let verts = build_vertices(&state(), &Settings::default());
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
        assert!(verts.iter().all(|v| Vec2::from(v.position).is_finite()));
    }

    #[test]
    fn test_range_indicator_toggle() {
        let s = state();
        let on = build_vertices(&s, &Settings::default());
        let off = build_vertices(
            &s,
            &Settings {
                show_range_indicator: false,
                ..Settings::default()
            },
        );
        assert!(on.len() > off.len());
    }

    #[test]
    fn test_confetti_capped_by_settings() {
        let mut s = state();
        let center = s.screen_center();
        for _ in 0..4 {
            let burst = spawn_confetti(&mut s.rng, center);
            s.confetti.extend(burst);
        }
        let without = Settings {
            confetti: false,
            ..Settings::default()
        };
        let base = build_vertices(&s, &without).len();
        let low = Settings::from_preset(crate::QualityPreset::Low);
        let capped = build_vertices(&s, &low).len();
        // Each particle is at most 8 triangles
        assert!(capped > base);
        assert!(capped - base <= low.max_particles() * 24);
    }

    #[test]
    fn test_game_over_dims_screen() {
        let mut s = state();
        s.enter_game_over(42);
        let verts = build_vertices(&s, &Settings::default());
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.color == [0.0, 0.0, 0.0, GAME_OVER_DIM]));
    }

    #[test]
    fn test_shake_offset_respects_settings() {
        let mut s = state();
        s.add_shake(10.0);
        s.time = 0.37;
        let on = shake_offset(&s, &Settings::default());
        assert!(on.length() > 0.0 && on.length() <= 10.0 * std::f32::consts::SQRT_2);
        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(shake_offset(&s, &calm), Vec2::ZERO);
    }
}
