//! The player character: movement, sword swings, the aim arrow and click explosions

use glam::Vec2;

use super::combat::explosion_damage;
use super::enemy::damage_enemy;
use super::physics::{move_and_collide, step_body, Aabb, Body};
use super::state::{Explosion, FloatingText, GameEvent, GameState, Kaboom};
use super::tick::TickInput;
use super::tween::{Easing, Tween};
use crate::consts::*;
use crate::{angle_to_dir, bezier_point, clamp_to_circle};

/// Arrow head radius
pub const ARROW_HEAD_RADIUS: f32 = 6.0;
/// Arrow start relative to the player's top-left corner
const ARROW_ORIGIN: Vec2 = Vec2::new(40.0, 0.0);
/// Horizontal distance under which the arrow arc flattens out
const ARROW_CENTER_THRESHOLD: f32 = 50.0;
const ARROW_MAX_ARC_HEIGHT: f32 = 100.0;
const ARROW_MIN_RADIUS: f32 = 2.0;
const ARROW_MAX_RADIUS: f32 = 5.0;

/// Outcome of a damage call on the player or an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Immune (hit flash or already dying)
    Ignored,
    Hurt,
    Died,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Swing {
    elapsed: f32,
    out: Tween,
    back: Tween,
}

/// The sword held by the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sword {
    /// Centre of the sprite
    pub pos: Vec2,
    /// Degrees, 0 = blade up, clockwise positive
    pub angle: f32,
    pub flip_x: bool,
    pub attacking: bool,
    swing: Option<Swing>,
}

impl Sword {
    fn new(player_pos: Vec2) -> Self {
        let mut sword = Self {
            pos: Vec2::ZERO,
            angle: 0.0,
            flip_x: false,
            attacking: false,
            swing: None,
        };
        sword.follow(player_pos, false);
        sword
    }

    pub fn rest_angle(flip_x: bool) -> f32 {
        if flip_x { -30.0 } else { 30.0 }
    }

    /// Begin a swing toward the facing side. Returns false while one is already running.
    pub fn start_swing(&mut self, flip_x: bool) -> bool {
        if self.attacking {
            return false;
        }
        let end = if flip_x { -90.0 } else { 90.0 };
        self.attacking = true;
        self.swing = Some(Swing {
            elapsed: 0.0,
            out: Tween::new(self.angle, end, SWORD_SWING_SECS, Easing::EaseInOutQuad),
            back: Tween::new(
                end,
                Self::rest_angle(flip_x),
                SWORD_SWING_SECS,
                Easing::EaseOutQuad,
            ),
        });
        true
    }

    fn advance(&mut self, dt: f32) {
        let Some(swing) = self.swing.as_mut() else {
            return;
        };
        swing.elapsed += dt;
        if swing.elapsed < SWORD_SWING_SECS {
            swing.out.advance(dt);
            self.angle = swing.out.value();
        } else if swing.elapsed < SWORD_SWING_SECS * 2.0 {
            swing.out.elapsed = SWORD_SWING_SECS;
            swing.back.elapsed = swing.elapsed - SWORD_SWING_SECS;
            self.angle = swing.back.value();
        } else {
            self.angle = swing.back.to;
            self.attacking = false;
            self.swing = None;
        }
    }

    /// Track the hand position; the rest pose mirrors the player unless mid-swing
    fn follow(&mut self, player_pos: Vec2, flip_x: bool) {
        let x_offset = if flip_x { 10.0 } else { 60.0 };
        self.pos = player_pos + Vec2::new(x_offset, 60.0);
        if !self.attacking {
            self.flip_x = flip_x;
            self.angle = Self::rest_angle(flip_x);
        }
    }

    /// Sample points along the blade, hilt to tip
    pub fn blade_points(&self) -> [Vec2; 5] {
        let dir = angle_to_dir(self.angle);
        let hilt = self.pos - dir * (SWORD_LENGTH * 0.5);
        std::array::from_fn(|i| hilt + dir * (SWORD_LENGTH * i as f32 / 4.0))
    }

    pub fn touches(&self, aabb: &Aabb) -> bool {
        self.blade_points()
            .iter()
            .any(|p| aabb.overlaps_circle(*p, SWORD_WIDTH * 0.5))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowSegment {
    pub pos: Vec2,
    pub radius: f32,
}

/// Curved arrow from the player's head to the (clamped) mouse position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimArrow {
    pub segments: [ArrowSegment; ARROW_SEGMENTS],
    pub head: Vec2,
}

impl AimArrow {
    pub fn compute(player_pos: Vec2, mouse: Vec2) -> Self {
        let start = player_pos + ARROW_ORIGIN;
        let target = clamp_to_circle(player_pos, mouse, MAX_ATTACK_DISTANCE);
        let chord = target - start;
        let dist = chord.length();

        let radius_at = |t: f32| ARROW_MIN_RADIUS + t * (ARROW_MAX_RADIUS - ARROW_MIN_RADIUS);
        let last = (ARROW_SEGMENTS - 1) as f32;

        if dist <= f32::EPSILON {
            return Self {
                segments: std::array::from_fn(|i| ArrowSegment {
                    pos: target,
                    radius: radius_at(i as f32 / last),
                }),
                head: target,
            };
        }

        // Bend away from the player's side; flatten when the target is almost straight above/below
        let arc_dir = if chord.x.abs() < ARROW_CENTER_THRESHOLD {
            -(chord.x / ARROW_CENTER_THRESHOLD)
        } else {
            -chord.x.signum()
        };
        let arc_height = (dist * 0.5).min(ARROW_MAX_ARC_HEIGHT) * arc_dir.abs().min(1.0);
        let perp = Vec2::new(-chord.y / dist, chord.x / dist) * arc_dir;

        let ctrl1 = start + chord * 0.25 + perp * arc_height;
        let ctrl2 = start + chord * 0.75 + perp * arc_height;

        let segments = std::array::from_fn(|i| {
            let t = i as f32 / last;
            ArrowSegment {
                pos: Vec2::new(
                    bezier_point(t, start.x, ctrl1.x, ctrl2.x, target.x),
                    bezier_point(t, start.y, ctrl1.y, ctrl2.y, target.y),
                ),
                radius: radius_at(t),
            }
        });

        Self {
            segments,
            head: target,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    pub flip_x: bool,
    /// Remaining red flash (and damage immunity)
    pub hit_timer: f32,
    pub alive: bool,
    pub sword: Sword,
    pub arrow: AimArrow,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            body: Body::default(),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            flip_x: false,
            hit_timer: 0.0,
            alive: true,
            sword: Sword::new(pos),
            arrow: AimArrow::compute(pos, pos),
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_top_left(self.pos, Self::size())
    }

    pub fn is_flashing(&self) -> bool {
        self.hit_timer > 0.0
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health as f32 / self.max_health as f32).max(0.0)
    }

    /// Top-left of the health bar
    pub fn health_bar_pos(&self) -> Vec2 {
        self.pos + Vec2::new(5.0, -40.0)
    }

    pub fn damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive || self.is_flashing() {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        self.hit_timer = HIT_FLASH_SECS;
        if self.health <= 0 {
            self.alive = false;
            DamageOutcome::Died
        } else {
            DamageOutcome::Hurt
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    fn set_aabb(&mut self, aabb: Aabb) {
        self.pos = aabb.min;
    }
}

/// Per-tick player update: input, physics, sword and arrow
pub fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    state.player.hit_timer = (state.player.hit_timer - dt).max(0.0);
    if !state.player.alive {
        return;
    }

    let mut intent = Vec2::ZERO;
    if input.left {
        intent.x -= PLAYER_SPEED;
        state.player.flip_x = true;
    }
    if input.right {
        intent.x += PLAYER_SPEED;
        state.player.flip_x = false;
    }

    if input.jump && state.player.body.grounded {
        state.player.body.jump(PLAYER_JUMP_FORCE);
        state.events.push(GameEvent::Jump);
    }

    if input.attack {
        attack(state);
    }
    if let Some(target) = input.fire {
        fire(state, target);
    }

    let statics = state.statics();
    let player = &mut state.player;
    let mut aabb = player.aabb();
    step_body(&mut aabb, &mut player.body, intent, &statics, dt);
    player.set_aabb(aabb);

    player.sword.advance(dt);
    player.sword.follow(player.pos, player.flip_x);
    player.arrow = AimArrow::compute(player.pos, state.mouse);
}

/// Swing the sword (ignored mid-swing)
pub fn attack(state: &mut GameState) {
    let flip_x = state.player.flip_x;
    if state.player.sword.start_swing(flip_x) {
        state.events.push(GameEvent::SwordSwing);
    }
}

/// Click attack: swing, then blow up the clamped target point
pub fn fire(state: &mut GameState, target: Vec2) {
    attack(state);

    let center = clamp_to_circle(state.player.pos, target, MAX_ATTACK_DISTANCE);
    log::debug!("Creating explosion at {}, {}", center.x, center.y);

    state.kabooms.push(Kaboom::new(center, 1.0));
    state.explosions.push(Explosion {
        pos: center,
        radius: EXPLOSION_RADIUS,
        ttl: EXPLOSION_VISIBLE_SECS,
    });
    state.events.push(GameEvent::Explosion { pos: center });

    for idx in 0..state.enemies.len() {
        let dist = state.enemies[idx].pos.distance(center);
        if let Some(damage) = explosion_damage(dist) {
            log::debug!("Explosion damage to enemy: {damage}, distance: {dist}");
            damage_enemy(state, idx, damage);
        }
    }

    state.add_shake(SHAKE_ON_EXPLOSION);
}

/// Apply damage to the player; death starts the game-over countdown
pub fn damage_player(state: &mut GameState, amount: i32) {
    match state.player.damage(amount) {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hurt => state.events.push(GameEvent::PlayerHurt { amount }),
        DamageOutcome::Died => {
            state.events.push(GameEvent::PlayerHurt { amount });
            state.kabooms.push(Kaboom::new(state.player.pos, 1.0));
            state.add_shake(SHAKE_ON_DEATH);

            let session = &mut state.session;
            session.active = false;
            session.final_score = Some(session.score);
            session.game_over_in = Some(GAME_OVER_DELAY);
            state.events.push(GameEvent::PlayerDied);
            log::info!("Player died at level {}", session.difficulty.level);
        }
    }
}

/// Heal the player and float a "+N HP" text above them
pub fn heal_player(state: &mut GameState, amount: i32) {
    if !state.player.alive {
        return;
    }
    state.player.heal(amount);

    let id = state.next_entity_id();
    let pos = state.player.pos + Vec2::new(0.0, -60.0);
    state.texts.push(FloatingText::heal(id, amount, pos));
    state.events.push(GameEvent::Healed { amount });
}

/// Push the player by `delta` (knockback), blocked by the arena
pub fn knock_player(state: &mut GameState, delta: Vec2) {
    let statics = state.statics();
    let mut aabb = state.player.aabb();
    move_and_collide(&mut aabb, delta, &statics);
    state.player.set_aabb(aabb);
}
