//! Bean enemies: seek the player, hurt on contact, die in a burst of confetti

use glam::Vec2;
use rand::Rng;

use super::combat::{center_spawn_chance, contact_damage, points_per_kill, respawn_chance};
use super::confetti::spawn_confetti;
use super::physics::{depenetrate, step_body, Aabb, Body};
use super::player::{damage_player, heal_player, knock_player, DamageOutcome};
use super::state::{GameEvent, GameState};
use super::tween::{Easing, Tween};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    /// Centre of the body
    pub pos: Vec2,
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    pub flip_x: bool,
    pub hit_timer: f32,
    /// Scene time of the last contact hit on the player
    pub last_contact: Option<f32>,
    /// Whether the sword blade overlapped this enemy last tick
    pub sword_contact: bool,
    /// Shrink/fade animation, present once dying
    pub dying: Option<Tween>,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            body: Body::default(),
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            flip_x: false,
            hit_timer: 0.0,
            last_contact: None,
            sword_contact: false,
            dying: None,
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(ENEMY_SIZE.0, ENEMY_SIZE.1)
    }

    /// Collision box, unaffected by the death shrink
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Self::size())
    }

    pub fn is_dying(&self) -> bool {
        self.dying.is_some()
    }

    pub fn is_flashing(&self) -> bool {
        self.hit_timer > 0.0
    }

    /// Scale and opacity (both follow the death tween)
    pub fn fade(&self) -> f32 {
        self.dying.map_or(1.0, |t| t.value())
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health as f32 / self.max_health as f32).max(0.0)
    }

    /// Top-left of the health bar
    pub fn health_bar_pos(&self) -> Vec2 {
        self.pos - Vec2::new(20.0, 30.0)
    }

    pub fn damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dying() {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        self.hit_timer = HIT_FLASH_SECS;
        log::debug!("Enemy damaged: {amount}, health: {}", self.health);

        if self.health <= 0 {
            self.dying = Some(Tween::new(1.0, 0.0, ENEMY_DEATH_SECS, Easing::EaseInQuad));
            DamageOutcome::Died
        } else {
            DamageOutcome::Hurt
        }
    }

    fn set_aabb(&mut self, aabb: Aabb) {
        self.pos = aabb.center();
    }
}

/// Damage the enemy at `idx`, emitting hit/death effects
pub fn damage_enemy(state: &mut GameState, idx: usize, amount: i32) {
    let Some(enemy) = state.enemies.get_mut(idx) else {
        return;
    };
    let (id, pos) = (enemy.id, enemy.pos);
    match enemy.damage(amount) {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hurt => state.events.push(GameEvent::EnemyHit { id }),
        DamageOutcome::Died => {
            state.events.push(GameEvent::EnemyHit { id });
            state.events.push(GameEvent::EnemyKilled { id, pos });
            let particles = spawn_confetti(&mut state.rng, pos);
            state.confetti.extend(particles);
        }
    }
}

/// Per-tick enemy update: seek, physics, contact damage, sword hits, death animations
pub fn update_enemies(state: &mut GameState, dt: f32) {
    let statics = state.statics();

    for idx in 0..state.enemies.len() {
        let target = state.player.pos;
        let enemy = &mut state.enemies[idx];
        enemy.hit_timer = (enemy.hit_timer - dt).max(0.0);

        if let Some(tween) = enemy.dying.as_mut() {
            tween.advance(dt);
            continue;
        }

        let dir = target - enemy.pos;
        let dist = dir.length();
        let mut intent = Vec2::ZERO;
        if dist > ENEMY_STOP_DISTANCE {
            let unit = dir / dist;
            intent = unit * ENEMY_SPEED;
            if unit.x != 0.0 {
                enemy.flip_x = unit.x < 0.0;
            }
        }

        let mut aabb = enemy.aabb();
        step_body(&mut aabb, &mut enemy.body, intent, &statics, dt);
        enemy.set_aabb(aabb);

        if !state.player.alive {
            enemy.sword_contact = false;
            continue;
        }

        // Contact damage with cooldown
        let cooled_down = enemy
            .last_contact
            .is_none_or(|t| state.time - t > ENEMY_CONTACT_COOLDOWN);
        if cooled_down && enemy.aabb().overlaps(&state.player.aabb()) {
            enemy.last_contact = Some(state.time);
            let knockback =
                (state.player.pos - enemy.pos).normalize_or_zero() * ENEMY_KNOCKBACK * dt;
            damage_player(state, contact_damage(state.session.difficulty.level));
            knock_player(state, knockback);
        }

        // Sword hits register when the blade starts touching
        let enemy = &state.enemies[idx];
        let touching = state.player.sword.touches(&enemy.aabb());
        let hit = touching
            && !enemy.sword_contact
            && state.player.sword.attacking
            && !enemy.is_flashing();
        state.enemies[idx].sword_contact = touching;
        if hit {
            damage_enemy(state, idx, SWORD_DAMAGE);
        }
    }

    remove_finished(state);
}

/// Drop enemies whose death animation ended and pay out the kill
fn remove_finished(state: &mut GameState) {
    let mut destroyed = 0;
    state.enemies.retain(|e| {
        let done = e.dying.is_some_and(|t| t.finished());
        if done {
            destroyed += 1;
        }
        !done
    });

    for _ in 0..destroyed {
        on_enemy_destroyed(state);
    }
}

fn on_enemy_destroyed(state: &mut GameState) {
    let level = state.session.difficulty.level;
    let points = points_per_kill(level);
    state.session.score += points;
    state.events.push(GameEvent::Scored {
        points,
        total: state.session.score,
    });

    heal_player(state, HEAL_ON_KILL);

    if state.rng.random::<f32>() < respawn_chance(level) {
        spawn_enemy(state);
    }
}

/// Spawn one enemy at a side wall (or mid-air at higher levels), respecting the cap
pub fn spawn_enemy(state: &mut GameState) {
    if !state.session.active {
        return;
    }
    let difficulty = state.session.difficulty;
    if state.enemies.len() >= difficulty.max_enemies {
        return;
    }

    let (w, h) = (state.width, state.height);
    let side_y_range = 20.0..(h - GROUND_HEIGHT).max(21.0);

    let pos = if state.rng.random::<f32>() < center_spawn_chance(difficulty.level) {
        Vec2::new(
            w * state.rng.random_range(0.3_f32..0.7),
            h * state.rng.random_range(0.2_f32..0.7),
        )
    } else if state.rng.random_range(0..2) == 0 {
        Vec2::new(10.0, state.rng.random_range(side_y_range))
    } else {
        Vec2::new(w - 10.0, state.rng.random_range(side_y_range))
    };

    let id = state.next_entity_id();
    let mut enemy = Enemy::new(id, pos);
    let mut aabb = enemy.aabb();
    depenetrate(&mut aabb, &state.statics());
    enemy.set_aabb(aabb);

    log::debug!("Spawned enemy {id} at {}, {}", enemy.pos.x, enemy.pos.y);
    state.enemies.push(enemy);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let mut state = GameState::new(11, 1280.0, 720.0);
        state.events.clear();
        state
    }

    #[test]
    fn test_enemy_damage_and_death() {
        let mut enemy = Enemy::new(1, Vec2::ZERO);
        assert_eq!(enemy.damage(35), DamageOutcome::Hurt);
        assert_eq!(enemy.health, 65);
        assert!(enemy.is_flashing());
        assert_eq!(enemy.damage(70), DamageOutcome::Died);
        assert!(enemy.is_dying());
        assert_eq!(enemy.damage(10), DamageOutcome::Ignored);
        assert_eq!(enemy.health, -5);
    }

    #[test]
    fn test_enemy_seeks_player() {
        let mut state = state();
        let start = Vec2::new(900.0, state.player.pos.y);
        state.enemies.push(Enemy::new(99, start));
        update_enemies(&mut state, 0.1);
        let enemy = &state.enemies[0];
        assert!(enemy.pos.x < start.x);
        assert!(enemy.flip_x);
    }

    #[test]
    fn test_contact_damage_has_cooldown() {
        let mut state = state();
        let on_player = state.player.aabb().center();
        state.enemies.push(Enemy::new(5, on_player));
        state.time = 1.0;

        update_enemies(&mut state, 1.0 / 120.0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 5);
        assert_eq!(state.enemies[0].last_contact, Some(1.0));

        // Within the cooldown: no damage even after the flash expires
        state.player.hit_timer = 0.0;
        state.time = 1.3;
        state.enemies[0].pos = state.player.aabb().center();
        update_enemies(&mut state, 1.0 / 120.0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 5);

        state.player.hit_timer = 0.0;
        state.time = 1.6;
        state.enemies[0].pos = state.player.aabb().center();
        update_enemies(&mut state, 1.0 / 120.0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 10);
    }

    #[test]
    fn test_kill_awards_score_and_heals() {
        let mut state = state();
        state.player.health = 50;
        state.enemies.push(Enemy::new(5, Vec2::new(600.0, 300.0)));
        damage_enemy(&mut state, 0, 200);
        assert_eq!(state.confetti.len(), 50);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyKilled { id: 5, .. })));

        // Still counted while the death animation runs
        update_enemies(&mut state, 0.25);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].fade() < 1.0);

        update_enemies(&mut state, 0.3);
        assert!(state.enemies.iter().all(|e| e.id != 5));
        assert_eq!(state.session.score, 11);
        assert_eq!(state.player.health, 55);
        assert!(state.texts.iter().any(|t| t.text == "+5 HP"));
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut state = state();
        for _ in 0..20 {
            spawn_enemy(&mut state);
        }
        assert_eq!(state.enemies.len(), INITIAL_MAX_ENEMIES);
        let statics = state.statics();
        for enemy in &state.enemies {
            assert!(statics.iter().all(|s| !enemy.aabb().overlaps(s)));
            assert!(enemy.pos.x < 100.0 || enemy.pos.x > 1180.0);
        }
    }

    #[test]
    fn test_no_spawn_when_inactive() {
        let mut state = state();
        state.session.active = false;
        spawn_enemy(&mut state);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_sword_hit_on_contact_start_only() {
        let mut state = state();
        state.player.sword.start_swing(false);
        let blade_mid = state.player.sword.blade_points()[2];
        state.enemies.push(Enemy::new(8, blade_mid));
        update_enemies(&mut state, 1.0 / 120.0);
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH - SWORD_DAMAGE);

        // Still overlapping after the flash: no second hit
        state.enemies[0].hit_timer = 0.0;
        state.enemies[0].pos = state.player.sword.blade_points()[2];
        update_enemies(&mut state, 1.0 / 120.0);
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH - SWORD_DAMAGE);
    }

    #[test]
    fn test_contact_knocks_player_away_from_enemy() {
        let mut state = state();
        let start = state.player.pos;
        state.enemies.push(Enemy::new(5, start - Vec2::new(20.0, 0.0)));
        state.time = 1.0;
        let dt = 1.0 / 120.0;

        update_enemies(&mut state, dt);
        let expected = (start - state.enemies[0].pos).normalize() * ENEMY_KNOCKBACK * dt;
        let moved = state.player.pos - start;
        assert!((moved - expected).length() < 1e-3, "moved {moved:?}, expected {expected:?}");
        assert!(moved.x > 0.0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 5);
    }

    #[test]
    fn test_high_level_kill_respawns() {
        let mut state = state();
        state.session.difficulty.level = 9;
        state.session.difficulty.max_enemies = 10;
        assert!(respawn_chance(9) >= 1.0);

        state.enemies.push(Enemy::new(5, Vec2::new(600.0, 300.0)));
        damage_enemy(&mut state, 0, 200);
        update_enemies(&mut state, 0.25);
        update_enemies(&mut state, 0.3);

        assert_eq!(state.enemies.len(), 1);
        assert_ne!(state.enemies[0].id, 5);
        assert!(!state.enemies[0].is_dying());
    }

    #[test]
    fn test_mid_air_spawns_stay_in_center_band() {
        let mut state = state();
        state.session.difficulty.level = 30;
        state.session.difficulty.max_enemies = MAX_ENEMIES_CAP;
        let (w, h) = (state.width, state.height);

        let mut mid_air = 0;
        for _ in 0..300 {
            state.enemies.clear();
            spawn_enemy(&mut state);
            let pos = state.enemies[0].pos;
            if pos.x < 100.0 || pos.x > w - 100.0 {
                assert!((20.0..=h - GROUND_HEIGHT).contains(&pos.y));
                continue;
            }
            mid_air += 1;
            assert!((w * 0.3 - 0.01..=w * 0.7 + 0.01).contains(&pos.x), "x = {}", pos.x);
            assert!((h * 0.2 - 0.01..=h * 0.7 + 0.01).contains(&pos.y), "y = {}", pos.y);
        }
        assert!(mid_air > 0);
    }
}
