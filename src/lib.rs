//! Glady Brawl - a browser arena brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, combat, difficulty, particles)
//! - `renderer`: WebGPU rendering pipeline
//! - `sound`: Sound catalogue and music/sfx state
//! - `audio`: Web Audio playback (wasm only)
//! - `settings`: Player preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod sound;

pub use error::GameError;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World gravity (pixels/s², +y is down)
    pub const GRAVITY: f32 = 1600.0;

    /// Arena geometry
    pub const GROUND_HEIGHT: f32 = 48.0;
    pub const WALL_THICKNESS: f32 = 20.0;
    pub const WALL_COLOR: [u8; 3] = [127, 200, 255];

    /// Player
    pub const PLAYER_SPAWN: (f32, f32) = (120.0, 500.0);
    pub const PLAYER_SIZE: (f32, f32) = (64.0, 64.0);
    pub const PLAYER_SPEED: f32 = 500.0;
    pub const PLAYER_JUMP_FORCE: f32 = 600.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_HEALTH_BAR_WIDTH: f32 = 60.0;
    pub const PLAYER_HEALTH_BAR_HEIGHT: f32 = 8.0;
    /// How long the red hit flash (and damage immunity) lasts
    pub const HIT_FLASH_SECS: f32 = 0.1;

    /// Sword
    pub const SWORD_LENGTH: f32 = 45.0;
    pub const SWORD_WIDTH: f32 = 9.0;
    pub const SWORD_SWING_SECS: f32 = 0.15;
    pub const SWORD_DAMAGE: i32 = 35;

    /// Aim arrow and click explosion
    pub const ARROW_SEGMENTS: usize = 8;
    pub const MAX_ATTACK_DISTANCE: f32 = 500.0;
    pub const EXPLOSION_RADIUS: f32 = 120.0;
    pub const EXPLOSION_MAX_DAMAGE: f32 = 80.0;
    pub const EXPLOSION_MIN_DAMAGE: i32 = 10;
    pub const EXPLOSION_VISIBLE_SECS: f32 = 0.1;
    pub const KABOOM_SECS: f32 = 0.45;

    /// Enemy (bean)
    pub const ENEMY_SIZE: (f32, f32) = (61.0, 53.0);
    pub const ENEMY_MAX_HEALTH: i32 = 100;
    pub const ENEMY_SPEED: f32 = 100.0;
    pub const ENEMY_STOP_DISTANCE: f32 = 50.0;
    pub const ENEMY_CONTACT_COOLDOWN: f32 = 0.5;
    pub const ENEMY_KNOCKBACK: f32 = 200.0;
    pub const ENEMY_DEATH_SECS: f32 = 0.5;
    pub const ENEMY_HEALTH_BAR_WIDTH: f32 = 40.0;
    pub const ENEMY_HEALTH_BAR_HEIGHT: f32 = 5.0;

    /// Healing on kill
    pub const HEAL_ON_KILL: i32 = 5;
    pub const HEAL_TEXT_SECS: f32 = 0.8;

    /// Difficulty ramp
    pub const INITIAL_MAX_ENEMIES: usize = 5;
    pub const MAX_ENEMIES_CAP: usize = 15;
    pub const INITIAL_SPAWN_INTERVAL: f32 = 3.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.5;
    pub const LEVEL_UP_TEXT_SECS: f32 = 2.0;

    /// Delay between the player's death and the game-over scene
    pub const GAME_OVER_DELAY: f32 = 2.0;

    /// Screen shake
    pub const SHAKE_ON_EXPLOSION: f32 = 10.0;
    pub const SHAKE_ON_DEATH: f32 = 20.0;
}

/// Clamp `point` to the circle of `radius` around `center`
#[inline]
pub fn clamp_to_circle(center: Vec2, point: Vec2, radius: f32) -> Vec2 {
    let delta = point - center;
    let distance = delta.length();
    if distance <= radius {
        return point;
    }
    center + delta * (radius / distance)
}

/// Cubic bezier evaluated on one axis
#[inline]
pub fn bezier_point(t: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
}

/// Unit vector for a sprite angle in degrees (0 = up, clockwise positive in y-down space)
#[inline]
pub fn angle_to_dir(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}
