//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod combat;
pub mod confetti;
pub mod difficulty;
pub mod enemy;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;
pub mod tween;

pub use confetti::{Confetti, ConfettiShape, spawn_confetti};
pub use difficulty::Difficulty;
pub use enemy::Enemy;
pub use physics::{Aabb, Body};
pub use player::{AimArrow, ArrowSegment, DamageOutcome, Player, Sword};
pub use state::{
    Explosion, FloatingText, GameEvent, GameState, Kaboom, Scene, Session, TextKind, Wall,
};
pub use tick::{TickInput, bot_input, tick};
pub use tween::{Easing, Repeat, Tween};
