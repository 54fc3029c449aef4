//! Difficulty ramp driven by score

use super::combat::{max_enemies_for, should_level_up, spawn_interval_for};
use super::confetti::spawn_confetti;
use super::state::{FloatingText, GameEvent, GameState};
use crate::consts::*;

/// Current difficulty tier and the spawn parameters derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub level: u32,
    pub max_enemies: usize,
    pub spawn_interval: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            level: 1,
            max_enemies: INITIAL_MAX_ENEMIES,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
        }
    }
}

impl Difficulty {
    pub fn level_up(&mut self) {
        self.level += 1;
        self.max_enemies = max_enemies_for(self.level);
        self.spawn_interval = spawn_interval_for(self.level);
    }
}

/// Once-per-second difficulty check
pub fn update_difficulty(state: &mut GameState) {
    if !state.session.active {
        return;
    }

    state.session.game_time += 1;

    let level = state.session.difficulty.level;
    if !should_level_up(state.session.score, level) {
        return;
    }
    // The banner doubles as a latch so one crossing only counts once
    if state.has_level_up_text() {
        return;
    }

    state.session.difficulty.level_up();
    let difficulty = state.session.difficulty;
    state.session.spawn_clock.set_interval(difficulty.spawn_interval);

    log::info!(
        "Difficulty increased to level {}. Max enemies: {}, Spawn interval: {}s",
        difficulty.level,
        difficulty.max_enemies,
        difficulty.spawn_interval
    );

    let center = state.screen_center();
    let particles = spawn_confetti(&mut state.rng, center);
    state.confetti.extend(particles);

    let id = state.next_entity_id();
    state
        .texts
        .push(FloatingText::level_up(id, difficulty.level, center));
    state.events.push(GameEvent::LevelUp {
        level: difficulty.level,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::TextKind;

    #[test]
    fn test_level_up_updates_spawn_parameters() {
        let mut d = Difficulty::default();
        d.level_up();
        assert_eq!(d.level, 2);
        assert_eq!(d.max_enemies, 7);
        assert!((d.spawn_interval - 2.6).abs() < 1e-6);
        for _ in 0..40 {
            d.level_up();
        }
        assert_eq!(d.max_enemies, MAX_ENEMIES_CAP);
        assert_eq!(d.spawn_interval, MIN_SPAWN_INTERVAL);
    }

    #[test]
    fn test_update_difficulty_levels_once_per_crossing() {
        let mut state = GameState::new(7, 1280.0, 720.0);
        state.session.score = 52;

        update_difficulty(&mut state);
        assert_eq!(state.session.difficulty.level, 2);
        assert_eq!(state.session.game_time, 1);
        assert_eq!(state.confetti.len(), 50);
        assert!(state.texts.iter().any(|t| t.kind == TextKind::LevelUp));
        assert!((state.session.spawn_clock.interval() - 2.6).abs() < 1e-6);

        // Score 52 is below the level-2 threshold of 100
        update_difficulty(&mut state);
        assert_eq!(state.session.difficulty.level, 2);
    }

    #[test]
    fn test_banner_blocks_second_level_up() {
        let mut state = GameState::new(7, 1280.0, 720.0);
        state.session.score = 200;
        update_difficulty(&mut state);
        assert_eq!(state.session.difficulty.level, 2);
        // 200 % 100 == 0 passes the score check, but the banner is still up
        update_difficulty(&mut state);
        assert_eq!(state.session.difficulty.level, 2);
    }

    #[test]
    fn test_inactive_session_does_nothing() {
        let mut state = GameState::new(7, 1280.0, 720.0);
        state.session.active = false;
        state.session.score = 50;
        update_difficulty(&mut state);
        assert_eq!(state.session.game_time, 0);
        assert_eq!(state.session.difficulty.level, 1);
    }
}
