//! Balancing formulas: damage, scoring and spawn odds
//!
//! Everything here is a pure function of distance or difficulty level so it
//! can be tuned and tested without running the simulation.

use crate::consts::*;

/// Smallest normalized distance fed to the log falloff (keeps it finite at the epicentre)
const MIN_NORMALIZED_DISTANCE: f32 = 0.01;

/// Damage dealt by the click explosion to an enemy `dist` pixels from its centre.
///
/// Returns `None` outside the blast radius. Inside, damage falls off with
/// `ln(10n) / ln(20)` of the normalized distance `n`, never below the minimum.
pub fn explosion_damage(dist: f32) -> Option<i32> {
    if dist.is_nan() || dist >= EXPLOSION_RADIUS {
        return None;
    }
    let normalized = (dist / EXPLOSION_RADIUS).max(MIN_NORMALIZED_DISTANCE);
    let falloff = (10.0 * normalized).ln() / 20.0_f32.ln();
    let percent = 1.0 - falloff;
    let damage = (EXPLOSION_MAX_DAMAGE * percent).floor() as i32;
    Some(damage.max(EXPLOSION_MIN_DAMAGE))
}

/// Damage an enemy deals to the player on contact
pub fn contact_damage(level: u32) -> i32 {
    (5.0 + (level.max(1) - 1) as f32 * 2.0).round() as i32
}

/// Score awarded when an enemy is destroyed
pub fn points_per_kill(level: u32) -> u64 {
    (10.0 + (level as f32).powf(0.75)).round() as u64
}

/// Probability that a kill immediately triggers another spawn attempt
pub fn respawn_chance(level: u32) -> f32 {
    0.2 * (level as f32).powf(0.75)
}

/// Probability that a new enemy drops in mid-air instead of at a side wall
pub fn center_spawn_chance(level: u32) -> f32 {
    if level <= 2 {
        0.0
    } else {
        ((level - 2) as f32 * 0.04).min(0.3)
    }
}

/// Enemy cap for a difficulty level
pub fn max_enemies_for(level: u32) -> usize {
    (INITIAL_MAX_ENEMIES + level as usize).min(MAX_ENEMIES_CAP)
}

/// Seconds between spawn attempts for a difficulty level
pub fn spawn_interval_for(level: u32) -> f32 {
    (INITIAL_SPAWN_INTERVAL - level as f32 * 0.2).max(MIN_SPAWN_INTERVAL)
}

/// Score needed before the next level-up check can pass
pub fn level_up_threshold(level: u32) -> u64 {
    50 * level as u64
}

/// Level-up fires once the score reaches the threshold, and only within the
/// first 10 points past each multiple of it
pub fn should_level_up(score: u64, level: u32) -> bool {
    let threshold = level_up_threshold(level);
    threshold > 0 && score >= threshold && score % threshold < 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_outside_radius() {
        assert_eq!(explosion_damage(120.0), None);
        assert_eq!(explosion_damage(500.0), None);
        assert_eq!(explosion_damage(f32::NAN), None);
    }

    #[test]
    fn test_explosion_reference_values() {
        // n = 0.05 -> 1 - ln(0.5)/ln(20) = 1.2314 -> 98
        assert_eq!(explosion_damage(6.0), Some(98));
        // n = 0.5 -> 1 - ln(5)/ln(20) = 0.4627 -> 37
        assert_eq!(explosion_damage(60.0), Some(37));
        // the rim still hurts: 1 - ln(9.92)/ln(20) = 0.234 -> 18
        assert_eq!(explosion_damage(119.0), Some(18));
    }

    #[test]
    fn test_explosion_epicentre_is_finite() {
        let d = explosion_damage(0.0).unwrap();
        // n clamped to 0.01 -> 1 + ln(10)/ln(20) = 1.7686 -> 141
        assert_eq!(d, 141);
    }

    #[test]
    fn test_contact_damage_scales() {
        assert_eq!(contact_damage(1), 5);
        assert_eq!(contact_damage(2), 7);
        assert_eq!(contact_damage(5), 13);
    }

    #[test]
    fn test_points_per_kill() {
        assert_eq!(points_per_kill(1), 11);
        // 2^0.75 = 1.68 -> 11.68 -> 12
        assert_eq!(points_per_kill(2), 12);
        // 10^0.75 = 5.62 -> 16
        assert_eq!(points_per_kill(10), 16);
    }

    #[test]
    fn test_center_spawn_chance_ramp() {
        assert_eq!(center_spawn_chance(1), 0.0);
        assert_eq!(center_spawn_chance(2), 0.0);
        assert!((center_spawn_chance(3) - 0.04).abs() < 1e-6);
        assert!((center_spawn_chance(20) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_caps() {
        assert_eq!(max_enemies_for(2), 7);
        assert_eq!(max_enemies_for(30), 15);
        assert!((spawn_interval_for(2) - 2.6).abs() < 1e-6);
        assert_eq!(spawn_interval_for(50), 0.5);
    }

    #[test]
    fn test_level_up_window() {
        assert!(!should_level_up(49, 1));
        assert!(should_level_up(50, 1));
        assert!(should_level_up(59, 1));
        assert!(!should_level_up(60, 1));
        assert!(should_level_up(100, 1));
        assert!(!should_level_up(66, 2));
        assert!(should_level_up(100, 2));
    }
}
