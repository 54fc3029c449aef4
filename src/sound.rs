//! Sound catalogue and music/sfx state
//!
//! Platform independent: decides *what* to play. The wasm `audio` module
//! turns the decisions into Web Audio / HTML audio playback.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GameEvent, Scene};

/// Music files served under `MUSIC_DIR`
pub const MUSIC_TRACKS: [&str; 4] = [
    "pixel-song-3.mp3",
    "pixel-song-18.mp3",
    "pixel-song-19.mp3",
    "pixel-song-21.mp3",
];
pub const MUSIC_DIR: &str = "music";

pub const DEFAULT_MUSIC_VOLUME: f32 = 0.8;
pub const DEFAULT_SFX_VOLUME: f32 = 0.7;

/// Sound effect categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfxKind {
    Coin,
    Explosion,
    Jump,
    Hit,
    Heal,
    Death,
    LevelUp,
    Windup,
}

impl SfxKind {
    pub const ALL: [SfxKind; 8] = [
        SfxKind::Coin,
        SfxKind::Explosion,
        SfxKind::Jump,
        SfxKind::Hit,
        SfxKind::Heal,
        SfxKind::Death,
        SfxKind::LevelUp,
        SfxKind::Windup,
    ];

    /// Named variants in this category; one is picked at random per play
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            SfxKind::Coin => &["coin-1", "coin-2", "coin-3", "coin-4", "coin-5"],
            SfxKind::Explosion => &["pixel-explosion"],
            SfxKind::Jump => &["coin-1"],
            SfxKind::Hit => &["ouch"],
            SfxKind::Heal => &["coin-3"],
            SfxKind::Death => &["large-underwater-explosion"],
            SfxKind::LevelUp => &["powerup"],
            SfxKind::Windup => &["windup"],
        }
    }
}

/// A resolved request to play one sound effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SfxRequest {
    pub kind: SfxKind,
    /// Index into `kind.variants()`
    pub variant: usize,
    pub volume: f32,
    /// Pitch offset in cents
    pub detune: f32,
}

/// Music/sfx state: which track is on, volumes and toggles
#[derive(Debug, Clone)]
pub struct SoundSystem {
    rng: Pcg32,
    last_music: Option<&'static str>,
    music_playing: bool,
    music_volume: f32,
    sfx_volume: f32,
    music_enabled: bool,
    sfx_enabled: bool,
}

impl SoundSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_music: None,
            music_playing: false,
            music_volume: DEFAULT_MUSIC_VOLUME,
            sfx_volume: DEFAULT_SFX_VOLUME,
            music_enabled: true,
            sfx_enabled: true,
        }
    }

    /// Random track, never the previous one when another is available
    pub fn next_music_track(&mut self) -> &'static str {
        let available: Vec<&'static str> = MUSIC_TRACKS
            .iter()
            .copied()
            .filter(|t| Some(*t) != self.last_music)
            .collect();
        let pool: &[&'static str] = if available.is_empty() {
            &MUSIC_TRACKS
        } else {
            &available
        };
        let track = pool[self.rng.random_range(0..pool.len())];
        self.last_music = Some(track);
        track
    }

    /// Pick and start a new track. `None` while music is disabled.
    pub fn play_random_music(&mut self) -> Option<&'static str> {
        if !self.music_enabled {
            return None;
        }
        let track = self.next_music_track();
        self.music_playing = true;
        Some(track)
    }

    /// Random variant of `kind` at the default sfx volume. `None` while sfx are off.
    pub fn pick_sfx(&mut self, kind: SfxKind) -> Option<SfxRequest> {
        self.pick_sfx_with(kind, None, 0.0)
    }

    pub fn pick_sfx_with(
        &mut self,
        kind: SfxKind,
        volume: Option<f32>,
        detune: f32,
    ) -> Option<SfxRequest> {
        if !self.sfx_enabled {
            return None;
        }
        let variant = self.rng.random_range(0..kind.variants().len());
        Some(SfxRequest {
            kind,
            variant,
            volume: volume.unwrap_or(self.sfx_volume),
            detune,
        })
    }

    /// Sound for a simulation event, if any
    pub fn sfx_for_event(&mut self, event: &GameEvent) -> Option<SfxRequest> {
        match event {
            GameEvent::EnemyHit { .. } => self.pick_sfx_with(SfxKind::Hit, Some(0.3), 200.0),
            GameEvent::EnemyKilled { .. } => self.pick_sfx_with(SfxKind::Death, Some(0.4), -100.0),
            GameEvent::Explosion { .. } => self.pick_sfx(SfxKind::Explosion),
            GameEvent::Jump => self.pick_sfx(SfxKind::Jump),
            GameEvent::Healed { .. } => self.pick_sfx(SfxKind::Heal),
            GameEvent::LevelUp { .. } => self.pick_sfx(SfxKind::LevelUp),
            GameEvent::SwordSwing => self.pick_sfx(SfxKind::Windup),
            GameEvent::Scored { .. } => self.pick_sfx(SfxKind::Coin),
            GameEvent::PlayerHurt { .. } => self.pick_sfx(SfxKind::Hit),
            GameEvent::PlayerDied | GameEvent::SceneStarted(_) => None,
        }
    }

    /// Whether `event` should start a fresh music track
    pub fn starts_music(event: &GameEvent) -> bool {
        matches!(event, GameEvent::SceneStarted(Scene::Main))
    }

    /// Flip music on/off; returns the new state. Turning it on needs a
    /// follow-up `play_random_music`.
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        if !self.music_enabled {
            self.music_playing = false;
        }
        self.music_enabled
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_enabled = !self.sfx_enabled;
        self.sfx_enabled
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.sfx_enabled = enabled;
    }

    pub fn set_music_volume(&mut self, volume: f32) -> f32 {
        self.music_volume = volume.clamp(0.0, 1.0);
        self.music_volume
    }

    pub fn set_sfx_volume(&mut self, volume: f32) -> f32 {
        self.sfx_volume = volume.clamp(0.0, 1.0);
        self.sfx_volume
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn sfx_enabled(&self) -> bool {
        self.sfx_enabled
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn stop_music(&mut self) {
        self.music_playing = false;
    }

    /// Last track picked (kept after stopping)
    pub fn current_music(&self) -> Option<&'static str> {
        self.last_music
    }
}

/// Path of a music track relative to the page
pub fn music_path(track: &str) -> String {
    format!("{MUSIC_DIR}/{track}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_music_never_repeats_back_to_back() {
        let mut sound = SoundSystem::new(5);
        let mut last = sound.next_music_track();
        for _ in 0..100 {
            let next = sound.next_music_track();
            assert_ne!(next, last);
            assert!(MUSIC_TRACKS.contains(&next));
            last = next;
        }
    }

    #[test]
    fn test_music_toggle() {
        let mut sound = SoundSystem::new(5);
        assert!(!sound.is_music_playing());
        let track = sound.play_random_music().unwrap();
        assert!(sound.is_music_playing());
        assert_eq!(sound.current_music(), Some(track));

        assert!(!sound.toggle_music());
        assert!(!sound.is_music_playing());
        assert_eq!(sound.play_random_music(), None);

        assert!(sound.toggle_music());
        assert!(sound.play_random_music().is_some());
        sound.stop_music();
        assert!(!sound.is_music_playing());
    }

    #[test]
    fn test_sfx_disabled_yields_nothing() {
        let mut sound = SoundSystem::new(5);
        assert!(sound.pick_sfx(SfxKind::Coin).is_some());
        assert!(!sound.toggle_sfx());
        assert_eq!(sound.pick_sfx(SfxKind::Coin), None);
    }

    #[test]
    fn test_sfx_variants_in_range() {
        let mut sound = SoundSystem::new(9);
        for kind in SfxKind::ALL {
            for _ in 0..20 {
                let req = sound.pick_sfx(kind).unwrap();
                assert!(req.variant < kind.variants().len());
                assert_eq!(req.volume, DEFAULT_SFX_VOLUME);
            }
        }
    }

    #[test]
    fn test_volume_clamped() {
        let mut sound = SoundSystem::new(1);
        assert_eq!(sound.set_music_volume(1.5), 1.0);
        assert_eq!(sound.set_sfx_volume(-0.2), 0.0);
    }

    #[test]
    fn test_event_mapping() {
        let mut sound = SoundSystem::new(1);
        let hit = sound.sfx_for_event(&GameEvent::EnemyHit { id: 1 }).unwrap();
        assert_eq!(hit.kind, SfxKind::Hit);
        assert_eq!(hit.volume, 0.3);
        assert_eq!(hit.detune, 200.0);

        let death = sound
            .sfx_for_event(&GameEvent::EnemyKilled {
                id: 1,
                pos: Vec2::ZERO,
            })
            .unwrap();
        assert_eq!(death.kind, SfxKind::Death);
        assert_eq!(death.detune, -100.0);

        assert!(sound.sfx_for_event(&GameEvent::PlayerDied).is_none());
        assert!(SoundSystem::starts_music(&GameEvent::SceneStarted(Scene::Main)));
        assert!(!SoundSystem::starts_music(&GameEvent::SceneStarted(
            Scene::GameOver { final_score: 1 }
        )));
    }

    #[test]
    fn test_music_path() {
        assert_eq!(music_path("pixel-song-3.mp3"), "music/pixel-song-3.mp3");
    }
}
