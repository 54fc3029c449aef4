//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage. Unknown or missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum confetti particles drawn per frame
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 50,
            QualityPreset::Medium => 200,
            QualityPreset::High => 1000,
        }
    }

    /// Circle tessellation segments
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 20,
            QualityPreset::High => 32,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on explosions and death
    pub screen_shake: bool,
    /// Confetti bursts on kills and level-ups
    pub confetti: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Faint circle showing the click attack range
    pub show_range_indicator: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub music_enabled: bool,
    pub sfx_enabled: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            confetti: true,

            show_fps: false,
            show_range_indicator: true,

            master_volume: 1.0,
            sfx_volume: crate::sound::DEFAULT_SFX_VOLUME,
            music_volume: crate::sound::DEFAULT_MUSIC_VOLUME,
            music_enabled: true,
            sfx_enabled: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective confetti cap
    pub fn max_particles(&self) -> usize {
        if !self.confetti {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "glady_brawl_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn try_load() -> Result<Option<Self>> {
        let storage = local_storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json).map(Some),
            _ => Ok(None),
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<()> {
        let json = self.to_json()?;
        local_storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| crate::GameError::Storage(format!("{e:?}")))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .ok_or(crate::GameError::NoWindow)?
        .local_storage()
        .ok()
        .flatten()
        .ok_or(crate::GameError::NoStorage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sound_system() {
        let s = Settings::default();
        assert_eq!(s.sfx_volume, 0.7);
        assert_eq!(s.music_volume, 0.8);
        assert!(s.music_enabled && s.sfx_enabled);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"music_enabled": false, "quality": "High"}"#).unwrap();
        assert!(!s.music_enabled);
        assert_eq!(s.quality, QualityPreset::High);
        assert!(s.sfx_enabled);
        assert!(s.screen_shake);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = Settings::from_preset(QualityPreset::Low);
        s.reduced_motion = true;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let s = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!s.effective_screen_shake());
    }

    #[test]
    fn test_confetti_off_caps_particles() {
        let s = Settings {
            confetti: false,
            ..Settings::default()
        };
        assert_eq!(s.max_particles(), 0);
    }
}
