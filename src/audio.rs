//! Audio system using Web Audio API
//!
//! Sound effects are synthesised with oscillators; music streams from the
//! `music/` directory through an `HtmlAudioElement`.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;
use crate::sound::{SfxKind, SfxRequest, SoundSystem, music_path};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sound: SoundSystem,
    music: Option<HtmlAudioElement>,
    master_volume: f32,
}

impl AudioManager {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sfx disabled");
        }
        let mut manager = Self {
            ctx,
            sound: SoundSystem::new(seed),
            music: None,
            master_volume: 1.0,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Copy volumes and toggles from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sound.set_sfx_volume(settings.sfx_volume);
        self.sound.set_music_volume(settings.music_volume);
        self.sound.set_sfx_enabled(settings.sfx_enabled);
        if settings.music_enabled != self.sound.music_enabled() {
            self.toggle_music();
        }
        if let Some(music) = &self.music {
            music.set_volume(self.music_volume() as f64);
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
        // Autoplay may have been blocked before the first gesture
        if let Some(music) = &self.music {
            if music.paused() {
                let _ = music.play();
            }
        }
    }

    fn music_volume(&self) -> f32 {
        self.master_volume * self.sound.music_volume()
    }

    /// React to one simulation event
    pub fn handle_event(&mut self, event: &GameEvent) {
        if SoundSystem::starts_music(event) {
            self.play_random_music();
        }
        if let Some(request) = self.sound.sfx_for_event(event) {
            self.play(request);
        }
    }

    /// Stop the current track and start a different one
    pub fn play_random_music(&mut self) {
        self.stop_music();
        let Some(track) = self.sound.play_random_music() else {
            return;
        };
        let path = music_path(track);
        match HtmlAudioElement::new_with_src(&path) {
            Ok(el) => {
                el.set_loop(true);
                el.set_volume(self.music_volume() as f64);
                // Rejected until the page has had a user gesture; resume() retries
                let _ = el.play();
                log::info!("Playing music {track}");
                self.music = Some(el);
            }
            Err(e) => log::warn!("Failed to create audio element for {path}: {e:?}"),
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(music) = self.music.take() {
            let _ = music.pause();
        }
        self.sound.stop_music();
    }

    /// Returns the new state
    pub fn toggle_music(&mut self) -> bool {
        let enabled = self.sound.toggle_music();
        if enabled {
            self.play_random_music();
        } else {
            self.stop_music();
        }
        enabled
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.sound.toggle_sfx()
    }

    pub fn is_music_playing(&self) -> bool {
        self.sound.is_music_playing()
    }

    pub fn current_music(&self) -> Option<&'static str> {
        self.sound.current_music()
    }

    /// Play a sound effect
    pub fn play(&self, request: SfxRequest) {
        let vol = request.volume * self.master_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let detune = request.detune;
        match request.kind {
            SfxKind::Coin => self.play_coin(ctx, vol, detune, request.variant),
            SfxKind::Explosion => self.play_explosion(ctx, vol, detune),
            SfxKind::Jump => self.play_jump(ctx, vol, detune),
            SfxKind::Hit => self.play_hit(ctx, vol, detune),
            SfxKind::Heal => self.play_heal(ctx, vol, detune),
            SfxKind::Death => self.play_death(ctx, vol, detune),
            SfxKind::LevelUp => self.play_level_up(ctx, vol, detune),
            SfxKind::Windup => self.play_windup(ctx, vol, detune),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        detune: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.detune().set_value(detune);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Coin - two-note ding, pitch picked by variant
    fn play_coin(&self, ctx: &AudioContext, vol: f32, detune: f32, variant: usize) {
        let base = 880.0 + variant as f32 * 110.0;
        for (i, freq) in [base, base * 1.5].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, detune, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Explosion - boom with a crack on top
    fn play_explosion(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, detune, OscillatorType::Sawtooth)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(100.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();

        if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, detune, OscillatorType::Square) {
            gain2.gain().set_value_at_time(vol * 0.2, t).ok();
            gain2
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc2.start().ok();
            osc2.stop_with_when(t + 0.15).ok();
        }
    }

    /// Jump - quick upward blip
    fn play_jump(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, detune, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Hit - short thump
    fn play_hit(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, detune, OscillatorType::Triangle)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Heal - soft rising chime
    fn play_heal(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        for (i, freq) in [660.0, 880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, detune, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Death - muffled underwater boom
    fn play_death(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, detune, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.7, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(25.0, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.7).ok();
        }

        // Bubbly wobble
        if let Some((osc, gain)) = self.create_osc(ctx, 300.0, detune, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency().set_value_at_time(220.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(340.0, t + 0.16).ok();
            osc.frequency().set_value_at_time(180.0, t + 0.24).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }

    /// Level up - power-up arpeggio
    fn play_level_up(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        for (i, freq) in [392.0, 523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, detune, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Windup - whoosh of the sword swing
    fn play_windup(&self, ctx: &AudioContext, vol: f32, detune: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, detune, OscillatorType::Sawtooth)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.01, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.15, t + 0.08)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }
}
