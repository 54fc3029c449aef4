//! Game state and core simulation types
//!
//! Everything a run needs lives here and is rebuilt on every restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::confetti::Confetti;
use super::difficulty::Difficulty;
use super::enemy::Enemy;
use super::physics::{depenetrate, Aabb};
use super::player::Player;
use super::tween::{Easing, Repeat, Tween};
use crate::consts::*;

/// Active scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Arena gameplay
    Main,
    /// Run ended, waiting for restart
    GameOver { final_score: u64 },
}

/// Events emitted during a tick (for audio/HUD consumption)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jump,
    SwordSwing,
    Explosion { pos: Vec2 },
    EnemyHit { id: u32 },
    EnemyKilled { id: u32, pos: Vec2 },
    Scored { points: u64, total: u64 },
    Healed { amount: i32 },
    PlayerHurt { amount: i32 },
    PlayerDied,
    LevelUp { level: u32 },
    SceneStarted(Scene),
}

/// Static arena geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub aabb: Aabb,
    pub opacity: f32,
}

/// Arena boxes for a canvas of the given size: ground, left, right, top
pub fn arena_walls(width: f32, height: f32) -> Vec<Wall> {
    let boxes = [
        (
            Aabb::from_top_left(
                Vec2::new(0.0, height - GROUND_HEIGHT),
                Vec2::new(width, GROUND_HEIGHT),
            ),
            1.0,
        ),
        (
            Aabb::from_top_left(Vec2::new(-WALL_THICKNESS, 0.0), Vec2::new(WALL_THICKNESS, height)),
            0.5,
        ),
        (
            Aabb::from_top_left(Vec2::new(width, 0.0), Vec2::new(WALL_THICKNESS, height)),
            0.5,
        ),
        (
            Aabb::from_top_left(Vec2::new(0.0, -WALL_THICKNESS), Vec2::new(width, WALL_THICKNESS)),
            0.5,
        ),
    ];
    boxes
        .into_iter()
        .map(|(aabb, opacity)| Wall { aabb, opacity })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    LevelUp,
    Heal,
}

/// Text that floats over the arena and fades out (rendered by the DOM HUD)
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub id: u32,
    pub kind: TextKind,
    pub text: String,
    /// Centre of the text
    pub pos: Vec2,
    pub size: f32,
    pub color: [u8; 3],
    pub outline: Option<[u8; 3]>,
    /// Upward drift in px/s while fading
    pub rise_speed: f32,
    pub fade: Tween,
}

impl FloatingText {
    pub fn level_up(id: u32, level: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: TextKind::LevelUp,
            text: format!("Difficulty Level {level}!"),
            pos,
            size: 32.0,
            color: [255, 255, 255],
            outline: Some([0, 0, 0]),
            rise_speed: 0.0,
            fade: Tween::new(1.0, 0.0, LEVEL_UP_TEXT_SECS, Easing::EaseInQuad),
        }
    }

    pub fn heal(id: u32, amount: i32, pos: Vec2) -> Self {
        Self {
            id,
            kind: TextKind::Heal,
            text: format!("+{amount} HP"),
            pos,
            size: 16.0,
            color: [0, 255, 0],
            outline: None,
            // half a pixel per 60 Hz frame
            rise_speed: 30.0,
            fade: Tween::new(1.0, 0.0, HEAL_TEXT_SECS, Easing::EaseOutQuad),
        }
    }

    pub fn opacity(&self) -> f32 {
        self.fade.value()
    }

    /// Returns false once the fade has finished
    pub fn update(&mut self, dt: f32) -> bool {
        self.fade.advance(dt);
        self.pos.y -= self.rise_speed * dt;
        !self.fade.finished()
    }
}

/// Red damage area left by a click explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub ttl: f32,
}

/// Purely visual burst (explosions, player death)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kaboom {
    pub pos: Vec2,
    pub age: f32,
    pub scale: f32,
}

impl Kaboom {
    pub fn new(pos: Vec2, scale: f32) -> Self {
        Self { pos, age: 0.0, scale }
    }

    /// 0 at spawn, 1 when gone
    pub fn progress(&self) -> f32 {
        (self.age / KABOOM_SECS).clamp(0.0, 1.0)
    }
}

/// Score, difficulty and the session clocks
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub active: bool,
    pub score: u64,
    /// Whole seconds of active play
    pub game_time: u32,
    pub difficulty: Difficulty,
    pub spawn_clock: Repeat,
    pub difficulty_clock: Repeat,
    /// Score captured when the player died
    pub final_score: Option<u64>,
    /// Seconds until the game-over scene, once the player has died
    pub game_over_in: Option<f32>,
}

impl Default for Session {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        Self {
            active: true,
            score: 0,
            game_time: 0,
            difficulty,
            spawn_clock: Repeat::new(difficulty.spawn_interval),
            difficulty_clock: Repeat::new(1.0),
            final_score: None,
            game_over_in: None,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// RNG seed for this run
    pub seed: u64,
    pub rng: Pcg32,
    /// Canvas size in pixels
    pub width: f32,
    pub height: f32,
    pub scene: Scene,
    /// Seconds since the current scene started
    pub time: f32,
    pub time_ticks: u64,
    pub session: Session,
    pub player: Player,
    /// In spawn order (stable iteration)
    pub enemies: Vec<Enemy>,
    pub confetti: Vec<Confetti>,
    pub texts: Vec<FloatingText>,
    pub explosions: Vec<Explosion>,
    pub kabooms: Vec<Kaboom>,
    pub walls: Vec<Wall>,
    pub screen_shake: f32,
    /// Last known mouse position
    pub mouse: Vec2,
    /// Events from the current frame (drained by the platform layer)
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed and canvas size, starting in the main scene
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            scene: Scene::Main,
            time: 0.0,
            time_ticks: 0,
            session: Session::default(),
            player: Player::new(Vec2::ZERO),
            enemies: Vec::new(),
            confetti: Vec::new(),
            texts: Vec::new(),
            explosions: Vec::new(),
            kabooms: Vec::new(),
            walls: Vec::new(),
            screen_shake: 0.0,
            mouse: Vec2::new(width * 0.5, height * 0.5),
            events: Vec::new(),
            next_id: 1,
        };
        state.start_main_scene();
        state
    }

    /// Get next unique entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Static collision boxes
    pub fn statics(&self) -> Vec<Aabb> {
        self.walls.iter().map(|w| w.aabb).collect()
    }

    /// Player spawn point, kept above the ground on short canvases
    pub fn player_spawn(&self) -> Vec2 {
        let floor = self.height - GROUND_HEIGHT - PLAYER_SIZE.1 - 1.0;
        Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1.min(floor).max(0.0))
    }

    /// Tear down every entity and start a fresh main scene (RNG keeps running)
    pub fn start_main_scene(&mut self) {
        self.clear_entities();
        self.scene = Scene::Main;
        self.time = 0.0;
        self.time_ticks = 0;
        self.session = Session::default();
        self.walls = arena_walls(self.width, self.height);
        self.player = Player::new(self.player_spawn());
        self.events.push(GameEvent::SceneStarted(Scene::Main));
    }

    /// Switch to the game-over scene
    pub fn enter_game_over(&mut self, final_score: u64) {
        self.clear_entities();
        self.scene = Scene::GameOver { final_score };
        self.events.push(GameEvent::SceneStarted(self.scene));
        log::info!("Game over, final score {final_score}");
    }

    /// Canvas resized: rebuild the arena to the new bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.walls = arena_walls(width, height);

        // Pull bodies left outside the new bounds back above the ground
        let statics = self.statics();
        let bounds = Vec2::new(width, height - GROUND_HEIGHT);
        let player = fit_inside(self.player.aabb(), bounds, &statics);
        self.player.pos = player.min;
        for enemy in &mut self.enemies {
            enemy.pos = fit_inside(enemy.aabb(), bounds, &statics).center();
        }
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake += amount;
    }

    pub fn has_level_up_text(&self) -> bool {
        self.texts.iter().any(|t| t.kind == TextKind::LevelUp)
    }

    fn clear_entities(&mut self) {
        self.enemies.clear();
        self.confetti.clear();
        self.texts.clear();
        self.explosions.clear();
        self.kabooms.clear();
        self.screen_shake = 0.0;
    }
}

/// Shift `aabb` into `[0, bounds.x] x [0, bounds.y]` (top-left aligned when it
/// does not fit), then push it out of the static boxes
fn fit_inside(aabb: Aabb, bounds: Vec2, statics: &[Aabb]) -> Aabb {
    let axis = |min: f32, max: f32, limit: f32| {
        if max > limit {
            (limit - max).max(-min)
        } else if min < 0.0 {
            -min
        } else {
            0.0
        }
    };
    let shift = Vec2::new(
        axis(aabb.min.x, aabb.max.x, bounds.x),
        axis(aabb.min.y, aabb.max.y, bounds.y),
    );
    let mut moved = aabb.translated(shift);
    depenetrate(&mut moved, statics);
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{tick, TickInput};

    #[test]
    fn test_new_state_starts_main_scene() {
        let state = GameState::new(1, 1280.0, 720.0);
        assert_eq!(state.scene, Scene::Main);
        assert_eq!(state.walls.len(), 4);
        assert_eq!(state.player.pos, Vec2::new(120.0, 500.0));
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.session.active);
        assert_eq!(state.events, vec![GameEvent::SceneStarted(Scene::Main)]);
    }

    #[test]
    fn test_short_canvas_spawns_player_above_ground() {
        let state = GameState::new(1, 800.0, 400.0);
        let ground = state.walls[0].aabb;
        assert!(state.player.aabb().max.y < ground.min.y);
    }

    #[test]
    fn test_arena_layout() {
        let walls = arena_walls(800.0, 600.0);
        assert_eq!(walls[0].aabb.min, Vec2::new(0.0, 552.0));
        assert_eq!(walls[0].opacity, 1.0);
        assert_eq!(walls[1].aabb.max.x, 0.0);
        assert_eq!(walls[2].aabb.min.x, 800.0);
        assert_eq!(walls[3].aabb.max.y, 0.0);
        assert!(walls[1..].iter().all(|w| w.opacity == 0.5));
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_heal_text_rises_and_expires() {
        let mut text = FloatingText::heal(1, 5, Vec2::new(100.0, 100.0));
        assert_eq!(text.text, "+5 HP");
        assert!(text.update(0.4));
        assert!((text.pos.y - 88.0).abs() < 1e-3);
        assert!(text.opacity() < 0.5);
        assert!(!text.update(0.4));
    }

    #[test]
    fn test_game_over_clears_arena() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.texts.push(FloatingText::level_up(9, 2, Vec2::ZERO));
        state.enter_game_over(42);
        assert_eq!(state.scene, Scene::GameOver { final_score: 42 });
        assert!(state.texts.is_empty());
        assert!(!state.has_level_up_text());
    }

    #[test]
    fn test_shrinking_canvas_keeps_player_on_ground() {
        let mut state = GameState::new(1, 1280.0, 720.0);
        state.player.pos = Vec2::new(1150.0, 500.0);
        state.enemies.push(Enemy::new(50, Vec2::new(1200.0, 300.0)));
        state.resize(800.0, 720.0);

        assert!(state.player.aabb().max.x <= 800.0);
        assert!(state.enemies[0].aabb().max.x <= 800.0);

        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        let ground = state.walls[0].aabb;
        let player = state.player.aabb();
        assert!(player.max.y <= ground.min.y + 0.01, "player fell: {player:?}");
        assert!(player.min.x >= -0.01);
    }

    #[test]
    fn test_shrinking_canvas_lifts_bodies_above_new_ground() {
        let mut state = GameState::new(1, 1280.0, 720.0);
        state.player.pos = Vec2::new(200.0, 600.0);
        state.resize(1280.0, 500.0);
        let ground = state.walls[0].aabb;
        assert!(state.player.aabb().max.y <= ground.min.y + 0.01);
        assert!(!state.player.aabb().overlaps(&ground));
    }
}
