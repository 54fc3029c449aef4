//! Glady Brawl entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use glady_brawl::audio::AudioManager;
    use glady_brawl::consts::*;
    use glady_brawl::renderer::{RenderState, build_vertices, shake_offset};
    use glady_brawl::sim::{GameEvent, GameState, Scene, TickInput, tick};
    use glady_brawl::{GameError, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Held movement keys
        held_left: bool,
        held_right: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Floating text ids currently in the DOM
        shown_texts: Vec<u32>,
    }

    impl Game {
        fn new(seed: u64, width: f32, height: f32) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new(seed.rotate_left(17), &settings);
            Self {
                state: GameState::new(seed, width, height),
                settings,
                audio,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                held_left: false,
                held_right: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_texts: Vec::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.left = self.held_left;
                self.input.right = self.held_right;
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;
                self.input.attack = false;
                self.input.fire = None;
                self.input.mouse = None;
                self.input.restart = false;
            }

            let events: Vec<GameEvent> = self.state.events.drain(..).collect();
            for event in &events {
                self.audio.handle_event(event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_vertices(&self.state, &self.settings);
            let shake = shake_offset(&self.state, &self.settings);
            match render_state.render(&vertices, shake) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let session = &self.state.session;
            set_text(document, "#hud-score", &format!("Score: {}", session.score));
            set_text(
                document,
                "#hud-level",
                &format!("Level {}", session.difficulty.level),
            );
            set_text(
                document,
                "#hud-health",
                &format!(
                    "HP {}/{}",
                    self.state.player.health.max(0),
                    self.state.player.max_health
                ),
            );
            set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            set_hidden(document, "hud-fps", !self.settings.show_fps);

            self.sync_floating_texts(document);

            match self.state.scene {
                Scene::GameOver { final_score } => {
                    set_hidden(document, "game-over", false);
                    set_text(
                        document,
                        "#final-score",
                        &format!("Final Score: {final_score}"),
                    );
                }
                Scene::Main => set_hidden(document, "game-over", true),
            }
        }

        /// Mirror `state.texts` into `#float-layer`, one absolutely placed div per text
        fn sync_floating_texts(&mut self, document: &Document) {
            let Some(layer) = document.get_element_by_id("float-layer") else {
                return;
            };

            for text in &self.state.texts {
                let dom_id = format!("float-{}", text.id);
                let el = match document.get_element_by_id(&dom_id) {
                    Some(el) => el,
                    None => {
                        let Ok(el) = document.create_element("div") else {
                            continue;
                        };
                        el.set_id(&dom_id);
                        el.set_text_content(Some(&text.text));
                        let _ = layer.append_child(&el);
                        self.shown_texts.push(text.id);
                        el
                    }
                };
                let [r, g, b] = text.color;
                let outline = text.outline.map_or(String::new(), |[or, og, ob]| {
                    format!("-webkit-text-stroke: 1px rgb({or},{og},{ob});")
                });
                let style = format!(
                    "position:absolute;left:{:.1}px;top:{:.1}px;transform:translate(-50%,-50%);\
                     font-size:{}px;color:rgb({r},{g},{b});opacity:{:.3};{outline}",
                    text.pos.x,
                    text.pos.y,
                    text.size,
                    text.opacity()
                );
                let _ = el.set_attribute("style", &style);
            }

            let texts = &self.state.texts;
            self.shown_texts.retain(|id| {
                let live = texts.iter().any(|t| t.id == *id);
                if !live && let Some(el) = document.get_element_by_id(&format!("float-{id}")) {
                    el.remove();
                }
                live
            });
        }

        /// Flip music and remember the choice
        fn toggle_music(&mut self) {
            let enabled = self.audio.toggle_music();
            self.settings.music_enabled = enabled;
            log::info!("Music {}", if enabled { "on" } else { "off" });
            self.save_settings();
        }

        fn toggle_sfx(&mut self) {
            let enabled = self.audio.toggle_sfx();
            self.settings.sfx_enabled = enabled;
            log::info!("Sound effects {}", if enabled { "on" } else { "off" });
            self.save_settings();
        }

        fn save_settings(&self) {
            if let Err(e) = self.settings.save() {
                log::warn!("Failed to save settings: {e}");
            }
        }

        fn resize(&mut self, logical: Vec2, physical: (u32, u32)) {
            self.state.resize(logical.x, logical.y);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(physical.0, physical.1, logical);
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Logical (CSS) and physical canvas sizes
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Vec2, (u32, u32)) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let logical = Vec2::new(client_w as f32, client_h as f32);
        let physical = (
            (client_w as f64 * dpr) as u32,
            (client_h as f64 * dpr) as u32,
        );
        (logical, physical)
    }

    pub async fn run() -> Result<(), GameError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Glady Brawl starting...");

        let window = web_sys::window().ok_or(GameError::NoWindow)?;
        let document = window.document().ok_or(GameError::NoWindow)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| GameError::MissingElement("canvas".into()))?
            .dyn_into()
            .map_err(|_| GameError::MissingElement("canvas is not a <canvas>".into()))?;

        let (logical, (width, height)) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, logical.x, logical.y)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| GameError::Graphics(format!("create_surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GameError::Graphics(format!("request_adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, logical).await?;
        game.borrow_mut().render_state = Some(render_state);

        // Hide loading indicator
        set_hidden(&document, "loading", true);

        setup_input_handlers(&window, &canvas, game.clone());
        setup_restart_button(&document, game.clone());
        setup_resize_handler(&window, &canvas, game.clone());

        set_hidden(&document, "hud", false);

        // Start game loop
        request_animation_frame(game);

        log::info!("Glady Brawl running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Mouse move - offset coordinates are already canvas-relative CSS pixels
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.mouse = Some(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - sword swing plus explosion at the cursor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.mouse = Some(pos);
                g.input.fire = Some(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.held_left = true,
                    "ArrowRight" | "d" | "D" => g.held_right = true,
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        if !event.repeat() {
                            g.input.jump = true;
                        }
                    }
                    "x" | "X" => g.input.attack = true,
                    "r" | "R" | "Enter" => g.input.restart = true,
                    "m" | "M" => g.toggle_music(),
                    "n" | "N" => g.toggle_sfx(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.held_left = false,
                    "ArrowRight" | "d" | "D" => g.held_right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        let win = window.clone();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let (logical, physical) = canvas_size(&win, &canvas);
            canvas.set_width(physical.0);
            canvas.set_height(physical.1);
            game.borrow_mut().resize(logical, physical);
            log::info!("Resized to {}x{}", logical.x, logical.y);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {e}");
        web_sys::console::error_1(&format!("Glady Brawl failed to start: {e}").into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Glady Brawl (native) starting...");
    log::info!("Native mode runs a headless bot session - run with `trunk serve` for the web version");

    headless_session(0x5eed, 120.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the simulation with the scripted bot for `seconds` of game time
#[cfg(not(target_arch = "wasm32"))]
fn headless_session(seed: u64, seconds: f32) {
    use glady_brawl::consts::SIM_DT;
    use glady_brawl::sim::{GameEvent, GameState, Scene, bot_input, tick};

    let mut state = GameState::new(seed, 1280.0, 720.0);
    let ticks = (seconds / SIM_DT) as u64;
    let (mut kills, mut deaths, mut best_level, mut best_score) = (0u32, 0u32, 1u32, 0u64);

    for _ in 0..ticks {
        let input = bot_input(&state);
        tick(&mut state, &input, SIM_DT);
        for event in state.events.drain(..) {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::LevelUp { level } => best_level = best_level.max(level),
                GameEvent::SceneStarted(Scene::GameOver { final_score }) => {
                    deaths += 1;
                    best_score = best_score.max(final_score);
                }
                _ => {}
            }
        }
    }
    best_score = best_score.max(state.session.score);

    log::info!(
        "Headless session: {:.0}s simulated, {} kills, {} deaths, best level {}, best score {}",
        seconds,
        kills,
        deaths,
        best_level,
        best_score
    );
}
