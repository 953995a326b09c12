//! Gate Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use gate_flap::audio::{self, AudioCue};
    use gate_flap::consts::*;
    use gate_flap::persistence::LocalStore;
    use gate_flap::platform::{self, ActivationFilter, FixedTimestep};
    use gate_flap::renderer::{self, SdfRenderState, viewport};
    use gate_flap::sim::{GameEvent, GamePhase, GameState, TickInput, autopilot, tick};
    use gate_flap::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<SdfRenderState>,
        audio: Box<dyn AudioCue>,
        store: LocalStore,
        settings: Settings,
        input: ActivationFilter,
        timestep: FixedTimestep,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// The run that just ended set a new best
        new_best: bool,
        /// Let the autopilot play
        autopilot: bool,
        // Frame scheduling
        running: bool,
        frame_pending: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let store = LocalStore;
            let high_score = HighScore::load(&store);
            log::info!("Best score so far: {}", high_score.best());

            Self {
                state: GameState::new(seed, high_score),
                render_state: None,
                audio: audio::for_platform(settings.effective_volume()),
                store,
                settings,
                input: ActivationFilter::new(),
                timestep: FixedTimestep::new(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                new_best: false,
                autopilot: false,
                running: true,
                frame_pending: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for _ in 0..self.timestep.advance(dt) {
                let mut activate = self.input.take();
                if self.autopilot && autopilot::wants_jump(&self.state) {
                    activate = true;
                }
                let input = TickInput {
                    activate,
                    clock_ms: platform::now_ms(),
                };
                tick(&mut self.state, &input);
            }

            self.dispatch_events();
            if self.state.phase == GamePhase::Start {
                self.new_best = false;
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

        /// Hand queued simulation events to audio and storage
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                self.audio.play_event(event);
                if let GameEvent::NewHighScore(best) = event {
                    self.state.high_score.save(&mut self.store);
                    self.new_best = true;
                    log::info!("Saved new best score {}", best);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.state.phase;

            set_text(&document, "hud-score", &self.state.score.to_string());
            set_visible(&document, "hud-score", phase != GamePhase::Start);

            set_text(&document, "hud-fps", &format!("{} FPS", self.fps));
            set_visible(&document, "hud-fps", self.settings.show_fps);

            set_visible(&document, "start-prompt", phase == GamePhase::Start);
            set_text(
                &document,
                "start-best",
                &self.state.high_score.best().to_string(),
            );

            set_visible(&document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text(&document, "final-score", &self.state.score.to_string());
                set_text(
                    &document,
                    "best-score",
                    &self.state.high_score.best().to_string(),
                );
                set_visible(&document, "new-best", self.new_best);
            }
        }

        /// Fit the canvas into the window and resize the GPU surface to match
        fn apply_viewport(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(CANVAS_WIDTH as f64);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(CANVAS_HEIGHT as f64);

            let vp = viewport::fit(width as f32, height as f32);
            let style = canvas.style();
            style.set_property("width", &format!("{}px", vp.width)).ok();
            style.set_property("height", &format!("{}px", vp.height)).ok();

            let (pw, ph) = vp.physical_size(window.device_pixel_ratio());
            canvas.set_width(pw);
            canvas.set_height(ph);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(pw, ph);
            }

            log::debug!("Viewport {}x{} (scale {:.2})", vp.width, vp.height, vp.scale);
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.set_volume(self.settings.effective_volume());
            self.settings.save();
            log::info!("Muted: {}", self.settings.muted);
        }

        fn toggle_fps(&mut self) {
            self.settings.show_fps = !self.settings.show_fps;
            self.settings.save();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Gate Flap starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window - cannot start");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document - cannot start");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element - cannot start");
            return;
        };

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().apply_viewport(&canvas);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU; without it the game still runs (HUD and audio)
        let (width, height) = (canvas.width(), canvas.height());
        match renderer::init_for_canvas(canvas.clone(), width, height).await {
            Ok(mut render_state) => {
                render_state.set_start_time(js_sys::Date::now());
                game.borrow_mut().render_state = Some(render_state);
            }
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        // Hide loading indicator, show HUD
        set_visible(&document, "loading", false);
        set_visible(&document, "hud", true);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_page_lifecycle(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Gate Flap running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if g.input.key_down(&code, event.repeat()) {
                    // Space would otherwise scroll the page
                    event.prevent_default();
                    g.audio.resume();
                    return;
                }
                if event.repeat() {
                    return;
                }
                match code.as_str() {
                    "KeyM" => g.toggle_mute(),
                    "KeyF" => g.toggle_fps(),
                    "KeyI" => {
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                if g.input.pointer_down() {
                    g.audio.resume();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                // Keep the browser from synthesizing a mousedown as well
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.input.touch_start(event.touches().length()) {
                    g.audio.resume();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                game.borrow_mut().input.touch_end(event.touches().length());
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Lost focus: releases may never arrive
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.release_all();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().apply_viewport(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop requesting frames while the page is hidden or cached, resume after
    fn setup_page_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.running = false;
                g.input.release_all();
                log::info!("Page hidden, frame loop stopped");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure =
                Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
                    {
                        let mut g = game.borrow_mut();
                        if g.running {
                            return;
                        }
                        g.running = true;
                        // Don't replay the time spent away
                        g.last_time = 0.0;
                        g.timestep.reset();
                        log::info!("Page shown (from cache: {}), resuming", event.persisted());
                    }
                    request_animation_frame(game.clone());
                });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Schedule the next frame. At most one request is ever in flight.
    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.frame_pending || !g.running {
                return;
            }
            g.frame_pending = true;
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        let pending = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
            pending.borrow_mut().frame_pending = false;
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame_pending = false;
            if !g.running {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless session length: two minutes of game time
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICKS: u64 = 60 * 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gate_flap::audio::{self, AudioCue};
    use gate_flap::persistence::{MemoryStore, ScoreStore};
    use gate_flap::{HighScore, Settings};
    use gate_flap::sim::{GameEvent, GameState, autopilot};

    env_logger::init();
    log::info!("Gate Flap (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| gate_flap::platform::now_ms() as u64);

    let audio = audio::for_platform(Settings::load().effective_volume());
    let mut store = MemoryStore::default();
    let mut state = GameState::new(seed, HighScore::load(&store));
    let ticks = autopilot::play(&mut state, DEMO_TICKS);

    let mut flaps = 0;
    for event in state.drain_events() {
        audio.play_event(event);
        match event {
            GameEvent::Jump => flaps += 1,
            GameEvent::NewHighScore(best) => {
                state.high_score.save(&mut store);
                log::info!("New best: {}", best);
            }
            GameEvent::Score | GameEvent::Crash => {}
        }
    }

    log::info!(
        "Seed {}: {:?} after {} ticks, {} in play ({:.1}s), {} flaps",
        state.seed,
        state.phase,
        ticks,
        state.time_ticks,
        state.time_ticks as f32 * gate_flap::consts::SIM_DT,
        flaps
    );
    println!(
        "Score: {} (best stored: {})",
        state.score,
        store.load_high_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
