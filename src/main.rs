//! Glitch Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use glitch_runner::audio::{AudioManager, SoundEffect, SoundPack};
    use glitch_runner::consts::*;
    use glitch_runner::renderer::CanvasRenderer;
    use glitch_runner::sim::{
        GameEvent, GamePhase, GameState, PowerupKind, Snapshot, TickInput, Viewport, run_rng, tick,
    };
    use glitch_runner::{Profile, Settings, Tuning, catalog};
    use rand_pcg::Pcg32;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        profile: Profile,
        settings: Settings,
        tuning: Tuning,
        audio: AudioManager,
        renderer: Option<CanvasRenderer>,
        view: Viewport,
        accumulator: f32,
        last_time: f64,
        /// Controls currently held down
        held: TickInput,
        /// Pause requested since the last tick
        pause_queued: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Pending animation-frame registration
        frame_handle: Option<i32>,
        /// Run already written to the profile
        banked: bool,
    }

    impl Game {
        fn new(seed: u64, view: Viewport) -> Self {
            let profile = Profile::load();
            let settings = Settings::load();
            let tuning = Tuning::default();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            audio.set_pack(SoundPack::from_id(&profile.equipped.audio));

            let state = GameState::with_config(
                seed,
                glitch_runner::sim::RunConfig {
                    view,
                    ..profile.run_config(tuning.clone())
                },
            );

            Self {
                state,
                rng: run_rng(seed),
                profile,
                settings,
                tuning,
                audio,
                renderer: None,
                view,
                accumulator: 0.0,
                last_time: 0.0,
                held: TickInput::default(),
                pause_queued: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                frame_handle: None,
                banked: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    pause: std::mem::take(&mut self.pause_queued),
                    ..self.held
                };
                tick(&mut self.state, &input, &mut self.rng);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.dispatch_events();
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            if self.state.is_over() && !self.banked {
                self.banked = true;
                let summary = self.state.summary();
                if self.profile.record_run(&summary) {
                    log::info!("New high score: {}", summary.score);
                }
                self.profile.save();
            }
        }

        /// Route simulation events to audio and the profile
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                if event == GameEvent::ExtraLifeUsed {
                    self.profile.consume_restore();
                    self.profile.save();
                }
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&Snapshot::capture(&self.state), &self.settings);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let stats = &self.state.stats;
            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set("#hud-score .hud-value", &stats.score.to_string());
            set("#hud-bits .hud-value", &stats.bits_collected.to_string());
            set("#hud-distance .hud-value", &format!("{}m", stats.distance));
            set("#hud-speed .hud-value", &format!("x{:.1}", stats.speed_ratio));
            set("#hud-restores .hud-value", &stats.revives_left.to_string());
            if self.settings.show_fps {
                set("#hud-fps .hud-value", &self.fps.to_string());
            }

            // Active modifier list
            if let Some(el) = document.get_element_by_id("hud-modifiers") {
                let text = stats
                    .active
                    .iter()
                    .map(|m| format!("{} {:.0}%", m.kind.label(), m.progress * 100.0))
                    .collect::<Vec<_>>()
                    .join(" | ");
                el.set_text_content(Some(&text));
            }

            toggle(document, "pause-menu", self.state.phase == GamePhase::Paused);

            // Show/hide game over
            let over = self.state.is_over();
            toggle(document, "game-over", over);
            if over {
                let summary = self.state.summary();
                set("#final-score", &summary.score.to_string());
                set("#final-bits", &summary.bits.to_string());
                set("#final-distance", &format!("{}m", summary.distance));
                set("#high-score", &self.profile.high_score.to_string());
                set("#total-bits", &self.profile.total_bits.to_string());
            }
        }

        /// Start a fresh run with the current profile
        fn restart(&mut self, seed: u64) {
            self.state = GameState::with_config(
                seed,
                glitch_runner::sim::RunConfig {
                    view: self.view,
                    ..self.profile.run_config(self.tuning.clone())
                },
            );
            self.rng = run_rng(seed);
            self.accumulator = 0.0;
            self.last_time = 0.0;
            self.held = TickInput::default();
            self.pause_queued = false;
            self.banked = false;
        }

        /// Shop click on an item (`data-item`) or upgrade (`data-upgrade`) button
        fn shop_action(&mut self, item: Option<String>, upgrade: Option<String>) {
            let outcome = if let Some(id) = item {
                if self.profile.is_unlocked(&id) {
                    self.profile.equip(&id)
                } else {
                    self.profile.purchase(&id)
                }
            } else if let Some(name) = upgrade {
                match serde_json::from_value::<PowerupKind>(serde_json::Value::String(name)) {
                    Ok(kind) => {
                        let outcome = self.profile.upgrade(kind);
                        let level = self.profile.powerup_levels.level(kind);
                        if let Some(el) = web_sys::window()
                            .and_then(|w| w.document())
                            .and_then(|d| d.get_element_by_id("shop-detail"))
                        {
                            el.set_text_content(Some(&catalog::upgrade_summary(kind, level)));
                        }
                        outcome
                    }
                    Err(e) => {
                        log::warn!("Bad upgrade target: {}", e);
                        return;
                    }
                }
            } else {
                return;
            };

            self.audio.play(SoundEffect::for_purchase(outcome));
            if outcome.is_success() {
                self.profile.save();
                self.audio
                    .set_pack(SoundPack::from_id(&self.profile.equipped.audio));
                if let Some(renderer) = &mut self.renderer {
                    renderer.apply_profile(&self.profile);
                }
            }
        }
    }

    fn toggle(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Glitch Runner starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        toggle(&document, "loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Canvas is sized in world units; CSS scales it
        let view = Viewport {
            width: canvas.client_width().max(1) as f32,
            height: canvas.client_height().max(1) as f32,
        };
        canvas.set_width(view.width as u32);
        canvas.set_height(view.height as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, view)));
        {
            let mut g = game.borrow_mut();
            g.renderer = CanvasRenderer::new(&canvas);
            if g.renderer.is_none() {
                log::error!("Canvas 2D context unavailable");
            }
            let profile = g.profile.clone();
            if let Some(renderer) = &mut g.renderer {
                renderer.apply_profile(&profile);
            }
        }

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, game.clone());
        setup_restart_button(&document, game.clone());
        setup_shop(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        setup_teardown(&window, game.clone());

        toggle(&document, "hud", true);

        request_animation_frame(game);

        log::info!("Glitch Runner running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down: hold controls, queue pause
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.code().as_str() {
                    "Space" | "ArrowUp" | "KeyW" => {
                        event.prevent_default();
                        g.held.jump = true;
                    }
                    "ArrowDown" | "KeyS" => {
                        event.prevent_default();
                        g.held.down = true;
                    }
                    "ArrowLeft" | "KeyA" => g.held.left = true,
                    "ArrowRight" | "KeyD" => g.held.right = true,
                    "KeyP" | "Escape" if !event.repeat() => g.pause_queued = true,
                    "KeyM" if !event.repeat() => {
                        let muted = g.settings.toggle_mute();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        settings.save();
                        log::info!("Muted: {}", muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held controls
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "ArrowUp" | "KeyW" => g.held.jump = false,
                    "ArrowDown" | "KeyS" => g.held.down = false,
                    "ArrowLeft" | "KeyA" => g.held.left = false,
                    "ArrowRight" | "KeyD" => g.held.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let handle_owner = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        handle_owner.borrow_mut().frame_handle = handle;
        closure.forget();
    }

    fn cancel_animation_frame(game: &Rc<RefCell<Game>>) {
        let Some(handle) = game.borrow_mut().frame_handle.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle);
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;

            // Calculate delta time
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
            !g.state.is_over()
        };

        if keep_running {
            request_animation_frame(game);
        } else {
            log::info!("Run ended, loop stopped");
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                cancel_animation_frame(&game);
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
                request_animation_frame(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_shop(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(shop) = document.get_element_by_id("shop") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(target) = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                else {
                    return;
                };
                let item = target.get_attribute("data-item");
                let upgrade = target.get_attribute("data-upgrade");
                game.borrow_mut().shop_action(item, upgrade);
            });
            let _ =
                shop.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    // Auto-pause if playing
                    if g.state.phase == GamePhase::Playing {
                        g.pause_queued = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.held = TickInput::default();
                if g.state.phase == GamePhase::Playing {
                    g.pause_queued = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    let mut muted = g.settings.clone();
                    muted.muted = true;
                    g.audio.apply_settings(&muted);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores the configured volume
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let settings = g.settings.clone();
                g.audio.apply_settings(&settings);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            cancel_animation_frame(&game);
            log::info!("Game torn down");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run on a seeded RNG with a simple autopilot.
///
/// Usage: `glitch-runner [seed] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glitch_runner::sim::{GameEvent, GameState, run_rng, tick};
    use glitch_runner::{Profile, Tuning};

    env_logger::init();
    log::info!("Glitch Runner (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to play in the browser");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut profile = Profile::default();
    let mut state = GameState::with_config(seed, profile.run_config(tuning));
    let mut rng = run_rng(seed);

    // Five minutes of game time at most
    let mut jumps = 0u32;
    for _ in 0..60 * 60 * 5 {
        let input = autopilot(&state);
        tick(&mut state, &input, &mut rng);
        for event in state.drain_events() {
            match event {
                GameEvent::Jump | GameEvent::DoubleJump => jumps += 1,
                GameEvent::ExtraLifeUsed => profile.consume_restore(),
                _ => {}
            }
        }
        if state.is_over() {
            break;
        }
    }

    let summary = state.summary();
    let best = profile.record_run(&summary);
    println!(
        "seed {}: score {}, bits {}, distance {}m, {} jumps, {} ticks{}",
        seed,
        summary.score,
        summary.bits,
        summary.distance,
        jumps,
        state.clock.ticks,
        if best { " (new high score)" } else { "" }
    );
}

/// Jump over ground hazards, slide under low ones
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &glitch_runner::sim::GameState) -> glitch_runner::sim::TickInput {
    use glitch_runner::sim::{MotionState, TickInput};

    let ground = state.ground_y();
    let hitbox = state.player.hitbox(ground);
    let ahead = state
        .entities
        .live_obstacles()
        .filter(|o| o.rect.right() > hitbox.x && o.rect.x < hitbox.right() + 120.0)
        .min_by(|a, b| a.rect.x.total_cmp(&b.rect.x));

    match ahead {
        // Bottom edge above a sliding runner's head: duck
        Some(o) if o.rect.bottom() < ground - 45.0 => TickInput {
            down: true,
            ..Default::default()
        },
        // Jump only from the ground so every press is a fresh edge
        Some(_) if state.player.motion == MotionState::Running => TickInput {
            jump: true,
            ..Default::default()
        },
        _ => TickInput::default(),
    }
}
