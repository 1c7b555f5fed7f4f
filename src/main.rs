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
    use web_sys::{
        Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use gate_flap::consts::MAX_FRAME_DT_MS;
    use gate_flap::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use gate_flap::renderer::{RenderState, scene};
    use gate_flap::sim::Viewport;
    use gate_flap::ui::{GAME_OVER_TEXT, HudView};
    use gate_flap::{Driver, GameEvent, Settings};

    type Store = Box<dyn KeyValueStore>;

    /// Game instance holding all state
    struct Game {
        driver: Driver<Store>,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// An animation frame is pending
        loop_active: bool,
        /// Last HUD written to the DOM
        hud: Option<HudView>,
    }

    impl Game {
        /// Process events from the last frame
        fn handle_events(&mut self) {
            for event in self.driver.drain_events() {
                match event {
                    GameEvent::BestScore(best) => log::info!("New best score: {}", best),
                    GameEvent::GameOver { score, .. } => log::info!("Final score: {}", score),
                    other => log::debug!("{:?}", other),
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = match self.driver.session() {
                Some(session) => scene::build(session, self.driver.settings().obstacle_width),
                None => Vec::new(),
            };
            match render_state.render(&vertices, self.driver.viewport()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM (only when something changed)
        fn update_hud(&mut self) {
            let hud = HudView::from_driver(&self.driver);
            if self.hud.as_ref() == Some(&hud) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "score", hud.score_text.as_deref().unwrap_or(""));
            set_text(&document, "bestScore", &hud.best_text);
            set_text(&document, "countdown", &hud.countdown_text);
            set_style(
                &document,
                "countdown",
                "opacity",
                if hud.countdown_visible { "1" } else { "0" },
            );
            set_text(&document, "gameOver", GAME_OVER_TEXT);
            set_shown(&document, "gameOver", hud.game_over_visible);
            set_shown(&document, "gameCanvas", hud.canvas_visible);
            set_shown(&document, "startButton", hud.start_visible);
            set_shown(&document, "restartButton", hud.restart_visible);
            set_disabled(&document, "startButton", !hud.buttons_enabled);
            set_disabled(&document, "restartButton", !hud.buttons_enabled);

            self.hud = Some(hud);
        }

        /// Match canvas and surface to the window, then tell the driver
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(viewport) = window_viewport(&window) else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (viewport.width as f64 * dpr) as u32;
            let height = (viewport.height as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.driver.resize(viewport);
        }
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(document: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = element(document, id) {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_shown(document: &Document, id: &str, shown: bool) {
        set_style(document, id, "display", if shown { "block" } else { "none" });
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(btn) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            btn.set_disabled(disabled);
        }
    }

    fn window_viewport(window: &web_sys::Window) -> Option<Viewport> {
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        Some(Viewport::new(width as f32, height as f32))
    }

    /// Open LocalStorage, or fall back to a session-only store
    fn open_store() -> Store {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; best score will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Gate Flap starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let store = open_store();
        let settings = Settings::load(&store);
        let viewport = window_viewport(&window).unwrap_or(Viewport::new(400.0, 600.0));
        let seed = js_sys::Date::now() as u64;
        let driver = Driver::new(settings, store, viewport, seed);

        let game = Rc::new(RefCell::new(Game {
            driver,
            render_state: None,
            canvas: canvas.clone(),
            last_time: 0.0,
            loop_active: false,
            hud: None,
        }));
        game.borrow_mut().fit_to_window();

        // Initialize WebGPU (WebGL fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let (width, height) = (canvas.width(), canvas.height());
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_buttons(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());

        game.borrow_mut().update_hud();
        log::info!("Gate Flap ready!");
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (id, restart) in [("startButton", false), ("restartButton", true)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("No #{} element", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let accepted = {
                    let mut g = game.borrow_mut();
                    let accepted = if restart {
                        g.driver.restart()
                    } else {
                        g.driver.start()
                    };
                    g.fit_to_window();
                    g.update_hud();
                    accepted
                };
                if accepted {
                    ensure_loop(&game);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().driver.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().driver.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), " " | "ArrowUp") {
                    event.prevent_default();
                    game.borrow_mut().driver.jump();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            // No frame pending: repaint the frozen frame at the new size
            if !g.loop_active {
                g.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Start the frame chain unless a frame is already pending
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_active {
                return;
            }
            g.loop_active = true;
            g.last_time = 0.0;
        }
        request_animation_frame(game.clone());
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
        let keep_going = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                (time - g.last_time).min(MAX_FRAME_DT_MS)
            } else {
                0.0
            };
            g.last_time = time;

            g.driver.frame(dt);
            g.handle_events();
            g.render();
            g.update_hud();

            g.loop_active = g.driver.wants_frames();
            g.loop_active
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gate Flap (native) starting...");
    log::info!("The playable build is the web version; running a headless demo");

    let sessions = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(3);

    native::run(sessions);
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use gate_flap::consts::{NATIVE_STORE_PATH, NOMINAL_FRAME_MS};
    use gate_flap::persistence::{FileStore, KeyValueStore};
    use gate_flap::{Driver, GameEvent, Settings};

    /// Longest demo session, in ticks (about ten minutes at 60 Hz)
    const MAX_DEMO_TICKS: u32 = 36_000;

    /// Play `sessions` games with a simple autopilot, persisting the best score
    pub fn run(sessions: u32) {
        let store = FileStore::open_or_empty(NATIVE_STORE_PATH);
        let settings = Settings::load(&store);
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1);
        let viewport = gate_flap::sim::Viewport::new(800.0, 600.0);
        let mut driver = Driver::new(settings, store, viewport, seed);
        log::info!("Best score so far: {}", driver.best_score());

        for n in 1..=sessions {
            let accepted = if driver.is_over() {
                driver.restart()
            } else {
                driver.start()
            };
            if !accepted {
                break;
            }
            while !driver.is_running() {
                driver.frame(NOMINAL_FRAME_MS);
            }

            let mut ticks = 0;
            while driver.is_running() && ticks < MAX_DEMO_TICKS {
                autopilot(&mut driver);
                driver.frame(NOMINAL_FRAME_MS);
                ticks += 1;
            }

            for event in driver.drain_events() {
                if let GameEvent::BestScore(best) = event {
                    log::debug!("Best score raised to {}", best);
                }
            }
            let score = driver.session().map(|s| s.score).unwrap_or(0);
            println!(
                "Session {}: score {} after {} ticks (best {})",
                n,
                score,
                ticks,
                driver.best_score()
            );
            if driver.is_running() {
                log::info!("Session {} still alive after {} ticks, stopping", n, ticks);
                break;
            }
        }
    }

    /// Jump when the entity sinks below the centre of the next gap
    ///
    /// A little jitter in the target keeps sessions from lasting forever.
    fn autopilot<S: KeyValueStore>(driver: &mut Driver<S>) {
        let width = driver.settings().obstacle_width;
        let Some(session) = driver.session() else {
            return;
        };
        let entity = session.entity;
        let target = session
            .obstacles
            .iter()
            .find(|o| o.x + width >= entity.x)
            .map(|o| o.gap_top + o.gap_height / 2.0)
            .unwrap_or(session.viewport.height / 2.0);
        let wobble = ((session.time_ticks as f32) * 0.013).sin() * 90.0;
        if entity.y > target + wobble && entity.vel_y > 0.0 {
            driver.jump();
        }
    }
}
