//! Cube Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use cube_dash::Tuning;
    use cube_dash::physics::PhysicsWorld;
    use cube_dash::renderer::{Camera, RenderState, Starfield, build_frame};
    use cube_dash::sim::{GamePhase, GameState, Key, key_down, key_up, reset, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        physics: PhysicsWorld,
        camera: Camera,
        starfield: Starfield,
        render_state: Option<RenderState>,
    }

    impl Game {
        fn new(seed: u64, width: u32, height: u32) -> Self {
            let tuning = Tuning::load();
            let mut physics = PhysicsWorld::new(tuning.gravity);
            let state = GameState::new(seed, tuning, &mut physics);
            let starfield = Starfield::new(&mut Pcg32::seed_from_u64(seed ^ 0x5f));
            Self {
                state,
                physics,
                camera: Camera::new(width, height),
                starfield,
                render_state: None,
            }
        }

        /// Advance the simulation one frame
        fn update(&mut self) {
            tick(&mut self.state, &mut self.physics);
            self.starfield.advance();
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_frame(&self.state, &self.starfield);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, &self.camera) {
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
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.hud_text()));
            }

            // Replay button only while the run is over
            if let Some(el) = document.get_element_by_id("replay") {
                let class = if self.state.phase == GamePhase::Ended {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cube Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, width, height)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_replay_button(game.clone());
        setup_resize_handler(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Cube Dash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    let mut g = game.borrow_mut();
                    let Game {
                        ref mut state,
                        ref mut physics,
                        ..
                    } = *g;
                    key_down(state, physics, key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    key_up(&mut game.borrow_mut().state, key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_replay_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("replay") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let Game {
                    ref mut state,
                    ref mut physics,
                    ..
                } = *g;
                reset(state, physics);
                log::info!("Run restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.camera.resize(width, height);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
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

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cube_dash::Tuning;
    use cube_dash::physics::PhysicsWorld;
    use cube_dash::sim::{GamePhase, GameState, Key, key_down, key_up, tick};

    env_logger::init();
    log::info!("Cube Dash (native) starting...");
    log::info!("Headless mode - run with `trunk serve` for the web version");

    let tuning = Tuning::load();
    let mut physics = PhysicsWorld::new(tuning.gravity);
    let mut state = GameState::new(42, tuning, &mut physics);

    // Scripted session: dodge left for a bit, jump, then let the run play
    // out until an enemy connects.
    let mut frames = 0u32;
    while state.phase == GamePhase::Running && frames < 60 * 60 {
        if frames < 30 {
            key_down(&mut state, &mut physics, Key::Left);
        } else if frames == 30 {
            key_up(&mut state, Key::Left);
            key_down(&mut state, &mut physics, Key::Jump);
        }
        tick(&mut state, &mut physics);
        frames += 1;
    }

    println!("{} ({} frames)", state.hud_text(), frames);
}
