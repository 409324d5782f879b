//! CRT Runner entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use crt_runner::audio::{GameMusic, MusicControl};
    use crt_runner::renderer::CanvasRenderer;
    use crt_runner::sim::{GameEvent, GameState, MoveDir, TickInput, Viewport, tick};
    use crt_runner::tuning::Tuning;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        renderer: CanvasRenderer,
        music: Option<GameMusic>,
    }

    impl Game {
        /// Run one simulation frame and act on the events it produced
        fn update(&mut self) {
            tick(&mut self.state, &self.input);

            // Clear one-shot intents after processing
            self.input.jump = false;
            self.input.restart = false;
            self.input.toggle_mute = false;
            self.input.move_dir = None;
            self.input.hold_lift = None;

            for event in self.state.drain_events() {
                match event {
                    GameEvent::GameOver => {
                        if let Some(music) = &self.music {
                            music.pause();
                            music.rewind();
                        }
                    }
                    GameEvent::Restarted => {
                        if !self.state.muted {
                            if let Some(music) = &self.music {
                                music.play();
                            }
                        }
                        log::info!("run restarted");
                    }
                    GameEvent::MuteToggled { muted } => {
                        if let Some(music) = &self.music {
                            if muted {
                                music.pause();
                            } else {
                                music.play();
                            }
                        }
                        update_music_label(muted);
                    }
                    GameEvent::StarCollected { .. } => {}
                }
            }
        }

        fn render(&self) {
            self.renderer.draw(&self.state);
        }
    }

    fn update_music_label(muted: bool) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("music-controls") {
            let label = if muted {
                "[SOUND OFF] Music [M]"
            } else {
                "[SOUND ON] Music [M]"
            };
            el.set_text_content(Some(label));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("CRT Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let viewport = match Viewport::new(canvas.width() as f32, canvas.height() as f32) {
            Ok(v) => v,
            Err(err) => {
                log::error!("refusing to start: {err}");
                return;
            }
        };

        // Hosts may override balance via a data attribute on the canvas
        let tuning = match canvas.get_attribute("data-tuning") {
            Some(json) => match Tuning::from_json(&json) {
                Ok(t) => t,
                Err(err) => {
                    log::warn!("bad data-tuning attribute, using defaults: {err}");
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };
        if let Err(err) = tuning.validate() {
            log::error!("refusing to start: {err}");
            return;
        }

        let seed = js_sys::Date::now() as u64;
        let music = GameMusic::from_document("game-music");
        if music.is_none() {
            log::info!("no game-music element, running silent");
        }

        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(r) => r,
            Err(err) => {
                log::error!("failed to get 2d context: {err:?}");
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, viewport, tuning),
            input: TickInput::default(),
            renderer,
            music,
        }));

        log::info!("Game initialized with seed: {seed}");

        setup_input_handlers(game.clone());
        setup_music_handlers(game.clone());
        update_music_label(false);

        request_animation_frame(game);

        log::info!("CRT Runner running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down: edges only set intent fields; the next tick consumes them
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => g.input.jump = true,
                    "ArrowLeft" => g.input.move_dir = Some(MoveDir::Left),
                    "ArrowRight" => g.input.move_dir = Some(MoveDir::Right),
                    "ArrowUp" => g.input.hold_lift = Some(true),
                    "m" | "M" => g.input.toggle_mute = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release edges
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "ArrowRight" => g.input.move_dir = Some(MoveDir::Halt),
                    "ArrowUp" => g.input.hold_lift = Some(false),
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_music_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Clicking the music control toggles mute like the M key
        if let Some(controls) = document.get_element_by_id("music-controls") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.toggle_mute = true;
            });
            let _ = controls
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Track ready: hide the loading indicator and start playing
        if let Some(audio_el) = document.get_element_by_id("game-music") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(loading) = document.get_element_by_id("loading") {
                    let _ = loading.set_attribute("class", "hidden");
                }
                let g = game.borrow();
                if !g.state.muted {
                    if let Some(music) = &g.music {
                        music.play();
                    }
                }
            });
            let _ = audio_el
                .add_event_listener_with_callback("canplaythrough", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Autoplay is blocked until a user gesture; retry on any click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let g = game.borrow();
                if !g.state.muted {
                    if let Some(music) = &g.music {
                        music.play();
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use crt_runner::sim::{GameState, TickInput, Viewport, tick};
    use crt_runner::tuning::Tuning;

    env_logger::init();
    log::info!("CRT Runner (native) starting...");
    log::info!("Native mode is a headless smoke run - serve the web build to play");

    let tuning = Tuning::default();
    if let Err(err) = tuning.validate() {
        log::error!("refusing to start: {err}");
        return;
    }
    let viewport = match Viewport::new(1200.0, 700.0) {
        Ok(v) => v,
        Err(err) => {
            log::error!("refusing to start: {err}");
            return;
        }
    };

    let mut state = GameState::new(42, viewport, tuning);
    let mut frames = 0u32;
    while state.running() && frames < 3600 {
        // Hop periodically so the run survives a few obstacles
        let input = TickInput {
            jump: frames % 90 == 0,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        frames += 1;
    }

    log::info!(
        "smoke run finished after {frames} frames: distance {}, bonus {}",
        state.distance(),
        state.bonus_points
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
