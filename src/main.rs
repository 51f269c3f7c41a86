//! Tumbly Fumbles entry point
//!
//! On the web: binds the canvas, DOM readouts and LocalStorage and drives the
//! round controller from `requestAnimationFrame`. Natively: plays one round
//! headless with a simple autopilot and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use tumbly_fumbles::platform::web::{CanvasRenderer, DomDisplay, LocalStorage};
    use tumbly_fumbles::{RoundController, Tuning};

    type WebController = RoundController<DomDisplay, LocalStorage, CanvasRenderer>;

    /// Longest frame gap fed to the simulation (tab switches, breakpoints)
    const MAX_FRAME_MS: f64 = 250.0;

    /// Game instance holding the controller and frame timing
    struct Game {
        controller: WebController,
        last_time: f64,
        /// Sub-millisecond remainder carried between frames
        carry_ms: f64,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.carry_ms += dt;
            let whole = self.carry_ms.floor();
            self.carry_ms -= whole;
            self.controller.advance(whole as u64);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tumbly Fumbles starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("tv")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let storage = LocalStorage::open();
        let tuning =
            Tuning::load(&storage).fit_canvas(canvas.width() as f32, canvas.height() as f32);

        let renderer =
            CanvasRenderer::new(&canvas, document.clone(), &tuning).expect("no 2d context");
        let display = DomDisplay::new(document.clone());

        let seed = js_sys::Date::now() as u64;
        let controller = RoundController::new(tuning, seed, display, storage, renderer);
        let game = Rc::new(RefCell::new(Game {
            controller,
            last_time: 0.0,
            carry_ms: 0.0,
        }));

        log::info!("Console initialized with seed: {}", seed);

        setup_click_handler(&canvas, game.clone());
        setup_controller_buttons(game.clone());
        setup_keyboard(game.clone());

        request_animation_frame(game);
    }

    /// Translate a click from client pixels to canvas units
    fn to_canvas(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let bound = canvas.get_bounding_client_rect();
        let x_ratio = (f64::from(event.client_x()) - bound.left()) / (bound.right() - bound.left());
        let y_ratio = (f64::from(event.client_y()) - bound.top()) / (bound.bottom() - bound.top());
        Vec2::new(
            (x_ratio * f64::from(canvas.width())).trunc() as f32,
            (y_ratio * f64::from(canvas.height())).trunc() as f32,
        )
    }

    fn setup_click_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let point = to_canvas(&canvas_clone, &event);
            if let Some(action) = game.borrow_mut().controller.click(point) {
                log::info!("Clicked {:?}", action);
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// On-page left/right controller buttons
    fn setup_controller_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("right") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().controller.move_right();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("left") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().controller.move_left();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowRight" | "d" | "D" => g.controller.move_right(),
                "ArrowLeft" | "a" | "A" => g.controller.move_left(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
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
    env_logger::init();
    log::info!("Tumbly Fumbles (native) starting...");
    log::info!("Native mode plays one headless round - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    headless::play_round(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tumbly_fumbles::platform::{MemoryStorage, NullRenderer, RecordingDisplay};
    use tumbly_fumbles::{RoundController, RoundPhase, Tuning};

    type HeadlessController = RoundController<RecordingDisplay, MemoryStorage, NullRenderer>;

    /// How far above the player's head the autopilot starts dodging
    const LOOKAHEAD: f32 = 60.0;

    /// Steer away from the closest enemy about to land on the player
    fn steer(c: &mut HeadlessController) {
        let Some(player) = c.registry().player().map(|p| p.bounds()) else {
            return;
        };
        let width = c.tuning().canvas_width;

        let threat = c
            .registry()
            .iter()
            .filter_map(|(_, e)| e.as_enemy())
            .map(|e| e.bounds())
            .filter(|b| b.bottom >= player.top - LOOKAHEAD && b.overlaps_x(&player))
            .max_by(|a, b| a.bottom.total_cmp(&b.bottom));

        if let Some(threat) = threat {
            let threat_x = threat.center().x;
            let player_x = player.center().x;
            let go_right = if player_x < 15.0 {
                true
            } else if player_x > width - 15.0 {
                false
            } else {
                player_x >= threat_x
            };
            if go_right {
                c.move_right();
            } else {
                c.move_left();
            }
        }
    }

    pub fn play_round(seed: u64) {
        let mut c = RoundController::new(
            Tuning::default(),
            seed,
            RecordingDisplay::default(),
            MemoryStorage::new(),
            NullRenderer,
        );
        c.power_on();
        c.start();
        c.dismiss_instructions();

        let step = c.tuning().loop_interval_ms;
        let mut peak_enemies = 0;
        while c.phase() == RoundPhase::Running {
            steer(&mut c);
            c.advance(step);
            peak_enemies = peak_enemies.max(c.registry().enemy_count());
        }

        let stats = c.stats();
        log::info!(
            "Final score {} ({}s at full score, peak {} enemies on screen)",
            c.state().score,
            c.state().elapsed_at_max_score,
            peak_enemies
        );
        log::info!(
            "High score {:?}, {} completions, average {:?}s at full score",
            stats.high_score,
            stats.completions,
            stats.average_at_max_score
        );
        println!("score={} high={:?}", c.state().score, stats.high_score);
    }
}
