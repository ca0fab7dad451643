//! Arcade Games entry point
//!
//! Native: runs one game headlessly with a simple autopilot and prints the
//! final status. Web: mounts the game named by `#canvas[data-game]`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_runner {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use arcade_games::render::canvas::CanvasSurface;
    use arcade_games::sim::InputEvent;
    use arcade_games::{Arcade, GameKind, GameStatus, Settings};

    type Listener = Closure<dyn FnMut(web_sys::Event)>;
    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Keys whose browser default (scrolling) is suppressed while playing
    const CAPTURED_KEYS: [&str; 5] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", " "];

    /// Everything one running game registered with the browser.
    /// Dropping it cancels the frame loop and removes every listener.
    pub struct RunnerHandle {
        arcade: Rc<RefCell<Arcade>>,
        frame_callback: FrameCallback,
        frame_id: Rc<Cell<Option<i32>>>,
        listeners: Vec<(EventTarget, &'static str, Listener)>,
    }

    impl RunnerHandle {
        fn listen(&mut self, target: &EventTarget, kind: &'static str, listener: Listener) {
            match target.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref()) {
                Ok(()) => self.listeners.push((target.clone(), kind, listener)),
                Err(e) => log::warn!("Failed to listen for {}: {:?}", kind, e),
            }
        }

        /// Forward a DOM event to the game as an input event
        fn forward<F>(&mut self, target: &EventTarget, kind: &'static str, translate: F)
        where
            F: Fn(&web_sys::Event) -> Option<InputEvent> + 'static,
        {
            let arcade = Rc::downgrade(&self.arcade);
            let listener = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = translate(&event) else {
                    return;
                };
                if let Some(arcade) = arcade.upgrade() {
                    arcade.borrow_mut().handle_event(&input);
                }
            });
            self.listen(target, kind, listener);
        }

        fn schedule_frames(&mut self) {
            let arcade: Weak<RefCell<Arcade>> = Rc::downgrade(&self.arcade);
            let callback = Rc::downgrade(&self.frame_callback);
            let frame_id = self.frame_id.clone();

            *self.frame_callback.borrow_mut() = Some(Closure::new(move |now: f64| {
                let Some(arcade) = arcade.upgrade() else {
                    return;
                };
                {
                    let mut arcade = arcade.borrow_mut();
                    if arcade.frame(now) > 0 {
                        update_hud(arcade.status());
                    }
                }
                if let Some(callback) = callback.upgrade() {
                    frame_id.set(request_frame(&callback));
                }
            }));
            self.frame_id.set(request_frame(&self.frame_callback));
        }
    }

    impl Drop for RunnerHandle {
        fn drop(&mut self) {
            if let (Some(window), Some(id)) = (web_sys::window(), self.frame_id.take()) {
                let _ = window.cancel_animation_frame(id);
            }
            self.frame_callback.borrow_mut().take();
            for (target, kind, listener) in self.listeners.drain(..) {
                let _ = target.remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
            }
            self.arcade.borrow_mut().stop();
            log::info!("Runner torn down");
        }
    }

    fn request_frame(callback: &FrameCallback) -> Option<i32> {
        let window = web_sys::window()?;
        let callback = callback.borrow();
        let closure = callback.as_ref()?;
        window.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
    }

    thread_local! {
        static RUNNER: RefCell<Option<RunnerHandle>> = const { RefCell::new(None) };
    }

    /// Push the status projection into the page
    fn update_hud(status: &GameStatus) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&status.score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("level") {
            match status.level.or(status.length.map(|l| l as u32)) {
                Some(value) => el.set_text_content(Some(&value.to_string())),
                None => el.set_text_content(None),
            }
        }
        if let Some(el) = document.get_element_by_id("targets") {
            match status.targets {
                Some(count) => el.set_text_content(Some(&format!("Numbers: {}", count))),
                None => el.set_text_content(None),
            }
        }
        if let Some(el) = document.get_element_by_id("message") {
            el.set_text_content(Some(&status.message));
        }
        if let Some(el) = document.get_element_by_id("overlay") {
            if status.overlay.visible {
                let _ = el.set_attribute("class", "");
                el.set_text_content(Some(&status.overlay.text));
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    /// Pointer position in canvas pixels (the canvas may be CSS-scaled)
    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
        let scale_y = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
        Vec2::new(
            ((event.client_x() as f64 - rect.left()) * scale_x) as f32,
            ((event.client_y() as f64 - rect.top()) * scale_y) as f32,
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let kind = canvas
            .get_attribute("data-game")
            .and_then(|name| GameKind::from_str(&name))
            .unwrap_or_default();
        let settings = match canvas.get_attribute("data-settings") {
            Some(json) => Settings::from_json_or_default(&json),
            None => Settings::with_seed(js_sys::Date::now() as u64),
        };
        log::info!("Arcade Games starting {} (seed {})", kind.as_str(), settings.seed);

        let mut arcade = Arcade::new(kind, &settings);
        match CanvasSurface::new(&canvas) {
            Some(surface) => arcade.attach_surface(Box::new(surface)),
            None => log::warn!("Running without a drawing surface"),
        }
        arcade.start();
        update_hud(arcade.status());

        let mut handle = RunnerHandle {
            arcade: Rc::new(RefCell::new(arcade)),
            frame_callback: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        };

        handle.forward(&window, "keydown", |event| {
            let event = event.dyn_ref::<KeyboardEvent>()?;
            let key = event.key();
            if CAPTURED_KEYS.contains(&key.as_str()) {
                event.prevent_default();
            }
            Some(InputEvent::KeyDown(key))
        });
        handle.forward(&window, "keyup", |event| {
            let event = event.dyn_ref::<KeyboardEvent>()?;
            Some(InputEvent::KeyUp(event.key()))
        });
        {
            let target = canvas.clone();
            handle.forward(&canvas, "pointerdown", move |event| {
                let event = event.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::PointerDown(canvas_point(&target, event)))
            });
        }
        {
            let target = canvas.clone();
            handle.forward(&canvas, "pointerup", move |event| {
                let event = event.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::PointerUp(canvas_point(&target, event)))
            });
        }

        if let Some(button) = document.get_element_by_id("restart-btn") {
            let arcade = Rc::downgrade(&handle.arcade);
            let listener = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(arcade) = arcade.upgrade() {
                    let mut arcade = arcade.borrow_mut();
                    arcade.reset();
                    update_hud(arcade.status());
                }
            });
            handle.listen(&button, "click", listener);
        }

        handle.schedule_frames();
        RUNNER.with(|runner| {
            // Replacing an earlier runner drops (and tears down) it
            *runner.borrow_mut() = Some(handle);
        });
        log::info!("Arcade Games running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_runner::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use arcade_games::render::CommandBuffer;
    use arcade_games::sim::{Direction, Extent, GamePhase, InputEvent};
    use arcade_games::{Arcade, GameKind, Settings};
    use glam::Vec2;

    /// Simulated display refresh (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Hard stop for runs whose ticks are much slower than frames
    const MAX_FRAMES: u64 = 1_000_000;

    pub struct Options {
        pub kind: GameKind,
        pub ticks: u64,
        pub seed: Option<u64>,
    }

    impl Options {
        /// `[dodger|snake|memory] [ticks] [seed]`, each optional
        pub fn from_args(args: &[String]) -> Self {
            let kind = match args.first() {
                Some(name) => GameKind::from_str(name).unwrap_or_else(|| {
                    log::warn!("Unknown game '{}', running dodger", name);
                    GameKind::Dodger
                }),
                None => GameKind::Dodger,
            };
            let ticks = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(600);
            let seed = args.get(2).and_then(|s| s.parse().ok());
            Self { kind, ticks, seed }
        }
    }

    fn key_for(direction: Direction) -> &'static str {
        match direction {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }

    /// Queue the inputs a naive player would give this frame
    fn autopilot(arcade: &mut Arcade) {
        let mut events = Vec::new();
        match arcade {
            Arcade::Dodger(game) => {
                let state = game.rules();
                let center = state.player.center();
                // Sidestep the closest obstacle heading for the player's column
                let threat = state
                    .obstacles
                    .iter()
                    .filter(|o| o.pos.y < center.y)
                    .filter(|o| match o.extent {
                        Extent::Circle { radius } => (o.pos.x - center.x).abs() < radius + state.player.size().x,
                        Extent::Box { .. } => false,
                    })
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
                let steer = threat.map(|o| {
                    let near_right_wall = center.x > state.config.width - 40.0;
                    if o.pos.x > center.x || near_right_wall { Direction::Left } else { Direction::Right }
                });
                for side in [Direction::Left, Direction::Right] {
                    if steer == Some(side) {
                        events.push(InputEvent::KeyDown(key_for(side).into()));
                    } else {
                        events.push(InputEvent::KeyUp(key_for(side).into()));
                    }
                }
            }
            Arcade::Snake(game) => {
                let state = game.rules();
                let target = state.bonus.first().copied().or(state.food);
                if let Some(target) = target {
                    let delta = target - state.head();
                    let wanted = if delta.x > 0 {
                        Direction::Right
                    } else if delta.x < 0 {
                        Direction::Left
                    } else if delta.y > 0 {
                        Direction::Down
                    } else {
                        Direction::Up
                    };
                    if wanted != state.direction() && wanted != state.direction().opposite() {
                        events.push(InputEvent::KeyDown(key_for(wanted).into()));
                        events.push(InputEvent::KeyUp(key_for(wanted).into()));
                    }
                }
            }
            Arcade::Memory(game) => {
                let state = game.rules();
                if state.phase() == GamePhase::Recall {
                    let next = state
                        .expected_next()
                        .and_then(|value| state.targets.iter().find(|t| t.value == value));
                    if let Some(target) = next {
                        let pos: Vec2 = target.shape.pos;
                        events.push(InputEvent::PointerDown(pos));
                        events.push(InputEvent::PointerUp(pos));
                    }
                }
            }
        }
        for event in &events {
            arcade.handle_event(event);
        }
    }

    pub fn run(options: Options) -> serde_json::Value {
        let settings = match options.seed {
            Some(seed) => Settings::with_seed(seed),
            None => Settings::default(),
        };
        log::info!(
            "Running {} for {} ticks (seed {})",
            options.kind.as_str(),
            options.ticks,
            settings.seed
        );

        let mut arcade = Arcade::new(options.kind, &settings);
        arcade.start();

        let mut ticks = 0;
        let mut frames = 0;
        while ticks < options.ticks && arcade.is_running() && frames < MAX_FRAMES {
            autopilot(&mut arcade);
            ticks += arcade.frame(frames as f64 * FRAME_MS) as u64;
            frames += 1;
        }

        let mut buffer = CommandBuffer::new();
        arcade.render_to(&mut buffer);
        log::info!("Stopped after {} ticks over {} frames", ticks, frames);

        serde_json::json!({
            "ticks": ticks,
            "status": arcade.status(),
            "draw_commands": buffer.len(),
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Games (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let report = headless::run(headless::Options::from_args(&args));
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}
