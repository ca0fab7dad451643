//! Game instance wiring
//!
//! A [`GameInstance`] owns one ruleset plus the shared machinery around it:
//! input tracker, loop driver and (optionally) a drawing surface. Hosts feed it
//! input events and display refresh timestamps; everything else happens inside
//! [`GameInstance::frame`].

use crate::render::{Scene, Surface};
use crate::settings::{GameKind, Settings};
use crate::sim::{DodgerState, GamePhase, InputEvent, InputTracker, LoopDriver, MemoryState, SnakeState, TickInput, Timing};
use crate::status::GameStatus;

/// The rules of one game, plugged into the shared engine
pub trait Ruleset {
    const KIND: GameKind;

    fn from_settings(settings: &Settings) -> Self
    where
        Self: Sized;

    /// How the game wants to be ticked (read again after every tick)
    fn timing(&self) -> Timing;

    /// Advance one tick: movement, spawning, then resolution
    fn step(&mut self, input: &TickInput, dt_ms: f32);

    fn phase(&self) -> GamePhase;

    fn score(&self) -> u32;

    /// Read-only UI projection of the current state
    fn status(&self) -> GameStatus;

    /// Back to the initial state, with a fresh RNG stream
    fn reset(&mut self);
}

/// One running game
pub struct GameInstance<R: Ruleset + Scene> {
    rules: R,
    input: InputTracker,
    driver: LoopDriver,
    surface: Option<Box<dyn Surface>>,
    status: GameStatus,
    warned_no_surface: bool,
}

impl<R: Ruleset + Scene> GameInstance<R> {
    pub fn new(settings: &Settings) -> Self {
        let rules = R::from_settings(settings);
        let driver = LoopDriver::new(rules.timing());
        let status = rules.status();
        Self {
            rules,
            input: InputTracker::new(),
            driver,
            surface: None,
            status,
            warned_no_surface: false,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Direct state access for hosts and tests
    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    /// Start ticking. Returns the driver generation.
    pub fn start(&mut self) -> u64 {
        self.input.clear_pending();
        self.driver.set_timing(self.rules.timing());
        let generation = self.driver.start();
        self.status = self.rules.status();
        self.render();
        log::info!("{} started (generation {})", R::KIND.as_str(), generation);
        generation
    }

    /// Stop ticking; pending ticks and timed transitions are abandoned
    pub fn stop(&mut self) {
        if self.driver.is_running() {
            self.driver.stop();
            log::info!("{} stopped", R::KIND.as_str());
        }
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn generation(&self) -> u64 {
        self.driver.generation()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.driver.is_current(generation)
    }

    /// Queue a host input event for the next tick
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.input.handle(event);
    }

    /// Run every tick due at `now_ms`. Returns how many ran.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.driver.begin_frame(now_ms);
        let mut ran = 0;
        while let Some(dt) = self.driver.next_tick() {
            let input = self.input.snapshot();
            self.rules.step(&input, dt);
            self.status = self.rules.status();
            self.render();
            ran += 1;

            if self.rules.phase().is_terminal() {
                log::info!("{} over with score {}", R::KIND.as_str(), self.rules.score());
                self.driver.stop();
                break;
            }
            self.driver.complete_tick(self.rules.timing());
        }
        ran
    }

    /// Restart from the initial state and resume ticking
    pub fn reset(&mut self) -> u64 {
        self.driver.stop();
        self.rules.reset();
        self.start()
    }

    /// Status as of the last tick
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.surface = Some(surface);
        self.warned_no_surface = false;
        self.render();
    }

    pub fn detach_surface(&mut self) -> Option<Box<dyn Surface>> {
        self.surface.take()
    }

    /// Draw the current state to an arbitrary surface
    pub fn render_to(&self, surface: &mut dyn Surface) {
        self.rules.draw(surface);
    }

    fn render(&mut self) {
        match self.surface.as_deref_mut() {
            Some(surface) => self.rules.draw(surface),
            None => {
                if !self.warned_no_surface {
                    log::warn!("{}: no surface attached, skipping render", R::KIND.as_str());
                    self.warned_no_surface = true;
                }
            }
        }
    }
}

impl<R: Ruleset + Scene> Drop for GameInstance<R> {
    fn drop(&mut self) {
        self.driver.stop();
        log::debug!("{} instance dropped", R::KIND.as_str());
    }
}

/// Any of the three games behind one type
pub enum Arcade {
    Dodger(GameInstance<DodgerState>),
    Snake(GameInstance<SnakeState>),
    Memory(GameInstance<MemoryState>),
}

macro_rules! each_game {
    ($self:expr, $game:ident => $body:expr) => {
        match $self {
            Arcade::Dodger($game) => $body,
            Arcade::Snake($game) => $body,
            Arcade::Memory($game) => $body,
        }
    };
}

impl Arcade {
    pub fn new(kind: GameKind, settings: &Settings) -> Self {
        match kind {
            GameKind::Dodger => Arcade::Dodger(GameInstance::new(settings)),
            GameKind::Snake => Arcade::Snake(GameInstance::new(settings)),
            GameKind::Memory => Arcade::Memory(GameInstance::new(settings)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Arcade::Dodger(_) => GameKind::Dodger,
            Arcade::Snake(_) => GameKind::Snake,
            Arcade::Memory(_) => GameKind::Memory,
        }
    }

    pub fn start(&mut self) -> u64 {
        each_game!(self, game => game.start())
    }

    pub fn stop(&mut self) {
        each_game!(self, game => game.stop())
    }

    pub fn is_running(&self) -> bool {
        each_game!(self, game => game.is_running())
    }

    pub fn generation(&self) -> u64 {
        each_game!(self, game => game.generation())
    }

    pub fn is_current(&self, generation: u64) -> bool {
        each_game!(self, game => game.is_current(generation))
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        each_game!(self, game => game.handle_event(event))
    }

    pub fn frame(&mut self, now_ms: f64) -> u32 {
        each_game!(self, game => game.frame(now_ms))
    }

    pub fn reset(&mut self) -> u64 {
        each_game!(self, game => game.reset())
    }

    pub fn status(&self) -> &GameStatus {
        each_game!(self, game => game.status())
    }

    pub fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        each_game!(self, game => game.attach_surface(surface))
    }

    pub fn detach_surface(&mut self) -> Option<Box<dyn Surface>> {
        each_game!(self, game => game.detach_surface())
    }

    pub fn render_to(&self, surface: &mut dyn Surface) {
        each_game!(self, game => game.render_to(surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Color, CommandBuffer};
    use crate::sim::Shape;
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts frames (clears) drawn into it
    struct FrameCounter(Rc<Cell<u32>>);

    impl Surface for FrameCounter {
        fn clear(&mut self, _color: Color) {
            self.0.set(self.0.get() + 1);
        }
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Color) {}
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {}
        fn fill_polygon(&mut self, _points: &[Vec2], _color: Color) {}
        fn stroke_polygon(&mut self, _points: &[Vec2], _color: Color, _line_width: f32) {}
        fn stroke_line(&mut self, _a: Vec2, _b: Vec2, _color: Color, _line_width: f32) {}
        fn fill_text(&mut self, _text: &str, _center: Vec2, _size_px: f32, _color: Color) {}
    }

    #[test]
    fn test_continuous_one_tick_per_frame() {
        let mut game: GameInstance<DodgerState> = GameInstance::new(&Settings::with_seed(1));
        assert_eq!(game.frame(0.0), 0, "not started");

        game.start();
        for i in 0..5 {
            assert_eq!(game.frame(i as f64 * 16.0), 1);
        }
        assert_eq!(game.rules().frame, 5);
    }

    #[test]
    fn test_snake_interval_ticks() {
        let mut game: GameInstance<SnakeState> = GameInstance::new(&Settings::with_seed(2));
        game.start();
        let start = game.rules().head();

        assert_eq!(game.frame(0.0), 0);
        assert_eq!(game.frame(100.0), 0);
        assert_eq!(game.frame(150.0), 1);
        assert_eq!(game.rules().head(), start + glam::IVec2::new(1, 0));
        assert_eq!(game.frame(200.0), 0);
        assert_eq!(game.frame(300.0), 1);
    }

    #[test]
    fn test_arrow_key_reaches_snake() {
        let mut game: GameInstance<SnakeState> = GameInstance::new(&Settings::with_seed(3));
        game.start();
        game.frame(0.0);
        game.handle_event(&InputEvent::KeyDown("ArrowDown".into()));
        game.frame(150.0);
        assert_eq!(game.rules().direction(), crate::sim::Direction::Down);
    }

    #[test]
    fn test_game_over_stops_loop() {
        let mut game: GameInstance<DodgerState> = GameInstance::new(&Settings::with_seed(4));
        let generation = game.start();
        assert!(game.is_current(generation));

        game.rules_mut().obstacles.push(Shape::circle(210.0, 357.0, 10.0));
        assert_eq!(game.frame(0.0), 1);
        assert!(game.status().is_game_over());
        assert!(!game.is_running());
        assert!(!game.is_current(generation));
        assert_eq!(game.frame(16.0), 0);
    }

    #[test]
    fn test_reset_restarts() {
        let mut game: GameInstance<DodgerState> = GameInstance::new(&Settings::with_seed(5));
        game.start();
        game.rules_mut().obstacles.push(Shape::circle(210.0, 357.0, 10.0));
        game.frame(0.0);
        assert!(game.status().is_game_over());

        let generation = game.reset();
        assert!(game.is_current(generation));
        assert_eq!(game.status().phase, GamePhase::Playing);
        assert_eq!(game.status().score, 0);
        assert!(game.rules().obstacles.is_empty());
        assert_eq!(game.frame(100.0), 1);
    }

    #[test]
    fn test_pause_key_toggles_and_keeps_loop() {
        let mut game: GameInstance<DodgerState> = GameInstance::new(&Settings::with_seed(6));
        game.start();
        game.handle_event(&InputEvent::KeyDown("p".into()));
        game.frame(0.0);
        assert_eq!(game.status().phase, GamePhase::Paused);
        assert_eq!(game.status().message, "Game Paused");

        game.frame(16.0);
        assert!(game.is_running());
        assert_eq!(game.rules().frame, 0);

        game.handle_event(&InputEvent::KeyUp("p".into()));
        game.handle_event(&InputEvent::KeyDown("p".into()));
        game.frame(32.0);
        assert_eq!(game.status().phase, GamePhase::Playing);
        assert_eq!(game.rules().frame, 1);
    }

    #[test]
    fn test_renders_only_with_surface() {
        let frames = Rc::new(Cell::new(0));
        let mut game: GameInstance<MemoryState> = GameInstance::new(&Settings::with_seed(7));
        game.start();
        game.frame(0.0);
        assert_eq!(frames.get(), 0);

        game.attach_surface(Box::new(FrameCounter(frames.clone())));
        assert_eq!(frames.get(), 1, "attach draws the current state");
        game.frame(16.0);
        game.frame(32.0);
        assert_eq!(frames.get(), 3);

        assert!(game.detach_surface().is_some());
        game.frame(48.0);
        assert_eq!(frames.get(), 3);
    }

    #[test]
    fn test_arcade_dispatch() {
        let settings = Settings::with_seed(8);
        for kind in GameKind::ALL {
            let mut arcade = Arcade::new(kind, &settings);
            assert_eq!(arcade.kind(), kind);
            assert_eq!(arcade.status().game, kind);
            arcade.start();
            arcade.frame(0.0);
            let mut buffer = CommandBuffer::new();
            arcade.render_to(&mut buffer);
            assert!(!buffer.is_empty());
        }

        let memory = Arcade::new(GameKind::Memory, &settings);
        assert_eq!(memory.status().level, Some(1));
    }

    #[test]
    fn test_stop_invalidates_generation() {
        let mut arcade = Arcade::new(GameKind::Snake, &Settings::with_seed(9));
        let generation = arcade.start();
        arcade.stop();
        assert!(!arcade.is_current(generation));
        assert!(!arcade.is_running());
        assert_eq!(arcade.frame(1000.0), 0);
    }
}
