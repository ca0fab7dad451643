//! Snake ruleset
//!
//! Grid-stepped snake with screen wrap. Regular food speeds the game up; each
//! new multiple of the bonus step scatters golden stars worth extra points.

use std::collections::VecDeque;

use glam::IVec2;
use rand_pcg::Pcg32;

use super::clock::Timing;
use super::input::{Direction, DirectionBuffer, TickInput};
use super::phase::{GamePhase, PhaseMachine};
use super::session_rng;
use super::spawn::{ScoreMilestone, random_free_cell};
use crate::engine::Ruleset;
use crate::settings::{GameKind, Settings, SnakeConfig};
use crate::status::{GameStatus, Overlay};
use crate::wrap_coord;

/// Last notable thing that happened (drives the status message)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeEvent {
    Started,
    Paused,
    Resumed,
    Ate,
    /// Ate regular food and crossed a bonus milestone
    AteWithBonus,
    AteBonus,
    Crashed,
}

/// Complete snake session state
#[derive(Debug, Clone)]
pub struct SnakeState {
    pub config: SnakeConfig,
    seed: u64,
    session: u64,
    rng: Pcg32,
    /// Body cells, head first
    pub body: VecDeque<IVec2>,
    /// None only when the board had no free cell left
    pub food: Option<IVec2>,
    pub bonus: Vec<IVec2>,
    direction: DirectionBuffer,
    pub score: u32,
    /// Current tick interval
    pub speed_ms: f32,
    phase: PhaseMachine,
    bonus_milestone: ScoreMilestone,
    pub last_event: SnakeEvent,
}

impl SnakeState {
    pub fn new(config: SnakeConfig, seed: u64) -> Self {
        Self::new_session(config, seed, 0)
    }

    fn new_session(config: SnakeConfig, seed: u64, session: u64) -> Self {
        let config = config.sanitized();
        let start = IVec2::new(
            wrap_coord(config.start_x, config.grid_size),
            wrap_coord(config.start_y, config.grid_size),
        );
        let mut state = Self {
            seed,
            session,
            rng: session_rng(seed, session),
            body: VecDeque::from([start]),
            food: None,
            bonus: Vec::new(),
            direction: DirectionBuffer::new(Direction::Right),
            score: 0,
            speed_ms: config.initial_speed_ms,
            phase: PhaseMachine::new(GamePhase::Playing),
            bonus_milestone: ScoreMilestone::new(config.bonus_score_step),
            last_event: SnakeEvent::Started,
            config,
        };
        state.place_food();
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction.committed()
    }

    /// Queue a direction change for the next step (reversals are refused)
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !self.phase.is(GamePhase::Playing) {
            return false;
        }
        self.direction.request(direction)
    }

    /// Advance one grid step
    pub fn tick(&mut self, input: &TickInput) {
        if input.pause && self.phase.current().accepts_pause() {
            self.phase.toggle_pause();
            if self.phase.is(GamePhase::Paused) {
                self.last_event = SnakeEvent::Paused;
                return;
            }
            self.last_event = SnakeEvent::Resumed;
        }

        if !self.phase.is(GamePhase::Playing) {
            return;
        }

        for direction in &input.directions {
            self.request_direction(*direction);
        }

        // Movement
        let dir = self.direction.commit();
        let step = self.head() + dir.delta();
        let head = IVec2::new(
            wrap_coord(step.x, self.config.grid_size),
            wrap_coord(step.y, self.config.grid_size),
        );

        // Resolution
        let ate_food = self.food == Some(head);
        let bonus_index = self.bonus.iter().position(|cell| *cell == head);
        let grows = ate_food || bonus_index.is_some();

        // The tail moves out of the way unless the snake grows this step
        let blocking = if grows {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self.body.iter().take(blocking).any(|cell| *cell == head) {
            self.phase.transition(GamePhase::GameOver);
            self.last_event = SnakeEvent::Crashed;
            log::info!("Snake over: score {}, length {}", self.score, self.body.len());
            return;
        }

        self.body.push_front(head);
        if !grows {
            self.body.pop_back();
        }

        if ate_food {
            self.score += self.config.food_points;
            self.speed_ms = (self.speed_ms - self.config.speed_step_ms).max(self.config.min_speed_ms);
            self.food = None;
            self.last_event = SnakeEvent::Ate;
        }
        if let Some(index) = bonus_index {
            self.bonus.remove(index);
            self.score += self.config.bonus_points;
            self.last_event = SnakeEvent::AteBonus;
        }

        // Spawn reactions
        if self.food.is_none() {
            self.place_food();
        }
        // Only regular food scatters bonus stars
        if ate_food && self.bonus_milestone.check(self.score) {
            self.spawn_bonus();
            self.last_event = SnakeEvent::AteWithBonus;
        }
    }

    fn is_occupied(&self, cell: IVec2) -> bool {
        self.body.contains(&cell) || self.food == Some(cell) || self.bonus.contains(&cell)
    }

    fn place_food(&mut self) {
        let mut rng = self.rng.clone();
        self.food = random_free_cell(&mut rng, self.config.grid_size, |cell| self.is_occupied(cell));
        self.rng = rng;
        if self.food.is_none() {
            log::warn!("No free cell for food, skipping spawn");
        }
    }

    /// Replace any leftover stars with a fresh batch
    fn spawn_bonus(&mut self) {
        self.bonus.clear();
        let mut rng = self.rng.clone();
        for _ in 0..self.config.bonus_count {
            let free = random_free_cell(&mut rng, self.config.grid_size, |cell| self.is_occupied(cell));
            match free {
                Some(cell) => self.bonus.push(cell),
                None => {
                    log::warn!("No free cell for bonus food, skipping the rest");
                    break;
                }
            }
        }
        self.rng = rng;
        log::info!("Score {}: {} bonus items on the board", self.score, self.bonus.len());
    }
}

impl Ruleset for SnakeState {
    const KIND: GameKind = GameKind::Snake;

    fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.snake.clone(), settings.seed)
    }

    fn timing(&self) -> Timing {
        Timing::Interval {
            period_ms: self.speed_ms,
        }
    }

    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        self.tick(input);
    }

    fn phase(&self) -> GamePhase {
        self.phase.current()
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn status(&self) -> GameStatus {
        let message = match self.last_event {
            SnakeEvent::Started | SnakeEvent::Resumed => "Use arrow keys or WASD to play!".to_string(),
            SnakeEvent::Paused => "Game Paused".to_string(),
            SnakeEvent::Ate => format!("Score: {} 🍎", self.score),
            SnakeEvent::AteWithBonus => format!("Score: {} 🍎 BONUS FOOD! ⭐", self.score),
            SnakeEvent::AteBonus => format!("Score: {} ⭐ Bonus!", self.score),
            SnakeEvent::Crashed => format!("Final score: {}, length: {}", self.score, self.body.len()),
        };
        let overlay = if self.phase.is(GamePhase::GameOver) {
            Overlay::shown("Game Over! 💀")
        } else {
            Overlay::hidden()
        };
        GameStatus {
            game: Self::KIND,
            score: self.score,
            level: None,
            length: Some(self.body.len()),
            targets: None,
            phase: self.phase.current(),
            message,
            overlay,
        }
    }

    fn reset(&mut self) {
        *self = Self::new_session(self.config.clone(), self.seed, self.session + 1);
        log::info!("Snake reset (session {})", self.session);
    }
}
