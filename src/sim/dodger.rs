//! Space dodger ruleset
//!
//! Steer a box around the playfield while circles fall from the top. Every
//! obstacle that leaves the bottom edge scores a point; touching one ends the run.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::clock::Timing;
use super::geometry::{Extent, Shape};
use super::input::TickInput;
use super::phase::{GamePhase, PhaseMachine};
use super::session_rng;
use super::spawn::{ScoreMilestone, place_with_retries};
use crate::engine::Ruleset;
use crate::settings::{DodgerConfig, GameKind, Settings};
use crate::status::{GameStatus, Overlay};

/// Placement retries before an overlapping obstacle is accepted
pub const SPAWN_ATTEMPTS: u32 = 10;

/// Last notable thing that happened (drives the status message)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DodgerEvent {
    Started,
    Paused,
    Resumed,
    /// Extra obstacles dropped at a score milestone
    Batch(u32),
    Crashed,
}

/// Complete dodger session state
#[derive(Debug, Clone)]
pub struct DodgerState {
    pub config: DodgerConfig,
    seed: u64,
    session: u64,
    rng: Pcg32,
    /// Player box
    pub player: Shape,
    /// Falling circles, oldest first
    pub obstacles: Vec<Shape>,
    /// Frames simulated while playing
    pub frame: u64,
    pub score: u32,
    phase: PhaseMachine,
    batch: ScoreMilestone,
    pub last_event: DodgerEvent,
}

impl DodgerState {
    pub fn new(config: DodgerConfig, seed: u64) -> Self {
        Self::new_session(config, seed, 0)
    }

    fn new_session(config: DodgerConfig, seed: u64, session: u64) -> Self {
        let player = Shape::rect(
            config.player_x,
            config.player_y,
            config.player_width,
            config.player_height,
        );
        let batch = ScoreMilestone::new(config.batch_score_step);
        Self {
            config,
            seed,
            session,
            rng: session_rng(seed, session),
            player,
            obstacles: Vec::new(),
            frame: 0,
            score: 0,
            phase: PhaseMachine::new(GamePhase::Playing),
            batch,
            last_event: DodgerEvent::Started,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }

    /// Score at which the last batch dropped (0 if none yet)
    pub fn last_batch_score(&self) -> u32 {
        self.batch.last_score()
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput) {
        if input.pause && self.phase.current().accepts_pause() {
            self.phase.toggle_pause();
            if self.phase.is(GamePhase::Paused) {
                self.last_event = DodgerEvent::Paused;
                return;
            }
            self.last_event = DodgerEvent::Resumed;
        }

        if !self.phase.is(GamePhase::Playing) {
            return;
        }

        self.frame += 1;
        self.move_entities(input);
        self.spawn();
        self.resolve();
    }

    fn move_entities(&mut self, input: &TickInput) {
        let size = self.player.size();
        let max = Vec2::new(
            (self.config.width - size.x).max(0.0),
            (self.config.height - size.y).max(0.0),
        );
        let pos = self.player.pos + input.axis() * self.config.player_speed;
        self.player.pos = pos.clamp(Vec2::ZERO, max);

        for obstacle in &mut self.obstacles {
            obstacle.pos.y += self.config.obstacle_speed;
        }
    }

    fn spawn(&mut self) {
        let interval = self.config.spawn_interval_frames.max(1);
        if self.frame.is_multiple_of(interval) {
            self.spawn_obstacle(0.0);
        }

        if self.batch.check(self.score) {
            let (lo, hi) = (self.config.batch_min, self.config.batch_max.max(self.config.batch_min));
            let count = self.rng.random_range(lo..=hi);
            for _ in 0..count {
                let lift = self.rng.random::<f32>() * self.config.batch_height_range;
                self.spawn_obstacle(lift);
            }
            log::info!("Score {}: dropping batch of {} obstacles", self.score, count);
            self.last_event = DodgerEvent::Batch(count);
        }
    }

    /// Spawn one circle fully above the top edge, `lift` px higher than flush
    fn spawn_obstacle(&mut self, lift: f32) {
        let config = &self.config;
        let (min_radius, radius_range, width) = (config.min_radius, config.radius_range, config.width);
        let obstacles = &self.obstacles;

        let placed = place_with_retries(
            &mut self.rng,
            SPAWN_ATTEMPTS,
            |rng| {
                let radius = min_radius + rng.random::<f32>() * radius_range;
                let span = (width - 2.0 * radius).max(0.0);
                let x = radius + rng.random::<f32>() * span;
                Shape::circle(x, -radius - lift, radius)
            },
            |candidate| obstacles.iter().any(|o| o.overlaps(candidate)),
        );

        if placed.fallback {
            log::debug!("Obstacle accepted after {} attempts (overlapping)", placed.attempts);
        }
        self.obstacles.push(placed.value);
    }

    fn resolve(&mut self) {
        let player = self.player;
        let bottom = self.config.height;
        let mut crashed = false;
        let mut passed = 0;

        self.obstacles.retain(|obstacle| {
            if obstacle.overlaps(&player) {
                crashed = true;
                return false;
            }
            if obstacle.top() > bottom {
                passed += 1;
                return false;
            }
            true
        });

        self.score += passed;

        if crashed && self.phase.transition(GamePhase::GameOver) {
            log::info!("Dodger over at frame {} with score {}", self.frame, self.score);
            self.last_event = DodgerEvent::Crashed;
        }
    }

    /// Radius of an obstacle (obstacles are always circles)
    pub fn obstacle_radius(obstacle: &Shape) -> f32 {
        match obstacle.extent {
            Extent::Circle { radius } => radius,
            Extent::Box { width, .. } => width / 2.0,
        }
    }
}

impl Ruleset for DodgerState {
    const KIND: GameKind = GameKind::Dodger;

    fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.dodger.clone(), settings.seed)
    }

    fn timing(&self) -> Timing {
        Timing::Continuous
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
            DodgerEvent::Started | DodgerEvent::Resumed => "Use arrow keys to move".to_string(),
            DodgerEvent::Paused => "Game Paused".to_string(),
            DodgerEvent::Batch(count) => format!("Score: {} - {} more incoming!", self.score, count),
            DodgerEvent::Crashed => format!("Final score: {}", self.score),
        };
        let overlay = if self.phase.is(GamePhase::GameOver) {
            Overlay::shown("Game Over!")
        } else {
            Overlay::hidden()
        };
        GameStatus {
            game: Self::KIND,
            score: self.score,
            level: None,
            length: None,
            targets: None,
            phase: self.phase.current(),
            message,
            overlay,
        }
    }

    fn reset(&mut self) {
        *self = Self::new_session(self.config.clone(), self.seed, self.session + 1);
        log::info!("Dodger reset (session {})", self.session);
    }
}
