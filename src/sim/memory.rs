//! Sequence memory ruleset
//!
//! Numbered circles are shown for a level-dependent reveal period, then hidden.
//! The player clicks them back in order 1..N; clearing the sequence advances
//! the level after a short pause, a wrong click ends the run.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::clock::{Timer, Timing};
use super::geometry::Shape;
use super::input::TickInput;
use super::phase::{GamePhase, PhaseMachine};
use super::session_rng;
use super::spawn::place_with_retries;
use crate::engine::Ruleset;
use crate::settings::{GameKind, MemoryConfig, Settings};
use crate::status::{GameStatus, Overlay};

/// A numbered circle on the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub shape: Shape,
    /// Position in the recall order (1-based)
    pub value: u32,
}

/// Last notable thing that happened (drives the status message)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryEvent {
    LevelStarted,
    RecallStarted,
    Correct(u32),
    LevelCleared,
    Wrong { clicked: u32, expected: u32 },
}

/// Complete memory session state
#[derive(Debug, Clone)]
pub struct MemoryState {
    pub config: MemoryConfig,
    seed: u64,
    session: u64,
    rng: Pcg32,
    pub targets: Vec<Target>,
    pub sequence: Vec<u32>,
    cursor: usize,
    /// Values correctly recalled this level
    pub revealed: BTreeSet<u32>,
    pub level: u32,
    /// Correct recalls this session
    pub score: u32,
    phase: PhaseMachine,
    /// Reveal countdown while memorizing, next-level countdown while transitioning
    timer: Timer,
    /// Targets this level that were accepted after running out of placement attempts
    pub placement_fallbacks: u32,
    pub last_event: MemoryEvent,
}

impl MemoryState {
    pub fn new(config: MemoryConfig, seed: u64) -> Self {
        Self::new_session(config, seed, 0)
    }

    fn new_session(config: MemoryConfig, seed: u64, session: u64) -> Self {
        let mut state = Self {
            seed,
            session,
            rng: session_rng(seed, session),
            targets: Vec::new(),
            sequence: Vec::new(),
            cursor: 0,
            revealed: BTreeSet::new(),
            level: 1,
            score: 0,
            phase: PhaseMachine::new(GamePhase::Memorize),
            timer: Timer::disarmed(),
            placement_fallbacks: 0,
            last_event: MemoryEvent::LevelStarted,
            config,
        };
        state.populate_level(1);
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }

    /// Index of the next value to recall
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Value the next correct click must hit (None once the sequence is complete)
    pub fn expected_next(&self) -> Option<u32> {
        self.sequence.get(self.cursor).copied()
    }

    /// Whether a target's number is currently drawn
    pub fn is_number_visible(&self, target: &Target) -> bool {
        matches!(self.phase.current(), GamePhase::Memorize | GamePhase::Transitioning)
            || self.revealed.contains(&target.value)
    }

    /// Whether the next target is highlighted (early levels only)
    pub fn hint_active(&self) -> bool {
        self.phase.is(GamePhase::Recall) && self.level <= self.config.hint_levels
    }

    /// Place the targets for `level` and reset the per-level recall state
    fn populate_level(&mut self, level: u32) {
        let count = self.config.target_count(level);
        let radius = self.config.target_radius;
        let separation = self.config.separation();
        let (width, height) = (self.config.width, self.config.height);
        let span = Vec2::new(
            (width - separation * 2.0).max(0.0),
            (height - separation * 2.0).max(0.0),
        );

        let mut targets: Vec<Target> = Vec::with_capacity(count as usize);
        let mut fallbacks = 0;
        for value in 1..=count {
            let placed = place_with_retries(
                &mut self.rng,
                self.config.max_attempts,
                |rng| Vec2::splat(separation) + Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * span,
                |pos| targets.iter().any(|t| t.shape.pos.distance(*pos) < separation),
            );
            if placed.fallback {
                fallbacks += 1;
            }
            targets.push(Target {
                shape: Shape::circle(placed.value.x, placed.value.y, radius),
                value,
            });
        }
        if fallbacks > 0 {
            log::warn!("Level {}: {} targets placed without enough separation", level, fallbacks);
        }

        self.sequence = targets.iter().map(|t| t.value).collect();
        self.targets = targets;
        self.cursor = 0;
        self.revealed.clear();
        self.level = level;
        self.placement_fallbacks = fallbacks;
        self.timer = Timer::new(self.config.hide_time_ms(level));
        self.last_event = MemoryEvent::LevelStarted;
        log::info!("Memory level {} with {} targets", level, count);
    }

    /// Advance timers and resolve clicks
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) {
        let phase_at_start = self.phase.current();

        // Timed transitions
        match phase_at_start {
            GamePhase::Memorize => {
                if self.timer.tick(dt_ms) && self.phase.transition(GamePhase::Recall) {
                    self.last_event = MemoryEvent::RecallStarted;
                }
            }
            GamePhase::Transitioning => {
                if self.timer.tick(dt_ms) && self.phase.transition(GamePhase::Memorize) {
                    self.populate_level(self.level + 1);
                }
            }
            _ => {}
        }

        // Only clicks made while recalling count
        if phase_at_start != GamePhase::Recall {
            return;
        }
        for click in &input.clicks {
            if !self.phase.is(GamePhase::Recall) {
                break;
            }
            self.click(*click);
        }
    }

    fn click(&mut self, pos: Vec2) {
        let Some(target) = self.targets.iter().find(|t| t.shape.contains_point(pos)) else {
            return;
        };
        let Some(expected) = self.expected_next() else {
            return;
        };
        let clicked = target.value;

        if clicked != expected {
            if self.phase.transition(GamePhase::GameOver) {
                self.last_event = MemoryEvent::Wrong { clicked, expected };
                log::info!("Memory over at level {}: clicked {}, expected {}", self.level, clicked, expected);
            }
            return;
        }

        self.revealed.insert(clicked);
        self.cursor += 1;
        self.score += 1;
        self.last_event = MemoryEvent::Correct(clicked);

        if self.cursor == self.sequence.len() && self.phase.transition(GamePhase::Transitioning) {
            self.timer = Timer::new(self.config.transition_ms);
            self.last_event = MemoryEvent::LevelCleared;
            log::info!("Memory level {} cleared", self.level);
        }
    }
}

impl Ruleset for MemoryState {
    const KIND: GameKind = GameKind::Memory;

    fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.memory.clone(), settings.seed)
    }

    fn timing(&self) -> Timing {
        Timing::Continuous
    }

    fn step(&mut self, input: &TickInput, dt_ms: f32) {
        self.tick(input, dt_ms);
    }

    fn phase(&self) -> GamePhase {
        self.phase.current()
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn status(&self) -> GameStatus {
        let message = match self.last_event {
            MemoryEvent::LevelStarted => "Memorize the sequence!".to_string(),
            MemoryEvent::RecallStarted | MemoryEvent::Correct(_) => "Click the numbers in order!".to_string(),
            MemoryEvent::LevelCleared => format!("Level {} cleared!", self.level),
            MemoryEvent::Wrong { clicked, expected } => {
                format!("Wrong! Clicked {}, expected {}", clicked, expected)
            }
        };
        let overlay = match self.phase.current() {
            GamePhase::Transitioning => Overlay::shown(format!("Get Ready! Level {}", self.level + 1)),
            GamePhase::GameOver => Overlay::shown(format!("Game Over - Reached Level {}", self.level)),
            _ => Overlay::hidden(),
        };
        GameStatus {
            game: Self::KIND,
            score: self.score,
            level: Some(self.level),
            length: None,
            targets: Some(self.config.target_count(self.level)),
            phase: self.phase.current(),
            message,
            overlay,
        }
    }

    fn reset(&mut self) {
        *self = Self::new_session(self.config.clone(), self.seed, self.session + 1);
        log::info!("Memory reset (session {})", self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::min_separation;

    fn clicks(points: &[Vec2]) -> TickInput {
        TickInput {
            clicks: points.to_vec(),
            ..Default::default()
        }
    }

    fn center_of(state: &MemoryState, value: u32) -> Vec2 {
        state
            .targets
            .iter()
            .find(|t| t.value == value)
            .map(|t| t.shape.pos)
            .unwrap()
    }

    fn into_recall(state: &mut MemoryState) {
        let hide = state.config.hide_time_ms(state.level);
        state.tick(&TickInput::default(), hide);
        assert_eq!(state.phase(), GamePhase::Recall);
    }

    #[test]
    fn test_level_one_layout() {
        let state = MemoryState::new(MemoryConfig::default(), 21);
        assert_eq!(state.targets.len(), 5);
        assert_eq!(state.sequence, vec![1, 2, 3, 4, 5]);
        let values: Vec<u32> = state.targets.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(state.phase(), GamePhase::Memorize);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.status().targets, Some(5));

        let pad = state.config.separation();
        for target in &state.targets {
            assert!(target.shape.pos.x >= pad && target.shape.pos.x <= 450.0 - pad);
            assert!(target.shape.pos.y >= pad && target.shape.pos.y <= 450.0 - pad);
        }
        if state.placement_fallbacks == 0 {
            let centers: Vec<Vec2> = state.targets.iter().map(|t| t.shape.pos).collect();
            assert!(min_separation(&centers).unwrap() >= pad);
        }
    }

    #[test]
    fn test_reveal_period_then_recall() {
        let mut state = MemoryState::new(MemoryConfig::default(), 22);
        state.tick(&TickInput::default(), 2999.0);
        assert_eq!(state.phase(), GamePhase::Memorize);
        assert!(state.is_number_visible(&state.targets[0]));

        state.tick(&TickInput::default(), 1.0);
        assert_eq!(state.phase(), GamePhase::Recall);
        assert!(!state.is_number_visible(&state.targets[0]));
        assert!(state.hint_active());
        assert_eq!(state.status().message, "Click the numbers in order!");
    }

    #[test]
    fn test_clicks_during_memorize_ignored() {
        let mut state = MemoryState::new(MemoryConfig::default(), 23);
        let first = center_of(&state, 1);
        state.tick(&clicks(&[first]), 16.0);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.phase(), GamePhase::Memorize);
    }

    #[test]
    fn test_full_level_advances() {
        let mut state = MemoryState::new(MemoryConfig::default(), 24);
        into_recall(&mut state);

        let order: Vec<Vec2> = (1..=5).map(|v| center_of(&state, v)).collect();
        state.tick(&clicks(&order), 16.0);
        assert_eq!(state.phase(), GamePhase::Transitioning);
        assert_eq!(state.cursor(), 5);
        assert_eq!(state.score, 5);
        assert_eq!(state.status().overlay, Overlay::shown("Get Ready! Level 2"));

        state.tick(&TickInput::default(), 1499.0);
        assert_eq!(state.phase(), GamePhase::Transitioning);
        state.tick(&TickInput::default(), 1.0);
        assert_eq!(state.phase(), GamePhase::Memorize);
        assert_eq!(state.level, 2);
        assert_eq!(state.targets.len(), 6);
        assert_eq!(state.status().targets, Some(6));
        assert_eq!(state.cursor(), 0);
        assert!(state.revealed.is_empty());
        assert_eq!(state.status().message, "Memorize the sequence!");
        assert!(!state.hint_active());
    }

    #[test]
    fn test_wrong_click_ends_game() {
        let mut state = MemoryState::new(MemoryConfig::default(), 25);
        into_recall(&mut state);

        let first = center_of(&state, 1);
        let third = center_of(&state, 3);
        state.tick(&clicks(&[first, third]), 16.0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.cursor(), 1, "cursor unchanged by the mismatch");
        assert_eq!(state.last_event, MemoryEvent::Wrong { clicked: 3, expected: 2 });
        assert_eq!(state.status().message, "Wrong! Clicked 3, expected 2");
        assert!(state.status().overlay.visible);
    }

    #[test]
    fn test_click_outside_targets_ignored() {
        let mut state = MemoryState::new(MemoryConfig::default(), 26);
        into_recall(&mut state);
        // Corner is inside the padding, so no target can reach it
        state.tick(&clicks(&[Vec2::new(1.0, 1.0)]), 16.0);
        assert_eq!(state.phase(), GamePhase::Recall);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_reset_returns_to_level_one() {
        let mut state = MemoryState::new(MemoryConfig::default(), 27);
        into_recall(&mut state);
        let wrong = center_of(&state, 2);
        state.tick(&clicks(&[wrong]), 16.0);
        assert_eq!(state.phase(), GamePhase::GameOver);

        state.reset();
        assert_eq!(state.phase(), GamePhase::Memorize);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.targets.len(), 5);
    }

    #[test]
    fn test_level_cap() {
        let mut state = MemoryState::new(MemoryConfig::default(), 28);
        state.populate_level(10);
        assert_eq!(state.targets.len(), 9);
        assert_eq!(state.timer.remaining_ms(), 500.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cursor_advances_only_on_exact_match(seed in any::<u64>(), picks in proptest::collection::vec(1u32..=5, 1..10)) {
                let mut state = MemoryState::new(MemoryConfig::default(), seed);
                into_recall(&mut state);
                for value in picks {
                    if state.phase() != GamePhase::Recall {
                        break;
                    }
                    let before = state.cursor();
                    let expected = state.expected_next();
                    let pos = center_of(&state, value);
                    state.tick(&clicks(&[pos]), 16.0);
                    if expected == Some(value) {
                        prop_assert_eq!(state.cursor(), before + 1);
                    } else {
                        prop_assert_eq!(state.cursor(), before);
                        prop_assert_eq!(state.phase(), GamePhase::GameOver);
                    }
                }
            }
        }
    }
}
