//! Input tracking
//!
//! Browser/native callbacks only ever push [`InputEvent`]s into the tracker.
//! Once per tick the engine drains a [`TickInput`] snapshot that the ruleset
//! step reads; nothing else touches game state.

use std::collections::HashSet;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Keys that toggle pause (normalized)
pub const PAUSE_KEYS: [&str; 3] = [" ", "p", "escape"];

/// Pseudo-key held while the pointer is down
pub const POINTER_KEY: &str = "pointer";

/// Raw input from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    /// Surface-relative pointer position
    PointerDown(Vec2),
    PointerUp(Vec2),
}

/// Grid movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// One-cell step (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Arrow keys and WASD (normalized key names)
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "arrowup" | "w" => Some(Direction::Up),
            "arrowdown" | "s" => Some(Direction::Down),
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Lowercase key identifiers so "ArrowUp" and "arrowup" are the same input
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Snapshot of input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Inputs currently held down (normalized)
    pub held: HashSet<String>,
    /// Pause key went down since the last tick
    pub pause: bool,
    /// Pointer-down positions since the last tick, oldest first
    pub clicks: Vec<Vec2>,
    /// Direction key presses since the last tick, oldest first
    pub directions: Vec<Direction>,
}

impl TickInput {
    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    fn direction_held(&self, direction: Direction) -> bool {
        self.held
            .iter()
            .any(|key| Direction::from_key(key) == Some(direction))
    }

    /// Signed unit axis from held directional inputs (opposites cancel)
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.direction_held(Direction::Left) {
            axis.x -= 1.0;
        }
        if self.direction_held(Direction::Right) {
            axis.x += 1.0;
        }
        if self.direction_held(Direction::Up) {
            axis.y -= 1.0;
        }
        if self.direction_held(Direction::Down) {
            axis.y += 1.0;
        }
        axis
    }
}

/// Current key/pointer state plus one-shot events waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    pressed: HashSet<String>,
    pause: bool,
    clicks: Vec<Vec2>,
    directions: Vec<Direction>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a host event
    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                let key = normalize_key(key);
                if let Some(direction) = Direction::from_key(&key) {
                    self.directions.push(direction);
                }
                let fresh = self.pressed.insert(key.clone());
                // Edge-triggered: key repeat doesn't re-toggle
                if fresh && PAUSE_KEYS.contains(&key.as_str()) {
                    self.pause = true;
                }
            }
            InputEvent::KeyUp(key) => {
                self.pressed.remove(&normalize_key(key));
            }
            InputEvent::PointerDown(pos) => {
                self.pressed.insert(POINTER_KEY.to_string());
                self.clicks.push(*pos);
            }
            InputEvent::PointerUp(_) => {
                self.pressed.remove(POINTER_KEY);
            }
        }
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(&normalize_key(key))
    }

    /// Take the snapshot for the next tick, clearing one-shot inputs
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            held: self.pressed.clone(),
            pause: std::mem::take(&mut self.pause),
            clicks: std::mem::take(&mut self.clicks),
            directions: std::mem::take(&mut self.directions),
        }
    }

    /// Drop pending one-shot inputs (held keys reflect the physical state and stay)
    pub fn clear_pending(&mut self) {
        self.pause = false;
        self.clicks.clear();
        self.directions.clear();
    }
}

/// Committed direction plus the buffered request for the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionBuffer {
    committed: Direction,
    next: Direction,
}

impl DirectionBuffer {
    pub fn new(initial: Direction) -> Self {
        Self {
            committed: initial,
            next: initial,
        }
    }

    pub fn committed(&self) -> Direction {
        self.committed
    }

    pub fn next(&self) -> Direction {
        self.next
    }

    /// Buffer `direction` unless it reverses the committed direction
    pub fn request(&mut self, direction: Direction) -> bool {
        if direction == self.committed.opposite() {
            return false;
        }
        self.next = direction;
        true
    }

    /// Commit the buffered direction at the start of a step
    pub fn commit(&mut self) -> Direction {
        self.committed = self.next;
        self.committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_normalized() {
        let mut tracker = InputTracker::new();
        tracker.handle(&InputEvent::KeyDown("ArrowUp".into()));
        assert!(tracker.is_pressed("arrowup"));
        assert!(tracker.is_pressed("ArrowUp"));

        tracker.handle(&InputEvent::KeyUp("ARROWUP".into()));
        assert!(!tracker.is_pressed("arrowup"));
    }

    #[test]
    fn test_pause_is_edge_triggered() {
        let mut tracker = InputTracker::new();
        tracker.handle(&InputEvent::KeyDown(" ".into()));
        // Auto-repeat while held
        tracker.handle(&InputEvent::KeyDown(" ".into()));
        assert!(tracker.snapshot().pause);
        assert!(!tracker.snapshot().pause);

        tracker.handle(&InputEvent::KeyDown(" ".into()));
        assert!(!tracker.snapshot().pause, "still held, no new edge");

        tracker.handle(&InputEvent::KeyUp(" ".into()));
        tracker.handle(&InputEvent::KeyDown(" ".into()));
        assert!(tracker.snapshot().pause);
    }

    #[test]
    fn test_snapshot_drains_clicks_and_directions() {
        let mut tracker = InputTracker::new();
        tracker.handle(&InputEvent::PointerDown(Vec2::new(10.0, 20.0)));
        tracker.handle(&InputEvent::KeyDown("w".into()));
        tracker.handle(&InputEvent::KeyDown("ArrowLeft".into()));

        let input = tracker.snapshot();
        assert_eq!(input.clicks, vec![Vec2::new(10.0, 20.0)]);
        assert_eq!(input.directions, vec![Direction::Up, Direction::Left]);
        assert!(input.is_held(POINTER_KEY));

        let input = tracker.snapshot();
        assert!(input.clicks.is_empty());
        assert!(input.directions.is_empty());
        assert!(input.is_held("w"));
    }

    #[test]
    fn test_axis_from_held_keys() {
        let mut tracker = InputTracker::new();
        tracker.handle(&InputEvent::KeyDown("ArrowLeft".into()));
        tracker.handle(&InputEvent::KeyDown("ArrowDown".into()));
        assert_eq!(tracker.snapshot().axis(), Vec2::new(-1.0, 1.0));

        tracker.handle(&InputEvent::KeyDown("d".into()));
        assert_eq!(tracker.snapshot().axis(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_direction_buffer_blocks_reversal() {
        let mut dir = DirectionBuffer::new(Direction::Right);
        assert!(!dir.request(Direction::Left));
        assert_eq!(dir.next(), Direction::Right);

        assert!(dir.request(Direction::Up));
        // Not committed until the step starts
        assert_eq!(dir.committed(), Direction::Right);
        // Left is still the opposite of the committed direction
        assert!(!dir.request(Direction::Left));
        assert_eq!(dir.commit(), Direction::Up);
        assert!(dir.request(Direction::Left));
    }

    #[test]
    fn test_direction_from_key() {
        assert_eq!(Direction::from_key("a"), Some(Direction::Left));
        assert_eq!(Direction::from_key("arrowright"), Some(Direction::Right));
        assert_eq!(Direction::from_key("x"), None);
        assert_eq!(Direction::Up.delta() + Direction::Down.delta(), IVec2::ZERO);
    }
}
