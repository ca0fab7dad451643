//! Game settings and tuning
//!
//! All balance numbers live here so hosts can override them with a JSON blob
//! (missing fields fall back to the defaults).

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SEED;

/// Which mini-game to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameKind {
    #[default]
    Dodger,
    Snake,
    Memory,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Dodger, GameKind::Snake, GameKind::Memory];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Dodger => "dodger",
            GameKind::Snake => "snake",
            GameKind::Memory => "memory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dodger" | "spacedodger" | "dodge" => Some(GameKind::Dodger),
            "snake" => Some(GameKind::Snake),
            "memory" | "memorygame" => Some(GameKind::Memory),
            _ => None,
        }
    }
}

/// Space dodger tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgerConfig {
    /// Playfield size (px)
    pub width: f32,
    pub height: f32,
    /// Player box at start (top-left + size)
    pub player_x: f32,
    pub player_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Player movement per tick (px)
    pub player_speed: f32,
    /// Obstacle fall per tick (px)
    pub obstacle_speed: f32,
    /// One obstacle every N frames
    pub spawn_interval_frames: u64,
    pub min_radius: f32,
    pub radius_range: f32,
    /// Extra batch each time score reaches a new multiple of this
    pub batch_score_step: u32,
    pub batch_min: u32,
    pub batch_max: u32,
    /// Batch obstacles start up to this far above the top edge
    pub batch_height_range: f32,
}

impl Default for DodgerConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            player_x: 200.0,
            player_y: 350.0,
            player_width: 25.0,
            player_height: 50.0,
            player_speed: 5.0,
            obstacle_speed: 3.0,
            spawn_interval_frames: 40,
            min_radius: 10.0,
            radius_range: 15.0,
            batch_score_step: 20,
            batch_min: 2,
            batch_max: 4,
            batch_height_range: 150.0,
        }
    }
}

/// Snake tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Cells per side
    pub grid_size: i32,
    /// Pixels per cell
    pub cell_size: f32,
    pub initial_speed_ms: f32,
    /// Interval shortening per regular food
    pub speed_step_ms: f32,
    pub min_speed_ms: f32,
    pub food_points: u32,
    pub bonus_points: u32,
    /// Bonus stars appear each time score reaches a new multiple of this
    pub bonus_score_step: u32,
    pub bonus_count: usize,
    pub start_x: i32,
    pub start_y: i32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_size: 20.0,
            initial_speed_ms: 150.0,
            speed_step_ms: 5.0,
            min_speed_ms: 50.0,
            food_points: 10,
            bonus_points: 10,
            bonus_score_step: 50,
            bonus_count: 3,
            start_x: 10,
            start_y: 10,
        }
    }
}

impl SnakeConfig {
    /// Copy with a usable board (at least one cell per side)
    pub fn sanitized(mut self) -> Self {
        if self.grid_size < 1 {
            log::warn!("Snake grid_size {} is not playable, using 1", self.grid_size);
            self.grid_size = 1;
        }
        self
    }
}

/// Sequence memory tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub width: f32,
    pub height: f32,
    pub target_radius: f32,
    /// Targets at level L: min(base_count + L, max_count)
    pub base_count: u32,
    pub max_count: u32,
    /// Reveal time at level L: max(min_hide_ms, base_hide_ms - (L-1) * hide_step_ms)
    pub base_hide_ms: f32,
    pub hide_step_ms: f32,
    pub min_hide_ms: f32,
    /// Pause between a cleared level and the next one
    pub transition_ms: f32,
    /// Minimum center distance between targets, in radii
    pub separation_factor: f32,
    pub max_attempts: u32,
    /// Levels that highlight the next target during recall
    pub hint_levels: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            width: 450.0,
            height: 450.0,
            target_radius: 30.0,
            base_count: 4,
            max_count: 9,
            base_hide_ms: 3000.0,
            hide_step_ms: 500.0,
            min_hide_ms: 500.0,
            transition_ms: 1500.0,
            separation_factor: 2.5,
            max_attempts: 100,
            hint_levels: 1,
        }
    }
}

impl MemoryConfig {
    /// Number of targets for a level
    pub fn target_count(&self, level: u32) -> u32 {
        (self.base_count + level).min(self.max_count)
    }

    /// Reveal period for a level (ms)
    pub fn hide_time_ms(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.base_hide_ms - steps * self.hide_step_ms).max(self.min_hide_ms)
    }

    /// Minimum center-to-center distance (also used as wall padding)
    pub fn separation(&self) -> f32 {
        self.target_radius * self.separation_factor
    }
}

/// Complete settings for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; every reset derives a fresh stream from it
    pub seed: u64,
    pub dodger: DodgerConfig,
    pub snake: SnakeConfig,
    pub memory: MemoryConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            dodger: DodgerConfig::default(),
            snake: SnakeConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Settings {
    /// Default settings with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse settings, logging and falling back to defaults on bad input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings (seed {})", settings.seed);
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_aliases() {
        assert_eq!(GameKind::from_str("SpaceDodger"), Some(GameKind::Dodger));
        assert_eq!(GameKind::from_str("memorygame"), Some(GameKind::Memory));
        assert_eq!(GameKind::from_str("snake"), Some(GameKind::Snake));
        assert_eq!(GameKind::from_str("tetris"), None);
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "snake": {"grid_size": 12}}"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.snake.grid_size, 12);
        assert_eq!(settings.snake.initial_speed_ms, 150.0);
        assert_eq!(settings.dodger, DodgerConfig::default());
    }

    #[test]
    fn test_non_positive_grid_is_clamped() {
        for json in [r#"{"snake": {"grid_size": 0}}"#, r#"{"snake": {"grid_size": -4}}"#] {
            let settings = Settings::from_json(json).unwrap();
            assert_eq!(settings.snake.clone().sanitized().grid_size, 1);
        }
        assert_eq!(SnakeConfig::default().sanitized(), SnakeConfig::default());
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let settings = Settings::from_json_or_default("{not json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::with_seed(42);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_memory_level_curves() {
        let memory = MemoryConfig::default();
        assert_eq!(memory.target_count(1), 5);
        assert_eq!(memory.target_count(5), 9);
        assert_eq!(memory.target_count(12), 9);
        assert_eq!(memory.hide_time_ms(1), 3000.0);
        assert_eq!(memory.hide_time_ms(3), 2000.0);
        assert_eq!(memory.hide_time_ms(10), 500.0);
        assert_eq!(memory.separation(), 75.0);
    }
}
