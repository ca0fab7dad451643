//! Arcade Games - real-time 2D mini-games on a shared simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, input, spawning, collisions, phases, rulesets)
//! - `render`: 2D drawing surface abstraction and per-game scenes
//! - `engine`: Game instances tying a ruleset to the loop driver and a surface
//! - `status`: UI-facing projection of game state
//! - `settings`: Data-driven game tuning

pub mod engine;
pub mod render;
pub mod settings;
pub mod sim;
pub mod status;

pub use engine::{Arcade, GameInstance, Ruleset};
pub use settings::{GameKind, Settings};
pub use status::{GameStatus, Overlay};

/// Engine-wide constants
pub mod consts {
    /// Longest frame delta handed to a continuous step (ms), so a stalled tab
    /// doesn't fast-forward timers
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// Maximum interval ticks run in one frame to prevent spiral of death
    pub const MAX_CATCH_UP_TICKS: u32 = 8;
    /// Seed used when settings don't pin one
    pub const DEFAULT_SEED: u64 = 0x5eed_a5c4_de00_0001;
}

/// Wrap a grid coordinate into [0, size)
#[inline]
pub fn wrap_coord(value: i32, size: i32) -> i32 {
    value.rem_euclid(size)
}
