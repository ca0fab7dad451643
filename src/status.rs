//! UI-facing projection of game state
//!
//! Rebuilt from the core state once per tick, after resolution. Hosts read it
//! to update their score/message labels and banners; nothing writes back.

use serde::{Deserialize, Serialize};

use crate::settings::GameKind;
use crate::sim::GamePhase;

/// Banner drawn over the playfield (game over, level transitions)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Overlay {
    pub visible: bool,
    pub text: String,
}

impl Overlay {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn shown(text: impl Into<String>) -> Self {
        Self {
            visible: true,
            text: text.into(),
        }
    }
}

/// Snapshot of everything a surrounding UI displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    pub game: GameKind,
    pub score: u32,
    /// Memory game only
    pub level: Option<u32>,
    /// Snake body length
    pub length: Option<usize>,
    /// Memory targets on the board this level
    pub targets: Option<u32>,
    pub phase: GamePhase,
    pub message: String,
    pub overlay: Overlay,
}

impl GameStatus {
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
