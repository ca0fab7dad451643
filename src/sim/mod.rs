//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives through the step's tick input and `dt_ms`
//! - Seeded RNG only
//! - Stable iteration order (store index)
//! - No rendering or platform dependencies

pub mod clock;
pub mod dodger;
pub mod geometry;
pub mod input;
pub mod memory;
pub mod phase;
pub mod snake;
pub mod spawn;

pub use clock::{LoopDriver, Timer, Timing};
pub use dodger::{DodgerEvent, DodgerState};
pub use geometry::{CollisionResult, Extent, Shape, circle_rect_collision};
pub use input::{Direction, DirectionBuffer, InputEvent, InputTracker, TickInput};
pub use memory::{MemoryEvent, MemoryState, Target};
pub use phase::{GamePhase, PhaseMachine};
pub use snake::{SnakeEvent, SnakeState};
pub use spawn::{Placement, ScoreMilestone, place_with_retries, random_free_cell};

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// RNG for one play session. Each reset bumps `session`, so a restart gets a
/// fresh but still reproducible stream.
pub fn session_rng(seed: u64, session: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed ^ session.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}
