//! Loop driver and timers
//!
//! Two timing models share one driver:
//! - `Continuous`: exactly one tick per display refresh (`begin_frame` call)
//! - `Interval`: ticks every `period_ms`; the period may change between ticks
//!
//! The host calls [`LoopDriver::begin_frame`] once per refresh, then pulls due
//! ticks with [`LoopDriver::next_tick`]. After running a tick it reports the
//! (possibly new) timing with [`LoopDriver::complete_tick`], which schedules the
//! next interval tick. A period change therefore affects the next scheduled
//! tick, never a wait already in progress.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CATCH_UP_TICKS, MAX_FRAME_MS};

/// Nominal display refresh used for the first continuous frame (ms)
pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;

/// How a game wants to be ticked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Timing {
    /// One tick per display refresh
    Continuous,
    /// One tick every `period_ms` milliseconds
    Interval { period_ms: f32 },
}

/// Produces ticks for one game instance
#[derive(Debug, Clone)]
pub struct LoopDriver {
    timing: Timing,
    running: bool,
    /// Bumped on every start/stop so stale scheduled callbacks can be ignored
    generation: u64,
    now: f64,
    last_time: Option<f64>,
    next_due: Option<f64>,
    ticks_this_frame: u32,
    /// Total ticks produced since the last start
    ticks: u64,
}

impl LoopDriver {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            running: false,
            generation: 0,
            now: 0.0,
            last_time: None,
            next_due: None,
            ticks_this_frame: 0,
            ticks: 0,
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Replace the timing model; takes effect from the next scheduled tick
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a callback scheduled under `generation` may still act
    pub fn is_current(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start producing ticks. Returns the new generation.
    pub fn start(&mut self) -> u64 {
        self.running = true;
        self.generation += 1;
        self.last_time = None;
        self.next_due = None;
        self.ticks_this_frame = 0;
        self.ticks = 0;
        self.generation
    }

    /// Stop producing ticks and invalidate anything scheduled so far
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
            self.next_due = None;
        }
    }

    /// Mark the start of a display refresh at `now_ms`
    pub fn begin_frame(&mut self, now_ms: f64) {
        self.now = now_ms;
        self.ticks_this_frame = 0;
        if !self.running {
            return;
        }
        if let Timing::Interval { period_ms } = self.timing {
            if self.next_due.is_none() {
                // First tick one period after start, like a browser interval
                self.next_due = Some(now_ms + period_ms as f64);
                self.last_time = Some(now_ms);
            }
        }
    }

    /// Next due tick this frame, as the elapsed milliseconds it covers
    pub fn next_tick(&mut self) -> Option<f32> {
        if !self.running {
            return None;
        }
        match self.timing {
            Timing::Continuous => {
                if self.ticks_this_frame > 0 {
                    return None;
                }
                let dt = match self.last_time {
                    Some(last) => ((self.now - last) as f32).clamp(0.0, MAX_FRAME_MS),
                    None => NOMINAL_FRAME_MS,
                };
                self.last_time = Some(self.now);
                self.ticks_this_frame += 1;
                self.ticks += 1;
                Some(dt)
            }
            Timing::Interval { period_ms } => {
                let due = self.next_due?;
                if self.now < due {
                    return None;
                }
                if self.ticks_this_frame >= MAX_CATCH_UP_TICKS {
                    log::warn!("Dropping tick backlog ({} ms behind)", self.now - due);
                    self.next_due = Some(self.now + period_ms as f64);
                    return None;
                }
                self.ticks_this_frame += 1;
                self.ticks += 1;
                self.last_time = Some(due);
                // Held until complete_tick schedules the following one
                self.next_due = None;
                Some(period_ms)
            }
        }
    }

    /// Report the timing after a tick ran; schedules the next interval tick
    pub fn complete_tick(&mut self, timing: Timing) {
        self.timing = timing;
        if !self.running {
            return;
        }
        if let Timing::Interval { period_ms } = timing {
            let fired_at = self.last_time.unwrap_or(self.now);
            self.next_due = Some(fired_at + period_ms as f64);
        }
    }
}

/// One-shot countdown in milliseconds, owned by the state it mutates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    remaining_ms: f32,
    armed: bool,
}

impl Timer {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            remaining_ms: duration_ms,
            armed: true,
        }
    }

    /// A timer that never fires
    pub fn disarmed() -> Self {
        Self {
            remaining_ms: 0.0,
            armed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Advance by `dt_ms`; true exactly once, on the tick the countdown expires
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            self.armed = false;
            return true;
        }
        false
    }
}
