//! Spawning helpers shared by the rulesets
//!
//! Placement is randomized but never unbounded: overlap retries stop after a
//! fixed number of attempts, and grid placement picks from the enumerated free
//! cells so a full board simply yields `None`.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Outcome of a retried placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<T> {
    pub value: T,
    /// Candidates generated, including the accepted one
    pub attempts: u32,
    /// Retries ran out and the last (rejected) candidate was accepted anyway
    pub fallback: bool,
}

/// Generate candidates until `rejects` passes one, up to `max_attempts` tries.
///
/// After the last attempt the final candidate is accepted regardless, so the
/// caller always gets a value.
pub fn place_with_retries<R, T, G, F>(
    rng: &mut R,
    max_attempts: u32,
    mut generate: G,
    mut rejects: F,
) -> Placement<T>
where
    R: Rng + ?Sized,
    G: FnMut(&mut R) -> T,
    F: FnMut(&T) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    loop {
        let candidate = generate(rng);
        attempts += 1;
        if !rejects(&candidate) {
            return Placement {
                value: candidate,
                attempts,
                fallback: false,
            };
        }
        if attempts >= max_attempts {
            return Placement {
                value: candidate,
                attempts,
                fallback: true,
            };
        }
    }
}

/// Uniformly random cell in a `grid_size`×`grid_size` grid for which `occupied` is false
pub fn random_free_cell<R, F>(rng: &mut R, grid_size: i32, occupied: F) -> Option<IVec2>
where
    R: Rng + ?Sized,
    F: Fn(IVec2) -> bool,
{
    let free: Vec<IVec2> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| IVec2::new(x, y)))
        .filter(|cell| !occupied(*cell))
        .collect();
    free.choose(rng).copied()
}

/// Fires once each time the score reaches a new positive multiple of `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreMilestone {
    step: u32,
    last_multiple: u32,
}

impl ScoreMilestone {
    pub fn new(step: u32) -> Self {
        Self {
            step,
            last_multiple: 0,
        }
    }

    /// Score at which the milestone last fired (0 if never)
    pub fn last_score(&self) -> u32 {
        self.last_multiple * self.step
    }

    /// True if `score` crossed a multiple that hasn't fired yet
    pub fn check(&mut self, score: u32) -> bool {
        if self.step == 0 {
            return false;
        }
        let multiple = score / self.step;
        if multiple > self.last_multiple {
            self.last_multiple = multiple;
            true
        } else {
            false
        }
    }
}
