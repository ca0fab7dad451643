//! Game phases and the transitions between them

use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Sequence is on screen, waiting for the reveal period to end
    Memorize,
    /// Player is clicking targets back in order
    Recall,
    /// Level cleared, next level starts after a short pause
    Transitioning,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::Memorize => "memorize",
            GamePhase::Recall => "recall",
            GamePhase::Transitioning => "transitioning",
            GamePhase::GameOver => "gameover",
        }
    }

    /// Whether `self -> next` is one of the legal edges.
    ///
    /// Reset is not an edge: it rebuilds the whole state instead.
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, next),
            (Playing, Paused)
                | (Paused, Playing)
                | (Playing, GameOver)
                | (Memorize, Recall)
                | (Recall, Transitioning)
                | (Recall, GameOver)
                | (Transitioning, Memorize)
        )
    }

    /// Only an explicit reset leaves this phase
    pub fn is_terminal(self) -> bool {
        self == GamePhase::GameOver
    }

    /// Pause input is only honored in these phases
    pub fn accepts_pause(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Paused)
    }
}

/// Owner of the single active phase; every change goes through [`PhaseMachine::transition`]
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    current: GamePhase,
}

impl PhaseMachine {
    pub fn new(initial: GamePhase) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn is(&self, phase: GamePhase) -> bool {
        self.current == phase
    }

    /// Move to `next` if the edge is legal. Illegal requests leave the phase untouched.
    pub fn transition(&mut self, next: GamePhase) -> bool {
        if self.current.can_transition_to(next) {
            log::debug!("Phase {} -> {}", self.current.as_str(), next.as_str());
            self.current = next;
            true
        } else {
            log::warn!(
                "Rejected phase transition {} -> {}",
                self.current.as_str(),
                next.as_str()
            );
            false
        }
    }

    /// Flip between Playing and Paused. Returns false when the phase doesn't accept pause.
    pub fn toggle_pause(&mut self) -> bool {
        match self.current {
            GamePhase::Playing => self.transition(GamePhase::Paused),
            GamePhase::Paused => self.transition(GamePhase::Playing),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_round_trip() {
        let mut phase = PhaseMachine::new(GamePhase::Playing);
        assert!(phase.toggle_pause());
        assert!(phase.is(GamePhase::Paused));
        assert!(phase.toggle_pause());
        assert!(phase.is(GamePhase::Playing));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut phase = PhaseMachine::new(GamePhase::Playing);
        assert!(phase.transition(GamePhase::GameOver));
        assert!(phase.current().is_terminal());

        for next in [
            GamePhase::Playing,
            GamePhase::Paused,
            GamePhase::Memorize,
            GamePhase::Recall,
            GamePhase::Transitioning,
        ] {
            assert!(!phase.transition(next));
        }
        assert!(!phase.toggle_pause());
        assert!(phase.is(GamePhase::GameOver));
    }

    #[test]
    fn test_memory_cycle() {
        let mut phase = PhaseMachine::new(GamePhase::Memorize);
        assert!(!phase.transition(GamePhase::Transitioning));
        assert!(phase.transition(GamePhase::Recall));
        assert!(phase.transition(GamePhase::Transitioning));
        assert!(!phase.transition(GamePhase::GameOver));
        assert!(phase.transition(GamePhase::Memorize));
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        let mut phase = PhaseMachine::new(GamePhase::Recall);
        assert!(!phase.toggle_pause());
        assert!(phase.is(GamePhase::Recall));
        assert!(!GamePhase::Memorize.accepts_pause());
        assert!(GamePhase::Paused.accepts_pause());
    }

    #[test]
    fn test_paused_cannot_end_game() {
        assert!(!GamePhase::Paused.can_transition_to(GamePhase::GameOver));
    }
}
