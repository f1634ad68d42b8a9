//! Action Phases
//!
//! `Idle -> Validating -> Dispatched -> {Succeeded, Failed} -> Idle`.
//! Validating may also fall straight back to Idle (rejected, declined, or
//! handled without the network).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Validating,
    /// The only phase that waits on the network
    Dispatched,
    Succeeded,
    Failed,
}

impl ActionPhase {
    pub fn can_transition_to(self, next: ActionPhase) -> bool {
        use ActionPhase::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Idle)
                | (Validating, Dispatched)
                | (Dispatched, Succeeded)
                | (Dispatched, Failed)
                | (Succeeded, Idle)
                | (Failed, Idle)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal phase transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: ActionPhase,
    pub to: ActionPhase,
}

/// Phases one action went through
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    history: Vec<ActionPhase>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self { history: vec![ActionPhase::Idle] }
    }
}

impl PhaseTracker {
    pub fn phase(&self) -> ActionPhase {
        *self.history.last().unwrap_or(&ActionPhase::Idle)
    }

    pub fn advance(&mut self, next: ActionPhase) -> Result<(), InvalidTransition> {
        let from = self.phase();
        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        self.history.push(next);
        Ok(())
    }

    pub fn history(&self) -> &[ActionPhase] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ActionPhase::*;

    #[test]
    fn test_full_cycle() {
        let mut tracker = PhaseTracker::default();
        for next in [Validating, Dispatched, Failed, Idle] {
            tracker.advance(next).expect("legal transition");
        }
        assert_eq!(tracker.history(), &[Idle, Validating, Dispatched, Failed, Idle]);
    }

    #[test]
    fn test_illegal_transitions_refused() {
        let mut tracker = PhaseTracker::default();
        assert_eq!(
            tracker.advance(Dispatched),
            Err(InvalidTransition { from: Idle, to: Dispatched })
        );
        tracker.advance(Validating).expect("legal transition");
        assert!(tracker.advance(Succeeded).is_err());
        assert_eq!(tracker.phase(), Validating);

        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Dispatched.can_transition_to(Idle));
        assert!(!Failed.can_transition_to(Dispatched));
    }
}
