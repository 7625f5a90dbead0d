//! Execution unit lifecycle states.

/// Lifecycle state of an execution unit.
///
/// Units move `Created → Running → {Completed | Faulted | ExitedAbnormally |
/// TimedOut}`. The four right-hand states are terminal and mutually
/// exclusive as the resolving event: whichever terminal signal the
/// dispatcher observes first determines the unit's final state, and later
/// signals are discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnitState {
    /// Spawned, has not yet begun evaluating the kernel.
    #[default]
    Created,

    /// Evaluating the kernel.
    Running,

    /// Reported a result.
    Completed,

    /// Raised an internal fault (panic) before producing a result.
    Faulted,

    /// Terminated with a non-zero status and no result.
    ExitedAbnormally,

    /// Cancelled after exceeding the configured time bound.
    TimedOut,
}

impl UnitState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Faulted | Self::ExitedAbnormally | Self::TimedOut
        )
    }

    /// Returns true if the unit has not yet reached a terminal state.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the unit completed with a result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
            Self::Faulted => write!(f, "Faulted"),
            Self::ExitedAbnormally => write!(f, "ExitedAbnormally"),
            Self::TimedOut => write!(f, "TimedOut"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_state_is_terminal() {
        assert!(!UnitState::Created.is_terminal());
        assert!(!UnitState::Running.is_terminal());
        assert!(UnitState::Completed.is_terminal());
        assert!(UnitState::Faulted.is_terminal());
        assert!(UnitState::ExitedAbnormally.is_terminal());
        assert!(UnitState::TimedOut.is_terminal());
    }

    #[test]
    fn test_unit_state_is_active() {
        assert!(UnitState::Created.is_active());
        assert!(UnitState::Running.is_active());
        assert!(!UnitState::Completed.is_active());
        assert!(!UnitState::TimedOut.is_active());
    }

    #[test]
    fn test_unit_state_is_success() {
        assert!(UnitState::Completed.is_success());
        assert!(!UnitState::Faulted.is_success());
        assert!(!UnitState::Running.is_success());
    }

    #[test]
    fn test_unit_state_default() {
        assert_eq!(UnitState::default(), UnitState::Created);
    }

    #[test]
    fn test_unit_state_display() {
        assert_eq!(format!("{}", UnitState::Running), "Running");
        assert_eq!(format!("{}", UnitState::ExitedAbnormally), "ExitedAbnormally");
    }
}
