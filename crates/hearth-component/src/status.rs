//! Lifecycle status reported for every registered component.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a registered component.
///
/// Transitions are monotonic and driven exclusively by the registry:
///
/// ```text
/// Registered → Initializing → Ready → ShutDown
///                   │
///                   └────────► Failed
/// ```
///
/// The only way backwards is removal, which erases the record entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleStatus {
    /// Registered but not yet started.
    #[default]
    Registered,

    /// Startup method currently running.
    Initializing,

    /// Startup completed; the component is ticked every loop iteration.
    Ready,

    /// Startup failed. Terminal; the component is never ticked.
    Failed,

    /// Torn down during shutdown. Terminal.
    ShutDown,
}

impl LifecycleStatus {
    /// Returns `true` if the component participates in the tick loop.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns `true` for states no further transition leaves.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::ShutDown)
    }
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
            Self::ShutDown => write!(f, "shut_down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_registered() {
        assert_eq!(LifecycleStatus::default(), LifecycleStatus::Registered);
    }

    #[test]
    fn only_ready_is_live() {
        assert!(LifecycleStatus::Ready.is_live());
        assert!(!LifecycleStatus::Registered.is_live());
        assert!(!LifecycleStatus::Initializing.is_live());
        assert!(!LifecycleStatus::Failed.is_live());
        assert!(!LifecycleStatus::ShutDown.is_live());
    }

    #[test]
    fn terminal_states() {
        assert!(LifecycleStatus::Failed.is_terminal());
        assert!(LifecycleStatus::ShutDown.is_terminal());
        assert!(!LifecycleStatus::Ready.is_terminal());
    }

    #[test]
    fn display() {
        assert_eq!(LifecycleStatus::Ready.to_string(), "ready");
        assert_eq!(LifecycleStatus::ShutDown.to_string(), "shut_down");
    }
}
