//! Outlet lifecycle state
//!
//! Transitions are explicit; `Stopped` after exhausted reconnects is
//! terminal until the caller starts the outlet again.

/// Lifecycle state of a stream outlet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletState {
    /// Created, encoder not yet spawned
    Idle,
    /// Encoder running, frames flowing
    Running,
    /// Encoder failed, retry in progress
    Reconnecting,
    /// Stopped, either by the caller or by policy exhaustion
    Stopped,
}

impl OutletState {
    /// Whether frames should be written in this state
    pub fn accepts_frames(&self) -> bool {
        *self == OutletState::Running
    }

    /// Whether the outlet may be (re)started by the caller
    pub fn can_start(&self) -> bool {
        matches!(self, OutletState::Idle | OutletState::Stopped)
    }
}

impl std::fmt::Display for OutletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutletState::Idle => "idle",
            OutletState::Running => "running",
            OutletState::Reconnecting => "reconnecting",
            OutletState::Stopped => "stopped",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_frames() {
        assert!(OutletState::Running.accepts_frames());
        assert!(!OutletState::Idle.accepts_frames());
        assert!(!OutletState::Reconnecting.accepts_frames());
        assert!(!OutletState::Stopped.accepts_frames());
    }

    #[test]
    fn test_can_start() {
        assert!(OutletState::Idle.can_start());
        assert!(OutletState::Stopped.can_start());
        assert!(!OutletState::Running.can_start());
        assert!(!OutletState::Reconnecting.can_start());
    }
}
