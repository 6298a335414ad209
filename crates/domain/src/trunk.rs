//! Trunk: the single actuator this agent controls.
//!
//! The physical trunk is the only source of truth for its state. The state
//! is read through the `IsOpen` signal and changed only by invoking the
//! trunk actuator service; it is never assigned directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signal::SignalPath;

/// Which trunk an actuator call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrunkPosition {
    Front,
    #[default]
    Rear,
}

impl TrunkPosition {
    /// Path of the boolean open/closed sensor for this trunk.
    #[must_use]
    pub fn is_open_path(self) -> SignalPath {
        SignalPath::trusted(format!("Vehicle.Body.Trunk.{}.IsOpen", self.signal_segment()))
    }

    fn signal_segment(self) -> &'static str {
        match self {
            Self::Front => "Front",
            Self::Rear => "Rear",
        }
    }
}

impl fmt::Display for TrunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => f.write_str("front"),
            Self::Rear => f.write_str("rear"),
        }
    }
}

/// Binary open/closed state of a trunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrunkState {
    Open,
    Closed,
}

impl TrunkState {
    /// The actuator command that flips the trunk out of this state.
    #[must_use]
    pub fn toggle_command(self) -> TrunkCommand {
        match self {
            Self::Open => TrunkCommand::Close,
            Self::Closed => TrunkCommand::Open,
        }
    }
}

impl From<bool> for TrunkState {
    fn from(is_open: bool) -> Self {
        if is_open { Self::Open } else { Self::Closed }
    }
}

/// Actuator service operations exposed by the trunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrunkCommand {
    Open,
    Close,
}

impl TrunkCommand {
    /// Human-readable confirmation sent back to the requester.
    #[must_use]
    pub fn confirmation(self) -> &'static str {
        match self {
            Self::Open => "Trunk will now open",
            Self::Close => "Trunk will now close",
        }
    }
}

impl fmt::Display for TrunkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Close => f.write_str("close"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_rear() {
        assert_eq!(TrunkPosition::default(), TrunkPosition::Rear);
    }

    #[test]
    fn should_resolve_rear_is_open_path() {
        assert_eq!(
            TrunkPosition::Rear.is_open_path().as_str(),
            "Vehicle.Body.Trunk.Rear.IsOpen"
        );
        assert_eq!(
            TrunkPosition::Front.is_open_path().as_str(),
            "Vehicle.Body.Trunk.Front.IsOpen"
        );
    }

    #[test]
    fn should_deserialize_lowercase_position() {
        let pos: TrunkPosition = serde_json::from_str("\"front\"").unwrap();
        assert_eq!(pos, TrunkPosition::Front);
        assert!(serde_json::from_str::<TrunkPosition>("\"roof\"").is_err());
    }

    #[test]
    fn should_close_when_open() {
        assert_eq!(TrunkState::Open.toggle_command(), TrunkCommand::Close);
    }

    #[test]
    fn should_open_when_closed() {
        assert_eq!(TrunkState::Closed.toggle_command(), TrunkCommand::Open);
    }

    #[test]
    fn should_map_bool_to_state() {
        assert_eq!(TrunkState::from(true), TrunkState::Open);
        assert_eq!(TrunkState::from(false), TrunkState::Closed);
    }

    #[test]
    fn should_confirm_each_command() {
        assert_eq!(TrunkCommand::Open.confirmation(), "Trunk will now open");
        assert_eq!(TrunkCommand::Close.confirmation(), "Trunk will now close");
    }
}
