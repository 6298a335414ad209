//! Virtual vehicle configuration.

use serde::Deserialize;

/// Configuration for the simulated vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Whether the trunks start open.
    pub initial_trunk_open: bool,
    /// Simulated time for the actuator to complete a movement, in milliseconds.
    pub actuation_delay_ms: u64,
    /// Buffer size of each subscription channel.
    pub subscription_capacity: usize,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            initial_trunk_open: false,
            actuation_delay_ms: 0,
            subscription_capacity: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = VirtualConfig::default();
        assert!(!config.initial_trunk_open);
        assert_eq!(config.actuation_delay_ms, 0);
        assert_eq!(config.subscription_capacity, 32);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: VirtualConfig = toml::from_str("initial_trunk_open = true").unwrap();
        assert!(config.initial_trunk_open);
        assert_eq!(config.actuation_delay_ms, 0);
    }
}
