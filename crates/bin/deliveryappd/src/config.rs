//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `deliveryapp.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use deliveryapp_adapter_mqtt::MqttConfig;
use deliveryapp_adapter_virtual::VirtualConfig;
use deliveryapp_domain::trunk::TrunkPosition;

const CONFIG_FILE: &str = "deliveryapp.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MQTT broker connection.
    pub mqtt: MqttConfig,
    /// Controlled trunk and simulated vehicle behaviour.
    pub vehicle: VehicleConfig,
    /// Request handling.
    pub dispatcher: DispatcherConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Vehicle configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Which trunk requests toggle and notifications mirror.
    pub trunk: TrunkPosition,
    /// Whether the simulated trunks start open.
    pub initial_trunk_open: bool,
    /// Simulated actuator travel time, in milliseconds.
    pub actuation_delay_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Serialise overlapping toggle requests for the same trunk.
    pub exclusive_toggles: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

// Targets are module paths, so each crate is named by its underscored name.
const DEFAULT_FILTER: &str = "deliveryappd=info,\
    deliveryapp_domain=info,\
    deliveryapp_app=info,\
    deliveryapp_adapter_virtual=info,\
    deliveryapp_adapter_mqtt=info,\
    rumqttc=warn";

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl VehicleConfig {
    /// Settings for the simulated vehicle.
    #[must_use]
    pub fn simulator(&self) -> VirtualConfig {
        VirtualConfig {
            initial_trunk_open: self.initial_trunk_open,
            actuation_delay_ms: self.actuation_delay_ms,
            ..VirtualConfig::default()
        }
    }
}

impl Config {
    /// Load configuration from `deliveryapp.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DELIVERYAPP_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(port) = var("DELIVERYAPP_MQTT_PORT").and_then(|val| val.parse().ok()) {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = var("DELIVERYAPP_MQTT_ADDRESS") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.mqtt.broker_host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.mqtt.broker_port = port;
                }
            }
        }
        if let Some(val) = var("DELIVERYAPP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt.broker_port must be non-zero".to_string(),
            ));
        }
        if self.mqtt.qos > 2 {
            return Err(ConfigError::Validation(format!(
                "mqtt.qos must be 0, 1 or 2, got {}",
                self.mqtt.qos
            )));
        }
        if self.mqtt.client_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mqtt.client_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` broker address.
    #[must_use]
    pub fn broker_addr(&self) -> String {
        format!("{}:{}", self.mqtt.broker_host, self.mqtt.broker_port)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
