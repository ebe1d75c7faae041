use chrono::Duration;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::gate::{GEOFENCE_RADIUS_M, GatePolicy};
use crate::validation::FRESHNESS_WINDOW_MS;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScannerConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum accepted code age in milliseconds
    #[serde(default = "default_freshness_window_ms")]
    pub freshness_window_ms: i64,

    /// Maximum student-to-classroom distance in meters
    #[serde(default = "default_geofence_radius_m")]
    pub geofence_radius_m: f64,

    /// Collection receiving attendance records
    #[serde(default = "default_attendance_collection_id")]
    pub attendance_collection_id: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_freshness_window_ms() -> i64 {
    FRESHNESS_WINDOW_MS
}

fn default_geofence_radius_m() -> f64 {
    GEOFENCE_RADIUS_M
}

fn default_attendance_collection_id() -> String {
    "attendance".to_string()
}

impl ScannerConfig {
    /// Load configuration from `SCANNER_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix("SCANNER"))
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.freshness_window_ms < 0 {
            return Err(ConfigError::Message(format!(
                "freshness_window_ms must not be negative, got {}",
                config.freshness_window_ms
            )));
        }

        if !config.geofence_radius_m.is_finite() || config.geofence_radius_m < 0.0 {
            return Err(ConfigError::Message(format!(
                "geofence_radius_m must be a non-negative number, got {}",
                config.geofence_radius_m
            )));
        }

        Ok(config)
    }

    /// Gate policy described by this configuration
    pub fn gate_policy(&self) -> GatePolicy {
        GatePolicy {
            freshness_window: Duration::milliseconds(self.freshness_window_ms),
            geofence_radius_m: self.geofence_radius_m,
        }
    }
}
