//! Configuration management for the testbed node.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, a `.env` file, or defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Board identity reported by `/riot/board`.
    pub board: BoardConfig,

    /// Simulated sensor settings.
    pub sensor: SensorConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the node, used in logs.
    pub name: String,

    /// The version of the node software.
    pub version: String,
}

/// Board identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board identifier, e.g. `samr21-xpro`.
    pub name: String,
}

/// Configuration for the simulated temperature sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Reading reported in whole degrees Celsius.
    pub celsius: i32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "native".to_string(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { celsius: 21 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "testbed-node".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            board: BoardConfig::default(),
            sensor: SensorConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `TESTBED_`.
    /// For example: `TESTBED_BOARD`, `TESTBED_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("TESTBED_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("TESTBED_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(board) = std::env::var("TESTBED_BOARD") {
            info!("Board identifier set to {}", board);
            config.board.name = board;
        }

        if let Ok(celsius) = std::env::var("TESTBED_SENSOR_CELSIUS") {
            match celsius.parse() {
                Ok(value) => config.sensor.celsius = value,
                Err(_) => warn!(
                    "Ignoring TESTBED_SENSOR_CELSIUS={:?}, expected an integer",
                    celsius
                ),
            }
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }

    /// Check values that would otherwise only fail once requests arrive.
    pub fn validate(&self) -> Result<()> {
        if self.board.name.is_empty() || !self.board.name.is_ascii() {
            return Err(Error::config(format!(
                "board identifier must be non-empty ASCII, got {:?}",
                self.board.name
            )));
        }

        if self.transport.host.is_empty() {
            return Err(Error::config("transport host is empty"));
        }

        Ok(())
    }
}
