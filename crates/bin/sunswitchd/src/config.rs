//! Configuration loading — TOML file with environment variable and
//! command-line overrides.
//!
//! Every field has a sensible default so the file is optional; without it
//! no switches are loaded. Environment variables take precedence over file
//! values, and command-line flags over both.

use chrono_tz::Tz;
use serde::Deserialize;

use sunswitch_adapter_device_http::DeviceHttpConfig;
use sunswitch_app::scheduler::SchedulerSettings;
use sunswitch_domain::solar::Coordinates;
use sunswitch_domain::switch::{AccumulationPolicy, DEFAULT_OFF_VALUE, DEFAULT_ON_VALUE};
use sunswitch_domain::switch_config::SwitchesSpec;

use crate::cli::Cli;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Evaluation loop settings.
    pub scheduler: SchedulerConfig,
    /// Device controller settings.
    pub device: DeviceConfig,
    /// Where the switches are, for sunrise and sunset.
    pub location: LocationConfig,
    /// Control API settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Switches loaded at startup.
    pub switches: SwitchesSpec,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Evaluate every `resolution` seconds.
    pub resolution: u32,
    pub policy: AccumulationPolicy,
}

/// Device controller configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    #[serde(flatten)]
    pub connection: DeviceHttpConfig,
    /// Value sent to switch on, unless the switch sets its own.
    pub on_value: i64,
    /// Value sent to switch off.
    pub off_value: i64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name daily triggers are read in.
    pub timezone: String,
}

/// HTTP control API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Serve the control API at all.
    pub enabled: bool,
    /// Address to bind to (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `cli.config` (if present), then apply
    /// environment-variable overrides, then command-line flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is
    /// malformed, or if the resulting configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&cli.config)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        cli.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SUNSWITCH_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                self.scheduler.resolution = resolution;
            }
        }
        if let Some(val) = lookup("SUNSWITCH_DEVICE_HOST") {
            self.device.connection.host = val;
        }
        if let Some(val) = lookup("SUNSWITCH_DEVICE_PORT") {
            if let Ok(port) = val.parse() {
                self.device.connection.port = port;
            }
        }
        if let Some(val) = lookup("SUNSWITCH_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = lookup("SUNSWITCH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.resolution == 0 {
            return Err(ConfigError::Validation(
                "resolution must be non-zero".to_string(),
            ));
        }
        if self.device.connection.port == 0 {
            return Err(ConfigError::Validation(
                "device port must be non-zero".to_string(),
            ));
        }
        if self.device.connection.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "device timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.server.enabled && self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server port must be non-zero".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(ConfigError::Validation(format!(
                "latitude {} is outside [-90, 90]",
                self.location.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(ConfigError::Validation(format!(
                "longitude {} is outside [-180, 180]",
                self.location.longitude
            )));
        }
        self.timezone()?;
        Ok(())
    }

    /// Parsed `location.timezone`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown zone name.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.location.timezone.parse().map_err(|_| {
            ConfigError::Validation(format!("unknown timezone {:?}", self.location.timezone))
        })
    }

    /// Scheduler tunables assembled from the `scheduler`, `device` and
    /// `location` sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown zone name.
    pub fn scheduler_settings(&self) -> Result<SchedulerSettings, ConfigError> {
        Ok(SchedulerSettings {
            resolution: self.scheduler.resolution,
            policy: self.scheduler.policy,
            timezone: self.timezone()?,
            off_value: self.device.off_value,
            default_on_value: self.device.on_value,
        })
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.location.latitude, self.location.longitude)
    }

    /// Return the `host:port` bind address of the control API.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            resolution: 600,
            policy: AccumulationPolicy::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            connection: DeviceHttpConfig::default(),
            on_value: DEFAULT_ON_VALUE,
            off_value: DEFAULT_OFF_VALUE,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        let coordinates = Coordinates::default();
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sunswitchd=info,sunswitch_app=info,tower_http=debug".to_string(),
        }
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
