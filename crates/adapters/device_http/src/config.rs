//! Device controller configuration.

use serde::Deserialize;

/// Where the device controller's HTTP API lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceHttpConfig {
    /// Controller hostname or IP address.
    pub host: String,
    /// Controller port.
    pub port: u16,
    /// Per-request timeout in seconds. Must be non-zero.
    pub timeout_secs: u64,
}

impl Default for DeviceHttpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5000,
            timeout_secs: 10,
        }
    }
}

impl DeviceHttpConfig {
    /// Base URL every switch path is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = DeviceHttpConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5000);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            host = "zwave.lan"
            port = 8080
            timeout_secs = 5
        "#;
        let config: DeviceHttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.host, "zwave.lan");
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"host = "192.168.1.20""#;
        let config: DeviceHttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.host, "192.168.1.20");
        assert_eq!(config.port, 5000);
        assert_eq!(config.timeout_secs, 10);
    }
}
