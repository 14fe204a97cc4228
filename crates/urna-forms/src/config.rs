//! Forms configuration
//!
//! Timing and capacity knobs shared by every form controller. Loadable from
//! TOML; every key is optional and falls back to the defaults below.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Controller and notifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Upper bound on one collaborator call, in milliseconds
    pub submit_timeout_ms: u64,
    /// How long a notification stays visible, in milliseconds
    pub notification_ttl_ms: u64,
    /// Visible notifications kept before the oldest is dropped
    pub notification_capacity: usize,
    /// Artificial delay of the simulated collaborator, in milliseconds
    pub simulated_latency_ms: u64,
}

impl FormsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With submit timeout
    #[inline]
    #[must_use]
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout_ms = duration_ms(timeout);
        self
    }

    /// With notification time-to-live
    #[inline]
    #[must_use]
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl_ms = duration_ms(ttl);
        self
    }

    /// With notification capacity
    #[inline]
    #[must_use]
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    /// With simulated collaborator latency
    #[inline]
    #[must_use]
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency_ms = duration_ms(latency);
        self
    }

    /// Submit timeout as a duration
    #[inline]
    #[must_use]
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    /// Notification time-to-live as a duration
    #[inline]
    #[must_use]
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Simulated latency as a duration
    #[inline]
    #[must_use]
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Parse and check a TOML document
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML or unknown value types
    /// - `ConfigError::InvalidValue` on a zero timeout, time-to-live or capacity
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.check()?;
        Ok(config)
    }

    /// Load and check a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - any error of [`FormsConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "forms config loaded");
        Ok(config)
    }

    /// Reject values the controller cannot work with
    ///
    /// # Errors
    /// - `ConfigError::InvalidValue` on a zero timeout, time-to-live or capacity
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.submit_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "submit_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notification_ttl_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.notification_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notification_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submit_timeout_ms: 10_000,
            notification_ttl_ms: 5_000,
            notification_capacity: 16,
            simulated_latency_ms: 2_000,
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = FormsConfig::new();
        assert_eq!(config.submit_timeout(), Duration::from_secs(10));
        assert_eq!(config.notification_ttl(), Duration::from_secs(5));
        assert_eq!(config.simulated_latency(), Duration::from_secs(2));
        assert_eq!(config.notification_capacity, 16);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = FormsConfig::from_toml_str("submit_timeout_ms = 250\n").unwrap();
        assert_eq!(config.submit_timeout_ms, 250);
        assert_eq!(config.notification_capacity, 16);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = FormsConfig::from_toml_str("submit_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "submit_timeout_ms", .. }));
    }

    #[test]
    fn zero_notification_ttl_is_rejected() {
        let err = FormsConfig::from_toml_str("notification_ttl_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "notification_ttl_ms", .. }));
        assert!(FormsConfig::new()
            .with_notification_ttl(Duration::ZERO)
            .check()
            .is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = FormsConfig::from_toml_str("submit_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulated_latency_ms = 0\nnotification_capacity = 3").unwrap();

        let config = FormsConfig::load(file.path()).unwrap();
        assert_eq!(config.simulated_latency(), Duration::ZERO);
        assert_eq!(config.notification_capacity, 3);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = FormsConfig::load("/nonexistent/urna.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn builder_methods() {
        let config = FormsConfig::new()
            .with_submit_timeout(Duration::from_millis(50))
            .with_notification_capacity(2);
        assert_eq!(config.submit_timeout_ms, 50);
        assert_eq!(config.notification_capacity, 2);
    }
}
