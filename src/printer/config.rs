//! # Session Configuration
//!
//! Where the printer lives on the network and which mainboard it carries.
//!
//! ## File Format
//!
//! ```json
//! {
//!     "printer_ip": "192.168.1.50",
//!     "mainboard_id": "0a1b2c3d4e5f6a7b",
//!     "timeout_secs": 5
//! }
//! ```
//!
//! Only `printer_ip` is required. The printer firmware ignores messages whose
//! `MainboardID` does not match the device, so an empty id usually means no reply.
//!
//! ## Usage
//!
//! ```
//! use centauri::printer::SessionConfig;
//!
//! let config = SessionConfig::new("192.168.1.50", "0a1b2c3d4e5f6a7b");
//! assert_eq!(config.websocket_url(), "ws://192.168.1.50/websocket");
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CentauriError, LoadError};

/// Default configuration file, resolved against the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Default reply timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Connection settings for one printer.
///
/// Loaded once at startup and never mutated; each [`crate::PrinterClient`]
/// owns its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Printer host or IP address (optionally with `:port`)
    #[serde(default)]
    pub printer_ip: String,

    /// Mainboard identifier embedded in every request
    #[serde(default)]
    pub mainboard_id: String,

    /// Reply timeout, `None` waits forever.
    ///
    /// Written as `timeout_secs` in the file; fractions are allowed and `0`
    /// disables the timeout.
    #[serde(rename = "timeout_secs", default = "default_timeout", with = "timeout_secs")]
    pub timeout: Option<Duration>,
}

mod timeout_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(timeout: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(timeout.map(|d| d.as_secs_f64()).unwrap_or(0.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = f64::deserialize(d)?;
        if secs == 0.0 {
            return Ok(None);
        }
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid timeout_secs {}: {}", secs, e)))
    }
}

impl SessionConfig {
    pub fn new(printer_ip: impl Into<String>, mainboard_id: impl Into<String>) -> Self {
        Self {
            printer_ip: printer_ip.into(),
            mainboard_id: mainboard_id.into(),
            timeout: default_timeout(),
        }
    }

    /// Load and validate a configuration file.
    ///
    /// ## Errors
    ///
    /// Returns [`CentauriError::ConfigLoad`] when:
    /// - the file doesn't exist ([`LoadError::NotFound`])
    /// - it isn't a JSON object of the expected shape ([`LoadError::Malformed`])
    /// - `printer_ip` is missing or empty ([`LoadError::MissingField`])
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CentauriError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CentauriError::ConfigLoad(LoadError::from_io(path.to_path_buf(), e)))?;

        let config: Self = serde_json::from_str(&text).map_err(|e| {
            CentauriError::ConfigLoad(LoadError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        })?;

        if config.printer_ip.trim().is_empty() {
            return Err(CentauriError::ConfigLoad(LoadError::MissingField {
                path: path.to_path_buf(),
                field: "printer_ip",
            }));
        }

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Set the reply timeout (builder style)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reply timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// WebSocket endpoint of the printer
    pub fn websocket_url(&self) -> String {
        format!("ws://{}/websocket", self.printer_ip.trim())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_websocket_url() {
        let config = SessionConfig::new("10.0.0.7", "abc");
        assert_eq!(config.websocket_url(), "ws://10.0.0.7/websocket");
    }

    #[test]
    fn test_load_full() {
        let file = write_temp(
            r#"{"printer_ip": "10.0.0.7", "mainboard_id": "abc", "timeout_secs": 12}"#,
        );
        let config = SessionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.printer_ip, "10.0.0.7");
        assert_eq!(config.mainboard_id, "abc");
        assert_eq!(config.timeout(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_load_defaults() {
        let file = write_temp(r#"{"printer_ip": "10.0.0.7"}"#);
        let config = SessionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.mainboard_id, "");
        assert_eq!(config.timeout(), Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
    }

    #[test]
    fn test_missing_printer_ip() {
        let file = write_temp(r#"{"mainboard_id": "abc"}"#);
        let err = SessionConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CentauriError::ConfigLoad(LoadError::MissingField { field: "printer_ip", .. })
        ));
    }

    #[test]
    fn test_malformed() {
        let file = write_temp("{ not json");
        let err = SessionConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, CentauriError::ConfigLoad(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::from_path(dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, CentauriError::ConfigLoad(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_sub_second_timeout_kept() {
        let config =
            SessionConfig::new("10.0.0.7", "").with_timeout(Some(Duration::from_millis(500)));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_fractional_timeout_from_file() {
        let file = write_temp(r#"{"printer_ip": "10.0.0.7", "timeout_secs": 0.25}"#);
        let config = SessionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_zero_timeout_in_file_disables() {
        let file = write_temp(r#"{"printer_ip": "10.0.0.7", "timeout_secs": 0}"#);
        let config = SessionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_negative_timeout_is_malformed() {
        let file = write_temp(r#"{"printer_ip": "10.0.0.7", "timeout_secs": -1}"#);
        let err = SessionConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, CentauriError::ConfigLoad(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_timeout_serializes_as_seconds() {
        let config =
            SessionConfig::new("10.0.0.7", "").with_timeout(Some(Duration::from_millis(1500)));
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["timeout_secs"], 1.5);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = SessionConfig::new("10.0.0.7", "").with_timeout(None);
        assert_eq!(config.timeout(), None);
    }
}
