//! Probe configuration loaded from a JSON file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default HID read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: i32 = 1000;

/// Transport settings for the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Read timeout enforced by the HID transport; `-1` blocks indefinitely.
    pub read_timeout_ms: i32,
    /// Open this hidraw path instead of the first discovered receiver.
    pub path: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            path: None,
        }
    }
}

impl ProbeConfig {
    /// Load a configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))
    }

    fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ProbeConfig::from_json("{}").unwrap();
        assert_eq!(config, ProbeConfig::default());
        assert_eq!(config.read_timeout_ms, 1000);
    }

    #[test]
    fn fields_override_defaults() {
        let config =
            ProbeConfig::from_json(r#"{"read_timeout_ms": -1, "path": "/dev/hidraw4"}"#).unwrap();
        assert_eq!(config.read_timeout_ms, -1);
        assert_eq!(config.path.as_deref(), Some("/dev/hidraw4"));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(ProbeConfig::from_json("{read_timeout_ms").is_err());
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = ProbeConfig::load(Path::new("/nonexistent/hidpp-receiver.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "hidpp-receiver-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"read_timeout_ms": 250}"#).expect("write config");
        let config = ProbeConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.read_timeout_ms, 250);
        assert_eq!(config.path, None);
    }
}
