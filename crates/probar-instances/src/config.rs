//! Instance resolution configuration.
//!
//! Only the readiness wait is configurable; everything else about the three
//! categories is fixed. Configuration can come from YAML and be overridden
//! from the environment.

use crate::result::InstanceResult;
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the readiness timeout (ms)
pub const ENV_WAIT_TIMEOUT_MS: &str = "PROBAR_WAIT_TIMEOUT_MS";

/// Environment variable overriding the readiness polling interval (ms)
pub const ENV_WAIT_POLL_MS: &str = "PROBAR_WAIT_POLL_MS";

/// Configuration shared by every context built from it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstancesConfig {
    /// Options used when awaiting page readiness
    pub wait: WaitOptions,
}

impl InstancesConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set wait options
    #[must_use]
    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Parse configuration from YAML
    pub fn from_yaml_str(yaml: &str) -> InstanceResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> InstanceResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> InstanceResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `PROBAR_WAIT_*` environment overrides
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = parse_override(&lookup, ENV_WAIT_TIMEOUT_MS) {
            self.wait.timeout_ms = ms;
        }
        if let Some(ms) = parse_override(&lookup, ENV_WAIT_POLL_MS) {
            self.wait.poll_interval_ms = ms;
        }
        self
    }
}

fn parse_override<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid override");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::wait::DEFAULT_POLL_INTERVAL_MS;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = InstancesConfig::new();
        assert_eq!(config.wait, WaitOptions::default());
    }

    #[test]
    fn test_from_yaml() {
        let config = InstancesConfig::from_yaml_str(
            "wait:\n  timeout_ms: 1500\n  timeout_message: home screen missing\n",
        )
        .unwrap();
        assert_eq!(config.wait.timeout_ms, 1500);
        assert_eq!(config.wait.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(
            config.wait.timeout_message.as_deref(),
            Some("home screen missing")
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = InstancesConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, InstancesConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = InstancesConfig::from_yaml_str("wait: [1, 2").unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config =
            InstancesConfig::new().with_wait(WaitOptions::new().with_timeout(10).with_post_timeout(5));
        let yaml = config.to_yaml().unwrap();
        assert_eq!(InstancesConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "wait:\n  poll_interval_ms: 5").unwrap();
        let config = InstancesConfig::from_file(file.path()).unwrap();
        assert_eq!(config.wait.poll_interval_ms, 5);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InstancesConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, crate::result::InstanceError::Io(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [(ENV_WAIT_TIMEOUT_MS, "250"), (ENV_WAIT_POLL_MS, "oops")]
            .into_iter()
            .collect();
        let config = InstancesConfig::new()
            .with_overrides_from(|key| env.get(key).map(|value| (*value).to_string()));
        assert_eq!(config.wait.timeout_ms, 250);
        assert_eq!(config.wait.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }
}
