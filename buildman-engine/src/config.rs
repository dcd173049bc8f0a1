//! Engine configuration
//!
//! Defines all configurable parameters for the engine including the location
//! of the target document and the watcher's polling cadence.

use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
///
/// Intervals are configurable to allow tuning for different deployment
/// scenarios (dev vs prod, local disk vs network share).
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the target document
    pub config_dir: PathBuf,

    /// Bare file name of the target document inside `config_dir`
    pub config_filename: String,

    /// How often the watcher scans `config_dir` for changes
    pub poll_interval: Duration,

    /// How long the watcher lets a burst of change events settle before
    /// reloading
    pub debounce: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            config_filename: "BuildTargets.toml".to_string(),
            poll_interval: Duration::from_secs(2),
            debounce: Duration::from_millis(250),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BUILDMAN_CONFIG_DIR (required)
    /// - BUILDMAN_CONFIG_FILE (optional, default: BuildTargets.toml)
    /// - BUILDMAN_POLL_INTERVAL_MS (optional, default: 2000)
    /// - BUILDMAN_DEBOUNCE_MS (optional, default: 250)
    pub fn from_env() -> anyhow::Result<Self> {
        let config_dir = std::env::var("BUILDMAN_CONFIG_DIR")
            .map_err(|_| anyhow::anyhow!("BUILDMAN_CONFIG_DIR environment variable not set"))?;

        let mut config = Self::new(config_dir);

        if let Ok(filename) = std::env::var("BUILDMAN_CONFIG_FILE") {
            config.config_filename = filename;
        }

        config.poll_interval = std::env::var("BUILDMAN_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(config.poll_interval);

        config.debounce = std::env::var("BUILDMAN_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(config.debounce);

        Ok(config)
    }

    /// Full path of the target document
    pub fn document_path(&self) -> PathBuf {
        self.config_dir.join(&self.config_filename)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.config_dir.as_os_str().is_empty() {
            anyhow::bail!("config_dir cannot be empty");
        }

        if self.config_filename.is_empty() {
            anyhow::bail!("config_filename cannot be empty");
        }

        if self.config_filename.contains(std::path::MAIN_SEPARATOR) {
            anyhow::bail!("config_filename must be a bare file name, not a path");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("/etc/buildman")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.config_filename, "BuildTargets.toml");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_document_path() {
        let config = Config::new("/etc/buildman");
        assert_eq!(
            config.document_path(),
            PathBuf::from("/etc/buildman/BuildTargets.toml")
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty file name should fail
        config.config_filename = String::new();
        assert!(config.validate().is_err());

        // A path instead of a bare file name should fail
        config.config_filename = "sub/dir/BuildTargets.toml".to_string();
        assert!(config.validate().is_err());

        config.config_filename = "targets.toml".to_string();
        assert!(config.validate().is_ok());

        // Zero poll interval should fail
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
