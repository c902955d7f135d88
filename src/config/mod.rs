//! Runtime settings for remote operations
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! passed with `--config`, and per-invocation CLI flags. Later layers win.
//! The defaults preserve the historical behavior of the tooling: stop on the
//! first remote failure, no automatic retry.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default delay before the first retry attempt, doubled per attempt.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Halt the assignment pipeline on the first remote failure.
    ///
    /// Assignments are order-independent, but partial completion must stay
    /// visible and stoppable. Set to `false` to process every group and
    /// report all failures at the end.
    pub stop_on_first_error: bool,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Retry attempts for transient remote failures (5xx, connect errors,
    /// timeouts). 4xx responses are never retried.
    pub retries: u32,

    /// Base delay between retries in milliseconds, doubled per attempt.
    pub retry_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stop_on_first_error: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults when no path
    /// is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI flag overrides on top of file/default values.
    pub fn with_overrides(
        mut self,
        keep_going: bool,
        timeout: Option<u64>,
        retries: Option<u32>,
    ) -> Self {
        if keep_going {
            self.stop_on_first_error = false;
        }
        if let Some(timeout) = timeout {
            self.timeout_secs = timeout;
        }
        if let Some(retries) = retries {
            self.retries = retries;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_original_behavior() {
        let settings = Settings::default();
        assert!(settings.stop_on_first_error);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.retries, 0);
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn parses_partial_toml() {
        let settings: Settings =
            toml::from_str("stop_on_first_error = false\nretries = 3").unwrap();
        assert!(!settings.stop_on_first_error);
        assert_eq!(settings.retries, 3);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: std::result::Result<Settings, _> = toml::from_str("tiemout_secs = 10");
        assert!(result.is_err());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let settings = Settings::default().with_overrides(true, Some(5), Some(2));
        assert!(!settings.stop_on_first_error);
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.retries, 2);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let mut base = Settings::default();
        base.timeout_secs = 60;
        let settings = base.clone().with_overrides(false, None, None);
        assert_eq!(settings, base);
    }
}
