// ============================================================
// Layer 6: Process Settings
// ============================================================
// Values that belong to the process rather than to a training
// run, read from the environment with defaults:
//
//   NLU_STORAGE_DIR             where the filesystem persistor puts archives
//   NLU_ENDPOINT_TIMEOUT_SECS   HTTP timeout for training data endpoints

use std::{env, path::PathBuf, time::Duration};

pub const STORAGE_DIR_VAR: &str = "NLU_STORAGE_DIR";
pub const ENDPOINT_TIMEOUT_VAR: &str = "NLU_ENDPOINT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_dir:      PathBuf,
    pub endpoint_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir:      PathBuf::from("storage"),
            endpoint_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_dir = lookup(STORAGE_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let endpoint_timeout = match lookup(ENDPOINT_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}='{}'", ENDPOINT_TIMEOUT_VAR, raw);
                    defaults.endpoint_timeout
                }
            },
            None => defaults.endpoint_timeout,
        };

        Self {
            storage_dir,
            endpoint_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let settings = Settings::from_lookup(|key| match key {
            STORAGE_DIR_VAR => Some("/tmp/models".to_string()),
            ENDPOINT_TIMEOUT_VAR => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(settings.storage_dir, PathBuf::from("/tmp/models"));
        assert_eq!(settings.endpoint_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let settings = Settings::from_lookup(|key| {
            (key == ENDPOINT_TIMEOUT_VAR).then(|| "soon".to_string())
        });
        assert_eq!(settings.endpoint_timeout, Duration::from_secs(30));
    }
}
