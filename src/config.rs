//! Backend configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PhalanxError, Result};

/// Configuration of the in-memory backend.
///
/// Every field has a default, so a JSON file only needs to list what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Minimum length of a search key token, in code points.
    pub min_chars: usize,

    /// Maximum length of a fulltext token, in code points. Longer tokens are
    /// truncated at index time and ignored in search keys.
    pub max_token_chars: usize,

    /// Maximum length of a string value, in code points.
    pub max_string_chars: usize,

    /// Words that are never searched for.
    pub stop_words: Vec<String>,

    /// How long to wait for the index lock before giving up.
    pub lock_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            min_chars: 1,
            max_token_chars: 50,
            max_string_chars: 255,
            stop_words: Vec::new(),
            lock_timeout_ms: 5000,
        }
    }
}

impl BackendConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: BackendConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_chars == 0 {
            return Err(PhalanxError::invalid_config("min_chars must be at least 1"));
        }
        if self.max_token_chars < self.min_chars {
            return Err(PhalanxError::invalid_config(format!(
                "max_token_chars ({}) must not be less than min_chars ({})",
                self.max_token_chars, self.min_chars
            )));
        }
        if self.max_string_chars == 0 {
            return Err(PhalanxError::invalid_config(
                "max_string_chars must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
