//! Flat `key = value` configuration files.
//!
//! The self-play driver is configured by a text file such as:
//!
//! ```text
//! iterations_param1 = 100
//! iterations_param2 = 1000
//! number_of_threads = 4
//! verbose = false
//! ```
//!
//! Keys are free-form (`file_size(K)` is a valid key). Blank lines and lines
//! starting with `#` are skipped; lines without `=` are logged and ignored.
//! Unknown keys are kept but never looked up, so they are effectively
//! ignored by consumers.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading or reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value {value:?} for config key {key:?}")]
    InvalidValue { key: String, value: String },
}

/// A parsed configuration file.
#[derive(Clone, Debug, Default)]
pub struct ConfigFile {
    entries: FxHashMap<String, String>,
}

impl ConfigFile {
    /// Load and parse a configuration file.
    ///
    /// A missing or unreadable file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(Self::parse(&content))
    }

    /// Parse configuration text.
    ///
    /// Later occurrences of a key override earlier ones.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut entries = FxHashMap::default();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    entries.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => warn!(line = line_no + 1, content = line, "Ignoring malformed config line"),
            }
        }

        Self { entries }
    }

    /// Raw string value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Parse the value for a key.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
        }
    }

    /// Read a boolean flag. Only the literal `true` is true.
    #[must_use]
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| v == "true")
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
