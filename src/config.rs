//! Interpreter configuration
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields [`Config::default`].
//!
//! ```toml
//! max_while_iterations = 1000
//! preview_chars = 100
//! echo_output = true
//! ```

use crate::interpreter::constants::{MAX_WHILE_ITERATIONS, PROMPT_PREVIEW_CHARS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables for one interpreter instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `while` passes allowed before failing with a loop overrun
    pub max_while_iterations: usize,
    /// Characters of system/user prompts echoed when a model message is sent
    pub preview_chars: usize,
    /// Emit every output line as a tracing event as it is produced
    pub echo_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_while_iterations: MAX_WHILE_ITERATIONS,
            preview_chars: PROMPT_PREVIEW_CHARS,
            echo_output: true,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = Config::from_toml_str("max_while_iterations = 10").unwrap();
        assert_eq!(config.max_while_iterations, 10);
        assert_eq!(config.preview_chars, PROMPT_PREVIEW_CHARS);
        assert!(config.echo_output);
    }

    #[test]
    fn test_invalid_document_is_rejected() {
        let err = Config::from_toml_str("max_while_iterations = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "echo_output = false\npreview_chars = 20").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.echo_output);
        assert_eq!(config.preview_chars, 20);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/naturacode.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
