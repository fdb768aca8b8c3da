// RUNTIME PREFERENCES (User Experience)
//
// Limits that protect the engine are compile-time constants; everything here
// only changes what gets reported or how.

use crate::logging::codes;
use crate::logging::Code;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerPreferences {
    /// Run over input + `\n` when the input lacks a trailing newline, so
    /// line-anchored rules fire on the last line. The synthetic character
    /// never appears in a token.
    pub ensure_trailing_newline: bool,

    /// Whether to count tokens and error tokens per run
    pub collect_metrics: bool,

    /// Whether recovered conditions (fallback, underflow, dropped push) are logged at debug level
    pub log_recoveries: bool,
}

impl Default for TokenizerPreferences {
    fn default() -> Self {
        Self {
            ensure_trailing_newline: env_or(env_vars::TOKENIZER_ENSURE_TRAILING_NEWLINE, true),
            collect_metrics: env_or(env_vars::TOKENIZER_COLLECT_METRICS, true),
            log_recoveries: env_or(env_vars::TOKENIZER_LOG_RECOVERIES, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether events are written to the console at all; when off they are kept in memory
    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env_or(env_vars::LOGGING_MIN_LEVEL, LogLevel::Warning),
        }
    }
}

/// Runtime configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid preference '{name}': {reason}")]
    InvalidPreference { name: String, reason: String },
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::Read { .. } => codes::config::CONFIG_READ_ERROR,
            ConfigError::Parse(_) => codes::config::CONFIG_PARSE_ERROR,
            ConfigError::InvalidPreference { .. } => codes::config::INVALID_PREFERENCE,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

/// Every runtime preference, loadable from TOML. Missing tables and keys
/// fall back to the environment defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tokenizer: TokenizerPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.use_structured_logging && !self.logging.enable_console_logging {
            return Err(ConfigError::InvalidPreference {
                name: "logging.use_structured_logging".to_string(),
                reason: "structured logging requires enable_console_logging".to_string(),
            });
        }
        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Tokenizer
    pub const TOKENIZER_ENSURE_TRAILING_NEWLINE: &str = "RULELEX_TOKENIZER_ENSURE_TRAILING_NEWLINE";
    pub const TOKENIZER_COLLECT_METRICS: &str = "RULELEX_TOKENIZER_COLLECT_METRICS";
    pub const TOKENIZER_LOG_RECOVERIES: &str = "RULELEX_TOKENIZER_LOG_RECOVERIES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "RULELEX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "RULELEX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "RULELEX_LOGGING_MIN_LEVEL";
}
