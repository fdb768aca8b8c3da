//! Configuration
//!
//! Compile-time limits are generated by `build.rs` from the TOML profile in
//! the workspace `config/` directory; runtime preferences live in [`runtime`].

// Generated `compile_time` module
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, LoggingPreferences, RuntimeConfig, TokenizerPreferences};

/// Build information and configuration metadata
pub mod build_info {
    /// Configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("RULELEX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("RULELEX_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(compile_time::rule_set::MAX_STATES > 0);
        assert!(compile_time::rule_set::MAX_INCLUDE_DEPTH > 0);
        assert!(compile_time::tokenizer::MAX_STACK_DEPTH > 1);
        assert!(compile_time::tokenizer::BURST_BUFFER_CAPACITY > 0);
        assert!(compile_time::input::LARGE_INPUT_THRESHOLD <= compile_time::input::MAX_FILE_SIZE);
        assert!(compile_time::logging::MAX_CONTEXT_ENTRIES > 0);
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
    }
}
