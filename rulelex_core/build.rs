// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    rule_set: RuleSetLimits,
    tokenizer: TokenizerLimits,
    input: InputLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct RuleSetLimits {
    max_states: usize,
    max_rules_per_state: usize,
    max_include_depth: usize,
    max_pattern_length: usize,
}

#[derive(serde::Deserialize)]
struct TokenizerLimits {
    max_stack_depth: usize,
    max_empty_transitions: usize,
    burst_buffer_capacity: usize,
}

#[derive(serde::Deserialize)]
struct InputLimits {
    max_file_size: u64,
    large_input_threshold: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_context_entries: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RULELEX_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=RULELEX_CONFIG_DIR");

    let profile = env::var("RULELEX_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("RULELEX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of rulelex_core directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_STACK_DEPTH: usize = 65_536;

    if config.input.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.tokenizer.max_stack_depth == 0
        || config.tokenizer.max_stack_depth > ABSOLUTE_MAX_STACK_DEPTH
    {
        panic!("LIMITS: max_stack_depth must be between 1 and {ABSOLUTE_MAX_STACK_DEPTH}");
    }

    if config.tokenizer.max_empty_transitions == 0 {
        panic!("LIMITS: max_empty_transitions must allow at least one default transition");
    }

    if config.rule_set.max_states == 0 || config.rule_set.max_rules_per_state == 0 {
        panic!("LIMITS: rule set limits cannot be zero");
    }

    if config.logging.log_buffer_size < 16 {
        panic!("LIMITS: log_buffer_size too small (min: 16)");
    }

    if profile == "production" && config.input.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod rule_set {{
        pub const MAX_STATES: usize = {};
        pub const MAX_RULES_PER_STATE: usize = {};
        pub const MAX_INCLUDE_DEPTH: usize = {};
        pub const MAX_PATTERN_LENGTH: usize = {};
    }}

    pub mod tokenizer {{
        pub const MAX_STACK_DEPTH: usize = {};
        pub const MAX_EMPTY_TRANSITIONS: usize = {};
        pub const BURST_BUFFER_CAPACITY: usize = {};
    }}

    pub mod input {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_INPUT_THRESHOLD: u64 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_CONTEXT_ENTRIES: usize = {};
    }}
}}
"#,
        profile,
        // Rule set
        config.rule_set.max_states,
        config.rule_set.max_rules_per_state,
        config.rule_set.max_include_depth,
        config.rule_set.max_pattern_length,
        // Tokenizer
        config.tokenizer.max_stack_depth,
        config.tokenizer.max_empty_transitions,
        config.tokenizer.burst_buffer_capacity,
        // Input
        config.input.max_file_size,
        config.input.large_input_threshold,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_context_entries,
    );

    fs::write(output_path, constants_code).unwrap();
}
