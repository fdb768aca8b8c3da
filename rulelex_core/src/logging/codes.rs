//! Error and success codes with their classification metadata
//!
//! Single source of truth for every code the engine, the configuration layer
//! and the command line front end log under.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Rule set construction error codes
pub mod rule_set {
    use super::Code;

    pub const MISSING_ROOT_STATE: Code = Code::new("E101");
    pub const DUPLICATE_STATE: Code = Code::new("E102");
    pub const UNDEFINED_STATE: Code = Code::new("E103");
    pub const UNKNOWN_INCLUDE: Code = Code::new("E104");
    pub const INCLUDE_CYCLE: Code = Code::new("E105");
    pub const INCLUDE_TOO_DEEP: Code = Code::new("E106");
    pub const INVALID_PATTERN: Code = Code::new("E107");
    pub const PATTERN_TOO_LONG: Code = Code::new("E108");
    pub const EMPTY_MATCH_WITHOUT_TRANSITION: Code = Code::new("E109");
    pub const SILENT_RULE_CONSUMES: Code = Code::new("E110");

    // Compile-time limits
    pub const TOO_MANY_STATES: Code = Code::new("E111");
    pub const TOO_MANY_RULES: Code = Code::new("E112");
}

/// Tokenizer recovery codes (never fatal)
pub mod tokenizer {
    use super::Code;

    pub const STACK_UNDERFLOW: Code = Code::new("E201");
    pub const STACK_OVERFLOW: Code = Code::new("E202");
    pub const UNMATCHED_INPUT: Code = Code::new("E203");
    pub const EMPTY_TRANSITION_LIMIT: Code = Code::new("E204");
}

/// Runtime configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_READ_ERROR: Code = Code::new("E301");
    pub const CONFIG_PARSE_ERROR: Code = Code::new("E302");
    pub const INVALID_PREFERENCE: Code = Code::new("E303");
}

/// Input file error codes
pub mod input {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E401");
    pub const FILE_TOO_LARGE: Code = Code::new("E402");
    pub const INVALID_ENCODING: Code = Code::new("E403");
    pub const IO_ERROR: Code = Code::new("E404");
    pub const UNKNOWN_LEXER: Code = Code::new("E405");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const RULE_SET_COMPILED: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const CATALOG_BUILT: Code = Code::new("I030");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        registry.insert(
            "ERR001",
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal engine error",
                "File a bug report with the input and rule set",
            ),
        );
        registry.insert(
            "ERR002",
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check logging configuration and runtime preferences",
            ),
        );

        // Rule set construction errors
        registry.insert(
            "E101",
            ErrorMetadata::new(
                "E101",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Rule set has no root state",
                "Define a state named 'root'",
            ),
        );
        registry.insert(
            "E102",
            ErrorMetadata::new(
                "E102",
                "RuleSet",
                Severity::High,
                false,
                true,
                "State defined more than once",
                "Merge the duplicate state definitions",
            ),
        );
        registry.insert(
            "E103",
            ErrorMetadata::new(
                "E103",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Transition targets an undefined state",
                "Define the target state or fix the transition name",
            ),
        );
        registry.insert(
            "E104",
            ErrorMetadata::new(
                "E104",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Include references an undefined state",
                "Define the included state or remove the include",
            ),
        );
        registry.insert(
            "E105",
            ErrorMetadata::new(
                "E105",
                "RuleSet",
                Severity::High,
                false,
                true,
                "States include each other in a cycle",
                "Break the include cycle",
            ),
        );
        registry.insert(
            "E106",
            ErrorMetadata::new(
                "E106",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Include nesting exceeds the compile-time limit",
                "Flatten nested includes",
            ),
        );
        registry.insert(
            "E107",
            ErrorMetadata::new(
                "E107",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Rule pattern failed to compile",
                "Fix the regular expression syntax",
            ),
        );
        registry.insert(
            "E108",
            ErrorMetadata::new(
                "E108",
                "RuleSet",
                Severity::Medium,
                false,
                true,
                "Rule pattern exceeds the compile-time length limit",
                "Split the pattern across several rules",
            ),
        );
        registry.insert(
            "E109",
            ErrorMetadata::new(
                "E109",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Rule can match empty input without a state transition",
                "Make the pattern consume input or attach a transition",
            ),
        );
        registry.insert(
            "E110",
            ErrorMetadata::new(
                "E110",
                "RuleSet",
                Severity::High,
                false,
                true,
                "Rule without emission can consume input",
                "Give the rule an emission or use a default transition",
            ),
        );
        registry.insert(
            "E111",
            ErrorMetadata::new(
                "E111",
                "RuleSet",
                Severity::Medium,
                false,
                true,
                "Rule set exceeds the compile-time state limit",
                "Reduce the number of states",
            ),
        );
        registry.insert(
            "E112",
            ErrorMetadata::new(
                "E112",
                "RuleSet",
                Severity::Medium,
                false,
                true,
                "State exceeds the compile-time rule limit after include expansion",
                "Reduce the number of rules or includes in the state",
            ),
        );

        // Tokenizer recoveries
        registry.insert(
            "E201",
            ErrorMetadata::new(
                "E201",
                "Tokenizer",
                Severity::Low,
                true,
                false,
                "Pop removed the last state; stack reset to root",
                "Check the rule set for unbalanced pops",
            ),
        );
        registry.insert(
            "E202",
            ErrorMetadata::new(
                "E202",
                "Tokenizer",
                Severity::Low,
                true,
                false,
                "Push dropped at the compile-time stack depth limit",
                "Check the input for runaway nesting",
            ),
        );
        registry.insert(
            "E203",
            ErrorMetadata::new(
                "E203",
                "Tokenizer",
                Severity::Low,
                true,
                false,
                "No rule matched; one character emitted as Error",
                "Extend the rule set if the input is valid",
            ),
        );
        registry.insert(
            "E204",
            ErrorMetadata::new(
                "E204",
                "Tokenizer",
                Severity::Medium,
                true,
                false,
                "Too many consecutive zero-width transitions",
                "Check default transitions for loops",
            ),
        );

        // Configuration errors
        registry.insert(
            "E301",
            ErrorMetadata::new(
                "E301",
                "Configuration",
                Severity::Medium,
                true,
                false,
                "Runtime configuration file could not be read",
                "Check the configuration path and permissions",
            ),
        );
        registry.insert(
            "E302",
            ErrorMetadata::new(
                "E302",
                "Configuration",
                Severity::Medium,
                true,
                false,
                "Runtime configuration file is not valid TOML",
                "Fix the configuration syntax",
            ),
        );
        registry.insert(
            "E303",
            ErrorMetadata::new(
                "E303",
                "Configuration",
                Severity::Low,
                true,
                false,
                "Runtime preference has an invalid value",
                "Use a supported value for the preference",
            ),
        );

        // Input errors
        registry.insert(
            "E401",
            ErrorMetadata::new(
                "E401",
                "Input",
                Severity::Medium,
                false,
                false,
                "Input file not found",
                "Check the file path",
            ),
        );
        registry.insert(
            "E402",
            ErrorMetadata::new(
                "E402",
                "Input",
                Severity::Medium,
                false,
                false,
                "Input file exceeds the compile-time size limit",
                "Split the input or rebuild with a larger limit",
            ),
        );
        registry.insert(
            "E403",
            ErrorMetadata::new(
                "E403",
                "Input",
                Severity::Medium,
                false,
                false,
                "Input file is not valid UTF-8",
                "Convert the file to UTF-8",
            ),
        );
        registry.insert(
            "E404",
            ErrorMetadata::new(
                "E404",
                "Input",
                Severity::Medium,
                false,
                false,
                "Input file could not be read",
                "Check file permissions",
            ),
        );
        registry.insert(
            "E405",
            ErrorMetadata::new(
                "E405",
                "Input",
                Severity::Medium,
                false,
                false,
                "No lexer matches the requested name or file",
                "Pass --lexer with a known lexer name",
            ),
        );

        // Success codes
        registry.insert(
            "I004",
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "Engine ready",
            ),
        );
        registry.insert(
            "I010",
            ErrorMetadata::new(
                "I010",
                "RuleSet",
                Severity::Low,
                true,
                false,
                "Rule set compiled",
                "Rule set ready for tokenization",
            ),
        );
        registry.insert(
            "I020",
            ErrorMetadata::new(
                "I020",
                "Tokenizer",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "Token stream exhausted",
            ),
        );
        registry.insert(
            "I030",
            ErrorMetadata::new(
                "I030",
                "Catalog",
                Severity::Low,
                true,
                false,
                "Lexer catalog built",
                "Catalog ready for lookups",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_is_registered() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            rule_set::MISSING_ROOT_STATE,
            rule_set::TOO_MANY_RULES,
            tokenizer::STACK_UNDERFLOW,
            tokenizer::EMPTY_TRANSITION_LIMIT,
            config::CONFIG_READ_ERROR,
            config::INVALID_PREFERENCE,
            input::FILE_NOT_FOUND,
            input::UNKNOWN_LEXER,
            success::RULE_SET_COMPILED,
            success::CATALOG_BUILT,
        ];
        for code in all {
            let metadata = get_error_metadata(code.as_str()).unwrap();
            assert_eq!(metadata.code, code.as_str());
        }
    }

    #[test]
    fn test_rule_set_errors_halt_and_recoveries_do_not() {
        assert!(requires_halt(rule_set::INCLUDE_CYCLE.as_str()));
        assert!(!is_recoverable(rule_set::INCLUDE_CYCLE.as_str()));
        assert!(is_recoverable(tokenizer::UNMATCHED_INPUT.as_str()));
        assert!(!requires_halt(tokenizer::UNMATCHED_INPUT.as_str()));
        assert_eq!(get_category(tokenizer::STACK_OVERFLOW.as_str()), "Tokenizer");
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
        assert_eq!(Severity::from_str("High"), Some(Severity::High));
    }
}
