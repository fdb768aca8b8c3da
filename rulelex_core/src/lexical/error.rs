//! Error types for rule-set construction and state-stack recovery
use crate::config::compile_time::rule_set::*;
use crate::logging::codes;
use crate::logging::Code;

/// Structural problems in a rule set, reported by `RuleSetBuilder::build`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSetError {
    #[error("Rule set '{rule_set}' has no 'root' state")]
    MissingRootState { rule_set: String },

    #[error("State '{state}' is defined more than once")]
    DuplicateState { state: String },

    #[error("State '{state}' transitions to undefined state '{target}'")]
    UndefinedState { state: String, target: String },

    #[error("State '{state}' includes undefined state '{target}'")]
    UnknownInclude { state: String, target: String },

    #[error("Include cycle: {}", .chain.join(" -> "))]
    IncludeCycle { chain: Vec<String> },

    #[error("Includes nested deeper than {MAX_INCLUDE_DEPTH} levels below state '{state}'")]
    IncludeTooDeep { state: String },

    #[error("Invalid pattern in state '{state}': {message}")]
    InvalidPattern {
        state: String,
        pattern: String,
        message: String,
    },

    #[error("Pattern in state '{state}' is {length} bytes (max {MAX_PATTERN_LENGTH})")]
    PatternTooLong { state: String, length: usize },

    #[error("Pattern '{pattern}' in state '{state}' can match empty text but has no transition")]
    EmptyMatchWithoutTransition { state: String, pattern: String },

    #[error("Rule '{pattern}' in state '{state}' consumes input but emits nothing")]
    SilentRuleConsumes { state: String, pattern: String },

    #[error("Too many states: {count} (max {MAX_STATES})")]
    TooManyStates { count: usize },

    #[error("State '{state}' has {count} rules (max {MAX_RULES_PER_STATE})")]
    TooManyRules { state: String, count: usize },
}

impl RuleSetError {
    pub fn error_code(&self) -> Code {
        match self {
            RuleSetError::MissingRootState { .. } => codes::rule_set::MISSING_ROOT_STATE,
            RuleSetError::DuplicateState { .. } => codes::rule_set::DUPLICATE_STATE,
            RuleSetError::UndefinedState { .. } => codes::rule_set::UNDEFINED_STATE,
            RuleSetError::UnknownInclude { .. } => codes::rule_set::UNKNOWN_INCLUDE,
            RuleSetError::IncludeCycle { .. } => codes::rule_set::INCLUDE_CYCLE,
            RuleSetError::IncludeTooDeep { .. } => codes::rule_set::INCLUDE_TOO_DEEP,
            RuleSetError::InvalidPattern { .. } => codes::rule_set::INVALID_PATTERN,
            RuleSetError::PatternTooLong { .. } => codes::rule_set::PATTERN_TOO_LONG,
            RuleSetError::EmptyMatchWithoutTransition { .. } => {
                codes::rule_set::EMPTY_MATCH_WITHOUT_TRANSITION
            }
            RuleSetError::SilentRuleConsumes { .. } => codes::rule_set::SILENT_RULE_CONSUMES,
            RuleSetError::TooManyStates { .. } => codes::rule_set::TOO_MANY_STATES,
            RuleSetError::TooManyRules { .. } => codes::rule_set::TOO_MANY_RULES,
        }
    }

    /// Construction errors always stop the rule set from being used
    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

/// Stack conditions the tokenizer recovers from locally
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("Pop of {requested} state(s) from a stack of depth {depth}; reset to root")]
    StackUnderflow { requested: usize, depth: usize },

    #[error("Push dropped at depth limit {limit}")]
    StackOverflow { limit: usize },
}

impl StackError {
    pub fn error_code(&self) -> Code {
        match self {
            StackError::StackUnderflow { .. } => codes::tokenizer::STACK_UNDERFLOW,
            StackError::StackOverflow { .. } => codes::tokenizer::STACK_OVERFLOW,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}
