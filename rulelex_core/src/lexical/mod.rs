//! Rule-driven lexical analysis
//!
//! Provides the stateful tokenizer engine: rule sets compiled once and shared
//! read-only, and per-run tokenizers that own their cursor and state stack.
//!

pub mod action;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod metrics;
pub mod pattern;
pub mod rule;
pub mod stack;
pub mod table;
pub mod tokenizer;

use crate::config::compile_time::rule_set::*;
use crate::config::compile_time::tokenizer::*;
use crate::config::runtime::TokenizerPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream, TokenType};

pub use error::{RuleSetError, StackError};
pub use lexer::{file_name_matches, Lexer, LexerInfo, RuleLexer};
pub use metrics::RunMetrics;
pub use pattern::{EmptyPattern, LiteralPattern, Pattern, PatternMatch, RegexPattern};
pub use rule::{Emission, Rule, StateAction, StateId, TokenCallback};
pub use table::{RuleSet, RuleSetBuilder, RuleTable, StateBuilder, ROOT_STATE};
pub use tokenizer::{RunState, Tokenizer};

// ============================================================================
// MODULE API
// ============================================================================

/// Tokenize `input` with preferences taken from the environment
pub fn tokenize<'r, 'a>(rules: &'r RuleSet, input: &'a str) -> TokenStream<'r, 'a> {
    TokenStream::new(rules, input, TokenizerPreferences::default())
}

/// Tokenize with explicit runtime preferences
pub fn tokenize_with_preferences<'r, 'a>(
    rules: &'r RuleSet,
    input: &'a str,
    preferences: TokenizerPreferences,
) -> TokenStream<'r, 'a> {
    TokenStream::new(rules, input, preferences)
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Validate that every engine error code is registered (for system startup)
pub fn init_lexical_logging() -> Result<(), String> {
    let engine_codes = [
        codes::rule_set::MISSING_ROOT_STATE,
        codes::rule_set::DUPLICATE_STATE,
        codes::rule_set::UNDEFINED_STATE,
        codes::rule_set::UNKNOWN_INCLUDE,
        codes::rule_set::INCLUDE_CYCLE,
        codes::rule_set::INCLUDE_TOO_DEEP,
        codes::rule_set::INVALID_PATTERN,
        codes::rule_set::PATTERN_TOO_LONG,
        codes::rule_set::EMPTY_MATCH_WITHOUT_TRANSITION,
        codes::rule_set::SILENT_RULE_CONSUMES,
        codes::rule_set::TOO_MANY_STATES,
        codes::rule_set::TOO_MANY_RULES,
        codes::tokenizer::STACK_UNDERFLOW,
        codes::tokenizer::STACK_OVERFLOW,
        codes::tokenizer::UNMATCHED_INPUT,
        codes::tokenizer::EMPTY_TRANSITION_LIMIT,
    ];

    for code in &engine_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Engine error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Engine limits initialized",
        "max_states" => MAX_STATES,
        "max_rules_per_state" => MAX_RULES_PER_STATE,
        "max_include_depth" => MAX_INCLUDE_DEPTH,
        "max_stack_depth" => MAX_STACK_DEPTH,
        "max_empty_transitions" => MAX_EMPTY_TRANSITIONS
    );

    Ok(())
}

/// Get the compile-time engine limits (for reporting/debugging)
pub fn get_engine_limits() -> EngineLimits {
    EngineLimits {
        max_states: MAX_STATES,
        max_rules_per_state: MAX_RULES_PER_STATE,
        max_include_depth: MAX_INCLUDE_DEPTH,
        max_pattern_length: MAX_PATTERN_LENGTH,
        max_stack_depth: MAX_STACK_DEPTH,
        max_empty_transitions: MAX_EMPTY_TRANSITIONS,
    }
}

/// Compile-time engine limits
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EngineLimits {
    pub max_states: usize,
    pub max_rules_per_state: usize,
    pub max_include_depth: usize,
    pub max_pattern_length: usize,
    pub max_stack_depth: usize,
    pub max_empty_transitions: usize,
}

// ============================================================================
// ANALYSIS HELPERS
// ============================================================================

/// Count tokens by top-level classification family
pub fn get_token_counts(tokens: &[Token]) -> TokenCounts {
    let mut counts = TokenCounts::default();

    for token in tokens {
        counts.total += 1;
        let kind = token.kind;
        if kind.is_error() {
            counts.errors += 1;
        } else if kind.is_comment() {
            counts.comments += 1;
        } else if kind.is_whitespace() {
            counts.whitespace += 1;
        } else if kind.is_subtype_of(TokenType::Keyword) {
            counts.keywords += 1;
        } else if kind.is_subtype_of(TokenType::Name) {
            counts.names += 1;
        } else if kind.is_subtype_of(TokenType::String) {
            counts.strings += 1;
        } else if kind.is_subtype_of(TokenType::Number) {
            counts.numbers += 1;
        } else if kind.is_subtype_of(TokenType::Operator) || kind == TokenType::Punctuation {
            counts.operators += 1;
        } else {
            counts.other += 1;
        }
    }

    counts
}

/// Token distribution by classification family
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TokenCounts {
    pub total: usize,
    pub keywords: usize,
    pub names: usize,
    pub strings: usize,
    pub numbers: usize,
    pub operators: usize,
    pub comments: usize,
    pub whitespace: usize,
    pub errors: usize,
    pub other: usize,
}

impl TokenCounts {
    /// Count of tokens that are neither whitespace nor comments
    pub fn significant_tokens(&self) -> usize {
        self.total - self.whitespace - self.comments
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
