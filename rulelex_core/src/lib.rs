//! Stateful, rule-driven tokenizer engine
//!
//! A [`RuleSet`] maps state names to ordered rule tables. Tokenizing text
//! against it yields a lazy [`TokenStream`] of classified tokens whose texts
//! concatenate back to the input exactly.

// Internal modules
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use config::{RuntimeConfig, TokenizerPreferences};
pub use lexical::{
    tokenize, tokenize_with_preferences, Emission, Lexer, LexerInfo, RuleLexer, RuleSet,
    RuleSetError, RunMetrics, StateAction, ROOT_STATE,
};
pub use tokens::{Token, TokenStream, TokenType};
