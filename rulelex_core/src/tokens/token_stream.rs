//! Lazy, pull-driven token stream
//!
//! The stream drives the tokenizer one rule application at a time and hands
//! the resulting burst out token by token. Dropping the stream early is the
//! only cancellation there is.

use crate::config::compile_time::tokenizer::BURST_BUFFER_CAPACITY;
use crate::config::runtime::TokenizerPreferences;
use crate::lexical::metrics::RunMetrics;
use crate::lexical::table::RuleSet;
use crate::lexical::tokenizer::{RunState, Tokenizer};
use crate::tokens::token::Token;
use std::collections::VecDeque;
use std::iter::FusedIterator;

pub struct TokenStream<'r, 'a> {
    tokenizer: Tokenizer<'r, 'a>,
    /// Tokens produced by the last step and not yet pulled
    buffer: VecDeque<Token>,
}

impl<'r, 'a> TokenStream<'r, 'a> {
    pub fn new(rules: &'r RuleSet, input: &'a str, preferences: TokenizerPreferences) -> Self {
        Self {
            tokenizer: Tokenizer::new(rules, input, preferences),
            buffer: VecDeque::with_capacity(BURST_BUFFER_CAPACITY),
        }
    }

    /// True once the input is exhausted and every buffered token was pulled
    pub fn is_finished(&self) -> bool {
        self.buffer.is_empty() && self.tokenizer.is_finished()
    }

    /// State stack by name, bottom first.
    ///
    /// After exhaustion this is the final stack; anything above `root` is a
    /// context the input left open.
    pub fn open_states(&self) -> Vec<String> {
        self.tokenizer.open_states()
    }

    pub fn metrics(&self) -> &RunMetrics {
        self.tokenizer.metrics()
    }

    pub fn rules(&self) -> &'r RuleSet {
        self.tokenizer.rules()
    }

    /// Pull everything that is left, returning the remaining tokens
    pub fn drain_all(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }
}

impl Iterator for TokenStream<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.buffer.pop_front() {
                return Some(token);
            }
            // A step may legitimately produce nothing (pure transitions,
            // clipped synthetic newline), so keep stepping until a token
            // arrives or the run ends.
            if self.tokenizer.step(&mut self.buffer) == RunState::Finished && self.buffer.is_empty() {
                return None;
            }
        }
    }
}

impl FusedIterator for TokenStream<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::rule::{Emission, StateAction};
    use crate::lexical::table::ROOT_STATE;
    use crate::tokens::TokenType;

    fn quoted_rules() -> RuleSet {
        RuleSet::builder("quoted")
            .state(ROOT_STATE, |s| {
                s.rule_with("\"", TokenType::StringDouble, StateAction::push("string"))
                    .rule(r"[^\S\n]+", TokenType::Whitespace)
                    .rule(r"\n", TokenType::Whitespace)
                    .rule(r"\w+", TokenType::Name)
            })
            .state("string", |s| {
                s.rule(r#"[^"\\]+"#, TokenType::StringDouble)
                    .rule(r"\\.", TokenType::StringEscape)
                    .rule_with("\"", TokenType::StringDouble, StateAction::pop())
            })
            .build()
            .unwrap()
    }

    fn preferences() -> TokenizerPreferences {
        TokenizerPreferences {
            ensure_trailing_newline: true,
            collect_metrics: true,
            log_recoveries: false,
        }
    }

    #[test]
    fn test_stream_is_lossless() {
        let rules = quoted_rules();
        let input = "say \"hi \\\" there\" now";
        let text: String = TokenStream::new(&rules, input, preferences())
            .map(|t| t.text)
            .collect();
        assert_eq!(text, input);
    }

    #[test]
    fn test_balanced_construct_restores_stack() {
        let rules = quoted_rules();
        let mut stream = TokenStream::new(&rules, "a \"b\" c\n", preferences());
        let tokens = stream.drain_all();

        assert!(stream.is_finished());
        assert_eq!(stream.open_states(), vec!["root"]);
        assert_eq!(tokens.last().map(Token::pair), Some((TokenType::Whitespace, "\n")));
    }

    #[test]
    fn test_unterminated_context_stops_silently() {
        let rules = quoted_rules();
        let mut stream = TokenStream::new(&rules, "a \"open", preferences());
        let tokens = stream.drain_all();

        // No synthetic token for the open string; the newline appended for
        // line-anchored rules is clipped away.
        let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, "a \"open");
        assert!(tokens.iter().all(|t| !t.is_error()));
        assert_eq!(stream.open_states(), vec!["root", "string"]);
    }

    #[test]
    fn test_stream_is_fused() {
        let rules = quoted_rules();
        let mut stream = TokenStream::new(&rules, "a", preferences());
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
        assert!(stream.is_finished());
    }

    #[test]
    fn test_consumer_may_stop_early() {
        let rules = quoted_rules();
        let mut stream = TokenStream::new(&rules, "one two three", preferences());
        let first = stream.next().unwrap();
        assert_eq!(first.pair(), (TokenType::Name, "one"));
        assert!(!stream.is_finished());
    }

    #[test]
    fn test_pure_transitions_yield_nothing() {
        let rules = RuleSet::builder("defaults")
            .state(ROOT_STATE, |s| s.default(StateAction::push("word")))
            .state("word", |s| {
                s.rule_with(r"\w+", Emission::Single(TokenType::Name), StateAction::pop())
            })
            .build()
            .unwrap();
        let tokens: Vec<_> = TokenStream::new(&rules, "abc", preferences()).collect();

        // `abc` as a name, then the synthetic newline hits the fallback and is clipped
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].pair(), (TokenType::Name, "abc"));
    }

    #[test]
    fn test_metrics_after_exhaustion() {
        let rules = quoted_rules();
        let mut stream = TokenStream::new(&rules, "x ~", preferences());
        let _ = stream.drain_all();

        let metrics = stream.metrics();
        assert_eq!(metrics.error_tokens, 1);
        assert_eq!(metrics.max_stack_depth, 1);
        assert!(metrics.had_recoveries());
    }
}
