//! The tokenizer loop
//!
//! One [`Tokenizer::step`] is one transition of the run's state machine: a
//! matcher attempt against the active state's table followed by the action
//! executor, or the fallback rule when nothing matches. Each step yields the
//! short burst of tokens the applied rule produced.

use super::action::ActionExecutor;
use super::cursor::Cursor;
use super::matcher;
use super::metrics::RunMetrics;
use super::stack::StateStack;
use super::table::RuleSet;
use crate::config::compile_time::tokenizer::MAX_EMPTY_TRANSITIONS;
use crate::config::runtime::TokenizerPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenType};
use crate::{log_debug, log_success};

/// Top-level run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Finished,
}

pub struct Tokenizer<'r, 'a> {
    rules: &'r RuleSet,
    executor: ActionExecutor<'r>,
    cursor: Cursor<'a>,
    stack: StateStack,
    state: RunState,
    /// Consecutive zero-width transitions since input was last consumed
    empty_streak: usize,
    preferences: TokenizerPreferences,
    metrics: RunMetrics,
    scratch: Vec<Token>,
}

impl<'r, 'a> Tokenizer<'r, 'a> {
    pub fn new(rules: &'r RuleSet, input: &'a str, preferences: TokenizerPreferences) -> Self {
        let stack = StateStack::new(rules.root());
        let mut metrics = RunMetrics::default();
        metrics.record_depth(stack.depth());

        log_debug!("Starting tokenization",
            "rule_set" => rules.name(),
            "input_bytes" => input.len(),
            "trailing_newline_appended" => preferences.ensure_trailing_newline && !input.ends_with('\n')
        );

        Self {
            rules,
            executor: ActionExecutor::new(rules, preferences.log_recoveries),
            cursor: Cursor::new(input, preferences.ensure_trailing_newline),
            stack,
            state: RunState::Running,
            empty_streak: 0,
            preferences,
            metrics,
            scratch: Vec::new(),
        }
    }

    /// Advance by one rule application, appending its tokens to `out`
    pub fn step(&mut self, out: &mut impl Extend<Token>) -> RunState {
        if self.state == RunState::Finished {
            return self.state;
        }

        if self.cursor.is_at_end() {
            self.finish();
            return self.state;
        }

        if self.empty_streak >= MAX_EMPTY_TRANSITIONS {
            self.metrics.forced_fallbacks += 1;
            if self.preferences.log_recoveries {
                log_debug!("Zero-width transition limit reached",
                    "code" => codes::tokenizer::EMPTY_TRANSITION_LIMIT,
                    "state" => self.rules.state_name(self.stack.top()),
                    "position" => self.cursor.position()
                );
            }
            self.fallback();
        } else {
            let rules = self.rules;
            let table = rules.table(self.stack.top());
            match matcher::find_match(table, &self.cursor) {
                Some((rule, matched)) => {
                    self.metrics.rules_matched += 1;
                    if matched.is_empty() {
                        self.empty_streak += 1;
                    } else {
                        self.empty_streak = 0;
                    }
                    self.executor.execute(
                        rule,
                        &matched,
                        &mut self.cursor,
                        &mut self.stack,
                        &mut self.scratch,
                        &mut self.metrics,
                    );
                }
                None => self.fallback(),
            }
        }

        if self.preferences.collect_metrics {
            for token in &self.scratch {
                self.metrics.record_token(token);
            }
        }
        out.extend(self.scratch.drain(..));

        self.state
    }

    /// Consume one code point as `Error` without touching the stack
    fn fallback(&mut self) {
        self.empty_streak = 0;
        let Some(len) = self.cursor.next_char_len() else {
            return;
        };

        if self.preferences.log_recoveries {
            log_debug!("Unmatched input",
                "code" => codes::tokenizer::UNMATCHED_INPUT,
                "state" => self.rules.state_name(self.stack.top()),
                "position" => self.cursor.position()
            );
        }

        let end = self.cursor.offset() + len;
        self.scratch.extend(self.cursor.emit(TokenType::Error, end));
    }

    fn finish(&mut self) {
        self.state = RunState::Finished;

        if self.stack.depth() > 1 {
            log_debug!("Input ended inside nested states",
                "open_states" => self.open_states().join(" > ")
            );
        }

        if self.preferences.collect_metrics {
            log_success!(
                codes::success::TOKENIZATION_COMPLETE,
                "Tokenization completed",
                "rule_set" => self.rules.name(),
                "tokens" => self.metrics.tokens,
                "error_tokens" => self.metrics.error_tokens,
                "max_stack_depth" => self.metrics.max_stack_depth
            );
        }
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Current state stack by name, bottom first
    pub fn open_states(&self) -> Vec<String> {
        self.stack
            .entries()
            .iter()
            .map(|id| self.rules.state_name(*id).to_string())
            .collect()
    }
}
