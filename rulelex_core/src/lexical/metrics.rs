//! Per-run counters
use crate::tokens::Token;
use serde::{Deserialize, Serialize};

/// What happened during one tokenization run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub tokens: usize,
    pub error_tokens: usize,
    pub rules_matched: usize,
    pub stack_underflows: usize,
    pub dropped_pushes: usize,
    pub max_stack_depth: usize,
    pub forced_fallbacks: usize,
}

impl RunMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.tokens += 1;
        if token.is_error() {
            self.error_tokens += 1;
        }
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        self.max_stack_depth = self.max_stack_depth.max(depth);
    }

    /// Any recovery path was taken
    pub fn had_recoveries(&self) -> bool {
        self.error_tokens > 0
            || self.stack_underflows > 0
            || self.dropped_pushes > 0
            || self.forced_fallbacks > 0
    }
}
