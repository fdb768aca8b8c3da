//! Action executor: emit a rule's tokens, then move the state stack
use super::cursor::Cursor;
use super::error::StackError;
use super::metrics::RunMetrics;
use super::pattern::PatternMatch;
use super::rule::{Emission, Rule, Transition};
use super::stack::StateStack;
use super::table::RuleSet;
use crate::log_debug;
use crate::tokens::{Token, TokenType};
use std::ops::Range;

/// Split a match into classified pieces that tile it exactly.
///
/// Pieces are taken in order; gaps between them become `Text`, overlaps are
/// clipped to what is left, and empty pieces are dropped.
pub fn emission_pieces(
    emission: &Emission,
    matched: &PatternMatch,
    haystack: &str,
) -> Vec<(TokenType, Range<usize>)> {
    let raw: Vec<(TokenType, Range<usize>)> = match emission {
        Emission::Single(kind) => vec![(*kind, matched.range())],
        Emission::ByGroups(kinds) => kinds
            .iter()
            .enumerate()
            .filter_map(|(i, kind)| {
                matched
                    .group(i + 1)
                    .map(|range| (kind.unwrap_or(TokenType::Text), range))
            })
            .collect(),
        Emission::Callback(callback) => (callback.as_ref())(matched, haystack),
        Emission::Nothing => Vec::new(),
    };

    tile(raw, matched.range())
}

fn tile(pieces: Vec<(TokenType, Range<usize>)>, span: Range<usize>) -> Vec<(TokenType, Range<usize>)> {
    let mut tiled = Vec::with_capacity(pieces.len() + 1);
    let mut pos = span.start;

    for (kind, range) in pieces {
        let start = range.start.max(pos);
        let end = range.end.min(span.end);
        if end <= start {
            continue;
        }
        if start > pos {
            tiled.push((TokenType::Text, pos..start));
        }
        tiled.push((kind, start..end));
        pos = end;
    }

    if pos < span.end {
        tiled.push((TokenType::Text, pos..span.end));
    }

    tiled
}

/// Applies matched rules to a run's cursor and stack
pub struct ActionExecutor<'r> {
    rules: &'r RuleSet,
    log_recoveries: bool,
}

impl<'r> ActionExecutor<'r> {
    pub fn new(rules: &'r RuleSet, log_recoveries: bool) -> Self {
        Self {
            rules,
            log_recoveries,
        }
    }

    /// Emit the rule's tokens into `out`, then apply its transition
    pub fn execute(
        &self,
        rule: &Rule,
        matched: &PatternMatch,
        cursor: &mut Cursor<'_>,
        stack: &mut StateStack,
        out: &mut impl Extend<Token>,
        metrics: &mut RunMetrics,
    ) {
        for (kind, range) in emission_pieces(rule.emission(), matched, cursor.text()) {
            // callbacks and custom patterns may hand back ranges that start
            // behind the cursor or split a code point
            let start = cursor.snap_forward(range.start);
            if start > cursor.offset() {
                out.extend(cursor.emit(TokenType::Text, start));
            }
            out.extend(cursor.emit(kind, range.end));
        }
        if cursor.offset() < matched.end() {
            out.extend(cursor.emit(TokenType::Text, matched.end()));
        }

        self.apply_transition(rule.transition(), stack, metrics);
    }

    pub fn apply_transition(
        &self,
        transition: &Transition,
        stack: &mut StateStack,
        metrics: &mut RunMetrics,
    ) {
        match transition {
            Transition::None => {}
            Transition::Push(states) => {
                for state in states {
                    if let Err(err) = stack.push(*state) {
                        metrics.dropped_pushes += 1;
                        self.report(&err, self.rules.state_name(*state));
                    }
                }
            }
            Transition::Pop(count) => {
                if let Err(err) = stack.pop(*count) {
                    metrics.stack_underflows += 1;
                    self.report(&err, self.rules.state_name(stack.top()));
                }
            }
            Transition::Replace(state) => stack.replace(*state),
        }
        metrics.record_depth(stack.depth());
    }

    fn report(&self, err: &StackError, state: &str) {
        if self.log_recoveries {
            log_debug!("Recovered state stack condition",
                "code" => err.error_code(),
                "detail" => err,
                "state" => state
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::pattern::{Pattern, RegexPattern};
    use crate::lexical::rule::StateAction;
    use crate::lexical::table::ROOT_STATE;

    fn kinds_and_text(pieces: &[(TokenType, Range<usize>)], text: &str) -> Vec<(TokenType, String)> {
        pieces
            .iter()
            .map(|(kind, range)| (*kind, text[range.clone()].to_string()))
            .collect()
    }

    #[test]
    fn test_by_groups_pieces() {
        let text = "key = value";
        let pattern = RegexPattern::new(r"([^\S\n]*)([:=])([^\S\n]*)").unwrap();
        let matched = pattern.captures(text, 3).unwrap();
        let emission = Emission::by_groups([
            Some(TokenType::Whitespace),
            Some(TokenType::Operator),
            Some(TokenType::Whitespace),
        ]);

        let pieces = emission_pieces(&emission, &matched, text);
        assert_eq!(
            kinds_and_text(&pieces, text),
            vec![
                (TokenType::Whitespace, " ".to_string()),
                (TokenType::Operator, "=".to_string()),
                (TokenType::Whitespace, " ".to_string()),
            ]
        );
    }

    #[test]
    fn test_by_groups_skips_empty_groups_and_fills_gaps() {
        let text = "=x";
        // group 1 is empty, literal `x` sits outside any group
        let pattern = RegexPattern::new(r"([^\S\n]*)(=)x").unwrap();
        let matched = pattern.captures(text, 0).unwrap();
        let emission = Emission::by_groups([Some(TokenType::Whitespace), Some(TokenType::Operator)]);

        let pieces = emission_pieces(&emission, &matched, text);
        assert_eq!(
            kinds_and_text(&pieces, text),
            vec![
                (TokenType::Operator, "=".to_string()),
                (TokenType::Text, "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_none_group_becomes_text() {
        let text = "a-b";
        let pattern = RegexPattern::new(r"(a)(-)(b)").unwrap();
        let matched = pattern.captures(text, 0).unwrap();
        let emission = Emission::by_groups([Some(TokenType::Name), None, Some(TokenType::Name)]);

        let pieces = emission_pieces(&emission, &matched, text);
        assert_eq!(pieces[1], (TokenType::Text, 1..2));
    }

    #[test]
    fn test_callback_overlaps_are_clipped() {
        let text = "abcdef";
        let pattern = RegexPattern::new(r"abcdef").unwrap();
        let matched = pattern.captures(text, 0).unwrap();
        let emission = Emission::callback(|_, _| {
            vec![
                (TokenType::Keyword, 0..4),
                (TokenType::Name, 2..5),
                (TokenType::Number, 9..12),
            ]
        });

        let pieces = emission_pieces(&emission, &matched, text);
        assert_eq!(
            pieces,
            vec![
                (TokenType::Keyword, 0..4),
                (TokenType::Name, 4..5),
                (TokenType::Text, 5..6),
            ]
        );
    }

    #[test]
    fn test_emits_before_transition() {
        let rules = RuleSet::builder("x")
            .state(ROOT_STATE, |s| {
                s.rule_with("=", TokenType::Operator, StateAction::push("value"))
            })
            .state("value", |s| s.rule(".+", TokenType::String))
            .build()
            .unwrap();
        let executor = ActionExecutor::new(&rules, false);
        let rule = &rules.table(rules.root()).rules()[0];

        let mut cursor = Cursor::new("=v", false);
        let mut stack = StateStack::new(rules.root());
        let mut out: Vec<Token> = Vec::new();
        let mut metrics = RunMetrics::default();
        let matched = rule.pattern().captures(cursor.text(), 0).unwrap();

        executor.execute(rule, &matched, &mut cursor, &mut stack, &mut out, &mut metrics);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pair(), (TokenType::Operator, "="));
        assert_eq!(stack.top(), rules.state_id("value").unwrap());
        assert_eq!(cursor.offset(), 1);
        assert_eq!(metrics.max_stack_depth, 2);
    }

    #[test]
    fn test_underflow_is_counted_and_recovered() {
        let rules = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.rule_with(";", TokenType::Punctuation, StateAction::pop()))
            .build()
            .unwrap();
        let executor = ActionExecutor::new(&rules, true);
        let mut stack = StateStack::new(rules.root());
        let mut metrics = RunMetrics::default();

        executor.apply_transition(&Transition::Pop(1), &mut stack, &mut metrics);

        assert_eq!(metrics.stack_underflows, 1);
        assert_eq!(stack.entries(), &[rules.root()]);
    }
}
