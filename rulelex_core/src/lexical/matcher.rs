//! First-match-wins rule selection
use super::cursor::Cursor;
use super::pattern::PatternMatch;
use super::rule::Rule;
use super::table::RuleTable;

/// Try the table's rules in declaration order and return the first that matches at the cursor.
///
/// Line-start rules are skipped away from the beginning of a line. A
/// zero-length match on a rule without a transition would stall the run, so
/// it counts as a miss for that rule.
pub fn find_match<'r>(table: &'r RuleTable, cursor: &Cursor<'_>) -> Option<(&'r Rule, PatternMatch)> {
    let at_line_start = cursor.at_line_start();

    for rule in table.rules() {
        if rule.is_line_start() && !at_line_start {
            continue;
        }

        if let Some(matched) = rule.pattern().captures(cursor.text(), cursor.offset()) {
            if matched.is_empty() && !rule.has_transition() {
                continue;
            }
            return Some((rule, matched));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::rule::StateAction;
    use crate::lexical::table::{RuleSet, ROOT_STATE};
    use crate::tokens::TokenType;

    #[test]
    fn test_earlier_rule_wins_over_longer_match() {
        let rules = RuleSet::builder("priority")
            .state(ROOT_STATE, |s| {
                s.rule("ab", TokenType::Keyword)
                    .rule("abc", TokenType::Name)
            })
            .build()
            .unwrap();

        let cursor = Cursor::new("abc", false);
        let (rule, matched) = find_match(rules.table(rules.root()), &cursor).unwrap();
        assert_eq!(rule.pattern().source(), "ab");
        assert_eq!(matched.range(), 0..2);
    }

    #[test]
    fn test_line_start_rule_only_at_line_start() {
        let rules = RuleSet::builder("bol")
            .state(ROOT_STATE, |s| {
                s.line_start_rule(r"[ ]+", TokenType::Whitespace, StateAction::None)
                    .rule(r"[ ]+", TokenType::Text)
                    .rule(r"x", TokenType::Name)
            })
            .build()
            .unwrap();
        let table = rules.table(rules.root());

        let cursor = Cursor::new("  x  ", false);
        let (rule, _) = find_match(table, &cursor).unwrap();
        assert!(rule.is_line_start());

        let mut cursor = Cursor::new("  x  ", false);
        cursor.emit(TokenType::Whitespace, 3);
        let (rule, _) = find_match(table, &cursor).unwrap();
        assert!(!rule.is_line_start());
    }

    #[test]
    fn test_miss_returns_none() {
        let rules = RuleSet::builder("miss")
            .state(ROOT_STATE, |s| s.rule("a", TokenType::Name))
            .build()
            .unwrap();
        let cursor = Cursor::new("b", false);
        assert!(find_match(rules.table(rules.root()), &cursor).is_none());
    }

    #[test]
    fn test_runtime_empty_match_without_transition_is_skipped() {
        // `\b` cannot match the empty string, so it passes the build check,
        // but it matches with zero width in front of a word
        let rules = RuleSet::builder("empty")
            .state(ROOT_STATE, |s| {
                s.rule(r"\b", TokenType::Punctuation)
                    .rule(r"a", TokenType::Name)
            })
            .build()
            .unwrap();

        let cursor = Cursor::new("a b", false);
        let (rule, matched) = find_match(rules.table(rules.root()), &cursor).unwrap();
        assert_eq!(rule.pattern().source(), "a");
        assert_eq!(matched.len(), 1);
    }
}
