//! Rules: a pattern, what to emit for it, and how the state stack moves
use super::pattern::{Pattern, PatternMatch};
use crate::tokens::TokenType;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Callback turning a match into classified pieces (absolute byte ranges)
pub type TokenCallback =
    Arc<dyn Fn(&PatternMatch, &str) -> Vec<(TokenType, Range<usize>)> + Send + Sync>;

/// What a rule emits for its matched span
#[derive(Clone)]
pub enum Emission {
    /// The whole match as one token
    Single(TokenType),
    /// One classification per capture group, in group order; `None` groups become `Text`
    ByGroups(Vec<Option<TokenType>>),
    /// Computed pieces; text not covered by any piece becomes `Text`
    Callback(TokenCallback),
    /// No tokens; only valid on zero-width patterns
    Nothing,
}

impl Emission {
    pub fn by_groups<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = Option<TokenType>>,
    {
        Emission::ByGroups(kinds.into_iter().collect())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&PatternMatch, &str) -> Vec<(TokenType, Range<usize>)> + Send + Sync + 'static,
    {
        Emission::Callback(Arc::new(f))
    }
}

impl From<TokenType> for Emission {
    fn from(kind: TokenType) -> Self {
        Emission::Single(kind)
    }
}

impl fmt::Debug for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emission::Single(kind) => f.debug_tuple("Single").field(kind).finish(),
            Emission::ByGroups(kinds) => f.debug_tuple("ByGroups").field(kinds).finish(),
            Emission::Callback(_) => f.write_str("Callback(..)"),
            Emission::Nothing => f.write_str("Nothing"),
        }
    }
}

/// State transition as written by a rule-table author, by state name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateAction {
    #[default]
    None,
    /// Push the named states in order; the last one becomes active
    Push(Vec<String>),
    /// Pop this many entries
    Pop(usize),
    /// Swap the active state for another in one step
    Replace(String),
}

impl StateAction {
    pub fn push(state: &str) -> Self {
        StateAction::Push(vec![state.to_string()])
    }

    pub fn push_all(states: &[&str]) -> Self {
        StateAction::Push(states.iter().map(|s| s.to_string()).collect())
    }

    pub fn pop() -> Self {
        StateAction::Pop(1)
    }

    pub fn replace(state: &str) -> Self {
        StateAction::Replace(state.to_string())
    }

    /// State names this action refers to
    pub fn targets(&self) -> Vec<&str> {
        match self {
            StateAction::Push(states) => states.iter().map(String::as_str).collect(),
            StateAction::Replace(state) => vec![state.as_str()],
            StateAction::None | StateAction::Pop(_) => Vec::new(),
        }
    }
}

/// Index of a state inside a compiled [`RuleSet`](super::table::RuleSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Resolved transition, referring to states by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(Vec<StateId>),
    Pop(usize),
    Replace(StateId),
}

impl Transition {
    pub fn is_none(&self) -> bool {
        matches!(self, Transition::None)
    }
}

/// An immutable compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) pattern: Arc<dyn Pattern>,
    pub(crate) emission: Emission,
    pub(crate) transition: Transition,
    pub(crate) line_start: bool,
    /// State the rule was written in (differs from the owning table for included rules)
    pub(crate) origin: String,
}

impl Rule {
    pub fn pattern(&self) -> &dyn Pattern {
        self.pattern.as_ref()
    }

    pub fn emission(&self) -> &Emission {
        &self.emission
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn has_transition(&self) -> bool {
        !self.transition.is_none()
    }

    /// Rule only fires when the cursor sits at the beginning of a line
    pub fn is_line_start(&self) -> bool {
        self.line_start
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_action_helpers() {
        assert_eq!(StateAction::push("value"), StateAction::Push(vec!["value".into()]));
        assert_eq!(StateAction::pop(), StateAction::Pop(1));
        assert_eq!(
            StateAction::push_all(&["a", "b"]).targets(),
            vec!["a", "b"]
        );
        assert_eq!(StateAction::replace("value").targets(), vec!["value"]);
        assert!(StateAction::Pop(2).targets().is_empty());
        assert_eq!(StateAction::default(), StateAction::None);
    }

    #[test]
    fn test_emission_conversions() {
        assert!(matches!(
            Emission::from(TokenType::Operator),
            Emission::Single(TokenType::Operator)
        ));
        let groups = Emission::by_groups([Some(TokenType::Whitespace), None]);
        assert_eq!(format!("{:?}", groups), "ByGroups([Some(Whitespace), None])");
        let callback = Emission::callback(|m, _| vec![(TokenType::Text, m.range())]);
        assert_eq!(format!("{:?}", callback), "Callback(..)");
    }
}
