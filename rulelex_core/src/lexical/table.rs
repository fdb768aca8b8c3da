//! Rule tables, rule sets, and the validating builder
//!
//! A [`RuleSet`] is the compiled, immutable form of a lexer definition: one
//! [`RuleTable`] per named state, includes already spliced in, transition
//! targets resolved to [`StateId`]s. It is `Send + Sync` and can be shared by
//! any number of concurrent tokenization runs.

use super::error::RuleSetError;
use super::pattern::{EmptyPattern, LiteralPattern, Pattern, RegexPattern};
use super::rule::{Emission, Rule, StateAction, StateId, Transition};
use crate::config::compile_time::rule_set::*;
use crate::logging::codes;
use crate::tokens::TokenType;
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the state every run starts in
pub const ROOT_STATE: &str = "root";

// ============================================================================
// COMPILED FORM
// ============================================================================

/// Ordered rules of one state; earlier rules win
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Immutable collection of named rule tables
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    tables: Vec<RuleTable>,
    index: HashMap<String, StateId>,
    root: StateId,
}

impl RuleSet {
    pub fn builder(name: &str) -> RuleSetBuilder {
        RuleSetBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn state_name(&self, id: StateId) -> &str {
        self.tables
            .get(id.0)
            .map(|table| table.name.as_str())
            .unwrap_or(ROOT_STATE)
    }

    pub fn table(&self, id: StateId) -> &RuleTable {
        // ids are only handed out by this set, so the index is in range
        &self.tables[id.0]
    }

    pub fn tables(&self) -> impl Iterator<Item = &RuleTable> {
        self.tables.iter()
    }

    pub fn state_count(&self) -> usize {
        self.tables.len()
    }

    pub fn rule_count(&self) -> usize {
        self.tables.iter().map(RuleTable::len).sum()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

#[derive(Clone)]
enum PatternSpec {
    Regex(String),
    Literal(String),
    Empty,
    Custom(Arc<dyn Pattern>),
}

impl PatternSpec {
    fn source(&self) -> &str {
        match self {
            PatternSpec::Regex(src) | PatternSpec::Literal(src) => src,
            PatternSpec::Empty => "",
            PatternSpec::Custom(pattern) => pattern.source(),
        }
    }
}

#[derive(Clone)]
struct RuleSpec {
    pattern: PatternSpec,
    emission: Emission,
    action: StateAction,
    line_start: bool,
}

#[derive(Clone)]
enum Entry {
    Rule(RuleSpec),
    Include(String),
}

/// Collects the rules of one state; obtained through [`RuleSetBuilder::state`]
pub struct StateBuilder {
    entries: Vec<Entry>,
}

impl StateBuilder {
    /// Regex rule emitting one token, no transition
    pub fn rule(self, pattern: &str, kind: TokenType) -> Self {
        self.rule_with(pattern, kind, StateAction::None)
    }

    /// Regex rule with explicit emission and transition
    pub fn rule_with(self, pattern: &str, emission: impl Into<Emission>, action: StateAction) -> Self {
        self.push_rule(PatternSpec::Regex(pattern.to_string()), emission.into(), action, false)
    }

    /// Regex rule that only fires at the beginning of a line
    pub fn line_start_rule(
        self,
        pattern: &str,
        emission: impl Into<Emission>,
        action: StateAction,
    ) -> Self {
        self.push_rule(PatternSpec::Regex(pattern.to_string()), emission.into(), action, true)
    }

    /// Exact-text rule
    pub fn literal(self, text: &str, emission: impl Into<Emission>, action: StateAction) -> Self {
        self.push_rule(PatternSpec::Literal(text.to_string()), emission.into(), action, false)
    }

    /// Rule backed by a caller-supplied matcher
    pub fn pattern_rule(
        self,
        pattern: Arc<dyn Pattern>,
        emission: impl Into<Emission>,
        action: StateAction,
    ) -> Self {
        self.push_rule(PatternSpec::Custom(pattern), emission.into(), action, false)
    }

    /// Splice another state's rules in at this position
    pub fn include(mut self, state: &str) -> Self {
        self.entries.push(Entry::Include(state.to_string()));
        self
    }

    /// Zero-width transition taken when nothing earlier matched
    pub fn default(self, action: StateAction) -> Self {
        self.push_rule(PatternSpec::Empty, Emission::Nothing, action, false)
    }

    fn push_rule(
        mut self,
        pattern: PatternSpec,
        emission: Emission,
        action: StateAction,
        line_start: bool,
    ) -> Self {
        self.entries.push(Entry::Rule(RuleSpec {
            pattern,
            emission,
            action,
            line_start,
        }));
        self
    }
}

/// Declarative rule-set definition, validated by [`RuleSetBuilder::build`]
pub struct RuleSetBuilder {
    name: String,
    states: Vec<(String, Vec<Entry>)>,
}

impl RuleSetBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            states: Vec::new(),
        }
    }

    pub fn state<F>(mut self, name: &str, define: F) -> Self
    where
        F: FnOnce(StateBuilder) -> StateBuilder,
    {
        let state = define(StateBuilder {
            entries: Vec::new(),
        });
        self.states.push((name.to_string(), state.entries));
        self
    }

    /// Validate the definition and compile every pattern
    pub fn build(self) -> Result<RuleSet, RuleSetError> {
        let name = self.name.clone();
        match self.compile() {
            Ok(rule_set) => {
                log_success!(
                    codes::success::RULE_SET_COMPILED,
                    "Rule set compiled",
                    "rule_set" => rule_set.name(),
                    "states" => rule_set.state_count(),
                    "rules" => rule_set.rule_count()
                );
                Ok(rule_set)
            }
            Err(err) => {
                log_error!(
                    err.error_code(),
                    &err.to_string(),
                    "rule_set" => name.as_str()
                );
                Err(err)
            }
        }
    }

    fn compile(self) -> Result<RuleSet, RuleSetError> {
        if self.states.len() > MAX_STATES {
            return Err(RuleSetError::TooManyStates {
                count: self.states.len(),
            });
        }

        let mut index = HashMap::new();
        for (position, (state, _)) in self.states.iter().enumerate() {
            if index.insert(state.clone(), StateId(position)).is_some() {
                return Err(RuleSetError::DuplicateState {
                    state: state.clone(),
                });
            }
        }

        let root = index
            .get(ROOT_STATE)
            .copied()
            .ok_or_else(|| RuleSetError::MissingRootState {
                rule_set: self.name.clone(),
            })?;

        let definitions: HashMap<&str, &[Entry]> = self
            .states
            .iter()
            .map(|(state, entries)| (state.as_str(), entries.as_slice()))
            .collect();

        let mut compiler = PatternCache::default();
        let mut tables = Vec::with_capacity(self.states.len());

        for (state, _) in &self.states {
            let mut specs = Vec::new();
            let mut chain = vec![state.clone()];
            expand_includes(state, &definitions, &mut chain, &mut specs)?;

            if specs.len() > MAX_RULES_PER_STATE {
                return Err(RuleSetError::TooManyRules {
                    state: state.clone(),
                    count: specs.len(),
                });
            }

            let mut rules = Vec::with_capacity(specs.len());
            for (origin, spec) in specs {
                rules.push(compile_rule(&origin, spec, &index, &mut compiler)?);
            }

            log_debug!("State compiled",
                "state" => state.as_str(),
                "rules" => rules.len()
            );

            tables.push(RuleTable {
                name: state.clone(),
                rules,
            });
        }

        Ok(RuleSet {
            name: self.name,
            tables,
            index,
            root,
        })
    }
}

/// Flatten a state's entries, splicing includes depth-first.
/// `chain` holds the include path from the state being compiled.
fn expand_includes(
    state: &str,
    definitions: &HashMap<&str, &[Entry]>,
    chain: &mut Vec<String>,
    out: &mut Vec<(String, RuleSpec)>,
) -> Result<(), RuleSetError> {
    let entries = definitions.get(state).copied().unwrap_or(&[]);

    for entry in entries {
        match entry {
            Entry::Rule(spec) => out.push((state.to_string(), spec.clone())),
            Entry::Include(target) => {
                if !definitions.contains_key(target.as_str()) {
                    return Err(RuleSetError::UnknownInclude {
                        state: state.to_string(),
                        target: target.clone(),
                    });
                }
                if chain.iter().any(|s| s == target) {
                    let mut cycle = chain.clone();
                    cycle.push(target.clone());
                    return Err(RuleSetError::IncludeCycle { chain: cycle });
                }
                if chain.len() > MAX_INCLUDE_DEPTH {
                    return Err(RuleSetError::IncludeTooDeep {
                        state: chain[0].clone(),
                    });
                }

                chain.push(target.clone());
                expand_includes(target, definitions, chain, out)?;
                chain.pop();
            }
        }
    }

    Ok(())
}

fn compile_rule(
    origin: &str,
    spec: RuleSpec,
    index: &HashMap<String, StateId>,
    cache: &mut PatternCache,
) -> Result<Rule, RuleSetError> {
    let source = spec.pattern.source().to_string();
    if source.len() > MAX_PATTERN_LENGTH {
        return Err(RuleSetError::PatternTooLong {
            state: origin.to_string(),
            length: source.len(),
        });
    }

    let pattern = cache.compile(origin, &spec.pattern)?;
    let transition = resolve_action(origin, &spec.action, index)?;

    if pattern.matches_empty() && transition.is_none() {
        return Err(RuleSetError::EmptyMatchWithoutTransition {
            state: origin.to_string(),
            pattern: source,
        });
    }

    if matches!(spec.emission, Emission::Nothing) && !pattern.is_zero_width() {
        return Err(RuleSetError::SilentRuleConsumes {
            state: origin.to_string(),
            pattern: source,
        });
    }

    Ok(Rule {
        pattern,
        emission: spec.emission,
        transition,
        line_start: spec.line_start,
        origin: origin.to_string(),
    })
}

fn resolve_action(
    origin: &str,
    action: &StateAction,
    index: &HashMap<String, StateId>,
) -> Result<Transition, RuleSetError> {
    let lookup = |target: &str| {
        index
            .get(target)
            .copied()
            .ok_or_else(|| RuleSetError::UndefinedState {
                state: origin.to_string(),
                target: target.to_string(),
            })
    };

    Ok(match action {
        StateAction::None | StateAction::Pop(0) => Transition::None,
        StateAction::Push(targets) if targets.is_empty() => Transition::None,
        StateAction::Push(targets) => Transition::Push(
            targets
                .iter()
                .map(|target| lookup(target))
                .collect::<Result<_, _>>()?,
        ),
        StateAction::Pop(count) => Transition::Pop(*count),
        StateAction::Replace(target) => Transition::Replace(lookup(target)?),
    })
}

/// Compiles each distinct regex once, so included rules share their matcher
#[derive(Default)]
struct PatternCache {
    regexes: HashMap<String, Arc<dyn Pattern>>,
}

impl PatternCache {
    fn compile(&mut self, origin: &str, spec: &PatternSpec) -> Result<Arc<dyn Pattern>, RuleSetError> {
        match spec {
            PatternSpec::Regex(source) => {
                if let Some(existing) = self.regexes.get(source) {
                    return Ok(Arc::clone(existing));
                }
                let compiled: Arc<dyn Pattern> =
                    Arc::new(RegexPattern::new(source).map_err(|e| {
                        RuleSetError::InvalidPattern {
                            state: origin.to_string(),
                            pattern: source.clone(),
                            message: e.to_string(),
                        }
                    })?);
                self.regexes.insert(source.clone(), Arc::clone(&compiled));
                Ok(compiled)
            }
            PatternSpec::Literal(text) => Ok(Arc::new(LiteralPattern::new(text))),
            PatternSpec::Empty => Ok(Arc::new(EmptyPattern)),
            PatternSpec::Custom(pattern) => Ok(Arc::clone(pattern)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn minimal() -> RuleSetBuilder {
        RuleSet::builder("test").state(ROOT_STATE, |s| s.rule(r"\w+", TokenType::Name))
    }

    #[test]
    fn test_build_minimal() {
        let rules = minimal().build().unwrap();
        assert_eq!(rules.name(), "test");
        assert_eq!(rules.state_count(), 1);
        assert_eq!(rules.rule_count(), 1);
        assert_eq!(rules.state_name(rules.root()), "root");
        assert_eq!(rules.state_id("root"), Some(rules.root()));
    }

    #[test]
    fn test_missing_root() {
        let result = RuleSet::builder("x")
            .state("key", |s| s.rule("a", TokenType::Name))
            .build();
        assert_matches!(result, Err(RuleSetError::MissingRootState { .. }));
    }

    #[test]
    fn test_duplicate_state() {
        let result = minimal()
            .state(ROOT_STATE, |s| s.rule("b", TokenType::Name))
            .build();
        assert_matches!(result, Err(RuleSetError::DuplicateState { state }) if state == "root");
    }

    #[test]
    fn test_undefined_transition_target() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| {
                s.rule_with("=", TokenType::Operator, StateAction::push("value"))
            })
            .build();
        assert_matches!(
            result,
            Err(RuleSetError::UndefinedState { state, target }) if state == "root" && target == "value"
        );
    }

    #[test]
    fn test_zero_length_without_transition_rejected() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.rule(r"\s*", TokenType::Whitespace))
            .build();
        assert_matches!(result, Err(RuleSetError::EmptyMatchWithoutTransition { .. }));
    }

    #[test]
    fn test_zero_length_with_transition_allowed() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.default(StateAction::push("key")))
            .state("key", |s| {
                s.rule(r"\w+", TokenType::NameAttribute)
                    .rule_with(r"\s*", TokenType::Whitespace, StateAction::pop())
            })
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_silent_rule_on_consuming_pattern_rejected() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| {
                s.rule_with("a", Emission::Nothing, StateAction::Pop(1))
            })
            .build();
        assert_matches!(result, Err(RuleSetError::SilentRuleConsumes { .. }));
    }

    #[test]
    fn test_invalid_regex() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.rule("(open", TokenType::Text))
            .build();
        assert_matches!(result, Err(RuleSetError::InvalidPattern { pattern, .. }) if pattern == "(open");
    }

    #[test]
    fn test_pattern_too_long() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.rule(&long, TokenType::Text))
            .build();
        assert_matches!(result, Err(RuleSetError::PatternTooLong { .. }));
    }

    #[test]
    fn test_include_splices_rules_in_place() {
        let rules = RuleSet::builder("x")
            .state(ROOT_STATE, |s| {
                s.rule("a", TokenType::Name)
                    .include("common")
                    .rule("c", TokenType::Name)
            })
            .state("common", |s| {
                s.rule("b1", TokenType::Operator)
                    .rule("b2", TokenType::Operator)
            })
            .build()
            .unwrap();

        let root = rules.table(rules.root());
        let sources: Vec<_> = root.rules().iter().map(|r| r.pattern().source()).collect();
        assert_eq!(sources, vec!["a", "b1", "b2", "c"]);
        assert_eq!(root.rules()[1].origin(), "common");
        assert_eq!(rules.rule_count(), 6);
    }

    #[test]
    fn test_included_rules_share_compiled_patterns() {
        let rules = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.include("common"))
            .state("other", |s| s.include("common"))
            .state("common", |s| s.rule("b", TokenType::Operator))
            .build()
            .unwrap();

        let a = &rules.table(rules.root()).rules()[0].pattern;
        let b = &rules.table(rules.state_id("other").unwrap()).rules()[0].pattern;
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_unknown_include() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.include("escapes"))
            .build();
        assert_matches!(result, Err(RuleSetError::UnknownInclude { target, .. }) if target == "escapes");
    }

    #[test]
    fn test_include_cycle() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.include("a"))
            .state("a", |s| s.rule("x", TokenType::Text).include("b"))
            .state("b", |s| s.include("a"))
            .build();
        assert_matches!(
            result,
            Err(RuleSetError::IncludeCycle { chain }) if chain == vec!["root", "a", "b", "a"]
        );
    }

    #[test]
    fn test_self_include_is_a_cycle() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.rule("x", TokenType::Text).include("root"))
            .build();
        assert_matches!(result, Err(RuleSetError::IncludeCycle { .. }));
    }

    #[test]
    fn test_too_many_rules() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |mut s| {
                for i in 0..=MAX_RULES_PER_STATE {
                    s = s.literal(&format!("k{}", i), TokenType::Keyword, StateAction::None);
                }
                s
            })
            .build();
        assert_matches!(result, Err(RuleSetError::TooManyRules { .. }));
    }

    #[test]
    fn test_pop_zero_is_no_transition() {
        let result = RuleSet::builder("x")
            .state(ROOT_STATE, |s| s.default(StateAction::Pop(0)))
            .build();
        assert_matches!(result, Err(RuleSetError::EmptyMatchWithoutTransition { .. }));
    }

    #[test]
    fn test_rule_set_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleSet>();
    }
}
