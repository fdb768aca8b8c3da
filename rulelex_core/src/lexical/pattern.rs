//! Swappable pattern matchers
//!
//! A [`Pattern`] answers one question: does it match *at* a given offset, and
//! if so, how long is the match and where are its capture groups. The engine
//! never searches ahead, so every implementation is anchored at the cursor.

use regex_automata::meta::{BuildError, Regex};
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input};
use std::fmt;
use std::ops::Range;

/// Result of a successful anchored match, in absolute byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Group 0 is the whole match; unmatched optional groups are `None`
    groups: Vec<Option<Range<usize>>>,
}

impl PatternMatch {
    /// A match with no capture groups
    pub fn whole(range: Range<usize>) -> Self {
        Self {
            groups: vec![Some(range)],
        }
    }

    /// A match with explicit groups; `groups[0]` must be the whole match
    pub fn with_groups(groups: Vec<Option<Range<usize>>>) -> Self {
        debug_assert!(matches!(groups.first(), Some(Some(_))));
        Self { groups }
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    pub fn range(&self) -> Range<usize> {
        self.groups
            .first()
            .cloned()
            .flatten()
            .unwrap_or(0..0)
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capture group by index (0 = whole match)
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        self.groups.get(index).cloned().flatten()
    }

    /// Number of capture groups, excluding the whole match
    pub fn group_count(&self) -> usize {
        self.groups.len().saturating_sub(1)
    }

    /// Matched text, empty when the range does not fall on char boundaries
    pub fn text<'a>(&self, haystack: &'a str) -> &'a str {
        haystack.get(self.range()).unwrap_or_default()
    }
}

/// Anchored matcher capability used by rules
pub trait Pattern: fmt::Debug + Send + Sync {
    /// Full match information at `offset`, or `None` when the pattern does not match there
    fn captures(&self, haystack: &str, offset: usize) -> Option<PatternMatch>;

    /// Matched length at `offset`
    fn find(&self, haystack: &str, offset: usize) -> Option<usize> {
        self.captures(haystack, offset).map(|m| m.len())
    }

    /// Whether the pattern can succeed without consuming input
    fn matches_empty(&self) -> bool;

    /// Whether the pattern never consumes input
    fn is_zero_width(&self) -> bool {
        false
    }

    /// Human-readable source, used in diagnostics
    fn source(&self) -> &str;
}

// ============================================================================
// REGEX PATTERN
// ============================================================================

/// Regular-expression pattern, compiled in multi-line mode and anchored at the cursor.
///
/// The search always sees the whole haystack, so `^`, `$`, `\b` and `\B`
/// are judged against the real surrounding text rather than the cursor.
pub struct RegexPattern {
    source: String,
    regex: Regex,
}

impl RegexPattern {
    pub fn new(source: &str) -> Result<Self, BuildError> {
        let regex = Regex::builder()
            .syntax(syntax::Config::new().multi_line(true))
            .build(source)?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    fn input_at<'h>(haystack: &'h str, offset: usize) -> Option<Input<'h>> {
        if offset > haystack.len() || !haystack.is_char_boundary(offset) {
            return None;
        }
        Some(
            Input::new(haystack)
                .range(offset..)
                .anchored(Anchored::Yes),
        )
    }
}

impl Pattern for RegexPattern {
    fn captures(&self, haystack: &str, offset: usize) -> Option<PatternMatch> {
        let input = Self::input_at(haystack, offset)?;
        let mut caps = self.regex.create_captures();
        self.regex.search_captures(&input, &mut caps);
        if !caps.is_match() {
            return None;
        }
        let groups = (0..caps.group_len())
            .map(|index| caps.get_group(index).map(|span| span.range()))
            .collect();
        Some(PatternMatch::with_groups(groups))
    }

    fn find(&self, haystack: &str, offset: usize) -> Option<usize> {
        let input = Self::input_at(haystack, offset)?;
        self.regex.search(&input).map(|m| m.len())
    }

    fn matches_empty(&self) -> bool {
        self.regex.is_match("")
    }

    fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegexPattern").field(&self.source).finish()
    }
}

// ============================================================================
// LITERAL PATTERN
// ============================================================================

/// Exact string match
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    literal: String,
}

impl LiteralPattern {
    pub fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
        }
    }
}

impl Pattern for LiteralPattern {
    fn captures(&self, haystack: &str, offset: usize) -> Option<PatternMatch> {
        let rest = haystack.get(offset..)?;
        if rest.starts_with(&self.literal) {
            Some(PatternMatch::whole(offset..offset + self.literal.len()))
        } else {
            None
        }
    }

    fn matches_empty(&self) -> bool {
        self.literal.is_empty()
    }

    fn is_zero_width(&self) -> bool {
        self.literal.is_empty()
    }

    fn source(&self) -> &str {
        &self.literal
    }
}

// ============================================================================
// EMPTY PATTERN
// ============================================================================

/// Always matches, consuming nothing. Backs default transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPattern;

impl Pattern for EmptyPattern {
    fn captures(&self, haystack: &str, offset: usize) -> Option<PatternMatch> {
        if offset <= haystack.len() {
            Some(PatternMatch::whole(offset..offset))
        } else {
            None
        }
    }

    fn matches_empty(&self) -> bool {
        true
    }

    fn is_zero_width(&self) -> bool {
        true
    }

    fn source(&self) -> &str {
        ""
    }
}
