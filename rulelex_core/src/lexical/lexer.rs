//! Lexer trait and the rule-table backed implementation
use super::table::RuleSet;
use crate::config::runtime::TokenizerPreferences;
use crate::tokens::TokenStream;
use std::path::Path;

// ============================================================================
// Lexer Trait
// ============================================================================

/// A named rule set plus the metadata a catalog uses to select it
pub trait Lexer: Send + Sync {
    /// Human readable name, e.g. `Properties`
    fn name(&self) -> &str;

    /// Short lookup names
    fn aliases(&self) -> &[String];

    /// File name globs this lexer handles, e.g. `*.properties`
    fn filenames(&self) -> &[String];

    fn mimetypes(&self) -> &[String];

    /// Compiled rules driving this lexer
    fn rules(&self) -> &RuleSet;

    /// Tokenize with preferences taken from the environment
    fn get_tokens<'a>(&self, text: &'a str) -> TokenStream<'_, 'a> {
        self.get_tokens_with(text, TokenizerPreferences::default())
    }

    fn get_tokens_with<'a>(
        &self,
        text: &'a str,
        preferences: TokenizerPreferences,
    ) -> TokenStream<'_, 'a> {
        TokenStream::new(self.rules(), text, preferences)
    }

    /// Whether `name` is this lexer's name or one of its aliases (case-insensitive)
    fn answers_to(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
            || self.aliases().iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    /// Whether the final component of `path` matches one of the filename
    /// globs. Globs that fail to compile never match.
    fn handles_file(&self, path: &Path) -> bool {
        self.filenames()
            .iter()
            .filter_map(|source| glob::Pattern::new(source).ok())
            .any(|pattern| file_name_matches(&pattern, path))
    }
}

/// Match a compiled filename glob against the final component of `path`
pub fn file_name_matches(pattern: &glob::Pattern, path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| pattern.matches(name))
}

// ============================================================================
// Rule-table Lexer
// ============================================================================

/// Lexer metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub filenames: Vec<String>,
    pub mimetypes: Vec<String>,
}

impl LexerInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn filenames(mut self, filenames: &[&str]) -> Self {
        self.filenames = filenames.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn mimetypes(mut self, mimetypes: &[&str]) -> Self {
        self.mimetypes = mimetypes.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A lexer that is nothing more than metadata and a compiled rule set
#[derive(Debug)]
pub struct RuleLexer {
    info: LexerInfo,
    rules: RuleSet,
}

impl RuleLexer {
    pub fn new(info: LexerInfo, rules: RuleSet) -> Self {
        Self { info, rules }
    }

    pub fn info(&self) -> &LexerInfo {
        &self.info
    }
}

impl Lexer for RuleLexer {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn aliases(&self) -> &[String] {
        &self.info.aliases
    }

    fn filenames(&self) -> &[String] {
        &self.info.filenames
    }

    fn mimetypes(&self) -> &[String] {
        &self.info.mimetypes
    }

    fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
