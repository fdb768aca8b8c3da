//! Lexer catalog
//!
//! Built once, then only read. Callers own the catalog and pass it by
//! reference; there is no process-wide registry.

use crate::properties::PropertiesLexer;
use rulelex_core::lexical::{file_name_matches, Lexer, RuleSetError};
use rulelex_core::logging::{codes, Code};
use rulelex_core::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Built-in rule set failed to compile: {0}")]
    RuleSet(#[from] RuleSetError),

    #[error("Lexer name or alias '{name}' is registered twice")]
    DuplicateName { name: String },

    #[error("Lexer '{lexer}' has an invalid filename glob '{glob}': {message}")]
    InvalidFilenameGlob {
        lexer: String,
        glob: String,
        message: String,
    },

    #[error("No lexer named '{name}'")]
    UnknownLexer { name: String },

    #[error("No lexer handles '{path}'")]
    NoLexerForFile { path: String },
}

impl CatalogError {
    pub fn error_code(&self) -> Code {
        match self {
            CatalogError::RuleSet(e) => e.error_code(),
            CatalogError::DuplicateName { .. } | CatalogError::InvalidFilenameGlob { .. } => {
                codes::system::INITIALIZATION_FAILURE
            }
            CatalogError::UnknownLexer { .. } | CatalogError::NoLexerForFile { .. } => {
                codes::input::UNKNOWN_LEXER
            }
        }
    }
}

/// A registered lexer with its filename globs compiled
struct CatalogEntry {
    lexer: Box<dyn Lexer>,
    filenames: Vec<glob::Pattern>,
}

/// Read-only collection of lexers with name and file name lookup
pub struct LexerCatalog {
    entries: Vec<CatalogEntry>,
}

impl LexerCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Catalog holding every lexer this crate ships
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::builder().register(PropertiesLexer::new()?).build()
    }

    /// Case-insensitive lookup by name or alias
    pub fn by_name(&self, name: &str) -> Option<&dyn Lexer> {
        self.iter().find(|lexer| lexer.answers_to(name))
    }

    /// First lexer whose filename globs match the final path component
    pub fn for_filename(&self, path: &Path) -> Option<&dyn Lexer> {
        self.entries
            .iter()
            .find(|entry| {
                entry
                    .filenames
                    .iter()
                    .any(|pattern| file_name_matches(pattern, path))
            })
            .map(|entry| &*entry.lexer)
    }

    /// An explicit name wins; otherwise select by file name
    pub fn resolve(&self, name: Option<&str>, path: &Path) -> Result<&dyn Lexer, CatalogError> {
        match name {
            Some(name) => self.by_name(name).ok_or_else(|| {
                let error = CatalogError::UnknownLexer {
                    name: name.to_string(),
                };
                log_error!(error.error_code(), "Unknown lexer requested", "name" => name);
                error
            }),
            None => self.for_filename(path).ok_or_else(|| {
                let error = CatalogError::NoLexerForFile {
                    path: path.display().to_string(),
                };
                log_error!(error.error_code(), "No lexer for file",
                    "path" => path.display()
                );
                error
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Lexer> {
        self.entries.iter().map(|entry| &*entry.lexer)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|lexer| lexer.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_statistics(&self) -> CatalogStatistics {
        CatalogStatistics {
            lexers: self.len(),
            aliases: self.iter().map(|l| l.aliases().len()).sum(),
            states: self.iter().map(|l| l.rules().state_count()).sum(),
            rules: self.iter().map(|l| l.rules().rule_count()).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStatistics {
    pub lexers: usize,
    pub aliases: usize,
    pub states: usize,
    pub rules: usize,
}

/// Collects lexers, then checks that no name or alias is claimed twice
#[derive(Default)]
pub struct CatalogBuilder {
    lexers: Vec<Box<dyn Lexer>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, lexer: impl Lexer + 'static) -> Self {
        self.lexers.push(Box::new(lexer));
        self
    }

    /// A lexer may repeat its own name among its aliases; a name claimed
    /// by two different lexers is an error.
    pub fn build(self) -> Result<LexerCatalog, CatalogError> {
        let mut claimed: HashSet<String> = HashSet::new();
        let mut entries = Vec::with_capacity(self.lexers.len());

        for lexer in self.lexers {
            let names: BTreeSet<String> = std::iter::once(lexer.name())
                .chain(lexer.aliases().iter().map(String::as_str))
                .map(str::to_ascii_lowercase)
                .collect();
            // names are folded per lexer first, so only other lexers can clash
            for name in names {
                if claimed.contains(&name) {
                    let error = CatalogError::DuplicateName { name };
                    log_error!(error.error_code(), "Duplicate lexer name",
                        "lexer" => lexer.name(),
                        "detail" => &error
                    );
                    return Err(error);
                }
                claimed.insert(name);
            }

            let filenames = compile_filenames(lexer.as_ref())?;
            log_debug!("Lexer registered",
                "name" => lexer.name(),
                "states" => lexer.rules().state_count()
            );
            entries.push(CatalogEntry { lexer, filenames });
        }

        let catalog = LexerCatalog { entries };
        log_success!(codes::success::CATALOG_BUILT, "Lexer catalog built",
            "lexers" => catalog.len()
        );
        Ok(catalog)
    }
}

fn compile_filenames(lexer: &dyn Lexer) -> Result<Vec<glob::Pattern>, CatalogError> {
    lexer
        .filenames()
        .iter()
        .map(|source| {
            glob::Pattern::new(source).map_err(|e| {
                let error = CatalogError::InvalidFilenameGlob {
                    lexer: lexer.name().to_string(),
                    glob: source.clone(),
                    message: e.to_string(),
                };
                log_error!(error.error_code(), "Invalid filename glob", "detail" => &error);
                error
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulelex_core::lexical::{LexerInfo, RuleLexer, RuleSet, ROOT_STATE};
    use rulelex_core::{StateAction, TokenType};

    fn ini_lexer(name: &str, aliases: &[&str]) -> RuleLexer {
        let rules = RuleSet::builder(name)
            .state(ROOT_STATE, |s| {
                s.rule_with(r"\[[^\]\n]*\]", TokenType::Keyword, StateAction::None)
                    .rule(r"[^\[\n]+", TokenType::Text)
                    .rule(r"\n", TokenType::Whitespace)
            })
            .build()
            .unwrap();
        RuleLexer::new(
            LexerInfo::new(name).aliases(aliases).filenames(&["*.ini", "*.cfg"]),
            rules,
        )
    }

    #[test]
    fn test_builtin_lookup_by_name_and_alias() {
        let catalog = LexerCatalog::builtin().unwrap();

        assert_eq!(catalog.names(), vec!["Properties"]);
        assert!(catalog.by_name("properties").is_some());
        assert!(catalog.by_name("JPROPERTIES").is_some());
        assert!(catalog.by_name("yaml").is_none());
    }

    #[test]
    fn test_lookup_by_filename() {
        let catalog = LexerCatalog::builder()
            .register(PropertiesLexer::new().unwrap())
            .register(ini_lexer("INI", &["ini"]))
            .build()
            .unwrap();

        let found = catalog.for_filename(Path::new("/etc/app/settings.cfg")).unwrap();
        assert_eq!(found.name(), "INI");
        let found = catalog.for_filename(Path::new("app.properties")).unwrap();
        assert_eq!(found.name(), "Properties");
        assert!(catalog.for_filename(Path::new("README")).is_none());
    }

    #[test]
    fn test_resolve_prefers_explicit_name() {
        let catalog = LexerCatalog::builder()
            .register(PropertiesLexer::new().unwrap())
            .register(ini_lexer("INI", &["ini"]))
            .build()
            .unwrap();

        let lexer = catalog.resolve(Some("ini"), Path::new("app.properties")).unwrap();
        assert_eq!(lexer.name(), "INI");

        let err = catalog
            .resolve(Some("toml"), Path::new("app.properties"))
            .err()
            .unwrap();
        assert!(matches!(err, CatalogError::UnknownLexer { .. }));
        assert_eq!(err.error_code(), codes::input::UNKNOWN_LEXER);

        let result = catalog.resolve(None, Path::new("data.bin"));
        assert!(matches!(result, Err(CatalogError::NoLexerForFile { .. })));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = LexerCatalog::builder()
            .register(PropertiesLexer::new().unwrap())
            .register(ini_lexer("Java Properties", &["JProperties"]))
            .build();

        assert!(matches!(result, Err(CatalogError::DuplicateName { ref name }) if name == "jproperties"));
    }

    #[test]
    fn test_builtin_catalog_builds() {
        assert!(LexerCatalog::builtin().is_ok());
    }

    #[test]
    fn test_own_name_repeated_as_alias_is_allowed() {
        let catalog = LexerCatalog::builder()
            .register(ini_lexer("INI", &["ini", "Ini", "cfg"]))
            .build()
            .unwrap();
        assert_eq!(catalog.names(), vec!["INI"]);
        assert!(catalog.by_name("cfg").is_some());
    }

    #[test]
    fn test_name_clashing_with_other_lexers_alias_rejected() {
        let result = LexerCatalog::builder()
            .register(ini_lexer("INI", &["conf"]))
            .register(ini_lexer("Conf", &[]))
            .build();

        assert!(matches!(result, Err(CatalogError::DuplicateName { ref name }) if name == "conf"));
    }

    #[test]
    fn test_invalid_filename_glob_rejected() {
        let rules = RuleSet::builder("broken")
            .state(ROOT_STATE, |s| s.rule(r"[^\n]+", TokenType::Text))
            .build()
            .unwrap();
        let result = LexerCatalog::builder()
            .register(RuleLexer::new(LexerInfo::new("Broken").filenames(&["[*.txt"]), rules))
            .build();

        let err = result.err().unwrap();
        assert!(matches!(err, CatalogError::InvalidFilenameGlob { ref glob, .. } if glob == "[*.txt"));
        assert_eq!(err.error_code(), codes::system::INITIALIZATION_FAILURE);
    }

    #[test]
    fn test_statistics() {
        let catalog = LexerCatalog::builtin().unwrap();
        let stats = catalog.get_statistics();

        assert_eq!(stats.lexers, 1);
        assert_eq!(stats.aliases, 2);
        assert_eq!(stats.states, 4);
        assert!(stats.rules >= 11);
    }

    #[test]
    fn test_catalog_lexers_tokenize() {
        let catalog = LexerCatalog::builtin().unwrap();
        let lexer = catalog.by_name("properties").unwrap();
        let text: String = lexer.get_tokens("a=b\n").map(|t| t.text).collect();
        assert_eq!(text, "a=b\n");
    }
}
