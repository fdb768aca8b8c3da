//! Java-style `.properties` files
//!
//! A line is a comment (`#`, `!` or `//`), blank, or a key followed by an
//! optional separator and a value. The separator is the first unescaped
//! `:`, `=` or run of whitespace. A backslash before a newline continues
//! the current key or value on the next line and eats that line's leading
//! whitespace.

use rulelex_core::lexical::{Lexer, LexerInfo, RuleLexer, RuleSet, RuleSetError};
use rulelex_core::{Emission, StateAction, TokenType, ROOT_STATE};

pub const NAME: &str = "Properties";
pub const ALIASES: &[&str] = &["properties", "jproperties"];
pub const FILENAMES: &[&str] = &["*.properties"];
pub const MIMETYPES: &[&str] = &["text/x-java-properties"];

/// Build the rule set: `root` dispatches each line, `key` and `value` run
/// to the end of the line, `escapes` is shared by both through `include`.
pub fn rules() -> Result<RuleSet, RuleSetError> {
    RuleSet::builder(NAME)
        .state(ROOT_STATE, |s| {
            s.rule(r"[!#].*|/{2}.*", TokenType::CommentSingle)
                .rule(r"\n", TokenType::Whitespace)
                .line_start_rule(r"[^\S\n]+", TokenType::Whitespace, StateAction::None)
                .default(StateAction::push("key"))
        })
        .state("key", |s| {
            s.rule(r"[^\\:=\s]+", TokenType::NameAttribute)
                .include("escapes")
                .rule_with(
                    r"([^\S\n]*)([:=])([^\S\n]*)",
                    Emission::by_groups([
                        Some(TokenType::Whitespace),
                        Some(TokenType::Operator),
                        Some(TokenType::Whitespace),
                    ]),
                    StateAction::replace("value"),
                )
                .rule_with(r"[^\S\n]+", TokenType::Whitespace, StateAction::replace("value"))
                // key without a value
                .rule_with(r"\n", TokenType::Whitespace, StateAction::pop())
        })
        .state("value", |s| {
            s.rule(r"[^\\\n]+", TokenType::String)
                .include("escapes")
                .rule_with(r"\n", TokenType::Whitespace, StateAction::pop())
        })
        .state("escapes", |s| {
            s.rule_with(
                r"(\\\n)([^\S\n]*)",
                Emission::by_groups([Some(TokenType::StringEscape), Some(TokenType::Whitespace)]),
                StateAction::None,
            )
            .rule(r"\\(.|\n)", TokenType::StringEscape)
        })
        .build()
}

pub fn info() -> LexerInfo {
    LexerInfo::new(NAME)
        .aliases(ALIASES)
        .filenames(FILENAMES)
        .mimetypes(MIMETYPES)
}

/// Lexer for `.properties` files
#[derive(Debug)]
pub struct PropertiesLexer {
    inner: RuleLexer,
}

impl PropertiesLexer {
    pub fn new() -> Result<Self, RuleSetError> {
        Ok(Self {
            inner: RuleLexer::new(info(), rules()?),
        })
    }
}

impl Lexer for PropertiesLexer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn aliases(&self) -> &[String] {
        self.inner.aliases()
    }

    fn filenames(&self) -> &[String] {
        self.inner.filenames()
    }

    fn mimetypes(&self) -> &[String] {
        self.inner.mimetypes()
    }

    fn rules(&self) -> &RuleSet {
        self.inner.rules()
    }
}
