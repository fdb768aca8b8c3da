//! The atomic output unit of a tokenization run
use super::classification::TokenType;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified, non-empty slice of the input with its source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenType, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The (classification, text) pair consumed by renderers
    pub fn pair(&self) -> (TokenType, &str) {
        (self.kind, self.text.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }

    /// Whitespace and comments
    pub fn is_trivia(&self) -> bool {
        self.kind.is_whitespace() || self.kind.is_comment()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @ {}", self.kind, self.text, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_pair_and_display() {
        let start = Position::start();
        let token = Token::new(
            TokenType::NameAttribute,
            "key",
            Span::new(start, start.advance_str("key")),
        );

        assert_eq!(token.pair(), (TokenType::NameAttribute, "key"));
        assert_eq!(token.to_string(), "Token.Name.Attribute \"key\" @ 1:1-4");
        assert!(!token.is_trivia());
        assert!(!token.is_error());
    }

    #[test]
    fn test_json_shape() {
        let start = Position::start();
        let token = Token::new(TokenType::Whitespace, "\n", Span::new(start, start.advance('\n')));
        let value = serde_json::to_value(&token).unwrap();

        assert_eq!(value["kind"], "Text.Whitespace");
        assert_eq!(value["text"], "\n");
        assert_eq!(value["span"]["end"]["line"], 2);
        assert!(token.is_trivia());
    }
}
