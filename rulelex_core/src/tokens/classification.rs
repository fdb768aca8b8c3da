//! Hierarchical token classification
//!
//! Every token carries one [`TokenType`]. Types form a tree rooted at
//! [`TokenType::Token`]; a consumer interested in all string literals can match
//! on `Literal.String` with [`TokenType::is_subtype_of`] and catch escapes,
//! single-quoted strings and every other child.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! define_token_types {
    ($( $variant:ident => $path:literal, parent = $parent:ident; )*) => {
        /// Classification tag assigned to every emitted token
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenType {
            /// Root of the hierarchy
            Token,
            $( $variant, )*
        }

        impl TokenType {
            /// Every classification, root first, parents before children
            pub const ALL: &'static [TokenType] = &[TokenType::Token, $( TokenType::$variant, )*];

            /// Dotted path below the root, e.g. `Literal.String.Escape`.
            /// The root renders as an empty path.
            pub fn path(&self) -> &'static str {
                match self {
                    TokenType::Token => "",
                    $( TokenType::$variant => $path, )*
                }
            }

            /// Declared parent; `None` only for the root
            pub fn parent(&self) -> Option<TokenType> {
                match self {
                    TokenType::Token => None,
                    $( TokenType::$variant => Some(TokenType::$parent), )*
                }
            }
        }
    };
}

define_token_types! {
    Text => "Text", parent = Token;
    Whitespace => "Text.Whitespace", parent = Text;
    Escape => "Escape", parent = Token;
    Error => "Error", parent = Token;
    Other => "Other", parent = Token;

    Keyword => "Keyword", parent = Token;
    KeywordConstant => "Keyword.Constant", parent = Keyword;
    KeywordDeclaration => "Keyword.Declaration", parent = Keyword;
    KeywordNamespace => "Keyword.Namespace", parent = Keyword;
    KeywordPseudo => "Keyword.Pseudo", parent = Keyword;
    KeywordReserved => "Keyword.Reserved", parent = Keyword;
    KeywordType => "Keyword.Type", parent = Keyword;

    Name => "Name", parent = Token;
    NameAttribute => "Name.Attribute", parent = Name;
    NameBuiltin => "Name.Builtin", parent = Name;
    NameBuiltinPseudo => "Name.Builtin.Pseudo", parent = NameBuiltin;
    NameClass => "Name.Class", parent = Name;
    NameConstant => "Name.Constant", parent = Name;
    NameDecorator => "Name.Decorator", parent = Name;
    NameEntity => "Name.Entity", parent = Name;
    NameException => "Name.Exception", parent = Name;
    NameFunction => "Name.Function", parent = Name;
    NameLabel => "Name.Label", parent = Name;
    NameNamespace => "Name.Namespace", parent = Name;
    NameTag => "Name.Tag", parent = Name;
    NameVariable => "Name.Variable", parent = Name;

    Literal => "Literal", parent = Token;
    LiteralDate => "Literal.Date", parent = Literal;
    String => "Literal.String", parent = Literal;
    StringAffix => "Literal.String.Affix", parent = String;
    StringBacktick => "Literal.String.Backtick", parent = String;
    StringChar => "Literal.String.Char", parent = String;
    StringDelimiter => "Literal.String.Delimiter", parent = String;
    StringDoc => "Literal.String.Doc", parent = String;
    StringDouble => "Literal.String.Double", parent = String;
    StringEscape => "Literal.String.Escape", parent = String;
    StringHeredoc => "Literal.String.Heredoc", parent = String;
    StringInterpol => "Literal.String.Interpol", parent = String;
    StringOther => "Literal.String.Other", parent = String;
    StringRegex => "Literal.String.Regex", parent = String;
    StringSingle => "Literal.String.Single", parent = String;
    StringSymbol => "Literal.String.Symbol", parent = String;
    Number => "Literal.Number", parent = Literal;
    NumberBin => "Literal.Number.Bin", parent = Number;
    NumberFloat => "Literal.Number.Float", parent = Number;
    NumberHex => "Literal.Number.Hex", parent = Number;
    NumberInteger => "Literal.Number.Integer", parent = Number;
    NumberOct => "Literal.Number.Oct", parent = Number;

    Operator => "Operator", parent = Token;
    OperatorWord => "Operator.Word", parent = Operator;
    Punctuation => "Punctuation", parent = Token;

    Comment => "Comment", parent = Token;
    CommentHashbang => "Comment.Hashbang", parent = Comment;
    CommentMultiline => "Comment.Multiline", parent = Comment;
    CommentPreproc => "Comment.Preproc", parent = Comment;
    CommentSingle => "Comment.Single", parent = Comment;
    CommentSpecial => "Comment.Special", parent = Comment;

    Generic => "Generic", parent = Token;
    GenericDeleted => "Generic.Deleted", parent = Generic;
    GenericEmph => "Generic.Emph", parent = Generic;
    GenericError => "Generic.Error", parent = Generic;
    GenericHeading => "Generic.Heading", parent = Generic;
    GenericInserted => "Generic.Inserted", parent = Generic;
    GenericOutput => "Generic.Output", parent = Generic;
    GenericPrompt => "Generic.Prompt", parent = Generic;
    GenericStrong => "Generic.Strong", parent = Generic;
    GenericSubheading => "Generic.Subheading", parent = Generic;
    GenericTraceback => "Generic.Traceback", parent = Generic;
}

impl TokenType {
    /// Reflexive "is-a" test: true when `ancestor` is this type or one of its parents
    pub fn is_subtype_of(&self, ancestor: TokenType) -> bool {
        let mut current = Some(*self);
        while let Some(ty) = current {
            if ty == ancestor {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    /// Number of edges between this type and the root
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Iterate over the parents of this type, nearest first, ending at the root
    pub fn ancestors(&self) -> impl Iterator<Item = TokenType> {
        std::iter::successors(self.parent(), |ty| ty.parent())
    }

    /// Last path segment (`Escape` for `Literal.String.Escape`)
    pub fn short_name(&self) -> &'static str {
        match self {
            TokenType::Token => "Token",
            other => other.path().rsplit('.').next().unwrap_or(""),
        }
    }

    /// Parse a dotted path, with or without the leading `Token.` segment
    pub fn from_path(path: &str) -> Option<TokenType> {
        let trimmed = path.trim();
        if trimmed == "Token" || trimmed.is_empty() {
            return Some(TokenType::Token);
        }
        let relative = trimmed.strip_prefix("Token.").unwrap_or(trimmed);
        Self::ALL.iter().copied().find(|ty| ty.path() == relative)
    }

    /// Whitespace-only classification
    pub fn is_whitespace(&self) -> bool {
        self.is_subtype_of(TokenType::Whitespace)
    }

    /// Comment classification at any depth
    pub fn is_comment(&self) -> bool {
        self.is_subtype_of(TokenType::Comment)
    }

    /// Error classification emitted by the fallback rule
    pub fn is_error(&self) -> bool {
        self.is_subtype_of(TokenType::Error)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Token => write!(f, "Token"),
            other => write!(f, "Token.{}", other.path()),
        }
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenType::Token => serializer.serialize_str("Token"),
            other => serializer.serialize_str(other.path()),
        }
    }
}

impl<'de> Deserialize<'de> for TokenType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = std::string::String::deserialize(deserializer)?;
        TokenType::from_path(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown token type '{}'", raw)))
    }
}
