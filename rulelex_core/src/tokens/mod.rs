//! Token system
//!
//! Output side of the engine: the hierarchical classification every token
//! carries, the token value itself, and the lazy stream a tokenization run
//! produces.
//!
//! ## Key Components
//!
//! - **[`TokenType`]** - Closed classification tree with an explicit parent relation
//! - **[`Token`]** - Classification, exact source text and span
//! - **[`TokenStream`]** - Pull-driven iterator over one run
//!
//! Concatenating the text of every token a stream yields reproduces the
//! input exactly, including error and whitespace tokens.

pub mod classification;
pub mod token;
pub mod token_stream;

pub use classification::TokenType;
pub use token::Token;
pub use token_stream::TokenStream;

// Re-export span types from utils
pub use crate::utils::{Position, SourceMap, Span};
