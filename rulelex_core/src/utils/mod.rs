//! Shared primitive types used across the tokenizer engine

pub mod span;

pub use span::{Position, SourceMap, Span};
