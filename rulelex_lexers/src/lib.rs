//! Concrete rule tables for the rulelex engine
//!
//! Each lexer here is a [`rulelex_core::RuleSet`] plus metadata. The
//! [`LexerCatalog`] collects them for lookup by name or file name.

pub mod catalog;
pub mod input;
pub mod properties;

pub use catalog::{CatalogError, LexerCatalog};
pub use input::{read_source, InputError};
pub use properties::PropertiesLexer;
