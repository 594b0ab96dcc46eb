//! Shared types for the Farey toolchain: indexed source text, byte/char
//! spans, and the lexical token vocabulary.
//!
//! Every later stage (lexer, parser, type table, interpreter, IR
//! translator) builds on these without depending on each other.

pub mod span;
pub mod token;

pub use span::{IndexedText, Span};
pub use token::{Token, TokenKind};
